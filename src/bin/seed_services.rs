//! Seeds the default cleaning catalog.
//!
//! Services are upserted by name, so running this again refreshes prices
//! and descriptions without duplicating rows.
//!
//! Usage:
//! ```bash
//! cargo run --bin seed-services
//! ```

use dotenv::dotenv;
use gleamy_backend::create_pool;
use gleamy_backend::db::services as service_db;
use gleamy_backend::models::services::{Categories, CreateService};
use migration::{Migrator, MigratorTrait};
use tracing_subscriber::EnvFilter;

struct CatalogEntry {
    name: &'static str,
    description: &'static str,
    base_price: i64,
    price_unit: &'static str,
    duration: i32,
    category: Categories,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Home Deep Cleaning",
        description: "Comprehensive deep cleaning for the entire home including kitchen, bathrooms, bedrooms and living areas.",
        base_price: 8000,
        price_unit: "per service",
        duration: 180,
        category: Categories::Residential,
    },
    CatalogEntry {
        name: "Office Cleaning",
        description: "Workstations, meeting rooms, pantry and common areas.",
        base_price: 12000,
        price_unit: "per service",
        duration: 120,
        category: Categories::Commercial,
    },
    CatalogEntry {
        name: "Kitchen Deep Cleaning",
        description: "Appliances, cabinets, countertops and floor scrubbing.",
        base_price: 5000,
        price_unit: "per service",
        duration: 120,
        category: Categories::Residential,
    },
    CatalogEntry {
        name: "Bathroom Sanitization",
        description: "Tiles, fixtures, mirrors and floor, cleaned and sanitized.",
        base_price: 3500,
        price_unit: "per bathroom",
        duration: 60,
        category: Categories::Residential,
    },
    CatalogEntry {
        name: "Window & Glass Cleaning",
        description: "Window and glass surfaces for homes and offices.",
        base_price: 4000,
        price_unit: "per service",
        duration: 90,
        category: Categories::Residential,
    },
    CatalogEntry {
        name: "Carpet & Upholstery Cleaning",
        description: "Carpets, sofas and upholstered furniture with professional equipment.",
        base_price: 6500,
        price_unit: "per service",
        duration: 150,
        category: Categories::Residential,
    },
    CatalogEntry {
        name: "Move-In/Move-Out Cleaning",
        description: "Whole-property cleaning before moving in or after moving out.",
        base_price: 10000,
        price_unit: "per property",
        duration: 240,
        category: Categories::Residential,
    },
    CatalogEntry {
        name: "Post-Construction Cleaning",
        description: "Removes construction dust and debris so the space is ready for use.",
        base_price: 15000,
        price_unit: "per property",
        duration: 300,
        category: Categories::Commercial,
    },
    CatalogEntry {
        name: "Car Interior Cleaning",
        description: "Vacuuming, dashboard wiping and seat cleaning.",
        base_price: 2500,
        price_unit: "per vehicle",
        duration: 60,
        category: Categories::Specialized,
    },
    CatalogEntry {
        name: "Laundry Service",
        description: "Washing, drying and folding for clothes and linens.",
        base_price: 1500,
        price_unit: "per kg",
        duration: 90,
        category: Categories::Specialized,
    },
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let database_url = std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    let db = create_pool(&database_url).await?;
    Migrator::up(&db, None).await?;

    for entry in CATALOG {
        let input = CreateService {
            name: entry.name.to_string(),
            category: entry.category,
            description: entry.description.to_string(),
            base_price: entry.base_price,
            price_unit: entry.price_unit.to_string(),
            duration: entry.duration,
            features: Vec::new(),
            image_url: None,
        };

        let (service, created) = service_db::upsert_service_by_name(&db, input).await?;
        if created {
            tracing::info!(id = %service.id, "Created service: {}", service.name);
        } else {
            tracing::info!(id = %service.id, "Updated service: {}", service.name);
        }
    }

    tracing::info!(count = CATALOG.len(), "Service catalog seeded");
    Ok(())
}
