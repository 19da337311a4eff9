use std::collections::HashMap;

use sea_orm::*;
use uuid::Uuid;

use crate::models::bookings::{self, BookingDetails, BookingListQuery, BookingPage, BookingSummary};
use crate::models::customers::{self, CustomerWithUser};
use crate::models::employees::{self, EmployeeWithUser};
use crate::models::job_assignments::{self, AssignmentWithEmployee};
use crate::models::users::{self, UserResponse};
use crate::models::{reviews, services, uploaded_media};

/// Fetch a single booking by ID.
pub async fn get_booking_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<bookings::Model>, DbErr> {
    bookings::Entity::find_by_id(id).one(db).await
}

/// Fetch a booking and take a row lock on it for the rest of the transaction.
pub async fn lock_booking<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<bookings::Model>, DbErr> {
    bookings::Entity::find_by_id(id)
        .lock_exclusive()
        .one(db)
        .await
}

/// Whether a booking number is already taken.
pub async fn booking_number_exists(
    db: &DatabaseConnection,
    booking_number: &str,
) -> Result<bool, DbErr> {
    let count = bookings::Entity::find()
        .filter(bookings::Column::BookingNumber.eq(booking_number))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// A customer's bookings, newest first, with service and assignments.
pub async fn get_bookings_by_customer(
    db: &DatabaseConnection,
    customer_id: Uuid,
) -> Result<Vec<BookingSummary>, DbErr> {
    let rows = bookings::Entity::find()
        .filter(bookings::Column::CustomerId.eq(customer_id))
        .order_by_desc(bookings::Column::CreatedAt)
        .all(db)
        .await?;

    summarize(db, rows).await
}

/// Admin listing: one page of bookings (optionally by status) plus the total count.
pub async fn get_bookings_paginated(
    db: &DatabaseConnection,
    query: &BookingListQuery,
) -> Result<BookingPage, DbErr> {
    let pagination = query.pagination();
    let page = pagination.page();
    let limit = pagination.limit();

    let mut select = bookings::Entity::find();
    if let Some(status) = query.status {
        select = select.filter(bookings::Column::Status.eq(status));
    }

    let paginator = select
        .order_by_desc(bookings::Column::CreatedAt)
        .paginate(db, limit);
    let total = paginator.num_items().await?;
    // Paginator pages are 0-indexed.
    let rows = paginator.fetch_page(page - 1).await?;

    let bookings = summarize(db, rows).await?;
    Ok(BookingPage {
        results: bookings.len(),
        total,
        page,
        limit,
        bookings,
    })
}

/// Attach customer, service and assignments to each booking, one query per relation.
async fn summarize(
    db: &DatabaseConnection,
    rows: Vec<bookings::Model>,
) -> Result<Vec<BookingSummary>, DbErr> {
    let services = rows.load_one(services::Entity, db).await?;
    let customers = with_customer_users(db, rows.load_one(customers::Entity, db).await?).await?;
    let assignments = rows.load_many(job_assignments::Entity, db).await?;

    // Resolve every employee in one pass, then hand each booking its share back.
    let counts: Vec<usize> = assignments.iter().map(Vec::len).collect();
    let mut assignments = with_employees(db, assignments.into_iter().flatten().collect())
        .await?
        .into_iter();

    Ok(rows
        .into_iter()
        .zip(customers)
        .zip(services)
        .zip(counts)
        .map(|(((booking, customer), service), count)| BookingSummary {
            booking,
            customer,
            service,
            assignments: assignments.by_ref().take(count).collect(),
        })
        .collect())
}

/// Pair each assignment with its employee and the employee's user.
pub(crate) async fn with_employees<C: ConnectionTrait>(
    db: &C,
    assignments: Vec<job_assignments::Model>,
) -> Result<Vec<AssignmentWithEmployee>, DbErr> {
    let employees = assignments.load_one(employees::Entity, db).await?;
    let known: Vec<employees::Model> = employees.iter().flatten().cloned().collect();
    let users = users_by_id(known.load_one(users::Entity, db).await?);

    Ok(assignments
        .into_iter()
        .zip(employees)
        .map(|(assignment, employee)| AssignmentWithEmployee {
            assignment,
            employee: employee.map(|employee| EmployeeWithUser {
                user: users.get(&employee.user_id).cloned(),
                employee,
            }),
        })
        .collect())
}

/// Attach the owning user to each (possibly missing) customer.
pub(crate) async fn with_customer_users<C: ConnectionTrait>(
    db: &C,
    customers: Vec<Option<customers::Model>>,
) -> Result<Vec<Option<CustomerWithUser>>, DbErr> {
    let known: Vec<customers::Model> = customers.iter().flatten().cloned().collect();
    let users = users_by_id(known.load_one(users::Entity, db).await?);

    Ok(customers
        .into_iter()
        .map(|customer| {
            customer.map(|customer| CustomerWithUser {
                user: users.get(&customer.user_id).cloned(),
                customer,
            })
        })
        .collect())
}

fn users_by_id(users: Vec<Option<users::Model>>) -> HashMap<Uuid, UserResponse> {
    users
        .into_iter()
        .flatten()
        .map(|user| (user.id, user.into()))
        .collect()
}

/// Full view of one booking: service, assignment history, uploads and review.
pub async fn get_booking_details(
    db: &DatabaseConnection,
    booking: bookings::Model,
) -> Result<BookingDetails, DbErr> {
    let customer = booking.find_related(customers::Entity).one(db).await?;
    let customer = with_customer_users(db, vec![customer])
        .await?
        .into_iter()
        .next()
        .flatten();
    let service = booking.find_related(services::Entity).one(db).await?;
    let assignments = booking
        .find_related(job_assignments::Entity)
        .order_by_desc(job_assignments::Column::AssignedAt)
        .all(db)
        .await?;
    let assignments = with_employees(db, assignments).await?;
    let uploaded_media = booking
        .find_related(uploaded_media::Entity)
        .order_by_asc(uploaded_media::Column::CreatedAt)
        .all(db)
        .await?;
    let review = booking.find_related(reviews::Entity).one(db).await?;

    Ok(BookingDetails {
        booking,
        customer,
        service,
        assignments,
        uploaded_media,
        review,
    })
}
