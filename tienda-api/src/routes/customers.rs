/// Customer CRUD endpoints
///
/// Creation validates the form, writes the record, and attaches the status
/// messages the administration UI shows: the success confirmation, who
/// performed the action, and the VIP notice for customers over the age
/// threshold. VIP status is never stored; it exists only as a message.
///
/// # Endpoints
///
/// - `POST   /v1/customers` - Create
/// - `GET    /v1/customers` - List (name ascending)
/// - `GET    /v1/customers/:id` - Detail
/// - `PUT    /v1/customers/:id` - Edit
/// - `DELETE /v1/customers/:id` - Delete

use crate::{
    app::AppState,
    error::{validation_details, ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tienda_shared::{
    auth::context::AuthContext,
    models::customer::{CreateCustomer, Customer, UpdateCustomer},
    notify::Notice,
};
use uuid::Uuid;
use validator::Validate;

/// Customer creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    /// Full name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Age in years
    #[validate(range(min = 1, max = 120, message = "Age must be between 1 and 120"))]
    pub age: i32,

    /// Email address (unique)
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Customer update request; omitted fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    /// New name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    /// New age
    #[validate(range(min = 1, max = 120, message = "Age must be between 1 and 120"))]
    pub age: Option<i32>,

    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

/// Single-customer response
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    /// The customer record
    pub customer: Customer,

    /// Status messages
    pub messages: Vec<Notice>,
}

/// Customer list response
#[derive(Debug, Serialize)]
pub struct CustomerListResponse {
    /// All customers, ordered by name
    pub customers: Vec<Customer>,

    /// Number of customers
    pub total: usize,
}

/// Status-only response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Status messages
    pub messages: Vec<Notice>,
}

/// Creates a customer
///
/// # Errors
///
/// - `422`: validation failed (name length, age range, email shape)
/// - `409`: email already registered to another customer
pub async fn create_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateCustomerRequest>,
) -> ApiResult<(StatusCode, Json<CustomerResponse>)> {
    req.validate().map_err(|e| validation_details(&e))?;

    let customer = Customer::create(
        &state.db,
        CreateCustomer {
            name: req.name,
            age: req.age,
            email: req.email,
        },
    )
    .await?;

    tracing::info!(customer_id = %customer.id, "Customer created");

    let mut messages = vec![
        Notice::success(format!("Customer \"{}\" created", customer.name)),
        Notice::info(format!("Customer registered by: {}", auth.username)),
    ];

    if customer.is_vip() {
        messages.push(Notice::info(format!(
            "{} is a VIP customer (over 40)!",
            customer.name
        )));
    }

    Ok((
        StatusCode::CREATED,
        Json(CustomerResponse { customer, messages }),
    ))
}

/// Lists all customers, ordered ascending by name
pub async fn list_customers(
    State(state): State<AppState>,
) -> ApiResult<Json<CustomerListResponse>> {
    let customers = Customer::list(&state.db).await?;
    let total = customers.len();

    Ok(Json(CustomerListResponse { customers, total }))
}

/// Returns a single customer
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CustomerResponse>> {
    let customer = Customer::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    Ok(Json(CustomerResponse {
        customer,
        messages: vec![],
    }))
}

/// Edits a customer
///
/// # Errors
///
/// - `404`: customer does not exist
/// - `422`: validation failed
/// - `409`: new email already registered to another customer
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCustomerRequest>,
) -> ApiResult<Json<CustomerResponse>> {
    req.validate().map_err(|e| validation_details(&e))?;

    let customer = Customer::update(
        &state.db,
        id,
        UpdateCustomer {
            name: req.name,
            age: req.age,
            email: req.email,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    tracing::info!(customer_id = %customer.id, "Customer updated");

    Ok(Json(CustomerResponse {
        messages: vec![Notice::success(format!(
            "Customer \"{}\" updated",
            customer.name
        ))],
        customer,
    }))
}

/// Deletes a customer
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<StatusResponse>> {
    let deleted = Customer::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Customer not found".to_string()));
    }

    tracing::info!(customer_id = %id, "Customer deleted");

    Ok(Json(StatusResponse {
        messages: vec![Notice::success("Customer deleted")],
    }))
}
