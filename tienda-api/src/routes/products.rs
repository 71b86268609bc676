/// Product creation endpoint
///
/// Products are created through the administration UI and surfaced by
/// search; there is no edit or delete surface. The response messages
/// mirror the original flow: success, who registered it, and whether the
/// product is visible.
///
/// # Endpoint
///
/// - `POST /v1/products` - Create

use crate::{
    app::AppState,
    error::{validation_details, ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tienda_shared::{
    auth::context::AuthContext,
    models::product::{CreateProduct, Product},
    notify::Notice,
};
use validator::Validate;

/// Product creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    /// Product name
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    /// Price in USD, non-negative, at most 2 decimal places
    ///
    /// Checked separately in the handler; the range attribute does not
    /// apply to decimals.
    pub price: Decimal,

    /// Optional description
    pub description: Option<String>,

    /// Initial stock (default 0)
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,

    /// Visibility flag (default true)
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Rejects negative prices and sub-cent precision
fn validate_price(price: &Decimal) -> Result<(), ValidationErrorDetail> {
    if price.is_sign_negative() {
        return Err(ValidationErrorDetail {
            field: "price".to_string(),
            message: "Price cannot be negative".to_string(),
        });
    }
    if price.scale() > 2 {
        return Err(ValidationErrorDetail {
            field: "price".to_string(),
            message: "Price supports at most 2 decimal places".to_string(),
        });
    }
    Ok(())
}

/// Product creation response
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    /// The created product
    pub product: Product,

    /// Status messages
    pub messages: Vec<Notice>,
}

/// Creates a product
///
/// # Errors
///
/// - `422`: validation failed (name length, negative price, precision, stock)
pub async fn create_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    req.validate().map_err(|e| validation_details(&e))?;
    validate_price(&req.price).map_err(|d| ApiError::ValidationError(vec![d]))?;

    let product = Product::create(
        &state.db,
        CreateProduct {
            name: req.name,
            price: req.price,
            description: req.description.filter(|d| !d.trim().is_empty()),
            stock: req.stock,
            active: req.active,
        },
    )
    .await?;

    tracing::info!(product_id = %product.id, active = product.active, "Product created");

    let mut messages = vec![
        Notice::success(format!("Product \"{}\" created", product.name)),
        Notice::info(format!("Product registered by: {}", auth.username)),
    ];

    if product.active {
        messages.push(Notice::info("The product is active and available"));
    } else {
        messages.push(Notice::warning(
            "The product is inactive and will not be visible",
        ));
    }

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse { product, messages }),
    ))
}
