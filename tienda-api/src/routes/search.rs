/// Free-text search across customers and products
///
/// Case-insensitive substring match: customers on name or email, products
/// on name or description, both ordered ascending by name. An empty or
/// whitespace-only query returns empty result sets; there is no implicit
/// match-all.
///
/// # Endpoint
///
/// ```text
/// GET /v1/search?q=shirt&scope=products
/// ```
///
/// `scope` is one of `customers`, `products`, `all` (default `all`).

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tienda_shared::{
    models::{customer::Customer, product::Product},
    notify::Notice,
};

/// Which entity types a search covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    /// Customers only
    Customers,

    /// Products only
    Products,

    /// Both customers and products
    #[default]
    All,
}

impl SearchScope {
    fn includes_customers(self) -> bool {
        matches!(self, SearchScope::Customers | SearchScope::All)
    }

    fn includes_products(self) -> bool {
        matches!(self, SearchScope::Products | SearchScope::All)
    }
}

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Free-text query
    #[serde(default)]
    pub q: String,

    /// Entity-type filter
    #[serde(default)]
    pub scope: SearchScope,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Echo of the trimmed query
    pub query: String,

    /// Echo of the scope
    pub scope: SearchScope,

    /// Matching customers (empty when out of scope or no query)
    pub customers: Vec<Customer>,

    /// Matching products (empty when out of scope or no query)
    pub products: Vec<Product>,

    /// Number of matching customers
    pub total_customers: usize,

    /// Number of matching products
    pub total_products: usize,

    /// Status messages
    pub messages: Vec<Notice>,
}

/// Search handler
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    let query = params.q.trim().to_string();
    let scope = params.scope;

    let mut customers = Vec::new();
    let mut products = Vec::new();
    let mut messages = Vec::new();

    if !query.is_empty() {
        if scope.includes_customers() {
            customers = Customer::search(&state.db, &query).await?;
        }
        if scope.includes_products() {
            products = Product::search(&state.db, &query).await?;
        }

        let total = customers.len() + products.len();
        if total > 0 {
            messages.push(Notice::success(format!(
                "Found {} result(s) for \"{}\"",
                total, query
            )));
        } else {
            messages.push(Notice::warning(format!(
                "No results found for \"{}\"",
                query
            )));
        }
    }

    Ok(Json(SearchResponse {
        total_customers: customers.len(),
        total_products: products.len(),
        query,
        scope,
        customers,
        products,
        messages,
    }))
}
