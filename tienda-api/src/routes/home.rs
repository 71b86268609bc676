/// Public home and about pages
///
/// The only endpoints reachable without a session besides health and the
/// anonymous auth routes.

use axum::Json;
use serde::Serialize;

/// Home page payload
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    /// Service name
    pub service: &'static str,

    /// Application version
    pub version: &'static str,

    /// Short description
    pub description: &'static str,
}

/// About page payload
#[derive(Debug, Serialize)]
pub struct AboutResponse {
    /// Service name
    pub service: &'static str,

    /// What the backend does
    pub about: &'static str,
}

/// Home handler
///
/// ```text
/// GET /
/// ```
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        service: "tienda",
        version: env!("CARGO_PKG_VERSION"),
        description: "E-commerce administration backend: customers, products, search",
    })
}

/// About handler
///
/// ```text
/// GET /about
/// ```
pub async fn about() -> Json<AboutResponse> {
    Json(AboutResponse {
        service: "tienda",
        about: "Administration API for managing customers and the product \
                catalog, with session-based login and free-text search.",
    })
}
