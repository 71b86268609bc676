/// Integration tests for the Tienda API
///
/// These verify the full system end-to-end against a real database:
/// - Customer CRUD with validation and duplicate detection
/// - Product creation with price validation
/// - Search filtering, scoping, and ordering
/// - Session lifecycle (register, login, logout, revocation)
///
/// Requires `DATABASE_URL` to point at a PostgreSQL instance.

mod common;

use axum::http::StatusCode;
use common::{unique_marker, TestContext, TEST_PASSWORD};
use serde_json::json;

#[tokio::test]
async fn test_create_customer_success() {
    let ctx = TestContext::new().await.unwrap();
    let marker = unique_marker();

    let (status, body) = ctx
        .request_json(
            "POST",
            "/v1/customers",
            Some(json!({
                "name": format!("Ana {}", marker),
                "age": 30,
                "email": format!("ana-{}@example.com", marker),
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    assert_eq!(body["customer"]["age"], 30);

    // Registered-by notice names the acting user; no VIP notice at age 30
    let messages = body["messages"].as_array().unwrap();
    assert!(messages
        .iter()
        .any(|m| m["text"].as_str().unwrap().contains(&ctx.user.username)));
    assert!(!messages.iter().any(|m| m["text"].as_str().unwrap().contains("VIP")));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_create_customer_vip_notice() {
    let ctx = TestContext::new().await.unwrap();
    let marker = unique_marker();

    let (status, body) = ctx
        .request_json(
            "POST",
            "/v1/customers",
            Some(json!({
                "name": format!("Vip {}", marker),
                "age": 41,
                "email": format!("vip-{}@example.com", marker),
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let messages = body["messages"].as_array().unwrap();
    assert!(messages.iter().any(|m| {
        m["level"] == "info" && m["text"].as_str().unwrap().contains("VIP")
    }));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_customer_age_bounds() {
    let ctx = TestContext::new().await.unwrap();
    let marker = unique_marker();

    for (age, expected) in [
        (0, StatusCode::UNPROCESSABLE_ENTITY),
        (1, StatusCode::CREATED),
        (120, StatusCode::CREATED),
        (121, StatusCode::UNPROCESSABLE_ENTITY),
    ] {
        let (status, body) = ctx
            .request_json(
                "POST",
                "/v1/customers",
                Some(json!({
                    "name": "Bounds",
                    "age": age,
                    "email": format!("bounds-{}-{}@example.com", age, marker),
                })),
            )
            .await;
        assert_eq!(status, expected, "age {}: {}", age, body);
    }

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_customer_email_conflicts() {
    let ctx = TestContext::new().await.unwrap();
    let email = format!("dup-{}@example.com", unique_marker());

    let payload = json!({ "name": "First", "age": 25, "email": email });

    let (status, _) = ctx.request_json("POST", "/v1/customers", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = ctx.request_json("POST", "/v1/customers", Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "duplicate_field");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_customer_crud_roundtrip() {
    let ctx = TestContext::new().await.unwrap();
    let marker = unique_marker();

    let (_, created) = ctx
        .request_json(
            "POST",
            "/v1/customers",
            Some(json!({
                "name": format!("Crud {}", marker),
                "age": 33,
                "email": format!("crud-{}@example.com", marker),
            })),
        )
        .await;
    let id = created["customer"]["id"].as_str().unwrap().to_string();

    // Detail
    let (status, body) = ctx
        .request_json("GET", &format!("/v1/customers/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer"]["age"], 33);

    // Edit
    let (status, body) = ctx
        .request_json(
            "PUT",
            &format!("/v1/customers/{}", id),
            Some(json!({ "age": 34 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer"]["age"], 34);

    // Delete, then the detail is gone
    let (status, _) = ctx
        .request_json("DELETE", &format!("/v1/customers/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request_json("GET", &format!("/v1/customers/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_product_price_validation() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .request_json(
            "POST",
            "/v1/products",
            Some(json!({ "name": "Freebie", "price": "-0.01" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body: {}", body);

    let (status, body) = ctx
        .request_json(
            "POST",
            "/v1/products",
            Some(json!({ "name": "Freebie", "price": "0" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    assert_eq!(body["product"]["stock"], 0);
    assert_eq!(body["product"]["active"], true);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_inactive_product_warning() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .request_json(
            "POST",
            "/v1/products",
            Some(json!({ "name": "Hidden", "price": "9.99", "active": false })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let messages = body["messages"].as_array().unwrap();
    assert!(messages.iter().any(|m| m["level"] == "warning"));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_search_products_scoped_and_ordered() {
    let ctx = TestContext::new().await.unwrap();
    let marker = unique_marker();

    // Two matching products (created out of name order) and one that
    // matches only via description
    for (name, description) in [
        (format!("Zeta shirt {}", marker), None::<String>),
        (format!("Alpha shirt {}", marker), None),
        (format!("Plain {}", marker), Some(format!("a SHIRT {} in disguise", marker))),
    ] {
        let (status, _) = ctx
            .request_json(
                "POST",
                "/v1/products",
                Some(json!({ "name": name, "price": "10.00", "description": description })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // A customer matching the marker must not appear in a products search
    let (status, _) = ctx
        .request_json(
            "POST",
            "/v1/customers",
            Some(json!({
                "name": format!("Shirt Fan {}", marker),
                "age": 20,
                "email": format!("shirt-{}@example.com", marker),
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = ctx
        .request_json(
            "GET",
            &format!("/v1/search?q=shirt%20{}&scope=products", marker),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["total_customers"], 0);
    assert_eq!(body["total_products"], 2);

    // Ascending by name: Alpha before Zeta
    let names: Vec<&str> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert!(names[0].starts_with("Alpha"));
    assert!(names[1].starts_with("Zeta"));

    // Description-only match is found when the query hits the description
    let (_, body) = ctx
        .request_json(
            "GET",
            &format!("/v1/search?q=SHIRT%20{}%20in&scope=products", marker),
            None,
        )
        .await;
    assert_eq!(body["total_products"], 1);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_search_all_includes_both_types() {
    let ctx = TestContext::new().await.unwrap();
    let marker = unique_marker();

    let (status, _) = ctx
        .request_json(
            "POST",
            "/v1/customers",
            Some(json!({
                "name": format!("Match {}", marker),
                "age": 28,
                "email": format!("match-{}@example.com", marker),
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = ctx
        .request_json(
            "POST",
            "/v1/products",
            Some(json!({ "name": format!("Match {}", marker), "price": "1.00" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = ctx
        .request_json("GET", &format!("/v1/search?q={}", marker), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_customers"], 1);
    assert_eq!(body["total_products"], 1);
    assert_eq!(body["messages"][0]["level"], "success");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_search_empty_query_returns_nothing() {
    let ctx = TestContext::new().await.unwrap();

    for uri in ["/v1/search", "/v1/search?q=", "/v1/search?q=%20%20"] {
        let (status, body) = ctx.request_json("GET", uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_customers"], 0, "uri: {}", uri);
        assert_eq!(body["total_products"], 0, "uri: {}", uri);
    }

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_unauthenticated_access_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.request_json_anon("GET", "/v1/customers", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["messages"][0]["level"], "warning");

    // Garbage token is also rejected
    let (status, _) = ctx
        .request_json_anon("GET", "/v1/search?q=x", None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let ctx = TestContext::new().await.unwrap();

    // Session works before logout
    let (status, _) = ctx.request_json("GET", "/v1/customers", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx.request_json("POST", "/v1/auth/logout", None).await;
    assert_eq!(status, StatusCode::OK);

    // Same token is now rejected
    let (status, _) = ctx.request_json("GET", "/v1/customers", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_register_login_roundtrip() {
    let ctx = TestContext::new().await.unwrap();
    let marker = unique_marker();
    let email = format!("reg-{}@example.com", marker);

    // Short password is rejected with a field-level detail
    let (status, body) = ctx
        .request_json_anon(
            "POST",
            "/v1/auth/register",
            Some(json!({
                "username": format!("reg-{}", marker),
                "email": email,
                "password1": "abc12",
                "password2": "abc12",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "password1");

    // Valid registration returns a usable session token
    let (status, body) = ctx
        .request_json_anon(
            "POST",
            "/v1/auth/register",
            Some(json!({
                "username": format!("reg-{}", marker),
                "email": email,
                "password1": "abc123",
                "password2": "abc123",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, profile) = ctx
        .request_json_anon_with_token("GET", "/v1/account", None, &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["user"]["email"], email);

    // Registering the same username again conflicts
    let (status, body) = ctx
        .request_json_anon(
            "POST",
            "/v1/auth/register",
            Some(json!({
                "username": format!("reg-{}", marker),
                "email": format!("other-{}@example.com", marker),
                "password1": "abc123",
                "password2": "abc123",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "duplicate_field");

    // Fresh login with the registered credentials
    let (status, body) = ctx
        .request_json_anon(
            "POST",
            "/v1/auth/login",
            Some(json!({ "email": email, "password": "abc123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().unwrap().starts_with("tnd_"));

    // Wrong password is a uniform 401
    let (status, _) = ctx
        .request_json_anon(
            "POST",
            "/v1/auth/login",
            Some(json!({ "email": email, "password": "wrong1" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Clean up the registered user
    let registered = tienda_shared::models::user::User::find_by_email(&ctx.db, &email)
        .await
        .unwrap()
        .unwrap();
    tienda_shared::models::user::User::delete(&ctx.db, registered.id)
        .await
        .unwrap();

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_change_password_revokes_other_sessions() {
    let ctx = TestContext::new().await.unwrap();

    // Open a second session for the same user via login
    let (status, body) = ctx
        .request_json_anon(
            "POST",
            "/v1/auth/login",
            Some(json!({ "email": ctx.user.email, "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let second_token = body["token"].as_str().unwrap().to_string();

    // Change password from the primary session
    let (status, _) = ctx
        .request_json(
            "POST",
            "/v1/account/password",
            Some(json!({
                "old_password": TEST_PASSWORD,
                "new_password1": "newpass1",
                "new_password2": "newpass1",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The second session is gone; the primary still works
    let (status, _) = ctx
        .request_json_anon_with_token("GET", "/v1/account", None, &second_token)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx.request_json("GET", "/v1/account", None).await;
    assert_eq!(status, StatusCode::OK);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_public_routes_need_no_auth() {
    let ctx = TestContext::new().await.unwrap();

    for uri in ["/", "/about", "/health"] {
        let (status, _) = ctx.request_json_anon("GET", uri, None).await;
        assert_eq!(status, StatusCode::OK, "uri: {}", uri);
    }

    ctx.cleanup().await.unwrap();
}
