//! Integration tests for the admin client's interceptors and resource calls.
//!
//! Every test starts its own [`MockBackend`], so they can run in parallel.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use axum::http::{Method, StatusCode};
use bookshelf_admin::api::Supersede;
use bookshelf_admin::{ApiError, ListQuery, Navigator};
use bookshelf_core::forms::{
    AuthorForm, BookForm, ContactForm, ImageSelection, OrderForm, OrderLine, OrderLineItem,
    PackForm, Upload,
};
use bookshelf_core::{AuthorId, BookId, DeliveryType, Language, OrderId, OrderStatus, Price};
use bookshelf_integration_tests::{Canned, MockBackend};
use secrecy::SecretString;
use serde_json::json;

fn book_json(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "author": {"id": 1, "name": "Kateb Yacine"},
        "price": 1800.0,
        "stockQuantity": 4,
        "language": "FRENCH"
    })
}

fn order_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "firstName": "Amel",
        "lastName": "Benali",
        "phone": "0550123456",
        "wilaya": "Oran",
        "address": "12 rue Larbi Ben M'hidi",
        "deliveryType": "HOME",
        "status": status,
        "items": [{"bookId": 3, "title": "Nedjma", "quantity": 2, "unitPrice": 1800}],
        "deliveryFee": 600,
        "totalAmount": 4200
    })
}

fn order_form() -> OrderForm {
    OrderForm {
        first_name: "Amel".to_string(),
        last_name: "Benali".to_string(),
        phone: "0550 12 34 56".to_string(),
        wilaya: "Oran".to_string(),
        address: "12 rue Larbi Ben M'hidi".to_string(),
        delivery_type: DeliveryType::Home,
        items: vec![OrderLine {
            item: OrderLineItem::Book(BookId::new(3)),
            quantity: 2,
        }],
        ..OrderForm::default()
    }
}

// ============================================================================
// Request interceptor
// ============================================================================

#[tokio::test]
async fn test_headers_follow_session_and_csrf_cookie() {
    let backend = MockBackend::start().await.unwrap();
    backend.on(
        Method::GET,
        "/api/authors",
        Canned::json(&json!([])).with_cookie("XSRF-TOKEN=csrf-1; Path=/"),
    );
    backend.on(
        Method::POST,
        "/api/authors",
        Canned::json(&json!({"id": 9, "name": "Assia Djebar"})),
    );
    let (client, _) = backend.client("/admin/authors").unwrap();

    // anonymous, no cookie yet
    client.list_authors(&ListQuery::new()).await.unwrap();
    let get = &backend.requests_to(&Method::GET, "/api/authors")[0];
    assert_eq!(get.header("authorization"), None);
    assert_eq!(get.header("content-type"), Some("application/json"));
    assert_eq!(get.header("x-xsrf-token"), None);

    client
        .session()
        .set_token(SecretString::from("tok-1"))
        .unwrap();
    let form = AuthorForm {
        name: "Assia Djebar".to_string(),
        ..AuthorForm::default()
    };
    let author = client.create_author(&form).await.unwrap();
    assert_eq!(author.id, AuthorId::new(9));

    let post = &backend.requests_to(&Method::POST, "/api/authors")[0];
    assert_eq!(post.header("authorization"), Some("Bearer tok-1"));
    assert_eq!(post.header("x-xsrf-token"), Some("csrf-1"));
    assert_eq!(post.body_json()["name"], "Assia Djebar");
}

#[tokio::test]
async fn test_exempt_endpoints_skip_csrf_header() {
    let backend = MockBackend::start().await.unwrap();
    backend.on(
        Method::GET,
        "/api/books",
        Canned::json(&json!([])).with_cookie("XSRF-TOKEN=csrf-2; Path=/"),
    );
    backend.on(Method::POST, "/api/orders", Canned::json(&order_json(5, "PENDING")));
    backend.on(
        Method::PUT,
        "/api/orders/5/status",
        Canned::json(&order_json(5, "CONFIRMED")),
    );
    backend.on(Method::POST, "/api/contact", Canned::status(StatusCode::OK));
    let (client, _) = backend.client("/").unwrap();

    client.list_books(&ListQuery::new()).await.unwrap();
    let order = client.create_guest_order(&order_form()).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    client
        .submit_contact(&ContactForm {
            name: "Amel".to_string(),
            email: "amel@example.dz".to_string(),
            subject: "Commande".to_string(),
            message: "Quand arrive ma commande ?".to_string(),
        })
        .await
        .unwrap();
    client
        .update_order_status(OrderId::new(5), OrderStatus::Confirmed)
        .await
        .unwrap();

    let placed = &backend.requests_to(&Method::POST, "/api/orders")[0];
    assert_eq!(placed.header("x-xsrf-token"), None);
    assert_eq!(placed.body_json()["phone"], "0550123456");

    let contact = &backend.requests_to(&Method::POST, "/api/contact")[0];
    assert_eq!(contact.header("x-xsrf-token"), None);

    let status = &backend.requests_to(&Method::PUT, "/api/orders/5/status")[0];
    assert_eq!(status.header("x-xsrf-token"), Some("csrf-2"));
    assert_eq!(status.body_json(), json!({"status": "CONFIRMED"}));
}

#[tokio::test]
async fn test_multipart_upload_keeps_boundary_content_type() {
    let backend = MockBackend::start().await.unwrap();
    backend.on(Method::POST, "/api/books", Canned::json(&book_json(12, "Nedjma")));
    let (client, _) = backend.client("/admin/books/new").unwrap();

    let form = BookForm {
        title: "Nedjma".to_string(),
        price: Some(Price::from_dinars(1800)),
        stock_quantity: Some(4),
        language: Some(Language::French),
        cover: ImageSelection::New(Upload::new("cover.png", "image/png", b"PNG".to_vec())),
        ..BookForm::default()
    };
    let book = client.create_book(&form).await.unwrap();
    assert_eq!(book.id, BookId::new(12));
    assert!(book.cover_url.starts_with(&format!("{}/api/books/12/cover?t=", backend.url())));

    let request = &backend.requests_to(&Method::POST, "/api/books")[0];
    let content_type = request.header("content-type").unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));

    let body = request.body_text();
    assert!(body.contains(r#"name="book""#));
    assert!(body.contains(r#"name="cover"; filename="cover.png""#));
    assert!(body.contains(r#""title":"Nedjma""#));
}

#[tokio::test]
async fn test_invalid_form_never_reaches_backend() {
    let backend = MockBackend::start().await.unwrap();
    let (client, _) = backend.client("/admin/packs/new").unwrap();

    let form = PackForm {
        name: "Classiques".to_string(),
        price: Some(Price::from_dinars(3000)),
        book_ids: vec![BookId::new(1)],
        cover: ImageSelection::Existing("http://localhost/cover".to_string()),
        ..PackForm::default()
    };
    let err = client.create_pack(&form).await.unwrap_err();

    let errors = err.field_errors().unwrap();
    assert_eq!(errors.get("books"), Some("Minimum 2 books per pack"));
    assert!(backend.requests().is_empty());
}

// ============================================================================
// Response interceptor
// ============================================================================

#[tokio::test]
async fn test_forbidden_redirects_to_login() {
    let backend = MockBackend::start().await.unwrap();
    backend.on(
        Method::GET,
        "/api/dashboard/stats",
        Canned::status(StatusCode::FORBIDDEN),
    );
    let (client, location) = backend.client("/admin/dashboard").unwrap();
    client
        .session()
        .set_token(SecretString::from("expired"))
        .unwrap();

    let err = client.dashboard_stats().await.unwrap_err();
    assert!(matches!(&err, ApiError::Redirected(path) if path == "/admin/login"));
    assert!(!err.is_user_visible());
    assert_eq!(location.current_path(), "/admin/login");
    assert!(!client.session().is_authenticated());

    // The next call goes out without the rejected token
    location.redirect("/admin/dashboard");
    let _ = client.dashboard_stats().await;
    let requests = backend.requests_to(&Method::GET, "/api/dashboard/stats");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].header("authorization"), Some("Bearer expired"));
    assert_eq!(requests[1].header("authorization"), None);
}

#[tokio::test]
async fn test_unauthorized_on_login_page_is_reported() {
    let backend = MockBackend::start().await.unwrap();
    backend.on(
        Method::POST,
        "/api/auth/login",
        Canned::json(&json!({"message": "Bad credentials"})).with_status(StatusCode::UNAUTHORIZED),
    );
    let (client, location) = backend.client("/admin/login").unwrap();

    let err = client
        .login("admin", &SecretString::from("wrong"))
        .await
        .unwrap_err();
    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "Bad credentials");
        }
        other => panic!("expected an API error, got {other:?}"),
    }
    assert_eq!(location.current_path(), "/admin/login");
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn test_missing_record_is_not_found() {
    let backend = MockBackend::start().await.unwrap();
    let (client, _) = backend.client("/admin/books/404").unwrap();

    let err = client.get_book(BookId::new(404)).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert!(err.is_user_visible());
}

// ============================================================================
// Listings
// ============================================================================

#[tokio::test]
async fn test_paginated_listing_keeps_page_fields() {
    let backend = MockBackend::start().await.unwrap();
    backend.on(
        Method::GET,
        "/api/books",
        Canned::json(&json!({
            "content": [book_json(1, "Nedjma"), book_json(2, "La Grande Maison")],
            "totalElements": 42,
            "totalPages": 21,
            "number": 3,
            "size": 2,
            "last": false
        })),
    );
    let (client, _) = backend.client("/admin/books").unwrap();

    let query = ListQuery::paged(3, 2).search("  ");
    let listing = client.list_books(&query).await.unwrap();

    assert!(listing.is_paginated());
    assert_eq!(listing.len(), 2);
    assert_eq!(listing.total_elements(), 42);
    assert_eq!(listing.page_number(), 3);
    assert_eq!(listing.items()[1].title, "La Grande Maison");

    let json = serde_json::to_value(&listing).unwrap();
    assert_eq!(json["last"], false);
    assert_eq!(json["size"], 2);

    let request = &backend.requests_to(&Method::GET, "/api/books")[0];
    assert_eq!(request.query.as_deref(), Some("page=3&size=2"));
}

#[tokio::test]
async fn test_main_display_sections_sorted() {
    let backend = MockBackend::start().await.unwrap();
    backend.on(
        Method::GET,
        "/api/tags/main-display",
        Canned::json(&json!([
            {"id": 2, "name": "Jeunesse", "displayOrder": 1, "mainDisplay": true},
            {"id": 1, "name": "Nouveautés", "displayOrder": 0, "mainDisplay": true,
             "books": [{"id": 7}], "imageUrl": "/api/tags/1/image"}
        ])),
    );
    let (client, _) = backend.client("/").unwrap();

    let sections = client.main_display_sections().await.unwrap();
    let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, ["Nouveautés", "Jeunesse"]);
    assert_eq!(sections[0].book_ids, [BookId::new(7)]);
}

// ============================================================================
// Sequencing and cancellation
// ============================================================================

#[tokio::test]
async fn test_newer_search_supersedes_older() {
    let backend = MockBackend::start().await.unwrap();
    backend.on(
        Method::GET,
        "/api/books",
        Canned::json(&json!([book_json(1, "stale")])).with_delay(Duration::from_millis(300)),
    );
    backend.on(Method::GET, "/api/books", Canned::json(&json!([book_json(2, "fresh")])));
    let (client, _) = backend.client("/admin/books").unwrap();
    let searches = Supersede::new();

    let first_query = ListQuery::new().search("n");
    let second_query = ListQuery::new().search("ne");
    let first = searches.run(client.list_books(&first_query));
    let second = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        searches.run(client.list_books(&second_query)).await
    };
    let (first, second) = tokio::join!(first, second);

    assert!(matches!(first, Err(ApiError::Cancelled)));
    assert_eq!(second.unwrap().items()[0].title, "fresh");
}

#[tokio::test]
async fn test_order_edit_updates_then_sets_status() {
    let backend = MockBackend::start().await.unwrap();
    backend.on(Method::PUT, "/api/orders/5", Canned::json(&order_json(5, "PENDING")));
    backend.on(
        Method::PUT,
        "/api/orders/5/status",
        Canned::json(&order_json(5, "SHIPPED")),
    );
    let (client, _) = backend.client("/admin/orders").unwrap();

    let order = client
        .apply_order_edit(OrderId::new(5), &order_form(), OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);

    let paths: Vec<String> = backend.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, ["/api/orders/5", "/api/orders/5/status"]);
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test]
async fn test_login_then_logout() {
    let backend = MockBackend::start().await.unwrap();
    backend.on(
        Method::POST,
        "/api/auth/login",
        Canned::json(&json!({
            "token": "jwt-abc",
            "admin": {"username": "admin", "firstName": "Nour", "lastName": "Kaci",
                      "email": "nour@bookshelf.dz"}
        })),
    );
    backend.on(Method::GET, "/api/orders/export", Canned::text("text/csv", "id,total\n5,4200\n"));
    let (client, _) = backend.client("/admin/login").unwrap();

    client
        .login("admin", &SecretString::from("s3cret-pass"))
        .await
        .unwrap();
    assert!(client.session().is_authenticated());
    assert_eq!(
        client.session().admin_profile().unwrap().display_name(),
        "Nour Kaci"
    );

    let login = &backend.requests_to(&Method::POST, "/api/auth/login")[0];
    assert_eq!(login.body_json(), json!({"username": "admin", "password": "s3cret-pass"}));

    let csv = client
        .export_orders(&ListQuery::new().status(OrderStatus::Pending))
        .await
        .unwrap();
    assert_eq!(csv, b"id,total\n5,4200\n");
    let export = &backend.requests_to(&Method::GET, "/api/orders/export")[0];
    assert_eq!(export.header("authorization"), Some("Bearer jwt-abc"));
    assert_eq!(export.query.as_deref(), Some("status=PENDING"));

    client.logout().unwrap();
    assert!(!client.session().is_authenticated());
    assert!(client.session().admin_profile().is_none());
}
