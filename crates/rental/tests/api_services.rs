//! Service endpoints that no page drives directly.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rental::models::{BookingStatus, CategoryInput, DamageInput};
use rental::{ApiClient, MemoryStore, SessionStore as _};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::with_http_client(
        reqwest::Client::new(),
        &server.uri(),
        Arc::new(MemoryStore::with_token("staff-token")),
    )
}

#[tokio::test]
async fn test_category_lifecycle() {
    let server = MockServer::start().await;
    let input = CategoryInput {
        name: "Vans".to_string(),
        description: "Room for eight".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/api/categories"))
        .and(header("authorization", "Bearer staff-token"))
        .and(body_json(json!({ "name": "Vans", "description": "Room for eight" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4, "name": "Vans", "description": "Room for eight"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/categories/4"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/categories/4"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let categories = client.categories();
    categories.create(&input).await.unwrap();
    let category = categories.get(4).await.unwrap();
    assert_eq!(category.name, "Vans");
    assert_eq!(category.description.as_deref(), Some("Room for eight"));
    categories.update(4, &input).await.unwrap();
    categories.delete(4).await.unwrap();
}

#[tokio::test]
async fn test_category_refusal_keeps_backend_text() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/categories/1"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Category has vehicles"))
        .mount(&server)
        .await;

    let err = client_for(&server).categories().delete(1).await.unwrap_err();
    assert_eq!(err.user_message("fallback"), "Category has vehicles");
}

#[tokio::test]
async fn test_damage_reports() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/damages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "bookingId": 7, "description": "Scratched door", "repairCost": 120.0,
              "isCustomerResponsible": true, "reportDate": "2024-06-01T09:30:00" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/damages/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "bookingId": 7, "description": "Scratched door", "repairCost": 120.0
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/damages/1"))
        .and(body_json(json!({
            "bookingId": 7,
            "description": "Scratched door and mirror",
            "repairCost": 180.0,
            "isCustomerResponsible": false,
            "imageUrl": ""
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/damages/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let damages = client.damages();

    let reports = damages.list().await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].booking_id, Some(7));
    assert!(reports[0].report_date.is_some());

    let report = damages.get(1).await.unwrap();
    assert!((report.repair_cost - 120.0).abs() < f64::EPSILON);

    let update = DamageInput {
        booking_id: 7,
        description: "Scratched door and mirror".to_string(),
        repair_cost: 180.0,
        is_customer_responsible: false,
        image_url: String::new(),
    };
    damages.update(1, &update).await.unwrap();
    damages.delete(1).await.unwrap();
}

#[tokio::test]
async fn test_pending_bookings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bookings/pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 9, "vehicleId": 3, "pickupDate": "2024-06-12T10:00:00",
              "returnDate": "2024-06-15T10:00:00", "status": "Requested", "totalPrice": 135.0 }
        ])))
        .mount(&server)
        .await;

    let pending = client_for(&server).bookings().pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].status, BookingStatus::Requested);
    assert_eq!(pending[0].vehicle_title(), "Vehicle #3");
}

#[tokio::test]
async fn test_own_reviews() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reviews/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 5, "vehicleId": 3, "rating": 4, "comment": "Smooth ride" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/reviews/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let reviews = client.reviews().mine().await.unwrap();
    assert_eq!(reviews[0].rating, 4);
    assert_eq!(reviews[0].comment.as_deref(), Some("Smooth ride"));
    client.reviews().delete(5).await.unwrap();
}

#[tokio::test]
async fn test_rejected_token_is_cleared() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reviews/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::with_token("stale"));
    let client = ApiClient::with_http_client(reqwest::Client::new(), &server.uri(), store.clone());
    let err = client.reviews().mine().await.unwrap_err();
    assert!(err.is_unauthorized());

    assert_eq!(store.load_token().unwrap(), None);
}
