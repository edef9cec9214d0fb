//! End-to-end test: a real bound server, driven over HTTP with reqwest.
//!
//! Storage is in-memory, so no external infrastructure is needed.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use shop_orders::domain::ports::OrderRepository;
use shop_orders::infrastructure::memory_repo::InMemoryOrderRepository;
use shop_orders::{build_server, OrderService};

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind failed")
        .local_addr()
        .expect("addr failed")
        .port()
}

/// Wait until `url` answers at all, retrying every `interval` for up to
/// `timeout` total. Panics if the service never comes up.
async fn wait_for_http(url: &str, timeout: Duration, interval: Duration) {
    let client = Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .expect("client");
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if tokio::time::Instant::now() > deadline {
            panic!("order service did not become ready within {:?}", timeout);
        }
        if client.get(url).send().await.is_ok() {
            return;
        }
        tokio::time::sleep(interval).await;
    }
}

#[actix_web::test]
async fn seed_order_lifecycle_over_http() {
    let port = free_port();
    let repo: Arc<dyn OrderRepository> = Arc::new(InMemoryOrderRepository::default());
    let server =
        build_server(OrderService::new(repo), "127.0.0.1", port).expect("bind order service");
    let handle = server.handle();
    actix_web::rt::spawn(server);

    let app_url = format!("http://127.0.0.1:{}", port);
    wait_for_http(
        &format!("{}/orders", app_url),
        Duration::from_secs(10),
        Duration::from_millis(200),
    )
    .await;

    let http = Client::new();

    // The second seed order, as submitted by a client.
    let create_resp = http
        .post(format!("{}/orders", app_url))
        .json(&json!({
            "userId": "a2bcb7b3-4c36-4073-9ab8-9d8f4a57301b",
            "client": {
                "fullName": "Jane Doe",
                "email": "jane.doe@example.com",
                "phone": "987654321",
                "address": {
                    "street": "Broadway",
                    "number": "456",
                    "city": "Citytown",
                    "province": "Stateland",
                    "country": "Countryland",
                    "cp": "54321"
                }
            },
            "orderLineList": [
                {
                    "quantity": 3,
                    "productId": "57b77805-c1ce-490f-a96f-ec15505d5fae",
                    "productPrice": "29.99"
                }
            ]
        }))
        .send()
        .await
        .expect("Failed to POST /orders");

    assert_eq!(create_resp.status(), 201, "Expected 201 Created");
    let created: Value = create_resp.json().await.expect("order body");
    assert_eq!(created["orderLineList"][0]["total"], "89.97");
    let order_id = created["id"].as_str().expect("id").to_string();

    let fetched: Value = http
        .get(format!("{}/orders/{}", app_url, order_id))
        .send()
        .await
        .expect("Failed to GET order")
        .json()
        .await
        .expect("order body");
    assert_eq!(fetched, created);

    let openapi = http
        .get(format!("{}/api-docs/openapi.json", app_url))
        .send()
        .await
        .expect("Failed to GET openapi document");
    assert_eq!(openapi.status(), 200);

    let delete_resp = http
        .delete(format!("{}/orders/{}", app_url, order_id))
        .send()
        .await
        .expect("Failed to DELETE order");
    assert_eq!(delete_resp.status(), 204);

    let missing = http
        .get(format!("{}/orders/{}", app_url, order_id))
        .send()
        .await
        .expect("Failed to GET order");
    assert_eq!(missing.status(), 404);

    handle.stop(true).await;
}
