use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, Database, Statement};
use serde_json::{Value, json};

use server::{CredentialCipher, spawn_with_listener};

async fn spawn_app() -> String {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["alice".into(), "password".into()],
    ))
    .await
    .unwrap();

    let engine = engine::Engine::builder().database(db.clone()).build();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = spawn_with_listener(
        engine,
        db,
        None,
        CredentialCipher::new("test-secret"),
        listener,
    )
    .unwrap();
    format!("http://{addr}")
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

async fn create_space(base: &str, name: &str) -> String {
    let res = client()
        .post(format!("{base}/spaces"))
        .basic_auth("alice", Some("password"))
        .json(&json!({ "name": name, "pricePerHour": 1000.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let body: Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn requests_without_credentials_are_rejected() {
    let base = spawn_app().await;

    let res = client()
        .get(format!("{base}/bookings"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let res = client()
        .get(format!("{base}/bookings"))
        .basic_auth("alice", Some("wrong"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
}

#[tokio::test]
async fn booking_lifecycle_over_http() {
    let base = spawn_app().await;
    let space_id = create_space(&base, "Main Turf").await;

    let res = client()
        .post(format!("{base}/bookings"))
        .basic_auth("alice", Some("password"))
        .json(&json!({
            "space": space_id,
            "date": "2026-03-01",
            "slots": ["06:00-07:00", "07:00-08:00"],
            "customerName": "Ravi",
            "customerMobile": "9999999999",
            "totalAmount": 2000.0,
            "paidAmount": 500.0,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let booking: Value = res.json().await.unwrap();
    assert_eq!(booking["status"], "Booked");
    assert_eq!(booking["paymentMode"], "Cash");
    assert_eq!(booking["space"]["name"], "Main Turf");
    let id = booking["id"].as_str().unwrap().to_string();

    // Same slot again conflicts.
    let res = client()
        .post(format!("{base}/bookings"))
        .basic_auth("alice", Some("password"))
        .json(&json!({
            "space": space_id,
            "date": "2026-03-01",
            "slots": ["07:00-08:00"],
            "customerName": "Asha",
            "customerMobile": "8888888888",
            "totalAmount": 1000.0,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 409);

    let res = client()
        .post(format!("{base}/bookings/{id}/payment"))
        .basic_auth("alice", Some("password"))
        .json(&json!({ "amount": 300.0, "paymentMode": "UPI" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let settled: Value = res.json().await.unwrap();
    assert_eq!(settled["paidAmount"], 800.0);
    assert_eq!(settled["paymentMode"], "UPI");

    let res = client()
        .post(format!("{base}/bookings/{id}/cancel"))
        .basic_auth("alice", Some("password"))
        .json(&json!({ "refundAmount": 200.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let cancelled: Value = res.json().await.unwrap();
    assert_eq!(cancelled["status"], "Cancelled");
    assert_eq!(cancelled["refundAmount"], 200.0);
}

#[tokio::test]
async fn batch_booking_allocates_and_shares_a_group() {
    let base = spawn_app().await;
    let space_id = create_space(&base, "Main Turf").await;

    let res = client()
        .post(format!("{base}/bookings/batch"))
        .basic_auth("alice", Some("password"))
        .json(&json!({
            "items": [
                { "space": space_id, "date": "2026-03-01", "slots": ["06:00-07:00"], "amount": 100.0 },
                { "space": space_id, "date": "2026-03-01", "slots": ["07:00-08:00"], "amount": 300.0 },
            ],
            "customerName": "Ravi",
            "customerMobile": "9999999999",
            "discount": 40.0,
            "paidAmount": 200.0,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let created: Value = res.json().await.unwrap();
    let items = created.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["discount"], 10.0);
    assert_eq!(items[0]["paidAmount"], 50.0);
    assert_eq!(items[1]["discount"], 30.0);
    assert_eq!(items[1]["paidAmount"], 150.0);
    assert_eq!(items[0]["groupId"], items[1]["groupId"]);
}

#[tokio::test]
async fn split_payment_requires_a_breakdown() {
    let base = spawn_app().await;
    let space_id = create_space(&base, "Main Turf").await;

    let res = client()
        .post(format!("{base}/bookings"))
        .basic_auth("alice", Some("password"))
        .json(&json!({
            "space": space_id,
            "date": "2026-03-01",
            "slots": ["06:00-07:00"],
            "customerName": "Ravi",
            "customerMobile": "9999999999",
            "totalAmount": 500.0,
            "paymentMode": "Split",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let res = client()
        .post(format!("{base}/bookings"))
        .basic_auth("alice", Some("password"))
        .json(&json!({
            "space": space_id,
            "date": "2026-03-01",
            "slots": ["06:00-07:00"],
            "customerName": "Ravi",
            "customerMobile": "9999999999",
            "totalAmount": 500.0,
            "paidAmount": 500.0,
            "paymentMode": "Split",
            "paymentDetails": [
                { "method": "Cash", "amount": 300.0 },
                { "method": "UPI", "amount": 200.0 },
            ],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let booking: Value = res.json().await.unwrap();
    assert_eq!(booking["paymentMode"], "Split (Cash: 300, UPI: 200)");
}

#[tokio::test]
async fn stats_report_shape() {
    let base = spawn_app().await;
    let space_id = create_space(&base, "Main Turf").await;

    let res = client()
        .post(format!("{base}/bookings"))
        .basic_auth("alice", Some("password"))
        .json(&json!({
            "space": space_id,
            "date": "2026-03-01",
            "slots": ["06:00-07:00"],
            "customerName": "Ravi",
            "customerMobile": "9999999999",
            "totalAmount": 1000.0,
            "discount": 100.0,
            "paidAmount": 900.0,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);

    let res = client()
        .post(format!("{base}/expenses"))
        .basic_auth("alice", Some("password"))
        .json(&json!({
            "title": "Water",
            "amount": 200.0,
            "category": "Maintenance",
            "date": "2026-03-02",
            "paymentMode": "UPI",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);

    let res = client()
        .get(format!("{base}/reports/stats"))
        .basic_auth("alice", Some("password"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let stats: Value = res.json().await.unwrap();
    assert_eq!(stats["bookings"]["totalBookings"], 1);
    assert_eq!(stats["bookings"]["grossBookingAmount"], 1000.0);
    assert_eq!(stats["bookings"]["cashCollection"], 900.0);
    assert_eq!(stats["expenses"]["totalExpenses"], 200.0);
    assert_eq!(stats["financials"]["outstanding"], 100.0);
    assert_eq!(stats["financials"]["netBalance"], 700.0);
    assert_eq!(stats["rawData"]["bookings"].as_array().unwrap().len(), 1);
    assert_eq!(stats["rawData"]["expenses"].as_array().unwrap().len(), 1);
}
