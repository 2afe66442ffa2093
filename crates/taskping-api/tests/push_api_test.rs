//! Integration tests for the push subscription registry and send fan-out.

use taskping_api::{app, AppState};

async fn spawn_server(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app(state);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn subscription_count(client: &reqwest::Client, base_url: &str) -> u64 {
    let body: serde_json::Value = client
        .get(format!("{}/api/push/subscribe", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["count"].as_u64().unwrap()
}

#[tokio::test]
async fn test_empty_endpoint_is_rejected_and_not_stored() {
    let base_url = spawn_server(AppState::in_memory()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/push/subscribe", base_url))
        .json(&serde_json::json!({ "endpoint": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);

    // A body without an endpoint at all is rejected the same way
    let response = client
        .post(format!("{}/api/push/subscribe", base_url))
        .json(&serde_json::json!({ "keys": {"p256dh": "x", "auth": "y"} }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    assert_eq!(subscription_count(&client, &base_url).await, 0);
}

#[tokio::test]
async fn test_subscribe_then_delete_round_trips_the_count() {
    let base_url = spawn_server(AppState::in_memory()).await;
    let client = reqwest::Client::new();
    let subscription = serde_json::json!({
        "endpoint": "https://push.example/device-1",
        "keys": {"p256dh": "key", "auth": "secret"}
    });

    let response = client
        .post(format!("{}/api/push/subscribe", base_url))
        .json(&subscription)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(subscription_count(&client, &base_url).await, 1);

    // Registering the identical object again is idempotent
    client
        .post(format!("{}/api/push/subscribe", base_url))
        .json(&subscription)
        .send()
        .await
        .unwrap();
    assert_eq!(subscription_count(&client, &base_url).await, 1);

    // Deleting the identical object returns to the prior count
    let response = client
        .delete(format!("{}/api/push/subscribe", base_url))
        .json(&subscription)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(subscription_count(&client, &base_url).await, 0);
}

#[tokio::test]
async fn test_listing_reports_endpoints() {
    let base_url = spawn_server(AppState::in_memory()).await;
    let client = reqwest::Client::new();

    for n in 1..=2 {
        client
            .post(format!("{}/api/push/subscribe", base_url))
            .json(&serde_json::json!({ "endpoint": format!("https://push.example/{n}") }))
            .send()
            .await
            .unwrap();
    }

    let body: serde_json::Value = client
        .get(format!("{}/api/push/subscribe", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["count"], 2);
    let mut endpoints: Vec<&str> = body["subscriptions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["endpoint"].as_str().unwrap())
        .collect();
    endpoints.sort();
    assert_eq!(
        endpoints,
        vec!["https://push.example/1", "https://push.example/2"]
    );
}

#[tokio::test]
async fn test_send_requires_title_and_body() {
    let base_url = spawn_server(AppState::in_memory()).await;
    let client = reqwest::Client::new();

    for body in [
        serde_json::json!({ "body": "no title" }),
        serde_json::json!({ "title": "no body" }),
        serde_json::json!({ "title": "", "body": "" }),
    ] {
        let response = client
            .post(format!("{}/api/push/send", base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400, "payload: {body}");
        let ack: serde_json::Value = response.json().await.unwrap();
        assert_eq!(ack["success"], false);
    }
}

#[tokio::test]
async fn test_send_fans_out_to_registered_subscriptions() {
    let base_url = spawn_server(AppState::in_memory()).await;
    let client = reqwest::Client::new();

    for n in 1..=3 {
        client
            .post(format!("{}/api/push/subscribe", base_url))
            .json(&serde_json::json!({ "endpoint": format!("https://push.example/{n}") }))
            .send()
            .await
            .unwrap();
    }

    let response = client
        .post(format!("{}/api/push/send", base_url))
        .json(&serde_json::json!({
            "title": "Task Manager",
            "body": "You have new tasks",
            "tag": "broadcast"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["stats"]["successful"], 3);
    assert_eq!(body["stats"]["failed"], 0);
    assert_eq!(body["stats"]["total"], 3);
    assert_eq!(body["message"], "Push notification sent to 3 device(s)");
}

#[tokio::test]
async fn test_send_with_no_subscriptions_reports_zero_stats() {
    let base_url = spawn_server(AppState::in_memory()).await;
    let client = reqwest::Client::new();

    let body: serde_json::Value = client
        .post(format!("{}/api/push/send", base_url))
        .json(&serde_json::json!({ "title": "T", "body": "B" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["stats"]["total"], 0);
    assert_eq!(body["stats"]["successful"], 0);
}
