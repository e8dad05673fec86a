use super::*;
use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::json;
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct HostState {
    received: Arc<Mutex<Vec<Value>>>,
}

async fn spawn_host() -> (String, HostState) {
    let state = HostState::default();
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");

    let recorded = state.clone();
    let app = Router::new()
        .route(
            "/getContacts",
            post(move |Json(body): Json<Value>| {
                let recorded = recorded.clone();
                async move {
                    recorded.received.lock().await.push(body);
                    Json(json!({
                        "success": true,
                        "contacts": [{"id": 1, "contact_name": "Ana", "contact_number": "555"}]
                    }))
                }
            }),
        )
        .route(
            "/transferMoney",
            post(|| async { Json(json!({"success": false, "error": "INSUFFICIENT_FUNDS"})) }),
        )
        .route(
            "/broken",
            post(|| async { (StatusCode::OK, "this is not json") }),
        )
        .route(
            "/slow",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"success": true}))
            }),
        );

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{addr}/"), state)
}

fn bridge_for(base_url: String, timeout: Option<Duration>) -> NuiBridge {
    NuiBridge::new(BridgeConfig {
        resource_name: None,
        base_url: Some(base_url),
        timeout,
    })
    .expect("bridge")
}

#[test]
fn resource_name_falls_back_for_local_development() {
    assert_eq!(resolve_resource_name(None), DEFAULT_RESOURCE_NAME);
    assert_eq!(resolve_resource_name(Some("localhost")), DEFAULT_RESOURCE_NAME);
    assert_eq!(resolve_resource_name(Some("  ")), DEFAULT_RESOURCE_NAME);
    assert_eq!(resolve_resource_name(Some("phone")), "phone");
}

#[test]
fn endpoint_is_prefix_plus_action() {
    let bridge = NuiBridge::new(BridgeConfig {
        resource_name: Some("phone".to_string()),
        ..BridgeConfig::default()
    })
    .expect("bridge");
    assert_eq!(
        bridge.endpoint("getSettings").expect("endpoint").as_str(),
        "https://phone/getSettings"
    );
    assert_eq!(
        bridge.endpoint("garage:getVehicles").expect("endpoint").as_str(),
        "https://phone/garage:getVehicles"
    );
    assert!(matches!(
        bridge.endpoint(""),
        Err(BridgeError::InvalidAction(_))
    ));
    assert!(matches!(
        bridge.endpoint("../admin"),
        Err(BridgeError::InvalidAction(_))
    ));
}

#[tokio::test]
async fn successful_call_returns_host_json() {
    let (base, host) = spawn_host().await;
    let bridge = bridge_for(base, None);

    let response = bridge
        .call_action(RpcAction::GetContacts, json!({"page": 1}))
        .await;

    assert!(response.success);
    assert!(response.fields.contains_key("contacts"));
    assert_eq!(host.received.lock().await.as_slice(), &[json!({"page": 1})]);
}

#[tokio::test]
async fn host_refusal_is_passed_through() {
    let (base, _host) = spawn_host().await;
    let response = bridge_for(base, None)
        .call("transferMoney", json!({"amount": 10}))
        .await;
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("INSUFFICIENT_FUNDS"));
}

#[tokio::test]
async fn unparseable_body_becomes_synthetic_failure() {
    let (base, _host) = spawn_host().await;
    let response = bridge_for(base, None).call("broken", json!({})).await;
    assert_eq!(response, RpcResponse::failure(ErrorCode::CallbackFailed));
}

#[tokio::test]
async fn unknown_action_fails_at_transport() {
    let (base, _host) = spawn_host().await;
    let response = bridge_for(base, None).call("noSuchAction", json!({})).await;
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("CALLBACK_FAILED"));
}

#[tokio::test]
async fn unreachable_host_resolves_with_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let response = bridge_for(format!("http://{addr}/"), None)
        .call("getContacts", json!({}))
        .await;
    assert!(!response.success);
    assert!(!response.error.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn configured_timeout_maps_to_timeout_code() {
    let (base, _host) = spawn_host().await;
    let response = bridge_for(base, Some(Duration::from_millis(100)))
        .call("slow", json!({}))
        .await;
    assert_eq!(response, RpcResponse::failure(ErrorCode::CallbackTimeout));
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let (base, host) = spawn_host().await;
    let bridge = bridge_for(base, None);

    let (first, second, broken) = futures::join!(
        bridge.call("getContacts", json!({"n": 1})),
        bridge.call("getContacts", json!({"n": 2})),
        bridge.call("broken", json!({})),
    );

    assert!(first.success);
    assert!(second.success);
    assert!(!broken.success);
    assert_eq!(host.received.lock().await.len(), 2);
}

#[tokio::test]
async fn offline_host_always_fails() {
    let response = OfflineHost.call_action(RpcAction::GetSettings, json!({})).await;
    assert_eq!(response.error.as_deref(), Some("CALLBACK_FAILED"));
}
