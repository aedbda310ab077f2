//! Frame builders and client setup shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use eventsub_client::EventSubClient;
use eventsub_settings::{ClientSettings, DispatchMode};
use serde_json::json;

pub const TIMEOUT: Duration = Duration::from_secs(5);
pub const PRIMARY: &str = "mem://primary";
pub const SECOND: &str = "mem://second";

const TIMESTAMP: &str = "2023-07-19T10:11:12.464757833Z";

/// Settings with inline dispatch, so handlers finish before the next frame.
pub fn settings(address: &str) -> ClientSettings {
    let mut settings = ClientSettings::with_address(address);
    settings.dispatch.mode = DispatchMode::Inline;
    settings
}

fn metadata(message_type: &str) -> serde_json::Value {
    json!({
        "message_id": format!("{message_type}-id"),
        "message_type": message_type,
        "message_timestamp": TIMESTAMP,
    })
}

pub fn welcome(session_id: &str, keepalive_seconds: Option<u64>) -> String {
    json!({
        "metadata": metadata("session_welcome"),
        "payload": {
            "session": {
                "id": session_id,
                "status": "connected",
                "connected_at": TIMESTAMP,
                "keepalive_timeout_seconds": keepalive_seconds,
                "reconnect_url": null,
            }
        }
    })
    .to_string()
}

pub fn keepalive() -> String {
    json!({ "metadata": metadata("session_keepalive"), "payload": {} }).to_string()
}

pub fn reconnect(url: &str) -> String {
    json!({
        "metadata": metadata("session_reconnect"),
        "payload": {
            "session": {
                "id": "AQoQexAWVYKSTIu4ec_2VAxyuhAB",
                "status": "reconnecting",
                "keepalive_timeout_seconds": null,
                "reconnect_url": url,
                "connected_at": TIMESTAMP,
            }
        }
    })
    .to_string()
}

pub fn revocation(subscription_type: &str, status: &str) -> String {
    json!({
        "metadata": {
            "message_id": "revocation-id",
            "message_type": "revocation",
            "message_timestamp": TIMESTAMP,
            "subscription_type": subscription_type,
            "subscription_version": "1",
        },
        "payload": {
            "subscription": {
                "id": "f1c2a387-161a-49f9-a165-0f21d7a4e1c4",
                "status": status,
                "type": subscription_type,
                "version": "1",
                "cost": 0,
                "condition": { "broadcaster_user_id": "1337" },
                "transport": { "method": "websocket", "session_id": "AQoQexAWVYKSTIu4ec_2VAxyuhAB" },
                "created_at": TIMESTAMP,
            }
        }
    })
    .to_string()
}

/// A notification whose `event` is `event` byte for byte.
pub fn notification(subscription_type: &str, event: &str) -> String {
    format!(
        r#"{{"metadata":{{"message_id":"notification-id","message_type":"notification","message_timestamp":"{TIMESTAMP}","subscription_type":"{subscription_type}","subscription_version":"1"}},"payload":{{"subscription":{{"id":"f1c2a387-161a-49f9-a165-0f21d7a4e1c4","status":"enabled","type":"{subscription_type}","version":"1","cost":0,"condition":{{"broadcaster_user_id":"1337"}},"transport":{{"method":"websocket","session_id":"AQoQexAWVYKSTIu4ec_2VAxyuhAB"}},"created_at":"{TIMESTAMP}"}},"event":{event}}}}}"#
    )
}

pub fn message_of_type(message_type: &str) -> String {
    json!({ "metadata": metadata(message_type), "payload": {} }).to_string()
}

pub const FOLLOW_EVENT: &str = r#"{"user_id":"1234","user_login":"cool_user","user_name":"Cool_User","broadcaster_user_id":"1337","broadcaster_user_login":"cooler_user","broadcaster_user_name":"Cooler_User","followed_at":"2020-07-15T18:16:11.17106713Z"}"#;

/// Poll `condition` until it holds or [`TIMEOUT`] passes.
pub async fn wait_until(what: &str, condition: impl Fn() -> bool) {
    let polled = tokio::time::timeout(TIMEOUT, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(polled.is_ok(), "timed out waiting for {what}");
}

/// Register a welcome handler that ignores its message.
pub fn ignore_welcome(client: &EventSubClient) {
    let _ = client.handlers().on_welcome(|_| {});
}

/// A latch a handler can block on from its worker thread.
#[derive(Clone, Default)]
pub struct Gate(Arc<AtomicBool>);

impl Gate {
    pub fn open(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Block the calling thread until opened, or until [`TIMEOUT`] passes.
    pub fn wait(&self) {
        let started = Instant::now();
        while !self.0.load(Ordering::SeqCst) && started.elapsed() < TIMEOUT {
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}
