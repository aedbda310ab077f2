//! Decoding real server frames end to end: envelope, message, typed event.

use eventsub_events::payloads::{
    ChannelBanEvent, ChannelCheerEvent, ChannelFollowEvent, DropEntitlementGrantEvent,
    StreamOnlineEvent,
};
use eventsub_events::{
    ALL_SUBSCRIPTION_TYPES, Envelope, Event, MessageType, NotificationMessage, SubscriptionType,
    TypedEvent,
};
use serde_json::Value;

fn notification(subscription_type: &str, event: &str) -> String {
    format!(
        r#"{{
            "metadata": {{
                "message_id": "befa7b53-d79d-478f-86b9-120f112b044e",
                "message_type": "notification",
                "message_timestamp": "2023-07-19T10:11:12.464757833Z",
                "subscription_type": "{subscription_type}",
                "subscription_version": "1"
            }},
            "payload": {{
                "subscription": {{
                    "id": "f1c2a387-161a-49f9-a165-0f21d7a4e1c4",
                    "status": "enabled",
                    "type": "{subscription_type}",
                    "version": "1",
                    "cost": 1,
                    "condition": {{"broadcaster_user_id": "1337"}},
                    "transport": {{"method": "websocket", "session_id": "AQoQexAWVYKSTIu4ec_2VAxyuhAB"}},
                    "created_at": "2023-07-19T10:11:12.464757833Z"
                }},
                "event": {event}
            }}
        }}"#
    )
}

fn decode(frame: &str) -> (NotificationMessage, Option<Event>) {
    let env: Envelope<'_> = serde_json::from_str(frame).unwrap();
    assert_eq!(env.metadata.known_type(), Some(MessageType::Notification));
    let msg: NotificationMessage = serde_json::from_str(frame).unwrap();
    let kind: SubscriptionType = msg.subscription_type().parse().unwrap();
    let event = kind.decode_event(msg.raw_event()).unwrap();
    (msg, event)
}

#[test]
fn follow() {
    let frame = notification(
        "channel.follow",
        r#"{
            "user_id": "1234",
            "user_login": "cool_user",
            "user_name": "Cool_User",
            "broadcaster_user_id": "1337",
            "broadcaster_user_login": "cooler_user",
            "broadcaster_user_name": "Cooler_User",
            "followed_at": "2020-07-15T18:16:11.17106713Z"
        }"#,
    );
    let (_, event) = decode(&frame);
    let follow = ChannelFollowEvent::from_event(event.unwrap()).unwrap();
    assert_eq!(follow.user.user_login, "cool_user");
    assert_eq!(follow.broadcaster.broadcaster_user_id, "1337");
    assert_eq!(follow.followed_at.to_rfc3339(), "2020-07-15T18:16:11.171067130+00:00");
}

#[test]
fn anonymous_cheer_has_null_user() {
    let frame = notification(
        "channel.cheer",
        r#"{
            "is_anonymous": true,
            "user_id": null,
            "user_login": null,
            "user_name": null,
            "broadcaster_user_id": "1337",
            "broadcaster_user_login": "cooler_user",
            "broadcaster_user_name": "Cooler_User",
            "message": "pogchamp",
            "bits": 1000
        }"#,
    );
    let (_, event) = decode(&frame);
    let cheer = ChannelCheerEvent::from_event(event.unwrap()).unwrap();
    assert!(cheer.is_anonymous);
    assert!(cheer.user.user_id.is_none());
    assert_eq!(cheer.bits, 1000);
}

#[test]
fn timeout_ban_has_end() {
    let frame = notification(
        "channel.ban",
        r#"{
            "user_id": "1234",
            "user_login": "cool_user",
            "user_name": "Cool_User",
            "broadcaster_user_id": "1337",
            "broadcaster_user_login": "cooler_user",
            "broadcaster_user_name": "Cooler_User",
            "moderator_user_id": "1339",
            "moderator_user_login": "mod_user",
            "moderator_user_name": "Mod_User",
            "reason": "Offensive language",
            "banned_at": "2020-07-15T18:15:11.17106713Z",
            "ends_at": "2020-07-15T18:16:11.17106713Z",
            "is_permanent": false
        }"#,
    );
    let (_, event) = decode(&frame);
    let ban = ChannelBanEvent::from_event(event.unwrap()).unwrap();
    assert!(!ban.is_permanent);
    assert!(ban.ends_at.is_some());
    assert_eq!(ban.moderator.moderator_user_login, "mod_user");
}

#[test]
fn stream_online_type_field() {
    let frame = notification(
        "stream.online",
        r#"{
            "id": "9001",
            "broadcaster_user_id": "1337",
            "broadcaster_user_login": "cool_user",
            "broadcaster_user_name": "Cool_User",
            "type": "live",
            "started_at": "2020-10-11T10:11:12.123Z"
        }"#,
    );
    let (_, event) = decode(&frame);
    let online = StreamOnlineEvent::from_event(event.unwrap()).unwrap();
    assert_eq!(online.stream_type, "live");
}

#[test]
fn drop_entitlement_grant_is_an_array() {
    let frame = notification(
        "drop.entitlement.grant",
        r#"[
            {
                "id": "bf7c8577-e3e3-474a-9f7b-ca1fa6b2fb1d",
                "data": {
                    "organization_id": "9001",
                    "category_id": "9002",
                    "category_name": "Fortnite",
                    "campaign_id": "9003",
                    "user_id": "1234",
                    "user_name": "Cool_User",
                    "user_login": "cool_user",
                    "entitlement_id": "fb78259e-fb81-4d1b-8333-34a06ffc24c0",
                    "benefit_id": "74c52265-e214-48a6-91b9-23b6014e8041",
                    "created_at": "2019-01-28T04:17:53.325Z"
                }
            },
            {
                "id": "cc3d6d70-5e6d-4b87-96f6-0e42b7a06e0b",
                "data": {
                    "organization_id": "9001",
                    "category_id": "9002",
                    "category_name": "Fortnite",
                    "campaign_id": "9003",
                    "user_id": "5678",
                    "user_name": "Other_User",
                    "user_login": "other_user",
                    "entitlement_id": "a3f2e1d0-fb81-4d1b-8333-34a06ffc24c0",
                    "benefit_id": "74c52265-e214-48a6-91b9-23b6014e8041",
                    "created_at": "2019-01-28T04:17:54.325Z"
                }
            }
        ]"#,
    );
    let (_, event) = decode(&frame);
    let grants = DropEntitlementGrantEvent::from_event(event.unwrap()).unwrap();
    assert_eq!(grants.0.len(), 2);
    assert_eq!(grants.0[1].data.user.user_login, "other_user");
}

#[test]
fn raw_only_kind_decodes_to_nothing() {
    let frame = notification(
        "channel.chat.message",
        r#"{"message_id": "x", "message": {"text": "hi", "fragments": []}}"#,
    );
    let (msg, event) = decode(&frame);
    assert!(event.is_none());
    assert!(msg.raw_event().contains(r#""text": "hi""#));
}

#[test]
fn malformed_typed_event_is_a_decode_error() {
    let frame = notification("channel.follow", r#"{"user_id": 5}"#);
    let msg: NotificationMessage = serde_json::from_str(&frame).unwrap();
    assert!(
        SubscriptionType::ChannelFollow
            .decode_event(msg.raw_event())
            .is_err()
    );
}

/// Give every leaf of `value` a distinct non-default value of the same JSON
/// type. Nulls and empty arrays are left alone. `next` counts the leaves set.
fn populate(value: &mut Value, next: &mut u32) {
    match value {
        Value::String(s) => {
            *next += 1;
            *s = if chrono::DateTime::parse_from_rfc3339(s).is_ok() {
                format!("2023-07-19T10:11:{:02}.464757833Z", *next % 60)
            } else {
                format!("value-{next}")
            };
        }
        Value::Number(_) => {
            *next += 1;
            *value = Value::from(*next);
        }
        Value::Bool(b) => {
            *next += 1;
            *b = true;
        }
        Value::Array(items) => items.iter_mut().for_each(|item| populate(item, next)),
        Value::Object(fields) => fields.values_mut().for_each(|field| populate(field, next)),
        Value::Null => {}
    }
}

#[test]
fn populated_events_keep_every_field() {
    for kind in ALL_SUBSCRIPTION_TYPES.into_iter().filter(|k| k.has_typed_payload()) {
        let default = Event::default_for(kind).unwrap();
        let mut populated: Value = serde_json::from_str(&default.to_json().unwrap()).unwrap();
        let mut next = 0;
        populate(&mut populated, &mut next);
        if next == 0 {
            // Array payloads have no leaves by default; drop grants have their own fixture.
            continue;
        }

        let event = kind.decode_event(&populated.to_string()).unwrap().unwrap();
        assert_ne!(event, default, "{kind} decoded to its default");
        let back: Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(back, populated, "{kind} lost or renamed a field");
    }
}
