use super::*;
use serde_json::json;
use std::collections::HashSet;

#[test]
fn host_action_names_are_unique() {
    let mut seen = HashSet::new();
    for kind in HostActionKind::ALL {
        assert!(seen.insert(kind.as_str()), "duplicate action {kind}");
    }
    assert_eq!(seen.len(), HostActionKind::ALL.len());
}

#[test]
fn rpc_action_names_are_unique() {
    let mut seen = HashSet::new();
    for action in RpcAction::ALL {
        assert!(seen.insert(action.as_str()), "duplicate rpc action {action}");
    }
}

#[test]
fn every_kind_round_trips_through_its_wire_name() {
    for kind in HostActionKind::ALL {
        assert_eq!(kind.as_str().parse::<HostActionKind>(), Ok(*kind));
    }
}

#[test]
fn unknown_names_are_rejected() {
    assert_eq!(
        "launchRockets".parse::<HostActionKind>(),
        Err(UnknownAction("launchRockets".to_string()))
    );
}

#[test]
fn decode_keeps_kind() {
    let action = HostAction::decode(
        HostActionKind::IncomingCall,
        Some(json!({"callerNumber": "555", "callerName": "Bob"})),
    )
    .expect("decode");
    assert_eq!(action.kind(), HostActionKind::IncomingCall);
    assert_eq!(
        action,
        HostAction::IncomingCall(IncomingCallPayload {
            caller_number: "555".to_string(),
            caller_name: Some("Bob".to_string()),
        })
    );
}

#[test]
fn missing_record_fields_default() {
    let action = HostAction::decode(HostActionKind::SetVisible, None).expect("decode");
    assert_eq!(action, HostAction::SetVisible(VisibilityPayload { visible: false }));

    let action = HostAction::decode(HostActionKind::LoadPhoneData, Some(json!({})))
        .expect("decode");
    assert_eq!(action, HostAction::LoadPhoneData(PhoneDataPayload::default()));
}

#[test]
fn theme_volume_and_toggles_accept_bare_values() {
    let wrapped = HostAction::decode(HostActionKind::SetTheme, Some(json!({"theme": "oled"})))
        .expect("wrapped");
    let bare = HostAction::decode(HostActionKind::SetTheme, Some(json!("oled"))).expect("bare");
    assert_eq!(wrapped, bare);

    let volume = HostAction::decode(HostActionKind::SetVolume, Some(json!(0))).expect("volume");
    assert_eq!(volume, HostAction::SetVolume(VolumePayload::Bare(0.0)));

    let toggle = HostAction::decode(
        HostActionKind::SetSoundEnabled,
        Some(json!({"enabled": false})),
    )
    .expect("toggle");
    match toggle {
        HostAction::SetSoundEnabled(payload) => assert!(!payload.into_enabled()),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn theme_without_value_fails_to_decode() {
    assert!(HostAction::decode(HostActionKind::SetTheme, None).is_err());
    let invalid = HostAction::decode(HostActionKind::SetVisible, Some(json!({"visible": "yes"})));
    assert!(invalid.is_err());
}

#[test]
fn unit_actions_ignore_payload() {
    let action =
        HostAction::decode(HostActionKind::CallEnded, Some(json!({"anything": 1})))
            .expect("decode");
    assert_eq!(action, HostAction::CallEnded);
}

#[test]
fn rpc_response_keeps_extra_fields() {
    let response: RpcResponse =
        serde_json::from_value(json!({"success": true, "newBalance": 250.5})).expect("parse");
    assert!(response.success);
    assert_eq!(response.field::<f64>("newBalance"), Some(250.5));
    assert_eq!(response.field::<f64>("missing"), None);
}

#[test]
fn rpc_response_without_success_is_a_failure() {
    let response: RpcResponse = serde_json::from_value(json!({"balance": 3})).expect("parse");
    let failure = response.into_result().expect_err("must fail");
    assert_eq!(failure.code, "UNKNOWN_ERROR");
}

#[test]
fn synthetic_failure_carries_code() {
    let response = RpcResponse::failure(ErrorCode::CallbackFailed);
    assert_eq!(
        serde_json::to_value(&response).expect("serialize"),
        json!({"success": false, "error": "CALLBACK_FAILED"})
    );
}

#[test]
fn message_rows_accept_numeric_flags_and_epoch_times() {
    let action = HostAction::decode(
        HostActionKind::LoadPhoneData,
        Some(json!({
            "contacts": [{"id": 1, "contact_name": "Bob", "contact_number": "555"}],
            "messages": [
                {"sender_number": "555", "receiver_number": "111", "message": "hi",
                 "is_read": 0, "created_at": 1_700_000_000_000i64},
                {"sender_number": "111", "receiver_number": "555", "message": "yo",
                 "is_read": 1, "created_at": "2023-11-14 22:13:21"},
                {"sender_number": "555", "receiver_number": "111", "message": "?",
                 "is_read": null, "created_at": null}
            ]
        })),
    )
    .expect("decode");

    let HostAction::LoadPhoneData(payload) = action else {
        panic!("unexpected action {action:?}");
    };
    assert_eq!(payload.contacts.map(|c| c.len()), Some(1));
    let messages = payload.messages.expect("messages");
    assert!(!messages[0].is_read);
    assert_eq!(messages[0].created_at_millis(), 1_700_000_000_000);
    assert!(messages[1].is_read);
    assert_eq!(messages[1].created_at_millis(), 1_700_000_001_000);
    assert!(!messages[2].is_read);
    assert_eq!(messages[2].created_at_millis(), 0);
}

#[test]
fn pushed_message_and_chirp_accept_integer_flags() {
    let action = HostAction::decode(
        HostActionKind::ReceiveMessage,
        Some(json!({"sender_number": "555", "receiver_number": "111", "message": "hi",
                    "is_read": 0, "created_at": 1_700_000_000_000i64})),
    )
    .expect("decode message");
    let HostAction::ReceiveMessage(message) = action else {
        panic!("unexpected action {action:?}");
    };
    assert!(!message.is_read);
    assert_eq!(message.created_at, "1700000000000");

    let action = HostAction::decode(
        HostActionKind::NewTweet,
        Some(json!({"id": 4, "content": "gm", "likes": 2, "isLiked": 1})),
    )
    .expect("decode chirp");
    let HostAction::NewTweet(chirp) = action else {
        panic!("unexpected action {action:?}");
    };
    assert!(chirp.is_liked);
}
