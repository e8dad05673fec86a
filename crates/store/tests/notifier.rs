use std::sync::Arc;

use locale::{
    currency::CurrencyError,
    storage::{LocalStorage, MemoryStorage, HAPTIC_ENABLED_KEY},
    I18n, Locale,
};
use serde_json::json;
use shared::domain::NotificationKind;
use store::{
    effects::{EffectSink, HapticPattern, Haptics, PhoneEffect},
    notify::Notifier,
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

struct Harness {
    notifier: Notifier,
    storage: Arc<MemoryStorage>,
    i18n: Arc<I18n>,
    effects: UnboundedReceiver<PhoneEffect>,
}

fn harness() -> Harness {
    let (tx, effects) = unbounded_channel();
    let sink: Arc<dyn EffectSink> = Arc::new(tx);
    let storage = Arc::new(MemoryStorage::new());
    let i18n = Arc::new(I18n::new(storage.clone()));
    let notifier = Notifier::new(sink.clone(), i18n.clone())
        .with_haptics(Haptics::new(storage.clone(), sink));
    Harness {
        notifier,
        storage,
        i18n,
        effects,
    }
}

fn drain(rx: &mut UnboundedReceiver<PhoneEffect>) -> Vec<PhoneEffect> {
    let mut out = Vec::new();
    while let Ok(effect) = rx.try_recv() {
        out.push(effect);
    }
    out
}

#[test]
fn english_fallbacks_without_catalog() {
    let h = harness();
    let toast = h.notifier.share_declined("Ana");
    assert_eq!(toast.kind, NotificationKind::Warning);
    assert_eq!(toast.title, "Request Declined");
    assert_eq!(toast.message, "Ana declined your contact request");
    assert_eq!(toast.duration_ms, 4000);
    assert_eq!(toast.position, "top-right");

    let toast = h.notifier.amount_exceeds_maximum("$10.00");
    assert_eq!(toast.title, "Amount Too Large");
    assert_eq!(toast.message, "Amount exceeds maximum limit of $10.00");
}

#[test]
fn catalog_text_wins_when_present() {
    let h = harness();
    h.i18n.insert_messages(
        Locale::En,
        &json!({"contact_sharing": {
            "broadcast_contact_added": "{name} saved your number",
            "contact_added_title": "Saved"
        }}),
    );
    let toast = h.notifier.broadcast_contact_added("Bo");
    assert_eq!(toast.title, "Saved");
    assert_eq!(toast.message, "Bo saved your number");
}

#[test]
fn share_error_translates_known_codes_only() {
    let h = harness();
    h.i18n.insert_messages(
        Locale::En,
        &json!({"contact_sharing": {"errors": {"PLAYER_OFFLINE": "They went offline"}}}),
    );
    assert_eq!(
        h.notifier.share_error(Some("PLAYER_OFFLINE")).message,
        "They went offline"
    );
    assert_eq!(h.notifier.share_error(Some("weird")).message, "weird");
    assert_eq!(h.notifier.share_error(None).message, "Failed to share contact");
}

#[test]
fn currency_error_uses_error_text_as_fallback() {
    let h = harness();
    let toast = h.notifier.currency_error(&CurrencyError::NegativeAmount);
    assert_eq!(toast.kind, NotificationKind::Error);
    assert_eq!(toast.title, "Currency Error");
    assert_eq!(toast.message, "Amount cannot be negative");
}

#[test]
fn toasts_are_emitted_with_matching_haptics() {
    let mut h = harness();
    h.notifier.success("done", None);
    let effects = drain(&mut h.effects);
    assert_eq!(effects.len(), 2);
    assert_eq!(effects[0], PhoneEffect::Haptic(HapticPattern::Success));
    assert!(matches!(&effects[1], PhoneEffect::Toast(t) if t.message == "done"));
}

#[test]
fn disabled_haptics_are_suppressed() {
    let mut h = harness();
    h.storage
        .set_item(HAPTIC_ENABLED_KEY, "false")
        .expect("store flag");
    h.notifier.error("boom", None);
    let effects = drain(&mut h.effects);
    assert_eq!(effects.len(), 1);
    assert!(matches!(effects[0], PhoneEffect::Toast(_)));
}

#[test]
fn haptic_patterns_match_their_pulses() {
    assert_eq!(HapticPattern::Error.pulses(), &[30, 100, 30, 100, 30]);
    assert_eq!(HapticPattern::Selection.pulses(), &[5]);
}
