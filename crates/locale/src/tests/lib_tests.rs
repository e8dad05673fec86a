use super::*;
use crate::storage::MemoryStorage;
use serde_json::json;

fn i18n_with(storage: Arc<MemoryStorage>) -> I18n {
    I18n::new(storage)
}

#[test]
fn parses_codes_and_tags() {
    assert_eq!(Locale::from_code("de-DE"), Some(Locale::De));
    assert_eq!(Locale::from_code("pt_BR.UTF-8"), Some(Locale::Pt));
    assert_eq!(Locale::from_code("JA"), Some(Locale::Ja));
    assert_eq!(Locale::from_code("it"), None);
    assert_eq!(Locale::from_code_or_default("it"), Locale::En);
    assert!("xx".parse::<Locale>().is_err());
}

#[test]
fn stored_preference_beats_system_language() {
    assert_eq!(default_locale(Some("fr"), Some("de_DE.UTF-8")), Locale::Fr);
    assert_eq!(default_locale(Some("klingon"), Some("de_DE.UTF-8")), Locale::De);
    assert_eq!(default_locale(None, Some("zz")), Locale::En);
    assert_eq!(default_locale(None, None), Locale::En);
}

#[test]
fn startup_locale_comes_from_storage() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set_item(LOCALE_KEY, "ja").expect("seed");
    let i18n = i18n_with(storage);
    assert_eq!(i18n.current_locale(), Locale::Ja);
}

#[test]
fn set_locale_persists_supported_codes_only() {
    let storage = Arc::new(MemoryStorage::new());
    let i18n = i18n_with(storage.clone());

    assert!(i18n.set_locale("es"));
    assert_eq!(i18n.current_locale(), Locale::Es);
    assert_eq!(storage.get_item(LOCALE_KEY).as_deref(), Some("es"));

    assert!(!i18n.set_locale("tlh"));
    assert_eq!(i18n.current_locale(), Locale::Es);
}

#[test]
fn settings_locale_is_applied() {
    let i18n = i18n_with(Arc::new(MemoryStorage::new()));
    assert!(i18n.load_locale_from_settings(Some("pt")));
    assert_eq!(i18n.current_locale(), Locale::Pt);
    assert!(!i18n.load_locale_from_settings(None));
}

#[test]
fn translation_falls_back_to_english_then_key() {
    let i18n = i18n_with(Arc::new(MemoryStorage::new()));
    i18n.insert_messages(
        Locale::En,
        &json!({
            "contact_sharing": {"contact_added": "{name} added", "share_error": "Share Failed"}
        }),
    );
    i18n.insert_messages(Locale::De, &json!({"contact_sharing": {"share_error": "Fehler"}}));
    i18n.set_locale("de");

    assert_eq!(i18n.t("contact_sharing.share_error"), "Fehler");
    assert_eq!(
        i18n.t_with("contact_sharing.contact_added", &[("name", "Ana")]),
        "Ana added"
    );
    assert_eq!(i18n.t("missing.key"), "missing.key");
    assert_eq!(i18n.try_t("missing.key", &[]), None);
}

#[tokio::test]
async fn loads_catalog_files_on_demand() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("fr.json"),
        r#"{"bank": {"failed": "Échec"}}"#,
    )
    .expect("write catalog");

    let i18n = i18n_with(Arc::new(MemoryStorage::new())).with_catalog_dir(dir.path());
    assert!(i18n.load_locale_messages(Locale::Fr).await);
    assert!(i18n.is_loaded(Locale::Fr));
    assert!(!i18n.load_locale_messages(Locale::Ja).await);

    i18n.set_locale("fr");
    assert_eq!(i18n.t("bank.failed"), "Échec");
}

#[tokio::test]
async fn loading_without_catalog_dir_fails_softly() {
    let i18n = i18n_with(Arc::new(MemoryStorage::new()));
    assert!(!i18n.load_locale_messages(Locale::De).await);
}
