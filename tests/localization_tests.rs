//! # Localization Tests
//!
//! Every message key used by the bot must resolve in every supported
//! language, and unknown languages fall back to Russian.

use cell_finder::localization::{
    create_localization_manager, detect_language, t_args_lang, t_lang, DEFAULT_LANGUAGE,
    SUPPORTED_LANGUAGES,
};

const MESSAGE_KEYS: &[&str] = &[
    "menu-check",
    "menu-setmax",
    "menu-showmax",
    "menu-help",
    "welcome",
    "help",
    "prompt-cell",
    "prompt-max",
    "max-updated",
    "max-out-of-range",
    "max-not-a-number",
    "show-max",
    "cell-not-a-number",
    "cell-out-of-range",
    "no-similar",
    "similar-header",
    "rotation-notice",
    "use-menu",
    "cancelled",
    "nothing-to-cancel",
    "reset-done",
];

#[test]
fn test_all_keys_present_in_every_language() {
    let manager = create_localization_manager().expect("Failed to create localization manager");

    for lang in SUPPORTED_LANGUAGES {
        assert!(manager.is_language_supported(lang));
        for key in MESSAGE_KEYS {
            let message = manager.get_message_in_language(key, lang, None);
            assert!(!message.is_empty(), "{} is empty in {}", key, lang);
            assert!(
                !message.starts_with("Missing"),
                "{} is missing in {}: {}",
                key,
                lang,
                message
            );
        }
    }
}

#[test]
fn test_missing_key_is_reported() {
    let manager = create_localization_manager().expect("Failed to create localization manager");
    assert_eq!(
        manager.get_message_in_language("no-such-key", "en", None),
        "Missing translation: no-such-key"
    );
}

#[test]
fn test_detect_language() {
    let manager = create_localization_manager().expect("Failed to create localization manager");

    assert_eq!(detect_language(&manager, Some("en")), "en");
    assert_eq!(detect_language(&manager, Some("en-US")), "en");
    assert_eq!(detect_language(&manager, Some("RU")), "ru");
    assert_eq!(detect_language(&manager, Some("de")), DEFAULT_LANGUAGE);
    assert_eq!(detect_language(&manager, None), DEFAULT_LANGUAGE);
}

#[test]
fn test_unsupported_language_falls_back_to_russian() {
    let manager = create_localization_manager().expect("Failed to create localization manager");

    assert_eq!(
        t_lang(&manager, "use-menu", Some("fr")),
        t_lang(&manager, "use-menu", Some("ru"))
    );
    assert_eq!(t_lang(&manager, "use-menu", Some("en")), "Please use the menu buttons 👇");
}

#[test]
fn test_arguments_are_substituted_without_isolation_marks() {
    let manager = create_localization_manager().expect("Failed to create localization manager");

    let message = t_args_lang(&manager, "cell-out-of-range", &[("max", "500")], Some("en"));
    assert_eq!(message, "❓ The number must be between 1 and 500.");

    let args = [("min", "10"), ("max", "2000")];
    let message = t_args_lang(&manager, "max-out-of-range", &args, Some("ru"));
    assert!(message.contains("10"));
    assert!(message.contains("2000"));
    assert!(!message.contains('\u{2068}'));
}
