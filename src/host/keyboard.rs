// src/host/keyboard.rs

//! Keyboard layout as reported by the locale environment.

/// Source of the active keyboard layout name, e.g. `en_US`.
pub trait KeyboardLayout: Send + Sync {
    fn layout(&self) -> String;

    fn is_english(&self) -> bool {
        self.layout().eq_ignore_ascii_case("en_US")
    }

    fn is_persian(&self) -> bool {
        self.layout().eq_ignore_ascii_case("fa_IR")
    }
}

/// Derives the layout from `LC_ALL`, `LC_CTYPE` or `LANG`, first non-empty wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleKeyboard;

impl KeyboardLayout for LocaleKeyboard {
    fn layout(&self) -> String {
        ["LC_ALL", "LC_CTYPE", "LANG"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|v| !v.trim().is_empty())
            .map(|v| locale_name(&v))
            .unwrap_or_default()
    }
}

/// A fixed layout, for callers that already know it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedKeyboard(pub String);

impl KeyboardLayout for FixedKeyboard {
    fn layout(&self) -> String {
        locale_name(&self.0)
    }
}

/// Strip codeset and modifier: `fa_IR.UTF-8@latin` -> `fa_IR`.
pub fn locale_name(raw: &str) -> String {
    raw.trim()
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .to_string()
}
