//! Placeholder defaulting and text escaping for rendered fragments.
//!
//! Every feed-sourced value goes through these helpers on its way into HTML.

use std::borrow::Cow;

/// Shown for any missing value.
pub const PLACEHOLDER: &str = "--";

/// Shown for a missing session clock.
pub const CLOCK_PLACEHOLDER: &str = "--:--:--";

/// Escaped `value`, or `fallback` when it is absent or empty.
#[must_use]
pub fn text_or<'a>(value: Option<&'a str>, fallback: &'a str) -> Cow<'a, str> {
    match value {
        Some(value) if !value.is_empty() => escape(value),
        _ => Cow::Borrowed(fallback),
    }
}

/// Escaped `value`, or [`PLACEHOLDER`].
#[must_use]
pub fn text(value: Option<&str>) -> Cow<'_, str> {
    text_or(value, PLACEHOLDER)
}

/// Number as text, or [`PLACEHOLDER`].
#[must_use]
pub fn count(value: Option<u32>) -> Cow<'static, str> {
    value.map_or(Cow::Borrowed(PLACEHOLDER), |value| {
        Cow::Owned(value.to_string())
    })
}

/// Escape text for use inside element content or a quoted attribute.
#[must_use]
pub fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(|ch: char| matches!(ch, '&' | '<' | '>' | '"' | '\'')) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_empty_fall_back() {
        assert_eq!(text(None), "--");
        assert_eq!(text(Some("")), "--");
        assert_eq!(text_or(None, CLOCK_PLACEHOLDER), "--:--:--");
        assert_eq!(text(Some("1:31.447")), "1:31.447");
    }

    #[test]
    fn counts() {
        assert_eq!(count(Some(14)), "14");
        assert_eq!(count(None), "--");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<b>"Car 1" & 'Car 2'</b>"#),
            "&lt;b&gt;&quot;Car 1&quot; &amp; &#39;Car 2&#39;&lt;/b&gt;"
        );
        assert!(matches!(escape("plain"), Cow::Borrowed("plain")));
    }
}
