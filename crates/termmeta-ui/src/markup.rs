//! Output escaping for admin markup
//!
//! Every user-controlled string goes through one of these before it is
//! emitted. Attribute values escape quotes as well; text content only needs
//! the markup-significant characters.

use quick_xml::escape::{escape, partial_escape};
use std::borrow::Cow;

/// Escape for use inside a double- or single-quoted attribute value
#[must_use]
pub fn esc_attr(raw: &str) -> Cow<'_, str> {
    escape(raw)
}

/// Escape for use as element text content
#[must_use]
pub fn esc_html(raw: &str) -> Cow<'_, str> {
    partial_escape(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_esc_attr() {
        assert_eq!(esc_attr("plain"), "plain");
        assert_eq!(
            esc_attr(r#""><script>alert('x')</script>"#),
            "&quot;&gt;&lt;script&gt;alert(&apos;x&apos;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_esc_html() {
        assert_eq!(esc_html("Fish & Chips"), "Fish &amp; Chips");
        assert_eq!(esc_html("<b>"), "&lt;b&gt;");
        assert_eq!(esc_html(r#"say "hi""#), r#"say "hi""#);
    }

    #[test]
    fn test_no_allocation_when_clean() {
        assert!(matches!(esc_attr("gold"), Cow::Borrowed(_)));
        assert!(matches!(esc_html("gold"), Cow::Borrowed(_)));
    }
}
