//! Heading directives: `[!collapsible]`, `[!collapsible:expand]`,
//! `[!(Name)]`, `[!collapsible(Name)]`, `[!collapsible:expand(Name)]`.
//!
//! Anything else in brackets is ordinary heading text.

use codedoc::Inline;
use codedoc::document::names::{COLLAPSIBLE, SECTION};
use once_cell::sync::Lazy;
use regex::Regex;

static DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\[!(collapsible(:expand)?)?(?:\(([A-Z][A-Za-z0-9]*)\))?\]\s*").unwrap()
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directive {
    pub collapsible: bool,
    pub expanded: bool,
    /// Custom component base for `NameHeader` / `NameContent`.
    pub name: Option<String>,
}

impl Directive {
    /// The component base name: the custom name, `Collapsible`, or `Section`.
    pub fn base(&self) -> &str {
        match (&self.name, self.collapsible) {
            (Some(name), _) => name,
            (None, true) => COLLAPSIBLE,
            (None, false) => SECTION,
        }
    }
}

/// Parse a directive at the start of `text`, returning it with the length
/// of the matched prefix.
pub fn parse_directive(text: &str) -> Option<(Directive, usize)> {
    let caps = DIRECTIVE.captures(text)?;
    let collapsible = caps.get(1).is_some();
    let name = caps.get(3).map(|m| m.as_str().to_string());
    if !collapsible && name.is_none() {
        return None;
    }
    let directive = Directive {
        collapsible,
        expanded: caps.get(2).is_some(),
        name,
    };
    Some((directive, caps.get(0)?.end()))
}

/// Remove a leading directive from heading content.
pub fn take_directive(content: &mut Vec<Inline>) -> Directive {
    let Some(Inline::Text(text)) = content.first_mut() else {
        return Directive::default();
    };
    let Some((directive, end)) = parse_directive(text) else {
        return Directive::default();
    };
    text.replace_range(..end, "");
    if text.is_empty() {
        content.remove(0);
    }
    directive
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognised_forms() {
        let (d, _) = parse_directive("[!collapsible] Notes").unwrap();
        assert!(d.collapsible && !d.expanded && d.name.is_none());
        assert_eq!(d.base(), "Collapsible");

        let (d, _) = parse_directive("[!collapsible:expand] Notes").unwrap();
        assert!(d.collapsible && d.expanded);

        let (d, end) = parse_directive("[!(Hint)] Try two pointers").unwrap();
        assert!(!d.collapsible);
        assert_eq!(d.base(), "Hint");
        assert_eq!(&"[!(Hint)] Try two pointers"[end..], "Try two pointers");

        let (d, _) = parse_directive("[!collapsible:expand(Solution)] Code").unwrap();
        assert!(d.collapsible && d.expanded);
        assert_eq!(d.name.as_deref(), Some("Solution"));
    }

    #[test]
    fn malformed_is_not_a_directive() {
        for text in [
            "[!] Title",
            "[!collapse] Title",
            "[!collapsible:open] Title",
            "[!(lower)] Title",
            "Title [!collapsible]",
            "[note] Title",
        ] {
            assert!(parse_directive(text).is_none(), "{}", text);
        }
    }

    #[test]
    fn take_strips_prefix_from_first_text() {
        let mut content = vec![Inline::Text("[!collapsible] Complexity".into())];
        let d = take_directive(&mut content);
        assert!(d.collapsible);
        assert_eq!(content, vec![Inline::Text("Complexity".into())]);

        let mut plain = vec![Inline::Text("Complexity".into())];
        assert_eq!(take_directive(&mut plain), Directive::default());
        assert_eq!(plain, vec![Inline::Text("Complexity".into())]);
    }
}
