//! Text cleanup on the leading paragraph of a list item.

use codedoc::Inline;
use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)*\.\s+").unwrap());

/// Remove a leading `N. ` / `N.N. ` from the first inline when it is plain
/// text. Returns whether anything was removed.
pub fn strip_number_prefix(inlines: &mut Vec<Inline>) -> bool {
    let Some(Inline::Text(text)) = inlines.first_mut() else {
        return false;
    };
    let Some(found) = NUMBER_PREFIX.find(text) else {
        return false;
    };
    text.replace_range(..found.end(), "");
    if text.is_empty() {
        inlines.remove(0);
    }
    true
}

/// Strip the colon of every text run whose last character is one,
/// descending into emphasis but not links. Returns whether any colon was
/// found, which marks the item as a header item.
pub fn take_header_colon(inlines: &mut [Inline]) -> bool {
    let mut found = false;
    for inline in inlines {
        match inline {
            Inline::Text(text) => {
                if text.ends_with(':') {
                    text.pop();
                    found = true;
                }
            }
            Inline::Strong(children)
            | Inline::Emphasis(children)
            | Inline::Strikethrough(children) => {
                found |= take_header_colon(children);
            }
            _ => {}
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn strips_leading_number_only_from_text() {
        let mut inlines = vec![text("2.1. Use a hash map")];
        assert!(strip_number_prefix(&mut inlines));
        assert_eq!(inlines, vec![text("Use a hash map")]);

        let mut link = vec![Inline::Link {
            dest: "x".into(),
            title: String::new(),
            content: vec![text("1. linked")],
        }];
        assert!(!strip_number_prefix(&mut link));

        let mut mid = vec![text("Step 1. go")];
        assert!(!strip_number_prefix(&mut mid));
    }

    #[test]
    fn prefix_only_text_is_removed() {
        let mut inlines = vec![text("3. "), Inline::Strong(vec![text("Bold")])];
        assert!(strip_number_prefix(&mut inlines));
        assert_eq!(inlines, vec![Inline::Strong(vec![text("Bold")])]);
    }

    #[test]
    fn trailing_colon_marks_header() {
        let mut inlines = vec![Inline::Strong(vec![text("Approach:")])];
        assert!(take_header_colon(&mut inlines));
        assert_eq!(inlines, vec![Inline::Strong(vec![text("Approach")])]);

        let mut plain = vec![text("Time: O(n)")];
        assert!(!take_header_colon(&mut plain));
        assert_eq!(plain, vec![text("Time: O(n)")]);
    }

    #[test]
    fn colon_before_more_content_is_not_trailing() {
        let mut inlines = vec![
            text("Complexity: "),
            Inline::CodeSpan("O(n)".into()),
            text(" overall"),
        ];
        assert!(!take_header_colon(&mut inlines));
        assert_eq!(inlines[0], text("Complexity: "));
    }
}
