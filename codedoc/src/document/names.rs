//! The fixed vocabulary of synthesized component and attribute names.
//!
//! A renderer may rely on every component it receives being named by one of
//! these constants, by [`header_of`]/[`content_of`] applied to one of them, or
//! by a custom section base taken from a heading directive.
//!
//! Attributes carried per component, and nothing else:
//!
//! | component | attributes |
//! |---|---|
//! | `Section`, `Collapsible`, custom base | `data-depth`; `defaultExpanded` when collapsible and expanded; `collapsible` on a named collapsible base |
//! | `*Header`, `*Content` | none |
//! | `OrderedList`, `UnorderedList` | `level` |
//! | `ListItem` and its variants | `level`; `number` in ordered lists; `headerItem` when set |

pub const SECTION: &str = "Section";
pub const COLLAPSIBLE: &str = "Collapsible";

pub const ORDERED_LIST: &str = "OrderedList";
pub const UNORDERED_LIST: &str = "UnorderedList";

pub const LIST_ITEM: &str = "ListItem";
pub const FEATURE_LIST_ITEM: &str = "FeatureListItem";
pub const ADVANTAGE_LIST_ITEM: &str = "AdvantageListItem";
pub const DISADVANTAGE_LIST_ITEM: &str = "DisadvantageListItem";

/// Produced by a separate table-of-contents pass; sections never capture it.
pub const TABLE_OF_CONTENTS: &str = "TableOfContents";

/// Item variant tags accepted on list items (`{.feature}`).
pub const ITEM_VARIANTS: &[&str] = &["feature", "advantage", "disadvantage"];

/// Heading rank of a wrapped section.
pub const ATTR_DEPTH: &str = "data-depth";
/// Nesting level of a list, starting at 1.
pub const ATTR_LEVEL: &str = "level";
/// Display number of an ordered item, a string such as `"3"` or `"2.1"`.
pub const ATTR_NUMBER: &str = "number";
pub const ATTR_HEADER_ITEM: &str = "headerItem";
pub const ATTR_DEFAULT_EXPANDED: &str = "defaultExpanded";
/// Present only on named bases, where the name alone does not say it.
pub const ATTR_COLLAPSIBLE: &str = "collapsible";

pub fn header_of(base: &str) -> String {
    format!("{}Header", base)
}

pub fn content_of(base: &str) -> String {
    format!("{}Content", base)
}

/// Map an item variant tag to its component name. Unknown tags fall back to
/// the default item.
pub fn item_component(variant: Option<&str>) -> &'static str {
    match variant {
        Some("feature") => FEATURE_LIST_ITEM,
        Some("advantage") => ADVANTAGE_LIST_ITEM,
        Some("disadvantage") => DISADVANTAGE_LIST_ITEM,
        _ => LIST_ITEM,
    }
}
