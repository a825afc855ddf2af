//! Authored ordinal recovery and display numbering for ordered lists.

use once_cell::sync::Lazy;
use regex::Regex;

/// Marker number at the start of an item line, after optional indentation
/// and an optional bullet.
static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t>]*(?:[-*+][ \t]+)?(\d+(?:\.\d+)*)[.)]").unwrap());

/// Sub-numbering written as item text right after a plain marker
/// (`1. 2.1. Details`).
static SUB_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]+(\d+(?:\.\d+)+)\.(?:\s|$)").unwrap());

/// The number an author wrote for a list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ordinal {
    /// No number could be read from the line.
    Missing,
    Whole(u64),
    /// Dotted sub-numbering such as `2.1`, displayed verbatim.
    Decimal(String),
}

/// Read the authored number from an item's source line.
pub fn recover_ordinal(line: &str) -> Ordinal {
    let Some(caps) = MARKER.captures(line) else {
        return Ordinal::Missing;
    };
    let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
        return Ordinal::Missing;
    };
    let number = number.as_str();
    if number.contains('.') {
        return Ordinal::Decimal(number.to_string());
    }
    if let Some(sub) = SUB_NUMBER.captures(&line[whole.end()..]) {
        return Ordinal::Decimal(sub[1].to_string());
    }
    number.parse().map(Ordinal::Whole).unwrap_or(Ordinal::Missing)
}

/// Items whose authored `1` follows a number greater than one since the
/// previous restart.
pub fn restart_points(ordinals: &[Ordinal]) -> Vec<bool> {
    let mut seen_higher = false;
    ordinals
        .iter()
        .map(|ordinal| match ordinal {
            Ordinal::Whole(1) if seen_higher => {
                seen_higher = false;
                true
            }
            Ordinal::Whole(n) if *n > 1 => {
                seen_higher = true;
                false
            }
            _ => false,
        })
        .collect()
}

/// Display numbers for a run of items. Decimal ordinals pass through,
/// restarts count from one, explicit numbers are kept, and anything else
/// is numbered by position.
pub fn display_numbers(ordinals: &[Ordinal]) -> Vec<String> {
    let restarts = restart_points(ordinals);
    let mut last_restart: Option<usize> = None;
    ordinals
        .iter()
        .zip(restarts)
        .enumerate()
        .map(|(index, (ordinal, restart))| {
            if let Ordinal::Decimal(text) = ordinal {
                return text.clone();
            }
            if restart {
                last_restart = Some(index);
                return "1".to_string();
            }
            if let Some(start) = last_restart {
                return (index - start + 1).to_string();
            }
            match ordinal {
                Ordinal::Whole(n) if *n > 0 => n.to_string(),
                _ => (index + 1).to_string(),
            }
        })
        .collect()
}

/// The full source line containing byte `offset`.
pub fn line_at(source: &str, offset: usize) -> &str {
    let offset = offset.min(source.len());
    let start = source[..offset].rfind('\n').map(|p| p + 1).unwrap_or(0);
    let end = source[start..]
        .find('\n')
        .map(|p| start + p)
        .unwrap_or(source.len());
    &source[start..end]
}
