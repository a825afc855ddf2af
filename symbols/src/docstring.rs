//! Leading docstring detection, removal, and `Args:` section parsing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extract::{definition, indent_of, is_blank};

static DOC_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(?:[rRuUbB]{1,2})?("""|''')"#).unwrap());

static ARGS_SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:Args|Arguments|Parameters|Params)\s*:\s*$").unwrap());

static ARG_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\*{0,2}([A-Za-z_][A-Za-z0-9_]*)\s*(?:\([^)]*\))?\s*:\s*(.*)$").unwrap()
});

/// Line coordinates (inclusive) and inner text of a docstring.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Docstring {
    first: usize,
    last: usize,
    text: String,
}

/// Line index of the header's closing colon, skipping decorators. `None` for
/// one-line definitions (`def f(): return 1`) and non-definitions.
fn header_end(lines: &[&str]) -> Option<usize> {
    let start = lines
        .iter()
        .position(|l| definition(l.trim_start()).is_some())?;

    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    for (n, line) in lines.iter().enumerate().skip(start) {
        let mut chars = line.char_indices();
        while let Some((at, c)) = chars.next() {
            match quote {
                Some(q) if c == q => quote = None,
                Some(_) if c == '\\' => {
                    chars.next();
                }
                Some(_) => {}
                None => match c {
                    '\'' | '"' => quote = Some(c),
                    '#' => break,
                    '(' | '[' | '{' => depth += 1,
                    ')' | ']' | '}' => depth -= 1,
                    ':' if depth == 0 => {
                        let tail = line[at + 1..].trim();
                        let one_liner = !tail.is_empty() && !tail.starts_with('#');
                        return (!one_liner).then_some(n);
                    }
                    _ => {}
                },
            }
        }
        // string literals in a signature never span lines
        quote = None;
    }
    None
}

fn find_docstring(lines: &[&str]) -> Option<Docstring> {
    let header = header_end(lines)?;
    let first = (header + 1..lines.len()).find(|&n| !is_blank(lines[n]))?;
    let trimmed = lines[first].trim_start();
    let caps = DOC_OPEN.captures(trimmed)?;
    let quote = caps.get(1)?.as_str();
    let rest = &trimmed[caps.get(0)?.end()..];

    if let Some(close) = rest.find(quote) {
        return Some(Docstring {
            first,
            last: first,
            text: rest[..close].to_string(),
        });
    }

    let mut text = rest.to_string();
    for (n, line) in lines.iter().enumerate().skip(first + 1) {
        if let Some(close) = line.find(quote) {
            text.push_str(&line[..close]);
            return Some(Docstring {
                first,
                last: n,
                text,
            });
        }
        text.push_str(line);
    }
    None
}

/// Remove the leading docstring of an extracted definition.
///
/// Blank lines directly after the docstring collapse to a single blank line
/// when more code follows, and are dropped otherwise. Code without a leading
/// docstring is returned unchanged.
pub fn strip_docstring(code: &str) -> String {
    let lines: Vec<&str> = code.split_inclusive('\n').collect();
    let Some(doc) = find_docstring(&lines) else {
        return code.to_string();
    };

    let after = doc.last + 1;
    let blanks = lines[after..].iter().take_while(|l| is_blank(l)).count();
    let content_follows = after + blanks < lines.len();
    let keep_blank = if content_follows { blanks.min(1) } else { 0 };

    let mut out = String::with_capacity(code.len());
    for line in &lines[..doc.first] {
        out.push_str(line);
    }
    for line in &lines[after..after + keep_blank] {
        out.push_str(line);
    }
    for line in &lines[after + blanks..] {
        out.push_str(line);
    }
    out
}

/// Inner text of the leading docstring, if any.
pub fn docstring_text(code: &str) -> Option<String> {
    let lines: Vec<&str> = code.split_inclusive('\n').collect();
    find_docstring(&lines).map(|d| d.text)
}

/// `(name, description)` pairs from a Google-style `Args:` section.
/// Continuation lines are joined with single spaces.
pub fn arg_descriptions(doc: &str) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::new();
    let mut lines = doc.lines();

    let Some(section_indent) = lines
        .by_ref()
        .find(|l| ARGS_SECTION.is_match(l))
        .map(indent_of)
    else {
        return out;
    };

    let mut entry_indent: Option<usize> = None;
    for line in lines {
        if is_blank(line) {
            continue;
        }
        let indent = indent_of(line);
        if indent <= section_indent {
            break;
        }
        let is_entry = entry_indent.is_none_or(|e| indent <= e);
        if is_entry {
            if let Some(caps) = ARG_ENTRY.captures(line) {
                entry_indent = Some(indent);
                out.push((caps[1].to_string(), caps[2].trim().to_string()));
                continue;
            }
        }
        if let Some((_, description)) = out.last_mut() {
            if !description.is_empty() {
                description.push(' ');
            }
            description.push_str(line.trim());
        }
    }
    out
}
