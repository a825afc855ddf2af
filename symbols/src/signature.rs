//! Definition header parsing: signature text, parameters, return annotation.

use crate::extract::{Keyword, definition};
use crate::record::ParameterRecord;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    /// Header without the trailing colon, whitespace-normalized.
    pub text: String,
    /// Empty for classes; `self`/`cls` receivers are omitted.
    pub parameters: Vec<ParameterRecord>,
    pub return_type: String,
}

/// Parse the header of the first definition in `code`.
pub fn parse_signature(code: &str) -> Option<Signature> {
    let mut offset = 0;
    let mut found = None;
    for line in code.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some((keyword, _)) = definition(trimmed) {
            found = Some((keyword, offset + (line.len() - trimmed.len())));
            break;
        }
        offset += line.len();
    }
    let (keyword, start) = found?;

    let rest = &code[start..];
    let colon = top_level_positions(rest, ':').into_iter().next()?;
    let header = &rest[..colon];
    let text = normalize_whitespace(header);

    if keyword == Keyword::Class {
        return Some(Signature {
            text,
            ..Signature::default()
        });
    }

    let open = header.find('(')?;
    let close = open + matching_close(&header[open..])?;
    let parameters = parse_parameters(&header[open + 1..close]);
    let return_type = header[close + 1..]
        .trim()
        .strip_prefix("->")
        .map(normalize_whitespace)
        .unwrap_or_default();

    Some(Signature {
        text,
        parameters,
        return_type,
    })
}

fn parse_parameters(inner: &str) -> Vec<ParameterRecord> {
    let mut params = Vec::new();
    for (position, piece) in split_top_level(inner, ',').into_iter().enumerate() {
        let piece = piece.trim();
        if piece.is_empty() || piece == "*" || piece == "/" {
            continue;
        }
        let (declared, default) = match top_level_positions(piece, '=').first() {
            Some(&eq) => (&piece[..eq], Some(normalize_whitespace(&piece[eq + 1..]))),
            None => (piece, None),
        };
        let (name, ty) = match top_level_positions(declared, ':').first() {
            Some(&colon) => (&declared[..colon], normalize_whitespace(&declared[colon + 1..])),
            None => (declared, String::new()),
        };
        let name = name.trim().trim_start_matches('*');
        if position == 0 && (name == "self" || name == "cls") {
            continue;
        }
        params.push(ParameterRecord {
            name: name.to_string(),
            ty,
            description: String::new(),
            default,
        });
    }
    params
}

/// Byte positions of `target` outside brackets, strings, and comments.
fn top_level_positions(s: &str, target: char) -> Vec<usize> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut in_comment = false;
    let mut chars = s.char_indices();

    while let Some((at, c)) = chars.next() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
            }
            continue;
        }
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) if c == '\\' => {
                chars.next();
            }
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '#' => in_comment = true,
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                c if c == target && depth == 0 => out.push(at),
                _ => {}
            },
        }
    }
    out
}

fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut from = 0;
    for at in top_level_positions(s, sep) {
        pieces.push(&s[from..at]);
        from = at + sep.len_utf8();
    }
    pieces.push(&s[from..]);
    pieces
}

/// Offset of the bracket closing the `(` at the start of `s`.
fn matching_close(s: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    for (at, c) in s.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(at);
                    }
                }
                _ => {}
            },
        }
    }
    None
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("( ", "(")
        .replace(", )", ")")
        .replace(",)", ")")
        .replace(" )", ")")
        .replace("[ ", "[")
        .replace(" ]", "]")
}
