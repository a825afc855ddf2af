use crate::document::MetaEntry;

/// Split a fence info string into its language word and meta entries.
///
/// `python file=a.py title="Two Sum" nodoc` yields language `python` and the
/// entries `file=a.py`, `title=Two Sum`, `nodoc`. A first word containing `=`
/// is a meta entry, not a language.
pub fn parse_info_string(info: &str) -> (Option<String>, Vec<MetaEntry>) {
    let mut words = split_words(info).into_iter();
    let mut meta = Vec::new();

    let language = match words.next() {
        Some(first) if !first.contains('=') => Some(first),
        Some(first) => {
            meta.push(to_entry(&first));
            None
        }
        None => None,
    };

    meta.extend(words.map(|w| to_entry(&w)));
    (language, meta)
}

fn to_entry(word: &str) -> MetaEntry {
    match word.split_once('=') {
        Some((key, value)) => MetaEntry {
            key: key.to_string(),
            value: Some(value.to_string()),
        },
        None => MetaEntry {
            key: word.to_string(),
            value: None,
        },
    }
}

/// Whitespace-separated words; a quoted run keeps its spaces and loses its quotes.
fn split_words(info: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in info.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            None => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_and_locator() {
        let (lang, meta) = parse_info_string("python file=solutions/a/b/solution.py:Solver");
        assert_eq!(lang.as_deref(), Some("python"));
        assert_eq!(meta.len(), 1);
        assert_eq!(meta[0].key, "file");
        assert_eq!(
            meta[0].value.as_deref(),
            Some("solutions/a/b/solution.py:Solver")
        );
    }

    #[test]
    fn quoted_values_keep_spaces() {
        let (_, meta) = parse_info_string("js title=\"Two Sum\" showLineNumbers");
        assert_eq!(meta[0].value.as_deref(), Some("Two Sum"));
        assert_eq!(meta[1].key, "showLineNumbers");
        assert_eq!(meta[1].value, None);
    }

    #[test]
    fn leading_entry_is_not_a_language() {
        let (lang, meta) = parse_info_string("file=notes.txt");
        assert_eq!(lang, None);
        assert_eq!(meta[0].key, "file");
    }

    #[test]
    fn empty_info() {
        let (lang, meta) = parse_info_string("   ");
        assert_eq!(lang, None);
        assert!(meta.is_empty());
    }
}
