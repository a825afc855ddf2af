use std::collections::HashMap;

/// GitHub-style anchor slugs, de-duplicated per document with `-1`, `-2`
/// suffixes.
#[derive(Debug, Default)]
pub struct Slugger {
    occurrences: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Slugger::default()
    }

    /// Headings with no sluggable text fall back to `section`.
    pub fn slug(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base = "section".to_string();
        }
        let mut slug = base.clone();
        while self.occurrences.contains_key(&slug) {
            let count = self.occurrences.entry(base.clone()).or_insert(0);
            *count += 1;
            slug = format!("{}-{}", base, count);
        }
        self.occurrences.insert(slug.clone(), 0);
        slug
    }

    /// Reserve an authored id so generated slugs never collide with it.
    pub fn reserve(&mut self, id: &str) {
        self.occurrences.entry(id.to_string()).or_insert(0);
    }
}

/// Lowercase, drop punctuation, turn spaces into hyphens.
pub fn slugify(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_like_github() {
        assert_eq!(slugify("Two Sum (Easy)"), "two-sum-easy");
        assert_eq!(slugify("  O(n) time & space "), "on-time--space");
        assert_eq!(slugify("snake_case-Name"), "snake_case-name");
    }

    #[test]
    fn duplicates_get_suffixes() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("Approach"), "approach");
        assert_eq!(slugger.slug("Approach"), "approach-1");
        assert_eq!(slugger.slug("Approach"), "approach-2");
        assert_eq!(slugger.slug("Approach 1"), "approach-1-1");
    }

    #[test]
    fn empty_text_falls_back_to_section() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug(""), "section");
        assert_eq!(slugger.slug("  &! "), "section-1");
        assert_eq!(slugger.slug("Section"), "section-2");
    }

    #[test]
    fn reserved_ids_are_avoided() {
        let mut slugger = Slugger::new();
        slugger.reserve("intro");
        assert_eq!(slugger.slug("Intro"), "intro-1");
    }
}
