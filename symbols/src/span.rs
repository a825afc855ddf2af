use serde::Serialize;

/// A half-open byte range `[start, end)` over a text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourceSpan {
    start: usize,
    end: usize,
}

impl SourceSpan {
    /// Returns `None` when `start > end`.
    pub fn new(start: usize, end: usize) -> Option<Self> {
        (start <= end).then_some(SourceSpan { start, end })
    }

    /// Span between two offsets given in either order.
    pub(crate) fn covering(a: usize, b: usize) -> Self {
        SourceSpan {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The spanned text, or `None` if the span does not fit `text` or splits a
    /// UTF-8 sequence.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }

    pub fn contains(&self, other: &SourceSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: &SourceSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}
