//! Search box filtering over rendered row text.

/// Lowercased search query; an empty query matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        Self {
            needle: raw.to_lowercase(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.needle
    }

    pub fn matches(&self, row_text: &str) -> bool {
        self.needle.is_empty() || row_text.to_lowercase().contains(&self.needle)
    }

    /// Visibility for each row, in the order given.
    pub fn visibility<'a, I>(&self, rows: I) -> Vec<bool>
    where
        I: IntoIterator<Item = &'a str>,
    {
        rows.into_iter().map(|text| self.matches(text)).collect()
    }
}
