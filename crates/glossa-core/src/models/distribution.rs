use serde::{Deserialize, Serialize};

/// Probability distribution over the next character.
///
/// Entries are sorted by probability (descending), then by character, and
/// sum to 1 within floating-point error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CharDistribution {
    entries: Vec<(char, f64)>,
    /// True when no model data existed and the uniform fallback was used.
    pub cold_start: bool,
}

impl CharDistribution {
    /// Build from unsorted entries; sorts them into canonical order.
    pub fn new(mut entries: Vec<(char, f64)>, cold_start: bool) -> Self {
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        Self {
            entries,
            cold_start,
        }
    }

    /// Uniform distribution over `alphabet`.
    pub fn uniform(alphabet: impl IntoIterator<Item = char>, cold_start: bool) -> Self {
        let chars: Vec<char> = alphabet.into_iter().collect();
        if chars.is_empty() {
            return Self::default();
        }
        let p = 1.0 / chars.len() as f64;
        Self::new(chars.into_iter().map(|c| (c, p)).collect(), cold_start)
    }

    pub fn entries(&self) -> &[(char, f64)] {
        &self.entries
    }

    pub fn probability(&self, ch: char) -> f64 {
        self.entries
            .iter()
            .find(|(c, _)| *c == ch)
            .map(|(_, p)| *p)
            .unwrap_or(0.0)
    }

    /// Most likely character, if any.
    pub fn top(&self) -> Option<(char, f64)> {
        self.entries.first().copied()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
