//! Rotating prompt suggestions for the input box

use rand::seq::SliceRandom;

use crate::constants::INITIAL_PLACEHOLDERS;

/// Ordered suggestions with a wrapping cursor
#[derive(Debug, Clone)]
pub struct PlaceholderDeck {
    items: Vec<String>,
    index: usize,
}

impl PlaceholderDeck {
    pub fn new(items: Vec<String>) -> Self {
        Self { items, index: 0 }
    }

    pub fn current(&self) -> Option<&str> {
        self.items.get(self.index).map(String::as_str)
    }

    /// Step to the next suggestion, wrapping at the end
    pub fn advance(&mut self) -> Option<&str> {
        if !self.items.is_empty() {
            self.index = (self.index + 1) % self.items.len();
        }
        self.current()
    }

    /// Append a random sample of at most `sample` suggestions
    pub fn extend_shuffled(&mut self, mut suggestions: Vec<String>, sample: usize) -> usize {
        suggestions.shuffle(&mut rand::thread_rng());
        suggestions.truncate(sample);
        let added = suggestions.len();
        self.items.extend(suggestions);
        added
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}

impl Default for PlaceholderDeck {
    fn default() -> Self {
        Self::new(INITIAL_PLACEHOLDERS.iter().map(|s| s.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_wraps() {
        let mut deck = PlaceholderDeck::new(vec!["a".into(), "b".into()]);
        assert_eq!(deck.current(), Some("a"));
        assert_eq!(deck.advance(), Some("b"));
        assert_eq!(deck.advance(), Some("a"));
    }

    #[test]
    fn test_empty_deck() {
        let mut deck = PlaceholderDeck::new(Vec::new());
        assert_eq!(deck.advance(), None);
    }

    #[test]
    fn test_extend_keeps_existing_and_samples() {
        let mut deck = PlaceholderDeck::default();
        let before = deck.len();
        let fetched: Vec<String> = (0..20).map(|i| format!("idea {}", i)).collect();
        assert_eq!(deck.extend_shuffled(fetched, 10), 10);
        assert_eq!(deck.len(), before + 10);
        assert_eq!(deck.items()[0], INITIAL_PLACEHOLDERS[0]);
        assert!(deck.items()[before..].iter().all(|s| s.starts_with("idea ")));
    }
}
