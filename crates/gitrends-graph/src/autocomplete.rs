//! Prefix autocomplete over a fixed candidate list
//!
//! Matching is a case-insensitive prefix test, at most [`MAX_SUGGESTIONS`]
//! in candidate order. Suggestions only appear once the user has typed
//! something; committing a suggestion fills the input and hides the list
//! until the next keystroke.
//!
//! # EGUI-RULES Compliance
//! - No callbacks - `key()` and `submit()` return an [`AutoCompleteEvent`]
//! - The widget feeds raw keys and text in, the model owns all state

pub const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoCompleteKey {
    Up,
    Down,
    Enter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoCompleteEvent {
    /// A suggestion was accepted into the input
    Committed(String),
    /// The current input was submitted as is
    Submitted(String),
}

#[derive(Debug, Clone, Default)]
pub struct AutoComplete {
    candidates: Vec<String>,
    input: String,
    typed: bool,
    suggestions: Vec<usize>,
    active: Option<usize>,
}

impl AutoComplete {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candidates(candidates: Vec<String>) -> Self {
        let mut ac = Self::new();
        ac.set_candidates(candidates);
        ac
    }

    /// Replace the candidate list; the input is kept and re-matched
    pub fn set_candidates(&mut self, candidates: Vec<String>) {
        self.candidates = candidates;
        self.refresh();
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Text typed by the user
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.typed = true;
        self.refresh();
    }

    pub fn suggestions(&self) -> impl Iterator<Item = &str> {
        self.suggestions
            .iter()
            .filter_map(|i| self.candidates.get(*i))
            .map(String::as_str)
    }

    pub fn suggestion_count(&self) -> usize {
        self.suggestions.len()
    }

    /// Position of the highlighted suggestion in the list
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_open(&self) -> bool {
        !self.suggestions.is_empty()
    }

    pub fn key(&mut self, key: AutoCompleteKey) -> Option<AutoCompleteEvent> {
        let count = self.suggestions.len();
        match key {
            AutoCompleteKey::Down => {
                if count > 0 {
                    self.active = Some(match self.active {
                        Some(i) if i + 1 < count => i + 1,
                        _ => 0,
                    });
                }
                None
            }
            AutoCompleteKey::Up => {
                if count > 0 {
                    self.active = Some(match self.active {
                        Some(i) if i > 0 => i - 1,
                        _ => count - 1,
                    });
                }
                None
            }
            AutoCompleteKey::Enter => match self.active {
                Some(i) => self.select(i),
                None => Some(self.submit()),
            },
        }
    }

    /// Accept the suggestion at `index` (mouse click or Enter)
    pub fn select(&mut self, index: usize) -> Option<AutoCompleteEvent> {
        let candidate = self
            .suggestions
            .get(index)
            .and_then(|i| self.candidates.get(*i))?
            .clone();
        self.input = candidate.clone();
        self.typed = false;
        self.refresh();
        Some(AutoCompleteEvent::Committed(candidate))
    }

    /// Submit the input as is and close the list
    pub fn submit(&mut self) -> AutoCompleteEvent {
        self.typed = false;
        self.refresh();
        AutoCompleteEvent::Submitted(self.input.clone())
    }

    pub fn reset(&mut self) {
        self.input.clear();
        self.typed = false;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.active = None;
        self.suggestions.clear();
        if !self.typed || self.input.is_empty() {
            return;
        }
        let prefix = self.input.to_lowercase();
        self.suggestions.extend(
            self.candidates
                .iter()
                .enumerate()
                .filter(|(_, c)| c.to_lowercase().starts_with(&prefix))
                .map(|(i, _)| i)
                .take(MAX_SUGGESTIONS),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn files() -> AutoComplete {
        AutoComplete::with_candidates(
            ["src/App.ts", "src/api.ts", "lib/core.ts", "Src/legacy.ts"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    #[test]
    fn test_no_suggestions_until_typed() {
        let ac = files();
        assert!(!ac.is_open());
    }

    #[test]
    fn test_case_insensitive_prefix_in_candidate_order() {
        let mut ac = files();
        ac.set_input("SRC/a");
        assert_eq!(ac.suggestions().collect::<Vec<_>>(), vec!["src/App.ts", "src/api.ts"]);
        ac.set_input("src");
        assert_eq!(ac.suggestion_count(), 3);
    }

    #[test]
    fn test_suggestions_capped() {
        let mut ac = AutoComplete::with_candidates((0..25).map(|i| format!("f{}", i)).collect());
        ac.set_input("f");
        assert_eq!(ac.suggestion_count(), MAX_SUGGESTIONS);
        assert_eq!(ac.suggestions().next(), Some("f0"));
    }

    #[test]
    fn test_navigation_wraps() {
        let mut ac = files();
        ac.set_input("src/");
        assert_eq!(ac.suggestion_count(), 3);

        ac.key(AutoCompleteKey::Up);
        assert_eq!(ac.active(), Some(2));
        ac.key(AutoCompleteKey::Down);
        assert_eq!(ac.active(), Some(0));
        ac.key(AutoCompleteKey::Up);
        assert_eq!(ac.active(), Some(2));

        let mut fresh = files();
        fresh.set_input("src/");
        fresh.key(AutoCompleteKey::Down);
        assert_eq!(fresh.active(), Some(0));
    }

    #[test]
    fn test_enter_commits_active_suggestion() {
        let mut ac = files();
        ac.set_input("lib");
        ac.key(AutoCompleteKey::Down);
        let event = ac.key(AutoCompleteKey::Enter);
        assert_eq!(event, Some(AutoCompleteEvent::Committed("lib/core.ts".to_string())));
        assert_eq!(ac.input(), "lib/core.ts");
        assert!(!ac.is_open());
    }

    #[test]
    fn test_enter_without_active_submits_raw_text() {
        let mut ac = files();
        ac.set_input("src/ap");
        let event = ac.key(AutoCompleteKey::Enter);
        assert_eq!(event, Some(AutoCompleteEvent::Submitted("src/ap".to_string())));
        assert!(!ac.is_open());
    }

    #[test]
    fn test_keys_without_suggestions_do_nothing() {
        let mut ac = files();
        ac.set_input("zzz");
        assert_eq!(ac.key(AutoCompleteKey::Down), None);
        assert_eq!(ac.active(), None);
    }

    #[test]
    fn test_reset_clears_input() {
        let mut ac = files();
        ac.set_input("src");
        ac.reset();
        assert_eq!(ac.input(), "");
        assert!(!ac.is_open());
    }
}
