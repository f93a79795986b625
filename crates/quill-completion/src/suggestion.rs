/// Suggestion lifecycle for completions handed back to the editor
///
/// A completion is displayed as an inline suggestion at the caret. The user
/// either accepts it (fully or piecewise) or dismisses it; a failed or
/// skipped cycle never touches this state.
use crate::document::DocumentNode;

/// A completion shown inline at the caret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
}

impl Suggestion {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Insert the suggestion into a snapshot at the caret
    pub fn apply_to(&self, snapshot: &DocumentNode) -> Option<DocumentNode> {
        snapshot.insert_at_cursor(&self.text)
    }
}

/// Represents the state of the inline suggestion
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SuggestionState {
    /// No suggestion is currently displayed
    #[default]
    Dismissed,
    /// Suggestion is displayed and can be accepted
    Displayed(Suggestion),
    /// Suggestion has been fully accepted
    Accepted(Suggestion),
}

/// How much of a displayed suggestion to accept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptMode {
    Full,
    /// Up to the end of the next word
    Word,
    /// Up to and including the next line break
    Line,
    Characters(usize),
}

/// Tracks the suggestion currently offered to the user
#[derive(Debug, Default)]
pub struct SuggestionTracker {
    state: SuggestionState,
}

impl SuggestionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display a new suggestion, replacing any previous one; empty text is ignored
    pub fn display(&mut self, suggestion: Suggestion) {
        if suggestion.text.is_empty() {
            return;
        }
        self.state = SuggestionState::Displayed(suggestion);
    }

    pub fn dismiss(&mut self) {
        self.state = SuggestionState::Dismissed;
    }

    /// Accept the whole suggestion
    pub fn accept(&mut self) -> Option<Suggestion> {
        match std::mem::take(&mut self.state) {
            SuggestionState::Displayed(suggestion) => {
                self.state = SuggestionState::Accepted(suggestion.clone());
                Some(suggestion)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Accept part of the suggestion; the rest stays displayed
    pub fn accept_partial(&mut self, mode: AcceptMode) -> Option<String> {
        let text = match &self.state {
            SuggestionState::Displayed(suggestion) => suggestion.text.clone(),
            _ => return None,
        };

        let split = split_point(&text, mode);
        let (accepted, rest) = text.split_at(split);

        if rest.is_empty() {
            self.state = SuggestionState::Accepted(Suggestion::new(text.clone()));
        } else {
            self.state = SuggestionState::Displayed(Suggestion::new(rest));
        }
        Some(accepted.to_string())
    }

    pub fn state(&self) -> &SuggestionState {
        &self.state
    }

    pub fn is_displayed(&self) -> bool {
        matches!(self.state, SuggestionState::Displayed(_))
    }
}

/// Byte offset where the accepted prefix ends
fn split_point(text: &str, mode: AcceptMode) -> usize {
    match mode {
        AcceptMode::Full => text.len(),
        AcceptMode::Word => {
            let start = text.len() - text.trim_start().len();
            text[start..]
                .find(char::is_whitespace)
                .map(|idx| start + idx)
                .unwrap_or(text.len())
        }
        AcceptMode::Line => text.find('\n').map(|idx| idx + 1).unwrap_or(text.len()),
        AcceptMode::Characters(n) => text
            .char_indices()
            .nth(n)
            .map(|(idx, _)| idx)
            .unwrap_or(text.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_dismiss() {
        let mut tracker = SuggestionTracker::new();
        tracker.display(Suggestion::new("world"));
        assert!(tracker.is_displayed());

        tracker.dismiss();
        assert!(!tracker.is_displayed());
        assert_eq!(tracker.state(), &SuggestionState::Dismissed);
    }

    #[test]
    fn test_empty_suggestion_is_not_displayed() {
        let mut tracker = SuggestionTracker::new();
        tracker.display(Suggestion::new(""));
        assert_eq!(tracker.state(), &SuggestionState::Dismissed);
    }

    #[test]
    fn test_accept() {
        let mut tracker = SuggestionTracker::new();
        assert!(tracker.accept().is_none());

        tracker.display(Suggestion::new("world"));
        let accepted = tracker.accept().unwrap();
        assert_eq!(accepted.text, "world");
        assert_eq!(tracker.state(), &SuggestionState::Accepted(Suggestion::new("world")));
        assert!(tracker.accept().is_none());
    }

    #[test]
    fn test_accept_word_keeps_rest() {
        let mut tracker = SuggestionTracker::new();
        tracker.display(Suggestion::new("quick brown fox"));

        assert_eq!(tracker.accept_partial(AcceptMode::Word).as_deref(), Some("quick"));
        assert_eq!(
            tracker.state(),
            &SuggestionState::Displayed(Suggestion::new(" brown fox"))
        );
        assert_eq!(tracker.accept_partial(AcceptMode::Word).as_deref(), Some(" brown"));
        assert_eq!(tracker.accept_partial(AcceptMode::Word).as_deref(), Some(" fox"));
        assert!(matches!(tracker.state(), SuggestionState::Accepted(_)));
    }

    #[test]
    fn test_accept_line() {
        let mut tracker = SuggestionTracker::new();
        tracker.display(Suggestion::new("first\nsecond"));
        assert_eq!(tracker.accept_partial(AcceptMode::Line).as_deref(), Some("first\n"));
        assert_eq!(tracker.accept_partial(AcceptMode::Line).as_deref(), Some("second"));
        assert!(!tracker.is_displayed());
    }

    #[test]
    fn test_accept_characters_respects_char_boundaries() {
        let mut tracker = SuggestionTracker::new();
        tracker.display(Suggestion::new("héllo"));
        assert_eq!(tracker.accept_partial(AcceptMode::Characters(2)).as_deref(), Some("hé"));
        assert_eq!(
            tracker.state(),
            &SuggestionState::Displayed(Suggestion::new("llo"))
        );
    }

    #[test]
    fn test_apply_to_snapshot() {
        let doc = DocumentNode::root(vec![DocumentNode::element(
            "paragraph",
            vec![DocumentNode::text("Hello "), DocumentNode::cursor()],
        )]);
        let applied = Suggestion::new("world").apply_to(&doc).unwrap();
        assert_eq!(crate::flatten::flatten(&applied), "Hello world[[cursor]]\r\n\r\n");
    }
}
