//! Submission history
//!
//! Stores previously submitted lines, newest first, with a navigation
//! cursor and a draft slot. The draft captures the live line at the moment
//! the user first navigates away from it, so returning past the newest
//! entry restores what was being typed.

/// History of submitted lines.
///
/// `index` is -1 while editing the live line and `0..entries.len()` while a
/// historical entry is displayed. Entries are only ever prepended, on
/// submission; there is no de-duplication and no capacity bound.
#[derive(Debug)]
pub struct History {
    /// Submitted lines, newest first.
    entries: Vec<Vec<char>>,
    /// Navigation cursor; -1 means the live line.
    index: isize,
    /// Live line saved when navigation first leaves it.
    draft: Option<Vec<char>>,
}

impl Default for History {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: -1,
            draft: None,
        }
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a historical entry (not the live line) is displayed.
    pub fn navigating(&self) -> bool {
        self.index >= 0
    }

    /// Record a submission as the newest entry and return to the live line.
    /// The draft is discarded: submission ends the navigation session.
    pub fn record(&mut self, line: Vec<char>) {
        self.entries.insert(0, line);
        self.index = -1;
        self.draft = None;
    }

    /// Navigate toward older entries by `n`, saving `live` as the draft when
    /// leaving the live line. Returns the content to display. With no
    /// entries the draft itself comes back, leaving the line as it was.
    pub fn older(&mut self, n: usize, live: &[char]) -> Vec<char> {
        if self.index == -1 {
            self.draft = Some(live.to_vec());
        }
        let newest = self.entries.len() as isize - 1;
        self.index = newest.min(self.index.saturating_add(n as isize));
        self.current()
    }

    /// Navigate toward newer entries by `n`. Past the newest entry the
    /// draft comes back (empty if navigation never left the live line).
    pub fn newer(&mut self, n: usize) -> Vec<char> {
        self.index = (-1).max(self.index.saturating_sub(n as isize));
        self.current()
    }

    fn current(&self) -> Vec<char> {
        if self.index >= 0 {
            self.entries
                .get(self.index as usize)
                .cloned()
                .unwrap_or_default()
        } else {
            self.draft.clone().unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    fn text(chars: &[char]) -> String {
        chars.iter().collect()
    }

    #[test]
    fn test_round_trip_with_draft() {
        let mut history = History::new();
        history.record(chars("first"));
        history.record(chars("second"));

        // Live line is empty when navigation starts
        assert_eq!(text(&history.older(1, &[])), "second");
        assert_eq!(text(&history.older(1, &[])), "first");
        assert_eq!(text(&history.newer(1)), "second");
        // Past the newest entry: the (empty) draft comes back
        assert_eq!(text(&history.newer(1)), "");
        assert!(!history.navigating());
    }

    #[test]
    fn test_draft_preserves_typed_text() {
        let mut history = History::new();
        history.record(chars("ls"));

        assert_eq!(text(&history.older(1, &chars("half-typed"))), "ls");
        assert_eq!(text(&history.newer(1)), "half-typed");
    }

    #[test]
    fn test_older_clamps_at_oldest() {
        let mut history = History::new();
        history.record(chars("one"));
        history.record(chars("two"));

        assert_eq!(text(&history.older(10, &[])), "one");
        assert_eq!(text(&history.older(1, &[])), "one");
    }

    #[test]
    fn test_older_with_empty_history_keeps_live_line() {
        let mut history = History::new();
        assert_eq!(text(&history.older(1, &chars("typing"))), "typing");
        assert!(!history.navigating());
    }

    #[test]
    fn test_newer_without_draft_is_empty() {
        let mut history = History::new();
        history.record(chars("one"));
        assert_eq!(text(&history.newer(1)), "");
    }

    #[test]
    fn test_submission_discards_draft() {
        let mut history = History::new();
        history.record(chars("one"));
        history.older(1, &chars("draft"));
        history.record(chars("two"));

        assert_eq!(text(&history.older(1, &[])), "two");
        assert_eq!(text(&history.older(1, &[])), "one");
        // The old draft is gone; the new navigation session saved ""
        history.newer(5);
        assert_eq!(text(&history.newer(1)), "");
    }

    #[test]
    fn test_empty_submissions_recorded() {
        let mut history = History::new();
        history.record(chars(""));
        history.record(chars("x"));
        assert_eq!(history.len(), 2);
        assert_eq!(text(&history.older(2, &[])), "");
    }
}
