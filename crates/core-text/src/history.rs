//! Committed-input history with a navigation index.
//!
//! The history is append-only: a committed input is never mutated in place.
//! Navigation is explicit: callers `enter_history` before moving and
//! `exit_history` when done; outside navigation the index is `None` and
//! every move fails.

use crate::TextInput;

#[derive(Debug, Clone, Default)]
pub struct TextInputHistory {
    entries: Vec<TextInput>,
    index: Option<usize>,
}

impl TextInputHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a committed input. Allowed at any time, navigating or not.
    pub fn add_to_history(&mut self, input: TextInput) {
        self.entries.push(input);
    }

    /// Begin navigation at the most recent entry. Fails on an empty history
    /// and when navigation is already active.
    pub fn enter_history(&mut self) -> bool {
        if self.entries.is_empty() || self.index.is_some() {
            return false;
        }
        self.index = Some(self.entries.len() - 1);
        true
    }

    pub fn exit_history(&mut self) -> bool {
        self.index.take().is_some()
    }

    /// Step toward the oldest entry. Fails at the oldest entry and outside
    /// navigation.
    pub fn move_to_previous(&mut self) -> bool {
        match self.index {
            Some(i) if i > 0 => {
                self.index = Some(i - 1);
                true
            }
            _ => false,
        }
    }

    /// Step toward the newest entry. Fails at the newest entry and outside
    /// navigation.
    pub fn move_to_next(&mut self) -> bool {
        match self.index {
            Some(i) if i + 1 < self.entries.len() => {
                self.index = Some(i + 1);
                true
            }
            _ => false,
        }
    }

    pub fn move_to_first(&mut self) -> bool {
        if self.index.is_none() || self.entries.is_empty() {
            return false;
        }
        self.index = Some(0);
        true
    }

    pub fn move_to_last(&mut self) -> bool {
        if self.index.is_none() || self.entries.is_empty() {
            return false;
        }
        self.index = Some(self.entries.len() - 1);
        true
    }

    /// Jump to entry `n`. Fails outside navigation and past the end.
    pub fn move_to_nth(&mut self, n: usize) -> bool {
        if self.index.is_none() || n >= self.entries.len() {
            return false;
        }
        self.index = Some(n);
        true
    }

    /// The entry under the navigation index.
    pub fn get(&self) -> Option<&TextInput> {
        self.index.and_then(|i| self.entries.get(i))
    }

    pub fn get_nth(&self, n: usize) -> Option<&TextInput> {
        self.entries.get(n)
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_in_history(&self) -> bool {
        self.index.is_some()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(lines: &[&str]) -> TextInputHistory {
        let mut history = TextInputHistory::new();
        for line in lines {
            history.add_to_history(TextInput::from(*line));
        }
        history
    }

    #[test]
    fn empty_history_cannot_be_entered() {
        let mut history = TextInputHistory::new();
        assert!(!history.enter_history());
        assert!(!history.is_in_history());
    }

    #[test]
    fn enter_lands_on_most_recent_entry() {
        let mut history = history_of(&["first", "second"]);
        assert!(history.enter_history());
        assert_eq!(history.index(), Some(1));
        assert_eq!(history.get().map(TextInput::to_string), Some("second".into()));
    }

    #[test]
    fn enter_twice_fails() {
        let mut history = history_of(&["a"]);
        assert!(history.enter_history());
        assert!(!history.enter_history());
        assert_eq!(history.index(), Some(0));
    }

    #[test]
    fn moves_fail_outside_navigation() {
        let mut history = history_of(&["a", "b"]);
        assert!(!history.move_to_previous());
        assert!(!history.move_to_next());
        assert!(!history.move_to_first());
        assert!(!history.move_to_nth(0));
        assert!(history.get().is_none());
    }

    #[test]
    fn previous_and_next_stop_at_the_ends() {
        let mut history = history_of(&["a", "b", "c"]);
        history.enter_history();
        assert!(history.move_to_previous());
        assert!(history.move_to_previous());
        assert!(!history.move_to_previous());
        assert_eq!(history.index(), Some(0));
        assert!(history.move_to_next());
        assert!(history.move_to_next());
        assert!(!history.move_to_next());
        assert_eq!(history.index(), Some(2));
    }

    #[test]
    fn first_last_and_nth_jumps() {
        let mut history = history_of(&["a", "b", "c"]);
        history.enter_history();
        assert!(history.move_to_first());
        assert_eq!(history.index(), Some(0));
        assert!(history.move_to_last());
        assert_eq!(history.index(), Some(2));
        assert!(history.move_to_nth(1));
        assert_eq!(history.get().map(TextInput::to_string), Some("b".into()));
        assert!(!history.move_to_nth(3));
    }

    #[test]
    fn exit_clears_the_index() {
        let mut history = history_of(&["a"]);
        history.enter_history();
        assert!(history.exit_history());
        assert!(!history.is_in_history());
        assert!(!history.exit_history());
    }

    #[test]
    fn appending_while_navigating_keeps_the_index() {
        let mut history = history_of(&["a", "b"]);
        history.enter_history();
        history.move_to_previous();
        history.add_to_history(TextInput::from("c"));
        assert_eq!(history.index(), Some(0));
        assert_eq!(history.size(), 3);
    }
}
