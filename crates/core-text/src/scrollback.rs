//! Wrapped output history with a paging cursor.
//!
//! Lines are wrapped once, on insert: a line of `k` codepoints is stored as
//! `ceil(k / line_width)` chunks of at most `line_width` codepoints each, so
//! every stored line satisfies `1 <= len <= line_width`. An empty line
//! stores nothing. Stored lines are immutable.
//!
//! The paging cursor is the index of the topmost visible stored line. It is
//! `None` outside paging mode; page sizes are supplied by the caller, which
//! owns the console geometry.

use crate::TextLine;

#[derive(Debug, Clone)]
pub struct ScrollbackBuffer {
    lines: Vec<TextLine>,
    line_width: usize,
    index: Option<usize>,
}

impl ScrollbackBuffer {
    /// `line_width` is clamped to at least 1.
    pub fn new(line_width: usize) -> Self {
        Self {
            lines: Vec::new(),
            line_width: line_width.max(1),
            index: None,
        }
    }

    /// Append a line, wrapping it into `line_width`-sized chunks.
    pub fn add_to_buffer(&mut self, line: &TextLine) {
        for chunk in line.chars().chunks(self.line_width) {
            self.lines.push(TextLine::from_slice(chunk));
        }
    }

    /// Begin paging with a view of `page_size` rows, positioned on the most
    /// recent content. Fails when already paging.
    pub fn enter_buffer(&mut self, page_size: usize) -> bool {
        if self.index.is_some() {
            return false;
        }
        self.index = Some(self.lines.len().saturating_sub(page_size.max(1)));
        true
    }

    pub fn exit_buffer(&mut self) -> bool {
        self.index.take().is_some()
    }

    /// Move the cursor one stored line up. Fails at the top and outside
    /// paging mode.
    pub fn move_to_previous(&mut self) -> bool {
        match self.index {
            Some(i) if i > 0 => {
                self.index = Some(i - 1);
                true
            }
            _ => false,
        }
    }

    /// Move the cursor one stored line down. Fails at the last stored line
    /// and outside paging mode.
    pub fn move_to_next(&mut self) -> bool {
        match self.index {
            Some(i) if i + 1 < self.lines.len() => {
                self.index = Some(i + 1);
                true
            }
            _ => false,
        }
    }

    pub fn move_to_first(&mut self) -> bool {
        if self.index.is_none() {
            return false;
        }
        self.index = Some(0);
        true
    }

    /// Jump so the view of `page_size` rows shows the end of the content.
    pub fn move_to_last(&mut self, page_size: usize) -> bool {
        if self.index.is_none() {
            return false;
        }
        self.index = Some(self.lines.len().saturating_sub(page_size.max(1)));
        true
    }

    /// Move one page toward older content. Fails at the top.
    pub fn page_up(&mut self, page_size: usize) -> bool {
        match self.index {
            Some(i) if i > 0 => {
                self.index = Some(i.saturating_sub(page_size.max(1)));
                true
            }
            _ => false,
        }
    }

    /// Move one page toward newer content. Returns `false` exactly when
    /// advancing would move past the end of the visible content, which is
    /// the caller's signal to leave paging mode.
    pub fn page_down(&mut self, page_size: usize) -> bool {
        let Some(i) = self.index else {
            return false;
        };
        let last_top = self.lines.len().saturating_sub(page_size.max(1));
        if i >= last_top {
            return false;
        }
        self.index = Some((i + page_size.max(1)).min(last_top));
        true
    }

    /// Up to `max_rows` stored lines starting at `top_index`.
    pub fn get_view(&self, top_index: usize, max_rows: usize) -> &[TextLine] {
        let start = top_index.min(self.lines.len());
        let end = top_index.saturating_add(max_rows).min(self.lines.len());
        &self.lines[start..end]
    }

    pub fn get_nth(&self, n: usize) -> Option<&TextLine> {
        self.lines.get(n)
    }

    pub fn size(&self) -> usize {
        self.lines.len()
    }

    pub fn line_width(&self) -> usize {
        self.line_width
    }

    pub fn buffer_index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_in_buffer(&self) -> bool {
        self.index.is_some()
    }

    /// Drop all stored lines. Paging state is untouched; callers clear while
    /// not paging.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(width: usize, lines: &[&str]) -> ScrollbackBuffer {
        let mut buffer = ScrollbackBuffer::new(width);
        for line in lines {
            buffer.add_to_buffer(&TextLine::from(*line));
        }
        buffer
    }

    #[test]
    fn short_line_is_stored_as_one_chunk() {
        let buffer = buffer_with(10, &["hello"]);
        assert_eq!(buffer.size(), 1);
        assert_eq!(buffer.get_nth(0).map(TextLine::to_string), Some("hello".into()));
    }

    #[test]
    fn long_line_wraps_into_width_sized_chunks() {
        let buffer = buffer_with(4, &["abcdefghij"]);
        assert_eq!(buffer.size(), 3);
        assert_eq!(buffer.get_nth(0).map(TextLine::to_string), Some("abcd".into()));
        assert_eq!(buffer.get_nth(1).map(TextLine::to_string), Some("efgh".into()));
        assert_eq!(buffer.get_nth(2).map(TextLine::to_string), Some("ij".into()));
    }

    #[test]
    fn exact_multiple_has_no_empty_tail_chunk() {
        let buffer = buffer_with(4, &["abcdefgh"]);
        assert_eq!(buffer.size(), 2);
    }

    #[test]
    fn empty_line_stores_nothing() {
        let buffer = buffer_with(4, &[""]);
        assert_eq!(buffer.size(), 0);
    }

    #[test]
    fn zero_width_is_clamped_to_one() {
        let buffer = buffer_with(0, &["ab"]);
        assert_eq!(buffer.line_width(), 1);
        assert_eq!(buffer.size(), 2);
    }

    #[test]
    fn cursor_is_unset_outside_paging() {
        let mut buffer = buffer_with(4, &["abcd"]);
        assert!(buffer.buffer_index().is_none());
        assert!(!buffer.move_to_previous());
        assert!(!buffer.page_up(2));
        assert!(!buffer.exit_buffer());
    }

    #[test]
    fn enter_positions_on_most_recent_page() {
        let mut buffer = buffer_with(1, &["a", "b", "c", "d", "e"]);
        assert!(buffer.enter_buffer(2));
        assert_eq!(buffer.buffer_index(), Some(3));
        let view: Vec<String> = buffer.get_view(3, 2).iter().map(TextLine::to_string).collect();
        assert_eq!(view, ["d", "e"]);
    }

    #[test]
    fn enter_twice_fails() {
        let mut buffer = buffer_with(4, &["abcd"]);
        assert!(buffer.enter_buffer(2));
        assert!(!buffer.enter_buffer(2));
    }

    #[test]
    fn single_steps_stop_at_the_ends() {
        let mut buffer = buffer_with(1, &["a", "b", "c"]);
        buffer.enter_buffer(1);
        assert_eq!(buffer.buffer_index(), Some(2));
        assert!(!buffer.move_to_next());
        assert!(buffer.move_to_previous());
        assert!(buffer.move_to_previous());
        assert!(!buffer.move_to_previous());
        assert_eq!(buffer.buffer_index(), Some(0));
    }

    #[test]
    fn page_up_clamps_at_the_top() {
        let mut buffer = buffer_with(1, &["a", "b", "c", "d", "e"]);
        buffer.enter_buffer(2);
        assert!(buffer.page_up(2));
        assert_eq!(buffer.buffer_index(), Some(1));
        assert!(buffer.page_up(2));
        assert_eq!(buffer.buffer_index(), Some(0));
        assert!(!buffer.page_up(2));
    }

    #[test]
    fn page_down_fails_exactly_at_the_end_of_content() {
        let mut buffer = buffer_with(1, &["a", "b", "c", "d", "e"]);
        buffer.enter_buffer(2);
        buffer.move_to_first();
        assert!(buffer.page_down(2));
        assert_eq!(buffer.buffer_index(), Some(2));
        assert!(buffer.page_down(2));
        assert_eq!(buffer.buffer_index(), Some(3));
        assert!(!buffer.page_down(2));
        assert_eq!(buffer.buffer_index(), Some(3));
    }

    #[test]
    fn paging_an_empty_buffer_immediately_signals_the_end() {
        let mut buffer = ScrollbackBuffer::new(4);
        assert!(buffer.enter_buffer(2));
        assert_eq!(buffer.buffer_index(), Some(0));
        assert!(!buffer.page_down(2));
    }

    #[test]
    fn first_and_last_jumps() {
        let mut buffer = buffer_with(1, &["a", "b", "c", "d"]);
        buffer.enter_buffer(2);
        assert!(buffer.move_to_first());
        assert_eq!(buffer.buffer_index(), Some(0));
        assert!(buffer.move_to_last(2));
        assert_eq!(buffer.buffer_index(), Some(2));
    }

    #[test]
    fn view_is_clamped_to_stored_lines() {
        let buffer = buffer_with(1, &["a", "b"]);
        assert_eq!(buffer.get_view(1, 5).len(), 1);
        assert_eq!(buffer.get_view(7, 5).len(), 0);
    }
}
