use std::sync::Arc;

use crate::domain::{ImageItem, SearchState};

/// Presentation-only state. Everything about the search itself lives in
/// `SearchState`, owned by the search session.
pub struct TuiApp {
    pub input: String,
    /// Index into the result list.
    pub cursor: usize,
    /// Grid columns at the last render.
    pub columns: usize,
    /// First grid row on screen.
    pub first_row: usize,
    pub detail_open: bool,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Result list at the last sync. Holding the `Arc`s keeps identity
    /// comparisons valid across reloads.
    shown: Vec<Arc<ImageItem>>,
    had_selection: bool,
}

impl TuiApp {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
            columns: 1,
            first_row: 0,
            detail_open: false,
            should_quit: false,
            status_message: None,
            shown: Vec::new(),
            had_selection: false,
        }
    }

    /// Follow a new session state: a fresh result list resets the cursor,
    /// and a selection going away closes the detail view. The detail view
    /// may open before the session has recorded the selection.
    pub fn sync(&mut self, state: &SearchState) {
        if !same_list(&self.shown, &state.results) {
            self.shown = state.results.clone();
            self.cursor = 0;
            self.first_row = 0;
        }

        match (&state.current_item, self.had_selection) {
            (Some(_), _) => self.had_selection = true,
            (None, true) => {
                self.had_selection = false;
                self.detail_open = false;
            }
            (None, false) => {}
        }

        if self.cursor >= state.results.len() {
            self.cursor = state.results.len().saturating_sub(1);
        }
    }

    pub fn highlighted<'a>(&self, state: &'a SearchState) -> Option<&'a Arc<ImageItem>> {
        state.results.get(self.cursor)
    }

    pub fn push_char(&mut self, c: char) -> String {
        self.input.push(c);
        self.input.clone()
    }

    /// Remove the last character. `None` when the input was already empty.
    pub fn pop_char(&mut self) -> Option<String> {
        self.input.pop()?;
        Some(self.input.clone())
    }

    /// Empty the input. `false` when there was nothing to clear.
    pub fn clear_input(&mut self) -> bool {
        let had_input = !self.input.is_empty();
        self.input.clear();
        had_input
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self, len: usize) {
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor >= self.columns {
            self.cursor -= self.columns;
        }
    }

    pub fn move_down(&mut self, len: usize) {
        if self.cursor + self.columns < len {
            self.cursor += self.columns;
        }
    }

    pub fn cursor_row(&self) -> usize {
        self.cursor / self.columns.max(1)
    }

    /// Scroll the grid so the cursor row is one of the `visible_rows` shown.
    pub fn scroll_to_cursor(&mut self, visible_rows: usize) {
        let row = self.cursor_row();
        let visible_rows = visible_rows.max(1);
        if row < self.first_row {
            self.first_row = row;
        } else if row >= self.first_row + visible_rows {
            self.first_row = row + 1 - visible_rows;
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

fn same_list(a: &[Arc<ImageItem>], b: &[Arc<ImageItem>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Arc::ptr_eq(x, y))
}

impl Default for TuiApp {
    fn default() -> Self {
        Self::new()
    }
}
