//! TUI application state: editor buffer, modal, theme, status line.

use std::time::Instant;

use crate::session::Session;

/// Color scheme, persisted across sessions under a reserved store key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("light") {
            Self::Light
        } else {
            Self::Dark
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// Save/load name-prompt modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    None,
    Save { name: String },
    Load { name: String },
}

/// Line-based editor buffer with a (row, col) cursor. Columns are character
/// indices; rendering converts to display width.
#[derive(Debug)]
pub struct Editor {
    pub lines: Vec<String>,
    pub row: usize,
    pub col: usize,
}

impl Editor {
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<String> = if text.is_empty() {
            vec![String::new()]
        } else {
            text.split('\n').map(|s| s.to_string()).collect()
        };
        Self { lines, row: 0, col: 0 }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn line(&self) -> &String {
        &self.lines[self.row]
    }

    fn line_chars(&self) -> usize {
        self.line().chars().count()
    }

    fn byte_at(&self, col: usize) -> usize {
        self.line()
            .char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or_else(|| self.line().len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_at(self.col);
        self.lines[self.row].insert(at, c);
        self.col += 1;
    }

    pub fn newline(&mut self) {
        let at = self.byte_at(self.col);
        let rest = self.lines[self.row].split_off(at);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            self.col -= 1;
            let at = self.byte_at(self.col);
            self.lines[self.row].remove(at);
        } else if self.row > 0 {
            let current = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_chars();
            self.lines[self.row].push_str(&current);
        }
    }

    pub fn delete(&mut self) {
        if self.col < self.line_chars() {
            let at = self.byte_at(self.col);
            self.lines[self.row].remove(at);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_chars();
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_chars() {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_chars());
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_chars());
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.line_chars();
    }
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub editor: Editor,
    pub modal: Modal,
    pub theme: Theme,
    pub status_message: String,
    pub show_help: bool,
    /// Lines scrolled up from the bottom of the output pane; 0 follows new
    /// output.
    pub output_scroll: usize,
    /// Timestamp of last Ctrl+C press for double Ctrl+C quit detection.
    pub last_ctrl_c_time: Option<Instant>,
}

impl App {
    pub fn new(code: String, prompt_marker: String, theme: Theme) -> Self {
        let editor = Editor::from_text(&code);
        Self {
            session: Session::new(code, prompt_marker),
            editor,
            modal: Modal::None,
            theme,
            status_message: "Ctrl+R run | Ctrl+S save | Ctrl+O load | F1 help".to_string(),
            show_help: false,
            output_scroll: 0,
            last_ctrl_c_time: None,
        }
    }

    /// Sync the session's code buffer after an editor mutation. The caller
    /// persists the draft.
    pub fn sync_code(&mut self) {
        self.session.code = self.editor.text();
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    pub fn scroll_output_up(&mut self) {
        self.output_scroll += 1;
    }

    pub fn scroll_output_down(&mut self) {
        self.output_scroll = self.output_scroll.saturating_sub(1);
    }

    pub fn scroll_output_to_bottom(&mut self) {
        self.output_scroll = 0;
    }

    /// Handle Ctrl+C press and detect double press for quit.
    /// Returns true if the app should quit.
    pub fn handle_ctrl_c(&mut self) -> bool {
        const DOUBLE_CTRL_C_TIMEOUT: std::time::Duration = std::time::Duration::from_millis(500);

        let now = Instant::now();
        if let Some(last_time) = self.last_ctrl_c_time {
            if now.duration_since(last_time) <= DOUBLE_CTRL_C_TIMEOUT {
                self.last_ctrl_c_time = None;
                return true;
            }
        }

        self.last_ctrl_c_time = Some(now);
        self.set_status("Press Ctrl+C again to quit");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_insert_and_text() {
        let mut e = Editor::from_text("");
        for c in "print(1)".chars() {
            e.insert_char(c);
        }
        assert_eq!(e.text(), "print(1)");
        e.newline();
        e.insert_char('x');
        assert_eq!(e.text(), "print(1)\nx");
    }

    #[test]
    fn editor_backspace_joins_lines() {
        let mut e = Editor::from_text("ab\ncd");
        e.row = 1;
        e.col = 0;
        e.backspace();
        assert_eq!(e.text(), "abcd");
        assert_eq!((e.row, e.col), (0, 2));
    }

    #[test]
    fn editor_newline_splits_at_cursor() {
        let mut e = Editor::from_text("abcd");
        e.col = 2;
        e.newline();
        assert_eq!(e.text(), "ab\ncd");
        assert_eq!((e.row, e.col), (1, 0));
    }

    #[test]
    fn editor_handles_multibyte_chars() {
        let mut e = Editor::from_text("héllo");
        e.col = 2;
        e.backspace();
        assert_eq!(e.text(), "hllo");
        e.insert_char('é');
        assert_eq!(e.text(), "héllo");
    }

    #[test]
    fn editor_delete_joins_next_line() {
        let mut e = Editor::from_text("ab\ncd");
        e.move_end();
        e.delete();
        assert_eq!(e.text(), "abcd");
    }

    #[test]
    fn theme_round_trips() {
        assert_eq!(Theme::parse("light"), Theme::Light);
        assert_eq!(Theme::parse("dark"), Theme::Dark);
        assert_eq!(Theme::parse("??"), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().as_str(), "light");
    }
}
