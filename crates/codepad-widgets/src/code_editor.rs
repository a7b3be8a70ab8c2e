//! Multi-line source editor pane with line numbers and auto-indent.
//!
//! Deliberately plain: characters in, characters out.  There is no syntax
//! highlighting and no undo history; the editor only reports the full text
//! after every change so the owner can re-run input detection.

use codepad_runtime::command::Command;
use codepad_runtime::component::Component;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Messages for the code editor.
#[derive(Debug, Clone)]
pub enum Message {
    /// A keyboard event.
    KeyPress(KeyEvent),
    /// Insert text at the cursor (bracketed paste).
    Paste(String),
    /// Emitted with the full text after every edit.
    Changed(String),
}

/// Style configuration for the editor.
#[derive(Debug, Clone)]
pub struct CodeEditorStyle {
    /// Regular text.
    pub text: Style,
    /// Text while the editor is read-only.
    pub read_only_text: Style,
    /// The character under the cursor.
    pub cursor: Style,
    /// Line number gutter.
    pub line_number: Style,
    /// Border when focused.
    pub focused_border: Style,
    /// Border when unfocused.
    pub unfocused_border: Style,
}

impl Default for CodeEditorStyle {
    fn default() -> Self {
        Self {
            text: Style::default(),
            read_only_text: Style::default().fg(Color::DarkGray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            line_number: Style::default().fg(Color::DarkGray),
            focused_border: Style::default().fg(Color::Cyan),
            unfocused_border: Style::default().fg(Color::DarkGray),
        }
    }
}

/// The source editor.
///
/// # Example
///
/// ```ignore
/// let mut editor = CodeEditor::new()
///     .with_content("print(\"Hello World\")")
///     .with_indent_width(4)
///     .with_title("python");
/// editor.focus();
/// ```
pub struct CodeEditor {
    lines: Vec<Vec<char>>,
    cursor_row: usize,
    cursor_col: usize,
    focus: bool,
    read_only: bool,
    indent_width: usize,
    title: String,
    style: CodeEditorStyle,
}

impl CodeEditor {
    /// Create an empty editor.
    pub fn new() -> Self {
        Self {
            lines: vec![Vec::new()],
            cursor_row: 0,
            cursor_col: 0,
            focus: false,
            read_only: false,
            indent_width: 4,
            title: String::new(),
            style: CodeEditorStyle::default(),
        }
    }

    /// Initialize with the given text.
    pub fn with_content(mut self, content: &str) -> Self {
        self.set_value(content);
        self
    }

    /// Spaces inserted by Tab.
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Title shown in the top border.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Change the Tab width.
    pub fn set_indent_width(&mut self, width: usize) {
        self.indent_width = width;
    }

    /// Change the border title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Reject edits while still allowing cursor movement.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Whether edits are currently rejected.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Give the editor keyboard focus.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Remove keyboard focus.
    pub fn blur(&mut self) {
        self.focus = false;
    }

    /// The full text, lines joined with `\n`.
    pub fn value(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Replace the text and move the cursor to the start.
    pub fn set_value(&mut self, content: &str) {
        // split('\n') keeps a trailing empty line, unlike str::lines().
        self.lines = content
            .split('\n')
            .map(|l| l.trim_end_matches('\r').chars().collect())
            .collect();
        self.cursor_row = 0;
        self.cursor_col = 0;
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Cursor row.
    pub fn cursor_row(&self) -> usize {
        self.cursor_row
    }

    /// Cursor column, in characters.
    pub fn cursor_col(&self) -> usize {
        self.cursor_col
    }

    /// Insert text at the cursor, splitting lines on `\n`.
    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '\n' => self.split_line(),
                '\r' => {}
                '\t' => self.insert_indent(),
                c => self.insert_char(c),
            }
        }
    }

    fn insert_char(&mut self, c: char) {
        self.lines[self.cursor_row].insert(self.cursor_col, c);
        self.cursor_col += 1;
    }

    fn insert_indent(&mut self) {
        for _ in 0..self.indent_width {
            self.insert_char(' ');
        }
    }

    fn split_line(&mut self) {
        let rest = self.lines[self.cursor_row].split_off(self.cursor_col);
        self.cursor_row += 1;
        self.cursor_col = 0;
        self.lines.insert(self.cursor_row, rest);
    }

    /// Enter: split the line and carry the previous line's indentation.
    fn newline_with_indent(&mut self) {
        let indent: Vec<char> = self.lines[self.cursor_row]
            .iter()
            .take_while(|c| **c == ' ' || **c == '\t')
            .copied()
            .collect();
        self.split_line();
        for c in indent {
            self.insert_char(c);
        }
    }

    fn backspace(&mut self) -> bool {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
            self.lines[self.cursor_row].remove(self.cursor_col);
            true
        } else if self.cursor_row > 0 {
            let current = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.lines[self.cursor_row].len();
            self.lines[self.cursor_row].extend(current);
            true
        } else {
            false
        }
    }

    fn delete(&mut self) -> bool {
        if self.cursor_col < self.current_line_len() {
            self.lines[self.cursor_row].remove(self.cursor_col);
            true
        } else if self.cursor_row + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].extend(next);
            true
        } else {
            false
        }
    }

    fn current_line_len(&self) -> usize {
        self.lines[self.cursor_row].len()
    }

    fn clamp_cursor_col(&mut self) {
        self.cursor_col = self.cursor_col.min(self.current_line_len());
    }

    fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.current_line_len();
        }
    }

    fn move_right(&mut self) {
        if self.cursor_col < self.current_line_len() {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    fn move_rows(&mut self, delta: isize) {
        let last = self.lines.len() - 1;
        self.cursor_row = self.cursor_row.saturating_add_signed(delta).min(last);
        self.clamp_cursor_col();
    }

    /// Apply an editing key.  Returns `true` if the text changed.
    fn edit(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.insert_char(c);
                true
            }
            (KeyCode::Enter, _) => {
                self.newline_with_indent();
                true
            }
            (KeyCode::Tab, KeyModifiers::NONE) => {
                self.insert_indent();
                true
            }
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete(),
            _ => false,
        }
    }

    /// Apply a navigation key.  Returns `true` if the key was handled.
    fn navigate(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Up => self.move_rows(-1),
            KeyCode::Down => self.move_rows(1),
            KeyCode::PageUp => self.move_rows(-10),
            KeyCode::PageDown => self.move_rows(10),
            KeyCode::Home => self.cursor_col = 0,
            KeyCode::End => self.cursor_col = self.current_line_len(),
            _ => return false,
        }
        true
    }
}

impl Default for CodeEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for CodeEditor {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.focus => {
                if self.navigate(key) || self.read_only {
                    return Command::none();
                }
                if self.edit(key) {
                    Command::message(Message::Changed(self.value()))
                } else {
                    Command::none()
                }
            }
            Message::Paste(text) if self.focus && !self.read_only => {
                self.insert_str(&text);
                Command::message(Message::Changed(self.value()))
            }
            _ => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focus {
            self.style.focused_border
        } else {
            self.style.unfocused_border
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);
        if !self.title.is_empty() {
            block = block.title(format!(" {} ", self.title));
        }

        let inner = block.inner(area);
        let visible_height = (inner.height as usize).max(1);
        // Keep the cursor row on screen, pinned to the bottom edge when below it.
        let scroll = self.cursor_row.saturating_sub(visible_height - 1);
        let gutter = self.lines.len().to_string().len();
        let text_width = (inner.width as usize).saturating_sub(gutter + 1).max(1);
        // Same for the cursor column against the right edge.
        let hscroll = self.cursor_col.saturating_sub(text_width - 1);
        let text_style = if self.read_only {
            self.style.read_only_text
        } else {
            self.style.text
        };

        let end = self.lines.len().min(scroll + visible_height);
        let display_lines: Vec<Line> = self.lines[scroll..end]
            .iter()
            .enumerate()
            .map(|(i, chars)| {
                let row = scroll + i;
                let mut spans = vec![Span::styled(
                    format!("{:>gutter$} ", row + 1),
                    self.style.line_number,
                )];

                let shown = chars.get(hscroll..).unwrap_or(&[]);
                if self.focus && row == self.cursor_row {
                    let col = self.cursor_col - hscroll;
                    let before: String = shown[..col].iter().collect();
                    let under = shown.get(col).map(|c| c.to_string()).unwrap_or_else(|| " ".into());
                    let after: String = shown.iter().skip(col + 1).collect();
                    spans.push(Span::styled(before, text_style));
                    spans.push(Span::styled(under, self.style.cursor));
                    spans.push(Span::styled(after, text_style));
                } else {
                    spans.push(Span::styled(shown.iter().collect::<String>(), text_style));
                }
                Line::from(spans)
            })
            .collect();

        frame.render_widget(Paragraph::new(display_lines).block(block), area);
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn send_key(ed: &mut CodeEditor, code: KeyCode, modifiers: KeyModifiers) -> Command<Message> {
        ed.update(Message::KeyPress(KeyEvent::new(code, modifiers)))
    }

    fn focused(content: &str) -> CodeEditor {
        let mut ed = CodeEditor::new().with_content(content);
        ed.focus();
        ed
    }

    #[test]
    fn new_editor_is_empty() {
        let ed = CodeEditor::new();
        assert_eq!(ed.value(), "");
        assert_eq!(ed.line_count(), 1);
    }

    #[test]
    fn content_round_trips_with_trailing_newline() {
        let ed = CodeEditor::new().with_content("a\nb\n");
        assert_eq!(ed.line_count(), 3);
        assert_eq!(ed.value(), "a\nb\n");
    }

    #[test]
    fn typing_emits_changed() {
        let mut ed = focused("");
        let cmd = send_key(&mut ed, KeyCode::Char('x'), KeyModifiers::NONE);
        match cmd.into_message() {
            Some(Message::Changed(text)) => assert_eq!(text, "x"),
            other => panic!("expected Changed, got {other:?}"),
        }
    }

    #[test]
    fn unfocused_editor_ignores_keys() {
        let mut ed = CodeEditor::new();
        let cmd = send_key(&mut ed, KeyCode::Char('x'), KeyModifiers::NONE);
        assert!(cmd.is_none());
        assert_eq!(ed.value(), "");
    }

    #[test]
    fn navigation_does_not_emit_changed() {
        let mut ed = focused("abc");
        assert!(send_key(&mut ed, KeyCode::End, KeyModifiers::NONE).is_none());
        assert_eq!(ed.cursor_col(), 3);
    }

    #[test]
    fn read_only_blocks_edits_but_not_movement() {
        let mut ed = focused("abc");
        ed.set_read_only(true);
        assert!(send_key(&mut ed, KeyCode::Char('x'), KeyModifiers::NONE).is_none());
        assert!(ed.update(Message::Paste("zzz".into())).is_none());
        send_key(&mut ed, KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(ed.value(), "abc");
        assert_eq!(ed.cursor_col(), 1);
    }

    #[test]
    fn enter_keeps_indentation() {
        let mut ed = focused("int main() {\n  return 0;");
        send_key(&mut ed, KeyCode::Down, KeyModifiers::NONE);
        send_key(&mut ed, KeyCode::End, KeyModifiers::NONE);
        send_key(&mut ed, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(ed.value(), "int main() {\n  return 0;\n  ");
        assert_eq!(ed.cursor_col(), 2);
    }

    #[test]
    fn tab_uses_indent_width() {
        let mut ed = focused("").with_indent_width(2);
        ed.focus();
        send_key(&mut ed, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(ed.value(), "  ");
    }

    #[test]
    fn backspace_joins_lines() {
        let mut ed = focused("ab\ncd");
        send_key(&mut ed, KeyCode::Down, KeyModifiers::NONE);
        send_key(&mut ed, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(ed.value(), "abcd");
        assert_eq!((ed.cursor_row(), ed.cursor_col()), (0, 2));
    }

    #[test]
    fn backspace_at_origin_is_noop() {
        let mut ed = focused("ab");
        assert!(send_key(&mut ed, KeyCode::Backspace, KeyModifiers::NONE).is_none());
    }

    #[test]
    fn delete_at_end_joins_next_line() {
        let mut ed = focused("ab\ncd");
        send_key(&mut ed, KeyCode::End, KeyModifiers::NONE);
        send_key(&mut ed, KeyCode::Delete, KeyModifiers::NONE);
        assert_eq!(ed.value(), "abcd");
    }

    #[test]
    fn paste_splits_lines() {
        let mut ed = focused("");
        ed.update(Message::Paste("x = input()\nprint(x)".into()));
        assert_eq!(ed.line_count(), 2);
        assert_eq!(ed.value(), "x = input()\nprint(x)");
    }

    #[test]
    fn vertical_movement_clamps_column() {
        let mut ed = focused("long line\nab");
        send_key(&mut ed, KeyCode::End, KeyModifiers::NONE);
        send_key(&mut ed, KeyCode::Down, KeyModifiers::NONE);
        assert_eq!((ed.cursor_row(), ed.cursor_col()), (1, 2));
        send_key(&mut ed, KeyCode::PageDown, KeyModifiers::NONE);
        assert_eq!(ed.cursor_row(), 1);
    }

    fn screen(ed: &CodeEditor, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| ed.view(f, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn end_of_long_line_stays_on_screen() {
        let mut ed = focused("printf(\"%d\\n\", a + b); // END_MARKER");
        assert!(!screen(&ed, 20, 3).contains("END_MARKER"));
        send_key(&mut ed, KeyCode::End, KeyModifiers::NONE);
        let shown = screen(&ed, 20, 3);
        assert!(shown.contains("END_MARKER"), "{shown}");
        assert!(shown.contains("1 "));
        send_key(&mut ed, KeyCode::Home, KeyModifiers::NONE);
        assert!(screen(&ed, 20, 3).contains("printf"));
    }
}
