//! Scrollable, colour-coded program output.

use std::cell::Cell;

use codepad_runtime::command::Command;
use codepad_runtime::component::Component;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{
    Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Messages for the output console.
#[derive(Debug, Clone)]
pub enum Message {
    /// A key press forwarded to the console.
    KeyPress(KeyEvent),
}

/// Style configuration for the console.
#[derive(Debug, Clone)]
pub struct OutputConsoleStyle {
    /// Normal program output.
    pub ok: Style,
    /// Output that mentions an error.
    pub error: Style,
    /// Placeholder before anything has run.
    pub placeholder: Style,
    /// Border when focused.
    pub focused_border: Style,
    /// Border when unfocused.
    pub unfocused_border: Style,
}

impl Default for OutputConsoleStyle {
    fn default() -> Self {
        Self {
            ok: Style::default().fg(Color::Green),
            error: Style::default().fg(Color::LightRed),
            placeholder: Style::default().fg(Color::DarkGray),
            focused_border: Style::default().fg(Color::Cyan),
            unfocused_border: Style::default().fg(Color::DarkGray),
        }
    }
}

/// Read-only output pane.
pub struct OutputConsole {
    content: String,
    is_error: bool,
    placeholder: String,
    offset: u16,
    focus: bool,
    style: OutputConsoleStyle,
    /// Updated during each `view()` call.
    visible_height: Cell<u16>,
    visible_width: Cell<u16>,
}

impl OutputConsole {
    /// Create an empty console showing `placeholder`.
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            is_error: false,
            placeholder: placeholder.into(),
            offset: 0,
            focus: false,
            style: OutputConsoleStyle::default(),
            visible_height: Cell::new(0),
            visible_width: Cell::new(0),
        }
    }

    /// Replace the displayed text.  Scrolls back to the top when the text
    /// actually changes.
    pub fn set_content(&mut self, content: &str, is_error: bool) {
        if self.content != content {
            self.content = content.to_string();
            self.offset = 0;
        }
        self.is_error = is_error;
    }

    /// The displayed text (empty while the placeholder shows).
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether the text renders in error colour.
    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Current scroll offset in screen rows.
    pub fn offset(&self) -> u16 {
        self.offset
    }

    /// Give keyboard focus.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Remove keyboard focus.
    pub fn blur(&mut self) {
        self.focus = false;
    }

    /// The content as screen rows at the last rendered width.  Before the
    /// first render the width is unknown and nothing wraps.
    fn rows(&self) -> Vec<String> {
        match self.visible_width.get() {
            0 => wrap_rows(&self.content, usize::MAX),
            width => wrap_rows(&self.content, width as usize),
        }
    }

    fn line_count(&self) -> u16 {
        self.rows().len().min(u16::MAX as usize) as u16
    }

    fn max_offset(&self) -> u16 {
        self.line_count().saturating_sub(self.visible_height.get().max(1))
    }

    fn page(&self) -> u16 {
        self.visible_height.get().max(1)
    }

    fn scroll_down(&mut self, n: u16) {
        self.offset = self.offset.saturating_add(n).min(self.max_offset());
    }

    fn scroll_up(&mut self, n: u16) {
        self.offset = self.offset.saturating_sub(n);
    }
}

impl Component for OutputConsole {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.focus => match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.scroll_up(1),
                KeyCode::Down | KeyCode::Char('j') => self.scroll_down(1),
                KeyCode::PageUp => self.scroll_up(self.page()),
                KeyCode::PageDown => self.scroll_down(self.page()),
                KeyCode::Home | KeyCode::Char('g') => self.offset = 0,
                KeyCode::End | KeyCode::Char('G') => self.offset = self.max_offset(),
                _ => {}
            },
            Message::KeyPress(_) => {}
        }
        Command::none()
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focus {
            self.style.focused_border
        } else {
            self.style.unfocused_border
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Output ");
        let inner = block.inner(area);
        self.visible_height.set(inner.height);
        self.visible_width.set(inner.width);

        let paragraph = if self.content.is_empty() {
            Paragraph::new(self.placeholder.as_str()).style(self.style.placeholder)
        } else {
            let style = if self.is_error {
                self.style.error
            } else {
                self.style.ok
            };
            let rows: Vec<Line> = self.rows().into_iter().map(Line::from).collect();
            // A resize can shrink the range below the stored offset.
            let offset = self.offset.min(self.max_offset());
            Paragraph::new(rows).style(style).scroll((offset, 0))
        };
        frame.render_widget(paragraph.block(block), area);

        let lines = self.line_count();
        if lines > inner.height {
            let offset = self.offset.min(self.max_offset());
            let mut state =
                ScrollbarState::new(self.max_offset() as usize).position(offset as usize);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area,
                &mut state,
            );
        }
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

/// Split `text` into rows at most `width` columns wide, breaking after the
/// last space where there is one and mid-word otherwise.  Tabs count as
/// four spaces.
fn wrap_rows(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for line in text.lines() {
        let line = line.replace('\t', "    ");
        let mut row = String::new();
        let mut used = 0;
        for c in line.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > width && !row.is_empty() {
                let carry = match row.rfind(' ') {
                    Some(i) if i + 1 < row.len() => row.split_off(i + 1),
                    _ => String::new(),
                };
                rows.push(std::mem::replace(&mut row, carry));
                used = row.width();
            }
            row.push(c);
            used += w;
        }
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn key(console: &mut OutputConsole, code: KeyCode) {
        console.update(Message::KeyPress(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn numbered(n: usize) -> String {
        (1..=n).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn starts_empty() {
        let console = OutputConsole::new("Output will appear here...");
        assert_eq!(console.content(), "");
        assert!(!console.is_error());
    }

    #[test]
    fn scroll_is_clamped_to_content() {
        let mut console = OutputConsole::new("");
        console.visible_height.set(5);
        console.set_content(&numbered(8), false);
        console.focus();
        key(&mut console, KeyCode::PageDown);
        assert_eq!(console.offset(), 3);
        key(&mut console, KeyCode::Down);
        assert_eq!(console.offset(), 3);
        key(&mut console, KeyCode::Home);
        assert_eq!(console.offset(), 0);
    }

    #[test]
    fn new_content_resets_scroll() {
        let mut console = OutputConsole::new("");
        console.visible_height.set(2);
        console.set_content(&numbered(10), false);
        console.focus();
        for _ in 0..4 {
            key(&mut console, KeyCode::Down);
        }
        assert_eq!(console.offset(), 4);
        console.set_content("done", true);
        assert_eq!(console.offset(), 0);
        assert!(console.is_error());
    }

    #[test]
    fn unfocused_console_ignores_keys() {
        let mut console = OutputConsole::new("");
        console.visible_height.set(2);
        console.set_content(&numbered(10), false);
        key(&mut console, KeyCode::End);
        assert_eq!(console.offset(), 0);
    }

    fn screen(console: &OutputConsole, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| console.view(f, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn long_diagnostics_wrap_inside_the_pane() {
        let mut console = OutputConsole::new("");
        console.set_content(
            "main.c:3:5: error: expected ';' before 'return' TAIL_MARKER",
            true,
        );
        let shown = screen(&console, 30, 6);
        assert!(shown.contains("main.c:3:5: error:"));
        assert!(shown.contains("TAIL_MARKER"), "{shown}");
    }

    #[test]
    fn scroll_range_counts_wrapped_rows() {
        let mut console = OutputConsole::new("");
        console.set_content(&"word ".repeat(30), false);
        screen(&console, 12, 5);
        // 150 columns at 10 per row, 3 rows visible.
        assert_eq!(console.line_count(), 15);
        console.focus();
        key(&mut console, KeyCode::End);
        assert_eq!(console.offset(), 12);
    }

    #[test]
    fn wrap_breaks_after_spaces_and_splits_long_words() {
        assert_eq!(wrap_rows("ab cd ef", 5), vec!["ab ", "cd ef"]);
        assert_eq!(wrap_rows("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(wrap_rows("a\n\nb", 10), vec!["a", "", "b"]);
    }
}
