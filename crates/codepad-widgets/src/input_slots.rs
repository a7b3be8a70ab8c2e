//! A vertical stack of single-line stdin fields, one per input line.
//!
//! The slot values are owned elsewhere; this component edits a local copy
//! and reports every change as [`Message::Edited`] so the owner can apply it
//! and push the authoritative values back with
//! [`set_values`](InputSlots::set_values).

use codepad_runtime::command::Command;
use codepad_runtime::component::Component;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

/// Messages for the input slots.
#[derive(Debug, Clone)]
pub enum Message {
    /// A keyboard event.
    KeyPress(KeyEvent),
    /// Insert pasted text into the active slot (newlines are dropped).
    Paste(String),
    /// Emitted when the slot at `index` now holds `value`.
    Edited {
        /// Slot position.
        index: usize,
        /// New slot contents.
        value: String,
    },
    /// Emitted on Ctrl+N: the user wants another slot.
    AddRequested,
}

/// Style configuration for the input slots.
#[derive(Debug, Clone)]
pub struct InputSlotsStyle {
    /// Slot label ("Input 1").
    pub label: Style,
    /// Typed text.
    pub text: Style,
    /// Placeholder shown in an empty slot.
    pub placeholder: Style,
    /// Cursor cell.
    pub cursor: Style,
    /// Border when focused.
    pub focused_border: Style,
    /// Border when unfocused.
    pub unfocused_border: Style,
    /// Hint line under the slots.
    pub hint: Style,
}

impl Default for InputSlotsStyle {
    fn default() -> Self {
        Self {
            label: Style::default().fg(Color::Cyan),
            text: Style::default(),
            placeholder: Style::default().fg(Color::DarkGray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            focused_border: Style::default().fg(Color::Cyan),
            unfocused_border: Style::default().fg(Color::DarkGray),
            hint: Style::default().fg(Color::DarkGray),
        }
    }
}

/// Editable stdin lines.
pub struct InputSlots {
    values: Vec<Vec<char>>,
    active: usize,
    cursor: usize,
    focus: bool,
    read_only: bool,
    style: InputSlotsStyle,
}

impl InputSlots {
    /// Create with a single empty slot.
    pub fn new() -> Self {
        Self {
            values: vec![Vec::new()],
            active: 0,
            cursor: 0,
            focus: false,
            read_only: false,
            style: InputSlotsStyle::default(),
        }
    }

    /// Replace all slot values, keeping the active slot and cursor where
    /// they still fit.
    pub fn set_values(&mut self, values: &[String]) {
        self.values = values.iter().map(|v| v.chars().collect()).collect();
        if self.values.is_empty() {
            self.values.push(Vec::new());
        }
        self.active = self.active.min(self.values.len() - 1);
        self.cursor = self.cursor.min(self.values[self.active].len());
    }

    /// Current slot values.
    pub fn values(&self) -> Vec<String> {
        self.values.iter().map(|v| v.iter().collect()).collect()
    }

    /// Index of the slot being edited.
    pub fn active(&self) -> usize {
        self.active
    }

    /// Make slot `index` active with the cursor at its end.
    pub fn activate(&mut self, index: usize) {
        self.active = index.min(self.values.len() - 1);
        self.cursor = self.values[self.active].len();
    }

    /// Reject edits while still allowing navigation.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Give keyboard focus.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Remove keyboard focus.
    pub fn blur(&mut self) {
        self.focus = false;
    }

    /// Rows needed to show every slot plus the hint line and borders.
    pub fn height(&self) -> u16 {
        (self.values.len() as u16).saturating_add(3)
    }

    fn edited(&self) -> Command<Message> {
        Command::message(Message::Edited {
            index: self.active,
            value: self.values[self.active].iter().collect(),
        })
    }

    fn insert(&mut self, text: &str) -> bool {
        let mut changed = false;
        for c in text.chars().filter(|c| !c.is_control()) {
            self.values[self.active].insert(self.cursor, c);
            self.cursor += 1;
            changed = true;
        }
        changed
    }

    fn move_active(&mut self, delta: isize) {
        let last = self.values.len() - 1;
        let next = self.active.saturating_add_signed(delta).min(last);
        if next != self.active {
            self.activate(next);
        }
    }
}

impl Default for InputSlots {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for InputSlots {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.focus => {
                let line_len = self.values[self.active].len();
                match (key.code, key.modifiers) {
                    (KeyCode::Up, _) => self.move_active(-1),
                    (KeyCode::Down | KeyCode::Enter, _) => self.move_active(1),
                    (KeyCode::Left, _) => self.cursor = self.cursor.saturating_sub(1),
                    (KeyCode::Right, _) => self.cursor = (self.cursor + 1).min(line_len),
                    (KeyCode::Home, _) => self.cursor = 0,
                    (KeyCode::End, _) => self.cursor = line_len,
                    _ if self.read_only => {}
                    (KeyCode::Char('n'), KeyModifiers::CONTROL) => {
                        return Command::message(Message::AddRequested);
                    }
                    (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                        self.values[self.active].insert(self.cursor, c);
                        self.cursor += 1;
                        return self.edited();
                    }
                    (KeyCode::Backspace, _) if self.cursor > 0 => {
                        self.cursor -= 1;
                        self.values[self.active].remove(self.cursor);
                        return self.edited();
                    }
                    (KeyCode::Delete, _) if self.cursor < line_len => {
                        self.values[self.active].remove(self.cursor);
                        return self.edited();
                    }
                    _ => {}
                }
                Command::none()
            }
            Message::Paste(text) if self.focus && !self.read_only => {
                if self.insert(&text) {
                    self.edited()
                } else {
                    Command::none()
                }
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
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Custom Inputs (stdin) ");

        let label_width = format!("Input {}", self.values.len()).width();
        let mut lines: Vec<Line> = self
            .values
            .iter()
            .enumerate()
            .map(|(i, chars)| {
                let label = format!("{:<label_width$} ", format!("Input {}", i + 1));
                let mut spans = vec![Span::styled(label, self.style.label)];
                let editing = self.focus && i == self.active;

                if chars.is_empty() && !editing {
                    spans.push(Span::styled(format!("Input {}", i + 1), self.style.placeholder));
                } else if editing {
                    let before: String = chars[..self.cursor].iter().collect();
                    let under = chars
                        .get(self.cursor)
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| " ".into());
                    let after: String = chars.iter().skip(self.cursor + 1).collect();
                    spans.push(Span::styled(before, self.style.text));
                    spans.push(Span::styled(under, self.style.cursor));
                    spans.push(Span::styled(after, self.style.text));
                } else {
                    spans.push(Span::styled(chars.iter().collect::<String>(), self.style.text));
                }
                Line::from(spans)
            })
            .collect();
        lines.push(Line::styled("Ctrl+N add input field", self.style.hint));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
