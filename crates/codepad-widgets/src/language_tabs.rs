//! Horizontal language picker.

use codepad_runtime::command::Command;
use codepad_runtime::component::Component;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Tabs;
use ratatui::Frame;

/// Messages for the language tabs.
#[derive(Debug, Clone)]
pub enum Message {
    /// A key press forwarded to the tabs.
    KeyPress(KeyEvent),
    /// Emitted when the user picks a different tab.
    Selected(usize),
}

/// Visual style for [`LanguageTabs`].
#[derive(Debug, Clone)]
pub struct LanguageTabsStyle {
    /// Unselected labels.
    pub normal: Style,
    /// The selected label.
    pub selected: Style,
    /// The selected label while the tabs have focus.
    pub focused: Style,
    /// Every label while switching is disabled.
    pub disabled: Style,
    /// Divider between labels.
    pub divider: String,
}

impl Default for LanguageTabsStyle {
    fn default() -> Self {
        Self {
            normal: Style::default().fg(Color::Gray),
            selected: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            focused: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            disabled: Style::default().fg(Color::DarkGray),
            divider: " | ".to_string(),
        }
    }
}

/// A row of language labels with one selected.
///
/// The tabs never change the selection on their own behalf beyond local
/// highlighting; the owner decides whether a [`Message::Selected`] is
/// accepted and calls [`select`](LanguageTabs::select) with the outcome.
pub struct LanguageTabs {
    titles: Vec<String>,
    selected: usize,
    focus: bool,
    disabled: bool,
    style: LanguageTabsStyle,
}

impl LanguageTabs {
    /// Create tabs with the given labels; the first is selected.
    pub fn new(titles: Vec<String>) -> Self {
        Self {
            titles,
            selected: 0,
            focus: false,
            disabled: false,
            style: LanguageTabsStyle::default(),
        }
    }

    /// Select `index`.  Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.titles.len() {
            self.selected = index;
        }
    }

    /// Ignore input and render dimmed.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Give keyboard focus.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Remove keyboard focus.
    pub fn blur(&mut self) {
        self.focus = false;
    }

    fn request(&self, index: usize) -> Command<Message> {
        if index == self.selected || index >= self.titles.len() {
            Command::none()
        } else {
            Command::message(Message::Selected(index))
        }
    }
}

impl Component for LanguageTabs {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.focus && !self.disabled && !self.titles.is_empty() => {
                let n = self.titles.len();
                match key.code {
                    KeyCode::Left | KeyCode::Char('h') => self.request((self.selected + n - 1) % n),
                    KeyCode::Right | KeyCode::Char('l') => self.request((self.selected + 1) % n),
                    KeyCode::Char(c) => match c.to_digit(10) {
                        Some(d) if d >= 1 => self.request(d as usize - 1),
                        _ => Command::none(),
                    },
                    _ => Command::none(),
                }
            }
            _ => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = self
            .titles
            .iter()
            .enumerate()
            .map(|(i, t)| Line::raw(format!("{} {}", i + 1, t)))
            .collect();

        let (normal, highlight) = if self.disabled {
            (self.style.disabled, self.style.disabled)
        } else if self.focus {
            (self.style.normal, self.style.focused)
        } else {
            (self.style.normal, self.style.selected)
        };

        let tabs = Tabs::new(titles)
            .select(self.selected)
            .style(normal)
            .highlight_style(highlight)
            .divider(self.style.divider.as_str());
        frame.render_widget(tabs, area);
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
