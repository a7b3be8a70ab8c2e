//! One-row status line with left, center and right sections.
//!
//! Stateless: build it fresh in each `view()` and call
//! [`render`](StatusBar::render).

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

/// A three-section status bar.
pub struct StatusBar<'a> {
    left: Option<Line<'a>>,
    center: Option<Line<'a>>,
    right: Option<Line<'a>>,
    style: Style,
}

impl<'a> StatusBar<'a> {
    /// Create an empty status bar.
    pub fn new() -> Self {
        Self {
            left: None,
            center: None,
            right: None,
            style: Style::default(),
        }
    }

    /// Set the left-aligned content.
    pub fn left(mut self, content: impl Into<Line<'a>>) -> Self {
        self.left = Some(content.into());
        self
    }

    /// Set the centered content.
    pub fn center(mut self, content: impl Into<Line<'a>>) -> Self {
        self.center = Some(content.into());
        self
    }

    /// Set the right-aligned content.
    pub fn right(mut self, content: impl Into<Line<'a>>) -> Self {
        self.right = Some(content.into());
        self
    }

    /// Base style for the whole row.
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Render into `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let [left, center, right] = Layout::horizontal([
            Constraint::Percentage(40),
            Constraint::Percentage(20),
            Constraint::Percentage(40),
        ])
        .areas(area);

        frame.render_widget(Block::default().style(self.style), area);

        let sections = [
            (&self.left, left, Alignment::Left),
            (&self.center, center, Alignment::Center),
            (&self.right, right, Alignment::Right),
        ];
        for (line, rect, alignment) in sections {
            if let Some(line) = line {
                let p = Paragraph::new(line.clone().patch_style(self.style)).alignment(alignment);
                frame.render_widget(p, rect);
            }
        }
    }
}

impl Default for StatusBar<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format `(key, action)` pairs as `key action  key action`, keys in bold.
pub fn key_hints<'a>(hints: &[(&'a str, &'a str)]) -> Line<'a> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, bold));
        spans.push(Span::raw(format!(" {action}")));
    }
    Line::from(spans)
}
