use crate::command::Command;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a given [`Rect`].
///
/// The parent wraps the component's message type in one of its own
/// variants and lifts returned commands with [`Command::map`]:
///
/// ```rust,ignore
/// Msg::Editor(m) => self.editor.update(m).map(Msg::Editor),
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type.
    type Message: Send + 'static;

    /// Apply a message and return follow-up side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area`.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Whether this component currently has keyboard focus.
    fn focused(&self) -> bool {
        false
    }
}
