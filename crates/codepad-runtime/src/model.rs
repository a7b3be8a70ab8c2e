use crate::command::Command;
use crossterm::event::Event;
use ratatui::Frame;

/// The top-level application trait.
///
/// The runtime drives an **init -> update -> view** cycle:
///
/// 1. [`init`](Model::init) builds the initial state and may return a
///    [`Command`] for early side effects.
/// 2. [`view`](Model::view) renders the current state to a [`Frame`].
/// 3. Terminal input is turned into messages by
///    [`on_event`](Model::on_event); async work finishes as messages
///    produced by [`Command::perform`].
/// 4. [`update`](Model::update) applies each message and may return more
///    commands.
///
/// `update` always runs on the runtime's single event-loop task, so a model
/// never sees two messages at once.
pub trait Model: Sized + Send + 'static {
    /// Every event that can change the model.
    type Message: Send + 'static;

    /// Startup data passed to [`Model::init`].
    type Flags: Send + 'static;

    /// Create the initial state and an optional startup command.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Apply a message and return follow-up side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render the current state.  Must not mutate the model.
    fn view(&self, frame: &mut Frame);

    /// Map a raw terminal event to a message, or `None` to ignore it.
    ///
    /// The default ignores everything.
    fn on_event(&self, event: Event) -> Option<Self::Message> {
        let _ = event;
        None
    }
}
