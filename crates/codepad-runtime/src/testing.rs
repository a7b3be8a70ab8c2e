use crate::command::{Command, CommandInner};
use crate::model::Model;
use crate::runtime::{settle, Settled};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use futures::future::BoxFuture;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;

/// A headless test harness that drives a [`Model`] without a real terminal.
///
/// Terminal events settle exactly as they do under [`Program`](crate::Program):
/// every [`Command::message`] they chain runs before the call returns.
/// Messages injected with [`send`](TestProgram::send) are queued instead and
/// flushed by [`drain_messages`](TestProgram::drain_messages).  Futures from
/// [`Command::perform`] are parked instead of spawned, so a test can observe
/// the state *while* work is outstanding and then resolve it with
/// [`settle`](TestProgram::settle).
///
/// # Example
///
/// ```rust,ignore
/// let mut prog = TestProgram::<Playground>::new(flags);
/// prog.send(Msg::Run);
/// assert_eq!(prog.pending_futures(), 1);   // request in flight
/// prog.settle().await;                      // response delivered
/// assert!(prog.render_string(80, 24).contains("Hello World"));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: Vec<M::Message>,
    pending_futures: Vec<BoxFuture<'static, M::Message>>,
    quit_requested: bool,
}

impl<M: Model> TestProgram<M> {
    /// Create a test program by calling [`Model::init`] with `flags`.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: Vec::new(),
            pending_futures: Vec::new(),
            quit_requested: false,
        };
        program.collect(init_cmd);
        program
    }

    /// Send a message, triggering a single update cycle.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect(cmd);
    }

    /// Route a terminal event through [`Model::on_event`] and settle the
    /// synchronous messages it causes.
    pub fn send_event(&mut self, event: Event) {
        self.drain_messages();
        if let Some(msg) = self.model.on_event(event) {
            let cmd = self.model.update(msg);
            let settled = settle(&mut self.model, cmd);
            self.absorb(settled);
        }
    }

    /// Shorthand for a key press with modifiers.
    pub fn press(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        self.send_event(Event::Key(KeyEvent::new(code, modifiers)));
    }

    /// Type each character of `text` as an unmodified key press.
    pub fn type_str(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    /// Process queued synchronous messages until none are left.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                let cmd = self.model.update(msg);
                self.collect(cmd);
            }
        }
    }

    /// Number of futures waiting to be resolved.
    pub fn pending_futures(&self) -> usize {
        self.pending_futures.len()
    }

    /// Await every parked future in order, feed each result to `update`,
    /// and repeat until no futures or messages remain.
    pub async fn settle(&mut self) {
        self.drain_messages();
        while !self.pending_futures.is_empty() {
            let futures: Vec<_> = self.pending_futures.drain(..).collect();
            for fut in futures {
                let msg = fut.await;
                self.send(msg);
                self.drain_messages();
            }
        }
    }

    /// Whether the model has returned [`Command::quit`].
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Shared reference to the model for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable reference to the model for arranging state directly.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Render the model to a [`Buffer`] of the given size.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| self.model.view(frame)).unwrap();
        terminal.backend().buffer().clone()
    }

    /// Render the model and return the screen as newline-separated rows.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        let buf = self.render(width, height);
        let area = Rect::new(0, 0, width, height);
        let mut output = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                output.push_str(buf[(x, y)].symbol());
            }
            if y < area.bottom() - 1 {
                output.push('\n');
            }
        }
        output
    }

    fn absorb(&mut self, settled: Settled<M::Message>) {
        self.quit_requested |= settled.quit;
        self.pending_futures.extend(settled.futures);
    }

    fn collect(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Message(msg) => self.pending_messages.push(msg),
            CommandInner::Quit => self.quit_requested = true,
            CommandInner::Future(fut) => self.pending_futures.push(fut),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    /// Fetches a number asynchronously and tracks whether it is waiting.
    struct Fetcher {
        value: Option<u32>,
        waiting: bool,
    }

    #[derive(Debug)]
    enum FetchMsg {
        Fetch,
        Fetched(u32),
        Quit,
    }

    impl Model for Fetcher {
        type Message = FetchMsg;
        type Flags = ();

        fn init(_: ()) -> (Self, Command<FetchMsg>) {
            (
                Fetcher {
                    value: None,
                    waiting: false,
                },
                Command::none(),
            )
        }

        fn update(&mut self, msg: FetchMsg) -> Command<FetchMsg> {
            match msg {
                FetchMsg::Fetch if !self.waiting => {
                    self.waiting = true;
                    Command::perform(async { 42 }, FetchMsg::Fetched)
                }
                FetchMsg::Fetch => Command::none(),
                FetchMsg::Fetched(n) => {
                    self.waiting = false;
                    self.value = Some(n);
                    Command::none()
                }
                FetchMsg::Quit => Command::quit(),
            }
        }

        fn view(&self, frame: &mut ratatui::Frame) {
            let text = match self.value {
                Some(n) => format!("value: {n}"),
                None if self.waiting => "waiting".to_string(),
                None => "idle".to_string(),
            };
            frame.render_widget(Paragraph::new(text), frame.area());
        }

        fn on_event(&self, event: Event) -> Option<FetchMsg> {
            match event {
                Event::Key(key) if key.code == KeyCode::Char('f') => Some(FetchMsg::Fetch),
                Event::Key(key) if key.code == KeyCode::Char('q') => Some(FetchMsg::Quit),
                _ => None,
            }
        }
    }

    #[test]
    fn futures_are_parked_not_run() {
        let mut prog = TestProgram::<Fetcher>::new(());
        prog.send(FetchMsg::Fetch);
        assert_eq!(prog.pending_futures(), 1);
        assert!(prog.model().waiting);
        assert!(prog.render_string(20, 1).contains("waiting"));
    }

    #[tokio::test]
    async fn settle_delivers_future_results() {
        let mut prog = TestProgram::<Fetcher>::new(());
        prog.press(KeyCode::Char('f'), KeyModifiers::NONE);
        prog.settle().await;
        assert_eq!(prog.pending_futures(), 0);
        assert_eq!(prog.model().value, Some(42));
        assert!(prog.render_string(20, 1).contains("value: 42"));
    }

    #[test]
    fn unmapped_events_are_ignored() {
        let mut prog = TestProgram::<Fetcher>::new(());
        prog.press(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(prog.pending_futures(), 0);
        assert!(!prog.quit_requested());
    }

    #[test]
    fn quit_is_recorded() {
        let mut prog = TestProgram::<Fetcher>::new(());
        prog.press(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(prog.quit_requested());
    }
}
