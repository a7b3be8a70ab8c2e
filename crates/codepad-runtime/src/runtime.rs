use crate::command::{Command, CommandInner};
use crate::model::Model;
use crossterm::{
    cursor,
    event::{DisableBracketedPaste, EnableBracketedPaste, EventStream},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use futures::future::BoxFuture;
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::collections::VecDeque;
use std::io::{self, stdout, Stdout};
use std::sync::Once;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Errors from terminal setup, drawing or teardown.
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// How a [`Program`] drives the terminal.
///
/// ```rust,ignore
/// let opts = ProgramOptions {
///     fps: 30,
///     title: Some("codepad".into()),
///     ..ProgramOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Redraw rate cap; clamped to 1..=120.  Default 60.
    pub fps: u32,
    /// Draw in the alternate screen.  Default true.
    pub alt_screen: bool,
    /// Receive a paste as one [`crossterm::event::Event::Paste`].  Default true.
    pub bracketed_paste: bool,
    /// Window title to set on startup.
    pub title: Option<String>,
    /// Put the terminal back before a panic message prints.  Default true.
    pub catch_panics: bool,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            bracketed_paste: true,
            title: None,
            catch_panics: true,
        }
    }
}

/// Raw mode plus whatever screen modes were switched on.  Dropping the
/// guard switches them off again, including on early return.
struct TerminalGuard {
    alt_screen: bool,
    bracketed_paste: bool,
}

impl TerminalGuard {
    fn enter(options: &ProgramOptions) -> io::Result<Self> {
        if options.catch_panics {
            install_panic_hook(options.alt_screen, options.bracketed_paste);
        }

        enable_raw_mode()?;
        let guard = Self {
            alt_screen: options.alt_screen,
            bracketed_paste: options.bracketed_paste,
        };
        let mut out = stdout();
        if guard.alt_screen {
            execute!(out, EnterAlternateScreen)?;
        }
        if guard.bracketed_paste {
            execute!(out, EnableBracketedPaste)?;
        }
        if let Some(title) = &options.title {
            execute!(out, SetTitle(title))?;
        }
        execute!(out, cursor::Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = leave_terminal(self.alt_screen, self.bracketed_paste) {
            warn!(error = %err, "failed to restore terminal");
        }
    }
}

/// Undo every mode [`TerminalGuard::enter`] may have set.  Keeps going
/// after a failed step and reports the raw-mode result.
fn leave_terminal(alt_screen: bool, bracketed_paste: bool) -> io::Result<()> {
    let raw = disable_raw_mode();
    let mut out = stdout();
    if bracketed_paste {
        execute!(out, DisableBracketedPaste).ok();
    }
    execute!(out, cursor::Show).ok();
    if alt_screen {
        execute!(out, LeaveAlternateScreen).ok();
    }
    raw
}

fn install_panic_hook(alt_screen: bool, bracketed_paste: bool) {
    static INSTALLED: Once = Once::new();
    INSTALLED.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = leave_terminal(alt_screen, bracketed_paste);
            previous(info);
        }));
    });
}

/// Runs a [`Model`] on the real terminal until it quits.
///
/// Everything that touches the model happens on the task that called
/// [`run`](Program::run).  Futures from [`Command::perform`] are spawned
/// onto tokio; each one sends its message back over a channel when it
/// finishes.
pub struct Program<M: Model> {
    model: M,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    tx: mpsc::UnboundedSender<M::Message>,
    rx: mpsc::UnboundedReceiver<M::Message>,
    fps: u32,
    dirty: bool,
    quitting: bool,
    // Declared last so the terminal is restored after everything else drops.
    _guard: TerminalGuard,
}

impl<M: Model> Program<M> {
    /// Take over the terminal and call [`Model::init`].
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Result<Self, ProgramError> {
        let guard = TerminalGuard::enter(&options)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        let (tx, rx) = mpsc::unbounded_channel();
        let (model, init) = M::init(flags);

        let mut program = Self {
            model,
            terminal,
            tx,
            rx,
            fps: options.fps.clamp(1, 120),
            dirty: true,
            quitting: false,
            _guard: guard,
        };
        debug!(fps = program.fps, "program started");
        program.dispatch(init);
        Ok(program)
    }

    /// Loop until the model returns [`Command::quit`] or Ctrl+C arrives as
    /// a signal, then give the terminal back and return the final model.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        self.event_loop().await?;
        debug!("program finished");
        Ok(self.model)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        self.draw()?;

        let mut ticks = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(self.fps)));
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut events = EventStream::new();

        while !self.quitting {
            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c() => {
                    debug!("interrupted");
                    break;
                }

                Some(event) = events.next() => match event {
                    Ok(event) => {
                        if let Some(msg) = self.model.on_event(event) {
                            self.apply(msg);
                        }
                    }
                    Err(err) => warn!(error = %err, "reading terminal events failed"),
                },

                Some(msg) = self.rx.recv() => self.apply(msg),

                _ = ticks.tick() => {
                    if std::mem::take(&mut self.dirty) {
                        self.draw()?;
                    }
                }
            }
        }
        Ok(())
    }

    fn apply(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.dispatch(cmd);
        self.dirty = true;
    }

    fn dispatch(&mut self, cmd: Command<M::Message>) {
        let outcome = settle(&mut self.model, cmd);
        self.quitting |= outcome.quit;
        for fut in outcome.futures {
            let tx = self.tx.clone();
            tokio::spawn(async move {
                // The receiver lives in the program, so this only fails
                // after it has shut down.
                let _ = tx.send(fut.await);
            });
        }
    }

    fn draw(&mut self) -> Result<(), ProgramError> {
        let model = &self.model;
        self.terminal.draw(|frame| model.view(frame))?;
        Ok(())
    }
}

/// What is left of a command once every message it chains has been
/// through `update`.
pub(crate) struct Settled<Msg> {
    pub(crate) quit: bool,
    pub(crate) futures: Vec<BoxFuture<'static, Msg>>,
}

/// Feed `cmd`'s messages, and the messages those produce, back into
/// `model` in FIFO order before returning.  A key event read after this
/// call therefore sees every state change the previous one caused.
pub(crate) fn settle<M: Model>(model: &mut M, cmd: Command<M::Message>) -> Settled<M::Message> {
    let mut settled = Settled {
        quit: false,
        futures: Vec::new(),
    };
    let mut queue = VecDeque::from([cmd]);
    while let Some(cmd) = queue.pop_front() {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Quit => settled.quit = true,
            CommandInner::Message(msg) => queue.push_back(model.update(msg)),
            CommandInner::Future(fut) => settled.futures.push(fut),
        }
    }
    settled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::Event;
    use ratatui::Frame;

    /// Mimics an editor: a key edits a child, the child reports the new
    /// text as a follow-up message, and Run snapshots whatever text the
    /// parent holds at that moment.
    #[derive(Default)]
    struct Recorder {
        text: String,
        submitted: Vec<String>,
        log: Vec<&'static str>,
    }

    #[derive(Debug)]
    enum Msg {
        Key(char),
        Changed(String),
        Run,
        Finished,
    }

    impl Model for Recorder {
        type Message = Msg;
        type Flags = ();

        fn init(_: ()) -> (Self, Command<Msg>) {
            (Self::default(), Command::none())
        }

        fn update(&mut self, msg: Msg) -> Command<Msg> {
            match msg {
                Msg::Key(c) => {
                    self.log.push("key");
                    Command::message(Msg::Changed(format!("{}{c}", self.text)))
                }
                Msg::Changed(text) => {
                    self.log.push("changed");
                    self.text = text;
                    Command::none()
                }
                Msg::Run => {
                    self.log.push("run");
                    self.submitted.push(self.text.clone());
                    Command::perform(async {}, |_| Msg::Finished)
                }
                Msg::Finished => Command::none(),
            }
        }

        fn view(&self, _frame: &mut Frame) {}

        fn on_event(&self, _event: Event) -> Option<Msg> {
            None
        }
    }

    fn apply(model: &mut Recorder, msg: Msg) -> Settled<Msg> {
        let cmd = model.update(msg);
        settle(model, cmd)
    }

    #[test]
    fn follow_up_messages_run_before_the_next_event() {
        let mut model = Recorder::default();
        apply(&mut model, Msg::Key('x'));
        let outcome = apply(&mut model, Msg::Run);
        assert_eq!(model.submitted, vec!["x".to_string()]);
        assert_eq!(model.log, vec!["key", "changed", "run"]);
        assert_eq!(outcome.futures.len(), 1);
        assert!(!outcome.quit);
    }

    #[test]
    fn quit_is_reported() {
        let mut model = Recorder::default();
        let outcome = settle(&mut model, Command::quit());
        assert!(outcome.quit);
        assert!(outcome.futures.is_empty());
    }
}
