//! The playground screen.
//!
//! [`Playground`] is the only [`Model`] in the binary.  It owns the
//! [`Session`] and the panes; panes report user intent as messages, the
//! session decides whether the intent is allowed, and
//! [`sync_panes`](Playground::sync_panes) pushes the outcome back into
//! every pane.
//!
//! ```text
//!  ┌ codepad ── 1 Python | 2 C | 3 C++ ──────────────────────────┐
//!  │┌ python ─────────────────────┐┌ Custom Inputs (stdin) ─────┐│
//!  ││ 1 name = input()            ││ Input 1  World             ││
//!  ││                             │└────────────────────────────┘│
//!  ││                             │ Run ▶  (Ctrl+R)              │
//!  ││                             │┌ Output ────────────────────┐│
//!  ││                             ││ Hello World                ││
//!  │└─────────────────────────────┘└────────────────────────────┘│
//!  │ Python (judge0 #71)  Completed          ^R run  F2 focus ...│
//!  └─────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use codepad_core::{
    EngineResponse, ExecutionEngine, LanguageId, PendingRun, Registry, Rejected, RunStatus,
    RunTicket, Session, TransportError,
};
use codepad_runtime::{Command, Component, Model};
use codepad_widgets::{
    code_editor, input_slots, language_tabs, output_console, status_bar, CodeEditor, FocusRing,
    InputSlots, LanguageTabs, OutputConsole, StatusBar,
};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tracing::{debug, info};

/// Shown in the output pane before the first run.
pub const OUTPUT_PLACEHOLDER: &str = "Output will appear here...";

const RUN_LABEL: &str = "Run ▶";
const RUNNING_LABEL: &str = "Running...";

/// Startup data for [`Playground`].
pub struct PlaygroundFlags {
    pub registry: Registry,
    pub engine: Arc<dyn ExecutionEngine>,
    pub language: LanguageId,
    /// Replaces the language template when present.
    pub initial_source: Option<String>,
}

/// Focusable regions, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Tabs,
    Editor,
    Inputs,
    Output,
}

#[derive(Debug)]
pub enum Msg {
    Key(KeyEvent),
    Paste(String),
    /// Terminal size changed; only forces a redraw.
    Resize,
    Run,
    RunFinished(RunTicket, Result<EngineResponse, TransportError>),
    Tabs(language_tabs::Message),
    Editor(code_editor::Message),
    Inputs(input_slots::Message),
    Output(output_console::Message),
}

pub struct Playground {
    session: Session,
    engine: Arc<dyn ExecutionEngine>,
    focus: FocusRing<Pane, 4>,
    tabs: LanguageTabs,
    editor: CodeEditor,
    inputs: InputSlots,
    output: OutputConsole,
    /// Why the last action was refused, until the next key press.
    notice: Option<String>,
}

impl Playground {
    /// The session behind the screen.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Which pane receives keys.
    pub fn focused_pane(&self) -> Pane {
        self.focus.current()
    }

    /// Last refusal message, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn is_visible(&self, pane: Pane) -> bool {
        pane != Pane::Inputs || self.session.state().requires_input
    }

    fn cycle_focus(&mut self, forward: bool) {
        loop {
            let pane = if forward { self.focus.next() } else { self.focus.prev() };
            if self.is_visible(pane) {
                break;
            }
        }
        self.apply_focus();
    }

    fn apply_focus(&mut self) {
        if !self.is_visible(self.focus.current()) {
            self.focus.focus(Pane::Editor);
        }
        let current = self.focus.current();
        if current == Pane::Tabs {
            self.tabs.focus();
        } else {
            self.tabs.blur();
        }
        if current == Pane::Editor {
            self.editor.focus();
        } else {
            self.editor.blur();
        }
        if current == Pane::Inputs {
            self.inputs.focus();
        } else {
            self.inputs.blur();
        }
        if current == Pane::Output {
            self.output.focus();
        } else {
            self.output.blur();
        }
    }

    /// Push session state into every pane.  The editor text is only
    /// replaced when `reload_source` is set, since the editor is usually the
    /// origin of the text and replacing it would reset the cursor.
    fn sync_panes(&mut self, reload_source: bool) {
        let running = self.session.is_running();
        let profile = self.session.profile();
        let mode = profile.editor_mode;

        self.tabs.select(profile.id.index());
        self.tabs.set_disabled(running);

        self.editor.set_indent_width(mode.indent_width());
        self.editor.set_title(mode.label());
        self.editor.set_read_only(running);
        if reload_source {
            let source = self.session.state().source_text.clone();
            self.editor.set_value(&source);
        }

        self.inputs.set_values(&self.session.state().custom_inputs);
        self.inputs.set_read_only(running);

        self.output
            .set_content(self.session.display_output(), self.session.is_error_output());

        self.apply_focus();
    }

    fn refuse(&mut self, action: &str, reason: Rejected) {
        debug!(action, %reason, "action rejected");
        self.notice = Some(reason.to_string());
    }

    fn start_run(&mut self) -> Command<Msg> {
        match self.session.begin_run() {
            Ok(PendingRun { ticket, request }) => {
                self.sync_panes(false);
                let call = self.engine.execute(request);
                Command::perform(call, move |outcome| Msg::RunFinished(ticket, outcome))
            }
            Err(reason) => {
                self.refuse("run", reason);
                Command::none()
            }
        }
    }

    fn select_language(&mut self, index: usize) {
        let Some(&id) = LanguageId::ALL.get(index) else {
            return;
        };
        match self.session.select_language(id) {
            Ok(()) => {
                info!(language = %id, "language switched");
                self.sync_panes(true);
            }
            Err(reason) => {
                self.refuse("select language", reason);
                self.sync_panes(false);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Msg> {
        self.notice = None;
        match (key.code, key.modifiers) {
            (KeyCode::Char('c' | 'q'), KeyModifiers::CONTROL) => Command::quit(),
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => self.start_run(),
            (KeyCode::F(2), _) => {
                self.cycle_focus(true);
                Command::none()
            }
            (KeyCode::BackTab, _) => {
                self.cycle_focus(false);
                Command::none()
            }
            (KeyCode::Tab, KeyModifiers::NONE) if self.focus.current() != Pane::Editor => {
                self.cycle_focus(true);
                Command::none()
            }
            _ => self.route_to_focused(key),
        }
    }

    fn route_to_focused(&mut self, key: KeyEvent) -> Command<Msg> {
        match self.focus.current() {
            Pane::Tabs => self
                .tabs
                .update(language_tabs::Message::KeyPress(key))
                .map(Msg::Tabs),
            Pane::Editor => self
                .editor
                .update(code_editor::Message::KeyPress(key))
                .map(Msg::Editor),
            Pane::Inputs => self
                .inputs
                .update(input_slots::Message::KeyPress(key))
                .map(Msg::Inputs),
            Pane::Output => self
                .output
                .update(output_console::Message::KeyPress(key))
                .map(Msg::Output),
        }
    }

    fn handle_paste(&mut self, text: String) -> Command<Msg> {
        match self.focus.current() {
            Pane::Editor => self
                .editor
                .update(code_editor::Message::Paste(text))
                .map(Msg::Editor),
            Pane::Inputs => self
                .inputs
                .update(input_slots::Message::Paste(text))
                .map(Msg::Inputs),
            Pane::Tabs | Pane::Output => Command::none(),
        }
    }

    fn handle_editor(&mut self, msg: code_editor::Message) -> Command<Msg> {
        match msg {
            code_editor::Message::Changed(text) => {
                let before = self.session.state().requires_input;
                if let Err(reason) = self.session.edit_source(text) {
                    self.refuse("edit source", reason);
                    self.sync_panes(true);
                } else if before != self.session.state().requires_input {
                    self.sync_panes(false);
                }
                Command::none()
            }
            other => self.editor.update(other).map(Msg::Editor),
        }
    }

    fn handle_inputs(&mut self, msg: input_slots::Message) -> Command<Msg> {
        match msg {
            input_slots::Message::Edited { index, value } => {
                if let Err(reason) = self.session.edit_input_slot(index, value) {
                    self.refuse("edit input", reason);
                }
                self.sync_panes(false);
                Command::none()
            }
            input_slots::Message::AddRequested => {
                match self.session.add_input_slot() {
                    Ok(()) => {
                        self.sync_panes(false);
                        let last = self.session.state().custom_inputs.len() - 1;
                        self.inputs.activate(last);
                    }
                    Err(reason) => self.refuse("add input", reason),
                }
                Command::none()
            }
            other => self.inputs.update(other).map(Msg::Inputs),
        }
    }

    fn status_text(&self) -> &'static str {
        match self.session.status() {
            RunStatus::Idle => "Idle",
            RunStatus::Running => "Running",
            RunStatus::Completed => "Completed",
        }
    }

    fn view_header(&self, frame: &mut Frame, area: Rect) {
        let [title, tabs] = Layout::horizontal([Constraint::Length(10), Constraint::Min(0)]).areas(area);
        let title_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        frame.render_widget(Paragraph::new(Span::styled(" codepad", title_style)), title);
        self.tabs.view(frame, tabs);
    }

    fn view_run_line(&self, frame: &mut Frame, area: Rect) {
        let line = if self.session.is_running() {
            Line::from(Span::styled(
                format!(" {RUNNING_LABEL}"),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(vec![
                Span::styled(
                    format!(" {RUN_LABEL}"),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::styled("  (Ctrl+R)", Style::default().fg(Color::DarkGray)),
            ])
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn view_status(&self, frame: &mut Frame, area: Rect) {
        let profile = self.session.profile();
        let left = format!(" {} (judge0 #{})", profile.id.display_name(), profile.engine_code);
        let center = match &self.notice {
            Some(notice) => Line::from(Span::styled(notice.clone(), Style::default().fg(Color::Yellow))),
            None => Line::raw(self.status_text()),
        };
        let hints = status_bar::key_hints(&[
            ("^R", "run"),
            ("F2", "focus"),
            ("^N", "input"),
            ("^Q", "quit"),
        ]);
        StatusBar::new()
            .left(left)
            .center(center)
            .right(hints)
            .style(Style::default().bg(Color::DarkGray).fg(Color::White))
            .render(frame, area);
    }
}

impl Model for Playground {
    type Message = Msg;
    type Flags = PlaygroundFlags;

    fn init(flags: PlaygroundFlags) -> (Self, Command<Msg>) {
        let mut session = Session::new(flags.registry);
        if let Err(reason) = session.select_language(flags.language) {
            debug!(%reason, "initial language rejected");
        }
        if let Some(source) = flags.initial_source {
            if let Err(reason) = session.edit_source(source) {
                debug!(%reason, "initial source rejected");
            }
        }

        let titles = LanguageId::ALL
            .iter()
            .map(|id| id.display_name().to_string())
            .collect();
        let mut playground = Self {
            session,
            engine: flags.engine,
            focus: FocusRing::new([Pane::Tabs, Pane::Editor, Pane::Inputs, Pane::Output]),
            tabs: LanguageTabs::new(titles),
            editor: CodeEditor::new(),
            inputs: InputSlots::new(),
            output: OutputConsole::new(OUTPUT_PLACEHOLDER),
            notice: None,
        };
        playground.focus.focus(Pane::Editor);
        playground.sync_panes(true);
        (playground, Command::none())
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::Paste(text) => self.handle_paste(text),
            Msg::Resize => Command::none(),
            Msg::Run => self.start_run(),
            Msg::RunFinished(ticket, outcome) => {
                self.session.complete_run(ticket, outcome);
                self.sync_panes(false);
                Command::none()
            }
            Msg::Tabs(language_tabs::Message::Selected(index)) => {
                self.select_language(index);
                Command::none()
            }
            Msg::Tabs(other) => self.tabs.update(other).map(Msg::Tabs),
            Msg::Editor(msg) => self.handle_editor(msg),
            Msg::Inputs(msg) => self.handle_inputs(msg),
            Msg::Output(msg) => self.output.update(msg).map(Msg::Output),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let [header, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.view_header(frame, header);

        let [left, right] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(body);
        self.editor.view(frame, left);

        if self.session.state().requires_input {
            let [inputs, run, output] = Layout::vertical([
                Constraint::Length(self.inputs.height()),
                Constraint::Length(1),
                Constraint::Min(3),
            ])
            .areas(right);
            self.inputs.view(frame, inputs);
            self.view_run_line(frame, run);
            self.output.view(frame, output);
        } else {
            let [run, output] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).areas(right);
            self.view_run_line(frame, run);
            self.output.view(frame, output);
        }

        self.view_status(frame, status);
    }

    fn on_event(&self, event: Event) -> Option<Msg> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(Msg::Key(key)),
            Event::Paste(text) => Some(Msg::Paste(text)),
            Event::Resize(..) => Some(Msg::Resize),
            _ => None,
        }
    }
}
