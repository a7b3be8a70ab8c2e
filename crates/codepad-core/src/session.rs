//! The run lifecycle controller.
//!
//! [`Session`] is the only owner of the editor state and the run status.
//! Every mutator either applies completely or returns [`Rejected`] and leaves
//! the session untouched.
//!
//! ```text
//!            begin_run             complete_run
//!   Idle ───────────────▶ Running ─────────────▶ Completed
//!    ▲                                              │
//!    └──────────── select_language ◀────────────────┘
//! ```
//!
//! Runs are single-flight: `begin_run` is rejected while a run is in
//! flight, and a completion is applied only if it carries the ticket of the
//! run currently in flight.  Anything else is stale and dropped.

use tracing::{debug, info, warn};

use crate::compose::{compose, RunRequest};
use crate::detect::requires_input;
use crate::engine::{EngineResponse, ExecutionEngine};
use crate::error::{Rejected, TransportError};
use crate::interpret::{interpret, RunResult};
use crate::language::{EditorMode, LanguageId, LanguageProfile, Registry};

/// Output shown while a run is in flight.
pub const RUNNING_TEXT: &str = "Running...";

/// Output shown when the execution service could not be reached or
/// answered with something unusable.
pub const GENERIC_FAILURE: &str = "Error running code.";

/// Where the session is in the run cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Nothing has run since the last language switch.
    Idle,
    /// A submission is in flight.
    Running,
    /// The last submission finished and its output is displayed.
    Completed,
}

/// The user-editable part of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    /// Active language.
    pub selected_language: LanguageId,
    /// Current program text.
    pub source_text: String,
    /// Lines of standard input, one per slot.
    pub custom_inputs: Vec<String>,
    /// Derived from `source_text` and `selected_language`; never set directly.
    pub requires_input: bool,
}

impl EditorState {
    fn for_profile(profile: &LanguageProfile) -> Self {
        let mut state = Self {
            selected_language: profile.id,
            source_text: profile.default_template.to_string(),
            custom_inputs: vec![String::new()],
            requires_input: false,
        };
        state.refresh_requires_input();
        state
    }

    fn refresh_requires_input(&mut self) {
        self.requires_input = requires_input(&self.source_text, self.selected_language);
        if self.requires_input && self.custom_inputs.is_empty() {
            self.custom_inputs.push(String::new());
        }
    }
}

/// Identifies one submission so its completion can be matched to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunTicket(u64);

/// A run that has started and is waiting on the execution service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRun {
    /// Hand this back to [`Session::complete_run`].
    pub ticket: RunTicket,
    /// The request to send.
    pub request: RunRequest,
}

/// What [`Session::complete_run`] did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result is now the displayed output.
    Applied,
    /// The result did not belong to the run in flight and was dropped.
    Stale,
}

/// Read-only view of a session for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Language whose template and engine code are in use.
    pub selected_language: LanguageId,
    /// Editing behaviour for the selected language.
    pub editor_mode: EditorMode,
    /// Current program text.
    pub source_text: String,
    /// Stdin slots in display order.
    pub custom_inputs: Vec<String>,
    /// Whether the source looks like it reads stdin.
    pub requires_input: bool,
    /// Where the run lifecycle is.
    pub status: RunStatus,
    /// Shorthand for `status == RunStatus::Running`.
    pub is_running: bool,
    /// Empty until the first run after a language switch.
    pub display_output: String,
    /// Whether `display_output` renders in error style.
    pub is_error_output: bool,
}

/// The run lifecycle state machine.
#[derive(Debug, Clone)]
pub struct Session {
    registry: Registry,
    state: EditorState,
    status: RunStatus,
    output: Option<RunResult>,
    in_flight: Option<RunTicket>,
    next_ticket: u64,
}

impl Session {
    /// Start an idle Python session with its default template.
    pub fn new(registry: Registry) -> Self {
        let state = EditorState::for_profile(registry.profile(LanguageId::Python));
        Self {
            registry,
            state,
            status: RunStatus::Idle,
            output: None,
            in_flight: None,
            next_ticket: 0,
        }
    }

    /// The language table this session was built with.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Current editor state.
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Current run status.
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Whether a run is in flight.
    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// Profile of the selected language.
    pub fn profile(&self) -> &LanguageProfile {
        self.registry.profile(self.state.selected_language)
    }

    /// Text for the output console; empty when nothing has run.
    pub fn display_output(&self) -> &str {
        self.output.as_ref().map(RunResult::display_text).unwrap_or("")
    }

    /// Whether the output should render in error style.
    pub fn is_error_output(&self) -> bool {
        self.output.as_ref().is_some_and(RunResult::is_error)
    }

    /// Owned copy of everything the presentation layer reads.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            selected_language: self.state.selected_language,
            editor_mode: self.profile().editor_mode,
            source_text: self.state.source_text.clone(),
            custom_inputs: self.state.custom_inputs.clone(),
            requires_input: self.state.requires_input,
            status: self.status,
            is_running: self.is_running(),
            display_output: self.display_output().to_string(),
            is_error_output: self.is_error_output(),
        }
    }

    /// Switch language: load its template, reset the input slots to one
    /// empty slot, clear the output and return to Idle.
    pub fn select_language(&mut self, id: LanguageId) -> Result<(), Rejected> {
        self.ensure_not_running()?;
        self.state = EditorState::for_profile(self.registry.profile(id));
        self.output = None;
        self.status = RunStatus::Idle;
        debug!(language = %id, requires_input = self.state.requires_input, "language selected");
        Ok(())
    }

    /// Replace the program text.
    ///
    /// Input slots survive when the program stops reading input; they are
    /// hidden and not sent, and come back if the input call returns.
    pub fn edit_source(&mut self, text: impl Into<String>) -> Result<(), Rejected> {
        self.ensure_not_running()?;
        let before = self.state.requires_input;
        self.state.source_text = text.into();
        self.state.refresh_requires_input();
        if before != self.state.requires_input {
            debug!(requires_input = self.state.requires_input, "input requirement changed");
        }
        Ok(())
    }

    /// Append an empty input slot.
    pub fn add_input_slot(&mut self) -> Result<(), Rejected> {
        self.ensure_inputs_editable()?;
        self.state.custom_inputs.push(String::new());
        Ok(())
    }

    /// Overwrite the input slot at `index`.
    pub fn edit_input_slot(&mut self, index: usize, value: impl Into<String>) -> Result<(), Rejected> {
        self.ensure_inputs_editable()?;
        let len = self.state.custom_inputs.len();
        let slot = self
            .state
            .custom_inputs
            .get_mut(index)
            .ok_or(Rejected::SlotOutOfRange { index, len })?;
        *slot = value.into();
        Ok(())
    }

    /// Start a run: move to Running, show [`RUNNING_TEXT`], and return the
    /// request to send together with its ticket.
    pub fn begin_run(&mut self) -> Result<PendingRun, Rejected> {
        self.ensure_not_running()?;

        let ticket = RunTicket(self.next_ticket);
        self.next_ticket += 1;
        let request = compose(&self.state, &self.registry);

        self.status = RunStatus::Running;
        self.in_flight = Some(ticket);
        self.output = Some(RunResult::classify(RUNNING_TEXT));

        info!(
            ticket = ticket.0,
            language = %self.state.selected_language,
            engine_code = request.engine_code,
            source_bytes = request.source_text.len(),
            stdin_bytes = request.stdin.len(),
            "run started"
        );
        Ok(PendingRun { ticket, request })
    }

    /// Apply the outcome of the run identified by `ticket`.
    ///
    /// Transport failures become [`GENERIC_FAILURE`]; the error itself only
    /// goes to the log.
    pub fn complete_run(
        &mut self,
        ticket: RunTicket,
        outcome: Result<EngineResponse, TransportError>,
    ) -> Completion {
        if self.status != RunStatus::Running || self.in_flight != Some(ticket) {
            debug!(
                ticket = ticket.0,
                status = ?self.status,
                "dropping stale run result"
            );
            return Completion::Stale;
        }

        let result = match outcome {
            Ok(response) => interpret(&response),
            Err(err) => {
                warn!(ticket = ticket.0, error = %err, "execution request failed");
                RunResult::classify(GENERIC_FAILURE)
            }
        };

        info!(
            ticket = ticket.0,
            is_error = result.is_error(),
            output_bytes = result.display_text().len(),
            "run completed"
        );
        self.in_flight = None;
        self.status = RunStatus::Completed;
        self.output = Some(result);
        Completion::Applied
    }

    /// Begin a run, await `engine`, and complete it.
    pub async fn run<E>(&mut self, engine: &E) -> Result<Completion, Rejected>
    where
        E: ExecutionEngine + ?Sized,
    {
        let pending = self.begin_run()?;
        let outcome = engine.execute(pending.request).await;
        Ok(self.complete_run(pending.ticket, outcome))
    }

    fn ensure_not_running(&self) -> Result<(), Rejected> {
        if self.is_running() {
            return Err(Rejected::Busy);
        }
        Ok(())
    }

    fn ensure_inputs_editable(&self) -> Result<(), Rejected> {
        self.ensure_not_running()?;
        if !self.state.requires_input {
            return Err(Rejected::InputNotRequired);
        }
        Ok(())
    }
}
