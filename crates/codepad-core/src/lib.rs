//! Run-submission orchestrator for **codepad**.
//!
//! `codepad-core` holds every piece of control logic in the playground and
//! nothing that touches a terminal.  The presentation layer reads a
//! [`Snapshot`] and calls the mutators on [`Session`]; the remote compiler
//! sits behind the [`ExecutionEngine`] trait.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Registry`] | Immutable per-language profiles (engine code, template, editor mode) |
//! | [`requires_input`] | Heuristic: will this program block on stdin? |
//! | [`compose`] | Build a [`RunRequest`] from the editor state |
//! | [`Session`] | The run lifecycle state machine (Idle -> Running -> Completed) |
//! | [`interpret`] | Collapse an [`EngineResponse`] into one display string |
//! | [`ExecutionEngine`] | Seam for the remote compile/execute service |
//!
//! # Run protocol
//!
//! A run is two explicit phases so that the single-flight rule and stale
//! response handling can be tested without a network:
//!
//! ```rust,ignore
//! let pending = session.begin_run()?;            // Idle|Completed -> Running
//! let outcome = engine.execute(pending.request).await;
//! session.complete_run(pending.ticket, outcome); // Running -> Completed
//! ```

pub mod compose;
pub mod detect;
pub mod engine;
pub mod error;
pub mod interpret;
pub mod language;
pub mod session;

pub use compose::{compose, RunRequest};
pub use detect::requires_input;
pub use engine::{EngineResponse, ExecutionEngine};
pub use error::{ConfigError, Rejected, TransportError};
pub use interpret::{interpret, RunResult};
pub use language::{EditorMode, LanguageId, LanguageProfile, Registry};
pub use session::{
    Completion, EditorState, PendingRun, RunStatus, RunTicket, Session, Snapshot,
    GENERIC_FAILURE, RUNNING_TEXT,
};
