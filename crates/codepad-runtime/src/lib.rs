//! Terminal runtime for **codepad**.
//!
//! A trimmed [Elm Architecture] loop: the application is a [`Model`] with
//! **init -> update -> view**, and side effects leave `update` as
//! [`Command`]s.  The playground uses exactly one kind of async effect (the
//! call to the execution service), so the runtime keeps just enough to
//! spawn futures, feed their results back, render, and quit.
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Top-level application trait |
//! | [`Component`] | Sub-model that renders into a [`ratatui::layout::Rect`] |
//! | [`Command`] | Side effect for the runtime to perform |
//! | [`Program`] | Wires a [`Model`] to the terminal and runs the event loop |
//! | [`TestProgram`](testing::TestProgram) | Headless harness for tests |
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod component;
pub mod model;
pub mod runtime;
pub mod testing;

pub use command::Command;
pub use component::Component;
pub use model::Model;
pub use runtime::{Program, ProgramError, ProgramOptions};

/// Run a model with custom options until it quits.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
