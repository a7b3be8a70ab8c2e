//! **codepad**: a terminal code playground.
//!
//! Pick Python, C or C++, edit the program, type its standard input, and
//! run it on a Judge0 service.  The run lifecycle lives in
//! [`codepad_core`]; this crate wires it to the terminal and the network.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`app`] | The [`Playground`](app::Playground) model: panes, focus, key map |
//! | [`judge0`] | [`Judge0Client`](judge0::Judge0Client), the HTTP execution engine |
//! | [`config`] | `clap` CLI with environment fallbacks |
//! | [`logging`] | File-backed `tracing` subscriber |

pub mod app;
pub mod config;
pub mod judge0;
pub mod logging;

pub use app::{Playground, PlaygroundFlags};
pub use config::{Cli, Config, ConfigLoadError};
pub use judge0::Judge0Client;
