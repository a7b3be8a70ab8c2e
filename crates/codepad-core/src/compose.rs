//! Turn the editor state into a request for the execution service.

use crate::language::Registry;
use crate::session::EditorState;

/// One submission to the execution service.  Built fresh for every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Program text, sent as-is (no syntax checking happens here).
    pub source_text: String,
    /// Compiler / interpreter selector understood by the service.
    pub engine_code: u32,
    /// Standard input for the program.
    pub stdin: String,
}

/// Build a [`RunRequest`] from `state`.
///
/// `stdin` is the input slots joined with `\n` when the program requires
/// input, and empty otherwise; slots kept around from an earlier edit are
/// not sent once the program stops reading input.
pub fn compose(state: &EditorState, registry: &Registry) -> RunRequest {
    let stdin = if state.requires_input {
        state.custom_inputs.join("\n")
    } else {
        String::new()
    };

    RunRequest {
        source_text: state.source_text.clone(),
        engine_code: registry.profile(state.selected_language).engine_code,
        stdin,
    }
}
