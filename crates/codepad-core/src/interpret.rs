//! Collapse an execution-service response into one display string.

use crate::engine::EngineResponse;

/// Text shown when the service returned nothing at all.
pub const NO_OUTPUT: &str = "No output";

/// What the output console shows after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    /// Display text without an "error" marker.
    Success {
        /// Text for the output console.
        display_text: String,
    },
    /// Display text that mentions an error.  Only changes the colour.
    Failure {
        /// Text for the output console.
        display_text: String,
    },
}

impl RunResult {
    /// Classify `text` by looking for "error" in any case.
    pub fn classify(text: impl Into<String>) -> Self {
        let display_text = text.into();
        if is_error_text(&display_text) {
            RunResult::Failure { display_text }
        } else {
            RunResult::Success { display_text }
        }
    }

    /// The text to show.
    pub fn display_text(&self) -> &str {
        match self {
            RunResult::Success { display_text } | RunResult::Failure { display_text } => {
                display_text
            }
        }
    }

    /// Whether the text should render in error style.
    pub fn is_error(&self) -> bool {
        matches!(self, RunResult::Failure { .. })
    }
}

/// Case-insensitive check for the substring "error".
pub fn is_error_text(text: &str) -> bool {
    text.to_lowercase().contains("error")
}

/// Pick the first non-empty of stdout, stderr, compiler output and service
/// message, falling back to [`NO_OUTPUT`].
pub fn interpret(response: &EngineResponse) -> RunResult {
    let text = [
        &response.stdout,
        &response.stderr,
        &response.compile_output,
        &response.message,
    ]
    .into_iter()
    .filter_map(|field| field.as_deref())
    .find(|s| !s.is_empty())
    .unwrap_or(NO_OUTPUT);

    RunResult::classify(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(stdout: &str, stderr: &str, compile: &str, message: &str) -> EngineResponse {
        let opt = |s: &str| Some(s.to_string());
        EngineResponse {
            stdout: opt(stdout),
            stderr: opt(stderr),
            compile_output: opt(compile),
            message: opt(message),
        }
    }

    #[test]
    fn stdout_wins() {
        let result = interpret(&response("Hello World\n", "warn", "", ""));
        assert_eq!(result.display_text(), "Hello World\n");
        assert!(!result.is_error());
    }

    #[test]
    fn stderr_beats_compile_output() {
        let result = interpret(&response("", "boom", "warn", ""));
        assert_eq!(result.display_text(), "boom");
    }

    #[test]
    fn compile_output_beats_message() {
        let result = interpret(&response(
            "",
            "",
            "main.c:3:1: error: expected ';'",
            "Compilation Error",
        ));
        assert_eq!(result.display_text(), "main.c:3:1: error: expected ';'");
        assert!(result.is_error());
    }

    #[test]
    fn message_used_last() {
        let result = interpret(&EngineResponse {
            message: Some("Time limit exceeded".into()),
            ..EngineResponse::default()
        });
        assert_eq!(result.display_text(), "Time limit exceeded");
    }

    #[test]
    fn all_empty_falls_back() {
        let result = interpret(&response("", "", "", ""));
        assert_eq!(result.display_text(), NO_OUTPUT);
        assert!(!result.is_error());
    }

    #[test]
    fn all_missing_falls_back() {
        assert_eq!(interpret(&EngineResponse::default()).display_text(), NO_OUTPUT);
    }

    #[test]
    fn error_detection_ignores_case() {
        assert!(RunResult::classify("Traceback ... NameError: x").is_error());
        assert!(RunResult::classify("ERROR").is_error());
        assert!(!RunResult::classify("all good").is_error());
    }

    #[test]
    fn stdout_mentioning_error_is_styled_as_error() {
        let result = interpret(&response("no errors found\n", "", "", ""));
        assert!(result.is_error());
        assert_eq!(result.display_text(), "no errors found\n");
    }
}
