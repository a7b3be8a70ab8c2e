use crate::language::LanguageId;

/// A malformed language table.  Raised only while building a
/// [`Registry`](crate::Registry), so a running session never sees it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Two profiles were registered for the same language.
    #[error("duplicate profile for language `{0}`")]
    Duplicate(LanguageId),
    /// A language in the closed set has no profile.
    #[error("no profile registered for language `{0}`")]
    Missing(LanguageId),
}

/// The call to the execution service failed before a usable response came
/// back.  Never shown verbatim: the session replaces it with
/// [`GENERIC_FAILURE`](crate::GENERIC_FAILURE) and logs the detail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Network, DNS, TLS or connection failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-2xx status code.
    #[error("execution service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body, kept for the log.
        body: String,
    },

    /// The response body was not the JSON shape we expect.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// A mutator was called in a state that does not allow it.  The session is
/// left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejected {
    /// A run is in flight; editing, language switching and re-running wait.
    #[error("a run is already in progress")]
    Busy,
    /// Input slots are only editable when the program reads stdin.
    #[error("the current program does not read input")]
    InputNotRequired,
    /// No input slot exists at `index`.
    #[error("input slot {index} out of range (have {len})")]
    SlotOutOfRange {
        /// Requested slot.
        index: usize,
        /// Number of slots.
        len: usize,
    },
}
