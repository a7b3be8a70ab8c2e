//! The execution-service seam.

use futures::future::BoxFuture;
use serde::Deserialize;

use crate::compose::RunRequest;
use crate::error::TransportError;

/// Raw result of one submission.
///
/// Every field is optional; the service fills in whichever streams the
/// program produced.  Extra fields (status, timing, memory) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineResponse {
    /// Program standard output.
    #[serde(default)]
    pub stdout: Option<String>,
    /// Program standard error.
    #[serde(default)]
    pub stderr: Option<String>,
    /// Compiler diagnostics.
    #[serde(default)]
    pub compile_output: Option<String>,
    /// Service-level message (e.g. time limit exceeded).
    #[serde(default)]
    pub message: Option<String>,
}

/// A remote compile-and-run service.
///
/// Implementations make exactly one call per `execute` and block until the
/// program finishes or the service gives up; the core adds no timeout.
pub trait ExecutionEngine: Send + Sync + 'static {
    /// Submit `request` and wait for the result.
    fn execute(&self, request: RunRequest) -> BoxFuture<'static, Result<EngineResponse, TransportError>>;
}

impl<E: ExecutionEngine + ?Sized> ExecutionEngine for std::sync::Arc<E> {
    fn execute(&self, request: RunRequest) -> BoxFuture<'static, Result<EngineResponse, TransportError>> {
        (**self).execute(request)
    }
}
