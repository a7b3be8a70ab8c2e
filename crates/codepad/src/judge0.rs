//! REST client for the Judge0 submissions endpoint.
//!
//! One run is one `POST /submissions?base64_encoded=false&wait=true`; the
//! service holds the connection open until the program has finished, so the
//! response already carries the program's output.

use codepad_core::{EngineResponse, ExecutionEngine, RunRequest, TransportError};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use tracing::debug;

/// Header carrying the RapidAPI key.
pub const KEY_HEADER: &str = "X-RapidAPI-Key";
/// Header naming the RapidAPI host.
pub const HOST_HEADER: &str = "X-RapidAPI-Host";

/// JSON body of a submission.
#[derive(Debug, Serialize)]
struct SubmissionBody<'a> {
    source_code: &'a str,
    language_id: u32,
    stdin: &'a str,
}

/// HTTP client for a single Judge0 deployment.
#[derive(Debug, Clone)]
pub struct Judge0Client {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    api_host: Option<String>,
}

impl Judge0Client {
    /// Create a client for `base_url`, e.g. `https://judge0-ce.p.rapidapi.com`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            api_key: None,
            api_host: None,
        }
    }

    /// Send `key` as [`KEY_HEADER`] on every request.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Send `host` as [`HOST_HEADER`] on every request.
    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = Some(host.into());
        self
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the synchronous submission endpoint.
    pub fn submissions_url(&self) -> String {
        format!("{}/submissions?base64_encoded=false&wait=true", self.base_url)
    }

    /// Build, but do not send, the HTTP request for `run`.
    pub fn build_request(&self, run: &RunRequest) -> Result<reqwest::Request, TransportError> {
        let body = SubmissionBody {
            source_code: &run.source_text,
            language_id: run.engine_code,
            stdin: &run.stdin,
        };

        let mut builder = self.client.post(self.submissions_url()).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.header(KEY_HEADER, key);
        }
        if let Some(host) = &self.api_host {
            builder = builder.header(HOST_HEADER, host);
        }
        builder.build().map_err(request_error)
    }

    /// Submit `run` and wait for the program's result.
    pub async fn submit(&self, run: &RunRequest) -> Result<EngineResponse, TransportError> {
        let request = self.build_request(run)?;
        debug!(url = %request.url(), language_id = run.engine_code, "submitting to judge0");

        let response = self.client.execute(request).await.map_err(request_error)?;
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await.map_err(request_error)?;
        serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))
    }

    /// Turn a non-2xx response into [`TransportError::Status`] with its body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

impl ExecutionEngine for Judge0Client {
    fn execute(&self, request: RunRequest) -> BoxFuture<'static, Result<EngineResponse, TransportError>> {
        let client = self.clone();
        async move { client.submit(&request).await }.boxed()
    }
}

fn request_error(err: reqwest::Error) -> TransportError {
    TransportError::Request(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::oneshot;

    fn run(source: &str, engine_code: u32, stdin: &str) -> RunRequest {
        RunRequest {
            source_text: source.to_string(),
            engine_code,
            stdin: stdin.to_string(),
        }
    }

    fn json_body(request: &reqwest::Request) -> serde_json::Value {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn posts_to_synchronous_endpoint() {
        let client = Judge0Client::new("https://judge0.example.com/");
        let req = client.build_request(&run("print(1)", 71, "")).unwrap();
        assert_eq!(req.method(), reqwest::Method::POST);
        assert_eq!(
            req.url().as_str(),
            "https://judge0.example.com/submissions?base64_encoded=false&wait=true"
        );
    }

    #[test]
    fn body_carries_source_language_and_stdin() {
        let client = Judge0Client::new("https://judge0.example.com");
        let req = client
            .build_request(&run("int main(){}", 50, "1\n2"))
            .unwrap();
        assert_eq!(
            json_body(&req),
            serde_json::json!({
                "source_code": "int main(){}",
                "language_id": 50,
                "stdin": "1\n2",
            })
        );
        assert_eq!(
            req.headers().get(reqwest::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn rapidapi_headers_only_when_configured() {
        let bare = Judge0Client::new("https://judge0.example.com");
        let req = bare.build_request(&run("", 54, "")).unwrap();
        assert!(req.headers().get(KEY_HEADER).is_none());
        assert!(req.headers().get(HOST_HEADER).is_none());

        let keyed = Judge0Client::new("https://judge0-ce.p.rapidapi.com")
            .with_api_key("secret")
            .with_api_host("judge0-ce.p.rapidapi.com");
        let req = keyed.build_request(&run("", 54, "")).unwrap();
        assert_eq!(req.headers().get(KEY_HEADER).unwrap(), "secret");
        assert_eq!(
            req.headers().get(HOST_HEADER).unwrap(),
            "judge0-ce.p.rapidapi.com"
        );
    }

    #[test]
    fn bad_base_url_is_a_request_error() {
        let client = Judge0Client::new("not a url");
        let err = client.build_request(&run("", 71, "")).unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_request_error() {
        // Nothing listens on the local discard port.
        let client = Judge0Client::new("http://127.0.0.1:9");
        let err = client.submit(&run("print(1)", 71, "")).await.unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
    }

    /// A client that talks to `url` directly, whatever the proxy settings.
    fn local_client(url: String) -> Judge0Client {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        Judge0Client::with_client(http, url)
    }

    /// Answer one HTTP exchange on a random local port with `status_line`
    /// and `body`.  Yields the base URL and, once served, the raw request.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (seen_tx, seen_rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let _ = seen_tx.send(request);
        });
        (format!("http://{addr}"), seen_rx)
    }

    /// Read one request through the end of its body.
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                let len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[tokio::test]
    async fn non_success_status_keeps_code_and_body() {
        let (url, _) = serve_once("429 Too Many Requests", "rate limited").await;
        let err = local_client(url)
            .submit(&run("print(1)", 71, ""))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            TransportError::Status {
                status: 429,
                body: "rate limited".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn undecodable_body_is_a_decode_error() {
        let (url, _) = serve_once("200 OK", "not json").await;
        let err = local_client(url)
            .submit(&run("print(1)", 71, ""))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)), "{err:?}");
    }

    #[tokio::test]
    async fn accepted_submission_ignores_extra_fields() {
        let body = r#"{"stdout":"Hello World\n","stderr":null,"compile_output":null,"message":null,"status":{"id":3,"description":"Accepted"},"time":"0.012","memory":3100,"token":"d85cd024-1548-4165-96c7-7bc88673f194"}"#;
        let (url, seen) = serve_once("201 Created", body).await;
        let client = local_client(url).with_api_key("secret");
        let response = client
            .submit(&run("print(\"Hello World\")", 71, ""))
            .await
            .unwrap();
        assert_eq!(
            response,
            EngineResponse {
                stdout: Some("Hello World\n".to_string()),
                ..EngineResponse::default()
            }
        );

        let request = seen.await.unwrap();
        assert!(request.starts_with("POST /submissions?base64_encoded=false&wait=true HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("x-rapidapi-key: secret"));
        assert!(request.contains(r#""language_id":71"#));
    }
}
