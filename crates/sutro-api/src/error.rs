use thiserror::Error;

/// Every way a single call through [`Transport`](crate::Transport) can fail.
///
/// Callers of the public client methods never see this type: the transport
/// wrapper logs it and collapses it into `None`. It exists so the wrapper can
/// categorize what went wrong, and so tests can assert on the category.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The call did not finish within the fixed deadline.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Connection refused, DNS resolution failure, TLS handshake, etc.
    #[error("Connection failed: {0}")]
    Connect(reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Any other reqwest failure (body read, redirect loop, builder error).
    #[error("HTTP transport error: {0}")]
    Transport(reqwest::Error),

    /// HTTP client could not be constructed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// Body was empty or not valid JSON, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// JSON decoded fine but carried no usable `data` object.
    #[error("Response contained no data")]
    MissingData,
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs: 0 }
        } else if err.is_connect() {
            Self::Connect(err)
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                url: err.url().map(ToString::to_string).unwrap_or_default(),
            }
        } else {
            Self::Transport(err)
        }
    }
}

impl Error {
    /// Short category label used in log records.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Connect(_) | Self::Status { .. } | Self::Transport(_) => "fetch",
            Self::Deserialization { .. } | Self::MissingData => "parse",
            Self::Tls(_) => "unexpected",
        }
    }

    /// Returns `true` if the next poll might succeed without user action.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connect(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
