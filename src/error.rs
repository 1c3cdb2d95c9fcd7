use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from terminal setup, downloads and log files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// The device answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected JSON shape.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The configured device base URL is unusable.
    #[error("Invalid device URL: {0}")]
    InvalidUrl(String),

    /// A device path that cannot be mapped to a local file.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Log subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(String),
}

impl From<ureq::Error> for AppError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => AppError::Http {
                status,
                url: response.get_url().to_string(),
            },
            ureq::Error::Transport(transport) => AppError::Transport(transport.to_string()),
        }
    }
}
