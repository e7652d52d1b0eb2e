use thiserror::Error;

/// Errors raised while loading settings or talking to the completion service.
#[derive(Error, Debug)]
pub enum Error {
    #[error("missing API credential: set {var} in your environment")]
    MissingCredential { var: &'static str },

    #[error("invalid value for {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("completion service returned no text")]
    EmptyCompletion,

    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// One-line description for the user. Service response bodies are left
    /// out; the full error goes to the log.
    pub fn brief(&self) -> String {
        match self {
            Error::Api { status, .. } => format!("the service answered with status {status}"),
            Error::Http(e) if e.is_timeout() => "the request timed out".into(),
            Error::Http(e) if e.is_connect() => "could not connect to the service".into(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
