//! Frequency source trait

/// Result type for frequency reads
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors reading the VFO. All of them are transient from the monitor's
/// point of view.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("http status {status}")]
    Http { status: u16 },

    #[error("xml-rpc fault {code}: {message}")]
    Fault { code: i64, message: String },

    #[error("no frequency data in response")]
    NoParams,

    #[error("empty frequency response")]
    Empty,

    #[error("failed to parse frequency '{value}'")]
    Parse { value: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Anything that can report the currently tuned frequency in hertz.
#[async_trait::async_trait]
pub trait FrequencySource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_frequency(&self) -> FetchResult<f64>;
}
