/// Startup configuration failures. Any of these aborts the server.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error(
        "JWT_SECRET must be changed from the example value and be at least {min_len} characters long. Generate one with: openssl rand -base64 32"
    )]
    WeakSecret { min_len: usize },
}
