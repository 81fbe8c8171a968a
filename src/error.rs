// error.rs - Engine error type
//
// Setup is the only place that can really fail. Everything after that is
// best-effort visuals and logs instead of returning errors.

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("missing element: #{0}")]
    MissingElement(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl EngineError {
    pub fn missing(id: impl Into<String>) -> Self {
        Self::MissingElement(id.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert_eq!(
            EngineError::missing("hero-3d-floor").to_string(),
            "missing element: #hero-3d-floor"
        );
        assert!(EngineError::config("x").to_string().starts_with("config error:"));
    }

    #[test]
    fn serde_errors_convert() {
        let err: EngineError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.to_string().starts_with("serialization error:"));
    }
}
