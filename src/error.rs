pub type PinwallResult<T> = Result<T, PinwallError>;

#[derive(thiserror::Error, Debug)]
pub enum PinwallError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("http error: {0}")]
    Http(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PinwallError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            PinwallError::config("x")
                .to_string()
                .contains("configuration error:")
        );
        assert!(PinwallError::not_found("x").to_string().contains("not found:"));
        assert!(PinwallError::parse("x").to_string().contains("parse error:"));
        assert!(PinwallError::http("x").to_string().contains("http error:"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = PinwallError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
