//! Backend connection settings.

#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL that endpoint paths are appended to (no trailing slash needed).
    pub base_url: String,
    /// Session credential sent as a bearer token, if any.
    pub credential: Option<String>,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            credential: None,
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }
}

// Never print the credential.
impl core::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_the_credential() {
        let config = BackendConfig::new("http://backend").with_credential("s3cret-token");
        let printed = format!("{config:?}");
        assert!(printed.contains("http://backend"));
        assert!(printed.contains("<redacted>"));
        assert!(!printed.contains("s3cret-token"));
    }
}
