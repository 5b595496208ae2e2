use thiserror::Error;

/// Failures of the alert store.
///
/// `Connectivity` is fatal at initial setup (the process should not start
/// without its declared sinks) and non-fatal per operation afterwards:
/// callers log and keep processing subsequent events.
#[derive(Debug, Error)]
pub enum AlertStoreError {
    #[error("alert store unreachable: {0}")]
    Connectivity(String),

    /// A create hit an id that is already active. Likely a duplicate
    /// `started` notification; the existing record must be kept.
    #[error("duplicate alert id '{0}'")]
    DuplicateKey(String),

    #[error("alert record serialization failed: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let e = AlertStoreError::Connectivity("connection refused".to_string());
        assert!(e.to_string().contains("connection refused"));

        let e = AlertStoreError::DuplicateKey("17-123456".to_string());
        assert_eq!(e.to_string(), "duplicate alert id '17-123456'");
    }
}
