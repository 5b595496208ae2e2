use thiserror::Error;

/// Malformed-event errors raised at the validation boundary.
///
/// Non-retryable: the caller drops the single event, logs it, and moves on.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("unknown event state '{value}'")]
    UnknownState { value: String },
}

/// Broker-side failures of the publish path.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("broker connection failed: {0}")]
    Connect(String),

    #[error("broker channel error: {0}")]
    Channel(String),

    #[error("publish failed: {0}")]
    Publish(String),

    #[error("broker did not confirm delivery")]
    NotConfirmed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_error_messages_name_the_cause() {
        let e = EventError::MissingField { field: "world_id" };
        assert_eq!(e.to_string(), "missing required field 'world_id'");

        let e = EventError::UnknownState {
            value: "exploded".to_string(),
        };
        assert_eq!(e.to_string(), "unknown event state 'exploded'");
    }

    #[test]
    fn publish_error_messages() {
        let e = PublishError::Connect("refused".to_string());
        assert!(e.to_string().contains("refused"));
        assert_eq!(
            PublishError::NotConfirmed.to_string(),
            "broker did not confirm delivery"
        );
    }
}
