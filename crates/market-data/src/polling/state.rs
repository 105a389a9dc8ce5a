use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::errors::{ErrorKind, MarketDataError};

/// Failure shown in place of a widget's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&MarketDataError> for SessionError {
    fn from(error: &MarketDataError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Observable state of a polling session.
///
/// `data` is the last good payload and survives failed polls.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub data: Option<Arc<Value>>,
    pub loading: bool,
    pub error: Option<SessionError>,
}

impl SessionState {
    /// State of a session that has not resolved yet.
    pub fn initial() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }

    /// Fold one poll result into the state.
    ///
    /// `loading` only ever goes from true to false here.
    pub fn apply(&mut self, result: Result<Arc<Value>, MarketDataError>) {
        match result {
            Ok(payload) => {
                self.data = Some(payload);
                self.error = None;
            }
            Err(error) => {
                self.error = Some(SessionError::from(&error));
            }
        }
        self.loading = false;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_clears_error() {
        let mut state = SessionState::initial();
        state.apply(Err(MarketDataError::RateLimited {
            url: "/api/finnhub".to_string(),
        }));
        state.apply(Ok(Arc::new(json!({"c": 1.0}))));

        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.data.as_deref(), Some(&json!({"c": 1.0})));
    }

    #[test]
    fn test_failure_keeps_last_good_data() {
        let mut state = SessionState::initial();
        state.apply(Ok(Arc::new(json!({"c": 1.0}))));
        state.apply(Err(MarketDataError::HttpStatus {
            url: "/api/finnhub".to_string(),
            status: 500,
        }));

        assert_eq!(state.data.as_deref(), Some(&json!({"c": 1.0})));
        let error = state.error.unwrap();
        assert_eq!(error.kind, ErrorKind::Network);
        assert_eq!(error.message, "API Error: 500");
    }
}
