use serde::{Deserialize, Serialize};

/// Document construction options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentOptions {
    /// Window in which consecutive edits merge into one undo step
    /// (default: 0, every transaction is its own step)
    pub undo_capture_timeout_millis: u64,
    /// Put the `state` map under undo tracking too (default: false)
    pub track_state_in_undo: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            undo_capture_timeout_millis: 0,
            track_state_in_undo: false,
        }
    }
}

impl DocumentOptions {
    /// Options that group edits made within `millis` into a single undo step.
    pub fn with_capture_timeout(millis: u64) -> Self {
        Self {
            undo_capture_timeout_millis: millis,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = DocumentOptions::default();
        assert_eq!(options.undo_capture_timeout_millis, 0);
        assert!(!options.track_state_in_undo);
    }

    #[test]
    fn test_options_from_partial_json() {
        let options: DocumentOptions =
            serde_json::from_str(r#"{"undo_capture_timeout_millis": 500}"#).unwrap();
        assert_eq!(options, DocumentOptions::with_capture_timeout(500));
    }
}
