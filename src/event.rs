//! Workflow event hydration
//!
//! Reads the JSON event payload the CI runner writes to disk and recovers
//! the issue or pull request number the workflow is running against.
//! Hydration is best-effort: a missing indicator, a missing file, and a
//! malformed payload are distinct, logged outcomes, and none of them
//! prevents facade construction.

use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A nested object that carries an issue or pull request number
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NumberedObject {
    pub number: u64,
}

/// The slice of a workflow event payload the facade cares about
///
/// Payloads have no fixed schema beyond these fields; everything else is
/// retained in `extra` for callers that need the full event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub issue: Option<NumberedObject>,
    #[serde(default)]
    pub pull_request: Option<NumberedObject>,
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl EventPayload {
    /// Resolve the issue/PR number: a nested `issue` wins, then a nested
    /// `pull_request`, then a top-level `number`
    pub fn issue_number(&self) -> Option<u64> {
        self.issue
            .as_ref()
            .map(|i| i.number)
            .or_else(|| self.pull_request.as_ref().map(|pr| pr.number))
            .or(self.number)
    }
}

/// Outcome of event hydration
#[derive(Debug)]
pub enum EventState {
    /// The CI indicator variable is unset; hydration was skipped
    NotCi,
    /// Running in CI but the event file path is unset or unreadable
    Missing(Option<PathBuf>),
    /// The event file exists but is not valid JSON
    Malformed(String),
    /// Parsed event payload
    Loaded(EventPayload),
}

impl EventState {
    /// The hydrated issue/PR number, if any
    pub fn issue_number(&self) -> Option<u64> {
        match self {
            EventState::Loaded(payload) => payload.issue_number(),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, EventState::Loaded(_))
    }
}

/// Hydrate the workflow event from disk
///
/// `ci` gates the whole operation; `path` is the runner-provided payload
/// location. Never fails: every degraded outcome is logged and recorded
/// in the returned state.
pub fn hydrate(ci: bool, path: Option<&Path>) -> EventState {
    if !ci {
        debug!("CI indicator not set, skipping event hydration");
        return EventState::NotCi;
    }

    let path = match path {
        Some(p) => p,
        None => {
            warn!("running in CI but no event path is set");
            return EventState::Missing(None);
        }
    };

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "event file is unreadable");
            return EventState::Missing(Some(path.to_path_buf()));
        }
    };

    match serde_json::from_str::<EventPayload>(&raw) {
        Ok(payload) => {
            debug!(
                path = %path.display(),
                issue_number = ?payload.issue_number(),
                "hydrated workflow event"
            );
            EventState::Loaded(payload)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "event file is not valid JSON");
            EventState::Malformed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn event_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_issue_number_prefers_issue() {
        let payload: EventPayload = serde_json::from_str(
            r#"{"issue": {"number": 91}, "pull_request": {"number": 7}, "number": 3}"#,
        )
        .unwrap();
        assert_eq!(payload.issue_number(), Some(91));
    }

    #[test]
    fn test_issue_number_falls_back_to_pull_request() {
        let payload: EventPayload =
            serde_json::from_str(r#"{"pull_request": {"number": 91}, "number": 3}"#).unwrap();
        assert_eq!(payload.issue_number(), Some(91));
    }

    #[test]
    fn test_issue_number_falls_back_to_top_level() {
        let payload: EventPayload = serde_json::from_str(r#"{"number": 91}"#).unwrap();
        assert_eq!(payload.issue_number(), Some(91));
    }

    #[test]
    fn test_issue_number_absent() {
        let payload: EventPayload =
            serde_json::from_str(r#"{"action": "opened"}"#).unwrap();
        assert_eq!(payload.issue_number(), None);
    }

    #[test]
    fn test_extra_fields_are_retained() {
        let payload: EventPayload =
            serde_json::from_str(r#"{"action": "labeled", "number": 5}"#).unwrap();
        assert_eq!(
            payload.extra.get("action").and_then(|v| v.as_str()),
            Some("labeled")
        );
    }

    #[test]
    fn test_hydrate_not_ci() {
        let file = event_file(r#"{"issue": {"number": 91}}"#);
        let state = hydrate(false, Some(file.path()));
        assert!(matches!(state, EventState::NotCi));
        assert_eq!(state.issue_number(), None);
    }

    #[test]
    fn test_hydrate_missing_path() {
        let state = hydrate(true, None);
        assert!(matches!(state, EventState::Missing(None)));
    }

    #[test]
    fn test_hydrate_missing_file() {
        let state = hydrate(true, Some(Path::new("/nonexistent/event.json")));
        assert!(matches!(state, EventState::Missing(Some(_))));
    }

    #[test]
    fn test_hydrate_malformed_json() {
        let file = event_file("{not json");
        let state = hydrate(true, Some(file.path()));
        assert!(matches!(state, EventState::Malformed(_)));
        assert_eq!(state.issue_number(), None);
    }

    #[test]
    fn test_hydrate_loaded() {
        let file = event_file(r#"{"issue": {"number": 91}}"#);
        let state = hydrate(true, Some(file.path()));
        assert!(state.is_loaded());
        assert_eq!(state.issue_number(), Some(91));
    }
}
