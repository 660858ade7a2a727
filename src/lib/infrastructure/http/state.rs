//! Application state module

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};

use crate::domain::submissions::SubmissionService;

/// Global application state
#[derive(Clone)]
pub struct AppState<S: SubmissionService> {
    /// The time the server started
    pub start_time: DateTime<Utc>,

    /// Submission service
    pub submissions: Arc<S>,
}

/// Implementation of the application state
impl<S> AppState<S>
where
    S: SubmissionService,
{
    /// Create a new application state
    pub fn new(submissions: S) -> Self {
        Self {
            start_time: Utc::now(),
            submissions: Arc::new(submissions),
        }
    }
}

impl<S> fmt::Debug for AppState<S>
where
    S: SubmissionService,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("start_time", &self.start_time)
            .field("submissions", &"SubmissionService")
            .finish()
    }
}

#[cfg(test)]
use crate::domain::submissions::tests::MockSubmissionService;

#[cfg(test)]
/// App state backed by a mock submission service
pub fn test_state(submissions: Option<MockSubmissionService>) -> AppState<MockSubmissionService> {
    let submissions = submissions
        .map(Arc::new)
        .unwrap_or_else(|| Arc::new(MockSubmissionService::new()));

    AppState {
        start_time: Utc::now(),
        submissions,
    }
}
