//! Form submissions module.

mod render;
mod service;
mod submission;

pub use render::{render, RenderedBody};
pub use service::{SubmissionService, SubmissionServiceImpl};
pub use submission::{FormField, Submission};
