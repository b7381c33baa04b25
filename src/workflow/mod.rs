pub mod form_session;
pub mod submission_flow;

pub use form_session::FormSession;
pub use submission_flow::{SubmissionController, SubmitOutcome, SubmitState, GENERIC_FAILURE_MESSAGE};
