pub mod draft_store;
pub mod field_validator;
pub mod form_validator;

pub use draft_store::{spawn_autosave, DraftSnapshot, DraftStore, RestoreStats};
pub use field_validator::{FieldOutcome, FieldValidator};
pub use form_validator::{FormReport, FormValidator};
