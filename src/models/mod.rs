pub mod definition;
pub mod field;
pub mod loaders;
pub mod payload;
pub mod registry;

pub use definition::{ElementSpec, FormDefinition};
pub use field::{ChoiceGroup, FieldKind, FormField};
pub use loaders::{load_form_definition, load_or_default};
pub use payload::SubmissionPayload;
pub use registry::{Element, FormRegistry};
