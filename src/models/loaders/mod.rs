pub mod toml_loader;

pub use toml_loader::{load_form_definition, load_or_default, parse_form_definition};
