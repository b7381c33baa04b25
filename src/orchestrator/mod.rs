//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! form_app::App (事件循环、自动保存、资源所有者)
//!     ↓
//! workflow (FormSession / SubmissionController)
//!     ↓
//! services (能力层：字段校验 / 整表校验 / 草稿)
//!     ↓
//! infrastructure + clients + ui (会话存储 / EmailJS / 界面)
//! ```

pub mod form_app;

pub use form_app::{App, RunSummary, QUIT_COMMAND, SUBMIT_COMMAND};
