//! # Registration Form
//!
//! 报名表单会话：字段校验、草稿自动保存/恢复、通过 EmailJS 提交
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 会话存储（内存 / JSON 文件），只暴露按键读写能力
//! - `clients/` - EmailJS 客户端，只暴露 `send()` 能力
//! - `ui/` - 界面能力（错误展示、滚动、加载状态、提示、跳转）
//!
//! ### ② 业务能力层（Services）
//! - `FieldValidator` - 单个字段 / 单选组校验
//! - `FormValidator` - 整表校验（不短路）
//! - `DraftStore` - 草稿保存、恢复、定时自动保存
//!
//! ### ③ 流程层（Workflow）
//! - `FormSession` - 字段注册表 + 界面，显式传给各组件
//! - `SubmissionController` - 提交状态机（校验 → 发送 → 跳转 / 报错）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator::App` - 事件循环、自动保存任务、资源管理
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod ui;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{DeliveryReceipt, EmailDelivery, EmailJsClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{FileSessionStorage, MemorySessionStorage, SessionStorage};
pub use models::{FormDefinition, FormRegistry, SubmissionPayload};
pub use orchestrator::{App, RunSummary};
pub use services::{DraftStore, FieldValidator, FormValidator};
pub use ui::{FormView, RecordingView, TerminalView};
pub use workflow::{FormSession, SubmissionController, SubmitOutcome, SubmitState};
