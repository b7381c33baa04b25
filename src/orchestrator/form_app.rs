//! 表单应用 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：加载表单定义、构建字段注册表、打开会话存储、恢复草稿
//! 2. **事件循环**：逐行读取事件（`key=value` 输入、`:submit` 提交、`:quit` 离开页面）
//! 3. **自动保存**：后台定时保存草稿，输入变化时立即保存
//! 4. **资源管理**：唯一持有会话、草稿存储和提交控制器
//!
//! 每个 `key=value` 事件依次视为 input → blur → change。

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::clients::{EmailDelivery, EmailJsClient};
use crate::config::Config;
use crate::infrastructure::{FileSessionStorage, MemorySessionStorage, SessionStorage};
use crate::models::{load_or_default, FormRegistry};
use crate::services::{spawn_autosave, DraftStore, FieldValidator, FormValidator};
use crate::ui::{FormView, TerminalView};
use crate::utils::logging;
use crate::workflow::{FormSession, SubmissionController, SubmitOutcome};

/// 提交命令
pub const SUBMIT_COMMAND: &str = ":submit";
/// 离开页面命令
pub const QUIT_COMMAND: &str = ":quit";

/// 一次运行的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 处理的输入事件数
    pub inputs: usize,
    /// 提交次数
    pub submits: usize,
    /// 最后一次提交的结果
    pub last_outcome: Option<SubmitOutcome>,
}

impl RunSummary {
    pub fn submitted(&self) -> bool {
        matches!(self.last_outcome, Some(SubmitOutcome::Submitted { .. }))
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    session: Arc<Mutex<FormSession>>,
    drafts: DraftStore,
    validator: FieldValidator,
    controller: SubmissionController,
}

impl App {
    /// 初始化应用：终端界面 + EmailJS + 按配置选择的会话存储
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(&config);

        let definition = load_or_default(config.form_definition.as_deref()).await?;
        let registry = definition
            .build_registry()
            .with_context(|| format!("表单定义无效: {}", definition.name))?;

        let storage: Arc<dyn SessionStorage> = match &config.session_file {
            Some(path) => {
                info!("📁 会话文件: {}", path);
                Arc::new(FileSessionStorage::new(path))
            }
            None => Arc::new(MemorySessionStorage::new()),
        };

        let client = EmailJsClient::new(&config).context("无法创建 EmailJS 客户端")?;

        Ok(Self::with_parts(
            config,
            registry,
            Box::new(TerminalView::stdout()),
            storage,
            Arc::new(client),
        ))
    }

    /// 用给定的组件组装应用，并恢复已保存的草稿
    pub fn with_parts(
        config: Config,
        mut registry: FormRegistry,
        view: Box<dyn FormView>,
        storage: Arc<dyn SessionStorage>,
        client: Arc<dyn EmailDelivery>,
    ) -> Self {
        let drafts = DraftStore::new(storage);
        drafts.restore(&mut registry);

        let validator = FieldValidator::new();
        let controller = SubmissionController::new(
            &config,
            client,
            drafts.clone(),
            FormValidator::new(validator.clone()),
        );

        Self {
            config,
            session: Arc::new(Mutex::new(FormSession::new(registry, view))),
            drafts,
            validator,
            controller,
        }
    }

    /// 共享的表单会话
    pub fn session(&self) -> Arc<Mutex<FormSession>> {
        self.session.clone()
    }

    /// 运行事件循环，直到提交成功、收到 `:quit` 或输入结束
    pub async fn run<R>(&mut self, input: R) -> Result<RunSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        logging::log_usage(self.session.lock().await.registry.elements());

        let autosave = spawn_autosave(
            self.session.clone(),
            self.drafts.clone(),
            self.config.autosave_interval(),
        );

        let mut summary = RunSummary::default();
        let mut lines = input.lines();

        while let Some(line) = lines.next_line().await.context("读取输入失败")? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match line {
                SUBMIT_COMMAND => {
                    let outcome = self.submit().await;
                    summary.submits += 1;
                    summary.last_outcome = Some(outcome);
                    if summary.submitted() {
                        break;
                    }
                }
                QUIT_COMMAND => break,
                _ => match line.split_once('=') {
                    Some((key, value)) => {
                        self.handle_input(key.trim(), value.trim()).await;
                        summary.inputs += 1;
                    }
                    None => warn!("⚠️ 无法识别的输入: {}", line),
                },
            }
        }

        autosave.abort();
        self.unload().await;
        logging::log_summary(&summary);

        Ok(summary)
    }

    /// 单个输入事件：input → blur → change
    async fn handle_input(&self, key: &str, value: &str) {
        let mut session = self.session.lock().await;

        match session.input(&self.validator, key, value) {
            None => {
                warn!("⚠️ 表单中没有字段: {}", key);
                return;
            }
            Some((false, _)) => {
                warn!("⚠️ {} 没有选项 {}", key, logging::truncate_text(value, 40));
                return;
            }
            Some((true, _)) => {}
        }

        session.blur(&self.validator, key);

        if let Err(e) = self.drafts.save(&session.registry) {
            warn!("⚠️ 保存草稿失败: {}", e);
        }
        debug!("字段 {} 已更新", key);
    }

    async fn submit(&mut self) -> SubmitOutcome {
        let mut session = self.session.lock().await;
        self.controller.submit(&mut session).await
    }

    /// 离开页面：未提交时保存草稿
    async fn unload(&self) {
        let session = self.session.lock().await;
        match self.drafts.on_unload(&session.registry) {
            Ok(true) => info!("💾 草稿已保存，下次启动时会恢复"),
            Ok(false) => {}
            Err(e) => warn!("⚠️ 离开时保存草稿失败: {}", e),
        }
    }
}
