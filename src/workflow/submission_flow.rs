//! 提交流程 - 流程层
//!
//! 状态机：
//! Idle → Validating → (Invalid → Idle) | Submitting → (Submitted | Failed → Idle)
//!
//! 唯一的异步点是邮件投递；任何失败都统一处理，不重试，不区分原因。

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::clients::{DeliveryReceipt, EmailDelivery};
use crate::config::Config;
use crate::models::SubmissionPayload;
use crate::services::{DraftStore, FormValidator};
use crate::workflow::form_session::FormSession;

/// 提交失败时展示给用户的提示
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Sorry, there was an error submitting your form. Please try again or contact support.";

/// 提交控制器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Validating,
    Submitting,
    /// 已提交并跳转，会话结束
    Submitted,
}

/// 一次提交的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 校验未通过，界面已显示错误
    Invalid { first_invalid: Option<String> },
    /// 投递成功并已跳转
    Submitted {
        receipt: DeliveryReceipt,
        location: String,
    },
    /// 投递失败，可以重新提交
    Failed { message: String },
}

/// 提交控制器
pub struct SubmissionController {
    client: Arc<dyn EmailDelivery>,
    drafts: DraftStore,
    validator: FormValidator,
    service_id: String,
    template_id: String,
    success_page: String,
    state: SubmitState,
}

impl SubmissionController {
    /// 创建新的提交控制器
    pub fn new(
        config: &Config,
        client: Arc<dyn EmailDelivery>,
        drafts: DraftStore,
        validator: FormValidator,
    ) -> Self {
        Self {
            client,
            drafts,
            validator,
            service_id: config.emailjs_service_id.clone(),
            template_id: config.emailjs_template_id.clone(),
            success_page: config.success_page.clone(),
            state: SubmitState::Idle,
        }
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// 处理一次提交
    pub async fn submit(&mut self, session: &mut FormSession) -> SubmitOutcome {
        self.state = SubmitState::Validating;

        let report = self.validator.validate(session);
        if !report.valid {
            let first_invalid = report.first_invalid().map(str::to_string);
            if let Some(target) = &first_invalid {
                session.view.scroll_into_view(target);
            }
            self.state = SubmitState::Idle;
            return SubmitOutcome::Invalid { first_invalid };
        }

        self.state = SubmitState::Submitting;
        session.view.set_loading(true);
        info!("📤 正在提交表单...");

        let payload = SubmissionPayload::from_registry(&session.registry);
        match self
            .client
            .send(&self.service_id, &self.template_id, &payload)
            .await
        {
            Ok(receipt) => {
                info!("✓ 邮件发送成功: {} {}", receipt.status, receipt.text);
                self.finish_success(session);
                SubmitOutcome::Submitted {
                    receipt,
                    location: self.success_page.clone(),
                }
            }
            Err(e) => {
                error!("❌ 邮件发送失败: {}", e);
                session.view.set_loading(false);
                session.view.alert(GENERIC_FAILURE_MESSAGE);
                self.state = SubmitState::Idle;
                SubmitOutcome::Failed {
                    message: GENERIC_FAILURE_MESSAGE.to_string(),
                }
            }
        }
    }

    /// 标记已提交、清除草稿并跳转
    fn finish_success(&mut self, session: &mut FormSession) {
        if let Err(e) = self.drafts.mark_submitted() {
            warn!("⚠️ 写入提交标记失败: {}", e);
        }
        if let Err(e) = self.drafts.clear() {
            warn!("⚠️ 清除草稿失败: {}", e);
        }
        session.view.navigate(&self.success_page);
        self.state = SubmitState::Submitted;
    }
}
