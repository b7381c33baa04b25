//! EmailJS 客户端
//!
//! 封装邮件投递服务的调用，提交控制器只依赖 `EmailDelivery` 能力

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::SubmissionPayload;

/// EmailJS 发送接口路径
pub const SEND_ENDPOINT: &str = "api/v1.0/email/send";

/// 投递成功的回执
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub status: u16,
    pub text: String,
}

/// 邮件投递能力
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailDelivery: Send + Sync {
    /// 以指定服务和模板发送一封邮件，模板变量即提交数据
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        payload: &SubmissionPayload,
    ) -> Result<DeliveryReceipt, ApiError>;
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a SubmissionPayload,
}

/// EmailJS REST 客户端
pub struct EmailJsClient {
    http: reqwest::Client,
    base_url: String,
    public_key: String,
}

impl EmailJsClient {
    /// 创建新的 EmailJS 客户端（用账户公钥初始化）
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::api_request_failed(&config.emailjs_api_base_url, e))?;

        Ok(Self::with_http(config, http))
    }

    /// 使用已构建好的 HTTP 客户端
    pub fn with_http(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: config.emailjs_api_base_url.trim_end_matches('/').to_string(),
            public_key: config.emailjs_public_key.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url, SEND_ENDPOINT)
    }
}

#[async_trait]
impl EmailDelivery for EmailJsClient {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        payload: &SubmissionPayload,
    ) -> Result<DeliveryReceipt, ApiError> {
        let endpoint = self.endpoint();
        let body = SendRequest {
            service_id,
            template_id,
            user_id: &self.public_key,
            template_params: payload,
        };

        debug!("调用 EmailJS: {} (服务: {}, 模板: {})", endpoint, service_id, template_id);

        let response = self
            .http
            .post(&endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("EmailJS 请求失败: {}", e);
                ApiError::RequestFailed {
                    endpoint: endpoint.clone(),
                    source: Box::new(e),
                }
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(ApiError::BadResponse {
                endpoint,
                status: status.as_u16(),
                message: if text.is_empty() { None } else { Some(text) },
            });
        }

        debug!("EmailJS 返回: {} {}", status, text);

        Ok(DeliveryReceipt {
            status: status.as_u16(),
            text,
        })
    }
}
