use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::registry::FormRegistry;

/// 提交时间的显示格式（美式本地时间）
pub const SUBMISSION_DATE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// 邮件模板变量
///
/// 只在一次提交中存在，不会持久化。键名固定为报名表的字段标识
/// （`fullName`、`house`/`street`/`town` 等）；自定义表单只有使用这些标识的
/// 字段会被发送，缺少的字段以空字符串发送。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub title: String,
    pub full_name: String,
    pub email: String,
    pub purpose: String,
    pub address: String,
    pub phone: String,
    pub gender: String,
    pub dob: String,
    pub diagnosis: String,
    pub received_services: String,
    pub impact: String,
    pub submission_date: String,
}

impl SubmissionPayload {
    /// 以当前时间构建
    pub fn from_registry(registry: &FormRegistry) -> Self {
        Self::from_registry_at(registry, Local::now())
    }

    /// 从字段注册表构建，地址三段合并为一个字段
    pub fn from_registry_at(registry: &FormRegistry, now: DateTime<Local>) -> Self {
        let value = |key: &str| registry.value_of(key).unwrap_or_default().to_string();

        Self {
            title: value("title"),
            full_name: value("fullName"),
            email: value("email"),
            purpose: value("purpose"),
            address: format!("{}, {}, {}", value("house"), value("street"), value("town")),
            phone: value("phone"),
            gender: value("gender"),
            dob: value("dob"),
            diagnosis: value("diagnosis"),
            received_services: value("receivedServices"),
            impact: value("impact"),
            submission_date: now.format(SUBMISSION_DATE_FORMAT).to_string(),
        }
    }
}
