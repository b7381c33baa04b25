//! 草稿存储 - 业务能力层
//!
//! 把当前字段值整体写入会话存储（每次覆盖，不合并），页面加载时尽力恢复。

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value as JsonValue;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::error::AppResult;
use crate::infrastructure::SessionStorage;
use crate::models::{Element, FormRegistry};
use crate::workflow::FormSession;

/// 草稿在会话存储中的键
pub const DRAFT_KEY: &str = "iganze_form_draft";
/// "已提交"标记的键
pub const SUBMITTED_KEY: &str = "formSubmitted";
/// 默认自动保存间隔
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

/// 草稿快照：字段标识 → 值
pub type DraftSnapshot = BTreeMap<String, String>;

/// 恢复统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreStats {
    pub restored: usize,
    pub skipped: usize,
}

/// 草稿存储
#[derive(Clone)]
pub struct DraftStore {
    storage: Arc<dyn SessionStorage>,
}

impl DraftStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// 当前字段值的快照
    ///
    /// 普通字段只记录非空值（键为 id 或 name），单选组记录选中项（键为组名）。
    pub fn snapshot(registry: &FormRegistry) -> DraftSnapshot {
        let mut snapshot = DraftSnapshot::new();
        for element in registry.elements() {
            match element {
                Element::Field(field) if !field.value.is_empty() => {
                    snapshot.insert(field.key().to_string(), field.value.clone());
                }
                Element::Group(group) => {
                    if let Some(selected) = group.selected_value() {
                        snapshot.insert(group.name.clone(), selected.to_string());
                    }
                }
                Element::Field(_) => {}
            }
        }
        snapshot
    }

    /// 保存草稿，整体覆盖之前的内容
    ///
    /// # 返回
    /// 返回写入的条目数
    pub fn save(&self, registry: &FormRegistry) -> AppResult<usize> {
        let snapshot = Self::snapshot(registry);
        let serialized = serde_json::to_string(&snapshot)?;
        self.storage.set(DRAFT_KEY, &serialized)?;
        debug!("草稿已保存: {} 个字段", snapshot.len());
        Ok(snapshot.len())
    }

    /// 读取已保存的草稿（不做恢复）
    pub fn load(&self) -> Option<String> {
        self.storage.get(DRAFT_KEY)
    }

    /// 恢复草稿
    ///
    /// 存储内容损坏时只记录日志；单个条目无法恢复时跳过，不影响其他条目。
    pub fn restore(&self, registry: &mut FormRegistry) -> RestoreStats {
        let mut stats = RestoreStats::default();
        let Some(saved) = self.load() else {
            return stats;
        };

        let entries: serde_json::Map<String, JsonValue> = match serde_json::from_str(&saved) {
            Ok(JsonValue::Object(entries)) => entries,
            Ok(other) => {
                error!("❌ 恢复草稿失败: 草稿不是对象 ({})", other);
                return stats;
            }
            Err(e) => {
                error!("❌ 恢复草稿失败: {}", e);
                return stats;
            }
        };

        for (key, value) in entries {
            let Some(value) = value.as_str() else {
                warn!("⚠️ 草稿字段 {} 的值不是字符串，已跳过", key);
                stats.skipped += 1;
                continue;
            };
            if registry.set_value(&key, value) {
                stats.restored += 1;
            } else {
                debug!("草稿字段 {} 无法匹配，已跳过", key);
                stats.skipped += 1;
            }
        }

        info!(
            "✓ 草稿恢复完成: 恢复 {} 个, 跳过 {} 个",
            stats.restored, stats.skipped
        );
        stats
    }

    /// 页面卸载：未提交时保存草稿
    ///
    /// # 返回
    /// 是否执行了保存
    pub fn on_unload(&self, registry: &FormRegistry) -> AppResult<bool> {
        if self.is_submitted() {
            debug!("表单已提交，卸载时不再保存草稿");
            return Ok(false);
        }
        self.save(registry)?;
        Ok(true)
    }

    pub fn is_submitted(&self) -> bool {
        self.storage.get(SUBMITTED_KEY).is_some()
    }

    /// 设置"已提交"标记
    pub fn mark_submitted(&self) -> AppResult<()> {
        self.storage.set(SUBMITTED_KEY, "true")
    }

    /// 删除草稿
    pub fn clear(&self) -> AppResult<()> {
        self.storage.remove(DRAFT_KEY)
    }
}

/// 启动周期性自动保存
///
/// 第一次保存发生在一个周期之后；保存在会话锁内完成，
/// 因此与事件触发的保存不会交错。周期为零时使用默认间隔。
pub fn spawn_autosave(
    session: Arc<Mutex<FormSession>>,
    store: DraftStore,
    period: Duration,
) -> JoinHandle<()> {
    let period = if period.is_zero() {
        warn!("⚠️ 自动保存间隔为 0，改用默认的 {} 秒", AUTOSAVE_INTERVAL.as_secs());
        AUTOSAVE_INTERVAL
    } else {
        period
    };

    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let session = session.lock().await;
            if let Err(e) = store.save(&session.registry) {
                warn!("⚠️ 自动保存草稿失败: {}", e);
            }
        }
    })
}
