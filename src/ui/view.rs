//! 界面能力
//!
//! 校验器和提交控制器只通过 `FormView` 影响界面，不直接操作任何具体前端。

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// 表单界面
pub trait FormView: Send {
    /// 在目标（字段 key 或单选组名）上显示错误
    fn show_error(&mut self, target: &str, message: &str);

    fn clear_error(&mut self, target: &str);

    /// 把目标滚动到可见区域
    fn scroll_into_view(&mut self, target: &str);

    /// 显示/隐藏提交按钮上的加载状态
    fn set_loading(&mut self, loading: bool);

    /// 弹出提示
    fn alert(&mut self, message: &str);

    /// 整页跳转
    fn navigate(&mut self, location: &str);
}

/// 记录下来的界面状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub errors: BTreeMap<String, String>,
    pub scrolled_to: Vec<String>,
    pub loading: bool,
    pub alerts: Vec<String>,
    pub location: Option<String>,
}

/// 无头界面：只记录状态，克隆后共享同一份状态
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    state: Arc<Mutex<ViewState>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前状态的快照
    pub fn snapshot(&self) -> ViewState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FormView for RecordingView {
    fn show_error(&mut self, target: &str, message: &str) {
        self.lock()
            .errors
            .insert(target.to_string(), message.to_string());
    }

    fn clear_error(&mut self, target: &str) {
        self.lock().errors.remove(target);
    }

    fn scroll_into_view(&mut self, target: &str) {
        self.lock().scrolled_to.push(target.to_string());
    }

    fn set_loading(&mut self, loading: bool) {
        self.lock().loading = loading;
    }

    fn alert(&mut self, message: &str) {
        self.lock().alerts.push(message.to_string());
    }

    fn navigate(&mut self, location: &str) {
        self.lock().location = Some(location.to_string());
    }
}
