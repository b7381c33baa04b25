//! 表单会话
//!
//! 页面加载时构建一次，持有字段注册表和界面，
//! 作为显式参数传给校验、草稿、提交各个组件。

use crate::models::FormRegistry;
use crate::services::field_validator::{FieldOutcome, FieldValidator};
use crate::ui::FormView;

/// 表单会话
pub struct FormSession {
    pub registry: FormRegistry,
    pub view: Box<dyn FormView>,
}

impl FormSession {
    pub fn new(registry: FormRegistry, view: Box<dyn FormView>) -> Self {
        Self { registry, view }
    }

    /// 输入事件：写入值；字段已处于错误状态时立即重新校验
    ///
    /// # 返回
    /// 找不到目标时返回 None；否则返回是否写入成功以及（可能的）重新校验结果
    pub fn input(
        &mut self,
        validator: &FieldValidator,
        key: &str,
        value: &str,
    ) -> Option<(bool, Option<FieldOutcome>)> {
        if let Some(field) = self.registry.field_mut(key) {
            field.value = value.to_string();
            let outcome = if field.has_error() {
                Some(validator.validate(field, self.view.as_mut()))
            } else {
                None
            };
            return Some((true, outcome));
        }

        let group = self.registry.group_mut(key)?;
        let selected = group.select(value);
        let outcome = if selected && group.has_error() {
            Some(validator.validate_group(group, self.view.as_mut()))
        } else {
            None
        };
        Some((selected, outcome))
    }

    /// 失焦事件：校验该字段
    pub fn blur(&mut self, validator: &FieldValidator, key: &str) -> Option<FieldOutcome> {
        let field = self.registry.field_mut(key)?;
        Some(validator.validate(field, self.view.as_mut()))
    }
}
