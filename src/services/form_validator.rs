//! 整表校验 - 业务能力层
//!
//! 对每个字段和每个单选组都执行校验（不短路），保证所有错误状态都被填充。

use tracing::info;

use crate::models::Element;
use crate::services::field_validator::FieldValidator;
use crate::workflow::FormSession;

/// 整表校验结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormReport {
    pub valid: bool,
    /// 按文档顺序的所有不合法目标
    pub invalid: Vec<String>,
}

impl FormReport {
    /// 需要滚动到的第一个错误
    pub fn first_invalid(&self) -> Option<&str> {
        self.invalid.first().map(String::as_str)
    }
}

/// 整表校验器
#[derive(Debug, Clone, Default)]
pub struct FormValidator {
    field_validator: FieldValidator,
}

impl FormValidator {
    pub fn new(field_validator: FieldValidator) -> Self {
        Self { field_validator }
    }

    /// 校验整个表单
    pub fn validate(&self, session: &mut FormSession) -> FormReport {
        let FormSession { registry, view } = session;
        let mut report = FormReport {
            valid: true,
            invalid: Vec::new(),
        };

        for element in registry.elements_mut() {
            let outcome = match &mut *element {
                Element::Field(field) => self.field_validator.validate(field, view.as_mut()),
                Element::Group(group) => self.field_validator.validate_group(group, view.as_mut()),
            };
            if !outcome.valid {
                report.valid = false;
                report.invalid.push(element.target().to_string());
            }
        }

        if !report.valid {
            info!("表单校验未通过: {} 处错误", report.invalid.len());
        }
        report
    }
}
