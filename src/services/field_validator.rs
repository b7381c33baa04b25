//! 字段校验 - 业务能力层
//!
//! 只负责"单个字段是否合法"，按优先级依次检查，第一个失败的规则生效。

use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;
use tracing::debug;

use crate::models::{ChoiceGroup, FieldKind, FormField};
use crate::ui::FormView;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PHONE_MESSAGE: &str = "Please enter a valid phone number";
pub const DATE_INVALID_MESSAGE: &str = "Please enter a valid date";
pub const DATE_PAST_MESSAGE: &str = "Date of birth must be in the past";
pub const GROUP_MESSAGE: &str = "Please select an option";

/// 日期输入框的值格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\+]?[(]?[0-9]{3}[)]?[-\s\.]?[0-9]{3}[-\s\.]?[0-9]{4,6}$")
        .expect("phone pattern compiles")
});

/// 单个字段（或单选组）的校验结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
    pub valid: bool,
    /// 合法时为空
    pub message: String,
}

impl FieldOutcome {
    pub fn valid() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    pub fn invalid(message: &str) -> Self {
        Self {
            valid: false,
            message: message.to_string(),
        }
    }
}

/// 字段校验器
#[derive(Debug, Clone, Default)]
pub struct FieldValidator {
    today: Option<NaiveDate>,
}

impl FieldValidator {
    /// 以本地时间的今天为基准
    pub fn new() -> Self {
        Self { today: None }
    }

    /// 固定"今天"，用于可重复的校验
    pub fn with_today(today: NaiveDate) -> Self {
        Self { today: Some(today) }
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// 纯校验，不修改字段
    pub fn check(&self, field: &FormField) -> FieldOutcome {
        let value = field.value.as_str();

        if field.required && value.trim().is_empty() {
            return FieldOutcome::invalid(REQUIRED_MESSAGE);
        }
        if value.is_empty() {
            return FieldOutcome::valid();
        }

        match field.kind {
            FieldKind::Email if !is_valid_email(value) => FieldOutcome::invalid(EMAIL_MESSAGE),
            FieldKind::Tel if !is_valid_phone(value) => FieldOutcome::invalid(PHONE_MESSAGE),
            FieldKind::Date => match NaiveDate::parse_from_str(value.trim(), DATE_FORMAT) {
                Err(_) => FieldOutcome::invalid(DATE_INVALID_MESSAGE),
                Ok(date) if date >= self.today() => FieldOutcome::invalid(DATE_PAST_MESSAGE),
                Ok(_) => FieldOutcome::valid(),
            },
            _ => FieldOutcome::valid(),
        }
    }

    /// 校验并更新字段及界面上的错误状态
    pub fn validate(&self, field: &mut FormField, view: &mut dyn FormView) -> FieldOutcome {
        let outcome = self.check(field);
        if outcome.valid {
            field.error = None;
            view.clear_error(field.key());
        } else {
            debug!("字段 {} 校验失败: {}", field.key(), outcome.message);
            field.error = Some(outcome.message.clone());
            view.show_error(field.key(), &outcome.message);
        }
        outcome
    }

    /// 单选组是否已选择
    pub fn check_group(&self, group: &ChoiceGroup) -> FieldOutcome {
        match group.selected_value() {
            Some(_) => FieldOutcome::valid(),
            None => FieldOutcome::invalid(GROUP_MESSAGE),
        }
    }

    /// 校验单选组并更新错误状态
    pub fn validate_group(&self, group: &mut ChoiceGroup, view: &mut dyn FormView) -> FieldOutcome {
        let outcome = self.check_group(group);
        if outcome.valid {
            group.error = None;
            view.clear_error(&group.name);
        } else {
            debug!("单选组 {} 未选择", group.name);
            group.error = Some(outcome.message.clone());
            view.show_error(&group.name, &outcome.message);
        }
        outcome
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_PATTERN.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::RecordingView;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn create_test_validator() -> FieldValidator {
        FieldValidator::with_today(today())
    }

    fn field(kind: FieldKind, required: bool, value: &str) -> FormField {
        let mut field = FormField::new("f", kind);
        field.required = required;
        field.value = value.to_string();
        field
    }

    #[test]
    fn test_required_empty_or_whitespace() {
        let validator = create_test_validator();
        for kind in [FieldKind::Text, FieldKind::Email, FieldKind::Tel, FieldKind::Date] {
            for value in ["", "   ", "\t\n"] {
                let outcome = validator.check(&field(kind, true, value));
                assert_eq!(outcome, FieldOutcome::invalid(REQUIRED_MESSAGE), "{:?} {:?}", kind, value);
            }
        }
    }

    #[test]
    fn test_optional_empty_is_valid() {
        let validator = create_test_validator();
        assert!(validator.check(&field(FieldKind::Email, false, "")).valid);
        assert!(validator.check(&field(FieldKind::Date, false, "")).valid);
    }

    #[test]
    fn test_email_pattern() {
        for ok in ["a@b.com", "x@y.z", "first.last+tag@sub.example.org"] {
            assert!(is_valid_email(ok), "{}", ok);
        }
        for bad in ["not-an-email", "a@b", "ab.com", "a b@c.d", "a@b c.d", "@b.com", "a@.", "a@@b.com"] {
            assert!(!is_valid_email(bad), "{}", bad);
        }

        let outcome = create_test_validator().check(&field(FieldKind::Email, true, "not-an-email"));
        assert_eq!(outcome.message, EMAIL_MESSAGE);
    }

    #[test]
    fn test_phone_pattern() {
        for ok in ["123-456-7890", "(123) 456-7890", "+1234567890", "123.456.789012", "123 456 7890"] {
            assert!(is_valid_phone(ok), "{}", ok);
        }
        for bad in ["12-456-7890", "123-456-789", "123-456-7890123", "abc-def-ghij", "123--456-7890"] {
            assert!(!is_valid_phone(bad), "{}", bad);
        }

        let outcome = create_test_validator().check(&field(FieldKind::Tel, false, "555"));
        assert_eq!(outcome.message, PHONE_MESSAGE);
    }

    #[test]
    fn test_date_must_be_in_the_past() {
        let validator = create_test_validator();

        assert!(validator.check(&field(FieldKind::Date, true, "2000-01-01")).valid);
        assert!(validator.check(&field(FieldKind::Date, true, "2024-06-14")).valid);

        for value in ["2024-06-15", "2024-06-16", "2099-01-01"] {
            let outcome = validator.check(&field(FieldKind::Date, true, value));
            assert_eq!(outcome.message, DATE_PAST_MESSAGE, "{}", value);
        }
    }

    #[test]
    fn test_unparseable_date_is_rejected() {
        let validator = create_test_validator();
        for value in ["yesterday", "2024-13-01", "01/02/2000"] {
            let outcome = validator.check(&field(FieldKind::Date, false, value));
            assert_eq!(outcome.message, DATE_INVALID_MESSAGE, "{}", value);
        }
    }

    #[test]
    fn test_required_wins_over_type_rules() {
        let validator = create_test_validator();
        let outcome = validator.check(&field(FieldKind::Email, true, "  "));
        assert_eq!(outcome.message, REQUIRED_MESSAGE);
    }

    #[test]
    fn test_validate_toggles_error_state() {
        let validator = create_test_validator();
        let view = RecordingView::new();
        let mut handle = view.clone();
        let mut email = field(FieldKind::Email, true, "bad");

        let outcome = validator.validate(&mut email, &mut handle);
        assert!(!outcome.valid);
        assert_eq!(email.error.as_deref(), Some(EMAIL_MESSAGE));
        assert_eq!(view.snapshot().errors.get("f").map(String::as_str), Some(EMAIL_MESSAGE));

        email.value = "a@b.com".to_string();
        let outcome = validator.validate(&mut email, &mut handle);
        assert!(outcome.valid);
        assert!(outcome.message.is_empty());
        assert!(email.error.is_none());
        assert!(view.snapshot().errors.is_empty());
    }

    #[test]
    fn test_group_requires_selection() {
        let validator = create_test_validator();
        let mut view = RecordingView::new();
        let mut group = ChoiceGroup::new("gender", &["Male", "Female"]);

        let outcome = validator.validate_group(&mut group, &mut view);
        assert_eq!(outcome.message, GROUP_MESSAGE);
        assert!(group.has_error());

        group.select("Male");
        assert!(validator.validate_group(&mut group, &mut view).valid);
        assert!(!group.has_error());
    }
}
