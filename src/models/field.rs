use phf::phf_map;
use serde::{Deserialize, Serialize};

/// 字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Date,
    Select,
    Textarea,
}

/// 标记类型名 → 字段类型
static FIELD_KINDS: phf::Map<&'static str, FieldKind> = phf_map! {
    "text" => FieldKind::Text,
    "email" => FieldKind::Email,
    "tel" => FieldKind::Tel,
    "phone" => FieldKind::Tel,
    "date" => FieldKind::Date,
    "select" => FieldKind::Select,
    "textarea" => FieldKind::Textarea,
};

impl FieldKind {
    /// 从标记中的类型名解析（大小写不敏感）
    pub fn from_markup(type_name: &str) -> Option<Self> {
        FIELD_KINDS
            .get(type_name.trim().to_ascii_lowercase().as_str())
            .copied()
    }

    /// 标记中使用的类型名
    pub fn markup_name(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Tel => "tel",
            FieldKind::Date => "date",
            FieldKind::Select => "select",
            FieldKind::Textarea => "textarea",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.markup_name())
    }
}

/// 单个表单字段（不含单选）
///
/// 字段的错误状态即界面上的错误展示状态，由校验器写入。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub id: String,
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
    pub error: Option<String>,
}

impl FormField {
    /// 创建新字段，id 与 name 相同
    pub fn new(identifier: &str, kind: FieldKind) -> Self {
        Self {
            id: identifier.to_string(),
            name: identifier.to_string(),
            label: identifier.to_string(),
            kind,
            required: false,
            value: String::new(),
            error: None,
        }
    }

    /// 标记为必填
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// 草稿中使用的键：优先 id，否则 name
    pub fn key(&self) -> &str {
        if self.id.is_empty() {
            &self.name
        } else {
            &self.id
        }
    }

    /// 按 id 或 name 匹配
    pub fn matches(&self, key: &str) -> bool {
        (!self.id.is_empty() && self.id == key) || (!self.name.is_empty() && self.name == key)
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// 单选组（互斥选项）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceGroup {
    pub name: String,
    pub label: String,
    pub options: Vec<String>,
    selected: Option<usize>,
    pub error: Option<String>,
}

impl ChoiceGroup {
    pub fn new(name: &str, options: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            label: name.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            selected: None,
            error: None,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// 选中值等于 `value` 的选项
    ///
    /// # 返回
    /// 找不到对应选项时返回 false，原有选择保持不变
    pub fn select(&mut self, value: &str) -> bool {
        match self.options.iter().position(|o| o == value) {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}
