//! 表单定义
//!
//! 描述表单的标记约定：每个元素有 id / name、类型、是否必填，
//! `type = "radio"` 的元素是具名单选组。

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{AppResult, FormError};
use crate::models::field::{ChoiceGroup, FieldKind, FormField};
use crate::models::registry::{Element, FormRegistry};

/// 单选组在标记中的类型名
pub const RADIO_TYPE: &str = "radio";

/// 单个元素的定义
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSpec {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// 仅单选组使用
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl ElementSpec {
    fn field(id: &str, kind: &str, required: bool, label: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            kind: kind.to_string(),
            required,
            label: Some(label.to_string()),
            options: Vec::new(),
        }
    }

    fn radio(name: &str, label: &str, options: &[&str]) -> Self {
        Self {
            id: String::new(),
            name: name.to_string(),
            kind: RADIO_TYPE.to_string(),
            required: true,
            label: Some(label.to_string()),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    fn is_radio(&self) -> bool {
        self.kind.trim().eq_ignore_ascii_case(RADIO_TYPE)
    }
}

/// 表单定义
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub name: String,
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
}

impl FormDefinition {
    /// 内置的报名表
    pub fn registration() -> Self {
        Self {
            name: "registration".to_string(),
            elements: vec![
                ElementSpec::field("title", "select", true, "Title"),
                ElementSpec::field("fullName", "text", true, "Full name"),
                ElementSpec::field("email", "email", true, "Email address"),
                ElementSpec::field("phone", "tel", true, "Phone number"),
                ElementSpec::field("house", "text", true, "House / building"),
                ElementSpec::field("street", "text", true, "Street"),
                ElementSpec::field("town", "text", true, "Town / city"),
                ElementSpec::radio("gender", "Gender", &["Male", "Female", "Other"]),
                ElementSpec::field("dob", "date", true, "Date of birth"),
                ElementSpec::field("purpose", "textarea", true, "Purpose of registration"),
                ElementSpec::field("diagnosis", "textarea", false, "Diagnosis"),
                ElementSpec::radio(
                    "receivedServices",
                    "Have you received services before?",
                    &["Yes", "No"],
                ),
                ElementSpec::field("impact", "textarea", false, "Impact"),
            ],
        }
    }

    /// 构建字段注册表
    ///
    /// # 返回
    /// 类型未知、缺少标识、标识重复或单选组无选项时返回错误
    pub fn build_registry(&self) -> AppResult<FormRegistry> {
        let mut seen = HashSet::new();
        let mut elements = Vec::with_capacity(self.elements.len());

        for (index, spec) in self.elements.iter().enumerate() {
            let element = if spec.is_radio() {
                if spec.name.is_empty() {
                    return Err(FormError::MissingIdentifier { index }.into());
                }
                if spec.options.is_empty() {
                    return Err(FormError::EmptyChoiceGroup {
                        group: spec.name.clone(),
                    }
                    .into());
                }
                let options: Vec<&str> = spec.options.iter().map(String::as_str).collect();
                let mut group = ChoiceGroup::new(&spec.name, &options);
                if let Some(label) = &spec.label {
                    group = group.with_label(label);
                }
                Element::Group(group)
            } else {
                if spec.id.is_empty() && spec.name.is_empty() {
                    return Err(FormError::MissingIdentifier { index }.into());
                }
                let kind = FieldKind::from_markup(&spec.kind).ok_or_else(|| {
                    FormError::UnknownFieldKind {
                        field: if spec.id.is_empty() { spec.name.clone() } else { spec.id.clone() },
                        kind: spec.kind.clone(),
                    }
                })?;
                let mut field = FormField::new(&spec.id, kind);
                field.name = spec.name.clone();
                field.required = spec.required;
                field.label = spec
                    .label
                    .clone()
                    .unwrap_or_else(|| field.key().to_string());
                Element::Field(field)
            };

            // 字段可以按 id 或 name 查找，两者都占用标识
            let mut identifiers = match &element {
                Element::Field(field) => vec![field.id.as_str(), field.name.as_str()],
                Element::Group(group) => vec![group.name.as_str()],
            };
            identifiers.retain(|identifier| !identifier.is_empty());
            identifiers.dedup();
            for identifier in identifiers {
                if !seen.insert(identifier.to_string()) {
                    return Err(FormError::DuplicateIdentifier {
                        identifier: identifier.to_string(),
                    }
                    .into());
                }
            }
            elements.push(element);
        }

        Ok(FormRegistry::new(elements))
    }
}
