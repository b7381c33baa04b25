//! 字段注册表
//!
//! 初始化时一次性构建，按文档顺序保存所有字段与单选组，
//! 校验、草稿、提交都基于这里的类型化数据而不是实时查询。

use crate::models::field::{ChoiceGroup, FormField};

/// 表单元素：普通字段或单选组
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Field(FormField),
    Group(ChoiceGroup),
}

impl Element {
    /// 错误展示所挂载的目标（字段 key 或组名）
    pub fn target(&self) -> &str {
        match self {
            Element::Field(field) => field.key(),
            Element::Group(group) => &group.name,
        }
    }

    pub fn has_error(&self) -> bool {
        match self {
            Element::Field(field) => field.has_error(),
            Element::Group(group) => group.has_error(),
        }
    }
}

/// 字段注册表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormRegistry {
    elements: Vec<Element>,
}

impl FormRegistry {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// 按文档顺序的所有元素
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    /// 所有普通字段
    pub fn fields(&self) -> impl Iterator<Item = &FormField> {
        self.elements.iter().filter_map(|e| match e {
            Element::Field(field) => Some(field),
            Element::Group(_) => None,
        })
    }

    /// 所有单选组
    pub fn groups(&self) -> impl Iterator<Item = &ChoiceGroup> {
        self.elements.iter().filter_map(|e| match e {
            Element::Group(group) => Some(group),
            Element::Field(_) => None,
        })
    }

    /// 按 id 或 name 查找字段
    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.fields().find(|f| f.matches(key))
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut FormField> {
        self.elements.iter_mut().find_map(|e| match e {
            Element::Field(field) if field.matches(key) => Some(field),
            _ => None,
        })
    }

    pub fn group(&self, name: &str) -> Option<&ChoiceGroup> {
        self.groups().find(|g| g.name == name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut ChoiceGroup> {
        self.elements.iter_mut().find_map(|e| match e {
            Element::Group(group) if group.name == name => Some(group),
            _ => None,
        })
    }

    /// 读取某个键的当前值：字段取输入值，单选组取选中项
    pub fn value_of(&self, key: &str) -> Option<&str> {
        if let Some(field) = self.field(key) {
            return Some(field.value.as_str());
        }
        self.group(key).and_then(|g| g.selected_value())
    }

    /// 写入某个键的值
    ///
    /// 单选组只有存在对应选项时才会选中。
    ///
    /// # 返回
    /// 找到目标并写入时返回 true
    pub fn set_value(&mut self, key: &str, value: &str) -> bool {
        if let Some(field) = self.field_mut(key) {
            field.value = value.to_string();
            return true;
        }
        match self.group_mut(key) {
            Some(group) => group.select(value),
            None => false,
        }
    }

    /// 第一个处于错误状态的元素
    pub fn first_error(&self) -> Option<&Element> {
        self.elements.iter().find(|e| e.has_error())
    }
}
