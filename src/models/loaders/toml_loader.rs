use crate::models::definition::FormDefinition;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载表单定义
pub async fn load_form_definition(toml_file_path: &Path) -> Result<FormDefinition> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    parse_form_definition(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))
}

/// 从 TOML 文本解析表单定义
pub fn parse_form_definition(content: &str) -> Result<FormDefinition> {
    let definition: FormDefinition = toml::from_str(content)?;
    tracing::info!(
        "成功加载表单定义 {}，共 {} 个元素",
        definition.name,
        definition.elements.len()
    );
    Ok(definition)
}

/// 按配置加载表单定义：有路径则读文件，否则使用内置报名表
pub async fn load_or_default(path: Option<&str>) -> Result<FormDefinition> {
    match path {
        Some(path) => {
            tracing::info!("正在加载表单定义: {}", path);
            load_form_definition(Path::new(path)).await
        }
        None => Ok(FormDefinition::registration()),
    }
}
