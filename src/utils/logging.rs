//! 日志工具模块
//!
//! 提供日志格式化和输出的辅助函数

use tracing::info;

use crate::config::Config;
use crate::models::Element;
use crate::orchestrator::RunSummary;
use crate::workflow::SubmitOutcome;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 报名表单会话");
    info!(
        "📝 表单定义: {}",
        config.form_definition.as_deref().unwrap_or("内置报名表")
    );
    info!("💾 自动保存间隔: {} 秒", config.autosave_interval_secs);
    info!(
        "📮 EmailJS 服务: {} / 模板: {}",
        config.emailjs_service_id, config.emailjs_template_id
    );
    info!("{}", "=".repeat(60));
}

/// 列出可填写的字段和命令
///
/// # 参数
/// - `elements`: 按文档顺序的表单元素
pub fn log_usage(elements: &[Element]) {
    info!("可填写的字段 (输入 key=value):");
    for element in elements {
        match element {
            Element::Field(field) => info!(
                "  {} [{}]{} - {}",
                field.key(),
                field.kind,
                if field.required { " *" } else { "" },
                field.label
            ),
            Element::Group(group) => info!(
                "  {} [radio] * - {} ({})",
                group.name,
                group.label,
                group.options.join(" / ")
            ),
        }
    }
    info!("输入 :submit 提交, :quit 离开");
}

/// 打印最终统计信息
pub fn log_summary(summary: &RunSummary) {
    info!("\n{}", "=".repeat(60));
    info!("📊 会话结束");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✏️ 输入事件: {}", summary.inputs);
    info!("📤 提交次数: {}", summary.submits);
    match &summary.last_outcome {
        Some(SubmitOutcome::Submitted { location, .. }) => info!("✅ 已提交, 跳转至 {}", location),
        Some(SubmitOutcome::Invalid { first_invalid }) => {
            info!("❌ 未提交: 表单有错误 (首个: {})", first_invalid.as_deref().unwrap_or("-"))
        }
        Some(SubmitOutcome::Failed { .. }) => info!("❌ 未提交: 发送失败"),
        None => info!("未提交"),
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
