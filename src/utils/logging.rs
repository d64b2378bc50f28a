//! 日志工具模块
//!
//! 提供 tracing 初始化和日志格式化的辅助函数

use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 默认 info 级别，可通过 `RUST_LOG` 覆盖。
/// 重复调用安全（测试里可能多次初始化）。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn preview_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
