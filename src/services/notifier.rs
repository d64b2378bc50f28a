//! 通知侧通道 - 业务能力层
//!
//! 对应前端的全局 toast：编排层在流程节点 / 失败时调用
//! `(message, severity)`，由具体实现决定如何呈现。
//! 本 crate 只提供日志实现，UI 呈现不在范围内。

use tracing::{error, info, warn};

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// 通知侧通道
pub trait Notifier: Send + Sync {
    /// 推送一条面向学生的提示（消息已本地化）
    fn notify(&self, message: &str, severity: Severity);
}

/// 默认实现：写入 tracing 日志
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => info!("🔔 {}", message),
            Severity::Success => info!("✅ {}", message),
            Severity::Error => error!("❌ {}", message),
        }
    }
}

/// 静默实现（测试用）
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        // 有意丢弃；测试里只关心返回值
        if severity == Severity::Error {
            warn!("(测试通知) {}", message);
        }
    }
}

/// 记录所有通知的测试实现（供各层测试观察通知序列）
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: std::sync::Mutex<Vec<(String, Severity)>>,
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_string(), severity));
    }
}
