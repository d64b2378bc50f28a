use serde::{Deserialize, Serialize};

/// 咨询消息正文载荷
///
/// 以 JSON 字符串的形式存入 `admin_messages.content`，
/// 这样一条消息可以同时携带文字、图片路径和科目。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationPayload {
    /// 学生的问题文字
    pub text: String,
    /// 存储桶内的图片路径（无图片时为 null）
    pub image_path: Option<String>,
    /// 科目显示名称
    pub subject: String,
}

/// 待插入的咨询消息行
#[derive(Debug, Clone, Serialize)]
pub struct NewConsultation {
    pub user_id: String,
    pub user_name: String,
    /// JSON 序列化后的 [`ConsultationPayload`]
    pub content: String,
    pub is_replied: bool,
    /// ISO-8601 时间戳
    pub created_at: String,
}
