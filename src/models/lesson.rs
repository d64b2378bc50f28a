use serde::{Deserialize, Serialize};

/// 课程内容记录
///
/// 对应 Supabase `lessons_content` 表，归外部存储所有，本系统只读。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: i64,
    pub title: String,
    /// 课程原始正文
    pub content: String,
    /// 复合分区键：`{subject}_{term}_{section}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
}

/// 课程列表项（选课下拉框用，只取 id + 标题）
#[derive(Debug, Clone, Deserialize)]
pub struct LessonSummary {
    pub id: i64,
    pub title: String,
}
