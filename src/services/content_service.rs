//! 内容聚合服务 - 业务能力层
//!
//! 只负责"把选区变成一段文本"能力，不关心后续生成流程

use tracing::{debug, info};

use crate::clients::StoreClient;
use crate::config::Config;
use crate::error::{AppResult, BusinessError};
use crate::models::{Lesson, LessonSummary};
use crate::workflow::QuizSelection;

/// 整个分区出题时最多聚合的课程数
///
/// 取 8 节课以保证有足够素材生成 15 道题，同时限制请求体积。
pub const MAX_SECTION_LESSONS: usize = 8;

/// 内容聚合服务
///
/// 职责：
/// - 按选区从数据库拉取课程内容
/// - 拼接为一段有界长度的文本
/// - 不出现 Vec<Question>
/// - 不关心 prompt / 生成流程
pub struct ContentService {
    store: StoreClient,
}

impl ContentService {
    /// 创建新的内容聚合服务
    pub fn new(config: &Config) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    /// 聚合选区对应的课程内容
    ///
    /// - 指定了具体课程：取该课的标题 + 正文
    /// - 否则：按复合分区键最多取 [`MAX_SECTION_LESSONS`] 节课的正文，
    ///   以空行分隔拼接；一节都没有则返回 `InsufficientContent`
    pub async fn aggregate(&self, selection: &QuizSelection) -> AppResult<String> {
        if let Some(lesson_id) = selection.lesson_id {
            info!("📖 按指定课程聚合内容: lesson_id={}", lesson_id);
            let lesson = self.store.fetch_lesson(lesson_id).await?;
            return Ok(format_single_lesson(&lesson));
        }

        let section_id = selection.section_id();
        info!("📖 按分区聚合内容: {}", section_id);

        let lessons = self
            .store
            .fetch_lessons_by_section(&section_id, MAX_SECTION_LESSONS)
            .await?;

        debug!("分区 {} 聚合到 {} 节课程", section_id, lessons.len());

        aggregate_section_content(&section_id, &lessons)
    }

    /// 列出分区下可选的课程（选课下拉框用）
    pub async fn list_lessons(&self, section_id: &str) -> AppResult<Vec<LessonSummary>> {
        Ok(self.store.list_lesson_titles(section_id).await?)
    }
}

/// 单节课程的拼接格式：标题一行 + 原始正文
fn format_single_lesson(lesson: &Lesson) -> String {
    format!("الدرس: {}\nالمحتوى الخام: {}", lesson.title, lesson.content)
}

/// 整个分区的拼接：各课正文以空行分隔，保持存储返回顺序
///
/// 没有任何记录时返回 `InsufficientContent`，保证生成客户端不会被调用。
fn aggregate_section_content(section_id: &str, lessons: &[Lesson]) -> AppResult<String> {
    if lessons.is_empty() {
        return Err(BusinessError::InsufficientContent {
            section_id: section_id.to_string(),
        }
        .into());
    }

    let bodies: Vec<&str> = lessons.iter().map(|l| l.content.as_str()).collect();
    Ok(bodies.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn lesson(id: i64, title: &str, content: &str) -> Lesson {
        Lesson {
            id,
            title: title.to_string(),
            content: content.to_string(),
            section_id: Some("history_t2_dates".to_string()),
        }
    }

    #[test]
    fn test_format_single_lesson() {
        let l = lesson(7, "الثورة التحريرية", "اندلعت الثورة في 1 نوفمبر 1954.");
        assert_eq!(
            format_single_lesson(&l),
            "الدرس: الثورة التحريرية\nالمحتوى الخام: اندلعت الثورة في 1 نوفمبر 1954."
        );
    }

    #[test]
    fn test_aggregate_section_joins_with_blank_line() {
        let lessons = vec![
            lesson(1, "أ", "المحتوى الأول"),
            lesson(2, "ب", "المحتوى الثاني"),
            lesson(3, "ج", "المحتوى الثالث"),
        ];

        let blob = aggregate_section_content("history_t2_dates", &lessons).unwrap();
        assert_eq!(blob, "المحتوى الأول\n\nالمحتوى الثاني\n\nالمحتوى الثالث");
    }

    #[test]
    fn test_aggregate_section_empty_is_insufficient_content() {
        let err = aggregate_section_content("history_t2_dates", &[]).unwrap_err();
        assert!(matches!(
            err,
            AppError::Business(BusinessError::InsufficientContent { .. })
        ));
    }
}
