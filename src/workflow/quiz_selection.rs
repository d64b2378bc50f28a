//! 选区上下文
//!
//! 封装"学生选了哪个科目/分区/学期/课程"这一信息

use std::fmt::Display;

use crate::models::Subject;

/// 选区上下文
///
/// 一次生成流程所需的全部选择信息
#[derive(Debug, Clone)]
pub struct QuizSelection {
    /// 科目
    pub subject: Subject,

    /// 学期标签（t1 / t2 / t3）
    pub term: String,

    /// 分区 id（科目下的出题范围）
    pub section: String,

    /// 指定课程 id（None 表示整个分区出题）
    pub lesson_id: Option<i64>,
}

impl QuizSelection {
    /// 创建新的选区上下文
    pub fn new(subject: Subject, term: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            subject,
            term: term.into(),
            section: section.into(),
            lesson_id: None,
        }
    }

    /// 指定具体课程
    pub fn with_lesson(mut self, lesson_id: i64) -> Self {
        self.lesson_id = Some(lesson_id);
        self
    }

    /// 复合分区键：`{subject}_{term}_{section}`
    ///
    /// 与数据库 `lessons_content.section_id` 的拼法保持一致。
    pub fn section_id(&self) -> String {
        format!("{}_{}_{}", self.subject.id(), self.term, self.section)
    }
}

impl Display for QuizSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.lesson_id {
            Some(lesson_id) => write!(f, "[{} 课程#{}]", self.section_id(), lesson_id),
            None => write!(f, "[{}]", self.section_id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_id_composite_key() {
        let selection = QuizSelection::new(Subject::History, "t2", "dates");
        assert_eq!(selection.section_id(), "history_t2_dates");
    }

    #[test]
    fn test_with_lesson() {
        let selection = QuizSelection::new(Subject::Arabic, "t1", "criticism").with_lesson(42);
        assert_eq!(selection.lesson_id, Some(42));
        assert_eq!(selection.section_id(), "arabic_t1_criticism");
    }
}
