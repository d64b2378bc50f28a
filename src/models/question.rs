use serde::{Deserialize, Serialize};

/// AI 来源题目的 lesson 标记
///
/// 生成的题目不对应具体某一课，用固定哨兵值标记来源。
pub const GENERATED_LESSON_TAG: &str = "generated";

/// 难度档位（三档，按题目位置分配）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 简单（第 1-5 题）
    Easy,
    /// 中等（第 6-10 题）
    Medium,
    /// 困难（第 11-15 题）
    Hard,
}

impl Difficulty {
    /// 按批次内位置分配难度
    ///
    /// 难度是位置的纯函数：0-4 简单，5-9 中等，其余困难。
    /// 模型自报的难度字段会被忽略，以保证严格的 5/5/5 分档。
    pub fn from_position(index: usize) -> Self {
        if index < 5 {
            Difficulty::Easy
        } else if index < 10 {
            Difficulty::Medium
        } else {
            Difficulty::Hard
        }
    }

    /// 获取标准名称
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 模型原始返回的单个题目元素
///
/// 与 prompt 中要求的 JSON schema 对应（camelCase）。
/// `difficulty` 虽然会被模型填写，但映射时被丢弃。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedItem {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    /// 模型自报难度，不可信，仅为容忍模型输出而保留
    #[serde(default)]
    pub difficulty: Option<String>,
}

/// 游戏题目记录
///
/// 由生成客户端从 AI 输出映射而来，创建后不可变，
/// 游戏界面只读消费。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// 批次内唯一 id（生成时刻毫秒数 + 位置）
    pub id: i64,
    /// 题干
    pub text: String,
    /// 4 个选项
    pub options: Vec<String>,
    /// 正确选项下标（0-based）
    pub correct_answer_index: usize,
    /// 奖金，固定 "0"，由游戏界面计算
    pub prize: String,
    /// 难度（按位置分配）
    pub difficulty: Difficulty,
    /// 科目标签
    pub subject: String,
    /// 学期标签
    pub chapter: String,
    /// 课程标签（AI 生成固定为 "generated"）
    pub lesson: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_from_position_banding() {
        for i in 0..5 {
            assert_eq!(Difficulty::from_position(i), Difficulty::Easy);
        }
        for i in 5..10 {
            assert_eq!(Difficulty::from_position(i), Difficulty::Medium);
        }
        for i in 10..20 {
            assert_eq!(Difficulty::from_position(i), Difficulty::Hard);
        }
    }

    #[test]
    fn test_generated_item_deserializes_camel_case() {
        let json = r#"{
            "text": "متى اندلعت الثورة التحريرية؟",
            "options": ["1954", "1962", "1945", "1956"],
            "correctAnswerIndex": 0,
            "difficulty": "easy"
        }"#;

        let item: GeneratedItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.correct_answer_index, 0);
        assert_eq!(item.options.len(), 4);
        assert_eq!(item.difficulty.as_deref(), Some("easy"));
    }

    #[test]
    fn test_generated_item_difficulty_optional() {
        let json = r#"{
            "text": "سؤال",
            "options": ["أ", "ب", "ج", "د"],
            "correctAnswerIndex": 2
        }"#;

        let item: GeneratedItem = serde_json::from_str(json).unwrap();
        assert!(item.difficulty.is_none());
    }
}
