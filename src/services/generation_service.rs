//! 题目生成服务 - 业务能力层
//!
//! 负责"内容文本 → 15 道分档题目"这一能力：
//! 截断内容、组装 prompt、从凭证池随机抽 key、调用模型、
//! 解析校验并按位置映射难度。
//!
//! 失败不重试：换 key 只发生在下一次独立调用（软故障转移）。

use chrono::Utc;
use rand::Rng;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::clients::LlmClient;
use crate::config::Config;
use crate::error::{AppResult, BusinessError, LlmError};
use crate::models::{Difficulty, GeneratedItem, Question, Subject, GENERATED_LESSON_TAG};

/// 送入模型的内容文本上限（硬截断，约束请求体积和成本）
pub const MAX_CONTENT_CHARS: usize = 15_000;

/// 每批生成的题目数
pub const QUESTION_COUNT: usize = 15;

/// 可用批次的最低题目数
///
/// 低于 5 题视为生成失败；5-14 题容忍为部分输出。
pub const MIN_VIABLE_ITEMS: usize = 5;

/// 题目生成服务
pub struct GenerationService {
    llm: LlmClient,
    /// 启动时合并去重后的凭证池，进程生命周期内只读
    api_keys: Vec<String>,
}

impl GenerationService {
    /// 创建新的题目生成服务
    pub fn new(config: &Config) -> Self {
        Self {
            llm: LlmClient::new(config),
            api_keys: config.api_keys.clone(),
        }
    }

    /// 从内容文本生成一批分档题目
    ///
    /// # 参数
    /// - `subject`: 科目（决定专项指令和题目标签）
    /// - `term`: 学期标签（如 "t2"）
    /// - `content`: 聚合后的课程内容
    ///
    /// # 返回
    /// 最多 [`QUESTION_COUNT`] 道题，难度按位置 5/5/5 分档
    pub async fn generate(
        &self,
        subject: Subject,
        term: &str,
        content: &str,
    ) -> AppResult<Vec<Question>> {
        let content = truncate_content(content, MAX_CONTENT_CHARS);
        let prompt = build_prompt(subject, content);

        let api_key = self.pick_api_key()?;

        info!(
            "🤖 调用模型生成题目: 科目={} 内容长度={} 字符",
            subject.id(),
            content.chars().count()
        );

        let reply = self.llm.generate_json(api_key, &prompt).await?;

        let items = parse_reply(&reply)?;
        info!("✓ 模型返回 {} 道题目", items.len());

        if items.len() < QUESTION_COUNT {
            warn!(
                "⚠️ 模型返回数量不足 {} 道，按部分输出继续 ({} 道)",
                QUESTION_COUNT,
                items.len()
            );
        }

        let base_id = Utc::now().timestamp_millis();
        Ok(map_questions(items, subject, term, base_id))
    }

    /// 从凭证池均匀随机抽取一个 key（负载均衡）
    ///
    /// 不记录历史失败，也不在本次调用内轮换。
    fn pick_api_key(&self) -> AppResult<&str> {
        if self.api_keys.is_empty() {
            return Err(BusinessError::NoCredentialsConfigured.into());
        }

        let index = rand::thread_rng().gen_range(0..self.api_keys.len());
        debug!("凭证池大小: {}, 本次使用第 {} 个", self.api_keys.len(), index + 1);

        Ok(&self.api_keys[index])
    }
}

/// 截断内容文本到 `max_chars` 个字符
///
/// 幂等且确定：不超限的输入原样返回。
pub fn truncate_content(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &content[..byte_index],
        None => content,
    }
}

/// 组装出题 prompt
///
/// 要求模型产出恰好 15 道 MCQ、三档难度各 5 道、
/// 每题 4 个选项一个正确下标，并且只回复纯 JSON 数组。
fn build_prompt(subject: Subject, content: &str) -> String {
    format!(
        r#"أنت أستاذ خبير ومعد مسابقات "من سيربح المليون" التعليمية للبكالوريا الجزائرية.

المهمة: قم بتوليد 15 سؤالاً دقيقاً متعدد الخيارات (MCQ) من النص المرفق أدناه.
المادة: {subject} - {instruction}

شروط الأسئلة (صارمة جداً):
1. الأسئلة 1-5: مستوى "سهل" (للمبتدئين).
2. الأسئلة 6-10: مستوى "متوسط" (للطالب العادي).
3. الأسئلة 11-15: مستوى "صعب" (للمتميزين - تتطلب دقة وتركيز).
4. الخيارات يجب أن تكون 4 (أ، ب، ج، د).
5. يجب أن يكون هناك خيار واحد صحيح فقط.
6. الرد يجب أن يكون بصيغة JSON Array صافي فقط بدون أي نصوص إضافية.

صيغة JSON المطلوبة:
[
  {{
    "text": "نص السؤال هنا؟",
    "options": ["الخيار 1", "الخيار 2", "الخيار 3", "الخيار 4"],
    "correctAnswerIndex": 0,
    "difficulty": "easy"
  }}
]
*ملاحظة: correctAnswerIndex هو رقم (0 للخيار الأول، 1 للثاني، وهكذا).*

النص المرجعي للاستخراج:
{content}"#,
        subject = subject.id(),
        instruction = subject.specialized_instruction(),
        content = content
    )
}

/// 解析模型回复为题目元素列表
///
/// 校验顺序：
/// 1. 去掉可能的 markdown 代码围栏
/// 2. 必须是 JSON 数组（不是数组 → `MalformedResponse`）
/// 3. 至少 [`MIN_VIABLE_ITEMS`] 个元素（不足 → `InsufficientItems`，不返回部分列表）
/// 4. 每个元素符合 schema（违反 → `MalformedResponse`）
pub fn parse_reply(reply: &str) -> Result<Vec<GeneratedItem>, LlmError> {
    let cleaned = strip_code_fences(reply);

    let value: serde_json::Value =
        serde_json::from_str(cleaned).map_err(|e| LlmError::MalformedResponse {
            detail: format!("JSON 解析失败: {}", e),
        })?;

    let array = value.as_array().ok_or_else(|| LlmError::MalformedResponse {
        detail: "响应不是 JSON 数组".to_string(),
    })?;

    if array.len() < MIN_VIABLE_ITEMS {
        return Err(LlmError::InsufficientItems { count: array.len() });
    }

    serde_json::from_value(value.clone()).map_err(|e| LlmError::MalformedResponse {
        detail: format!("题目元素不符合 schema: {}", e),
    })
}

/// 去掉模型偶尔包裹的 markdown 代码围栏（```json ... ```）
fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();

    // 惰性编译开销可忽略：每次生成只调用一次
    if let Ok(re) = Regex::new(r"(?s)^```(?:json)?\s*(.*?)\s*```$") {
        if let Some(caps) = re.captures(trimmed) {
            if let Some(inner) = caps.get(1) {
                return inner.as_str();
            }
        }
    }

    trimmed
}

/// 把模型元素按位置映射为游戏题目
///
/// - 难度由位置决定（0-4 easy / 5-9 medium / 其余 hard），
///   模型自报的 difficulty 字段被静默丢弃 —— 这保证了严格的 5/5/5 分档
/// - id = 生成时刻毫秒数 + 位置，保证批次内唯一
/// - 超出 15 道的部分被截掉
pub fn map_questions(
    items: Vec<GeneratedItem>,
    subject: Subject,
    term: &str,
    base_id: i64,
) -> Vec<Question> {
    items
        .into_iter()
        .take(QUESTION_COUNT)
        .enumerate()
        .map(|(idx, item)| Question {
            id: base_id + idx as i64,
            text: item.text,
            options: item.options,
            correct_answer_index: item.correct_answer_index,
            prize: "0".to_string(),
            difficulty: Difficulty::from_position(idx),
            subject: subject.id().to_string(),
            chapter: term.to_string(),
            lesson: GENERATED_LESSON_TAG.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample_item(text: &str, model_difficulty: &str) -> GeneratedItem {
        GeneratedItem {
            text: text.to_string(),
            options: vec![
                "أ".to_string(),
                "ب".to_string(),
                "ج".to_string(),
                "د".to_string(),
            ],
            correct_answer_index: 1,
            difficulty: Some(model_difficulty.to_string()),
        }
    }

    fn sample_reply(count: usize) -> String {
        let items: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "text": format!("سؤال {}", i),
                    "options": ["أ", "ب", "ج", "د"],
                    "correctAnswerIndex": i % 4,
                    "difficulty": "hard"
                })
            })
            .collect();
        serde_json::to_string(&items).unwrap()
    }

    // ========== 截断 ==========

    #[test]
    fn test_truncate_short_content_unchanged() {
        let content = "نص قصير";
        assert_eq!(truncate_content(content, MAX_CONTENT_CHARS), content);
    }

    #[test]
    fn test_truncate_exact_boundary() {
        let content: String = std::iter::repeat('ب').take(MAX_CONTENT_CHARS).collect();
        assert_eq!(truncate_content(&content, MAX_CONTENT_CHARS), content);
    }

    #[test]
    fn test_truncate_long_content_takes_first_15000_chars() {
        let content: String = std::iter::repeat('ع').take(MAX_CONTENT_CHARS + 500).collect();
        let truncated = truncate_content(&content, MAX_CONTENT_CHARS);
        assert_eq!(truncated.chars().count(), MAX_CONTENT_CHARS);
        assert!(content.starts_with(truncated));
    }

    #[test]
    fn test_truncate_idempotent() {
        let content: String = std::iter::repeat('x').take(MAX_CONTENT_CHARS * 2).collect();
        let once = truncate_content(&content, MAX_CONTENT_CHARS);
        let twice = truncate_content(once, MAX_CONTENT_CHARS);
        assert_eq!(once, twice);
    }

    // ========== prompt ==========

    #[test]
    fn test_prompt_embeds_content_and_instruction() {
        let prompt = build_prompt(Subject::History, "محتوى الدرس التجريبي");
        assert!(prompt.contains("محتوى الدرس التجريبي"));
        assert!(prompt.contains("history"));
        assert!(prompt.contains(Subject::History.specialized_instruction()));
        assert!(prompt.contains("15 سؤالاً"));
        assert!(prompt.contains("correctAnswerIndex"));
    }

    // ========== 解析 ==========

    #[test]
    fn test_parse_reply_valid_batch() {
        let items = parse_reply(&sample_reply(15)).unwrap();
        assert_eq!(items.len(), 15);
    }

    #[test]
    fn test_parse_reply_strips_code_fences() {
        let fenced = format!("```json\n{}\n```", sample_reply(6));
        let items = parse_reply(&fenced).unwrap();
        assert_eq!(items.len(), 6);
    }

    #[test]
    fn test_parse_reply_below_floor_fails_without_partial_list() {
        let err = parse_reply(&sample_reply(3)).unwrap_err();
        assert!(matches!(err, LlmError::InsufficientItems { count: 3 }));
    }

    #[test]
    fn test_parse_reply_non_array_is_malformed() {
        let err = parse_reply(r#"{"questions": []}"#).unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse { .. }));
    }

    #[test]
    fn test_parse_reply_invalid_json_is_malformed() {
        let err = parse_reply("المعذرة، لا يمكنني توليد الأسئلة").unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse { .. }));
    }

    // ========== 映射 ==========

    #[test]
    fn test_map_questions_banding_ignores_model_difficulty() {
        // 模型全部自报 "hard"，分档仍然必须是位置的纯函数
        let items: Vec<GeneratedItem> = (0..15)
            .map(|i| sample_item(&format!("سؤال {}", i), "hard"))
            .collect();

        let questions = map_questions(items, Subject::History, "t2", 1_700_000_000_000);

        assert_eq!(questions.len(), 15);
        for (idx, q) in questions.iter().enumerate() {
            assert_eq!(q.difficulty, Difficulty::from_position(idx));
        }

        let easy = questions.iter().filter(|q| q.difficulty == Difficulty::Easy).count();
        let medium = questions.iter().filter(|q| q.difficulty == Difficulty::Medium).count();
        let hard = questions.iter().filter(|q| q.difficulty == Difficulty::Hard).count();
        assert_eq!((easy, medium, hard), (5, 5, 5));
    }

    #[test]
    fn test_map_questions_partial_batch_banding() {
        // 7 道题：min(7,5)=5 道 easy，剩余 2 道 medium
        let items: Vec<GeneratedItem> = (0..7)
            .map(|i| sample_item(&format!("سؤال {}", i), "easy"))
            .collect();

        let questions = map_questions(items, Subject::Arabic, "t1", 0);

        let easy = questions.iter().filter(|q| q.difficulty == Difficulty::Easy).count();
        let medium = questions.iter().filter(|q| q.difficulty == Difficulty::Medium).count();
        let hard = questions.iter().filter(|q| q.difficulty == Difficulty::Hard).count();
        assert_eq!((easy, medium, hard), (5, 2, 0));
    }

    #[test]
    fn test_map_questions_tags_and_ids() {
        let items: Vec<GeneratedItem> = (0..15)
            .map(|i| sample_item(&format!("سؤال {}", i), "easy"))
            .collect();

        let base_id = 1_700_000_000_000;
        let questions = map_questions(items, Subject::History, "t2", base_id);

        let ids: HashSet<i64> = questions.iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), questions.len());

        for (idx, q) in questions.iter().enumerate() {
            assert_eq!(q.id, base_id + idx as i64);
            assert_eq!(q.subject, "history");
            assert_eq!(q.chapter, "t2");
            assert_eq!(q.lesson, GENERATED_LESSON_TAG);
            assert_eq!(q.prize, "0");
        }
    }

    #[test]
    fn test_map_questions_caps_at_fifteen() {
        let items: Vec<GeneratedItem> = (0..20)
            .map(|i| sample_item(&format!("سؤال {}", i), "easy"))
            .collect();

        let questions = map_questions(items, Subject::French, "t3", 0);
        assert_eq!(questions.len(), QUESTION_COUNT);
    }

    // ========== 凭证池 ==========

    fn service_with_keys(keys: &[&str]) -> GenerationService {
        let config = Config {
            api_keys: keys.iter().map(|k| k.to_string()).collect(),
            ..Config::default()
        };
        GenerationService::new(&config)
    }

    #[test]
    fn test_pick_api_key_empty_pool() {
        let service = service_with_keys(&[]);
        let err = service.pick_api_key().unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppError::Business(BusinessError::NoCredentialsConfigured)
        ));
    }

    #[test]
    fn test_pick_api_key_eventually_selects_every_key() {
        let service = service_with_keys(&["key-a", "key-b", "key-c"]);

        let mut seen = HashSet::new();
        for _ in 0..300 {
            seen.insert(service.pick_api_key().unwrap().to_string());
        }

        assert_eq!(seen.len(), 3, "每个凭证都应该有机会被抽中");
    }
}
