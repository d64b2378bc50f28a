//! 出题流程 - 流程层
//!
//! 核心职责：定义"一次选区 → 一批题目"的完整流程
//!
//! 流程顺序：
//! 1. 聚合课程内容（没有内容直接失败，不会调用模型）
//! 2. 生成题目（随机抽 key → 调用模型 → 解析映射）
//! 3. 失败时把归一化错误推给通知侧通道
//!
//! 单个用户动作只走一条流水线，不并发、不重试、不可取消；
//! 防重复提交由外层 UI 负责。

use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::Question;
use crate::services::{ContentService, GenerationService, Notifier, Severity};
use crate::utils::logging::preview_text;
use crate::workflow::quiz_selection::QuizSelection;

/// 出题流程
///
/// - 编排内容聚合与题目生成
/// - 保证所有失败在此边界被归一化（调用方拿到的是本地化分类，不是原始传输错误）
/// - 不持有任何网络资源以外的状态
pub struct QuizFlow {
    content_service: ContentService,
    generation_service: GenerationService,
    verbose_logging: bool,
}

impl QuizFlow {
    /// 创建新的出题流程
    pub fn new(config: &Config) -> Self {
        Self {
            content_service: ContentService::new(config),
            generation_service: GenerationService::new(config),
            verbose_logging: config.verbose_logging,
        }
    }

    /// 执行一次完整的出题流程
    ///
    /// 成功返回题目列表；失败时先通过 `notifier` 推送本地化提示，
    /// 再把错误返回给调用方（调用方可以选择忽略）。
    pub async fn run(
        &self,
        selection: &QuizSelection,
        notifier: &dyn Notifier,
    ) -> AppResult<Vec<Question>> {
        info!("🚀 开始出题流程 {}", selection);
        notifier.notify("جاري قراءة الدروس وتحليل المحتوى...", Severity::Info);

        // ========== 步骤 1: 内容聚合 ==========
        let content = match self.content_service.aggregate(selection).await {
            Ok(content) => content,
            Err(e) => {
                warn!("⚠️ 内容聚合失败 {}: {}", selection, e);
                notifier.notify(e.user_message(), Severity::Error);
                return Err(e);
            }
        };

        if self.verbose_logging {
            info!("聚合内容预览: {}", preview_text(&content, 80));
        }

        notifier.notify("الذكاء الاصطناعي يقوم بصياغة الأسئلة...", Severity::Info);

        // ========== 步骤 2: 题目生成 ==========
        let questions = match self
            .generation_service
            .generate(selection.subject, &selection.term, &content)
            .await
        {
            Ok(questions) => questions,
            Err(e) => {
                warn!("⚠️ 题目生成失败 {}: {}", selection, e);
                notifier.notify(e.user_message(), Severity::Error);
                return Err(e);
            }
        };

        info!("✓ 出题完成 {}: 共 {} 道题", selection, questions.len());

        Ok(questions)
    }

    /// 列出分区下可选的课程（选课界面用）
    pub async fn list_lessons(
        &self,
        selection: &QuizSelection,
    ) -> AppResult<Vec<crate::models::LessonSummary>> {
        self.content_service
            .list_lessons(&selection.section_id())
            .await
    }
}
