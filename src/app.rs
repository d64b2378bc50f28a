use anyhow::Result;
use std::fs;
use tracing::{error, info};

use crate::config::Config;
use crate::error::BusinessError;
use crate::models::{Difficulty, Question, Subject};
use crate::services::LogNotifier;
use crate::workflow::{QuizFlow, QuizSelection};

/// 应用主结构
pub struct App {
    config: Config,
    flow: QuizFlow,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let flow = QuizFlow::new(&config);

        Ok(Self { config, flow })
    }

    /// 运行应用主逻辑
    ///
    /// 从环境变量读取选区，跑一次完整的出题流程，
    /// 成功则把题目写入输出文件。流程内的失败已经被归一化
    /// 并推送给通知通道，这里只记录、不再向上传播。
    pub async fn run(&self) -> Result<()> {
        let selection = selection_from_env()?;

        let notifier = LogNotifier;

        match self.flow.run(&selection, &notifier).await {
            Ok(questions) => {
                self.write_output(&questions)?;
                log_batch_stats(&questions);
                Ok(())
            }
            Err(e) => {
                // 用户已经收到本地化提示，这里保留技术细节便于排查
                error!("❌ 出题流程失败 {}: {}", selection, e);
                Ok(())
            }
        }
    }

    /// 把生成的题目写入输出文件
    fn write_output(&self, questions: &[Question]) -> Result<()> {
        let json = serde_json::to_string_pretty(questions)?;
        fs::write(&self.config.output_file, json)?;
        info!("💾 题目已保存至: {}", self.config.output_file);
        Ok(())
    }
}

/// 从环境变量组装选区
///
/// `QUIZ_SUBJECT` / `QUIZ_TERM` / `QUIZ_SECTION` 必填（带默认值），
/// `QUIZ_LESSON_ID` 可选。
fn selection_from_env() -> Result<QuizSelection> {
    let subject_id = std::env::var("QUIZ_SUBJECT").unwrap_or_else(|_| "history".to_string());
    let term = std::env::var("QUIZ_TERM").unwrap_or_else(|_| "t1".to_string());
    let section = std::env::var("QUIZ_SECTION").unwrap_or_else(|_| "dates".to_string());

    let subject = Subject::from_id(&subject_id).ok_or(BusinessError::SubjectParseFailed {
        subject: subject_id,
    })?;

    let mut selection = QuizSelection::new(subject, term, section);

    if let Some(lesson_id) = std::env::var("QUIZ_LESSON_ID")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        selection = selection.with_lesson(lesson_id);
    }

    Ok(selection)
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - AI 出题模式");
    info!("📊 模型: {} | 凭证池: {} 个 key", config.llm_model_name, config.api_keys.len());
    info!("{}", "=".repeat(60));
}

fn log_batch_stats(questions: &[Question]) {
    let count_of = |d: Difficulty| questions.iter().filter(|q| q.difficulty == d).count();

    info!("{}", "=".repeat(60));
    info!("📊 本批题目统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!(
        "✅ 共 {} 道: 简单 {} / 中等 {} / 困难 {}",
        questions.len(),
        count_of(Difficulty::Easy),
        count_of(Difficulty::Medium),
        count_of(Difficulty::Hard)
    );
    info!("{}", "=".repeat(60));
}
