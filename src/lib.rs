//! # Million Quiz
//!
//! 面向阿尔及利亚 BAC 备考的 AI 出题后端
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 封装外部服务访问
//! - `StoreClient` - Supabase REST / Storage 访问
//! - `LlmClient` - 生成式模型调用（OpenAI 兼容端点，逐次传入凭证）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `ContentService` - 课程内容聚合能力
//! - `GenerationService` - 题目生成能力（凭证池随机抽取 + 位置分档）
//! - `ConsultationService` - 师生咨询投递能力
//! - `Notifier` - 通知侧通道（toast 的抽象）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次选区"的完整出题流程
//! - `QuizSelection` - 选区上下文（科目 + 学期 + 分区 + 可选课程）
//! - `QuizFlow` - 流程编排（聚合 → 生成 → 归一化错误）
//!
//! ### ④ 应用层（App）
//! - `app` - 读取配置、执行一次流程、输出题目文件
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{LlmClient, StoreClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Difficulty, Lesson, Question, Subject};
pub use services::{ConsultationService, ContentService, GenerationService};
pub use workflow::{QuizFlow, QuizSelection};
