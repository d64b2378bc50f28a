/// Supabase 数据访问客户端
///
/// 封装所有与 Supabase REST (PostgREST) / Storage 的交互。
/// 课程内容表对本系统只读，咨询消息表只写。
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::StoreError;
use crate::models::{Lesson, LessonSummary, NewConsultation};

/// 课程内容表名
const LESSONS_TABLE: &str = "lessons_content";
/// 咨询消息表名
const MESSAGES_TABLE: &str = "admin_messages";
/// 咨询图片存储桶
const CONSULTATIONS_BUCKET: &str = "consultations";

/// Supabase 客户端
pub struct StoreClient {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl StoreClient {
    /// 创建新的数据访问客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.store_base_url.trim_end_matches('/').to_string(),
            anon_key: config.store_anon_key.clone(),
        }
    }

    /// 按 id 获取单节课程（标题 + 正文）
    pub async fn fetch_lesson(&self, lesson_id: i64) -> Result<Lesson, StoreError> {
        let endpoint = self.rest_endpoint(LESSONS_TABLE);

        let rows: Vec<Lesson> = self
            .get_json(
                &endpoint,
                &[
                    ("select", "id,title,content,section_id".to_string()),
                    ("id", format!("eq.{}", lesson_id)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        rows.into_iter().next().ok_or(StoreError::RecordNotFound {
            table: LESSONS_TABLE.to_string(),
            id: lesson_id,
        })
    }

    /// 按复合分区键获取课程内容，数量受 `limit` 约束
    ///
    /// 返回顺序为存储默认顺序，下游不依赖排序。
    pub async fn fetch_lessons_by_section(
        &self,
        section_id: &str,
        limit: usize,
    ) -> Result<Vec<Lesson>, StoreError> {
        let endpoint = self.rest_endpoint(LESSONS_TABLE);

        let rows: Vec<Lesson> = self
            .get_json(
                &endpoint,
                &[
                    ("select", "id,title,content,section_id".to_string()),
                    ("section_id", format!("eq.{}", section_id)),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        debug!("分区 {} 下获取到 {} 节课程", section_id, rows.len());

        Ok(rows)
    }

    /// 列出分区下的课程（id + 标题，按创建时间升序）
    ///
    /// 供选课界面的"指定课程"下拉框使用。
    pub async fn list_lesson_titles(
        &self,
        section_id: &str,
    ) -> Result<Vec<LessonSummary>, StoreError> {
        let endpoint = self.rest_endpoint(LESSONS_TABLE);

        self.get_json(
            &endpoint,
            &[
                ("select", "id,title".to_string()),
                ("section_id", format!("eq.{}", section_id)),
                ("order", "created_at.asc".to_string()),
            ],
        )
        .await
    }

    /// 插入一条咨询消息
    pub async fn insert_consultation(
        &self,
        message: &NewConsultation,
    ) -> Result<(), StoreError> {
        let endpoint = self.rest_endpoint(MESSAGES_TABLE);

        let response = self
            .http
            .post(&endpoint)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Prefer", "return=minimal")
            .json(message)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed {
                endpoint: endpoint.clone(),
                source: Box::new(e),
            })?;

        self.ensure_success(&endpoint, response).await?;

        debug!("咨询消息已写入 {}", MESSAGES_TABLE);

        Ok(())
    }

    /// 上传咨询图片到存储桶
    ///
    /// 返回桶内路径，随消息正文一起存储。
    pub async fn upload_consultation_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError> {
        let endpoint = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, CONSULTATIONS_BUCKET, file_name
        );

        let response = self
            .http
            .post(&endpoint)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed {
                endpoint: endpoint.clone(),
                source: Box::new(e),
            })?;

        self.ensure_success(&endpoint, response).await?;

        Ok(format!("{}/{}", CONSULTATIONS_BUCKET, file_name))
    }

    // ========== 辅助方法 ==========

    fn rest_endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// 发送 GET 请求并反序列化响应
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, StoreError> {
        let response = self
            .http
            .get(endpoint)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .query(query)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed {
                endpoint: endpoint.to_string(),
                source: Box::new(e),
            })?;

        let response = self.ensure_success(endpoint, response).await?;

        response
            .json()
            .await
            .map_err(|e| StoreError::JsonParseFailed {
                source: Box::new(e),
            })
    }

    /// 非 2xx 响应统一转为 BadResponse
    async fn ensure_success(
        &self,
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // 尽量带上 PostgREST 的错误消息，便于排查
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| {
                v.get("message")
                    .and_then(|m| m.as_str())
                    .map(|s| s.to_string())
            });

        Err(StoreError::BadResponse {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message,
        })
    }
}
