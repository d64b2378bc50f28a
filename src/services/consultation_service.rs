//! 咨询服务 - 业务能力层
//!
//! 学生向真人教师提交问题（可附一张图片），
//! 消息进入 `admin_messages` 收件箱等待教师回复。

use chrono::Utc;
use tracing::info;

use crate::clients::StoreClient;
use crate::config::Config;
use crate::error::{AppResult, BusinessError};
use crate::models::{ConsultationPayload, NewConsultation};

/// 咨询图片大小上限（2MB，节省存储空间）
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// 待上传的咨询图片
#[derive(Debug, Clone)]
pub struct ConsultationImage {
    /// 原始文件扩展名（如 "png"）
    pub extension: String,
    /// MIME 类型（如 "image/png"）
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// 咨询服务
pub struct ConsultationService {
    store: StoreClient,
}

impl ConsultationService {
    /// 创建新的咨询服务
    pub fn new(config: &Config) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    /// 提交一条咨询
    ///
    /// 有图片时先传存储桶再写消息；消息正文是 JSON 序列化的载荷，
    /// 同时携带文字、图片路径和科目。
    pub async fn submit(
        &self,
        user_id: &str,
        user_name: &str,
        subject_name: &str,
        text: &str,
        image: Option<ConsultationImage>,
    ) -> AppResult<()> {
        let now = Utc::now();

        let image_path = match image {
            Some(image) => {
                if image.bytes.len() > MAX_IMAGE_BYTES {
                    return Err(BusinessError::ImageTooLarge {
                        size: image.bytes.len(),
                        max_size: MAX_IMAGE_BYTES,
                    }
                    .into());
                }

                // 文件名带上用户 id 和毫秒时间戳避免冲突
                let file_name = format!("{}_{}.{}", user_id, now.timestamp_millis(), image.extension);

                info!("📎 上传咨询图片: {} ({} 字节)", file_name, image.bytes.len());

                let path = self
                    .store
                    .upload_consultation_image(&file_name, image.bytes, &image.content_type)
                    .await?;
                Some(path)
            }
            None => None,
        };

        let payload = ConsultationPayload {
            text: text.to_string(),
            image_path,
            subject: subject_name.to_string(),
        };

        let message = NewConsultation {
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            content: serde_json::to_string(&payload)?,
            is_replied: false,
            created_at: now.to_rfc3339(),
        };

        self.store.insert_consultation(&message).await?;

        info!("✉️ 咨询已提交: 科目={}", subject_name);

        Ok(())
    }
}
