use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 数据库（Supabase）错误
    Store(StoreError),
    /// 生成式 AI 服务错误
    Llm(LlmError),
    /// 业务逻辑错误
    Business(BusinessError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Store(e) => write!(f, "数据库错误: {}", e),
            AppError::Llm(e) => write!(f, "LLM错误: {}", e),
            AppError::Business(e) => write!(f, "业务错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Store(e) => Some(e),
            AppError::Llm(e) => Some(e),
            AppError::Business(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 数据库（Supabase REST）相关错误
#[derive(Debug)]
pub enum StoreError {
    /// 网络请求失败
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回非 2xx 状态码
    BadResponse {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// JSON 解析失败
    JsonParseFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 查询的记录不存在
    RecordNotFound {
        table: String,
        id: i64,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::RequestFailed { endpoint, source } => {
                write!(f, "数据库请求失败 ({}): {}", endpoint, source)
            }
            StoreError::BadResponse {
                endpoint,
                status,
                message,
            } => {
                write!(
                    f,
                    "数据库返回错误响应 ({}): status={}, message={:?}",
                    endpoint, status, message
                )
            }
            StoreError::JsonParseFailed { source } => {
                write!(f, "数据库响应JSON解析失败: {}", source)
            }
            StoreError::RecordNotFound { table, id } => {
                write!(f, "记录不存在: {} id={}", table, id)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::RequestFailed { source, .. } | StoreError::JsonParseFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 生成式 AI 服务错误
///
/// 分类依据与错误文本的子串匹配一致，归一化为固定的几类，
/// 调用方不会看到原始传输层错误。
#[derive(Debug)]
pub enum LlmError {
    /// 请求本身不可处理（400 / invalid_argument）
    InvalidRequest {
        detail: String,
    },
    /// 凭证被拒绝（403 / permission_denied / key 相关）
    AuthRejected {
        detail: String,
    },
    /// 配额耗尽 / 频率限制（429 / resource_exhausted）
    QuotaExhausted {
        detail: String,
    },
    /// 上游 5xx
    ProviderInternal {
        detail: String,
    },
    /// 网络 / 连接错误
    Transport {
        detail: String,
    },
    /// 响应不是合法的 JSON 数组
    MalformedResponse {
        detail: String,
    },
    /// 返回的题目数量低于可用下限（5 题）
    InsufficientItems {
        count: usize,
    },
    /// 模型返回了空内容
    EmptyContent {
        model: String,
    },
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::InvalidRequest { detail } => {
                write!(f, "AI请求不可处理: {}", detail)
            }
            LlmError::AuthRejected { detail } => {
                write!(f, "AI凭证被拒绝: {}", detail)
            }
            LlmError::QuotaExhausted { detail } => {
                write!(f, "AI配额耗尽/频率限制: {}", detail)
            }
            LlmError::ProviderInternal { detail } => {
                write!(f, "AI服务端内部错误: {}", detail)
            }
            LlmError::Transport { detail } => {
                write!(f, "AI网络连接错误: {}", detail)
            }
            LlmError::MalformedResponse { detail } => {
                write!(f, "AI响应格式错误: {}", detail)
            }
            LlmError::InsufficientItems { count } => {
                write!(f, "AI生成题目数量不足: 仅 {} 题 (下限 5 题)", count)
            }
            LlmError::EmptyContent { model } => {
                write!(f, "AI返回内容为空 (模型: {})", model)
            }
        }
    }
}

impl std::error::Error for LlmError {}

/// 业务逻辑错误
#[derive(Debug)]
pub enum BusinessError {
    /// 所选分区下没有任何课程内容
    InsufficientContent {
        section_id: String,
    },
    /// 凭证池为空（部署/配置问题）
    NoCredentialsConfigured,
    /// 科目解析失败
    SubjectParseFailed {
        subject: String,
    },
    /// 咨询图片超出大小限制
    ImageTooLarge {
        size: usize,
        max_size: usize,
    },
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessError::InsufficientContent { section_id } => {
                write!(f, "分区 {} 下没有可用的课程内容", section_id)
            }
            BusinessError::NoCredentialsConfigured => {
                write!(f, "未配置任何 API 凭证")
            }
            BusinessError::SubjectParseFailed { subject } => {
                write!(f, "无法解析科目: {}", subject)
            }
            BusinessError::ImageTooLarge { size, max_size } => {
                write!(f, "图片过大: {} 字节 (上限 {} 字节)", size, max_size)
            }
        }
    }
}

impl std::error::Error for BusinessError {}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 环境变量解析失败
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 环境变量不存在
    EnvVarNotFound {
        var_name: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EnvVarParseFailed {
                var_name,
                value,
                expected_type,
            } => {
                write!(
                    f,
                    "环境变量 {} 解析失败: 值 '{}' 无法转换为 {}",
                    var_name, value, expected_type
                )
            }
            ConfigError::EnvVarNotFound { var_name } => {
                write!(f, "环境变量 {} 不存在", var_name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Store(StoreError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Llm(err)
    }
}

impl From<BusinessError> for AppError {
    fn from(err: BusinessError) -> Self {
        AppError::Business(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

// ========== 面向用户的本地化消息 ==========

impl AppError {
    /// 转换为面向学生的阿拉伯语提示
    ///
    /// 所有错误在编排层被回收并映射为这里的固定文案，
    /// UI 不会收到原始错误码。
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Business(BusinessError::InsufficientContent { .. }) => {
                "لا يوجد محتوى كافٍ في هذا القسم لتوليد مسابقة."
            }
            AppError::Business(BusinessError::NoCredentialsConfigured) => {
                "لم يتم ضبط مفاتيح الخدمة، يرجى مراجعة إعدادات النشر."
            }
            AppError::Business(BusinessError::ImageTooLarge { .. }) => {
                "حجم الصورة كبير جداً. يرجى اختيار صورة أقل من 2 ميجابايت."
            }
            AppError::Llm(LlmError::InvalidRequest { .. }) => {
                "لا يمكن معالجة هذا المحتوى، حاول تقليل النص أو تغيير الصياغة."
            }
            // 凭证问题在下一次调用时会重新随机选 key，对用户来说是"自愈"的
            AppError::Llm(LlmError::AuthRejected { .. }) => {
                "مفتاح API الحالي مشغول أو محظور، سيقوم النظام بالتبديل تلقائياً في المحاولة القادمة."
            }
            AppError::Llm(LlmError::QuotaExhausted { .. }) => {
                "الخدمة مشغولة جداً (429). الرجاء الانتظار دقيقة ثم المحاولة."
            }
            AppError::Llm(LlmError::ProviderInternal { .. }) => {
                "خطأ مؤقت في خوادم جوجل، حاول مجدداً."
            }
            AppError::Llm(LlmError::Transport { .. }) => "تأكد من اتصالك بالإنترنت.",
            AppError::Llm(LlmError::InsufficientItems { .. }) => {
                "لم يتمكن الذكاء الاصطناعي من توليد عدد كافٍ من الأسئلة."
            }
            AppError::Llm(_) => "حدث خطأ تقني، يرجى إعادة المحاولة.",
            AppError::Store(_) => "فشل في تحضير المسابقة، حاول مرة أخرى.",
            _ => "حدث خطأ تقني، يرجى إعادة المحاولة.",
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
