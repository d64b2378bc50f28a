use std::collections::HashSet;

/// 编号 key 的扫描上限（GEMINI_API_KEY_1 .. GEMINI_API_KEY_20）
const NUMBERED_KEY_MAX: usize = 20;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    // --- Supabase 配置 ---
    /// Supabase 项目地址
    pub store_base_url: String,
    /// Supabase anon key
    pub store_anon_key: String,
    // --- LLM 配置 ---
    /// OpenAI 兼容的 API 端点（Gemini 走 openai 兼容层）
    pub llm_api_base_url: String,
    /// 模型名称
    pub llm_model_name: String,
    /// 采样温度（压低以保证知识点的准确性）
    pub llm_temperature: f32,
    /// API key 凭证池（启动时合并去重，进程生命周期内只读）
    pub api_keys: Vec<String>,
    // --- 运行配置 ---
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 生成结果输出文件
    pub output_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_base_url: "https://qzvqjwmsbmzbcybvmmdl.supabase.co".to_string(),
            store_anon_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-3-flash-preview".to_string(),
            llm_temperature: 0.3,
            api_keys: Vec::new(),
            verbose_logging: false,
            output_file: "questions.json".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            store_base_url: std::env::var("SUPABASE_URL").unwrap_or(default.store_base_url),
            store_anon_key: std::env::var("SUPABASE_ANON_KEY").unwrap_or(default.store_anon_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_temperature: std::env::var("LLM_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_temperature),
            api_keys: collect_api_keys(|name| std::env::var(name).ok()),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_file: std::env::var("OUTPUT_FILE").unwrap_or(default.output_file),
        }
    }
}

/// 从环境变量收集所有可用的 API key
///
/// 支持三种约定（与部署平台保持一致）：
/// 1. 主 key：`GEMINI_API_KEY`
/// 2. 编号 key：`GEMINI_API_KEY_1` .. `GEMINI_API_KEY_20`（用于负载均衡）
/// 3. 逗号分隔列表：`GEMINI_API_KEYS_LIST`
///
/// 合并后去重，保持首次出现的顺序。
pub fn collect_api_keys(lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();

    // 1. 主 key
    if let Some(key) = lookup("GEMINI_API_KEY") {
        push_key(&mut keys, &key);
    }

    // 2. 编号 key
    for i in 1..=NUMBERED_KEY_MAX {
        let name = format!("GEMINI_API_KEY_{}", i);
        if let Some(key) = lookup(&name) {
            push_key(&mut keys, &key);
        }
    }

    // 3. 逗号分隔列表
    if let Some(list) = lookup("GEMINI_API_KEYS_LIST") {
        for key in list.split(',') {
            push_key(&mut keys, key);
        }
    }

    // 去重（保序）
    let mut seen = HashSet::new();
    keys.retain(|k| seen.insert(k.clone()));

    keys
}

fn push_key(keys: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        keys.push(trimmed.to_string());
    }
}
