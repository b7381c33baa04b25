/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    // --- EmailJS 配置 ---
    /// 账户公钥（即 EmailJS 的 user_id）
    pub emailjs_public_key: String,
    pub emailjs_service_id: String,
    pub emailjs_template_id: String,
    pub emailjs_api_base_url: String,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    // --- 草稿配置 ---
    /// 自动保存间隔（秒）
    pub autosave_interval_secs: u64,
    /// 会话存储文件，为空时只保存在内存中
    pub session_file: Option<String>,
    // --- 表单配置 ---
    /// 表单定义 TOML 文件，为空时使用内置的报名表
    pub form_definition: Option<String>,
    /// 提交成功后跳转的页面
    pub success_page: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            emailjs_public_key: "YrET6SKEEXROvJDRG".to_string(),
            emailjs_service_id: "service_0dt6vc8".to_string(),
            emailjs_template_id: "template_ofp7pqv".to_string(),
            emailjs_api_base_url: "https://api.emailjs.com".to_string(),
            request_timeout_secs: 30,
            autosave_interval_secs: 30,
            session_file: None,
            form_definition: None,
            success_page: "success.html".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            emailjs_public_key: std::env::var("EMAILJS_PUBLIC_KEY").unwrap_or(default.emailjs_public_key),
            emailjs_service_id: std::env::var("EMAILJS_SERVICE_ID").unwrap_or(default.emailjs_service_id),
            emailjs_template_id: std::env::var("EMAILJS_TEMPLATE_ID").unwrap_or(default.emailjs_template_id),
            emailjs_api_base_url: std::env::var("EMAILJS_API_BASE_URL").unwrap_or(default.emailjs_api_base_url),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            autosave_interval_secs: std::env::var("AUTOSAVE_INTERVAL_SECS").ok().and_then(|v| v.parse().ok()).filter(|v| *v > 0).unwrap_or(default.autosave_interval_secs),
            session_file: std::env::var("SESSION_FILE").ok().filter(|v| !v.is_empty()).or(default.session_file),
            form_definition: std::env::var("FORM_DEFINITION").ok().filter(|v| !v.is_empty()).or(default.form_definition),
            success_page: std::env::var("SUCCESS_PAGE").unwrap_or(default.success_page),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 自动保存间隔
    pub fn autosave_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.autosave_interval_secs)
    }
}
