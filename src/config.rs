use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_FILE: &str = "multichart_qa.toml";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- Drive 配置 ---
    /// 存放所有图表文件夹的根文件夹 ID
    pub root_folder_id: String,
    pub drive_api_base_url: String,
    /// OAuth 访问令牌（获取方式不在本程序范围内）
    pub drive_access_token: String,
    // --- 缓存配置 ---
    pub cache_enabled: bool,
    /// 缓存有效期（秒），0 表示永不过期
    pub cache_ttl_secs: u64,
    // --- 输出配置 ---
    /// 下载图片的存放目录
    pub image_output_dir: String,
    /// 提交记录日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 标注说明 / 评分标准链接
    pub instructions_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_folder_id: "11Ewq0e2Z7j4MkbLcuXWTUItL3DlCi5JB".to_string(),
            drive_api_base_url: "https://www.googleapis.com/drive/v3".to_string(),
            drive_access_token: String::new(),
            cache_enabled: true,
            cache_ttl_secs: 0,
            image_output_dir: "chart_images".to_string(),
            output_log_file: "qa_submissions.txt".to_string(),
            verbose_logging: false,
            instructions_url: "https://google.com".to_string(),
        }
    }
}

impl Config {
    /// 只从环境变量加载（未设置的使用默认值）
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 先读取 TOML 配置文件（如果存在），再用环境变量覆盖
    ///
    /// 配置文件路径取自 `MULTICHART_CONFIG`，默认为 `multichart_qa.toml`
    pub fn load() -> AppResult<Self> {
        let path = std::env::var("MULTICHART_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let base = if Path::new(&path).exists() {
            Self::from_toml_file(&path)?
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件加载
    pub fn from_toml_file(path: &str) -> AppResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AppError::file_read_failed(path, e))?;
        Self::from_toml_str(&content)
    }

    /// 解析 TOML 字符串，缺失的字段使用默认值
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env_overrides(self) -> Self {
        Self {
            root_folder_id: std::env::var("ROOT_FOLDER_ID").unwrap_or(self.root_folder_id),
            drive_api_base_url: std::env::var("DRIVE_API_BASE_URL").unwrap_or(self.drive_api_base_url),
            drive_access_token: std::env::var("DRIVE_ACCESS_TOKEN").unwrap_or(self.drive_access_token),
            cache_enabled: std::env::var("CACHE_ENABLED").ok().and_then(|v| v.parse().ok()).unwrap_or(self.cache_enabled),
            cache_ttl_secs: std::env::var("CACHE_TTL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.cache_ttl_secs),
            image_output_dir: std::env::var("IMAGE_OUTPUT_DIR").unwrap_or(self.image_output_dir),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
            instructions_url: std::env::var("INSTRUCTIONS_URL").unwrap_or(self.instructions_url),
        }
    }

    /// 缓存有效期，`None` 表示永不过期
    pub fn cache_ttl(&self) -> Option<std::time::Duration> {
        (self.cache_ttl_secs > 0).then(|| std::time::Duration::from_secs(self.cache_ttl_secs))
    }
}
