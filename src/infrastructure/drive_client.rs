//! Drive HTTP 客户端 - 基础设施层
//!
//! 持有唯一的 HTTP 客户端，只暴露"发 GET 请求"的能力

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Drive HTTP 客户端
///
/// 职责：
/// - 持有 reqwest::Client 和访问令牌
/// - 暴露 get_json() / get_bytes() 能力
/// - 不认识文件夹命名规则
/// - 不处理业务流程
#[derive(Clone)]
pub struct DriveClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl DriveClient {
    /// 创建新的 Drive 客户端
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(&config.drive_api_base_url, &config.drive_access_token)
    }

    /// 使用自定义地址创建
    pub fn with_base_url(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// 发送 GET 请求并把响应反序列化为指定类型
    ///
    /// # 参数
    /// - `path`: 相对于 base_url 的路径，例如 `files`
    /// - `query`: 查询参数
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let response = self.send(path, query).await?;
        let body = response.text().await?;
        let value = serde_json::from_str(&body)?;
        Ok(value)
    }

    /// 发送 GET 请求并返回原始字节
    pub async fn get_bytes(&self, path: &str, query: &[(&str, &str)]) -> AppResult<Vec<u8>> {
        let response = self.send(path, query).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn send(&self, path: &str, query: &[(&str, &str)]) -> AppResult<reqwest::Response> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("GET {} {:?}", url, query);

        let mut request = self.http.get(&url).query(query);
        if !self.access_token.is_empty() {
            request = request.bearer_auth(&self.access_token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(path, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.ok().filter(|m| !m.is_empty());
            return Err(AppError::bad_response(path, status.as_u16(), message));
        }

        Ok(response)
    }
}
