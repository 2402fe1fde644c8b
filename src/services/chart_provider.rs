//! 图表图片提供者 - 业务能力层
//!
//! 只负责"找文件夹 / 列文件 / 下载图片"能力，不关心标注流程

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::DriveClient;
use crate::models::chart::FOLDER_MIME_TYPE;
use crate::models::{FolderId, ImageEntry};

/// 图表图片提供者
///
/// 会话状态机不依赖它，两者只在界面层组合
#[async_trait]
pub trait ChartImageProvider: Send + Sync {
    /// 在父文件夹下按名称精确查找子文件夹，找不到返回 `None`
    async fn resolve_folder(&self, parent: &FolderId, name: &str) -> AppResult<Option<FolderId>>;

    /// 列出文件夹下的所有条目（保持后端返回的顺序）
    async fn list_images(&self, folder: &FolderId) -> AppResult<Vec<ImageEntry>>;

    /// 下载文件的原始字节
    async fn fetch_image(&self, file_id: &str) -> AppResult<Vec<u8>>;
}

const FOLDER_FIELDS: &str = "nextPageToken, files(id, name)";
const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType)";

/// `files.list` 的响应
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListResponse {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    mime_type: String,
}

impl From<DriveFile> for ImageEntry {
    fn from(file: DriveFile) -> Self {
        ImageEntry {
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
        }
    }
}

/// 基于 Drive v3 REST API 的实现
pub struct DriveChartProvider {
    client: DriveClient,
}

impl DriveChartProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            client: DriveClient::new(config),
        }
    }

    pub fn with_client(client: DriveClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChartImageProvider for DriveChartProvider {
    async fn resolve_folder(&self, parent: &FolderId, name: &str) -> AppResult<Option<FolderId>> {
        let q = folder_query(parent, name);
        let response: FileListResponse = self
            .client
            .get_json(
                "files",
                &[("q", q.as_str()), ("spaces", "drive"), ("fields", FOLDER_FIELDS)],
            )
            .await?;

        let found = response.files.into_iter().next().map(|f| FolderId(f.id));
        debug!("查找文件夹 {} -> {:?}", name, found);
        Ok(found)
    }

    async fn list_images(&self, folder: &FolderId) -> AppResult<Vec<ImageEntry>> {
        let q = children_query(folder);
        let mut entries = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("q", q.as_str()), ("fields", LIST_FIELDS)];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.as_str()));
            }

            let page: FileListResponse = self.client.get_json("files", &query).await?;
            entries.extend(page.files.into_iter().map(ImageEntry::from));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!("文件夹 {} 下共 {} 个条目", folder, entries.len());
        Ok(entries)
    }

    async fn fetch_image(&self, file_id: &str) -> AppResult<Vec<u8>> {
        let path = format!("files/{}", file_id);
        self.client.get_bytes(&path, &[("alt", "media")]).await
    }
}

/// 转义查询字符串中的值
fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// 在父文件夹下按名称查找子文件夹的查询
fn folder_query(parent: &FolderId, name: &str) -> String {
    format!(
        "'{}' in parents and name='{}' and mimeType='{}'",
        escape_query_value(parent.as_str()),
        escape_query_value(name),
        FOLDER_MIME_TYPE
    )
}

/// 列出文件夹下所有条目的查询
fn children_query(folder: &FolderId) -> String {
    format!("'{}' in parents", escape_query_value(folder.as_str()))
}
