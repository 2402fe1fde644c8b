//! 测试用的内存提供者

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::error::{AppError, AppResult};
use crate::models::{FolderId, ImageEntry};
use crate::services::chart_provider::ChartImageProvider;

#[derive(Default)]
pub struct FakeProvider {
    folders: HashMap<(String, String), String>,
    entries: HashMap<String, Vec<ImageEntry>>,
    files: HashMap<String, Vec<u8>>,
    resolve_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folder(mut self, parent: &str, name: &str, id: &str) -> Self {
        self.folders
            .insert((parent.to_string(), name.to_string()), id.to_string());
        self
    }

    pub fn with_entry(mut self, folder: &str, id: &str, name: &str, mime_type: &str) -> Self {
        self.entries
            .entry(folder.to_string())
            .or_default()
            .push(ImageEntry {
                id: id.to_string(),
                name: name.to_string(),
                mime_type: mime_type.to_string(),
            });
        self
    }

    pub fn with_file(mut self, id: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(id.to_string(), bytes);
        self
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChartImageProvider for FakeProvider {
    async fn resolve_folder(&self, parent: &FolderId, name: &str) -> AppResult<Option<FolderId>> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .folders
            .get(&(parent.as_str().to_string(), name.to_string()))
            .cloned()
            .map(FolderId))
    }

    async fn list_images(&self, folder: &FolderId) -> AppResult<Vec<ImageEntry>> {
        Ok(self.entries.get(folder.as_str()).cloned().unwrap_or_default())
    }

    async fn fetch_image(&self, file_id: &str) -> AppResult<Vec<u8>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.files
            .get(file_id)
            .cloned()
            .ok_or_else(|| AppError::bad_response(format!("files/{}", file_id), 404, None))
    }
}

/// 本地 HTTP 桩收到的一次请求
#[derive(Debug, Clone)]
pub struct StubRequest {
    /// 请求行中的路径和查询串
    pub target: String,
    pub authorization: Option<String>,
}

/// 本地 HTTP 桩服务器，按请求返回 (状态码, 响应体)
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<StubRequest>>>,
}

impl StubServer {
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(&StubRequest) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let respond = Arc::new(respond);

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let recorded = Arc::clone(&recorded);
                let respond = Arc::clone(&respond);
                tokio::spawn(async move {
                    let Some(request) = read_request(&mut stream).await else {
                        return;
                    };
                    let (status, body) = (*respond)(&request);
                    recorded.lock().unwrap().push(request);

                    let response = format!(
                        "HTTP/1.1 {} STUB\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<StubRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(stream: &mut TcpStream) -> Option<StubRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&buf).into_owned();
    let mut lines = head.lines();
    let target = lines.next()?.split_whitespace().nth(1)?.to_string();
    let authorization = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("authorization"))
        .map(|(_, value)| value.trim().to_string());

    Some(StubRequest {
        target,
        authorization,
    })
}
