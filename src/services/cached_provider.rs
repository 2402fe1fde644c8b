//! 带缓存的图片提供者
//!
//! 装饰任意 `ChartImageProvider`，缓存文件夹查找和图片下载结果。
//! 文件列表不缓存，新上传的图片能立即看到。

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{Cache, MemoryCache, NoCache};
use crate::models::{FolderId, ImageEntry};
use crate::services::chart_provider::ChartImageProvider;

/// 带缓存的提供者
pub struct CachedProvider<P> {
    inner: P,
    folders: Arc<dyn Cache<Option<FolderId>>>,
    images: Arc<dyn Cache<Arc<Vec<u8>>>>,
}

impl<P: ChartImageProvider> CachedProvider<P> {
    /// 根据配置选择缓存策略
    pub fn from_config(inner: P, config: &Config) -> Self {
        if config.cache_enabled {
            let ttl = config.cache_ttl();
            Self::with_caches(
                inner,
                Arc::new(MemoryCache::<Option<FolderId>>::with_ttl(ttl)),
                Arc::new(MemoryCache::<Arc<Vec<u8>>>::with_ttl(ttl)),
            )
        } else {
            Self::with_caches(inner, Arc::new(NoCache), Arc::new(NoCache))
        }
    }

    pub fn with_caches(
        inner: P,
        folders: Arc<dyn Cache<Option<FolderId>>>,
        images: Arc<dyn Cache<Arc<Vec<u8>>>>,
    ) -> Self {
        Self {
            inner,
            folders,
            images,
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// 已缓存的图片数量
    pub fn cached_images(&self) -> usize {
        self.images.len()
    }
}

fn folder_key(parent: &FolderId, name: &str) -> String {
    format!("{}/{}", parent, name)
}

#[async_trait]
impl<P: ChartImageProvider> ChartImageProvider for CachedProvider<P> {
    async fn resolve_folder(&self, parent: &FolderId, name: &str) -> AppResult<Option<FolderId>> {
        let key = folder_key(parent, name);
        if let Some(hit) = self.folders.get(&key) {
            debug!("文件夹缓存命中: {}", key);
            return Ok(hit);
        }

        let resolved = self.inner.resolve_folder(parent, name).await?;
        self.folders.insert(key, resolved.clone());
        Ok(resolved)
    }

    async fn list_images(&self, folder: &FolderId) -> AppResult<Vec<ImageEntry>> {
        self.inner.list_images(folder).await
    }

    async fn fetch_image(&self, file_id: &str) -> AppResult<Vec<u8>> {
        if let Some(hit) = self.images.get(file_id) {
            debug!("图片缓存命中: {}", file_id);
            return Ok(hit.as_ref().clone());
        }

        let bytes = Arc::new(self.inner.fetch_image(file_id).await?);
        self.images.insert(file_id.to_string(), Arc::clone(&bytes));
        Ok(bytes.as_ref().clone())
    }
}
