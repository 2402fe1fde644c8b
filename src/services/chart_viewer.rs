//! 图表查看服务 - 业务能力层
//!
//! 根据图表 ID 找到 `anchor_{id}` 和 `anchor_{id}_0` 两个文件夹，
//! 下载其中的 PNG 图片。失败只产生提示，不影响会话状态。

use std::fmt::{self, Display};

use futures::future::try_join_all;
use tracing::{info, warn};

use crate::error::AppResult;
use crate::models::{ChartImage, ChartSide, FolderId, ImageEntry};
use crate::services::chart_provider::ChartImageProvider;

/// 查看图表时给标注员的提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartAdvisory {
    /// 图表 ID 为空
    EmptyChartId,
    /// 一个或两个文件夹不存在
    LookupMiss { missing: Vec<String> },
    /// 文件夹存在但没有 PNG 图片
    EmptyFolder { side: ChartSide },
}

impl Display for ChartAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartAdvisory::EmptyChartId => write!(f, "请输入图表 ID"),
            ChartAdvisory::LookupMiss { missing } => {
                write!(f, "未找到文件夹: {}，请检查文件夹名称", missing.join(", "))
            }
            ChartAdvisory::EmptyFolder { side } => {
                write!(f, "文件夹 {} 中没有找到图片", side.number())
            }
        }
    }
}

/// 一侧图表的内容
#[derive(Debug, Clone)]
pub struct ChartPanel {
    pub side: ChartSide,
    pub folder_id: FolderId,
    pub images: Vec<ChartImage>,
}

/// 一次"显示"操作的结果
#[derive(Debug, Clone)]
pub struct ChartDisplay {
    pub chart_id: String,
    /// 两个文件夹都找到时才有内容
    pub panels: Vec<ChartPanel>,
    pub advisories: Vec<ChartAdvisory>,
}

impl ChartDisplay {
    fn advisory_only(chart_id: &str, advisory: ChartAdvisory) -> Self {
        Self {
            chart_id: chart_id.to_string(),
            panels: Vec::new(),
            advisories: vec![advisory],
        }
    }

    /// 两个文件夹都已找到并展示
    pub fn is_displayed(&self) -> bool {
        !self.panels.is_empty()
    }

    pub fn image_count(&self) -> usize {
        self.panels.iter().map(|p| p.images.len()).sum()
    }
}

/// 图表查看服务
pub struct ChartViewer<P> {
    provider: P,
    root_folder: FolderId,
}

impl<P: ChartImageProvider> ChartViewer<P> {
    pub fn new(provider: P, root_folder: FolderId) -> Self {
        Self {
            provider,
            root_folder,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// 查找并下载图表对
    ///
    /// # 返回
    /// 找不到文件夹、文件夹为空等情况放在 `advisories` 里；
    /// 只有网络/解析错误才返回 `Err`
    pub async fn display(&self, chart_id: &str) -> AppResult<ChartDisplay> {
        let chart_id = chart_id.trim();
        if chart_id.is_empty() {
            return Ok(ChartDisplay::advisory_only(chart_id, ChartAdvisory::EmptyChartId));
        }

        let names = ChartSide::BOTH.map(|side| side.folder_name(chart_id));
        let (anchor, similar) = futures::join!(
            self.provider.resolve_folder(&self.root_folder, &names[0]),
            self.provider.resolve_folder(&self.root_folder, &names[1]),
        );

        let (anchor, similar) = match (anchor?, similar?) {
            (Some(anchor), Some(similar)) => (anchor, similar),
            (anchor, similar) => {
                let missing: Vec<String> = [anchor, similar]
                    .iter()
                    .zip(names.iter())
                    .filter(|(found, _)| found.is_none())
                    .map(|(_, name)| name.clone())
                    .collect();
                warn!("⚠️ 图表 {} 的文件夹未找到: {:?}", chart_id, missing);
                return Ok(ChartDisplay::advisory_only(
                    chart_id,
                    ChartAdvisory::LookupMiss { missing },
                ));
            }
        };

        let mut display = ChartDisplay {
            chart_id: chart_id.to_string(),
            panels: Vec::with_capacity(2),
            advisories: Vec::new(),
        };

        for (side, folder_id) in ChartSide::BOTH.into_iter().zip([anchor, similar]) {
            let entries = self.provider.list_images(&folder_id).await?;
            let images = self.fetch_pngs(&entries).await?;

            if images.is_empty() {
                warn!("⚠️ 文件夹 {} ({}) 中没有 PNG 图片", side.number(), folder_id);
                display.advisories.push(ChartAdvisory::EmptyFolder { side });
            }

            display.panels.push(ChartPanel {
                side,
                folder_id,
                images,
            });
        }

        let image_count = display.image_count();
        info!("✓ 图表 {} 加载完成，共 {} 张图片", chart_id, image_count);
        Ok(display)
    }

    /// 按列表顺序下载所有 PNG，其他类型直接跳过
    async fn fetch_pngs(&self, entries: &[ImageEntry]) -> AppResult<Vec<ChartImage>> {
        let downloads = entries.iter().filter(|e| e.is_png()).map(|entry| async move {
            let bytes = self.provider.fetch_image(&entry.id).await?;
            AppResult::Ok(ChartImage {
                file_id: entry.id.clone(),
                caption: entry.name.clone(),
                bytes,
            })
        });
        try_join_all(downloads).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::FakeProvider;

    fn root() -> FolderId {
        FolderId("root".to_string())
    }

    fn chart_pair_provider() -> FakeProvider {
        FakeProvider::new()
            .with_folder("root", "anchor_5", "fa")
            .with_folder("root", "anchor_5_0", "fs")
            .with_entry("fa", "a1", "anchor.png", "image/png")
            .with_entry("fa", "a2", "notes.txt", "text/plain")
            .with_entry("fs", "s1", "similar_1.png", "image/png")
            .with_entry("fs", "s2", "similar_2.png", "image/png")
            .with_file("a1", b"a1".to_vec())
            .with_file("s1", b"s1".to_vec())
            .with_file("s2", b"s2".to_vec())
    }

    #[tokio::test]
    async fn test_display_both_sides() {
        let viewer = ChartViewer::new(chart_pair_provider(), root());
        let display = viewer.display(" 5 ").await.unwrap();

        assert!(display.is_displayed());
        assert!(display.advisories.is_empty());
        assert_eq!(display.chart_id, "5");
        assert_eq!(display.panels[0].side, ChartSide::Anchor);
        let captions: Vec<&str> = display.panels[1]
            .images
            .iter()
            .map(|i| i.caption.as_str())
            .collect();
        assert_eq!(captions, vec!["similar_1.png", "similar_2.png"]);
        // 非 PNG 不下载
        assert_eq!(display.panels[0].images.len(), 1);
        assert_eq!(viewer.provider().fetch_calls(), 3);
    }

    #[tokio::test]
    async fn test_empty_chart_id_makes_no_calls() {
        let viewer = ChartViewer::new(chart_pair_provider(), root());
        let display = viewer.display("   ").await.unwrap();

        assert_eq!(display.advisories, vec![ChartAdvisory::EmptyChartId]);
        assert!(!display.is_displayed());
        assert_eq!(viewer.provider().resolve_calls(), 0);
    }

    #[tokio::test]
    async fn test_lookup_miss_names_missing_folder() {
        let provider = FakeProvider::new().with_folder("root", "anchor_9", "fa");
        let viewer = ChartViewer::new(provider, root());
        let display = viewer.display("9").await.unwrap();

        assert!(!display.is_displayed());
        assert_eq!(
            display.advisories,
            vec![ChartAdvisory::LookupMiss {
                missing: vec!["anchor_9_0".to_string()]
            }]
        );
    }

    #[tokio::test]
    async fn test_empty_folder_is_reported_per_side() {
        let provider = FakeProvider::new()
            .with_folder("root", "anchor_2", "fa")
            .with_folder("root", "anchor_2_0", "fs")
            .with_entry("fs", "s1", "s.png", "image/png")
            .with_file("s1", vec![0]);
        let viewer = ChartViewer::new(provider, root());
        let display = viewer.display("2").await.unwrap();

        assert!(display.is_displayed());
        assert_eq!(
            display.advisories,
            vec![ChartAdvisory::EmptyFolder {
                side: ChartSide::Anchor
            }]
        );
        assert_eq!(display.image_count(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_is_returned() {
        let provider = FakeProvider::new()
            .with_folder("root", "anchor_4", "fa")
            .with_folder("root", "anchor_4_0", "fs")
            .with_entry("fa", "missing", "gone.png", "image/png");
        let viewer = ChartViewer::new(provider, root());

        tokio_test::assert_err!(viewer.display("4").await);
    }
}
