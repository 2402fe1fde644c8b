//! 图片写入服务 - 业务能力层
//!
//! 终端无法直接显示图片，把下载的图表写到本地目录，供标注员打开查看

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::services::chart_viewer::ChartDisplay;

/// 写入后的一张图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenImage {
    pub caption: String,
    pub path: PathBuf,
}

/// 图片写入服务
///
/// 目录结构：`{output_dir}/anchor_{id}/chart_{n}/{文件名}`
pub struct ImageWriter {
    output_dir: PathBuf,
}

impl ImageWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 写入一次显示结果中的所有图片
    ///
    /// # 返回
    /// 按面板顺序返回每张图片的标题和路径
    pub async fn write(&self, display: &ChartDisplay) -> AppResult<Vec<WrittenImage>> {
        let chart_dir = self
            .output_dir
            .join(format!("anchor_{}", sanitize_file_name(&display.chart_id)));

        let mut written = Vec::with_capacity(display.image_count());
        for panel in &display.panels {
            let panel_dir = chart_dir.join(format!("chart_{}", panel.side.number()));
            fs::create_dir_all(&panel_dir)
                .await
                .map_err(|e| AppError::file_write_failed(panel_dir.display().to_string(), e))?;

            for image in &panel.images {
                if !image.has_png_signature() {
                    warn!("⚠️ {} 不是有效的 PNG 文件，仍然写入", image.caption);
                }

                let path = panel_dir.join(sanitize_file_name(&image.caption));
                fs::write(&path, &image.bytes)
                    .await
                    .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;
                debug!("写入图片: {}", path.display());

                written.push(WrittenImage {
                    caption: image.caption.clone(),
                    path,
                });
            }
        }

        Ok(written)
    }
}

/// 把文件名中不安全的字符替换为 `_`
fn sanitize_file_name(name: &str) -> String {
    static UNSAFE: OnceLock<Option<Regex>> = OnceLock::new();
    let cleaned = match UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]+").ok()) {
        Some(re) => re.replace_all(name.trim(), "_").into_owned(),
        None => name.trim().replace(['/', '\\'], "_"),
    };
    match cleaned.trim_matches('.') {
        "" => "unnamed".to_string(),
        s => s.to_string(),
    }
}
