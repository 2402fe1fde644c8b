//! 提交记录服务 - 业务能力层
//!
//! 只负责"记一笔提交"能力，不保存 QA 文本

use std::fs::OpenOptions;
use std::io::Write;

use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::Category;

/// 提交记录服务
///
/// 职责：
/// - 每次类别提交 / 全部提交追加一行
/// - 只记录图表 ID、类别和完整 QA 对数量
/// - 不关心流程顺序
pub struct SubmissionLog {
    log_file_path: String,
}

impl SubmissionLog {
    pub fn new(log_file_path: impl Into<String>) -> Self {
        Self {
            log_file_path: log_file_path.into(),
        }
    }

    /// 记录一个类别的提交
    pub fn record_category(
        &self,
        chart_id: &str,
        category: Category,
        complete_pairs: usize,
    ) -> AppResult<()> {
        self.append(&format!(
            "图表 {} | 类别 {} | 完整 QA 对 {}",
            display_chart_id(chart_id),
            category,
            complete_pairs
        ))
    }

    /// 记录全部提交
    pub fn record_all(&self, chart_id: &str) -> AppResult<()> {
        self.append(&format!(
            "图表 {} | 全部类别已提交并锁定",
            display_chart_id(chart_id)
        ))
    }

    fn append(&self, line: &str) -> AppResult<()> {
        debug!("写入提交记录: {}", line);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file_path)
            .map_err(|e| AppError::file_write_failed(&self.log_file_path, e))?;

        let entry = format!(
            "{} | {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            line
        );
        file.write_all(entry.as_bytes())
            .map_err(|e| AppError::file_write_failed(&self.log_file_path, e))?;

        Ok(())
    }
}

fn display_chart_id(chart_id: &str) -> &str {
    if chart_id.is_empty() {
        "-"
    } else {
        chart_id
    }
}
