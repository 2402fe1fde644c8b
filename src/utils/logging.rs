/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs::OpenOptions;
use std::io::Write;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// 初始化 tracing 日志
///
/// 设置了 `RUST_LOG` 时以它为准，否则按 `verbose` 选择 debug / info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化提交记录文件
///
/// 每次启动在文件末尾追加一段会话头，之前的提交记录保留
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\nMultiChart QA 提交记录 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    file.write_all(log_header.as_bytes())
        .map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 MultiChart QA Generation 启动");
    info!("📁 根文件夹: {}", config.root_folder_id);
    info!(
        "💾 图片缓存: {}",
        match (config.cache_enabled, config.cache_ttl()) {
            (false, _) => "关闭".to_string(),
            (true, None) => "开启 (永不过期)".to_string(),
            (true, Some(ttl)) => format!("开启 ({} 秒)", ttl.as_secs()),
        }
    );
    info!("🖼️ 图片输出目录: {}", config.image_output_dir);
    info!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_log_file_appends_header() {
        let path = std::env::temp_dir().join(format!("multichart_qa_log_{}.txt", std::process::id()));
        let path_str = path.to_string_lossy().to_string();
        let _ = std::fs::remove_file(&path);

        init_log_file(&path_str).unwrap();
        std::fs::write(&path, format!("{}earlier record\n", std::fs::read_to_string(&path).unwrap())).unwrap();
        init_log_file(&path_str).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("MultiChart QA 提交记录").count(), 2);
        assert!(content.contains("earlier record"));

        let _ = std::fs::remove_file(&path);
    }
}
