use anyhow::{Context, Result};
use multichart_qa::utils::logging;
use multichart_qa::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load().context("加载配置失败")?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config)
        .await
        .context("初始化应用失败")?
        .run()
        .await?;

    Ok(())
}
