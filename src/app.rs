//! 交互界面层
//!
//! 把标注员输入的命令翻译为会话事件和图表查询，每条命令处理完重新渲染视图。
//! 图表查询和会话状态机互不依赖，只在这里组合。

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::command::{help_text, Command};
use crate::config::Config;
use crate::error::{AppResult, SessionError};
use crate::models::{Category, FolderId};
use crate::services::{
    CachedProvider, ChartImageProvider, ChartViewer, DriveChartProvider, ImageWriter,
    SubmissionLog,
};
use crate::utils::logging;
use crate::workflow::{Dispatched, Event, SessionState, SessionView};

/// 一条命令的处理结果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Reply {
    /// 给标注员看的消息
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn advisory(&mut self, message: impl std::fmt::Display) {
        self.lines.push(format!("⚠️ {}", message));
    }
}

/// 应用主结构
pub struct App<P = CachedProvider<DriveChartProvider>> {
    config: Config,
    session: SessionState,
    viewer: ChartViewer<P>,
    image_writer: ImageWriter,
    submission_log: SubmissionLog,
}

impl App {
    /// 初始化应用（Drive + 缓存）
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let provider = CachedProvider::from_config(DriveChartProvider::new(&config), &config);
        Self::with_provider(config, provider)
    }
}

impl<P: ChartImageProvider> App<P> {
    /// 使用自定义提供者初始化
    pub fn with_provider(config: Config, provider: P) -> AppResult<Self> {
        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(&config);

        if config.drive_access_token.is_empty() {
            warn!("⚠️ 未配置 DRIVE_ACCESS_TOKEN，Drive 请求可能被拒绝");
        }

        Ok(Self {
            viewer: ChartViewer::new(provider, FolderId(config.root_folder_id.clone())),
            image_writer: ImageWriter::new(&config.image_output_dir),
            submission_log: SubmissionLog::new(&config.output_log_file),
            session: SessionState::new(),
            config,
        })
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn view(&self) -> SessionView {
        SessionView::of(&self.session)
    }

    /// 运行交互主循环，直到 quit 或输入结束
    pub async fn run(&mut self) -> AppResult<()> {
        println!("MultiChart QA Generation");
        println!("{}\n", help_text(&self.config.instructions_url));

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        loop {
            stdout.write_all(b"\nEnter Chart ID (0 to 100) / command > ").await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    println!("⚠️ {}", e);
                    continue;
                }
            };

            let reply = self.handle(command).await;
            for line in &reply.lines {
                println!("{}", line);
            }
            if reply.quit {
                break;
            }
            println!("\n{}", self.view());
        }

        info!("👋 会话结束");
        Ok(())
    }

    /// 处理一条命令
    pub async fn handle(&mut self, command: Command) -> Reply {
        let mut reply = Reply::default();

        match command {
            Command::Display(chart_id) => self.display(&chart_id, &mut reply).await,
            Command::SelectCategory(category) => {
                self.apply(Event::SelectCategory(category), &mut reply);
            }
            Command::AddQaPair => {
                if let Some(category) = self.require_selected(&mut reply) {
                    self.apply(Event::AddQaPair(category), &mut reply);
                }
            }
            Command::Question { number, text } => {
                if let Some(category) = self.require_selected(&mut reply) {
                    self.apply(
                        Event::EditQuestion {
                            category,
                            index: number - 1,
                            text,
                        },
                        &mut reply,
                    );
                }
            }
            Command::Answer { number, text } => {
                if let Some(category) = self.require_selected(&mut reply) {
                    self.apply(
                        Event::EditAnswer {
                            category,
                            index: number - 1,
                            text,
                        },
                        &mut reply,
                    );
                }
            }
            Command::SubmitCategory => {
                if let Some(category) = self.require_selected(&mut reply) {
                    self.submit_category(category, &mut reply);
                }
            }
            Command::SubmitAll => self.submit_all(&mut reply),
            Command::Status => {}
            Command::Help => reply.push(help_text(&self.config.instructions_url)),
            Command::Quit => reply.quit = true,
        }

        reply
    }

    // ========== 命令处理 ==========

    async fn display(&mut self, chart_id: &str, reply: &mut Reply) {
        let chart_id = chart_id.trim();
        if !chart_id.is_empty() {
            self.apply(Event::SetChartId(chart_id.to_string()), reply);
            self.apply(Event::ImagesDisplayed(false), reply);
        }

        let display = match self.viewer.display(chart_id).await {
            Ok(display) => display,
            Err(e) => {
                warn!("⚠️ 加载图表 {} 失败: {}", chart_id, e);
                reply.advisory(format!("加载图表失败: {}", e));
                return;
            }
        };

        for advisory in &display.advisories {
            reply.advisory(advisory);
        }
        if !display.is_displayed() {
            return;
        }

        let written = match self.image_writer.write(&display).await {
            Ok(written) => written,
            Err(e) => {
                warn!("⚠️ 写入图片失败: {}", e);
                reply.advisory(format!("写入图片失败: {}", e));
                return;
            }
        };

        reply.push("MultiChartPair");
        let mut written = written.iter();
        for panel in &display.panels {
            if panel.images.is_empty() {
                continue;
            }
            reply.push(format!("{}:", panel.side));
            for image in written.by_ref().take(panel.images.len()) {
                reply.push(format!("  {} -> {}", image.caption, image.path.display()));
            }
        }

        self.apply(Event::ImagesDisplayed(true), reply);
    }

    fn submit_category(&mut self, category: Category, reply: &mut Reply) {
        let complete_pairs = self
            .session
            .qa_pairs(category)
            .iter()
            .filter(|p| p.is_complete())
            .count();

        if self.apply(Event::SubmitCategory(category), reply) {
            info!("✓ {} 已提交，完整 QA 对 {} 个", category, complete_pairs);
            reply.push(format!("✓ {} QA Pair 已提交", category));
            if let Err(e) =
                self.submission_log
                    .record_category(self.session.chart_id(), category, complete_pairs)
            {
                warn!("⚠️ 写入提交记录失败: {}", e);
            }
        }
    }

    fn submit_all(&mut self, reply: &mut Reply) {
        let chart_id = self.session.chart_id().to_string();

        if self.apply(Event::SubmitAll, reply) {
            reply.push("✓ All QA pairs for this multichart submitted and locked.");
            if let Err(e) = self.submission_log.record_all(&chart_id) {
                warn!("⚠️ 写入提交记录失败: {}", e);
            }
        }
    }

    // ========== 辅助方法 ==========

    /// 派发事件，返回是否生效
    fn apply(&mut self, event: Event, reply: &mut Reply) -> bool {
        match self.session.dispatch(event) {
            Dispatched::Applied => true,
            Dispatched::Advisory(e) => {
                reply.advisory(e);
                false
            }
        }
    }

    fn require_selected(&self, reply: &mut Reply) -> Option<Category> {
        let selected = self.session.selected_category();
        if selected.is_none() {
            reply.advisory(SessionError::NoCategorySelected);
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::FakeProvider;

    fn test_config(tag: &str) -> Config {
        let dir = std::env::temp_dir().join(format!("multichart_qa_app_{}_{}", tag, std::process::id()));
        Config {
            root_folder_id: "root".to_string(),
            image_output_dir: dir.join("images").to_string_lossy().to_string(),
            output_log_file: std::env::temp_dir()
                .join(format!("multichart_qa_app_{}_{}.txt", tag, std::process::id()))
                .to_string_lossy()
                .to_string(),
            ..Config::default()
        }
    }

    async fn run_all(app: &mut App<FakeProvider>, lines: &[&str]) -> Vec<Reply> {
        let mut replies = Vec::new();
        for line in lines {
            let command = Command::parse(line).unwrap().unwrap();
            replies.push(app.handle(command).await);
        }
        replies
    }

    #[tokio::test]
    async fn test_commands_without_category_are_advisories() {
        let mut app = App::with_provider(test_config("nocat"), FakeProvider::new()).unwrap();
        let replies = run_all(&mut app, &["add", "q 1 text", "submit"]).await;

        for reply in replies {
            assert_eq!(reply.lines, vec!["⚠️ 请先选择一个类别".to_string()]);
        }
        assert_eq!(app.session(), &SessionState::new());
    }

    #[tokio::test]
    async fn test_display_failure_leaves_session_untouched() {
        let mut app = App::with_provider(test_config("miss"), FakeProvider::new()).unwrap();
        run_all(&mut app, &["c ei", "add", "q 1 Q", "a 1 A"]).await;
        let pairs_before = app.session().qa_pairs(Category::EntityInference).to_vec();

        let reply = app.handle(Command::Display("77".to_string())).await;

        assert!(reply.lines[0].contains("anchor_77"));
        assert_eq!(app.session().chart_id(), "77");
        assert!(!app.session().images_displayed());
        assert_eq!(app.session().qa_pairs(Category::EntityInference), pairs_before.as_slice());
        assert!(app.view().submit_category_enabled);
    }

    #[tokio::test]
    async fn test_display_marks_images_displayed() {
        let provider = FakeProvider::new()
            .with_folder("root", "anchor_1", "fa")
            .with_folder("root", "anchor_1_0", "fs")
            .with_entry("fa", "a1", "anchor.png", "image/png")
            .with_entry("fs", "s1", "similar.png", "image/png")
            .with_file("a1", vec![1])
            .with_file("s1", vec![2]);
        let config = test_config("display");
        let image_dir = config.image_output_dir.clone();
        let mut app = App::with_provider(config, provider).unwrap();

        let reply = app.handle(Command::Display("1".to_string())).await;

        assert_eq!(reply.lines[0], "MultiChartPair");
        assert!(reply.lines.iter().any(|l| l == "Chart 2:"));
        assert!(app.session().images_displayed());

        let _ = std::fs::remove_dir_all(image_dir);
    }

    #[tokio::test]
    async fn test_restart_keeps_submission_records() {
        let config = test_config("restart");
        let log_file = config.output_log_file.clone();
        let _ = std::fs::remove_file(&log_file);

        let mut app = App::with_provider(config.clone(), FakeProvider::new()).unwrap();
        run_all(&mut app, &["c ei", "add", "q 1 How many bars", "a 1 Five", "submit"]).await;
        drop(app);

        App::with_provider(config, FakeProvider::new()).unwrap();

        let content = std::fs::read_to_string(&log_file).unwrap();
        assert!(content.contains("类别 Entity Inference | 完整 QA 对 1"));
        assert!(!content.contains("How many bars"));
        assert_eq!(content.matches("MultiChart QA 提交记录").count(), 2);

        let _ = std::fs::remove_file(&log_file);
    }

    #[tokio::test]
    async fn test_full_session_through_commands() {
        let mut app = App::with_provider(test_config("full"), FakeProvider::new()).unwrap();

        let replies = run_all(&mut app, &["submit-all"]).await;
        assert!(replies[0].lines[0].starts_with("⚠️"));

        for alias in ["1", "2", "3"] {
            let select = format!("c {}", alias);
            run_all(&mut app, &[select.as_str(), "add", "add", "add", "q 1 Q", "a 1 A"]).await;
            let replies = run_all(&mut app, &["submit"]).await;
            assert!(replies[0].lines[0].starts_with("✓"));
        }
        assert!(app.view().submit_all_enabled);

        let replies = run_all(&mut app, &["submit-all"]).await;
        assert_eq!(
            replies[0].lines,
            vec!["✓ All QA pairs for this multichart submitted and locked.".to_string()]
        );
        assert_eq!(app.session(), &SessionState::new());

        let reply = app.handle(Command::Quit).await;
        assert!(reply.quit);
    }
}
