//! # MultiChart QA
//!
//! 为多图表对采集人工编写的问答对（QA pairs）的标注工具
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 客户端），只暴露能力
//! - `DriveClient` - 唯一的 HTTP client owner，提供 get_json() / get_bytes()
//! - `Cache` - 可替换的缓存（内存 / 不缓存）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `ChartImageProvider` - 找文件夹 / 列文件 / 下载图片
//! - `ChartViewer` - 加载 `anchor_{id}` 与 `anchor_{id}_0` 图表对
//! - `ImageWriter` / `SubmissionLog` - 写图片、写提交记录
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - QA 会话状态机
//! - `SessionState` - 类别选择、QA 对、逐类提交、全部提交
//! - `Event` / `SessionView` - 事件派发与派生视图
//!
//! ### ④ 界面层（App）
//! - `app` - 交互主循环，把命令翻译为事件和图表查询
//!
//! ## 模块结构

pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use command::Command;
pub use config::Config;
pub use error::{AppError, AppResult, SessionError};
pub use models::{Category, QaPair};
pub use services::{ChartImageProvider, ChartViewer};
pub use workflow::{Dispatched, Event, SessionState, SessionView};
