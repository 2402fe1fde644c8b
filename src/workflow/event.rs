//! 会话事件
//!
//! 每个用户操作对应一个事件，一次只处理一个，处理完再重新渲染视图

use tracing::warn;

use crate::error::SessionError;
use crate::models::Category;
use crate::workflow::session::SessionState;

/// 用户操作事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SelectCategory(Category),
    AddQaPair(Category),
    EditQuestion {
        category: Category,
        index: usize,
        text: String,
    },
    EditAnswer {
        category: Category,
        index: usize,
        text: String,
    },
    SubmitCategory(Category),
    SubmitAll,
    SetChartId(String),
    ImagesDisplayed(bool),
}

/// 事件处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// 事件已生效
    Applied,
    /// 未生效，附带给标注员的提示
    Advisory(SessionError),
}

impl Dispatched {
    pub fn is_applied(&self) -> bool {
        matches!(self, Dispatched::Applied)
    }
}

impl From<Result<(), SessionError>> for Dispatched {
    fn from(result: Result<(), SessionError>) -> Self {
        match result {
            Ok(()) => Dispatched::Applied,
            Err(e) => Dispatched::Advisory(e),
        }
    }
}

impl SessionState {
    /// 处理一个事件，并重新计算派生标记
    pub fn dispatch(&mut self, event: Event) -> Dispatched {
        let result = match event {
            Event::SelectCategory(category) => {
                self.select_category(category);
                Ok(())
            }
            Event::AddQaPair(category) => self.add_qa_pair(category).map(|_| ()),
            Event::EditQuestion {
                category,
                index,
                text,
            } => self.edit_question(category, index, text),
            Event::EditAnswer {
                category,
                index,
                text,
            } => self.edit_answer(category, index, text),
            Event::SubmitCategory(category) => self.submit_category(category),
            Event::SubmitAll => self.submit_all(),
            Event::SetChartId(chart_id) => {
                self.set_chart_id(chart_id);
                Ok(())
            }
            Event::ImagesDisplayed(displayed) => {
                self.set_images_displayed(displayed);
                Ok(())
            }
        };

        self.recompute_all_submitted();

        if let Err(e) = &result {
            warn!("⚠️ {}", e);
        }
        result.into()
    }
}

/// 纯函数形式的状态转换：`(State, Event) -> State`
pub fn transition(mut state: SessionState, event: Event) -> (SessionState, Dispatched) {
    let dispatched = state.dispatch(event);
    (state, dispatched)
}
