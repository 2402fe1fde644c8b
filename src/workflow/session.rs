//! QA 会话状态机 - 流程层
//!
//! 核心职责：管理一次标注会话的全部状态
//!
//! - 当前选择的类别
//! - 每个类别的 QA 对（最多 2 个）
//! - 已提交的类别集合，以及"全部已提交"标记
//! - 当前图表 ID 和图片是否已显示
//!
//! 所有失败都只是提示，不会修改状态

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::error::SessionError;
use crate::models::{Category, QaPair, MAX_QA_PAIRS_PER_CATEGORY};

/// 标注会话状态
///
/// 每个会话一个实例，不在会话之间共享
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// 类别 -> QA 对列表，缺失的 key 等价于空列表
    qa_pairs: BTreeMap<Category, Vec<QaPair>>,
    selected_category: Option<Category>,
    categories_submitted: BTreeSet<Category>,
    /// 由 `categories_submitted` 推导的缓存值
    all_categories_submitted: bool,
    chart_id: String,
    images_displayed: bool,
}

impl SessionState {
    /// 创建空会话
    pub fn new() -> Self {
        Self::default()
    }

    // ========== 只读访问 ==========

    /// 某个类别当前的 QA 对
    pub fn qa_pairs(&self, category: Category) -> &[QaPair] {
        self.qa_pairs
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 该类别是否已经创建过条目
    pub fn has_entry(&self, category: Category) -> bool {
        self.qa_pairs.contains_key(&category)
    }

    pub fn selected_category(&self) -> Option<Category> {
        self.selected_category
    }

    pub fn categories_submitted(&self) -> &BTreeSet<Category> {
        &self.categories_submitted
    }

    pub fn all_categories_submitted(&self) -> bool {
        self.all_categories_submitted
    }

    pub fn chart_id(&self) -> &str {
        &self.chart_id
    }

    pub fn images_displayed(&self) -> bool {
        self.images_displayed
    }

    // ========== 状态转换 ==========

    /// 选择类别，总是成功
    pub fn select_category(&mut self, category: Category) {
        debug!("选择类别: {}", category);
        self.selected_category = Some(category);
    }

    /// 为类别追加一个空 QA 对，返回新 QA 对的索引
    ///
    /// 已有 2 个时返回 `CapacityExceeded`，不做任何修改
    pub fn add_qa_pair(&mut self, category: Category) -> Result<usize, SessionError> {
        if self.qa_pairs(category).len() >= MAX_QA_PAIRS_PER_CATEGORY {
            return Err(SessionError::CapacityExceeded {
                category,
                max: MAX_QA_PAIRS_PER_CATEGORY,
            });
        }

        let entry = self.qa_pairs.entry(category).or_default();
        entry.push(QaPair::default());
        debug!("{} 新增 QA 对，当前 {} 个", category, entry.len());
        Ok(entry.len() - 1)
    }

    /// 覆盖问题文本
    pub fn edit_question(
        &mut self,
        category: Category,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.pair_mut(category, index)?.question = text.into();
        Ok(())
    }

    /// 覆盖答案文本
    pub fn edit_answer(
        &mut self,
        category: Category,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.pair_mut(category, index)?.answer = text.into();
        Ok(())
    }

    /// 当前选中该类别，且至少有一个完整的 QA 对
    ///
    /// 只要求任意一个完整，第二个可以留空
    pub fn can_submit_category(&self, category: Category) -> bool {
        self.selected_category == Some(category)
            && self.qa_pairs(category).iter().any(QaPair::is_complete)
    }

    /// 提交类别
    ///
    /// 成功后该类别的 QA 文本被丢弃（不归档），选择被清空
    pub fn submit_category(&mut self, category: Category) -> Result<(), SessionError> {
        if !self.can_submit_category(category) {
            return Err(SessionError::PreconditionUnmet {
                action: "submit_category",
            });
        }

        self.categories_submitted.insert(category);
        self.selected_category = None;
        self.qa_pairs.remove(&category);
        self.recompute_all_submitted();

        info!(
            "✓ 类别 {} 已提交 ({}/{})",
            category,
            self.categories_submitted.len(),
            Category::ALL.len()
        );
        Ok(())
    }

    /// 重新计算"全部已提交"标记
    pub fn recompute_all_submitted(&mut self) -> bool {
        self.all_categories_submitted = self.categories_submitted.len() == Category::ALL.len()
            && Category::ALL
                .iter()
                .all(|c| self.categories_submitted.contains(c));
        self.all_categories_submitted
    }

    /// 全部提交，成功后会话回到初始状态
    pub fn submit_all(&mut self) -> Result<(), SessionError> {
        if !self.recompute_all_submitted() {
            return Err(SessionError::PreconditionUnmet {
                action: "submit_all",
            });
        }

        info!("✓ 图表 {} 的全部 QA 已提交并锁定", self.chart_id);
        *self = Self::default();
        Ok(())
    }

    /// 设置当前图表 ID，不做范围校验
    pub fn set_chart_id(&mut self, chart_id: impl Into<String>) {
        self.chart_id = chart_id.into();
    }

    pub fn set_images_displayed(&mut self, displayed: bool) {
        self.images_displayed = displayed;
    }

    fn pair_mut(&mut self, category: Category, index: usize) -> Result<&mut QaPair, SessionError> {
        let len = self.qa_pairs(category).len();
        self.qa_pairs
            .get_mut(&category)
            .and_then(|pairs| pairs.get_mut(index))
            .ok_or(SessionError::IndexOutOfRange { index, len })
    }
}
