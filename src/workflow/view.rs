//! 派生视图
//!
//! 按钮是否可用等只读信息，每次事件处理后从状态重新计算，不存储

use std::fmt::{self, Display};

use crate::models::{Category, QaPair, MAX_QA_PAIRS_PER_CATEGORY};
use crate::workflow::session::SessionState;

/// 渲染层需要的只读视图
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub chart_id: String,
    pub images_displayed: bool,
    pub selected_category: Option<Category>,
    /// 当前选中类别的 QA 对
    pub pairs: Vec<QaPair>,
    pub submitted: Vec<Category>,
    /// "Add QA Pair" 是否可用
    pub add_enabled: bool,
    /// 达到上限时显示提示
    pub capacity_reached: bool,
    /// "Submit Category" 是否可用
    pub submit_category_enabled: bool,
    /// "Submit All" 是否可用
    pub submit_all_enabled: bool,
}

impl SessionView {
    pub fn of(state: &SessionState) -> Self {
        let selected_category = state.selected_category();
        let pairs = selected_category
            .map(|c| state.qa_pairs(c).to_vec())
            .unwrap_or_default();
        let capacity_reached =
            selected_category.is_some() && pairs.len() >= MAX_QA_PAIRS_PER_CATEGORY;

        Self {
            chart_id: state.chart_id().to_string(),
            images_displayed: state.images_displayed(),
            selected_category,
            submitted: state.categories_submitted().iter().copied().collect(),
            add_enabled: selected_category.is_some() && !capacity_reached,
            capacity_reached,
            submit_category_enabled: selected_category
                .map(|c| state.can_submit_category(c))
                .unwrap_or(false),
            submit_all_enabled: Category::ALL
                .iter()
                .all(|c| state.categories_submitted().contains(c)),
            pairs,
        }
    }
}

fn toggle(enabled: bool) -> &'static str {
    if enabled {
        "可用"
    } else {
        "禁用"
    }
}

impl Display for SessionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chart = if self.chart_id.is_empty() {
            "-"
        } else {
            self.chart_id.as_str()
        };
        writeln!(f, "图表 ID: {} (图片已显示: {})", chart, self.images_displayed)?;

        match self.selected_category {
            Some(category) => {
                writeln!(f, "当前类别: {}", category)?;
                for (i, pair) in self.pairs.iter().enumerate() {
                    writeln!(f, "  {} - Question {}: {}", category, i + 1, pair.question)?;
                    writeln!(f, "  {} - Answer {}: {}", category, i + 1, pair.answer)?;
                }
            }
            None => writeln!(f, "当前类别: 未选择")?,
        }

        if self.capacity_reached {
            writeln!(
                f,
                "⚠️ 每个类别最多 {} 个 QA 对",
                MAX_QA_PAIRS_PER_CATEGORY
            )?;
        }

        let submitted: Vec<&str> = self.submitted.iter().map(|c| c.label()).collect();
        writeln!(
            f,
            "已提交类别 ({}/{}): {}",
            self.submitted.len(),
            Category::ALL.len(),
            submitted.join(", ")
        )?;
        write!(
            f,
            "[Add QA Pair: {}] [Submit Category: {}] [Submit All: {}]",
            toggle(self.add_enabled),
            toggle(self.submit_category_enabled),
            toggle(self.submit_all_enabled)
        )
    }
}
