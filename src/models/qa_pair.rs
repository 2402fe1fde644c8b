use serde::{Deserialize, Serialize};

/// 每个类别最多允许的 QA 对数量
pub const MAX_QA_PAIRS_PER_CATEGORY: usize = 2;

/// 一个问答对
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// 问题和答案都非空才算完整（不做 trim）
    pub fn is_complete(&self) -> bool {
        !self.question.is_empty() && !self.answer.is_empty()
    }
}
