use phf::phf_map;

/// 标注类别（固定的三个，只能通过修改源码调整）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Category {
    /// 抽象数值分析
    AbstractNumericalAnalysis,
    /// 实体推断
    EntityInference,
    /// 上下文与词汇推理（含范围估计）
    ContextualLexicalRangeEstimation,
}

/// 类别别名表，用于解析标注员输入
static CATEGORY_ALIASES: phf::Map<&'static str, Category> = phf_map! {
    "1" => Category::AbstractNumericalAnalysis,
    "ana" => Category::AbstractNumericalAnalysis,
    "abstract" => Category::AbstractNumericalAnalysis,
    "abstractnumericalanalysis" => Category::AbstractNumericalAnalysis,
    "2" => Category::EntityInference,
    "ei" => Category::EntityInference,
    "entity" => Category::EntityInference,
    "entityinference" => Category::EntityInference,
    "3" => Category::ContextualLexicalRangeEstimation,
    "clre" => Category::ContextualLexicalRangeEstimation,
    "contextual" => Category::ContextualLexicalRangeEstimation,
    "contextuallexicalrangeestimation" => Category::ContextualLexicalRangeEstimation,
};

impl Category {
    /// 必须全部提交的类别集合
    pub const ALL: [Category; 3] = [
        Category::AbstractNumericalAnalysis,
        Category::EntityInference,
        Category::ContextualLexicalRangeEstimation,
    ];

    /// 获取显示名称
    pub fn label(self) -> &'static str {
        match self {
            Category::AbstractNumericalAnalysis => "Abstract Numerical Analysis",
            Category::EntityInference => "Entity Inference",
            Category::ContextualLexicalRangeEstimation => {
                "Contextual and Lexical Reasoning with Range Estimation"
            }
        }
    }

    /// 表单控件的 key 前缀，例如 `entity_inference`
    pub fn key_prefix(self) -> String {
        self.label().to_lowercase().replace(' ', "_")
    }

    /// 从标注员输入解析类别
    ///
    /// 支持序号（1-3）、别名、变体名以及显示名称，忽略大小写、空格和下划线
    pub fn find(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if let Some(category) = Self::ALL.iter().find(|c| c.label().eq_ignore_ascii_case(trimmed)) {
            return Some(*category);
        }

        let normalized: String = trimmed
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        CATEGORY_ALIASES.get(normalized.as_str()).copied()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_alias_and_label() {
        assert_eq!(Category::find("2"), Some(Category::EntityInference));
        assert_eq!(Category::find("ANA"), Some(Category::AbstractNumericalAnalysis));
        assert_eq!(
            Category::find("Contextual and Lexical Reasoning with Range Estimation"),
            Some(Category::ContextualLexicalRangeEstimation)
        );
        assert_eq!(Category::find("entity_inference"), Some(Category::EntityInference));
        assert_eq!(Category::find("EntityInference"), Some(Category::EntityInference));
        assert_eq!(Category::find("4"), None);
        assert_eq!(Category::find(""), None);
    }

    #[test]
    fn test_key_prefix() {
        assert_eq!(Category::EntityInference.key_prefix(), "entity_inference");
        assert_eq!(
            Category::AbstractNumericalAnalysis.key_prefix(),
            "abstract_numerical_analysis"
        );
    }
}
