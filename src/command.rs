//! 标注员命令解析
//!
//! 把一行输入解析为命令，不接触会话状态

use thiserror::Error;

use crate::models::Category;

/// 标注员命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 显示图表对
    Display(String),
    SelectCategory(Category),
    AddQaPair,
    /// `number` 从 1 开始
    Question { number: usize, text: String },
    Answer { number: usize, text: String },
    SubmitCategory,
    SubmitAll,
    Status,
    Help,
    Quit,
}

/// 命令解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("未知命令: {0}，输入 help 查看帮助")]
    Unknown(String),
    #[error("缺少参数: {0}")]
    MissingArgument(&'static str),
    #[error("无效的序号: {0}（应为 1 或 2）")]
    InvalidNumber(String),
    #[error("未知类别: {0}")]
    UnknownCategory(String),
}

impl Command {
    /// 解析一行输入，空行返回 `None`
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "display" | "d" => Command::Display(rest.to_string()),
            "category" | "c" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("类别"));
                }
                let category = Category::find(rest)
                    .ok_or_else(|| CommandError::UnknownCategory(rest.to_string()))?;
                Command::SelectCategory(category)
            }
            "add" => Command::AddQaPair,
            "q" | "question" => {
                let (number, text) = parse_numbered_text(rest)?;
                Command::Question { number, text }
            }
            "a" | "answer" => {
                let (number, text) = parse_numbered_text(rest)?;
                Command::Answer { number, text }
            }
            "submit" => Command::SubmitCategory,
            "submit-all" | "submitall" => Command::SubmitAll,
            "status" | "s" => Command::Status,
            "help" | "h" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

/// 解析 `<序号> <文本>`，文本可以为空（用于清空）
fn parse_numbered_text(rest: &str) -> Result<(usize, String), CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument("序号"));
    }

    let (number, text) = match rest.split_once(char::is_whitespace) {
        Some((number, text)) => (number, text.trim_start()),
        None => (rest, ""),
    };

    match number.parse::<usize>() {
        Ok(n) if n >= 1 => Ok((n, text.to_string())),
        _ => Err(CommandError::InvalidNumber(number.to_string())),
    }
}

/// 帮助文本
pub fn help_text(instructions_url: &str) -> String {
    format!(
        "\
命令:
  display <图表ID>        显示图表对 (anchor_<ID> 与 anchor_<ID>_0)
  category <名称|1-3>     选择类别 (1=ana, 2=ei, 3=clre)
  add                     为当前类别添加 QA 对 (最多 2 个)
  q <序号> <文本>          填写问题
  a <序号> <文本>          填写答案
  submit                  提交当前类别
  submit-all              全部提交 (所有类别提交后可用)
  status                  查看当前状态
  quit                    退出

QA Generation Instructions/Rubric: {}",
        instructions_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(Command::parse("   "), Ok(None));
        assert_eq!(
            Command::parse("display 12"),
            Ok(Some(Command::Display("12".to_string())))
        );
        assert_eq!(Command::parse("d"), Ok(Some(Command::Display(String::new()))));
        assert_eq!(Command::parse("ADD"), Ok(Some(Command::AddQaPair)));
        assert_eq!(Command::parse("submit-all"), Ok(Some(Command::SubmitAll)));
        assert_eq!(Command::parse("exit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(
            Command::parse("category Entity Inference"),
            Ok(Some(Command::SelectCategory(Category::EntityInference)))
        );
        assert_eq!(
            Command::parse("c 3"),
            Ok(Some(Command::SelectCategory(
                Category::ContextualLexicalRangeEstimation
            )))
        );
        assert_eq!(
            Command::parse("c nope"),
            Err(CommandError::UnknownCategory("nope".to_string()))
        );
        assert_eq!(
            Command::parse("category"),
            Err(CommandError::MissingArgument("类别"))
        );
    }

    #[test]
    fn test_parse_question_and_answer() {
        assert_eq!(
            Command::parse("q 1 How many bars are there?"),
            Ok(Some(Command::Question {
                number: 1,
                text: "How many bars are there?".to_string()
            }))
        );
        assert_eq!(
            Command::parse("a 2"),
            Ok(Some(Command::Answer {
                number: 2,
                text: String::new()
            }))
        );
        assert_eq!(
            Command::parse("q 0 text"),
            Err(CommandError::InvalidNumber("0".to_string()))
        );
        assert_eq!(Command::parse("a"), Err(CommandError::MissingArgument("序号")));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            Command::parse("frobnicate now"),
            Err(CommandError::Unknown("frobnicate".to_string()))
        );
    }
}
