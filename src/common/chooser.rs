use inquire::{InquireError, Select};
use tracing::debug;

use crate::parser::errors::ParseError;

/// 从一组带标签的候选项中选出一项，返回下标
pub trait Chooser {
    fn choose(&self, prompt: &str, options: &[String]) -> Result<usize, ParseError>;
}

/// 终端交互选择
pub struct InquireChooser {
    page_size: usize,
}

impl InquireChooser {
    pub fn new() -> Self {
        Self { page_size: 50 }
    }
}

impl Default for InquireChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl Chooser for InquireChooser {
    fn choose(&self, prompt: &str, options: &[String]) -> Result<usize, ParseError> {
        debug!("{}: {} 个选项", prompt, options.len());
        Select::new(prompt, options.to_vec())
            .with_page_size(self.page_size)
            .raw_prompt()
            .map(|choice| choice.index)
            .map_err(|e| match e {
                InquireError::OperationCanceled | InquireError::OperationInterrupted => {
                    ParseError::NoSelection("已取消".to_string())
                }
                other => ParseError::NoSelection(other.to_string()),
            })
    }
}

/// 校验选择结果的下标，防止越界
pub fn checked_choice(
    chooser: &dyn Chooser,
    prompt: &str,
    options: &[String],
) -> Result<usize, ParseError> {
    let index = chooser.choose(prompt, options)?;
    if index >= options.len() {
        return Err(ParseError::NoSelection(format!(
            "选择的序号 {} 超出范围 (共 {} 项)",
            index,
            options.len()
        )));
    }
    Ok(index)
}
