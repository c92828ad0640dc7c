//! 选择模式

use strum_macros::{Display, EnumString};

/// 下拉框中固定的三种模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum PickMode {
    /// 禁用
    #[strum(to_string = "❌disabled")]
    Disabled,
    /// 随机
    #[strum(to_string = "🎲Random")]
    Random,
    /// 顺序
    #[strum(to_string = "🔢ordered")]
    Ordered,
}

impl PickMode {
    /// 下拉框选项标签
    pub fn labels() -> Vec<String> {
        vec![
            PickMode::Disabled.to_string(),
            PickMode::Random.to_string(),
            PickMode::Ordered.to_string(),
        ]
    }
}

/// 每个分类的选择模式
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    Disabled,
    Random,
    Ordered,
    /// 指定选项标题
    Explicit(String),
}

impl SelectionMode {
    /// 由下拉框的值解析, 非固定模式的值均视为指定选项
    pub fn from_widget(value: &str) -> Self {
        match value.parse::<PickMode>() {
            Ok(PickMode::Disabled) => SelectionMode::Disabled,
            Ok(PickMode::Random) => SelectionMode::Random,
            Ok(PickMode::Ordered) => SelectionMode::Ordered,
            Err(_) => SelectionMode::Explicit(value.to_string()),
        }
    }

    /// 随机与顺序模式参与批量去重
    pub fn is_active(&self) -> bool {
        matches!(self, SelectionMode::Random | SelectionMode::Ordered)
    }
}

impl From<PickMode> for SelectionMode {
    fn from(mode: PickMode) -> Self {
        match mode {
            PickMode::Disabled => SelectionMode::Disabled,
            PickMode::Random => SelectionMode::Random,
            PickMode::Ordered => SelectionMode::Ordered,
        }
    }
}
