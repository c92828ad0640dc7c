//! 节点相关

use pyo3::{types::PyType, Bound};

/// 节点注册
/// (节点class名称, 节点对象, 节点显示名称)
///
/// 词表节点按数据目录动态生成, 名称为运行时字符串
pub struct NodeRegister<'py>(pub String, pub Bound<'py, PyType>, pub String);

impl<'py> NodeRegister<'py> {
    pub fn new(name: impl Into<String>, node: Bound<'py, PyType>, display_name: impl Into<String>) -> Self {
        Self(name.into(), node, display_name.into())
    }
}
