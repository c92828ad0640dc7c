pub mod ai;
pub mod config;
pub mod core;
pub mod custom_list;
pub mod error;
pub mod text;
pub mod utils;
pub mod wildcard;

#[cfg(feature = "comfyui")]
pub mod nodes;

#[cfg(feature = "comfyui")]
use pyo3::{
    pymodule,
    types::{PyDict, PyDictMethods, PyModule, PyModuleMethods},
    wrap_pyfunction, Bound, PyResult, Python,
};

/// A Python module implemented in Rust.
#[cfg(feature = "comfyui")]
#[pymodule]
#[pyo3(name = "comfyui_wildpromptor")] // 需要与包名保持一致
fn py_init(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    // 初始化日志
    utils::log::init_logger();

    // 模型列表, 供前端刷新下拉框
    m.add_function(wrap_pyfunction!(nodes::ollama_models, m)?)?;

    // 添加子模块
    m.add_submodule(&nodes::submodule(py)?)?;

    // 注册 ComfyUI NODE_CLASS_MAPPINGS/NODE_DISPLAY_NAME_MAPPINGS
    let node_mapping = PyDict::new(py);
    let name_mapping = PyDict::new(py);

    // 批量注册节点
    for node in nodes::node_register(py)? {
        node_mapping.set_item(&node.0, node.1)?;
        name_mapping.set_item(&node.0, node.2)?;
    }

    const WEB_DIRECTORY: &str = "./web";

    m.add("NODE_CLASS_MAPPINGS", node_mapping)?;
    m.add("NODE_DISPLAY_NAME_MAPPINGS", name_mapping)?;
    m.add("WEB_DIRECTORY", WEB_DIRECTORY)?;
    Ok(())
}
