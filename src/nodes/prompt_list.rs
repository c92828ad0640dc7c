//! 词表节点
//!
//! 数据目录下的每个子目录在模块初始化时生成一个子类, 子类的 `FOLDER_NAME` 指定目录

use log::{debug, error};
use pyo3::{
    exceptions::PyRuntimeError,
    pyclass, pymethods,
    types::{PyAnyMethods, PyDict, PyDictMethods, PyModule, PyType},
    Bound, Py, PyErr, PyResult, Python,
};

use crate::{
    core::{
        category::CATEGORY_PROMPTS_LIST,
        types::NODE_STRING,
        PromptServer,
    },
    error::Error,
    nodes::inputs::{add_batch_inputs, add_category_inputs, sample_categories, wildcard_library},
};

/// 词表节点基类
#[pyclass(subclass)]
pub struct PromptList {}

impl PromptServer for PromptList {}

#[pymethods]
impl PromptList {
    #[new]
    fn new() -> Self {
        Self {}
    }

    #[classattr]
    #[pyo3(name = "RETURN_TYPES")]
    fn return_types() -> (&'static str,) {
        (NODE_STRING,)
    }

    #[classattr]
    #[pyo3(name = "RETURN_NAMES")]
    fn return_names() -> (&'static str,) {
        ("prompt",)
    }

    #[classattr]
    #[pyo3(name = "OUTPUT_IS_LIST")]
    fn output_is_list() -> (bool,) {
        (true,)
    }

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_PROMPTS_LIST;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Build prompts from the word lists of one data folder."
    }

    #[classattr]
    #[pyo3(name = "FUNCTION")]
    const FUNCTION: &'static str = "execute";

    #[classattr]
    #[pyo3(name = "FOLDER_NAME")]
    const FOLDER_NAME: &'static str = "";

    #[classmethod]
    #[pyo3(name = "INPUT_TYPES")]
    fn input_types(cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
        let folder = cls.getattr("FOLDER_NAME")?.extract::<String>()?;
        let categories = wildcard_library().folder_categories(&folder);
        debug!("prompt list {folder}, categories: {}", categories.len());

        Python::with_gil(|py| {
            let dict = PyDict::new(py);
            dict.set_item("required", PyDict::new(py))?;
            dict.set_item("optional", {
                let optional = PyDict::new(py);
                add_category_inputs(py, &optional, &categories)?;
                add_batch_inputs(py, &optional, false)?;
                optional
            })?;
            Ok(dict.into())
        })
    }

    #[pyo3(name = "execute", signature = (**kwargs))]
    fn execute<'py>(
        slf: &Bound<'py, Self>,
        py: Python<'py>,
        kwargs: Option<Bound<'py, PyDict>>,
    ) -> PyResult<(Vec<String>,)> {
        let result = Self::process(slf, kwargs.as_ref());

        match result {
            Ok(v) => Ok((v,)),
            Err(e) => {
                error!("PromptList error, {e}");
                if let Err(e) = slf
                    .borrow()
                    .send_error(py, "PromptList".to_string(), e.to_string())
                {
                    error!("send error failed, {e}");
                    return Err(PyErr::new::<PyRuntimeError, _>(e.to_string()));
                };
                Err(PyErr::new::<PyRuntimeError, _>(e.to_string()))
            }
        }
    }
}

impl PromptList {
    /// 按子类的目录采样
    fn process(slf: &Bound<'_, Self>, kwargs: Option<&Bound<'_, PyDict>>) -> Result<Vec<String>, Error> {
        let folder = slf.get_type().getattr("FOLDER_NAME")?.extract::<String>()?;
        if folder.is_empty() {
            return Err(Error::InvalidParameter(
                "FOLDER_NAME is not set on the prompt list node".to_string(),
            ));
        }

        let categories = wildcard_library().folder_categories(&folder);
        sample_categories(&categories, kwargs, false)
    }

    /// 为数据目录创建子类
    pub fn folder_type<'py>(py: Python<'py>, folder: &str) -> PyResult<Bound<'py, PyType>> {
        let attrs = PyDict::new(py);
        attrs.set_item("FOLDER_NAME", folder)?;
        attrs.set_item("CATEGORY", CATEGORY_PROMPTS_LIST)?;

        let class_name = format!("{}PromptorNode", folder.replace(|c: char| !c.is_alphanumeric(), ""));
        let node_type = PyModule::import(py, "builtins")?
            .getattr("type")?
            .call1((class_name, (py.get_type::<PromptList>(),), attrs))?;
        Ok(node_type.downcast_into::<PyType>()?)
    }
}
