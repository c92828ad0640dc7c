//! All-in-One 词表节点
//!
//! 所有配置目录中的词表合并到一个节点, 整行即选项

use log::error;
use pyo3::{
    exceptions::PyRuntimeError,
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyErr, PyResult, Python,
};

use crate::{
    core::{category::CATEGORY_WILDPROMPTOR, types::NODE_STRING, PromptServer},
    error::Error,
    nodes::inputs::{add_batch_inputs, add_category_inputs, sample_categories, wildcard_library},
};

/// 默认允许重复
const ALLOW_DUPLICATES: bool = true;

#[pyclass(subclass)]
pub struct AllInOne {}

impl PromptServer for AllInOne {}

#[pymethods]
impl AllInOne {
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
    const CATEGORY: &'static str = CATEGORY_WILDPROMPTOR;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Build prompts from the word lists of every configured folder."
    }

    #[classattr]
    #[pyo3(name = "FUNCTION")]
    const FUNCTION: &'static str = "execute";

    #[classmethod]
    #[pyo3(name = "INPUT_TYPES")]
    fn input_types(_cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
        let categories = wildcard_library().all_categories();

        Python::with_gil(|py| {
            let dict = PyDict::new(py);
            dict.set_item("required", PyDict::new(py))?;
            dict.set_item("optional", {
                let optional = PyDict::new(py);
                add_batch_inputs(py, &optional, ALLOW_DUPLICATES)?;
                add_category_inputs(py, &optional, &categories)?;
                optional
            })?;
            Ok(dict.into())
        })
    }

    #[pyo3(name = "execute", signature = (**kwargs))]
    fn execute<'py>(
        &mut self,
        py: Python<'py>,
        kwargs: Option<Bound<'py, PyDict>>,
    ) -> PyResult<(Vec<String>,)> {
        let result = self.process(kwargs.as_ref());

        match result {
            Ok(v) => Ok((v,)),
            Err(e) => {
                error!("AllInOne error, {e}");
                if let Err(e) = self.send_error(py, "AllInOne".to_string(), e.to_string()) {
                    error!("send error failed, {e}");
                    return Err(PyErr::new::<PyRuntimeError, _>(e.to_string()));
                };
                Err(PyErr::new::<PyRuntimeError, _>(e.to_string()))
            }
        }
    }
}

impl AllInOne {
    fn process(&self, kwargs: Option<&Bound<'_, PyDict>>) -> Result<Vec<String>, Error> {
        let categories = wildcard_library().all_categories();
        sample_categories(&categories, kwargs, ALLOW_DUPLICATES)
    }
}
