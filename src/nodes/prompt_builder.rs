//! 按行构建提示词节点

use pyo3::{
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyResult, Python,
};

use crate::{
    core::{category::CATEGORY_WILDPROMPTOR, types::NODE_STRING},
    text::build_prompts,
};

#[pyclass(subclass)]
pub struct PromptBuilder {}

#[pymethods]
impl PromptBuilder {
    #[new]
    fn new() -> Self {
        Self {}
    }

    #[classattr]
    #[pyo3(name = "RETURN_TYPES")]
    fn return_types() -> (&'static str, &'static str) {
        (NODE_STRING, NODE_STRING)
    }

    #[classattr]
    #[pyo3(name = "RETURN_NAMES")]
    fn return_names() -> (&'static str, &'static str) {
        ("prompt", "content_only")
    }

    #[classattr]
    #[pyo3(name = "OUTPUT_IS_LIST")]
    fn output_is_list() -> (bool, bool) {
        (true, false)
    }

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_WILDPROMPTOR;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Wrap every non-empty line of content with prefix and suffix."
    }

    #[classattr]
    #[pyo3(name = "FUNCTION")]
    const FUNCTION: &'static str = "execute";

    #[classmethod]
    #[pyo3(name = "INPUT_TYPES")]
    fn input_types(_cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
        Python::with_gil(|py| {
            let dict = PyDict::new(py);
            dict.set_item("required", PyDict::new(py))?;
            dict.set_item("optional", {
                let optional = PyDict::new(py);
                for name in ["prefix", "content", "suffix"] {
                    optional.set_item(
                        name,
                        (NODE_STRING, {
                            let text = PyDict::new(py);
                            text.set_item("multiline", true)?;
                            text.set_item("default", "")?;
                            text
                        }),
                    )?;
                }
                optional
            })?;
            Ok(dict.into())
        })
    }

    #[pyo3(name = "execute", signature = (prefix=String::new(), content=String::new(), suffix=String::new()))]
    fn execute(&mut self, prefix: String, content: String, suffix: String) -> (Vec<String>, String) {
        let built = build_prompts(&prefix, &content, &suffix);
        (built.prompts, built.content)
    }
}
