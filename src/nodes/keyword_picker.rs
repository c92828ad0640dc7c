//! 关键词选取节点

use log::error;
use pyo3::{
    exceptions::PyRuntimeError,
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyErr, PyResult, Python,
};

use crate::{
    core::{
        category::CATEGORY_WILDPROMPTOR,
        types::{NODE_INT, NODE_SEED_MAX, NODE_STRING},
        PromptServer,
    },
    error::Error,
    text::{pick_keywords, KeywordPickMode},
};

#[pyclass(subclass)]
pub struct KeywordPicker {}

impl PromptServer for KeywordPicker {}

#[pymethods]
impl KeywordPicker {
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
        ("picked_keywords",)
    }

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_WILDPROMPTOR;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Pick keywords from a comma separated list."
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
                optional.set_item(
                    "input_keywords",
                    (NODE_STRING, {
                        let input_keywords = PyDict::new(py);
                        input_keywords.set_item("forceInput", true)?;
                        input_keywords
                    }),
                )?;
                optional.set_item(
                    "keywords",
                    (NODE_STRING, {
                        let keywords = PyDict::new(py);
                        keywords.set_item("multiline", true)?;
                        keywords.set_item("default", "")?;
                        keywords
                    }),
                )?;
                optional.set_item(
                    "pick_count",
                    (NODE_INT, {
                        let pick_count = PyDict::new(py);
                        pick_count.set_item("default", 1)?;
                        pick_count.set_item("min", 0)?;
                        pick_count.set_item("max", 1000)?;
                        pick_count
                    }),
                )?;
                optional.set_item(
                    "pick_mode",
                    (KeywordPickMode::labels(), {
                        let pick_mode = PyDict::new(py);
                        pick_mode.set_item("default", KeywordPickMode::Random.to_string())?;
                        pick_mode
                    }),
                )?;
                optional.set_item(
                    "seed",
                    (NODE_INT, {
                        let seed = PyDict::new(py);
                        seed.set_item("default", 0)?;
                        seed.set_item("min", 0)?;
                        seed.set_item("max", NODE_SEED_MAX)?;
                        seed
                    }),
                )?;
                optional
            })?;
            Ok(dict.into())
        })
    }

    #[pyo3(
        name = "execute",
        signature = (input_keywords=String::new(), keywords=String::new(), pick_count=1, pick_mode=KeywordPickMode::Random.to_string(), seed=0)
    )]
    fn execute(
        &mut self,
        py: Python<'_>,
        input_keywords: String,
        keywords: String,
        pick_count: usize,
        pick_mode: String,
        seed: u64,
    ) -> PyResult<(String,)> {
        let result = pick_mode
            .parse::<KeywordPickMode>()
            .map_err(|e| Error::ParseEnumString(format!("{pick_mode}, {e}")))
            .map(|mode| pick_keywords(&input_keywords, &keywords, pick_count, mode, seed));

        match result {
            Ok(v) => Ok((v,)),
            Err(e) => {
                error!("KeywordPicker error, {e}");
                if let Err(e) = self.send_error(py, "KeywordPicker".to_string(), e.to_string()) {
                    error!("send error failed, {e}");
                    return Err(PyErr::new::<PyRuntimeError, _>(e.to_string()));
                };
                Err(PyErr::new::<PyRuntimeError, _>(e.to_string()))
            }
        }
    }
}
