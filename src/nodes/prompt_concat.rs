//! 提示词拼接节点
//!
//! 配置中的每个目录对应一个文本输入, 输入名为目录名的小写形式

use log::{error, info};
use pyo3::{
    exceptions::PyRuntimeError,
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyErr, PyResult, Python,
};

use crate::{
    core::{
        category::CATEGORY_WILDPROMPTOR,
        types::{NODE_BOOLEAN, NODE_STRING},
        PromptServer,
    },
    error::Error,
    nodes::inputs::{kwarg, wildcard_library},
    text::{concat_prompt, ConcatOptions, Separator},
};

fn multiline_input(py: Python<'_>) -> PyResult<(&'static str, Bound<'_, PyDict>)> {
    let options = PyDict::new(py);
    options.set_item("multiline", true)?;
    options.set_item("default", "")?;
    Ok((NODE_STRING, options))
}

#[pyclass(subclass)]
pub struct PromptConcat {}

impl PromptServer for PromptConcat {}

#[pymethods]
impl PromptConcat {
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
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_WILDPROMPTOR;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Concatenate prefix, folder prompts and suffix into one prompt."
    }

    #[classattr]
    #[pyo3(name = "FUNCTION")]
    const FUNCTION: &'static str = "execute";

    #[classmethod]
    #[pyo3(name = "INPUT_TYPES")]
    fn input_types(_cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
        let folders = wildcard_library().concat_folders();

        Python::with_gil(|py| {
            let dict = PyDict::new(py);
            dict.set_item("required", PyDict::new(py))?;
            dict.set_item("optional", {
                let optional = PyDict::new(py);
                optional.set_item("prefix", multiline_input(py)?)?;
                for folder in &folders {
                    optional.set_item(folder.to_lowercase(), multiline_input(py)?)?;
                }
                optional.set_item("suffix", multiline_input(py)?)?;
                optional.set_item(
                    "separator",
                    (Separator::labels(), {
                        let separator = PyDict::new(py);
                        separator.set_item("default", Separator::Comma.to_string())?;
                        separator
                    }),
                )?;
                optional.set_item(
                    "remove_duplicates",
                    (NODE_BOOLEAN, {
                        let remove_duplicates = PyDict::new(py);
                        remove_duplicates.set_item("default", false)?;
                        remove_duplicates
                    }),
                )?;
                optional.set_item(
                    "sort",
                    (NODE_BOOLEAN, {
                        let sort = PyDict::new(py);
                        sort.set_item("default", false)?;
                        sort
                    }),
                )?;
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
    ) -> PyResult<(String,)> {
        let result = self.concat(kwargs.as_ref());

        match result {
            Ok(v) => Ok((v,)),
            Err(e) => {
                error!("PromptConcat error, {e}");
                if let Err(e) = self.send_error(py, "PromptConcat".to_string(), e.to_string()) {
                    error!("send error failed, {e}");
                    return Err(PyErr::new::<PyRuntimeError, _>(e.to_string()));
                };
                Err(PyErr::new::<PyRuntimeError, _>(e.to_string()))
            }
        }
    }
}

impl PromptConcat {
    fn concat(&self, kwargs: Option<&Bound<'_, PyDict>>) -> Result<String, Error> {
        let prefix = kwarg::<String>(kwargs, "prefix")?.unwrap_or_default();
        let suffix = kwarg::<String>(kwargs, "suffix")?.unwrap_or_default();

        let mut fields = Vec::new();
        for folder in wildcard_library().concat_folders() {
            if let Some(field) = kwarg::<String>(kwargs, &folder.to_lowercase())? {
                fields.push(field);
            }
        }

        let separator = match kwarg::<String>(kwargs, "separator")? {
            Some(v) => v
                .parse::<Separator>()
                .map_err(|e| Error::ParseEnumString(format!("{v}, {e}")))?,
            None => Separator::default(),
        };
        let options = ConcatOptions {
            separator,
            remove_duplicates: kwarg::<bool>(kwargs, "remove_duplicates")?.unwrap_or_default(),
            sort: kwarg::<bool>(kwargs, "sort")?.unwrap_or_default(),
        };

        let prompt = concat_prompt(&prefix, &fields, &suffix, &options);
        info!("🔀 Prompt Concat output:\n{prompt}");
        Ok(prompt)
    }
}
