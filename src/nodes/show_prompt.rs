//! 显示提示词节点
//!
//! 将提示词写回工作流中本节点的控件值, 保存图片时元数据包含显示的内容

use log::{error, warn};
use pyo3::{
    exceptions::PyRuntimeError,
    pyclass, pymethods,
    types::{PyAnyMethods, PyDict, PyDictMethods, PyList, PyListMethods, PyType},
    Bound, Py, PyAny, PyErr, PyResult, Python,
};
use pythonize::{depythonize, pythonize};
use serde_json::Value;

use crate::{
    core::{category::CATEGORY_WILDPROMPTOR, types::NODE_STRING, PromptServer},
    error::Error,
    text::apply_widget_values,
};

#[pyclass(subclass)]
pub struct ShowPrompt {}

impl PromptServer for ShowPrompt {}

#[pymethods]
impl ShowPrompt {
    #[new]
    fn new() -> Self {
        Self {}
    }

    #[classattr]
    #[pyo3(name = "INPUT_IS_LIST")]
    fn input_is_list() -> bool {
        true
    }

    #[classattr]
    #[pyo3(name = "RETURN_TYPES")]
    fn return_types() -> (&'static str,) {
        (NODE_STRING,)
    }

    #[classattr]
    #[pyo3(name = "OUTPUT_IS_LIST")]
    fn output_is_list() -> (bool,) {
        (true,)
    }

    #[classattr]
    #[pyo3(name = "OUTPUT_NODE")]
    fn output_node() -> bool {
        true
    }

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_WILDPROMPTOR;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Show prompts on the node and keep them in the saved workflow."
    }

    #[classattr]
    #[pyo3(name = "FUNCTION")]
    const FUNCTION: &'static str = "execute";

    #[classmethod]
    #[pyo3(name = "INPUT_TYPES")]
    fn input_types(_cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
        Python::with_gil(|py| {
            let dict = PyDict::new(py);
            dict.set_item("required", {
                let required = PyDict::new(py);
                required.set_item(
                    "prompt",
                    (NODE_STRING, {
                        let prompt = PyDict::new(py);
                        prompt.set_item("forceInput", true)?;
                        prompt
                    }),
                )?;
                required
            })?;
            dict.set_item("hidden", {
                let hidden = PyDict::new(py);
                hidden.set_item("node_id", "UNIQUE_ID")?;
                hidden.set_item("pnginfo", "EXTRA_PNGINFO")?;
                hidden
            })?;
            Ok(dict.into())
        })
    }

    #[pyo3(name = "execute", signature = (prompt, node_id=None, pnginfo=None))]
    fn execute<'py>(
        &mut self,
        py: Python<'py>,
        prompt: Vec<String>,
        node_id: Option<Vec<String>>,
        pnginfo: Option<Bound<'py, PyList>>,
    ) -> PyResult<Bound<'py, PyDict>> {
        if let (Some(node_id), Some(pnginfo)) = (node_id.as_ref(), pnginfo.as_ref()) {
            if let Some(node_id) = node_id.first() {
                // 元数据更新失败不影响显示
                if let Err(e) = Self::update_workflow(py, node_id, pnginfo, &prompt) {
                    warn!("update workflow widgets failed, {e}");
                }
            }
        }

        let result = Self::output(py, prompt);
        match result {
            Ok(v) => Ok(v),
            Err(e) => {
                error!("ShowPrompt error, {e}");
                if let Err(e) = self.send_error(py, "ShowPrompt".to_string(), e.to_string()) {
                    error!("send error failed, {e}");
                    return Err(PyErr::new::<PyRuntimeError, _>(e.to_string()));
                };
                Err(PyErr::new::<PyRuntimeError, _>(e.to_string()))
            }
        }
    }
}

impl ShowPrompt {
    /// {"ui": {"prompt": prompt}, "result": (prompt,)}
    fn output(py: Python<'_>, prompt: Vec<String>) -> Result<Bound<'_, PyDict>, Error> {
        let ui = PyDict::new(py);
        ui.set_item("prompt", prompt.clone())?;

        let output = PyDict::new(py);
        output.set_item("ui", ui)?;
        output.set_item("result", (prompt,))?;
        Ok(output)
    }

    /// 更新 pnginfo[0]["workflow"] 中本节点的控件值
    fn update_workflow(
        py: Python<'_>,
        node_id: &str,
        pnginfo: &Bound<'_, PyList>,
        prompt: &[String],
    ) -> Result<(), Error> {
        let extra = match pnginfo.iter().next() {
            Some(v) => v,
            None => return Ok(()),
        };
        let extra = match extra.downcast::<PyDict>() {
            Ok(v) => v.clone(),
            Err(_) => return Ok(()),
        };
        let workflow: Bound<'_, PyAny> = match extra.get_item("workflow")? {
            Some(v) if !v.is_none() => v,
            _ => return Ok(()),
        };

        let mut workflow = depythonize::<Value>(&workflow)?;
        if apply_widget_values(&mut workflow, node_id, prompt) {
            extra.set_item("workflow", pythonize(py, &workflow)?)?;
        }
        Ok(())
    }
}
