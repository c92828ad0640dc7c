//! 自定义词表管理节点

use log::error;
use pyo3::{
    exceptions::PyRuntimeError,
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyErr, PyResult, Python,
};

use crate::{
    config::{plugin_root, Config},
    core::{category::CATEGORY_PROMPTS_LIST, types::NODE_STRING, PromptServer},
    custom_list::{CustomListManager as Manager, ListAction, ListOutcome, ListRequest},
    error::Error,
};

/// 管理目录: {data_path}/{custom_folder}
fn manager() -> Result<Manager, Error> {
    let config = Config::global();
    Manager::new(config.custom_dir(plugin_root()))
}

#[pyclass(subclass)]
pub struct CustomListManager {}

impl PromptServer for CustomListManager {}

#[pymethods]
impl CustomListManager {
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
        ("status", "file_list")
    }

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_PROMPTS_LIST;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Create, edit, view and delete word lists in the custom folder."
    }

    #[classattr]
    #[pyo3(name = "FUNCTION")]
    const FUNCTION: &'static str = "execute";

    #[classmethod]
    #[pyo3(name = "INPUT_TYPES")]
    fn input_types(_cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
        let file_options = manager()
            .map(|v| v.file_options())
            .map_err(|e| PyErr::new::<PyRuntimeError, _>(e.to_string()))?;

        Python::with_gil(|py| {
            let dict = PyDict::new(py);
            dict.set_item("required", {
                let required = PyDict::new(py);
                required.set_item(
                    "action",
                    (ListAction::labels(), {
                        let action = PyDict::new(py);
                        action.set_item("default", ListAction::Create.to_string())?;
                        action
                    }),
                )?;
                required
            })?;
            dict.set_item("optional", {
                let optional = PyDict::new(py);
                optional.set_item(
                    "file_name",
                    (NODE_STRING, {
                        let file_name = PyDict::new(py);
                        file_name.set_item("default", "My_Custom_List")?;
                        file_name.set_item("multiline", false)?;
                        file_name
                    }),
                )?;
                let default_file = file_options.first().cloned().unwrap_or_default();
                optional.set_item(
                    "select_file",
                    (file_options, {
                        let select_file = PyDict::new(py);
                        select_file.set_item("default", default_file)?;
                        select_file
                    }),
                )?;
                optional.set_item(
                    "content",
                    (NODE_STRING, {
                        let content = PyDict::new(py);
                        content.set_item("default", "")?;
                        content.set_item("multiline", true)?;
                        content
                    }),
                )?;
                optional.set_item(
                    "line_text",
                    (NODE_STRING, {
                        let line_text = PyDict::new(py);
                        line_text.set_item("default", "")?;
                        line_text.set_item("multiline", false)?;
                        line_text
                    }),
                )?;
                optional
            })?;
            Ok(dict.into())
        })
    }

    #[pyo3(
        name = "execute",
        signature = (action, file_name=String::new(), select_file=String::new(), content=String::new(), line_text=String::new())
    )]
    fn execute(
        &mut self,
        py: Python<'_>,
        action: String,
        file_name: String,
        select_file: String,
        content: String,
        line_text: String,
    ) -> PyResult<(String, String)> {
        let result = Self::manage(action, file_name, select_file, content, line_text);

        match result {
            Ok(v) => Ok((v.status, v.file_list)),
            Err(e) => {
                error!("CustomListManager error, {e}");
                if let Err(e) =
                    self.send_error(py, "CustomListManager".to_string(), e.to_string())
                {
                    error!("send error failed, {e}");
                    return Err(PyErr::new::<PyRuntimeError, _>(e.to_string()));
                };
                Err(PyErr::new::<PyRuntimeError, _>(e.to_string()))
            }
        }
    }
}

impl CustomListManager {
    /// 操作本身的错误写入状态信息, 只有目录不可用或未知操作时返回错误
    fn manage(
        action: String,
        file_name: String,
        select_file: String,
        content: String,
        line_text: String,
    ) -> Result<ListOutcome, Error> {
        let action = action
            .parse::<ListAction>()
            .map_err(|e| Error::ParseEnumString(format!("{action}, {e}")))?;

        let request = ListRequest {
            action,
            file_name,
            select_file,
            content,
            line_text,
        };
        Ok(manager()?.manage(&request))
    }
}
