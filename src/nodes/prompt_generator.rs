//! 关键词生成提示词节点

use log::{error, info};
use pyo3::{
    exceptions::PyRuntimeError,
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyErr, PyResult, Python,
};

use crate::{
    ai::{format_prompt, GenerationOptions, GenerationRequest, OllamaClient, TextGenerator},
    config::AiConfig,
    core::{
        category::CATEGORY_AI,
        types::{NODE_FLOAT, NODE_INT, NODE_SEED_MAX, NODE_STRING},
        PromptServer,
    },
    error::Error,
    text::clean_prompt,
};

#[pyclass(subclass)]
pub struct PromptGenerator {}

impl PromptServer for PromptGenerator {}

#[pymethods]
impl PromptGenerator {
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
    const CATEGORY: &'static str = CATEGORY_AI;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Expand keywords into an image description with a language model."
    }

    #[classattr]
    #[pyo3(name = "FUNCTION")]
    const FUNCTION: &'static str = "execute";

    #[classmethod]
    #[pyo3(name = "INPUT_TYPES")]
    fn input_types(_cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
        let config = AiConfig::global();

        Python::with_gil(|py| {
            let dict = PyDict::new(py);
            dict.set_item("required", {
                let required = PyDict::new(py);
                required.set_item(
                    "keywords",
                    (NODE_STRING, {
                        let keywords = PyDict::new(py);
                        keywords.set_item("multiline", true)?;
                        keywords
                    }),
                )?;
                required.set_item(
                    "model",
                    (config.model_choices(), {
                        let model = PyDict::new(py);
                        model.set_item("default", config.preferred_model())?;
                        model
                    }),
                )?;
                required.set_item(
                    "max_length",
                    (NODE_INT, {
                        let max_length = PyDict::new(py);
                        max_length.set_item("default", 512)?;
                        max_length.set_item("min", 50)?;
                        max_length.set_item("max", 4096)?;
                        max_length.set_item("step", 1)?;
                        max_length
                    }),
                )?;
                required.set_item(
                    "temperature",
                    (NODE_FLOAT, {
                        let temperature = PyDict::new(py);
                        temperature.set_item("default", 0.7)?;
                        temperature.set_item("min", 0.1)?;
                        temperature.set_item("max", 2.0)?;
                        temperature.set_item("step", 0.1)?;
                        temperature
                    }),
                )?;
                required.set_item(
                    "seed",
                    (NODE_INT, {
                        let seed = PyDict::new(py);
                        seed.set_item("default", 0)?;
                        seed.set_item("min", 0)?;
                        seed.set_item("max", NODE_SEED_MAX)?;
                        seed
                    }),
                )?;
                required
            })?;
            dict.set_item("optional", {
                let optional = PyDict::new(py);
                optional.set_item(
                    "server_url",
                    (NODE_STRING, {
                        let server_url = PyDict::new(py);
                        server_url.set_item("default", &config.ollama_url)?;
                        server_url
                    }),
                )?;
                optional
            })?;
            Ok(dict.into())
        })
    }

    #[pyo3(
        name = "execute",
        signature = (keywords, model, max_length=512, temperature=0.7, seed=0, server_url=None)
    )]
    #[allow(clippy::too_many_arguments)]
    fn execute(
        &mut self,
        py: Python<'_>,
        keywords: String,
        model: String,
        max_length: u32,
        temperature: f32,
        seed: u64,
        server_url: Option<String>,
    ) -> PyResult<(String,)> {
        let server_url = server_url.unwrap_or_else(|| AiConfig::global().ollama_url.clone());
        let options = GenerationOptions {
            temperature,
            max_tokens: max_length,
            seed,
        };
        // 请求期间释放 GIL
        let result = py.allow_threads(|| Self::generate(&server_url, &model, &keywords, options));

        match result {
            Ok(v) => Ok((v,)),
            Err(e) => {
                error!("PromptGenerator error, {e}");
                if let Err(e) = self.send_error(py, "PromptGenerator".to_string(), e.to_string()) {
                    error!("send error failed, {e}");
                    return Err(PyErr::new::<PyRuntimeError, _>(e.to_string()));
                };
                Err(PyErr::new::<PyRuntimeError, _>(e.to_string()))
            }
        }
    }
}

impl PromptGenerator {
    fn generate(
        server_url: &str,
        model: &str,
        keywords: &str,
        options: GenerationOptions,
    ) -> Result<String, Error> {
        let client = OllamaClient::new(server_url)?;
        let request = GenerationRequest::new(model, format_prompt(keywords)).with_options(options);
        let prompt = clean_prompt(&client.generate(&request)?);
        info!("[WildPromptor AI prompt]:\n{prompt}");
        Ok(prompt)
    }
}
