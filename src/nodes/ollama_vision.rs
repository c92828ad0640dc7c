//! Ollama 视觉节点
//!
//! 文本与可选图片发送到 Ollama, 返回模型的回答

use log::{error, info};
use pyo3::{
    exceptions::PyRuntimeError,
    pyclass, pyfunction, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyAny, PyErr, PyResult, Python,
};

use crate::{
    ai::{
        format_image_prompt, GenerationOptions, GenerationRequest, Language, OllamaClient,
        TextGenerator,
    },
    config::AiConfig,
    core::{
        category::CATEGORY_AI,
        tensor::image_tensor_to_png_base64,
        types::{NODE_FLOAT, NODE_IMAGE, NODE_INT, NODE_SEED_MAX, NODE_STRING},
        PromptServer,
    },
    error::Error,
};

/// 前端模型下拉框使用的模型列表, 获取失败时为空
#[pyfunction]
#[pyo3(signature = (url=None))]
pub fn ollama_models(py: Python<'_>, url: Option<String>) -> Vec<String> {
    let url = url.unwrap_or_else(|| AiConfig::global().ollama_url.clone());
    py.allow_threads(|| match OllamaClient::new(&url) {
        Ok(client) => client.list_models_or_empty(),
        Err(e) => {
            error!("create ollama client failed, {e}");
            Vec::new()
        }
    })
}

#[pyclass(subclass)]
pub struct OllamaVision {}

impl PromptServer for OllamaVision {}

#[pymethods]
impl OllamaVision {
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
        ("text",)
    }

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_AI;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Ask an Ollama model about a text and an optional image."
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
                    "text",
                    (NODE_STRING, {
                        let text = PyDict::new(py);
                        text.set_item("default", "")?;
                        text.set_item("multiline", true)?;
                        text
                    }),
                )?;
                required.set_item(
                    "server_url",
                    (NODE_STRING, {
                        let server_url = PyDict::new(py);
                        server_url.set_item("default", &config.ollama_url)?;
                        server_url
                    }),
                )?;
                // 由前端按 server_url 刷新
                required.set_item(
                    "model",
                    (NODE_STRING, {
                        let model = PyDict::new(py);
                        model.set_item("default", config.preferred_model())?;
                        model
                    }),
                )?;
                required.set_item(
                    "language",
                    (Language::labels(), {
                        let language = PyDict::new(py);
                        language.set_item("default", Language::Auto.to_string())?;
                        language
                    }),
                )?;
                required.set_item(
                    "temperature",
                    (NODE_FLOAT, {
                        let temperature = PyDict::new(py);
                        temperature.set_item("default", 0.7)?;
                        temperature.set_item("min", 0.0)?;
                        temperature.set_item("max", 1.0)?;
                        temperature.set_item("step", 0.1)?;
                        temperature
                    }),
                )?;
                required.set_item(
                    "max_tokens",
                    (NODE_INT, {
                        let max_tokens = PyDict::new(py);
                        max_tokens.set_item("default", 2048)?;
                        max_tokens.set_item("min", 1)?;
                        max_tokens.set_item("max", 8192)?;
                        max_tokens
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
                optional.set_item("image", (NODE_IMAGE,))?;
                optional
            })?;
            Ok(dict.into())
        })
    }

    #[pyo3(
        name = "execute",
        signature = (text, server_url, model, language, temperature=0.7, max_tokens=2048, seed=0, image=None)
    )]
    #[allow(clippy::too_many_arguments)]
    fn execute<'py>(
        &mut self,
        py: Python<'py>,
        text: String,
        server_url: String,
        model: String,
        language: String,
        temperature: f32,
        max_tokens: u32,
        seed: u64,
        image: Option<Bound<'py, PyAny>>,
    ) -> PyResult<(String,)> {
        let options = GenerationOptions {
            temperature,
            max_tokens,
            seed,
        };
        let result = Self::build_request(&text, &model, &language, image.as_ref(), options)
            .and_then(|request| {
                py.allow_threads(|| {
                    let client = OllamaClient::new(&server_url)?;
                    client.generate(&request)
                })
            });

        match result {
            Ok(v) => {
                info!("[Ollama Vision]:\n{v}");
                Ok((v,))
            }
            Err(e) => {
                error!("OllamaVision error, {e}");
                if let Err(e) = self.send_error(py, "OllamaVision".to_string(), e.to_string()) {
                    error!("send error failed, {e}");
                    return Err(PyErr::new::<PyRuntimeError, _>(e.to_string()));
                };
                Err(PyErr::new::<PyRuntimeError, _>(e.to_string()))
            }
        }
    }
}

impl OllamaVision {
    fn build_request(
        text: &str,
        model: &str,
        language: &str,
        image: Option<&Bound<'_, PyAny>>,
        options: GenerationOptions,
    ) -> Result<GenerationRequest, Error> {
        let language = language
            .parse::<Language>()
            .map_err(|e| Error::ParseEnumString(format!("{language}, {e}")))?;

        let images = match image {
            Some(image) => image_tensor_to_png_base64(image)?,
            None => Vec::new(),
        };

        // 只有图片时使用默认的图片描述提示词
        let prompt = if text.trim().is_empty() && !images.is_empty() {
            format_image_prompt("")
        } else {
            text.to_string()
        };

        Ok(GenerationRequest::new(model, language.apply(&prompt))
            .with_images(images)
            .with_options(options))
    }
}
