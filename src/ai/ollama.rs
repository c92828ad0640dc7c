//! Ollama 后端
//!
//! - GET  /api/tags: 模型列表
//! - POST /api/generate: 非流式生成

use std::time::Duration;

use log::{debug, error};
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{
    ai::backend::{GenerationRequest, TextGenerator},
    config::DEFAULT_OLLAMA_URL,
    error::Error,
};

/// 生成超时时间, 视觉模型首次加载较慢
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    images: &'a [String],
    stream: bool,
    options: OllamaOptions,
}

impl<'a> From<&'a GenerationRequest> for OllamaGenerateRequest<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        Self {
            model: &request.model,
            prompt: &request.prompt,
            system: request.system.as_deref(),
            images: &request.images,
            stream: false,
            options: OllamaOptions {
                temperature: request.options.temperature,
                num_predict: request.options.max_tokens,
                seed: (request.options.seed > 0).then_some(request.options.seed),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaModelTag {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModelTag>,
}

/// 请求体
fn generate_body(request: &GenerationRequest) -> Result<serde_json::Value, Error> {
    Ok(serde_json::to_value(OllamaGenerateRequest::from(request))?)
}

fn parse_generate_response(body: &str) -> Result<String, Error> {
    let response: OllamaGenerateResponse = serde_json::from_str(body)?;
    if let Some(e) = response.error {
        return Err(Error::Backend(e));
    }
    Ok(response.response.trim().to_string())
}

fn parse_tags_response(body: &str) -> Result<Vec<String>, Error> {
    let response: OllamaTagsResponse = serde_json::from_str(body)?;
    Ok(response.models.into_iter().map(|v| v.name).collect())
}

/// 服务地址, 为空时使用默认地址
pub fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.is_empty() {
        return DEFAULT_OLLAMA_URL.to_string();
    }
    url.to_string()
}

pub struct OllamaClient {
    http_client: HttpClient,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http_client,
            base_url: normalize_base_url(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 已安装的模型
    pub fn list_models(&self) -> Result<Vec<String>, Error> {
        let url = format!("{}/api/tags", self.base_url);
        let body = self
            .http_client
            .get(&url)
            .send()?
            .error_for_status()?
            .text()?;
        parse_tags_response(&body)
    }

    /// 获取失败时返回空列表
    pub fn list_models_or_empty(&self) -> Vec<String> {
        match self.list_models() {
            Ok(models) => models,
            Err(e) => {
                error!("fetch ollama models failed, url: {}, {e}", self.base_url);
                Vec::new()
            }
        }
    }
}

impl TextGenerator for OllamaClient {
    fn generate(&self, request: &GenerationRequest) -> Result<String, Error> {
        if request.model.trim().is_empty() {
            return Err(Error::InvalidParameter("model is empty".to_string()));
        }

        let url = format!("{}/api/generate", self.base_url);
        debug!(
            "ollama generate, model: {}, images: {}",
            request.model,
            request.images.len()
        );

        let response = self
            .http_client
            .post(&url)
            .json(&generate_body(request)?)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            // 错误信息在响应体的 error 字段中
            let message = serde_json::from_str::<OllamaGenerateResponse>(&body)
                .ok()
                .and_then(|v| v.error)
                .unwrap_or(body);
            return Err(Error::Backend(format!("{status}, {message}")));
        }
        parse_generate_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ai::backend::GenerationOptions;

    #[test]
    fn test_generate_body() -> anyhow::Result<()> {
        let request = GenerationRequest::new("llava", "describe")
            .with_images(vec!["aGVsbG8=".to_string()])
            .with_options(GenerationOptions {
                temperature: 0.5,
                max_tokens: 256,
                seed: 42,
            });

        assert_eq!(
            generate_body(&request)?,
            json!({
                "model": "llava",
                "prompt": "describe",
                "images": ["aGVsbG8="],
                "stream": false,
                "options": {"temperature": 0.5, "num_predict": 256, "seed": 42},
            })
        );
        Ok(())
    }

    #[test]
    fn test_generate_body_optional_fields() -> anyhow::Result<()> {
        let request = GenerationRequest::new("llama3.2", "hi").with_system("be brief");
        let body = generate_body(&request)?;

        assert_eq!(body["system"], "be brief");
        assert!(body.get("images").is_none());
        assert!(body["options"].get("seed").is_none());
        Ok(())
    }

    #[test]
    fn test_parse_generate_response() -> anyhow::Result<()> {
        let text = parse_generate_response(r#"{"model":"llava","response":"  a red fox \n","done":true}"#)?;
        assert_eq!(text, "a red fox");

        let result = parse_generate_response(r#"{"error":"model 'x' not found"}"#);
        assert!(matches!(result, Err(Error::Backend(_))));
        Ok(())
    }

    #[test]
    fn test_parse_tags_response() -> anyhow::Result<()> {
        let body = r#"{"models":[{"name":"llava:latest","size":1},{"name":"llama3.2:3b"}]}"#;
        assert_eq!(parse_tags_response(body)?, vec!["llava:latest", "llama3.2:3b"]);
        assert!(parse_tags_response("{}")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url(" http://host:11434/ "), "http://host:11434");
        assert_eq!(normalize_base_url(""), DEFAULT_OLLAMA_URL);
    }

    #[test]
    fn test_empty_model() -> anyhow::Result<()> {
        let client = OllamaClient::new("")?;
        assert_eq!(client.base_url(), DEFAULT_OLLAMA_URL);
        let result = client.generate(&GenerationRequest::new(" ", "hi"));
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
        Ok(())
    }
}
