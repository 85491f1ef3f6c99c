use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Asks an Ollama-style `generate` endpoint for a short reply. Returns the trimmed response
/// text, which may be empty.
pub async fn generate(cfg: &grant_config::LlmReplyConfig, prompt: &str) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"system": cfg.system_prompt,
		"prompt": prompt,
		"stream": false,
	});
	let res = client.post(url).json(&body).send().await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_generate_response(json)
}

fn parse_generate_response(json: Value) -> Result<String> {
	if let Some(text) = json.get("response").and_then(|v| v.as_str()) {
		return Ok(text.trim().to_string());
	}

	if let Some(text) = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
	{
		return Ok(text.trim().to_string());
	}

	Err(Error::InvalidResponse { message: "Reply response is missing text.".to_string() })
}
