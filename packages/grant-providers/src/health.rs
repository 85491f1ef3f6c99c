use std::time::Duration;

use reqwest::Client;

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Whether the LLM host answers its model listing with a success status.
pub async fn probe_llm(cfg: &grant_config::LlmReplyConfig) -> bool {
	let Ok(client) = Client::builder().timeout(PROBE_TIMEOUT).build() else {
		return false;
	};
	let url = format!("{}/api/tags", cfg.api_base.trim_end_matches('/'));

	client.get(url).send().await.map(|res| res.status().is_success()).unwrap_or(false)
}
