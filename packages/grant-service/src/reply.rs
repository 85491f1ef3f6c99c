//! Chat replies built from search results.

use serde::Serialize;
use time::UtcOffset;

use crate::{GrantService, search::GrantResult};

pub const NOTHING_FOUND_REPLY: &str =
	"Prepáčte, nenašiel som žiadne výzvy. Skúste upresniť vaše kritériá.";
pub const UNAVAILABLE_REPLY: &str =
	"Momentálne mám problém s pripojením. Skúste prosím neskôr, alebo kontaktujte podporu.";
pub const REFINEMENT_OPTIONS: [&str; 3] =
	["Zobraziť všetky výzvy", "Filtrovať podľa deadline", "Filtrovať podľa alokácie"];

const SUMMARY_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
	pub reply: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub refinement_options: Option<Vec<String>>,
}

/// Slovak summary of the first three grants. Refinement options are offered when more exist.
pub fn summarize_grants(grants: &[GrantResult]) -> ChatReply {
	let lines: Vec<String> = grants
		.iter()
		.take(SUMMARY_LEN)
		.enumerate()
		.map(|(idx, grant)| {
			let deadline = match grant.deadline_at {
				Some(deadline) => format!("do {}", deadline.to_offset(UtcOffset::UTC).date()),
				None => "deadline neuvedený".to_string(),
			};

			format!(
				"{}. {} ({}) - {deadline}",
				idx + 1,
				grant.title,
				grant.provider.as_deref().unwrap_or("neznámy")
			)
		})
		.collect();
	let reply = format!(
		"Našiel som {} vhodných výziev:\n\n{}\n\nChcete viac detailov o niektorej z nich?",
		grants.len(),
		lines.join("\n")
	);
	let refinement_options = (grants.len() > SUMMARY_LEN)
		.then(|| REFINEMENT_OPTIONS.iter().map(|option| option.to_string()).collect());

	ChatReply { reply, refinement_options }
}

impl GrantService {
	/// Answers `message` given the grants found for it. Without grants the reply model is asked
	/// for clarifying questions.
	pub async fn compose_reply(&self, message: &str, grants: &[GrantResult]) -> ChatReply {
		if !grants.is_empty() {
			return summarize_grants(grants);
		}

		let cfg = &self.cfg.providers.llm_reply;
		let generated = tokio::time::timeout(
			std::time::Duration::from_millis(cfg.timeout_ms),
			self.backends.reply.generate(cfg, message),
		)
		.await;
		let reply = match generated {
			Ok(Ok(text)) if !text.trim().is_empty() => text,
			Ok(Ok(_)) => NOTHING_FOUND_REPLY.to_string(),
			Ok(Err(err)) => {
				tracing::warn!(error = %err, "Reply provider failed.");

				UNAVAILABLE_REPLY.to_string()
			},
			Err(_) => {
				tracing::warn!(timeout_ms = cfg.timeout_ms, "Reply provider timed out.");

				UNAVAILABLE_REPLY.to_string()
			},
		};

		ChatReply { reply, refinement_options: None }
	}
}
