use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use grant_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with(section: &[&str], key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let mut table = root.as_table_mut().expect("Template config must be a table.");

	for name in section {
		table = table
			.get_mut(*name)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{name}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("grant_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> grant_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = grant_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_validation(payload: String, needle: &str) {
	let err = load_payload(payload).expect_err("Expected validation error.");
	let message = err.to_string();

	assert!(matches!(err, Error::Validation { .. }), "Unexpected error kind: {err:?}");
	assert!(message.contains(needle), "Unexpected error message: {message}");
}

#[test]
fn sample_config_loads_and_normalizes_statuses() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string()).expect("Sample must load.");

	assert_eq!(cfg.search.open_statuses[0], "open");
	assert_eq!(cfg.search.match_count, 12);
	assert_eq!(cfg.search.fallback.max_tokens, 2);
	assert_eq!(cfg.service.cors_origins.len(), 3);
	assert!(cfg.storage.qdrant.api_key.is_none());
	assert!(cfg.missing_credentials().is_empty());
}

#[test]
fn fallback_and_timeouts_default_when_omitted() {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let search = root
		.get_mut("search")
		.and_then(Value::as_table_mut)
		.expect("Template config must include [search].");

	search.remove("fallback");
	search.remove("timeouts");
	search.remove("open_statuses");

	let cfg: Config =
		toml::from_str(&toml::to_string(&root).expect("Failed to render config."))
			.expect("Failed to parse config.");

	assert_eq!(cfg.search.fallback.max_tokens, 2);
	assert_eq!(cfg.search.fallback.limit, 10);
	assert_eq!(cfg.search.timeouts.embedding_ms, 10_000);
	assert!(cfg.search.open_statuses.iter().any(|status| status == "open"));
	grant_config::validate(&cfg).expect("Defaults must validate.");
}

#[test]
fn dimensions_must_match_vector_dim() {
	expect_validation(
		sample_toml_with(&["storage", "qdrant"], "vector_dim", Value::Integer(768)),
		"providers.embedding.dimensions must match storage.qdrant.vector_dim.",
	);
}

#[test]
fn embedding_timeout_is_bounded() {
	expect_validation(
		sample_toml_with(&["providers", "embedding"], "timeout_ms", Value::Integer(15_000)),
		"providers.embedding.timeout_ms must be in the range 1-10000.",
	);
}

#[test]
fn call_timeouts_are_bounded() {
	expect_validation(
		sample_toml_with(&["search", "timeouts"], "retrieval_ms", Value::Integer(60_000)),
		"search.timeouts.retrieval_ms must be in the range 8000-20000.",
	);
}

#[test]
fn match_threshold_must_be_a_ratio() {
	expect_validation(
		sample_toml_with(&["search"], "match_threshold", Value::Float(1.5)),
		"search.match_threshold must be in the range 0.0-1.0.",
	);
}

#[test]
fn page_size_must_be_positive() {
	expect_validation(
		sample_toml_with(&["search"], "page_size", Value::Integer(0)),
		"search.page_size must be greater than zero.",
	);
}

#[test]
fn page_size_is_capped_at_ten() {
	expect_validation(
		sample_toml_with(&["search"], "page_size", Value::Integer(11)),
		"search.page_size must be in the range 1-10.",
	);
}

#[test]
fn cache_ttl_must_be_positive() {
	expect_validation(
		sample_toml_with(&["search", "cache"], "ttl_secs", Value::Integer(0)),
		"search.cache.ttl_secs must be greater than zero.",
	);
}

#[test]
fn open_statuses_must_not_be_blank() {
	expect_validation(
		sample_toml_with(
			&["search"],
			"open_statuses",
			Value::Array(vec![Value::String("  ".to_string())]),
		),
		"search.open_statuses must be non-empty.",
	);
}

#[test]
fn blank_credentials_load_but_are_reported() {
	let payload =
		sample_toml_with(&["providers", "embedding"], "api_key", Value::String(String::new()));
	let cfg = load_payload(payload).expect("Blank credentials must not fail loading.");

	assert_eq!(cfg.missing_credentials(), vec!["providers.embedding.api_key"]);
}

#[test]
fn missing_file_is_a_read_error() {
	let err = grant_config::load(&env::temp_dir().join("grant_config_missing_file.toml"))
		.expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}
