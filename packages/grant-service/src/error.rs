pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Configuration error: {message}")]
	Configuration { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Retrieval error: {message}")]
	Retrieval { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Fallback error: {message}")]
	Fallback { message: String },
}
impl From<grant_providers::Error> for Error {
	fn from(err: grant_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
