use std::{io, path::PathBuf};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Cannot read {}: {source}", path.display())]
	ReadConfig { path: PathBuf, source: io::Error },
	#[error("Invalid TOML in {}: {source}", path.display())]
	ParseConfig { path: PathBuf, source: toml::de::Error },
	#[error("{message}")]
	Validation { message: String },
}
