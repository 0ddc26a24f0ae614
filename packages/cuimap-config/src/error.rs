use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Cannot read cuimap config at {}.", path.display())]
	Read { path: PathBuf, source: std::io::Error },
	#[error("Cannot parse cuimap config: {source}")]
	Parse { source: toml::de::Error },
	#[error("Cannot parse cuimap config at {}: {source}", path.display())]
	ParseFile { path: PathBuf, source: toml::de::Error },
	#[error("Invalid cuimap config: {message}")]
	Invalid { message: String },
}
