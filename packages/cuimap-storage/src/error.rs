use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error(transparent)]
	Csv(#[from] csv::Error),
	#[error("Failed to read {path:?}.")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Not found: {0}")]
	NotFound(String),
}
