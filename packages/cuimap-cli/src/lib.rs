use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};
use tracing_subscriber::EnvFilter;

pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	"-",
	env!("VERGEN_GIT_SHA"),
	"-",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

const FALLBACK_LOG_FILTER: &str = "info";

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.literal(AnsiColor::Yellow.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

/// Installs the global fmt subscriber. `log_level` is an `EnvFilter` directive; an invalid one
/// falls back to `info`.
pub fn init_tracing(log_level: &str) -> color_eyre::Result<()> {
	let filter = log_filter(log_level);

	tracing_subscriber::fmt().with_env_filter(filter).try_init().map_err(|err| {
		color_eyre::eyre::eyre!("Failed to install tracing subscriber: {err}")
	})?;

	Ok(())
}

fn log_filter(log_level: &str) -> EnvFilter {
	EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LOG_FILTER))
}
