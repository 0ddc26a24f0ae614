// crates.io
use clap::Parser;
// self
use cuimap_eval::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Args::parse();

	cuimap_eval::run(args).await
}
