use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = cuimap_api::Args::parse();

	cuimap_api::run(args).await
}
