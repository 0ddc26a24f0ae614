use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = cuimap_tool::Args::parse();

	cuimap_tool::run(args).await
}
