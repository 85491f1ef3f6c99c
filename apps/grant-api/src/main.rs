use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = grant_api::Args::parse();

	grant_api::run(args).await
}
