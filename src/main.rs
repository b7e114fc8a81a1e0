use clap::Parser;
use printqa_rs::{
    cli::{self, Cli},
    client::HttpAnalysisClient,
    config::log,
    controller::UploadController,
};
use std::io;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    log::setup(args.verbose);

    let file = cli::read_file(&args.file).await?;
    let mut controller = UploadController::new(HttpAnalysisClient::new(), args.endpoint());

    let ok = cli::run(
        &mut controller,
        file,
        args.json,
        &mut io::stdout(),
        &mut io::stderr(),
    )
    .await?;
    if !ok {
        std::process::exit(1);
    }

    anyhow::Ok(())
}
