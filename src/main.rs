use clap::Parser;
use color_eyre::Result;
use ethw::{
    app::App,
    cli::Cli,
    config::Config,
    errors, logging,
    service::EthwService,
    utils::TerminalConsole,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Read cli arguments and initialize the configuration
    let args = Cli::parse();
    let config = Config::init(args.config.clone())?;

    // Initialize logging, the log file is only reported on panics when enabled
    let logs = logging::LogSettings::from_config(&config);
    logs.init()?;

    errors::init(logs.enabled().then_some(logs.path.clone()), async move {
        tracing::info!("ethw v{}", env!("CARGO_PKG_VERSION"));
        let service = EthwService::from_config(&config)?;
        let mut app = App::new(TerminalConsole);

        // Check for updates before running anything
        app.check_updates(&config, &service, &args.process).await;

        // Run the app
        let output = app.run(config, service, args.process).await?;

        // Print the output
        if let Some(stdout) = output.stdout_text() {
            println!("{stdout}");
        }
        if let Some(stderr) = output.stderr_text() {
            eprintln!("{stderr}");
        }
        if output.is_failed() {
            tracing::info!("Exiting with failure status code");
            std::process::exit(1);
        }

        tracing::info!("Exiting");
        Ok(())
    })
    .await
}
