use color_eyre::Result;
use tracing::instrument;

use crate::{
    cli::{CliProcess, WalletProcess},
    config::Config,
    process::{Process, ProcessOutput},
    service::{EthwService, UpdateGate},
    utils::Console,
};

/// The main application struct, owning the console processes interact with
pub struct App<C> {
    console: C,
}

impl<C: Console> App<C> {
    /// Creates a new instance of the application
    pub fn new(console: C) -> Self {
        Self { console }
    }

    /// Notifies the user when a new version is available, before running the given process.
    ///
    /// The check is skipped when disabled on the config or when the process is the explicit `update` one, which reports
    /// its own result. Returns whether the user was prompted.
    #[instrument(skip_all)]
    pub async fn check_updates(&mut self, config: &Config, service: &EthwService, process: &CliProcess) -> bool {
        if !config.check_updates {
            tracing::debug!("Update check disabled on the config");
            return false;
        }
        if matches!(process, CliProcess::Update(_)) {
            return false;
        }
        let gate = UpdateGate::new(service.releases().clone(), config.update.clone(), config.theme.clone());
        gate.prompt_if_update_available(&mut self.console).await
    }

    /// Runs the process matching the parsed CLI subcommand.
    ///
    /// It returns the final [ProcessOutput] when the process finishes.
    #[instrument(skip_all)]
    pub async fn run(mut self, config: Config, service: EthwService, process: CliProcess) -> Result<ProcessOutput> {
        match process {
            CliProcess::Wallet(WalletProcess::Create(wallet_create)) => {
                tracing::info!("Running 'wallet create' process");
                tracing::debug!("Options: {:?}", wallet_create);
                self.execute(wallet_create, config, service).await
            }
            CliProcess::Wallet(WalletProcess::Update(wallet_update)) => {
                tracing::info!("Running 'wallet update' process");
                tracing::debug!("Options: {:?}", wallet_update);
                self.execute(wallet_update, config, service).await
            }
            CliProcess::Wallet(WalletProcess::Fromkey(wallet_import)) => {
                tracing::info!("Running 'wallet fromkey' process");
                // The options contain the private key, they must not be logged
                self.execute(wallet_import, config, service).await
            }
            CliProcess::Update(update) => {
                tracing::info!("Running 'update' process");
                tracing::debug!("Options: {:?}", update);
                self.execute(update, config, service).await
            }
        }
    }

    async fn execute(&mut self, process: impl Process, config: Config, service: EthwService) -> Result<ProcessOutput> {
        process.execute(config, service, &mut self.console).await
    }
}
