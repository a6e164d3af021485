use std::{fs, path::Path};

use color_eyre::{Result, eyre::Context};

use super::{
    Process, ProcessOutput,
    wallet_create::{destination_dir, wallet_created_msg},
};
use crate::{
    cli::WalletImportProcess,
    config::Config,
    errors::AppError,
    format_error,
    service::{EthwService, parse_private_key},
    utils::{Console, prompt_new_password},
};

impl Process for WalletImportProcess {
    async fn execute(
        self,
        config: Config,
        service: EthwService,
        console: &mut impl Console,
    ) -> Result<ProcessOutput> {
        // The key might be provided inline or on a file
        let key_path = Path::new(&self.key);
        let raw_key = if key_path.is_file() {
            tracing::info!("Reading private key from {}", key_path.display());
            fs::read_to_string(key_path)
                .wrap_err_with(|| format!("Couldn't read private key file {}", key_path.display()))?
        } else {
            self.key.clone()
        };

        let key = match parse_private_key(&raw_key) {
            Ok(key) => key,
            Err(err) => return Ok(ProcessOutput::fail().stderr(format_error!(config.theme, "{err}"))),
        };

        let password = prompt_new_password(console, &config.theme)?;
        let destination = destination_dir(self.destination, &service, console, &config.theme)?;

        match service.import_private_key(key, password, destination).await {
            Ok(wallet) => Ok(ProcessOutput::success().stdout(wallet_created_msg(&config.theme, &wallet, "Wallet"))),
            Err(AppError::UserFacing(err)) => Ok(ProcessOutput::fail().stderr(format_error!(config.theme, "{err}"))),
            Err(AppError::Unexpected(report)) => Err(report),
        }
    }
}
