use std::fs;

use color_eyre::Result;

use super::{
    Process, ProcessOutput,
    wallet_create::{destination_dir, wallet_created_msg},
};
use crate::{
    cli::WalletUpdateProcess,
    config::Config,
    errors::{AppError, UserFacingError},
    format_error, format_msg,
    service::EthwService,
    utils::{Console, prompt_confirmation, prompt_new_password},
};

impl Process for WalletUpdateProcess {
    async fn execute(
        self,
        config: Config,
        service: EthwService,
        console: &mut impl Console,
    ) -> Result<ProcessOutput> {
        if !self.file.is_file() {
            let err = UserFacingError::WalletFileNotFound(self.file.display().to_string());
            return Ok(ProcessOutput::fail().stderr(format_error!(config.theme, "{err}")));
        }

        let password = console.read_password("Please enter your existing wallet file password: ")?;
        let key = match service.load_wallet_file(&self.file, password).await {
            Ok(key) => key,
            Err(AppError::UserFacing(err)) => {
                return Ok(ProcessOutput::fail().stderr(format_error!(config.theme, "{err}")));
            }
            Err(AppError::Unexpected(report)) => return Err(report),
        };

        let new_password = prompt_new_password(console, &config.theme)?;
        let destination = destination_dir(self.destination, &service, console, &config.theme)?;

        let wallet = match service.import_private_key(key, new_password, destination).await {
            Ok(wallet) => wallet,
            Err(AppError::UserFacing(err)) => {
                return Ok(ProcessOutput::fail().stderr(format_error!(config.theme, "{err}")));
            }
            Err(AppError::Unexpected(report)) => return Err(report),
        };
        let mut stdout = wallet_created_msg(&config.theme, &wallet, "New wallet");

        if !prompt_confirmation(console, "Would you like to delete your existing wallet file")? {
            return Ok(ProcessOutput::success().stdout(stdout));
        }

        tracing::info!("Deleting previous wallet file {}", self.file.display());
        if let Err(err) = fs::remove_file(&self.file) {
            tracing::warn!("Couldn't delete {}: {err:?}", self.file.display());
            return Ok(ProcessOutput::fail().stdout(stdout).stderr(format_error!(
                config.theme,
                "Unable to delete wallet file {}: {err}",
                self.file.display()
            )));
        }
        stdout.push('\n');
        stdout.push_str(&format_msg!(
            config.theme,
            "Deleted previous wallet file: {}",
            config.theme.comment.apply(self.file.display())
        ));
        Ok(ProcessOutput::success().stdout(stdout))
    }
}
