use std::path::PathBuf;

use color_eyre::Result;

use super::{Process, ProcessOutput};
use crate::{
    cli::WalletCreateProcess,
    config::{Config, Theme},
    errors::AppError,
    format_error, format_msg,
    model::WalletFile,
    service::EthwService,
    utils::{Console, prompt_destination, prompt_new_password},
};

impl Process for WalletCreateProcess {
    async fn execute(
        self,
        config: Config,
        service: EthwService,
        console: &mut impl Console,
    ) -> Result<ProcessOutput> {
        let password = prompt_new_password(console, &config.theme)?;
        let destination = destination_dir(self.destination, &service, console, &config.theme)?;

        match service.generate_wallet_file(password, destination).await {
            Ok(wallet) => Ok(ProcessOutput::success().stdout(wallet_created_msg(&config.theme, &wallet, "Wallet"))),
            Err(AppError::UserFacing(err)) => Ok(ProcessOutput::fail().stderr(format_error!(config.theme, "{err}"))),
            Err(AppError::Unexpected(report)) => Err(report),
        }
    }
}

/// Resolves the destination directory, prompting for it when not provided
pub(super) fn destination_dir(
    destination: Option<String>,
    service: &EthwService,
    console: &mut impl Console,
    theme: &Theme,
) -> Result<PathBuf> {
    let raw = match destination {
        Some(destination) => destination,
        None => {
            let default = service.keystore_dir().display().to_string();
            prompt_destination(console, &default, theme)?
        }
    };
    Ok(service.resolve_destination(&raw))
}

/// Message displayed once a wallet file has been written
pub(super) fn wallet_created_msg(theme: &Theme, wallet: &WalletFile, subject: &str) -> String {
    format_msg!(
        theme,
        "{subject} file {} successfully created in: {}\nAddress: {}",
        theme.accent.apply(&wallet.file_name),
        theme.comment.apply(wallet.dir.display()),
        theme.accent.apply(&wallet.address)
    )
}
