use std::{panic, path::PathBuf};

use color_eyre::{Report, Section, config::HookBuilder};

/// Initializes error and panics handling, then drives the given future to completion
pub async fn init<F>(log_path: Option<PathBuf>, fut: F) -> color_eyre::Result<()>
where
    F: Future<Output = color_eyre::Result<()>>,
{
    tracing::trace!("Initializing error handlers");
    let panic_section = if let Some(log_path) = log_path {
        format!(
            "This is a bug. Consider reporting it at {}\nLogs can be found at {}",
            env!("CARGO_PKG_REPOSITORY"),
            log_path.display()
        )
    } else {
        format!(
            "This is a bug. Consider reporting it at {}\nLogs were not generated, consider enabling them on the \
             config or running with ETHW_LOG=debug.",
            env!("CARGO_PKG_REPOSITORY")
        )
    };
    let (panic_hook, eyre_hook) = HookBuilder::default()
        .panic_section(panic_section.clone())
        .display_env_section(false)
        .display_location_section(true)
        .capture_span_trace_by_default(true)
        .into_hooks();

    // Install both hooks, there's no raw terminal mode to restore so panics can be reported right away
    eyre_hook.install()?;
    panic::set_hook(Box::new(move |panic_info| {
        let panic_report = panic_hook.panic_report(panic_info).to_string();
        tracing::error!("Panic: {}", strip_ansi_escapes::strip_str(&panic_report));
        eprintln!("{panic_report}");
    }));

    fut.await
        .with_section(move || panic_section)
        .inspect_err(|err| tracing::error!("Error: {}", strip_ansi_escapes::strip_str(format!("{err:?}"))))
}

/// Result type used across the services
pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Top-level error of the service layer
#[derive(Debug)]
pub enum AppError {
    /// An error that must be displayed to the user, it's not a bug
    UserFacing(UserFacingError),
    /// An unexpected error occurred
    Unexpected(Report),
}

/// Errors caused by the user input or the environment, with a message meant to be displayed
#[derive(Debug, PartialEq, Eq, strum::Display)]
pub enum UserFacingError {
    /// The release endpoint couldn't be reached or returned an error status
    #[strum(to_string = "Couldn't check the latest release: {0}")]
    ReleaseRequestFailed(String),
    /// The release endpoint returned a body that doesn't match the expected format
    #[strum(to_string = "Couldn't parse the latest release response: {0}")]
    ReleaseInvalidResponse(String),
    /// The latest release tag is not a version
    #[strum(to_string = "The latest release tag is not a valid version: {0}")]
    ReleaseInvalidTag(String),
    /// The provided private key is not a 32 bytes hex value or not a valid secp256k1 scalar
    #[strum(to_string = "Invalid private key specified, must be a 64 digit hex value")]
    InvalidPrivateKey,
    /// The wallet file doesn't exist
    #[strum(to_string = "Wallet file not found: {0}")]
    WalletFileNotFound(String),
    /// The wallet file couldn't be decrypted with the provided password
    #[strum(to_string = "Unable to load wallet file {0}, the password is invalid")]
    WalletInvalidPassword(String),
    /// The wallet file couldn't be read or is not a valid keystore
    #[strum(to_string = "Unable to load wallet file {0}: {1}")]
    WalletLoadFailed(String, String),
    /// The destination exists but it's not a directory
    #[strum(to_string = "Destination is not a directory: {0}")]
    DestinationNotADirectory(String),
    /// The destination directory couldn't be created
    #[strum(to_string = "Unable to create destination directory {0}: {1}")]
    DestinationNotAccessible(String, String),
}

impl From<UserFacingError> for AppError {
    fn from(err: UserFacingError) -> Self {
        Self::UserFacing(err)
    }
}

impl<T> From<T> for AppError
where
    T: Into<Report>,
{
    fn from(err: T) -> Self {
        Self::Unexpected(err.into())
    }
}
