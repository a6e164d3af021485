use color_eyre::Result;

use crate::{config::Config, service::EthwService, utils::Console};

mod update;
mod wallet_create;
mod wallet_import;
mod wallet_update;

/// Represents the final outcome of a process
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    failed: bool,
    stdout: Option<String>,
    stderr: Option<String>,
}

impl ProcessOutput {
    /// A successful output
    pub fn success() -> Self {
        Self::default()
    }

    /// A failed output, the process must exit with a non-zero status
    pub fn fail() -> Self {
        Self {
            failed: true,
            ..Default::default()
        }
    }

    /// Sets the text to be written to stdout
    pub fn stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = Some(stdout.into());
        self
    }

    /// Sets the text to be written to stderr
    pub fn stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = Some(stderr.into());
        self
    }

    /// Whether the process failed
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Text to be written to stdout, if any
    pub fn stdout_text(&self) -> Option<&str> {
        self.stdout.as_deref()
    }

    /// Text to be written to stderr, if any
    pub fn stderr_text(&self) -> Option<&str> {
        self.stderr.as_deref()
    }
}

/// Trait for non-interactive processes, interacting with the user only through the [Console]
#[allow(async_fn_in_trait)]
pub trait Process {
    /// Executes the process
    async fn execute(
        self,
        config: Config,
        service: EthwService,
        console: &mut impl Console,
    ) -> Result<ProcessOutput>;
}
