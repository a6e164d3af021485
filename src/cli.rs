use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Command-line tool to manage Ethereum wallet files
///
/// Wallet files are encrypted with a password following the Web3 Secret Storage format, compatible with most
/// Ethereum clients.
#[derive(Parser, Debug)]
#[command(author, version, verbatim_doc_comment, infer_subcommands = true, subcommand_required = true)]
pub struct Cli {
    /// Path of the configuration file (defaults to `config.toml` on the user config dir)
    #[arg(long, global = true, env = "ETHW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Command to be executed
    #[command(name = "command", subcommand)]
    pub process: CliProcess,
}

#[derive(Subcommand, Debug)]
pub enum CliProcess {
    /// Creates and manages wallet files
    #[command(subcommand)]
    Wallet(WalletProcess),

    /// Checks whether a new version is available and shows update instructions
    Update(UpdateProcess),
}

#[derive(Subcommand, Debug)]
pub enum WalletProcess {
    /// Creates a new wallet file with a random key pair
    Create(WalletCreateProcess),

    /// Re-encrypts an existing wallet file with a new password
    Update(WalletUpdateProcess),

    /// Creates a new wallet file from an existing private key
    #[command(name = "fromkey")]
    Fromkey(WalletImportProcess),
}

/// Creates a new wallet file
#[derive(Args, Debug)]
pub struct WalletCreateProcess {
    /// Directory where the wallet file is written, prompted when missing
    #[arg(short, long)]
    pub destination: Option<String>,
}

/// Re-encrypts an existing wallet file
#[derive(Args, Debug)]
pub struct WalletUpdateProcess {
    /// Path of the existing wallet file
    pub file: PathBuf,

    /// Directory where the new wallet file is written, prompted when missing
    #[arg(short, long)]
    pub destination: Option<String>,
}

/// Creates a wallet file from a private key
#[derive(Args, Debug)]
pub struct WalletImportProcess {
    /// Hex-encoded private key, or the path of a file containing it
    pub key: String,

    /// Directory where the wallet file is written, prompted when missing
    #[arg(short, long)]
    pub destination: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateProcess {}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_cli_asserts() {
        Cli::command().debug_assert()
    }

    #[test]
    fn test_parse_wallet_commands() {
        let cli = Cli::try_parse_from(["ethw", "wallet", "create", "--destination", "/tmp/keys"]).unwrap();
        match cli.process {
            CliProcess::Wallet(WalletProcess::Create(p)) => assert_eq!(p.destination.as_deref(), Some("/tmp/keys")),
            other => panic!("Unexpected process: {other:?}"),
        }

        let cli = Cli::try_parse_from(["ethw", "wallet", "update", "wallet.json"]).unwrap();
        match cli.process {
            CliProcess::Wallet(WalletProcess::Update(p)) => {
                assert_eq!(p.file, PathBuf::from("wallet.json"));
                assert_eq!(p.destination, None);
            }
            other => panic!("Unexpected process: {other:?}"),
        }

        let cli = Cli::try_parse_from(["ethw", "--config", "ethw.toml", "wallet", "fromkey", "0x01"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("ethw.toml")));
        match cli.process {
            CliProcess::Wallet(WalletProcess::Fromkey(p)) => assert_eq!(p.key, "0x01"),
            other => panic!("Unexpected process: {other:?}"),
        }
    }

    #[test]
    fn test_parse_requires_command() {
        assert!(Cli::try_parse_from(["ethw"]).is_err());
        assert!(Cli::try_parse_from(["ethw", "wallet"]).is_err());
        assert!(Cli::try_parse_from(["ethw", "wallet", "update"]).is_err());
        assert!(matches!(
            Cli::try_parse_from(["ethw", "update"]).unwrap().process,
            CliProcess::Update(_)
        ));
    }
}
