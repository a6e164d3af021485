use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use color_eyre::eyre::Context;
use directories::BaseDirs;
use eth_keystore::KeystoreError;
use k256::{ecdsa::SigningKey, elliptic_curve::sec1::ToEncodedPoint};
use sha3::{Digest, Keccak256};
use tracing::instrument;

use super::EthwService;
use crate::{
    errors::{Result, UserFacingError},
    model::WalletFile,
};

impl EthwService {
    /// Generates a new random key pair and writes it encrypted with the given password into `dir`
    #[instrument(skip_all)]
    pub async fn generate_wallet_file(&self, password: String, dir: impl Into<PathBuf>) -> Result<WalletFile> {
        let key = SigningKey::random(&mut rand::thread_rng());
        self.write_wallet_file(key, password, dir.into()).await
    }

    /// Writes the given private key encrypted with the password into `dir`
    #[instrument(skip_all)]
    pub async fn import_private_key(
        &self,
        key: SigningKey,
        password: String,
        dir: impl Into<PathBuf>,
    ) -> Result<WalletFile> {
        self.write_wallet_file(key, password, dir.into()).await
    }

    /// Decrypts an existing wallet file
    #[instrument(skip_all)]
    pub async fn load_wallet_file(&self, path: impl Into<PathBuf>, password: String) -> Result<SigningKey> {
        let path = path.into();
        let path_str = path.display().to_string();
        if !path.is_file() {
            return Err(UserFacingError::WalletFileNotFound(path_str).into());
        }

        tracing::info!("Loading wallet file {path_str}");
        let decrypted = tokio::task::spawn_blocking(move || eth_keystore::decrypt_key(&path, password))
            .await
            .wrap_err("Wallet decryption task failed")?;

        let bytes = match decrypted {
            Ok(bytes) => bytes,
            Err(KeystoreError::MacMismatch) => {
                tracing::warn!("Invalid password for {path_str}");
                return Err(UserFacingError::WalletInvalidPassword(path_str).into());
            }
            Err(err) => {
                tracing::warn!("Couldn't decrypt {path_str}: {err:?}");
                return Err(UserFacingError::WalletLoadFailed(path_str, err.to_string()).into());
            }
        };

        SigningKey::from_slice(&bytes)
            .map_err(|_| UserFacingError::WalletLoadFailed(path_str, String::from("invalid private key")).into())
    }

    /// Resolves the raw destination entered by the user.
    ///
    /// An empty input resolves to the default keystore directory and a leading `~` is expanded to the home dir.
    pub fn resolve_destination(&self, raw: &str) -> PathBuf {
        let raw = raw.trim();
        if raw.is_empty() {
            return self.keystore_dir.clone();
        }
        if let Some(rest) = raw.strip_prefix('~')
            && (rest.is_empty() || rest.starts_with(['/', '\\']))
            && let Some(base_dirs) = BaseDirs::new()
        {
            return base_dirs.home_dir().join(rest.trim_start_matches(['/', '\\']));
        }
        PathBuf::from(raw)
    }

    async fn write_wallet_file(&self, key: SigningKey, password: String, dir: PathBuf) -> Result<WalletFile> {
        ensure_destination_dir(&dir)?;

        let address = address_of(&key);
        let file_name = wallet_file_name(&address);
        tracing::info!("Writing wallet file {file_name} into {}", dir.display());

        let task_dir = dir.clone();
        let task_file_name = file_name.clone();
        tokio::task::spawn_blocking(move || {
            eth_keystore::encrypt_key(
                &task_dir,
                &mut rand::thread_rng(),
                key.to_bytes(),
                password,
                Some(&task_file_name),
            )
        })
        .await
        .wrap_err("Wallet encryption task failed")?
        .wrap_err_with(|| format!("Couldn't write wallet file {file_name}"))?;

        Ok(WalletFile { address, file_name, dir })
    }
}

/// Makes sure the destination directory exists, creating it if needed
pub fn ensure_destination_dir(dir: &Path) -> Result<()> {
    let path_str = dir.display().to_string();
    if dir.exists() {
        if dir.is_dir() {
            return Ok(());
        }
        return Err(UserFacingError::DestinationNotADirectory(path_str).into());
    }
    tracing::info!("Creating destination directory {path_str}");
    fs::create_dir_all(dir).map_err(|err| UserFacingError::DestinationNotAccessible(path_str, err.to_string()))?;
    Ok(())
}

/// Parses a hex-encoded private key, with an optional `0x` prefix
pub fn parse_private_key(raw: &str) -> Result<SigningKey, UserFacingError> {
    let raw = raw.trim();
    let hex_key = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    if hex_key.len() != 64 {
        return Err(UserFacingError::InvalidPrivateKey);
    }
    let bytes = hex::decode(hex_key).map_err(|_| UserFacingError::InvalidPrivateKey)?;
    SigningKey::from_slice(&bytes).map_err(|_| UserFacingError::InvalidPrivateKey)
}

/// Lowercase `0x` address of the key: the last 20 bytes of the keccak hash of the uncompressed public key
fn address_of(key: &SigningKey) -> String {
    let point = key.verifying_key().as_affine().to_encoded_point(false);
    let hash = Keccak256::digest(&point.as_bytes()[1..]);
    format!("0x{}", hex::encode(&hash[12..]))
}

/// Keystore file name, `UTC--<timestamp>--<address>.json`
fn wallet_file_name(address: &str) -> String {
    format!(
        "UTC--{}--{}.json",
        Utc::now().format("%Y-%m-%dT%H-%M-%S%.9fZ"),
        address.trim_start_matches("0x")
    )
}
