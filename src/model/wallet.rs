use std::path::PathBuf;

/// Represents a wallet file written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletFile {
    /// Lowercase `0x` address of the wallet
    pub address: String,
    /// Name of the keystore file
    pub file_name: String,
    /// Directory containing the file
    pub dir: PathBuf,
}

impl WalletFile {
    /// Full path of the keystore file
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}
