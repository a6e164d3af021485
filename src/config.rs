use std::{fs, ops::Range, path::PathBuf};

use color_eyre::{
    Result,
    eyre::{Context, ContextCompat},
};
use crossterm::style::{Attribute, Color, ContentStyle};
use directories::{BaseDirs, ProjectDirs};
use serde::{
    Deserialize,
    de::{Deserializer, Error},
};

use crate::service::UpdatePromptSource;

/// Main configuration struct for the application
#[derive(Clone, Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
#[cfg_attr(not(test), serde(default))]
pub struct Config {
    /// Directory where the data must be stored
    pub data_dir: PathBuf,
    /// Whether to check for updates on startup
    pub check_updates: bool,
    /// Configuration for the wallet commands
    pub wallet: WalletConfig,
    /// Configuration for the update check
    pub update: UpdateConfig,
    /// Configuration settings for application logging
    pub logs: LogsConfig,
    /// Configuration for the styles of the output
    pub theme: Theme,
}

/// Configuration for the wallet commands
#[derive(Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
#[cfg_attr(not(test), serde(default))]
pub struct WalletConfig {
    /// Default directory where new wallet files are written, when left empty a platform-specific testnet keystore
    /// directory is used
    pub keystore_dir: PathBuf,
}

/// Configuration for the update check
#[derive(Clone, Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
#[cfg_attr(not(test), serde(default))]
pub struct UpdateConfig {
    /// Base url of the GitHub API
    pub api_url: String,
    /// Owner of the repository publishing the releases
    pub repo_owner: String,
    /// Name of the repository publishing the releases
    pub repo_name: String,
    /// Timeout (in ms) of the request retrieving the latest release
    pub timeout_ms: u64,
    /// Command displayed to the user when a new version is available
    pub prompt: String,
}

/// Configuration settings for application logging
#[derive(Clone, Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
#[cfg_attr(not(test), serde(default))]
pub struct LogsConfig {
    /// Whether application logging is enabled
    pub enabled: bool,
    /// The log filter to apply, controlling which logs are recorded.
    ///
    /// This string supports the `tracing-subscriber`'s environment filter syntax.
    pub filter: String,
}

/// Output theme configuration
#[derive(Clone, Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
#[cfg_attr(not(test), serde(default))]
pub struct Theme {
    /// Style for less important text, like default values on prompts
    #[serde(deserialize_with = "deserialize_style")]
    pub secondary: ContentStyle,
    /// Style for highlighted values, like addresses, versions or commands
    #[serde(deserialize_with = "deserialize_style")]
    pub accent: ContentStyle,
    /// Style for paths and other informative values
    #[serde(deserialize_with = "deserialize_style")]
    pub comment: ContentStyle,
    /// Style for errors
    #[serde(deserialize_with = "deserialize_style")]
    pub error: ContentStyle,
}

impl Config {
    /// Initializes the application configuration.
    ///
    /// Attempts to load the configuration from the given file or the user's config directory (`config.toml`). If the
    /// file does not exist or has missing fields, it falls back to default values.
    pub fn init(config_file: Option<PathBuf>) -> Result<Self> {
        let proj_dirs = ProjectDirs::from("org", "Ethw", "ethw").wrap_err("Couldn't initialize project directory")?;
        let config_dir = proj_dirs.config_dir().to_path_buf();

        let config_path = config_file.unwrap_or_else(|| config_dir.join("config.toml"));
        let mut config = if config_path.exists() {
            let config_str = fs::read_to_string(&config_path)
                .wrap_err_with(|| format!("Couldn't read config file {}", config_path.display()))?;
            toml::from_str(&config_str)
                .wrap_err_with(|| format!("Couldn't parse config file {}", config_path.display()))?
        } else {
            Config::default()
        };

        // Resolve empty directories to the platform defaults
        if config.data_dir.as_os_str().is_empty() {
            config.data_dir = proj_dirs.data_dir().to_path_buf();
        }
        if config.wallet.keystore_dir.as_os_str().is_empty() {
            let base_dirs = BaseDirs::new().wrap_err("Couldn't find the home directory")?;
            config.wallet.keystore_dir = default_keystore_dir(&base_dirs);
        }

        fs::create_dir_all(&config.data_dir)
            .wrap_err_with(|| format!("Couldn't create data dir {}", config.data_dir.display()))?;

        Ok(config)
    }
}

impl UpdateConfig {
    /// Url of the endpoint returning the latest published release
    pub fn latest_release_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url.trim_end_matches('/'),
            self.repo_owner,
            self.repo_name
        )
    }
}

impl UpdatePromptSource for UpdateConfig {
    fn update_prompt(&self) -> String {
        self.prompt.clone()
    }
}

/// Testnet keystore directory, following the layout used by the main Ethereum clients on each platform
fn default_keystore_dir(base_dirs: &BaseDirs) -> PathBuf {
    let ethereum_dir = if cfg!(target_os = "macos") {
        base_dirs.home_dir().join("Library").join("Ethereum")
    } else if cfg!(target_os = "windows") {
        base_dirs.data_dir().join("Ethereum")
    } else {
        base_dirs.home_dir().join(".ethereum")
    };
    ethereum_dir.join("testnet").join("keystore")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::new(),
            check_updates: true,
            wallet: WalletConfig::default(),
            update: UpdateConfig::default(),
            logs: LogsConfig::default(),
            theme: Theme::default(),
        }
    }
}
impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            api_url: String::from("https://api.github.com"),
            repo_owner: String::from("ethw-cli"),
            repo_name: String::from("ethw"),
            timeout_ms: 1500,
            prompt: String::from("cargo install ethw --locked"),
        }
    }
}
impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            filter: String::from("info"),
        }
    }
}
impl Default for Theme {
    fn default() -> Self {
        let mut secondary = ContentStyle::new();
        secondary.attributes.set(Attribute::Dim);

        let mut accent = ContentStyle::new();
        accent.foreground_color = Some(Color::Yellow);

        let mut comment = ContentStyle::new();
        comment.foreground_color = Some(Color::Green);
        comment.attributes.set(Attribute::Italic);

        let mut error = ContentStyle::new();
        error.foreground_color = Some(Color::DarkRed);

        Self {
            secondary,
            accent,
            comment,
            error,
        }
    }
}

/// Deserializes a string into a [`ContentStyle`].
///
/// Supports color names and modifiers (e.g., "red", "bold", "italic blue", "underline dim green").
fn deserialize_style<'de, D>(deserializer: D) -> Result<ContentStyle, D::Error>
where
    D: Deserializer<'de>,
{
    parse_style(&String::deserialize(deserializer)?).map_err(D::Error::custom)
}

/// Parses a string into a [`ContentStyle`], every word but the last must be a modifier
fn parse_style(raw: &str) -> Result<ContentStyle, String> {
    let raw_lower = raw.trim().to_ascii_lowercase();
    let mut style = ContentStyle::new();
    let mut words = raw_lower.split_whitespace().peekable();
    while let Some(word) = words.peek() {
        let attribute = match *word {
            "bold" => Attribute::Bold,
            "dim" => Attribute::Dim,
            "italic" => Attribute::Italic,
            "underline" | "underlined" => Attribute::Underlined,
            _ => break,
        };
        style.attributes.set(attribute);
        words.next();
    }
    let color = words.collect::<Vec<_>>().join(" ");
    if !color.is_empty() && color != "default" {
        style.foreground_color = Some(parse_color(&color)?);
    }
    Ok(style)
}

/// Parses a named, hex (`#ff0064`) or ansi indexed color
fn parse_color(raw: &str) -> Result<Color, String> {
    let invalid = || format!("Unable to parse color: {raw}");
    Ok(match raw {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Grey,
        "dark gray" | "darkgray" | "dark grey" | "darkgrey" => Color::DarkGrey,
        "dark red" | "darkred" => Color::DarkRed,
        "dark green" | "darkgreen" => Color::DarkGreen,
        "dark yellow" | "darkyellow" => Color::DarkYellow,
        "dark blue" | "darkblue" => Color::DarkBlue,
        "dark magenta" | "darkmagenta" => Color::DarkMagenta,
        "dark cyan" | "darkcyan" => Color::DarkCyan,
        "white" => Color::White,
        hex if hex.starts_with('#') => {
            let hex = &hex[1..];
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |range: Range<usize>| u8::from_str_radix(&hex[range], 16).map_err(|_| invalid());
            Color::Rgb {
                r: channel(0..2)?,
                g: channel(2..4)?,
                b: channel(4..6)?,
            }
        }
        ansi => Color::AnsiValue(ansi.parse::<u8>().map_err(|_| invalid())?),
    })
}
