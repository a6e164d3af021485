use semver::Version;
use tracing::instrument;

use super::VersionSource;
use crate::{
    config::Theme,
    errors::AppError,
    utils::{Console, VersionExt},
};

/// Provides the update instructions displayed when a new version is available
pub trait UpdatePromptSource {
    /// The command (or message) the user can run to update
    fn update_prompt(&self) -> String;
}

/// Decides whether the user must be notified about a new version
pub struct UpdateGate<S, P> {
    source: S,
    prompt: P,
    theme: Theme,
}

impl<S, P> UpdateGate<S, P>
where
    S: VersionSource,
    P: UpdatePromptSource,
{
    /// Creates a new gate with its dependencies
    pub fn new(source: S, prompt: P, theme: Theme) -> Self {
        Self { source, prompt, theme }
    }

    /// Checks the latest version and prompts the user if it's newer than the running one.
    ///
    /// The check is best-effort, any failure retrieving the latest version is logged and considered as no update
    /// available. Returns whether the user was prompted.
    #[instrument(skip_all)]
    pub async fn prompt_if_update_available(&self, console: &mut impl Console) -> bool {
        let local = self.source.local_version();
        let remote = match self.source.latest_remote_version().await {
            Ok(remote) => Some(remote),
            Err(AppError::UserFacing(err)) => {
                tracing::info!("Skipping update prompt: {err}");
                None
            }
            Err(AppError::Unexpected(report)) => {
                tracing::warn!("Skipping update prompt: {report:?}");
                None
            }
        };
        self.check_and_prompt_if_newer(&local, remote.as_ref(), console)
    }

    /// Prompts the user with the configured instructions when the remote version is newer than the local one.
    ///
    /// The prompt is only retrieved when an update is available. Returns whether the user was prompted.
    pub fn check_and_prompt_if_newer(
        &self,
        local: &Version,
        remote: Option<&Version>,
        console: &mut impl Console,
    ) -> bool {
        let Some(remote) = remote.filter(|remote| *remote > local) else {
            tracing::debug!("No newer version available, running v{local}");
            return false;
        };
        tracing::info!("A new version is available: v{local} -> v{remote}");
        let msg = format!(
            "A new version of {} is available! ({} -> {})\nTo update, run:\n\n  {}\n",
            env!("CARGO_PKG_NAME"),
            self.theme.secondary.apply(local.to_tag()),
            self.theme.accent.apply(remote.to_tag()),
            self.theme.accent.apply(self.prompt.update_prompt())
        );
        if let Err(err) = console.print(&msg) {
            tracing::warn!("Couldn't display the update prompt: {err:?}");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;
    use reqwest::Client;
    use wiremock::ResponseTemplate;

    use super::*;
    use crate::{
        config::UpdateConfig,
        errors::{Result, UserFacingError},
        service::GitHubVersionSource,
        utils::testing::{ScriptedConsole, received_requests, release_config, release_server, unreachable_url},
    };

    const PROMPT: &str = "curl -L get.web3j.io | sh && source ~/.web3j/source.sh";

    struct FixedVersionSource {
        local: &'static str,
        remote: Option<&'static str>,
    }

    impl VersionSource for FixedVersionSource {
        fn local_version(&self) -> Version {
            Version::parse(self.local).unwrap()
        }

        async fn latest_remote_version(&self) -> Result<Version> {
            match self.remote {
                Some(remote) => Ok(Version::parse(remote).unwrap()),
                None => Err(UserFacingError::ReleaseRequestFailed(String::from("connection refused")).into()),
            }
        }
    }

    #[derive(Default)]
    struct CountingPrompt {
        reads: AtomicUsize,
    }

    impl UpdatePromptSource for &CountingPrompt {
        fn update_prompt(&self) -> String {
            self.reads.fetch_add(1, Ordering::SeqCst);
            String::from(PROMPT)
        }
    }

    async fn run_gate(local: &'static str, remote: Option<&'static str>) -> (bool, usize, ScriptedConsole) {
        let prompt = CountingPrompt::default();
        let gate = UpdateGate::new(FixedVersionSource { local, remote }, &prompt, Theme::default());
        let mut console = ScriptedConsole::new();
        let prompted = gate.prompt_if_update_available(&mut console).await;
        (prompted, prompt.reads.load(Ordering::SeqCst), console)
    }

    #[tokio::test]
    async fn test_prompt_when_update_is_available() {
        let (prompted, reads, console) = run_gate("1.0.0", Some("1.1.0")).await;
        assert!(prompted);
        assert_eq!(reads, 1);
        assert_eq!(console.printed.len(), 1);
        assert!(console.printed_contains(PROMPT));
    }

    #[tokio::test]
    async fn test_no_prompt_when_up_to_date() {
        let (prompted, reads, console) = run_gate("1.1.0", Some("1.1.0")).await;
        assert!(!prompted);
        assert_eq!(reads, 0);
        assert!(console.printed.is_empty());
    }

    #[tokio::test]
    async fn test_no_prompt_when_running_newer_version() {
        let (prompted, reads, console) = run_gate("1.2.0", Some("1.1.9")).await;
        assert!(!prompted);
        assert_eq!(reads, 0);
        assert!(console.printed.is_empty());
    }

    #[tokio::test]
    async fn test_no_prompt_when_remote_unavailable() {
        let (prompted, reads, console) = run_gate("1.0.0", None).await;
        assert!(!prompted);
        assert_eq!(reads, 0);
        assert!(console.printed.is_empty());
    }

    #[test]
    fn test_check_and_prompt_if_newer_compares_numerically() {
        let prompt = CountingPrompt::default();
        let gate = UpdateGate::new(
            FixedVersionSource {
                local: "0.0.0",
                remote: None,
            },
            &prompt,
            Theme::default(),
        );
        let mut console = ScriptedConsole::new();

        let local = Version::new(1, 9, 0);
        assert!(gate.check_and_prompt_if_newer(&local, Some(&Version::new(1, 10, 0)), &mut console));
        assert!(!gate.check_and_prompt_if_newer(&local, Some(&Version::new(1, 8, 12)), &mut console));
        assert!(!gate.check_and_prompt_if_newer(&local, None, &mut console));

        assert_eq!(prompt.reads.load(Ordering::SeqCst), 1);
        assert_eq!(console.printed.len(), 1);
        assert!(console.printed_contains("v1.10.0"));
    }

    fn github_source(api_url: impl Into<String>) -> GitHubVersionSource {
        let client = Client::builder().no_proxy().build().unwrap();
        GitHubVersionSource::with_client(client, &release_config(api_url))
    }

    #[tokio::test]
    async fn test_no_prompt_on_error_response() {
        let prompt = CountingPrompt::default();
        let server = release_server(
            ResponseTemplate::new(503).set_body_raw(r#"{ "message": "Service Unavailable" }"#, "application/json"),
        )
        .await;
        let gate = UpdateGate::new(github_source(server.uri()), &prompt, Theme::default());
        let mut console = ScriptedConsole::new();

        assert!(!gate.prompt_if_update_available(&mut console).await);
        assert_eq!(received_requests(&server).await, 1);
        assert_eq!(prompt.reads.load(Ordering::SeqCst), 0);
        assert!(console.printed.is_empty());
    }

    #[tokio::test]
    async fn test_no_prompt_on_connection_refused() {
        let prompt = CountingPrompt::default();
        let gate = UpdateGate::new(github_source(unreachable_url()), &prompt, Theme::default());
        let mut console = ScriptedConsole::new();

        assert!(!gate.prompt_if_update_available(&mut console).await);
        assert_eq!(prompt.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_prompt_from_github_release() {
        let server = release_server(
            ResponseTemplate::new(200).set_body_raw(r#"{ "tag_name": "v999.0.0" }"#, "application/json"),
        )
        .await;
        let config = UpdateConfig {
            prompt: String::from(PROMPT),
            ..release_config(server.uri())
        };
        let gate = UpdateGate::new(github_source(server.uri()), config, Theme::default());
        let mut console = ScriptedConsole::new();

        assert!(gate.prompt_if_update_available(&mut console).await);
        assert!(console.printed_contains(PROMPT));
        assert!(console.printed_contains("v999.0.0"));
    }
}
