use color_eyre::Result;

use super::{Process, ProcessOutput};
use crate::{
    cli::UpdateProcess,
    config::Config,
    errors::AppError,
    format_error,
    service::{EthwService, UpdatePromptSource, VersionSource},
    utils::{Console, VersionExt},
};

impl Process for UpdateProcess {
    async fn execute(
        self,
        config: Config,
        service: EthwService,
        _console: &mut impl Console,
    ) -> Result<ProcessOutput> {
        let releases = service.releases();
        let current_version = releases.local_version();

        let latest_version = match releases.latest_remote_version().await {
            Ok(latest) => latest,
            Err(AppError::UserFacing(err)) => {
                return Ok(ProcessOutput::fail().stderr(format_error!(config.theme, "{err}")));
            }
            Err(AppError::Unexpected(report)) => return Err(report),
        };

        if latest_version <= current_version {
            return Ok(ProcessOutput::success().stdout(format!(
                "You're all set! You are running the latest version of {} ({}).",
                env!("CARGO_PKG_NAME"),
                config.theme.accent.apply(current_version.to_tag())
            )));
        }

        Ok(ProcessOutput::success().stdout(format!(
            "A new version is available! ({} -> {})\n\nTo update, please run:\n\n  {}\n",
            config.theme.secondary.apply(current_version.to_tag()),
            config.theme.accent.apply(latest_version.to_tag()),
            config.theme.accent.apply(config.update.update_prompt())
        )))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;
    use wiremock::ResponseTemplate;

    use super::*;
    use crate::{
        process::test_utils::service,
        utils::testing::{ScriptedConsole, received_requests, release_server, unreachable_url},
    };

    fn release(tag: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(format!(r#"{{ "tag_name": "{tag}" }}"#), "application/json")
    }

    #[tokio::test]
    async fn test_update_available() {
        let tmp = tempdir().unwrap();
        let server = release_server(release("v999.0.0")).await;
        let (config, service) = service(tmp.path(), &server.uri());
        let prompt = config.update.prompt.clone();

        let output = UpdateProcess {}
            .execute(config, service, &mut ScriptedConsole::new())
            .await
            .unwrap();

        assert!(!output.is_failed());
        let stdout = output.stdout_text().unwrap();
        assert!(stdout.contains("A new version is available!"));
        assert!(stdout.contains("v999.0.0"));
        assert!(stdout.contains(&prompt));
        assert_eq!(received_requests(&server).await, 1);
    }

    #[tokio::test]
    async fn test_up_to_date() {
        let tmp = tempdir().unwrap();
        let server = release_server(release(concat!("v", env!("CARGO_PKG_VERSION")))).await;
        let (config, service) = service(tmp.path(), &server.uri());

        let output = UpdateProcess {}
            .execute(config, service, &mut ScriptedConsole::new())
            .await
            .unwrap();

        assert!(!output.is_failed());
        assert!(output.stdout_text().unwrap().contains("You're all set!"));
    }

    #[tokio::test]
    async fn test_update_check_failed() {
        let tmp = tempdir().unwrap();
        let url = unreachable_url();
        let (config, service) = service(tmp.path(), &url);

        let output = UpdateProcess {}
            .execute(config, service, &mut ScriptedConsole::new())
            .await
            .unwrap();

        assert!(output.is_failed());
        assert!(output.stderr_text().unwrap().contains("Couldn't check the latest release"));
    }
}
