//! Test doubles shared by the unit tests

use std::{collections::VecDeque, net::TcpListener};

use color_eyre::{Result, eyre::eyre};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use super::Console;
use crate::config::UpdateConfig;

#[derive(PartialEq, Eq)]
enum InputKind {
    Line,
    Password,
}

struct ScriptedInput {
    kind: InputKind,
    pattern: String,
    answers: VecDeque<String>,
    last: Option<String>,
}

/// A [Console] answering prompts from a script.
///
/// Prompts are matched against the registered patterns in order, the first rule whose pattern is contained in the
/// prompt provides the next answer. Once a rule runs out of answers it keeps repeating the last one.
#[derive(Default)]
pub struct ScriptedConsole {
    inputs: Vec<ScriptedInput>,
    pub prompts: Vec<String>,
    pub printed: Vec<String>,
}

impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers line prompts containing `pattern` with the given answers
    pub fn line_when<const N: usize>(self, pattern: &str, answers: [&str; N]) -> Self {
        self.with_input(InputKind::Line, pattern, answers)
    }

    /// Answers password prompts containing `pattern` with the given answers
    pub fn password_when<const N: usize>(self, pattern: &str, answers: [&str; N]) -> Self {
        self.with_input(InputKind::Password, pattern, answers)
    }

    /// Whether any printed message contains the given text
    pub fn printed_contains(&self, text: &str) -> bool {
        self.printed.iter().any(|m| m.contains(text))
    }

    fn with_input<const N: usize>(mut self, kind: InputKind, pattern: &str, answers: [&str; N]) -> Self {
        self.inputs.push(ScriptedInput {
            kind,
            pattern: pattern.to_string(),
            answers: answers.into_iter().map(String::from).collect(),
            last: None,
        });
        self
    }

    fn answer(&mut self, kind: InputKind, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        let input = self
            .inputs
            .iter_mut()
            .find(|i| i.kind == kind && prompt.contains(&i.pattern))
            .ok_or_else(|| eyre!("Unexpected prompt: {prompt}"))?;
        match input.answers.pop_front() {
            Some(answer) => {
                input.last = Some(answer.clone());
                Ok(answer)
            }
            None => input.last.clone().ok_or_else(|| eyre!("No answers for prompt: {prompt}")),
        }
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.answer(InputKind::Line, prompt)
    }

    fn read_password(&mut self, prompt: &str) -> Result<String> {
        self.answer(InputKind::Password, prompt)
    }

    fn print(&mut self, msg: &str) -> Result<()> {
        self.printed.push(msg.to_string());
        Ok(())
    }
}

/// Path of the latest release endpoint for the repository configured by [release_config]
pub const LATEST_RELEASE_PATH: &str = "/repos/hyperledger/web3j-cli/releases/latest";

/// Update configuration pointing to the given api url
pub fn release_config(api_url: impl Into<String>) -> UpdateConfig {
    UpdateConfig {
        api_url: api_url.into(),
        repo_owner: String::from("hyperledger"),
        repo_name: String::from("web3j-cli"),
        ..UpdateConfig::default()
    }
}

/// Starts a mock GitHub API answering the latest release endpoint with the given response
pub async fn release_server(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LATEST_RELEASE_PATH))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

/// Number of requests received by the mock server
pub async fn received_requests(server: &MockServer) -> usize {
    server.received_requests().await.map(|r| r.len()).unwrap_or_default()
}

/// Returns a base url where nothing is listening
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
