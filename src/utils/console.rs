use std::io::{self, BufRead, Write};

use color_eyre::{Result, eyre::Context};

use crate::config::Theme;

/// User-facing console where interactive processes read their input and write progress messages
pub trait Console {
    /// Displays the prompt and reads a line of text, without the trailing line break
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Displays the prompt and reads a password without echoing it
    fn read_password(&mut self, prompt: &str) -> Result<String>;

    /// Writes a message for the user
    fn print(&mut self, msg: &str) -> Result<()>;
}

/// [Console] attached to the process terminal.
///
/// Prompts and messages are written to stderr so stdout only contains the process output.
#[derive(Default)]
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        let mut stderr = io::stderr();
        write!(stderr, "{prompt}")?;
        stderr.flush()?;
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .wrap_err("Couldn't read from stdin")?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn read_password(&mut self, prompt: &str) -> Result<String> {
        rpassword::prompt_password(prompt).wrap_err("Couldn't read the password")
    }

    fn print(&mut self, msg: &str) -> Result<()> {
        writeln!(io::stderr(), "{msg}")?;
        Ok(())
    }
}

/// Asks for a new wallet password twice, until both entries match
pub fn prompt_new_password(console: &mut impl Console, theme: &Theme) -> Result<String> {
    loop {
        let password = console.read_password("Please enter a wallet file password: ")?;
        if password.is_empty() {
            console.print(&format_error!(theme, "The password can't be empty"))?;
            continue;
        }
        let confirmation = console.read_password("Please re-enter the password: ")?;
        if password == confirmation {
            return Ok(password);
        }
        console.print("Sorry, passwords did not match")?;
    }
}

/// Asks for the destination directory, returning the raw input (which might be empty to pick the default)
pub fn prompt_destination(console: &mut impl Console, default: &str, theme: &Theme) -> Result<String> {
    console.read_line(&format!(
        "Please enter a destination directory location [{}]: ",
        theme.secondary.apply(default)
    ))
}

/// Asks a yes/no question, anything but `y` or `yes` is considered a no
pub fn prompt_confirmation(console: &mut impl Console, question: &str) -> Result<bool> {
    let answer = console.read_line(&format!("{question} (Y/N)? [N]: "))?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
