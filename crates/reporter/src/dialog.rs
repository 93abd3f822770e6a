use std::io::{BufRead, IsTerminal, Write};
use std::process::Command;
use thiserror::Error;
use tracing::warn;

/// Fixed prompt shown before any report leaves the machine.
#[derive(Debug, Clone)]
pub struct DialogPrompt {
    pub title: String,
    pub message: String,
    pub affirm_label: String,
    pub decline_label: String,
}

impl DialogPrompt {
    pub fn crash_report() -> Self {
        Self {
            title: "Application Error".into(),
            message: "An application error occurred. Do you want to send an anonymous crash report?".into(),
            affirm_label: "Send Report".into(),
            decline_label: "Don't Send".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Affirm,
    Decline,
}

#[derive(Error, Debug)]
pub enum DialogError {
    #[error("dialog tool `{tool}` could not be launched: {source}")]
    Launch {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("dialog tool `{tool}` produced unexpected output")]
    UnexpectedOutput { tool: &'static str },

    #[error("no dialog capability available on this platform")]
    Unavailable,

    #[error("failed to read confirmation from stdin: {0}")]
    Stdin(#[source] std::io::Error),
}

/// Yes/no confirmation capability. The reporter core depends only on this
/// trait; the platform branching lives behind `platform_dialog`.
pub trait ConfirmDialog: Send + Sync {
    fn ask(&self, prompt: &DialogPrompt) -> Result<Choice, DialogError>;
}

pub fn platform_dialog() -> Box<dyn ConfirmDialog> {
    match std::env::consts::OS {
        "macos" => Box::new(MacDialog),
        "linux" => Box::new(LinuxDialog),
        "windows" => Box::new(WindowsDialog),
        _ => Box::new(StdinPrompt),
    }
}

fn applescript_str(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

/// `osascript` `display dialog`; the chosen button is reported on stdout as
/// `button returned:<label>`.
struct MacDialog;

impl ConfirmDialog for MacDialog {
    fn ask(&self, prompt: &DialogPrompt) -> Result<Choice, DialogError> {
        let script = format!(
            "display dialog {} with title {} buttons {{{}, {}}} default button {} with icon caution",
            applescript_str(&prompt.message),
            applescript_str(&prompt.title),
            applescript_str(&prompt.decline_label),
            applescript_str(&prompt.affirm_label),
            applescript_str(&prompt.affirm_label),
        );

        let output = Command::new("osascript")
            .arg("-e")
            .arg(&script)
            .output()
            .map_err(|source| DialogError::Launch { tool: "osascript", source })?;

        // osascript exits non-zero when the dialog is dismissed (escape key).
        if !output.status.success() {
            return Ok(Choice::Decline);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.contains(&format!("button returned:{}", prompt.affirm_label)) {
            Ok(Choice::Affirm)
        } else if stdout.contains("button returned:") {
            Ok(Choice::Decline)
        } else {
            Err(DialogError::UnexpectedOutput { tool: "osascript" })
        }
    }
}

/// `zenity --question`, falling back to `kdialog`, falling back to stdin when
/// neither tool is installed.
struct LinuxDialog;

impl LinuxDialog {
    fn ask_zenity(prompt: &DialogPrompt) -> Result<Choice, DialogError> {
        let status = Command::new("zenity")
            .arg("--question")
            .arg("--title")
            .arg(&prompt.title)
            .arg("--text")
            .arg(&prompt.message)
            .arg("--ok-label")
            .arg(&prompt.affirm_label)
            .arg("--cancel-label")
            .arg(&prompt.decline_label)
            .status()
            .map_err(|source| DialogError::Launch { tool: "zenity", source })?;

        match status.code() {
            Some(0) => Ok(Choice::Affirm),
            Some(_) => Ok(Choice::Decline),
            None => Err(DialogError::UnexpectedOutput { tool: "zenity" }),
        }
    }

    fn ask_kdialog(prompt: &DialogPrompt) -> Result<Choice, DialogError> {
        let status = Command::new("kdialog")
            .arg("--title")
            .arg(&prompt.title)
            .arg("--warningyesno")
            .arg(&prompt.message)
            .arg("--yes-label")
            .arg(&prompt.affirm_label)
            .arg("--no-label")
            .arg(&prompt.decline_label)
            .status()
            .map_err(|source| DialogError::Launch { tool: "kdialog", source })?;

        match status.code() {
            Some(0) => Ok(Choice::Affirm),
            Some(_) => Ok(Choice::Decline),
            None => Err(DialogError::UnexpectedOutput { tool: "kdialog" }),
        }
    }
}

impl ConfirmDialog for LinuxDialog {
    fn ask(&self, prompt: &DialogPrompt) -> Result<Choice, DialogError> {
        match Self::ask_zenity(prompt) {
            Err(DialogError::Launch { .. }) => {}
            other => return other,
        }
        match Self::ask_kdialog(prompt) {
            Err(DialogError::Launch { .. }) => {
                warn!("neither zenity nor kdialog is installed, falling back to stdin prompt");
                StdinPrompt.ask(prompt)
            }
            other => other,
        }
    }
}

/// PowerShell MessageBox. Button labels are fixed to Yes/No by the platform.
struct WindowsDialog;

impl ConfirmDialog for WindowsDialog {
    fn ask(&self, prompt: &DialogPrompt) -> Result<Choice, DialogError> {
        let script = format!(
            "Add-Type -AssemblyName PresentationFramework; \
             [System.Windows.MessageBox]::Show('{}','{}','YesNo','Warning')",
            prompt.message.replace('\'', "''"),
            prompt.title.replace('\'', "''"),
        );

        let output = Command::new("powershell")
            .arg("-NoProfile")
            .arg("-NonInteractive")
            .arg("-Command")
            .arg(&script)
            .output()
            .map_err(|source| DialogError::Launch { tool: "powershell", source })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        match stdout.trim() {
            "Yes" => Ok(Choice::Affirm),
            "No" => Ok(Choice::Decline),
            _ => Err(DialogError::UnexpectedOutput { tool: "powershell" }),
        }
    }
}

/// Synchronous y/n prompt on the controlling terminal. Used when no graphical
/// capability exists; unavailable when stdin is not a terminal.
struct StdinPrompt;

impl ConfirmDialog for StdinPrompt {
    fn ask(&self, prompt: &DialogPrompt) -> Result<Choice, DialogError> {
        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            return Err(DialogError::Unavailable);
        }

        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "{}\n{} [y/N] ", prompt.message, prompt.affirm_label);
        let _ = stderr.flush();

        let mut line = String::new();
        let read = stdin.lock().read_line(&mut line).map_err(DialogError::Stdin)?;
        if read == 0 {
            return Ok(Choice::Decline);
        }

        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Ok(Choice::Affirm),
            _ => Ok(Choice::Decline),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applescript_strings_are_escaped() {
        assert_eq!(applescript_str(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(applescript_str(r"a\b"), r#""a\\b""#);
    }

    #[test]
    fn crash_report_prompt_has_fixed_labels() {
        let prompt = DialogPrompt::crash_report();
        assert_eq!(prompt.affirm_label, "Send Report");
        assert_eq!(prompt.decline_label, "Don't Send");
        assert!(prompt.message.contains("anonymous crash report"));
    }
}
