use std::io::{Write, stdout};

use base64::Engine;

use crate::app::{App, Model, NoticeLevel};
use crate::error::WidgetError;

impl App {
    /// Perform the terminal side effects the last update queued.
    pub(super) fn handle_side_effects(model: &mut Model) {
        for text in model.take_clipboard() {
            if text.is_empty() {
                continue;
            }
            match copy_to_clipboard(&text) {
                Ok(()) => {
                    tracing::debug!(chars = text.chars().count(), "copied to clipboard");
                    model.show_notice(NoticeLevel::Info, "Copied to clipboard");
                }
                Err(err) => {
                    tracing::warn!(%err, "clipboard write failed");
                    model.show_notice(NoticeLevel::Error, err.to_string());
                }
            }
        }
    }
}

fn copy_to_clipboard(text: &str) -> Result<(), WidgetError> {
    #[cfg(target_os = "macos")]
    {
        if copy_to_pbcopy(text).is_ok() {
            return Ok(());
        }
    }
    copy_to_clipboard_osc52(text).map_err(|err| WidgetError::Clipboard(err.to_string()))
}

#[cfg(target_os = "macos")]
fn copy_to_pbcopy(text: &str) -> std::io::Result<()> {
    use std::process::{Command, Stdio};

    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other("pbcopy failed"))
    }
}

fn copy_to_clipboard_osc52(text: &str) -> std::io::Result<()> {
    let osc = osc52_sequence(text);
    let mut out = stdout();
    out.write_all(osc.as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}
