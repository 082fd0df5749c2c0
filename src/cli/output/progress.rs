//! Spinners for mutation progress using indicatif.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

use crate::domain::models::{Notification, NotificationToken};
use crate::domain::ports::NotificationSink;

const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ";

/// Create a spinner for an operation of unknown length.
pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(SPINNER_CHARS);
    spinner.set_style(style);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

pub trait ProgressBarExt {
    /// Finish with a green checkmark
    fn finish_success(&self, message: impl Into<String>);

    /// Finish with a red cross
    fn finish_error(&self, message: impl Into<String>);
}

impl ProgressBarExt for ProgressBar {
    fn finish_success(&self, message: impl Into<String>) {
        self.finish_with_message(format!("{} {}", console::style("✓").green(), message.into()));
    }

    fn finish_error(&self, message: impl Into<String>) {
        self.finish_with_message(format!("{} {}", console::style("✗").red(), message.into()));
    }
}

/// Renders mutation notifications as one spinner per operation.
#[derive(Default)]
pub struct ConsoleNotifier {
    spinners: Mutex<HashMap<NotificationToken, ProgressBar>>,
    hidden: bool,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track notifications without drawing anything.
    pub fn hidden() -> Self {
        Self {
            hidden: true,
            ..Self::default()
        }
    }

    /// Operations started but not yet settled.
    pub fn in_progress(&self) -> usize {
        self.spinners.lock().len()
    }
}

impl NotificationSink for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Started { token, description } => {
                let spinner = create_spinner(description);
                if self.hidden {
                    spinner.set_draw_target(ProgressDrawTarget::hidden());
                }
                self.spinners.lock().insert(token, spinner);
            }
            Notification::Succeeded { token, message } => {
                if let Some(spinner) = self.spinners.lock().remove(&token) {
                    spinner.finish_success(message);
                }
            }
            Notification::Failed { token, message } => {
                if let Some(spinner) = self.spinners.lock().remove(&token) {
                    spinner.finish_error(message);
                }
            }
        }
    }
}
