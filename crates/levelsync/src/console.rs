//! Terminal rendering of status events.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use levelsync_core::status::StatusEvent;
use levelsync_core::{ContentKey, Outcome};
use once_cell::sync::Lazy;

const SPINNER_STYLE: &str = "{spinner:.blue} {wide_msg}";

const BAR_STYLE: &str = "{spinner:.blue} {prefix:>12.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos:>3}% {wide_msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static SPINNER: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(SPINNER_STYLE)
        .ok()
        .map(|s| s.tick_chars(TICK))
});

static BAR: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(BAR_STYLE)
        .ok()
        .map(|s| s.tick_chars(TICK).progress_chars(PB_CHARS))
});

/// One status line per acquisition: a spinner while searching, a bar while
/// downloading.
pub struct Console {
    pb:          ProgressBar,
    downloading: bool,
}

impl Console {
    pub fn new(key: &ContentKey) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Some(style) = SPINNER.as_ref() {
            pb.set_style(style.clone());
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(key.to_string());
        Self {
            pb,
            downloading: false,
        }
    }

    pub fn render(&mut self, event: StatusEvent) {
        match event {
            StatusEvent::Show { message, alert } => {
                if alert {
                    self.pb.set_message(style(message).bold().to_string());
                } else {
                    self.pb.set_message(message);
                }
            }
            // Errors outlive the line they interrupt.
            StatusEvent::Error { message, .. } => {
                self.pb
                    .println(format!("{} {message}", style("error:").red().bold()));
            }
            StatusEvent::Debug(_) => {}
            StatusEvent::Progress { label, fraction } => {
                if !self.downloading {
                    self.downloading = true;
                    self.pb.set_length(100);
                    if let Some(style) = BAR.as_ref() {
                        self.pb.set_style(style.clone());
                    }
                    self.pb.set_prefix("Downloading");
                    self.pb.set_message(label);
                }
                self.pb.set_position((fraction * 100.0).round() as u64);
            }
        }
    }

    pub fn finish(self, key: &ContentKey, outcome: &Outcome) {
        self.pb.finish_and_clear();
        match outcome {
            Outcome::Ready { path, via, index } => println!(
                "{} {key} {via}: {} (#{index})",
                style("ready").green().bold(),
                path.display()
            ),
            Outcome::Failed(failure) => println!("{} {key}: {failure}", style("failed").red().bold()),
        }
    }
}
