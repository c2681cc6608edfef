//! Terminal host: drives a widget with tokio timers and stdin commands.

use std::collections::HashMap;
use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Duration, Instant, sleep_until};
use tracing::{debug, info, warn};

use crate::animation::Schedule;
use crate::error::TypewriterError;
use crate::settings::Control;
use crate::sound::AudioDevice;
use crate::surface::Surface;
use crate::typewriter::Typewriter;

const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Single-line terminal rendering: text, then status and control labels.
pub struct TerminalSurface<W: Write> {
    out: W,
    text: String,
    status: String,
    error_marker: bool,
    labels: HashMap<Control, String>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        TerminalSurface {
            out,
            text: String::new(),
            status: String::new(),
            error_marker: false,
            labels: HashMap::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render_line(&self) -> String {
        let color = if self.error_marker { RED } else { "" };
        let labels: Vec<&str> = [Control::Sound, Control::Errors, Control::Speed]
            .iter()
            .filter_map(|c| self.labels.get(c).map(String::as_str))
            .collect();
        format!(
            "{CLEAR_LINE}{color}{}▌{RESET}  {DIM}{} · {}{RESET}",
            self.text,
            self.status,
            labels.join(" · ")
        )
    }

    fn redraw(&mut self) {
        let line = self.render_line();
        if let Err(e) = self.out.write_all(line.as_bytes()).and_then(|_| self.out.flush()) {
            warn!(error = %e, "terminal write failed");
        }
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.redraw();
    }

    fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.redraw();
    }

    fn set_error_marker(&mut self, on: bool) {
        self.error_marker = on;
        self.redraw();
    }

    fn set_label(&mut self, control: Control, label: &str) {
        self.labels.insert(control, label.to_string());
        self.redraw();
    }
}

/// One-letter stdin commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Sound,
    Errors,
    Speed,
    Restart,
    Quit,
}

impl Command {
    pub fn parse(input: &str) -> Option<Command> {
        match input.trim() {
            "s" | "sound" => Some(Command::Sound),
            "e" | "errors" => Some(Command::Errors),
            "v" | "speed" => Some(Command::Speed),
            "r" | "restart" => Some(Command::Restart),
            "q" | "quit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Apply a control command. Returns the replacement ticket for a restart.
pub fn apply<S: Surface, D: AudioDevice>(tw: &mut Typewriter<S, D>, cmd: Command) -> Option<Schedule> {
    match cmd {
        Command::Sound => tw.toggle_sound(),
        Command::Errors => tw.toggle_errors(),
        Command::Speed => tw.cycle_speed(),
        Command::Restart => return Some(tw.restart()),
        Command::Quit => {}
    }
    None
}

fn arm(ticket: Schedule) -> (Instant, Schedule) {
    let deadline = Instant::now() + Duration::from_secs_f64(ticket.delay_ms / 1000.0);
    (deadline, ticket)
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(d) => sleep_until(d).await,
        None => std::future::pending().await,
    }
}

/// Run until `q`, Ctrl-C, or until the widget's clock passes `limit_ms`.
pub async fn run<S: Surface, D: AudioDevice>(
    tw: &mut Typewriter<S, D>,
    limit_ms: Option<f64>,
) -> Result<(), TypewriterError> {
    let mut pending = Some(arm(tw.start()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        if limit_ms.is_some_and(|limit| tw.elapsed_ms() >= limit) {
            info!(elapsed_ms = tw.elapsed_ms(), "time limit reached");
            break;
        }

        tokio::select! {
            _ = wait_for(pending.map(|(deadline, _)| deadline)) => {
                if let Some((_, ticket)) = pending.take() {
                    pending = tw.fire(ticket).map(arm);
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => match Command::parse(&line) {
                        Some(Command::Quit) => break,
                        Some(cmd) => {
                            if let Some(ticket) = apply(tw, cmd) {
                                pending = Some(arm(ticket));
                            }
                        }
                        None => debug!(input = %line.trim(), "unknown command"),
                    },
                    None => stdin_open = false,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TypewriterConfig;
    use crate::rng::Lcg;
    use crate::sound::OfflineAudio;
    use crate::surface::MemorySurface;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse(" s\n"), Some(Command::Sound));
        assert_eq!(Command::parse("restart"), Some(Command::Restart));
        assert_eq!(Command::parse("x"), None);
    }

    #[test]
    fn restart_command_returns_ticket() {
        let cfg = TypewriterConfig { scripts: vec!["ab".into()], ..TypewriterConfig::default() };
        let mut tw =
            Typewriter::new(&cfg, MemorySurface::new(), OfflineAudio::new(), Box::new(Lcg::new(1)), false)
                .unwrap();
        assert!(apply(&mut tw, Command::Errors).is_none());
        assert!(tw.settings().errors_enabled);
        let ticket = apply(&mut tw, Command::Restart).unwrap();
        assert_eq!(ticket.epoch, 1);
    }

    #[test]
    fn terminal_marks_typos_in_red() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.set_text("abX");
        surface.set_error_marker(true);
        let out = String::from_utf8(surface.into_inner()).unwrap();
        let last = out.rsplit(CLEAR_LINE).next().unwrap();
        assert!(last.starts_with(&format!("{RED}abX")));
    }

    #[test]
    fn terminal_line_includes_labels() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.set_label(Control::Speed, "⚡ Normal Speed");
        surface.set_status("Pausing...");
        let out = String::from_utf8(surface.into_inner()).unwrap();
        let last = out.rsplit(CLEAR_LINE).next().unwrap();
        assert!(last.contains("Pausing... · ⚡ Normal Speed"));
    }
}
