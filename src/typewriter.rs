//! Typewriter controller: owns all widget state and drives the animation.
//!
//! Every transition returns at most one [`Schedule`] ticket. The host arms a
//! single timer for it and hands the ticket back to [`Typewriter::fire`].
//! `start()` and `restart()` bump the epoch, so tickets issued before them
//! (including a typo correction still in flight) are dropped when they fire.

use tracing::{debug, info, warn};

use crate::accessibility::apply_reduced_motion;
use crate::animation::{Cursor, Phase, Schedule, Wake, variable_delay};
use crate::config::{Timing, TypewriterConfig};
use crate::error::TypewriterError;
use crate::rng::RandomSource;
use crate::script::ScriptLibrary;
use crate::settings::{Control, Settings};
use crate::sound::{AudioDevice, Tone, ToneKind, ToneOutput};
use crate::surface::Surface;
use crate::typo::TypoSimulator;

pub struct Typewriter<S: Surface, D: AudioDevice> {
    scripts: ScriptLibrary,
    settings: Settings,
    timing: Timing,
    typo: TypoSimulator,
    cursor: Cursor,
    live: bool,
    pausing: bool,
    /// Injected letter while a typo is on screen.
    detour: Option<char>,
    epoch: u64,
    elapsed_ms: f64,
    rng: Box<dyn RandomSource>,
    surface: S,
    device: D,
    output: Option<D::Output>,
}

impl<S: Surface, D: AudioDevice> Typewriter<S, D> {
    /// Build a widget. `reduced_motion` is the host's accessibility signal,
    /// read once here and never again.
    pub fn new(
        config: &TypewriterConfig,
        surface: S,
        device: D,
        rng: Box<dyn RandomSource>,
        reduced_motion: bool,
    ) -> Result<Self, TypewriterError> {
        config.validate()?;
        let mut settings = config.initial_settings();
        if apply_reduced_motion(&mut settings, reduced_motion, config.reduced_motion_multiplier) {
            info!(multiplier = config.reduced_motion_multiplier, "reduced motion: sound off");
        }

        let mut tw = Typewriter {
            scripts: config.script_library()?,
            settings,
            timing: config.timing.clone(),
            typo: TypoSimulator::new(config.typo_probability),
            cursor: Cursor::default(),
            live: false,
            pausing: false,
            detour: None,
            epoch: 0,
            elapsed_ms: 0.0,
            rng,
            surface,
            device,
            output: None,
        };
        for control in [Control::Sound, Control::Errors, Control::Speed] {
            tw.sync_label(control);
        }
        Ok(tw)
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Sum of the delays of every ticket fired so far.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn has_audio(&self) -> bool {
        self.output.is_some()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn phase(&self) -> Phase {
        if !self.live {
            Phase::Halted
        } else if self.detour.is_some() {
            Phase::ErrorDetour
        } else if self.pausing {
            Phase::Pausing
        } else if self.cursor.deleting {
            Phase::Deleting
        } else {
            Phase::Typing
        }
    }

    // ── Scheduling ──────────────────────────────────────────

    /// Go live and request the first tick.
    ///
    /// Any ticket issued before this call becomes stale, so calling `start()`
    /// again or between `restart()` and its resume leaves a single chain.
    pub fn start(&mut self) -> Schedule {
        self.epoch += 1;
        if self.detour.take().is_some() {
            let text = self
                .scripts
                .prefix(self.cursor.script_index, self.cursor.char_index);
            self.surface.set_text(&text);
            self.surface.set_error_marker(false);
        }
        self.live = true;
        debug!(epoch = self.epoch, "animation started");
        self.schedule(Wake::Tick, self.timing.start_delay_ms)
    }

    /// Run the transition a ticket asks for. Tickets from an earlier epoch
    /// are discarded.
    pub fn fire(&mut self, ticket: Schedule) -> Option<Schedule> {
        if ticket.epoch != self.epoch {
            debug!(stale = ticket.epoch, current = self.epoch, wake = ?ticket.wake, "dropping stale ticket");
            return None;
        }
        self.elapsed_ms += ticket.delay_ms;
        match ticket.wake {
            Wake::Tick => self.tick(),
            Wake::ResolveTypo => Some(self.resolve_typo()),
            Wake::Resume => self.resume(),
        }
    }

    fn schedule(&self, wake: Wake, delay_ms: f64) -> Schedule {
        Schedule {
            epoch: self.epoch,
            wake,
            delay_ms,
        }
    }

    fn jittered(&mut self, base: f64) -> f64 {
        let multiplier = self.settings.speed_multiplier();
        variable_delay(base, self.timing.jitter_floor, multiplier, self.rng.as_mut())
    }

    // ── Animation driver ────────────────────────────────────

    /// One animation step. Returns `None` only when the widget is not live.
    pub fn tick(&mut self) -> Option<Schedule> {
        if !self.live {
            debug!("tick while halted");
            return None;
        }

        let index = self.cursor.script_index;
        let len = self.scripts.char_len(index);
        let status = format!("Typing message {} of {}", index + 1, self.scripts.len());
        self.surface.set_status(&status);
        self.pausing = false;

        if !self.cursor.deleting && self.maybe_inject_error() {
            return Some(self.schedule(Wake::ResolveTypo, self.timing.typo_hold_ms));
        }

        if !self.cursor.deleting {
            self.cursor.char_index += 1;
            let text = self.scripts.prefix(index, self.cursor.char_index);
            self.surface.set_text(&text);
            self.play_tone(ToneKind::Type);

            if self.cursor.char_index == len {
                self.cursor.deleting = true;
                self.pausing = true;
                self.surface.set_status("Pausing...");
                debug!(script = index, "string complete, pausing");
                return Some(self.schedule(Wake::Tick, self.timing.pause_ms));
            }
        } else {
            self.cursor.char_index = self.cursor.char_index.saturating_sub(1);
            let text = self.scripts.prefix(index, self.cursor.char_index);
            self.surface.set_text(&text);
            self.play_tone(ToneKind::Type);

            if self.cursor.char_index == 0 {
                self.cursor.deleting = false;
                self.cursor.script_index = self.scripts.next_index(index);
                let next = self.scripts.text(self.cursor.script_index);
                self.surface.set_status(&format!("Next: \"{next}\""));
                debug!(next = self.cursor.script_index, "string cleared");
            }
        }

        let base = if self.cursor.deleting {
            self.timing.delete_ms
        } else {
            self.timing.type_ms
        };
        let delay = self.jittered(base);
        Some(self.schedule(Wake::Tick, delay))
    }

    // ── Error simulator ─────────────────────────────────────

    /// Possibly show a wrong letter in place of the next character.
    ///
    /// The cursor is left untouched; the typo is purely on screen until
    /// `ResolveTypo` fires.
    pub fn maybe_inject_error(&mut self) -> bool {
        let Cursor { script_index, char_index, .. } = self.cursor;
        let len = self.scripts.char_len(script_index);
        if !self
            .typo
            .should_inject(self.settings.errors_enabled, char_index, len, self.rng.as_mut())
        {
            return false;
        }

        let letter = TypoSimulator::wrong_letter(self.rng.as_mut());
        let mut shown = self.scripts.prefix(script_index, char_index);
        shown.push(letter);
        self.surface.set_text(&shown);
        self.surface.set_error_marker(true);
        self.detour = Some(letter);
        self.play_tone(ToneKind::Error);
        debug!(%letter, at = char_index, "typo injected");
        true
    }

    fn resolve_typo(&mut self) -> Schedule {
        self.detour = None;
        self.surface.set_error_marker(false);
        let text = self
            .scripts
            .prefix(self.cursor.script_index, self.cursor.char_index);
        self.surface.set_text(&text);
        let delay = self.jittered(self.timing.typo_resume_ms);
        self.schedule(Wake::Tick, delay)
    }

    // ── Sound ───────────────────────────────────────────────

    /// Play a tone if sound is on, opening the audio handle on first use.
    pub fn play_tone(&mut self, kind: ToneKind) {
        if !self.settings.sound_enabled {
            return;
        }
        if self.output.is_none() {
            self.acquire_audio();
        }
        let Some(output) = self.output.as_mut() else {
            return;
        };
        let tone = Tone::for_kind(kind, self.rng.as_mut());
        output.play(&tone, self.elapsed_ms);
    }

    fn acquire_audio(&mut self) {
        match self.device.open() {
            Ok(output) => self.output = Some(output),
            Err(e) => {
                warn!(error = %e, "audio unavailable, disabling sound");
                self.settings.sound_enabled = false;
                self.sync_label(Control::Sound);
            }
        }
    }

    fn release_audio(&mut self) {
        if let Some(output) = self.output.take() {
            output.close();
        }
    }

    // ── Settings controller ─────────────────────────────────

    fn sync_label(&mut self, control: Control) {
        let label = self.settings.label(control);
        self.surface.set_label(control, label);
    }

    pub fn toggle_sound(&mut self) {
        self.settings.sound_enabled = !self.settings.sound_enabled;
        if self.settings.sound_enabled {
            self.acquire_audio();
        } else {
            self.release_audio();
        }
        info!(enabled = self.settings.sound_enabled, "sound toggled");
        self.sync_label(Control::Sound);
    }

    pub fn toggle_errors(&mut self) {
        self.settings.errors_enabled = !self.settings.errors_enabled;
        info!(enabled = self.settings.errors_enabled, "typo simulation toggled");
        self.sync_label(Control::Errors);
    }

    pub fn cycle_speed(&mut self) {
        self.settings.cycle_speed();
        info!(speed = ?self.settings.speed, "speed changed");
        self.sync_label(Control::Speed);
    }

    /// Halt, reset to the first string, and request a fresh cycle.
    ///
    /// Any ticket issued before this call becomes stale.
    pub fn restart(&mut self) -> Schedule {
        self.live = false;
        self.cursor = Cursor::default();
        self.pausing = false;
        self.detour = None;
        self.surface.set_text("");
        self.surface.set_error_marker(false);
        self.epoch += 1;
        info!(epoch = self.epoch, "restart requested");
        self.schedule(Wake::Resume, self.timing.restart_delay_ms)
    }

    fn resume(&mut self) -> Option<Schedule> {
        self.live = true;
        self.surface.set_status("Starting animation...");
        self.tick()
    }
}
