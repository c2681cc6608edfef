//! Browser host: DOM surface, Web Audio device, and the exported widget.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{error, warn};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{AudioContext, Document, Element, Event, GainNode, OscillatorType, Window};

use crate::accessibility::REDUCED_MOTION_QUERY;
use crate::animation::Schedule;
use crate::config::TypewriterConfig;
use crate::dsp::oscillator::Waveform;
use crate::error::TypewriterError;
use crate::rng::Lcg;
use crate::settings::Control;
use crate::sound::{AudioDevice, Tone, ToneOutput};
use crate::surface::Surface;
use crate::typewriter::Typewriter;

/// Button ids looked up for label updates and `bindControls()`.
const SOUND_BUTTON_ID: &str = "soundBtn";
const ERRORS_BUTTON_ID: &str = "errorBtn";
const SPEED_BUTTON_ID: &str = "speedBtn";
const RESTART_BUTTON_ID: &str = "restartBtn";

fn dom_err(e: JsValue) -> TypewriterError {
    TypewriterError::Dom(format!("{e:?}"))
}

fn to_js(e: TypewriterError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn window() -> Result<Window, TypewriterError> {
    web_sys::window().ok_or_else(|| TypewriterError::Dom("no global window".to_string()))
}

// ── DOM surface ─────────────────────────────────────────────

pub struct DomSurface {
    text: Element,
    status: Option<Element>,
    sound_button: Option<Element>,
    errors_button: Option<Element>,
    speed_button: Option<Element>,
}

impl DomSurface {
    /// Locate the text element by CSS selector and the status element by id.
    /// Missing status or buttons are tolerated; a missing text element is not.
    pub fn find(document: &Document, text_selector: &str, status_id: &str) -> Result<Self, TypewriterError> {
        let text = document
            .query_selector(text_selector)
            .map_err(dom_err)?
            .ok_or_else(|| TypewriterError::Dom(format!("no element matches '{text_selector}'")))?;
        text.class_list().add_1("typing").map_err(dom_err)?;
        Ok(DomSurface {
            text,
            status: document.get_element_by_id(status_id),
            sound_button: document.get_element_by_id(SOUND_BUTTON_ID),
            errors_button: document.get_element_by_id(ERRORS_BUTTON_ID),
            speed_button: document.get_element_by_id(SPEED_BUTTON_ID),
        })
    }
}

impl Surface for DomSurface {
    fn set_text(&mut self, text: &str) {
        self.text.set_text_content(Some(text));
    }

    fn set_status(&mut self, status: &str) {
        if let Some(el) = &self.status {
            el.set_text_content(Some(status));
        }
    }

    fn set_error_marker(&mut self, on: bool) {
        let classes = self.text.class_list();
        let result = if on {
            classes.add_1("error")
        } else {
            classes.remove_1("error")
        };
        if let Err(e) = result {
            warn!(error = ?e, "could not update error class");
        }
    }

    fn set_label(&mut self, control: Control, label: &str) {
        let button = match control {
            Control::Sound => &self.sound_button,
            Control::Errors => &self.errors_button,
            Control::Speed => &self.speed_button,
        };
        if let Some(el) = button {
            el.set_text_content(Some(label));
        }
    }
}

// ── Web Audio device ────────────────────────────────────────

/// Opens one `AudioContext` per `open()`.
pub struct WebAudio;

pub struct WebAudioOutput {
    ctx: AudioContext,
}

impl WebAudioOutput {
    fn schedule_tone(&self, tone: &Tone) -> Result<(), JsValue> {
        let now = self.ctx.current_time();

        let osc = self.ctx.create_oscillator()?;
        let gain: GainNode = self.ctx.create_gain()?;
        osc.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&self.ctx.destination())?;

        osc.set_type(match tone.waveform {
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
        });
        osc.frequency().set_value_at_time(tone.frequency as f32, now)?;

        gain.gain().set_value_at_time(tone.peak_gain as f32, now)?;
        gain.gain()
            .exponential_ramp_to_value_at_time(tone.floor_gain as f32, now + tone.duration)?;

        osc.start_with_when(now)?;
        osc.stop_with_when(now + tone.duration)?;
        Ok(())
    }
}

impl ToneOutput for WebAudioOutput {
    fn play(&mut self, tone: &Tone, _at_ms: f64) {
        if let Err(e) = self.schedule_tone(tone) {
            warn!(error = ?e, kind = ?tone.kind, "tone dropped");
        }
    }

    fn close(self) {
        if let Err(e) = self.ctx.close() {
            warn!(error = ?e, "AudioContext.close failed");
        }
    }
}

impl AudioDevice for WebAudio {
    type Output = WebAudioOutput;

    fn open(&mut self) -> Result<WebAudioOutput, TypewriterError> {
        AudioContext::new()
            .map(|ctx| WebAudioOutput { ctx })
            .map_err(|e| TypewriterError::AudioUnavailable(format!("{e:?}")))
    }
}

// ── Exported widget ─────────────────────────────────────────

type WebTypewriter = Typewriter<DomSurface, WebAudio>;

/// Arm a `setTimeout` for `ticket`; when it fires, feed the ticket back and
/// arm whatever comes next.
fn arm(widget: &Rc<RefCell<WebTypewriter>>, ticket: Schedule) -> Result<(), TypewriterError> {
    let target = Rc::clone(widget);
    let callback = Closure::once_into_js(move || {
        let next = target.borrow_mut().fire(ticket);
        if let Some(next) = next {
            if let Err(e) = arm(&target, next) {
                error!(error = %e, "animation stopped: could not arm timer");
            }
        }
    });
    window()?
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            ticket.delay_ms.round() as i32,
        )
        .map_err(dom_err)?;
    Ok(())
}

fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

/// The typewriter widget, bound to a page.
///
/// ```js
/// const widget = new TypewriterWidget(".headline", "status", { errors: true });
/// widget.bindControls();
/// widget.start();
/// ```
#[wasm_bindgen]
pub struct TypewriterWidget {
    inner: Rc<RefCell<WebTypewriter>>,
}

#[wasm_bindgen]
impl TypewriterWidget {
    /// `config` may be `undefined` for the stock widget.
    #[wasm_bindgen(constructor)]
    pub fn new(text_selector: &str, status_id: &str, config: JsValue) -> Result<TypewriterWidget, JsValue> {
        let config: TypewriterConfig = if config.is_undefined() || config.is_null() {
            TypewriterConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&format!("{e}")))?
        };

        let window = window().map_err(to_js)?;
        let document = window
            .document()
            .ok_or_else(|| to_js(TypewriterError::Dom("no document".to_string())))?;
        let surface = DomSurface::find(&document, text_selector, status_id).map_err(to_js)?;

        let seed = config
            .seed
            .unwrap_or_else(|| (js_sys::Math::random() * (1u64 << 53) as f64) as u64);
        let reduced_motion = prefers_reduced_motion(&window);
        let tw = Typewriter::new(&config, surface, WebAudio, Box::new(Lcg::new(seed)), reduced_motion)
            .map_err(to_js)?;

        Ok(TypewriterWidget {
            inner: Rc::new(RefCell::new(tw)),
        })
    }

    pub fn start(&self) -> Result<(), JsValue> {
        let ticket = self.inner.borrow_mut().start();
        arm(&self.inner, ticket).map_err(to_js)
    }

    #[wasm_bindgen(js_name = toggleSound)]
    pub fn toggle_sound(&self) {
        self.inner.borrow_mut().toggle_sound();
    }

    #[wasm_bindgen(js_name = toggleErrors)]
    pub fn toggle_errors(&self) {
        self.inner.borrow_mut().toggle_errors();
    }

    #[wasm_bindgen(js_name = cycleSpeed)]
    pub fn cycle_speed(&self) {
        self.inner.borrow_mut().cycle_speed();
    }

    pub fn restart(&self) -> Result<(), JsValue> {
        let ticket = self.inner.borrow_mut().restart();
        arm(&self.inner, ticket).map_err(to_js)
    }

    /// Current phase name, e.g. `"Typing"`.
    pub fn phase(&self) -> String {
        format!("{:?}", self.inner.borrow().phase())
    }

    /// Attach click handlers to `#soundBtn`, `#errorBtn`, `#speedBtn` and
    /// `#restartBtn`, skipping any that are absent.
    #[wasm_bindgen(js_name = bindControls)]
    pub fn bind_controls(&self) -> Result<(), JsValue> {
        let document = window()
            .map_err(to_js)?
            .document()
            .ok_or_else(|| to_js(TypewriterError::Dom("no document".to_string())))?;

        let actions: [(&str, fn(&Rc<RefCell<WebTypewriter>>)); 4] = [
            (SOUND_BUTTON_ID, |w| w.borrow_mut().toggle_sound()),
            (ERRORS_BUTTON_ID, |w| w.borrow_mut().toggle_errors()),
            (SPEED_BUTTON_ID, |w| w.borrow_mut().cycle_speed()),
            (RESTART_BUTTON_ID, |w| {
                let ticket = w.borrow_mut().restart();
                if let Err(e) = arm(w, ticket) {
                    error!(error = %e, "restart could not arm timer");
                }
            }),
        ];

        for (id, action) in actions {
            let Some(button) = document.get_element_by_id(id) else {
                continue;
            };
            let widget = Rc::clone(&self.inner);
            let cb = Closure::wrap(Box::new(move |_event: Event| action(&widget)) as Box<dyn FnMut(_)>);
            button.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
            cb.forget();
        }
        Ok(())
    }
}
