//! Web Speech API による読み上げ

use std::cell::RefCell;
use std::rc::Rc;

use culina_common::{Error, Result, SpeechEngine, SpeechEvent, UtteranceId};
use wasm_bindgen::prelude::*;
use web_sys::{SpeechSynthesis, SpeechSynthesisUtterance, SpeechSynthesisVoice};

const PREFERRED_VOICE: &str = "Google US English";

type Listener = Rc<RefCell<Option<Rc<dyn Fn(SpeechEvent)>>>>;

/// 優先する声の位置。見つからなければ先頭
pub fn pick_voice_index<S: AsRef<str>>(names: &[S]) -> Option<usize> {
    names
        .iter()
        .position(|name| name.as_ref().contains(PREFERRED_VOICE))
        .or(if names.is_empty() { None } else { Some(0) })
}

pub struct WebSpeech {
    synth: Option<SpeechSynthesis>,
    next_id: u64,
    current: Option<UtteranceId>,
    listener: Listener,
}

impl WebSpeech {
    pub fn new() -> Self {
        let synth = web_sys::window().and_then(|w| w.speech_synthesis().ok());
        if synth.is_none() {
            gloo::console::warn!("speechSynthesis is not available; narration disabled");
        }
        Self {
            synth,
            next_id: 0,
            current: None,
            listener: Rc::new(RefCell::new(None)),
        }
    }

    /// 開始・終了通知の受け取り先
    pub fn set_listener(&self, listener: impl Fn(SpeechEvent) + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    fn attach(&self, utterance: &SpeechSynthesisUtterance, id: UtteranceId) {
        let on_start = notify(&self.listener, SpeechEvent::Started(id));
        utterance.set_onstart(Some(on_start.as_ref().unchecked_ref()));
        on_start.forget();

        let on_end = notify(&self.listener, SpeechEvent::Ended(id));
        utterance.set_onend(Some(on_end.as_ref().unchecked_ref()));
        on_end.forget();

        // 取り消し時は error (interrupted) が届く
        let on_error = notify(&self.listener, SpeechEvent::Ended(id));
        utterance.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_error.forget();
    }
}

fn notify(listener: &Listener, event: SpeechEvent) -> Closure<dyn FnMut(web_sys::Event)> {
    let listener = Rc::clone(listener);
    Closure::wrap(Box::new(move |_: web_sys::Event| {
        let callback = listener.borrow().clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }) as Box<dyn FnMut(_)>)
}

fn preferred_voice(synth: &SpeechSynthesis) -> Option<SpeechSynthesisVoice> {
    let voices: Vec<SpeechSynthesisVoice> = synth
        .get_voices()
        .iter()
        .filter_map(|v| v.dyn_into::<SpeechSynthesisVoice>().ok())
        .collect();
    let names: Vec<String> = voices.iter().map(|v| v.name()).collect();
    pick_voice_index(&names).and_then(|i| voices.into_iter().nth(i))
}

impl SpeechEngine for WebSpeech {
    fn is_available(&self) -> bool {
        self.synth.is_some()
    }

    fn speak(&mut self, text: &str) -> Result<UtteranceId> {
        let synth = self
            .synth
            .as_ref()
            .ok_or_else(|| Error::Speech("speechSynthesis is not available".into()))?;

        synth.cancel();
        let utterance = SpeechSynthesisUtterance::new_with_text(text)
            .map_err(|e| Error::Speech(format!("{:?}", e)))?;
        if let Some(voice) = preferred_voice(synth) {
            utterance.set_voice(Some(&voice));
        }

        self.next_id += 1;
        let id = UtteranceId(self.next_id);
        self.attach(&utterance, id);
        synth.speak(&utterance);
        self.current = Some(id);
        Ok(id)
    }

    fn cancel(&mut self, utterance: UtteranceId) {
        if self.current != Some(utterance) {
            return;
        }
        if let Some(synth) = &self.synth {
            synth.cancel();
        }
        self.current = None;
    }
}

impl Drop for WebSpeech {
    fn drop(&mut self) {
        if let Some(synth) = &self.synth {
            synth.cancel();
        }
    }
}
