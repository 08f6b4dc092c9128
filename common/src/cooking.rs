//! 調理モードのステップ送りと読み上げ制御
//!
//! 状態は Idle / Speaking の2つ。読み上げ中にステップを移動すると、
//! 進行中の発話を止めてから新しいステップを読み上げる（キューには積まない）。

use crate::speech::{SpeechEngine, SpeechEvent, UtteranceId};

/// 読み上げ状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NarrationState {
    #[default]
    Idle,
    Speaking,
}

/// ステップカーソルと読み上げの調停役
#[derive(Debug, Clone, PartialEq)]
pub struct StepNavigator {
    steps: Vec<String>,
    cursor: usize,
    narration: NarrationState,
    utterance: Option<UtteranceId>,
}

impl StepNavigator {
    pub fn new(steps: Vec<String>) -> Self {
        Self {
            steps,
            cursor: 0,
            narration: NarrationState::Idle,
            utterance: None,
        }
    }

    pub fn current_step(&self) -> usize {
        self.cursor
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn current_text(&self) -> Option<&str> {
        self.steps.get(self.cursor).map(String::as_str)
    }

    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_last(&self) -> bool {
        self.cursor + 1 >= self.steps.len()
    }

    pub fn narration(&self) -> NarrationState {
        self.narration
    }

    pub fn is_speaking(&self) -> bool {
        self.narration == NarrationState::Speaking
    }

    pub fn utterance(&self) -> Option<UtteranceId> {
        self.utterance
    }

    /// 進捗率 (0.0..=1.0)。表示専用の派生値
    pub fn progress(&self) -> f32 {
        if self.steps.is_empty() {
            return 0.0;
        }
        (self.cursor + 1) as f32 / self.steps.len() as f32
    }

    pub fn progress_percent(&self) -> f32 {
        self.progress() * 100.0
    }

    /// "Step 2 of 5"
    pub fn step_label(&self) -> String {
        format!("Step {} of {}", self.cursor + 1, self.steps.len())
    }

    pub fn toggle_read_aloud<S: SpeechEngine + ?Sized>(&mut self, speech: &mut S) {
        if self.is_speaking() {
            self.stop(speech);
        } else {
            self.narrate(speech);
        }
    }

    /// 次のステップへ。末尾では何もしない
    pub fn next_step<S: SpeechEngine + ?Sized>(&mut self, speech: &mut S) -> bool {
        if self.is_last() {
            return false;
        }
        self.cursor += 1;
        self.after_move(speech);
        true
    }

    /// 前のステップへ。先頭では何もしない
    pub fn prev_step<S: SpeechEngine + ?Sized>(&mut self, speech: &mut S) -> bool {
        if self.is_first() {
            return false;
        }
        self.cursor -= 1;
        self.after_move(speech);
        true
    }

    /// 進行中の発話を止めて Idle に戻す
    pub fn stop<S: SpeechEngine + ?Sized>(&mut self, speech: &mut S) {
        if let Some(id) = self.utterance.take() {
            speech.cancel(id);
        }
        self.narration = NarrationState::Idle;
    }

    /// エンジンからの通知。現在の発話以外のイベントは破棄する
    pub fn handle_speech_event(&mut self, event: SpeechEvent) {
        if self.utterance != Some(event.utterance()) {
            tracing::debug!(?event, current = ?self.utterance, "stale speech event ignored");
            return;
        }
        match event {
            SpeechEvent::Started(_) => self.narration = NarrationState::Speaking,
            SpeechEvent::Ended(_) => {
                self.narration = NarrationState::Idle;
                self.utterance = None;
            }
        }
    }

    fn after_move<S: SpeechEngine + ?Sized>(&mut self, speech: &mut S) {
        if self.is_speaking() {
            self.narrate(speech);
        }
    }

    fn narrate<S: SpeechEngine + ?Sized>(&mut self, speech: &mut S) {
        if !speech.is_available() {
            return;
        }
        let Some(text) = self.steps.get(self.cursor) else {
            return;
        };

        if let Some(previous) = self.utterance.take() {
            speech.cancel(previous);
        }

        match speech.speak(text) {
            Ok(id) => {
                self.utterance = Some(id);
                self.narration = NarrationState::Speaking;
            }
            Err(e) => {
                tracing::warn!(error = %e, "narration failed to start");
                self.narration = NarrationState::Idle;
            }
        }
    }
}
