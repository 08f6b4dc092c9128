//! 音声読み上げの抽象化
//!
//! エンジンは `speak` ごとに `UtteranceId` を返す。開始・終了の通知は
//! `SpeechEvent` としてプラットフォーム側から `AppController` へ渡される。

use std::fmt;

use crate::error::{Error, Result};

/// 発話ハンドル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(pub u64);

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utterance#{}", self.0)
    }
}

/// エンジンからの通知
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechEvent {
    Started(UtteranceId),
    Ended(UtteranceId),
}

impl SpeechEvent {
    pub fn utterance(&self) -> UtteranceId {
        match self {
            SpeechEvent::Started(id) | SpeechEvent::Ended(id) => *id,
        }
    }
}

/// 読み上げエンジン
pub trait SpeechEngine {
    /// 利用できない環境では読み上げ機能自体を無効にする
    fn is_available(&self) -> bool;

    fn speak(&mut self, text: &str) -> Result<UtteranceId>;

    /// 即時停止。終了済みのハンドルに対しては何もしない
    fn cancel(&mut self, utterance: UtteranceId);
}

/// 読み上げ非対応環境用
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpeech;

impl SpeechEngine for NoopSpeech {
    fn is_available(&self) -> bool {
        false
    }

    fn speak(&mut self, _text: &str) -> Result<UtteranceId> {
        Err(Error::Speech("speech synthesis is not available".into()))
    }

    fn cancel(&mut self, _utterance: UtteranceId) {}
}
