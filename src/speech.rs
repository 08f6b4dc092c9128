//! 外部コマンドによる読み上げ（say / espeak-ng / espeak）
//!
//! 発話ごとに子プロセスを起動し、監視スレッドが終了を `SpeechEvent::Ended` で通知する。

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use culina_common::{Error, Result, SpeechEngine, SpeechEvent, UtteranceId};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[cfg(target_os = "macos")]
const CANDIDATES: &[&str] = &["say", "espeak-ng", "espeak"];
#[cfg(not(target_os = "macos"))]
const CANDIDATES: &[&str] = &["espeak-ng", "espeak"];

/// 読み上げに使うコマンド。本文は最後の引数として渡す
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl SpeechCommand {
    /// `"espeak-ng -s 150"` のような設定値を分解する
    pub fn parse(command: &str) -> Option<Self> {
        let mut words = command.split_whitespace();
        let program = words.next()?;
        Some(Self {
            program: PathBuf::from(program),
            args: words.map(String::from).collect(),
        })
    }

    /// PATH上の既知の読み上げコマンドを探す
    pub fn detect() -> Option<Self> {
        Self::first_available(|name| which::which(name).ok())
    }

    /// 候補を順に引き、最初に実行可能なものを採用する
    fn first_available(lookup: impl Fn(&str) -> Option<PathBuf>) -> Option<Self> {
        CANDIDATES.iter().find_map(|&name| lookup(name)).map(|program| Self {
            program,
            args: Vec::new(),
        })
    }
}

struct Playing {
    id: UtteranceId,
    child: Child,
}

pub struct CommandSpeech {
    command: Option<SpeechCommand>,
    events: Sender<SpeechEvent>,
    next_id: u64,
    current: Arc<Mutex<Option<Playing>>>,
}

impl CommandSpeech {
    /// `command` が `None` なら読み上げ不可として振る舞う
    pub fn new(command: Option<SpeechCommand>, events: Sender<SpeechEvent>) -> Self {
        match &command {
            Some(c) => tracing::debug!(program = %c.program.display(), "speech command configured"),
            None => tracing::debug!("no speech command; narration disabled"),
        }
        Self {
            command,
            events,
            next_id: 0,
            current: Arc::new(Mutex::new(None)),
        }
    }
}

fn lock(current: &Mutex<Option<Playing>>) -> MutexGuard<'_, Option<Playing>> {
    current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn kill(playing: &mut Playing) {
    if let Err(e) = playing.child.kill() {
        tracing::debug!(utterance = %playing.id, error = %e, "speech process already exited");
    }
    let _ = playing.child.wait();
}

impl SpeechEngine for CommandSpeech {
    fn is_available(&self) -> bool {
        self.command.is_some()
    }

    fn speak(&mut self, text: &str) -> Result<UtteranceId> {
        let command = self
            .command
            .as_ref()
            .ok_or_else(|| Error::Speech("no speech command available".into()))?;

        if let Some(mut previous) = lock(&self.current).take() {
            kill(&mut previous);
        }

        let child = Command::new(&command.program)
            .args(&command.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Speech(format!("{}: {}", command.program.display(), e)))?;

        self.next_id += 1;
        let id = UtteranceId(self.next_id);
        *lock(&self.current) = Some(Playing { id, child });
        let _ = self.events.send(SpeechEvent::Started(id));

        let current = Arc::clone(&self.current);
        let events = self.events.clone();
        thread::spawn(move || watch(id, current, events));

        Ok(id)
    }

    fn cancel(&mut self, utterance: UtteranceId) {
        let mut current = lock(&self.current);
        if current.as_ref().is_some_and(|p| p.id == utterance) {
            if let Some(mut playing) = current.take() {
                kill(&mut playing);
            }
        }
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        if let Some(mut playing) = lock(&self.current).take() {
            kill(&mut playing);
        }
    }
}

/// 発話が自然終了したら Ended を送る。取り消し・差し替え時は何も送らない
fn watch(id: UtteranceId, current: Arc<Mutex<Option<Playing>>>, events: Sender<SpeechEvent>) {
    loop {
        thread::sleep(POLL_INTERVAL);
        let mut guard = lock(&current);
        let finished = match guard.as_mut() {
            Some(playing) if playing.id == id => match playing.child.try_wait() {
                Ok(Some(_)) => true,
                Ok(None) => false,
                Err(e) => {
                    tracing::warn!(utterance = %id, error = %e, "lost track of speech process");
                    true
                }
            },
            _ => return,
        };
        if finished {
            guard.take();
            drop(guard);
            let _ = events.send(SpeechEvent::Ended(id));
            return;
        }
    }
}
