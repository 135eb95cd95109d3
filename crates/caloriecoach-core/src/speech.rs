//! Speech output.
//!
//! Messages are handed to a bounded queue drained by one worker thread, so
//! the caller never waits for audio. A full queue drops the message.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{sync_channel, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};

use crate::coach::Locale;
use crate::error::ExternalServiceError;
use crate::storage::SpeechConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    #[default]
    Female,
    Male,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub locale: Locale,
    pub voice: VoiceGender,
}

/// Something that can say an utterance out loud. Called from the worker
/// thread; blocking is fine.
pub trait SpeechBackend: Send + 'static {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), ExternalServiceError>;
}

/// Backend that only logs what would be spoken.
#[derive(Debug, Default)]
pub struct TracingSpeechBackend;

impl SpeechBackend for TracingSpeechBackend {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), ExternalServiceError> {
        tracing::info!(
            locale = %utterance.locale,
            voice = ?utterance.voice,
            text = %utterance.text,
            "speak"
        );
        Ok(())
    }
}

pub struct SpeechQueue {
    sender: Option<SyncSender<Utterance>>,
    worker: Option<JoinHandle<()>>,
    locale: Locale,
    voice: VoiceGender,
    last_text: Option<String>,
    dropped: Arc<AtomicU64>,
}

impl std::fmt::Debug for SpeechQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechQueue")
            .field("locale", &self.locale)
            .field("voice", &self.voice)
            .field("dropped", &self.dropped())
            .finish_non_exhaustive()
    }
}

impl SpeechQueue {
    /// Start the worker thread with room for `capacity` pending messages.
    pub fn spawn<B: SpeechBackend>(
        mut backend: B,
        capacity: usize,
        locale: Locale,
        voice: VoiceGender,
    ) -> Result<Self, ExternalServiceError> {
        let (sender, receiver) = sync_channel::<Utterance>(capacity.max(1));
        let worker = thread::Builder::new()
            .name("speech".into())
            .spawn(move || {
                for utterance in receiver {
                    if let Err(e) = backend.speak(&utterance) {
                        tracing::warn!(error = %e, "speech backend failed");
                    }
                }
                tracing::debug!("speech worker finished");
            })
            .map_err(|e| ExternalServiceError::SpeechQueue(e.to_string()))?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
            locale,
            voice,
            last_text: None,
            dropped: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Queue with the logging backend, if speech is enabled.
    pub fn from_config(config: &SpeechConfig, locale: Locale) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        match Self::spawn(TracingSpeechBackend, config.queue_capacity, locale, config.voice) {
            Ok(queue) => Some(queue),
            Err(e) => {
                tracing::warn!(error = %e, "speech disabled");
                None
            }
        }
    }

    /// Hand `text` to the worker without blocking.
    ///
    /// Returns `Ok(false)` when the text is empty or repeats the previous
    /// message, and an error when the queue is full or closed.
    pub fn enqueue(&mut self, text: &str) -> Result<bool, ExternalServiceError> {
        let text = prepare_text(text);
        if text.is_empty() || self.last_text.as_deref() == Some(text.as_str()) {
            return Ok(false);
        }
        let Some(sender) = &self.sender else {
            return Err(ExternalServiceError::SpeechQueue("closed".into()));
        };
        let utterance = Utterance {
            text: text.clone(),
            locale: self.locale,
            voice: self.voice,
        };
        match sender.try_send(utterance) {
            Ok(()) => {
                self.last_text = Some(text);
                Ok(true)
            }
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                Err(ExternalServiceError::SpeechQueue("queue full, message dropped".into()))
            }
            Err(TrySendError::Disconnected(_)) => {
                Err(ExternalServiceError::SpeechQueue("worker stopped".into()))
            }
        }
    }

    /// Messages dropped because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Close the queue and wait for pending messages to be spoken.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("speech worker panicked");
            }
        }
    }
}

impl Drop for SpeechQueue {
    fn drop(&mut self) {
        self.close();
    }
}

/// Normalize punctuation so speech engines pause naturally: ellipses become
/// commas, repeated marks collapse, brackets go, whitespace is single.
pub fn prepare_text(text: &str) -> String {
    let chars: Vec<char> = text
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '[' | ']'))
        .map(|c| if c == ';' { ',' } else { c })
        .collect();

    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '.' | ',' => {
                let mut run = 1;
                while chars.get(i + run) == Some(&c) {
                    run += 1;
                }
                let between_digits = run == 1
                    && i > 0
                    && chars[i - 1].is_ascii_digit()
                    && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
                if between_digits {
                    out.push(c);
                } else {
                    let mark = if c == '.' && run >= 3 { ',' } else { c };
                    trim_end_spaces(&mut out);
                    out.push(mark);
                    out.push(' ');
                }
                i += run;
            }
            '!' | '?' => {
                trim_end_spaces(&mut out);
                out.push(c);
                out.push(' ');
                i += 1;
            }
            c if c.is_whitespace() => {
                if !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
                i += 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out.trim().to_string()
}

fn trim_end_spaces(s: &mut String) {
    while s.ends_with(' ') {
        s.pop();
    }
}
