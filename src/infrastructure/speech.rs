//! Speech recognition seam for voice search
//!
//! A platform recognizer is acquired per voice query and released when the
//! guard goes out of scope, whatever the outcome. Recognition yields a single
//! phrase rather than a stream of events.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a speech recognizer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Speech recognizer unavailable: {0}")]
    Unavailable(String),

    #[error("Recognition failed: {0}")]
    Recognition(String),
}

/// Options passed to the recognizer when a session starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognitionOptions {
    /// Silence after which the recognizer finalizes the phrase
    pub pause: Duration,
}

/// Platform recognizer that can open one listening session at a time
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn acquire(&self, options: RecognitionOptions) -> Result<Box<dyn RecognizerSession>, SpeechError>;
}

/// An open listening session
#[async_trait]
pub trait RecognizerSession: Send {
    /// Listen until the phrase is finalized. `None` when nothing was recognized.
    async fn recognize(&mut self) -> Result<Option<String>, SpeechError>;

    /// Stop listening and free the platform handle
    fn release(&mut self);
}

/// Owns a session for one voice query and releases it on drop
pub struct RecognizerGuard {
    session: Box<dyn RecognizerSession>,
}

impl RecognizerGuard {
    pub async fn acquire(
        recognizer: &dyn SpeechRecognizer,
        options: RecognitionOptions,
    ) -> Result<Self, SpeechError> {
        let session = recognizer.acquire(options).await?;
        Ok(Self { session })
    }

    pub async fn recognize(&mut self) -> Result<Option<String>, SpeechError> {
        let text = self.session.recognize().await?;
        Ok(text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()))
    }
}

impl Drop for RecognizerGuard {
    fn drop(&mut self) {
        self.session.release();
    }
}

/// Acquire, recognize one phrase, release
pub async fn recognize_once(
    recognizer: &dyn SpeechRecognizer,
    options: RecognitionOptions,
) -> Result<Option<String>, SpeechError> {
    let mut guard = RecognizerGuard::acquire(recognizer, options).await?;
    guard.recognize().await
}
