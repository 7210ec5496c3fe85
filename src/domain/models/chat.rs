use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag attached to a chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// A recorded-and-transcribed note (a "chat" in the client)
/// Matches backend TranscriptionResponse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub id: Uuid,
    pub text: String,
    pub timestamp: String,
    #[serde(default)]
    pub photo_album_url: Option<String>,
    #[serde(default)]
    pub audio_filename: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Set on chats folded into a combined chat; hidden from the plain list
    #[serde(default)]
    pub is_merged: bool,
    #[serde(default)]
    pub merged_title: Option<String>,
    #[serde(default)]
    pub todo_title: Option<String>,
    #[serde(default)]
    pub original_text: Option<String>,
}

impl Transcription {
    /// Title shown in list rows: merged title, then todo title, then the first line of text
    pub fn display_title(&self) -> &str {
        self.merged_title
            .as_deref()
            .or(self.todo_title.as_deref())
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.text.lines().next().unwrap_or_default())
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }
}
