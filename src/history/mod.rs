mod export;

pub use export::{ export_filename, render_transcript };

use crate::error::RelayError;
use crate::models::chat::{ ChatTurn, Role };
use log::info;
use std::path::{ Path, PathBuf };

/// The single active conversation. Turns are only ever appended or cleared
/// as a whole.
#[derive(Debug, Default, Clone)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, role: Role, content: impl Into<String>, timestamp: impl Into<String>) {
        self.turns.push(ChatTurn {
            role,
            content: content.into(),
            timestamp: timestamp.into(),
        });
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn snapshot(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Writes the transcript to `dir` and returns the path of the new file.
    /// Fails with `EmptyHistory` without touching the filesystem when there
    /// is nothing to export.
    pub fn export_to_text(&self, dir: &Path) -> Result<PathBuf, RelayError> {
        let first = self.turns.first().ok_or(RelayError::EmptyHistory)?;
        let path = dir.join(export_filename(first));
        std::fs::write(&path, render_transcript(&self.turns))?;
        info!("Exported {} turns to {}", self.turns.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Conversation {
        let mut conversation = Conversation::new();
        conversation.append(Role::User, "hello there", "2024-03-05T10:00:00Z");
        conversation.append(Role::Assistant, "hi!", "2024-03-05T10:00:02Z");
        conversation.append(Role::User, "how are you", "2024-03-05T10:01:00Z");
        conversation
    }

    #[test]
    fn snapshot_preserves_append_order() {
        let conversation = sample();
        let contents: Vec<&str> = conversation
            .snapshot()
            .iter()
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(contents, vec!["hello there", "hi!", "how are you"]);
        assert_eq!(conversation.snapshot()[1].role, Role::Assistant);
        assert_eq!(conversation.snapshot()[1].timestamp, "2024-03-05T10:00:02Z");
    }

    #[test]
    fn clear_empties_and_is_idempotent() {
        let mut conversation = sample();
        conversation.clear();
        assert!(conversation.snapshot().is_empty());
        conversation.clear();
        assert!(conversation.is_empty());
    }

    #[test]
    fn export_on_empty_history_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let err = Conversation::new().export_to_text(dir.path()).unwrap_err();
        assert!(matches!(err, RelayError::EmptyHistory));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn export_writes_one_block_per_turn() {
        let dir = tempfile::tempdir().unwrap();
        let conversation = sample();
        let path = conversation.export_to_text(dir.path()).unwrap();

        assert_eq!(path.file_name().unwrap(), "2024-03-05_hello_there.txt");
        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3 * conversation.len());
        assert_eq!(lines[0], "2024-03-05T10:00:00Z | user");
        assert_eq!(lines[1], "hello there");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "2024-03-05T10:00:02Z | assistant");
        assert!(written.ends_with("how are you\n\n"));
    }
}
