use std::path::{Path, PathBuf};

use crate::client::OpenRouterClient;
use crate::progress::ConsoleProgress;

/// Ownership of a downloaded voice file. The file is deleted when the guard
/// drops, so every exit path of the transcription flow cleans up.
pub struct VoiceFile {
    path: PathBuf,
}

impl VoiceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for VoiceFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Transcribe a voice file and dispose of it. Any failure maps to `None`;
/// the caller decides how to tell the user.
pub fn transcribe_voice(
    client: &OpenRouterClient,
    model: &str,
    voice: VoiceFile,
    progress: &ConsoleProgress,
) -> Option<String> {
    match client.transcribe(model, voice.path()) {
        Ok(text) => {
            progress.info(format!("stt: transcribed {} chars", text.chars().count()));
            Some(text)
        }
        Err(err) => {
            progress.warn(format!("stt failed: {err}"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::VoiceFile;

    #[test]
    fn voice_file_is_deleted_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voice.ogg");
        std::fs::write(&path, b"fake audio").unwrap();

        {
            let _guard = VoiceFile::new(&path);
            assert!(path.exists());
        }
        assert!(!path.exists());
    }
}
