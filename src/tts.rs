use std::path::PathBuf;
use std::process::Command;

use uuid::Uuid;

use crate::lang::LanguageTag;
use crate::progress::ConsoleProgress;

/// Synthesize speech for `text` by shelling out to `espeak-ng`, writing a
/// temporary WAV file. Returns the file path, or `None` for unsupported
/// languages or a failed synthesis (never an error). The caller owns the file
/// and removes it after sending.
pub fn synthesize(text: &str, lang: LanguageTag, progress: &ConsoleProgress) -> Option<PathBuf> {
    if text.trim().is_empty() {
        return None;
    }
    let voice = match lang {
        LanguageTag::Ru => "ru",
        LanguageTag::Th => "th",
        LanguageTag::En => "en",
    };

    let out_path = std::env::temp_dir().join(format!("relay_tts_{}.wav", Uuid::new_v4()));
    let status = Command::new("espeak-ng")
        .arg("-v")
        .arg(voice)
        .arg("-w")
        .arg(&out_path)
        .arg(text)
        .status();

    match status {
        Ok(s) if s.success() && out_path.exists() => Some(out_path),
        Ok(s) => {
            progress.warn(format!("tts exited with {s}"));
            let _ = std::fs::remove_file(&out_path);
            None
        }
        Err(err) => {
            progress.warn(format!("tts unavailable: {err}"));
            let _ = std::fs::remove_file(&out_path);
            None
        }
    }
}
