use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_STT_MODEL, DEFAULT_TRANSLATION_MODEL};
use crate::lang::LanguageTag;

/// Per-user settings. The chain consumes this read-only; only the transport
/// layer mutates it through the setters below.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    pub native_language: LanguageTag,
    pub translation_model: String,
    pub stt_model: String,
}

impl UserProfile {
    fn new_default(user_id: i64) -> Self {
        Self {
            user_id,
            username: None,
            native_language: LanguageTag::Ru,
            translation_model: DEFAULT_TRANSLATION_MODEL.to_string(),
            stt_model: DEFAULT_STT_MODEL.to_string(),
        }
    }
}

/// JSON-file-backed user settings store. Every mutation writes through; a
/// missing or corrupt file degrades to an empty store instead of failing
/// startup.
pub struct UserStorage {
    path: PathBuf,
    users: HashMap<String, UserProfile>,
}

impl UserStorage {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let users = load_users(&path).unwrap_or_default();
        Self { path, users }
    }

    /// Fetch a profile, creating (and persisting) the default one on first
    /// access.
    pub fn get(&mut self, user_id: i64) -> anyhow::Result<UserProfile> {
        let key = user_id.to_string();
        if !self.users.contains_key(&key) {
            self.users.insert(key.clone(), UserProfile::new_default(user_id));
            self.save()?;
        }
        Ok(self.users[&key].clone())
    }

    pub fn set_native_language(
        &mut self,
        user_id: i64,
        language: LanguageTag,
    ) -> anyhow::Result<UserProfile> {
        self.update(user_id, |p| p.native_language = language)
    }

    pub fn set_translation_model(
        &mut self,
        user_id: i64,
        model: &str,
    ) -> anyhow::Result<UserProfile> {
        let model = model.to_string();
        self.update(user_id, move |p| p.translation_model = model)
    }

    pub fn set_stt_model(&mut self, user_id: i64, model: &str) -> anyhow::Result<UserProfile> {
        let model = model.to_string();
        self.update(user_id, move |p| p.stt_model = model)
    }

    fn update(
        &mut self,
        user_id: i64,
        apply: impl FnOnce(&mut UserProfile),
    ) -> anyhow::Result<UserProfile> {
        let _ = self.get(user_id)?;
        let key = user_id.to_string();
        let profile = self.users.get_mut(&key).expect("profile just ensured");
        apply(profile);
        let snapshot = profile.clone();
        self.save()?;
        Ok(snapshot)
    }

    fn save(&self) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(&self.users).context("serialize users")?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("write users: {}", self.path.display()))?;
        Ok(())
    }
}

fn load_users(path: &Path) -> Option<HashMap<String, UserProfile>> {
    let text = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}
