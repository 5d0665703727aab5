use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::ir::TranslationResult;

/// Chats where the relay is switched on. Owned by the transport layer and
/// passed by reference where needed; nothing here is process-global.
#[derive(Debug, Default)]
pub struct EnabledChats {
    chats: HashSet<i64>,
}

impl EnabledChats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self, chat_id: i64) -> bool {
        self.chats.insert(chat_id)
    }

    pub fn disable(&mut self, chat_id: i64) -> bool {
        self.chats.remove(&chat_id)
    }

    #[must_use]
    pub fn is_enabled(&self, chat_id: i64) -> bool {
        self.chats.contains(&chat_id)
    }
}

/// Recent results kept for edit/playback actions, keyed by a generated id.
/// A generated id rather than a content hash: two unrelated messages with
/// identical translations must not share an entry.
#[derive(Debug, Default)]
pub struct ResultCache {
    results: HashMap<Uuid, TranslationResult>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, result: TranslationResult) -> Uuid {
        let id = Uuid::new_v4();
        self.results.insert(id, result);
        id
    }

    #[must_use]
    pub fn get(&self, id: &Uuid) -> Option<&TranslationResult> {
        self.results.get(id)
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<TranslationResult> {
        self.results.remove(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{EnabledChats, ResultCache};
    use crate::ir::{TranslationRequest, TranslationResult};
    use crate::lang::LanguageTag;

    fn sample(text: &str) -> TranslationResult {
        TranslationResult::started(&TranslationRequest::new(
            text,
            LanguageTag::Ru,
            LanguageTag::Th,
            "m",
        ))
    }

    #[test]
    fn enable_disable_roundtrip() {
        let mut chats = EnabledChats::new();
        assert!(!chats.is_enabled(5));
        assert!(chats.enable(5));
        assert!(chats.is_enabled(5));
        assert!(chats.disable(5));
        assert!(!chats.is_enabled(5));
    }

    #[test]
    fn identical_results_get_distinct_ids() {
        let mut cache = ResultCache::new();
        let a = cache.insert(sample("Привет"));
        let b = cache.insert(sample("Привет"));
        assert_ne!(a, b);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&a).unwrap().original, "Привет");
    }
}
