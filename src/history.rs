use chrono::{DateTime, Utc};
use image::DynamicImage;
use std::collections::VecDeque;

/// One past generation as the presentation layer remembers it.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub image: DynamicImage,
    pub prompt: String,
    pub model_name: String,
    pub generated_at: DateTime<Utc>,
}

/// Session-scoped, caller-owned list of past generations. Newest first;
/// cleared wholesale, never per-entry. The dispatcher knows nothing about it.
#[derive(Debug, Clone, Default)]
pub struct GenerationHistory {
    entries: VecDeque<HistoryEntry>,
}

impl GenerationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, image: DynamicImage, prompt: impl Into<String>, model_name: impl Into<String>) {
        self.entries.push_front(HistoryEntry {
            image,
            prompt: prompt.into(),
            model_name: model_name.into(),
            generated_at: Utc::now(),
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
