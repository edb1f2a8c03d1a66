//! Composer state: the staged, not-yet-sent multi-modal draft.

use crate::error::{ChatError, ChatResult};
use crate::types::MediaRef;

/// The currently-staged user input.
///
/// The draft is transient and never part of the conversation log; it is
/// handed off to a send operation via [`ComposerDraft::take`] and cleared
/// in the same step.
#[derive(Debug, Clone, Default)]
pub struct ComposerDraft {
    text: String,
    staged_images: Vec<MediaRef>,
    staged_audio: Option<MediaRef>,
}

impl ComposerDraft {
    /// Create an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the draft text verbatim. Normalization happens at send time.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Stage images, up to `max` staged in total. Excess paths are dropped.
    pub fn stage_images<I>(&mut self, paths: I, max: usize)
    where
        I: IntoIterator<Item = MediaRef>,
    {
        let remain = max.saturating_sub(self.staged_images.len());
        let mut dropped = 0usize;
        for (i, path) in paths.into_iter().enumerate() {
            if i < remain {
                self.staged_images.push(path);
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            tracing::warn!(dropped, max, "image staging capacity reached, dropping excess");
        }
    }

    /// Stage an audio clip. At most one unsent clip may exist at a time;
    /// a second recording is rejected until the first is sent or discarded.
    pub fn stage_audio(&mut self, path: impl Into<MediaRef>) -> ChatResult<()> {
        if self.staged_audio.is_some() {
            tracing::warn!("audio already staged, rejecting new recording");
            return Err(ChatError::AudioAlreadyStaged);
        }
        self.staged_audio = Some(path.into());
        Ok(())
    }

    /// The draft text as typed, without normalization.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The staged images, in selection order.
    pub fn staged_images(&self) -> &[MediaRef] {
        &self.staged_images
    }

    /// The staged audio clip, if any.
    pub fn staged_audio(&self) -> Option<&MediaRef> {
        self.staged_audio.as_ref()
    }

    /// Whether nothing is staged at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.staged_images.is_empty() && self.staged_audio.is_none()
    }

    /// Hand the draft off to a send operation, leaving the composer empty.
    pub fn take(&mut self) -> ComposerDraft {
        std::mem::take(self)
    }

    /// Reset all fields to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_text_is_verbatim() {
        let mut draft = ComposerDraft::new();
        draft.set_text("  hello   world  ");
        assert_eq!(draft.text(), "  hello   world  ");
    }

    #[test]
    fn test_image_cap_keeps_oldest_first() {
        let mut draft = ComposerDraft::new();
        draft.stage_images((0..4).map(|i| format!("img{}.png", i)), 3);
        assert_eq!(draft.staged_images(), ["img0.png", "img1.png", "img2.png"]);

        // Already full: further staging is dropped entirely.
        draft.stage_images(vec!["img9.png".to_string()], 3);
        assert_eq!(draft.staged_images().len(), 3);
    }

    #[test]
    fn test_image_cap_across_calls() {
        let mut draft = ComposerDraft::new();
        draft.stage_images(vec!["a.png".to_string(), "b.png".to_string()], 3);
        draft.stage_images(vec!["c.png".to_string(), "d.png".to_string()], 3);
        assert_eq!(draft.staged_images(), ["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_second_audio_rejected() {
        let mut draft = ComposerDraft::new();
        draft.stage_audio("take1.m4a").unwrap();
        let err = draft.stage_audio("take2.m4a").unwrap_err();
        assert!(matches!(err, ChatError::AudioAlreadyStaged));
        assert_eq!(draft.staged_audio().map(String::as_str), Some("take1.m4a"));
    }

    #[test]
    fn test_clear_resets_all_fields() {
        let mut draft = ComposerDraft::new();
        draft.set_text("draft");
        draft.stage_images(vec!["a.png".to_string()], 6);
        draft.stage_audio("clip.m4a").unwrap();

        draft.clear();
        assert!(draft.is_empty());
    }

    #[test]
    fn test_take_clears_everything() {
        let mut draft = ComposerDraft::new();
        draft.set_text("hi");
        draft.stage_images(vec!["a.png".to_string()], 6);
        draft.stage_audio("clip.m4a").unwrap();

        let snapshot = draft.take();
        assert!(!snapshot.is_empty());
        assert!(draft.is_empty());
        // A new recording is accepted once the previous one was handed off.
        assert!(draft.stage_audio("take2.m4a").is_ok());
    }
}
