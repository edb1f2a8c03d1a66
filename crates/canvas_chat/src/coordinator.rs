//! Send coordinator: the single-flight send state machine.
//!
//! One coordinator owns one conversation session: the log, the composer
//! draft and the anti-double-submit guard. `send()` drives a complete send
//! operation - draft snapshot, user-message drain, typing placeholder,
//! gateway round trip, placeholder resolution - and always terminates in
//! either a success or a failure resolution, never in limbo.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::composer::ComposerDraft;
use crate::config::ChatConfig;
use crate::error::ChatResult;
use crate::gateway::{Attachment, OutboundPayload, TransportGateway};
use crate::ids::MessageIdGenerator;
use crate::log::ConversationLog;
use crate::types::{MediaRef, Message};

/// Outcome of one `send()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The reply resolved the placeholder.
    Delivered,
    /// The gateway failed; the placeholder was resolved with the failure reply.
    Failed,
    /// Nothing was staged; the log was left untouched.
    EmptyDraft,
    /// Another send is in flight; this call was dropped.
    Busy,
}

/// Orchestrates send operations for one conversation session.
pub struct SendCoordinator<G: TransportGateway> {
    gateway: G,
    config: ChatConfig,
    ids: MessageIdGenerator,
    composer: Mutex<ComposerDraft>,
    log: Mutex<ConversationLog>,
    in_flight: AtomicBool,
}

impl<G: TransportGateway> SendCoordinator<G> {
    /// Create a coordinator for a fresh session.
    pub fn new(gateway: G, config: ChatConfig) -> Self {
        Self {
            gateway,
            config,
            ids: MessageIdGenerator::new(),
            composer: Mutex::new(ComposerDraft::new()),
            log: Mutex::new(ConversationLog::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Replace the draft text.
    pub fn set_text(&self, text: impl Into<String>) {
        self.composer().set_text(text);
    }

    /// Stage images up to the configured maximum.
    pub fn stage_images<I>(&self, paths: I)
    where
        I: IntoIterator<Item = MediaRef>,
    {
        let max = self.config.max_staged_images;
        self.composer().stage_images(paths, max);
    }

    /// Stage the recorded audio clip.
    pub fn stage_audio(&self, path: impl Into<MediaRef>) -> ChatResult<()> {
        self.composer().stage_audio(path)
    }

    /// Snapshot of the conversation log, in display order.
    pub fn messages(&self) -> Vec<Message> {
        self.log().messages().to_vec()
    }

    /// Register an observer for log mutations.
    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(&[Message]) + Send + Sync + 'static,
    {
        self.log().subscribe(observer);
    }

    /// Whether a send operation is currently in flight.
    pub fn is_sending(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Run one send operation end-to-end.
    ///
    /// A call while another send is in flight is dropped, not queued. The
    /// draft is cleared before any network I/O, so the composer is ready
    /// for new input regardless of network latency.
    pub async fn send(&self) -> SendOutcome {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!("send dropped: another operation is in flight");
            return SendOutcome::Busy;
        }

        // Released on drop, so the guard comes off on every exit path:
        // success, failure, a panicking gateway, or this future being
        // dropped mid-flight.
        let _guard = InFlightGuard {
            in_flight: &self.in_flight,
            log: &self.log,
            ids: &self.ids,
            failure_reply: &self.config.failure_reply,
        };

        self.perform_send().await
    }

    async fn perform_send(&self) -> SendOutcome {
        // Snapshot and normalize the draft, then clear it. The empty check
        // happens before the clear so an empty send leaves the draft alone.
        let draft = {
            let mut composer = self.composer();
            let text = normalize_text(composer.text(), self.config.max_text_chars);
            if text.is_empty()
                && composer.staged_images().is_empty()
                && composer.staged_audio().is_none()
            {
                return SendOutcome::EmptyDraft;
            }
            let mut draft = composer.take();
            draft.set_text(text);
            draft
        };

        let (payload, placeholder_id) = {
            let mut log = self.log();

            // Drain the draft into the log: text first, then images in
            // selection order, then audio.
            if !draft.text().is_empty() {
                log.append(Message::user_text(self.ids.next("u"), draft.text()));
            }
            for src in draft.staged_images() {
                log.append(Message::user_image(self.ids.next("u"), src.clone()));
            }
            if let Some(src) = draft.staged_audio() {
                log.append(Message::user_audio(self.ids.next("u"), src.clone()));
            }

            let placeholder_id = self.ids.next("ai");
            log.insert_placeholder(Message::typing(
                placeholder_id.clone(),
                self.config.typing_indicator.clone(),
            ));

            (build_payload(&draft), placeholder_id)
        };

        tracing::debug!(
            placeholder = %placeholder_id,
            images = payload.images.len(),
            has_text = payload.text.is_some(),
            has_audio = payload.audio.is_some(),
            "delivering payload"
        );

        // No lock is held across the round trip.
        let result = self
            .gateway
            .deliver(payload, self.config.request_timeout())
            .await;

        match result {
            Ok(reply) => {
                let mut log = self.log();
                let text = reply.reply_text.unwrap_or_default();
                log.resolve_pending(Message::assistant_text(self.ids.next("ai"), text));
                if let Some(image) = reply.generated_image {
                    log.append(Message::assistant_image(self.ids.next("ai"), image));
                }
                SendOutcome::Delivered
            }
            Err(error) => {
                tracing::warn!(%error, "gateway delivery failed");
                self.log().resolve_pending(Message::assistant_text(
                    self.ids.next("ai"),
                    self.config.failure_reply.clone(),
                ));
                SendOutcome::Failed
            }
        }
    }

    fn composer(&self) -> MutexGuard<'_, ComposerDraft> {
        self.composer.lock().expect("composer state poisoned")
    }

    fn log(&self) -> MutexGuard<'_, ConversationLog> {
        self.log.lock().expect("conversation log poisoned")
    }
}

/// Releases the single-flight guard when a send operation ends, however it
/// ends. If the operation was torn down between placeholder insertion and
/// resolution (a gateway panic, or the send future dropped mid-flight), the
/// stranded placeholder is resolved with the failure reply so the log never
/// keeps a pending entry with no operation behind it.
struct InFlightGuard<'a> {
    in_flight: &'a AtomicBool,
    log: &'a Mutex<ConversationLog>,
    ids: &'a MessageIdGenerator,
    failure_reply: &'a str,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        // A poisoned log means a panic with the lock held; skip the cleanup
        // rather than panic again inside drop.
        if let Ok(mut log) = self.log.lock() {
            if log.has_pending() {
                tracing::warn!("send operation torn down mid-flight, resolving placeholder");
                log.resolve_pending(Message::assistant_text(
                    self.ids.next("ai"),
                    self.failure_reply,
                ));
            }
        }
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

/// Collapse whitespace runs to single spaces, trim, and cap the length.
fn normalize_text(raw: &str, max_chars: usize) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(max_chars).collect()
}

/// Assemble the multi-part payload from a drained draft.
fn build_payload(draft: &ComposerDraft) -> OutboundPayload {
    OutboundPayload {
        text: (!draft.text().is_empty()).then(|| draft.text().to_string()),
        images: draft
            .staged_images()
            .iter()
            .map(|src| Attachment::from_ref(src.as_str()))
            .collect(),
        audio: draft
            .staged_audio()
            .map(|src| Attachment::from_ref(src.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  hello   world \n", 500), "hello world");
        assert_eq!(normalize_text("\t \n ", 500), "");
        assert_eq!(normalize_text("abcdef", 3), "abc");
    }

    #[test]
    fn test_normalize_truncates_on_char_boundary() {
        let raw = "héllo wörld";
        let capped = normalize_text(raw, 7);
        assert_eq!(capped, "héllo w");
    }

    #[test]
    fn test_build_payload_skips_empty_fields() {
        let mut draft = ComposerDraft::new();
        draft.stage_images(vec!["a.png".to_string()], 6);

        let payload = build_payload(&draft);
        assert!(payload.text.is_none());
        assert_eq!(payload.images.len(), 1);
        assert!(payload.audio.is_none());
    }
}
