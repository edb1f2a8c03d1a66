//! The conversation log: the single source of truth for displayed messages.

use crate::types::Message;

/// Observer invoked after every log mutation with the full message list.
pub type LogObserver = Box<dyn Fn(&[Message]) + Send + Sync>;

/// An ordered, append-biased collection of messages.
///
/// Insertion order is display order; the log is never re-sorted. Writes go
/// through the send coordinator, reads are shared with presentation via
/// [`ConversationLog::messages`] and the observer list. Observers are
/// notified after the mutation has been applied, never before.
#[derive(Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
    observers: Vec<LogObserver>,
}

impl ConversationLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for log mutations.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&[Message]) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Append a message at the end of the log.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.notify();
    }

    /// Insert the typing placeholder.
    ///
    /// Refuses a second placeholder while one is pending; returns whether
    /// the message was inserted.
    pub fn insert_placeholder(&mut self, placeholder: Message) -> bool {
        if self.has_pending() {
            return false;
        }
        self.messages.push(placeholder);
        self.notify();
        true
    }

    /// Resolve the pending placeholder with a final message.
    ///
    /// The resolution replaces the placeholder at its position, preserving
    /// order. If no placeholder exists the resolution is appended instead.
    pub fn resolve_pending(&mut self, resolution: Message) {
        match self.messages.iter().position(Message::is_pending) {
            Some(idx) => self.messages[idx] = resolution,
            None => self.messages.push(resolution),
        }
        self.notify();
    }

    /// Whether a typing placeholder is currently in the log.
    pub fn has_pending(&self) -> bool {
        self.messages.iter().any(Message::is_pending)
    }

    /// All messages, in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages in the log.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer(&self.messages);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MessageBody, MessageStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_append_preserves_order() {
        let mut log = ConversationLog::new();
        log.append(Message::user_text("u_1".to_string(), "first"));
        log.append(Message::user_text("u_2".to_string(), "second"));

        let ids: Vec<&str> = log.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["u_1", "u_2"]);
    }

    #[test]
    fn test_single_placeholder() {
        let mut log = ConversationLog::new();
        assert!(log.insert_placeholder(Message::typing("t_1".to_string(), "…")));
        assert!(!log.insert_placeholder(Message::typing("t_2".to_string(), "…")));

        let pending = log.messages().iter().filter(|m| m.is_pending()).count();
        assert_eq!(pending, 1);
    }

    #[test]
    fn test_resolve_replaces_in_place() {
        let mut log = ConversationLog::new();
        log.append(Message::user_text("u_1".to_string(), "hi"));
        log.insert_placeholder(Message::typing("t_1".to_string(), "…"));
        log.append(Message::user_text("u_2".to_string(), "and this"));

        log.resolve_pending(Message::assistant_text("ai_1".to_string(), "hello"));

        assert_eq!(log.len(), 3);
        assert!(!log.has_pending());
        let resolved = &log.messages()[1];
        assert_eq!(resolved.id, "ai_1");
        assert_eq!(resolved.status, MessageStatus::None);
    }

    #[test]
    fn test_resolve_without_placeholder_appends() {
        let mut log = ConversationLog::new();
        log.append(Message::user_text("u_1".to_string(), "hi"));

        log.resolve_pending(Message::assistant_text("ai_1".to_string(), "hello"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.messages()[1].id, "ai_1");
    }

    #[test]
    fn test_observer_sees_mutation_applied() {
        let mut log = ConversationLog::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_in_observer = Arc::clone(&seen);
        log.subscribe(move |messages| {
            seen_in_observer.store(messages.len(), Ordering::SeqCst);
        });

        log.append(Message::user_text("u_1".to_string(), "hi"));
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        log.insert_placeholder(Message::typing("t_1".to_string(), "…"));
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        log.resolve_pending(Message::assistant_text("ai_1".to_string(), "yo"));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert!(matches!(log.messages()[1].body, MessageBody::Text(_)));
    }
}
