//! Process-unique message identifiers.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Generates message ids of the form `{prefix}_{millis}_{suffix}`.
///
/// The millisecond component is kept monotonically non-decreasing even if
/// the wall clock steps backwards, and the random suffix disambiguates ids
/// generated within the same millisecond.
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    last_millis: AtomicI64,
}

impl MessageIdGenerator {
    /// Create a new generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next id for the given prefix.
    pub fn next(&self, prefix: &str) -> String {
        let now = Utc::now().timestamp_millis();
        let prev = self.last_millis.fetch_max(now, Ordering::SeqCst);
        let millis = prev.max(now);

        let entropy = uuid::Uuid::new_v4().simple().to_string();
        format!("{}_{}_{}", prefix, millis, &entropy[..5])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let generator = MessageIdGenerator::new();
        let ids: HashSet<String> = (0..1000).map(|_| generator.next("u")).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_id_shape() {
        let generator = MessageIdGenerator::new();
        let id = generator.next("ai");
        let parts: Vec<&str> = id.splitn(3, '_').collect();
        assert_eq!(parts[0], "ai");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 5);
    }

    #[test]
    fn test_millis_never_decrease() {
        let generator = MessageIdGenerator::new();
        let take_millis = |id: String| -> i64 {
            id.split('_').nth(1).unwrap().parse().unwrap()
        };
        let mut last = 0;
        for _ in 0..100 {
            let millis = take_millis(generator.next("u"));
            assert!(millis >= last);
            last = millis;
        }
    }
}
