//! FailureReport - dispatcher output
//!
//! Partial batch failure report. Wire shape matches the queue's
//! `batchItemFailures` response.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::MessageId;

/// Identifiers the queue must redeliver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureReport {
    pub batch_item_failures: Vec<BatchItemFailure>,
}

/// One failed item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemFailure {
    pub item_identifier: MessageId,
}

impl FailureReport {
    /// Empty report (every item succeeded)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a report from failed ids, keeping first-seen order and
    /// dropping repeats.
    pub fn from_failed_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = MessageId>,
    {
        let mut seen = HashSet::new();
        let batch_item_failures = ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .map(|item_identifier| BatchItemFailure { item_identifier })
            .collect();

        Self {
            batch_item_failures,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.batch_item_failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.batch_item_failures.len()
    }

    /// Failed ids in report order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.batch_item_failures
            .iter()
            .map(|f| f.item_identifier.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids().any(|failed| failed == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_failed_ids_dedupes_in_order() {
        let report = FailureReport::from_failed_ids(
            ["b", "a", "b", "c"].into_iter().map(String::from),
        );
        assert_eq!(report.ids().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(report.len(), 3);
        assert!(report.contains("a"));
        assert!(!report.contains("z"));
    }

    #[test]
    fn test_wire_shape() {
        let report = FailureReport::from_failed_ids(vec!["2".to_string()]);
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"batchItemFailures":[{"itemIdentifier":"2"}]}"#);

        let empty = serde_json::to_string(&FailureReport::new()).unwrap();
        assert_eq!(empty, r#"{"batchItemFailures":[]}"#);
    }
}
