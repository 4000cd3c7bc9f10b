//! Cross-crate end-to-end scenarios.

#[cfg(test)]
mod contract_tests {
    use contracts::{FailureReport, Message, MessageKind};

    #[test]
    fn test_report_matches_queue_response_shape() {
        let report = FailureReport::from_failed_ids(vec!["m-2".to_string()]);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "batchItemFailures": [{ "itemIdentifier": "m-2" }] })
        );
    }

    #[test]
    fn test_recognized_tags() {
        for tag in ["ORDER_CREATED", "USER_REGISTERED", "NOTIFICATION", "TEST_MESSAGE"] {
            let body = format!(r#"{{"type":"{tag}","data":{{}}}}"#);
            let payload = Message::new("id", body).decode().unwrap();
            assert!(payload.kind.is_recognized(), "{tag} not recognized");
            assert_eq!(payload.kind, MessageKind::parse(tag));
        }
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::time::Duration;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{InvocationContext, Message};
    use dispatcher::create_dispatcher;

    const SETTINGS: &str = r#"
environment = "test"

[dispatcher]
max_concurrency = 4
deadline_margin_ms = 100

[handlers]
order_created_delay_ms = 100
user_registered_delay_ms = 150
notification_delay_ms = 50
"#;

    fn message(id: &str, kind: &str) -> Message {
        Message::new(id, format!(r#"{{"type":"{kind}","data":{{"id":"{id}"}}}}"#))
    }

    /// End-to-end: settings file -> dispatcher -> report
    #[tokio::test(start_paused = true)]
    async fn test_e2e_mixed_batch() {
        let settings = ConfigLoader::load_from_str(SETTINGS, ConfigFormat::Toml).unwrap();
        let dispatcher = create_dispatcher(&settings).unwrap();

        let batch = vec![
            Message::new("1", r#"{"type":"TEST_MESSAGE","data":{}}"#),
            Message::new("2", "not-json"),
            Message::new("3", r#"{"type":"UNKNOWN_X","data":{}}"#),
            message("4", "ORDER_CREATED"),
            message("5", "USER_REGISTERED"),
            message("6", "NOTIFICATION"),
        ];
        let ctx = InvocationContext::new("e2e").with_remaining(Duration::from_secs(30));

        let report = dispatcher.process_batch(batch, &ctx).await;

        assert_eq!(report.ids().collect::<Vec<_>>(), vec!["2"]);
        let snapshot = dispatcher.metrics();
        assert_eq!(snapshot.succeeded, 5);
        assert_eq!(snapshot.unrecognized, 1);
        assert_eq!(snapshot.malformed, 1);
    }

    /// Budget shorter than the slowest handler: unfinished work is redelivered
    #[tokio::test(start_paused = true)]
    async fn test_e2e_budget_exhaustion() {
        let settings = ConfigLoader::load_from_str(SETTINGS, ConfigFormat::Toml).unwrap();
        let dispatcher = create_dispatcher(&settings).unwrap();

        let batch = vec![
            message("notify", "NOTIFICATION"),
            message("order", "ORDER_CREATED"),
            message("user", "USER_REGISTERED"),
        ];
        // 220ms budget - 100ms margin = 120ms: notification (50) and order (100) finish
        let ctx = InvocationContext::new("e2e").with_remaining(Duration::from_millis(220));

        let report = dispatcher.process_batch(batch, &ctx).await;

        assert_eq!(report.ids().collect::<Vec<_>>(), vec!["user"]);
        assert_eq!(dispatcher.metrics().timed_out, 1);
    }

    /// One dispatcher serves consecutive invocations without carrying state
    #[tokio::test(start_paused = true)]
    async fn test_e2e_warm_reuse() {
        let settings = ConfigLoader::load_from_str(SETTINGS, ConfigFormat::Toml).unwrap();
        let dispatcher = create_dispatcher(&settings).unwrap();

        let first = dispatcher
            .process_batch(vec![Message::new("x", "{")], &InvocationContext::new("r1"))
            .await;
        let second = dispatcher
            .process_batch(vec![message("x", "TEST_MESSAGE")], &InvocationContext::new("r2"))
            .await;

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(dispatcher.metrics().batches, 2);
    }
}

#[cfg(test)]
mod secret_cache_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::ContractError;
    use secret_cache::{ManualClock, SecretCache, SecretSource, DEFAULT_TTL};

    #[derive(Clone, Default)]
    struct CountingSource {
        fetches: Arc<AtomicUsize>,
    }

    impl SecretSource for CountingSource {
        async fn fetch(&self, name: &str) -> Result<String, ContractError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{name}-value"))
        }
    }

    /// Cache owned by the caller survives across simulated invocations
    #[tokio::test]
    async fn test_cache_reused_across_invocations() {
        let source = CountingSource::default();
        let clock = ManualClock::new();
        let mut cache = SecretCache::with_clock(source.clone(), clock.clone(), DEFAULT_TTL);

        for _ in 0..3 {
            assert_eq!(cache.get("api-key").await.unwrap(), "api-key-value");
            clock.advance(Duration::from_secs(60));
        }
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);

        clock.advance(Duration::from_secs(180));
        cache.get("api-key").await.unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }
}
