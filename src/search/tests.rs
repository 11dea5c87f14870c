//! Search Module Tests
//!
//! Validates ranking, bounded selection, the suggester and the HTTP handlers.
//!
//! ## Test Scopes
//! - **Ranking**: Frequency descending, ties broken by term ascending.
//! - **TopK**: Keeps exactly the best K out of any offer order.
//! - **Suggester**: Prefix queries, clamping, global top.
//! - **Handlers**: Status codes and bodies, called directly without a server.

#[cfg(test)]
mod tests {
    use crate::index::{PrefixIndex, TermEntry};
    use crate::search::engine::{DEFAULT_MAX_SUGGESTIONS, RankedSuggester};
    use crate::search::handlers::{
        MAX_TERM_LENGTH, handle_init, handle_submit, handle_suggest, handle_top,
    };
    use crate::search::ranking::{TopK, rank_order};
    use crate::search::types::{
        AutocompleteResponse, ErrorResponse, SubmitTermRequest, SuggestParams, Suggestion,
        TopParams, limit_from,
    };
    use crate::service::AutocompleteService;
    use crate::storage::{MemoryTermStore, TermRecord};
    use crate::sync::{LocalBroadcast, UpdatePublisher};
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::response::Response;
    use axum::{Extension, Json};
    use std::cmp::Ordering;
    use std::sync::Arc;

    fn index_with(terms: &[(&str, u64)]) -> Arc<PrefixIndex> {
        let index = Arc::new(PrefixIndex::new());
        for (term, frequency) in terms {
            index.insert(term, *frequency);
        }
        index
    }

    // ============================================================
    // RANKING TESTS
    // ============================================================

    #[test]
    fn test_rank_order_frequency_first() {
        let high = Suggestion::new("zebra", 10);
        let low = Suggestion::new("apple", 2);

        assert_eq!(rank_order(&high, &low), Ordering::Less);
        assert_eq!(rank_order(&low, &high), Ordering::Greater);
    }

    #[test]
    fn test_rank_order_ties_by_term() {
        let a = Suggestion::new("ab", 5);
        let b = Suggestion::new("ac", 5);

        assert_eq!(rank_order(&a, &b), Ordering::Less);
        assert_eq!(rank_order(&a, &a.clone()), Ordering::Equal);
    }

    #[test]
    fn test_topk_keeps_best_regardless_of_order() {
        let offers = [("d", 1), ("a", 7), ("c", 7), ("b", 3), ("e", 9), ("f", 7)];

        let mut forward = TopK::new(3);
        for (term, frequency) in offers {
            forward.offer(term, frequency);
        }
        let mut backward = TopK::new(3);
        for (term, frequency) in offers.iter().rev() {
            backward.offer(term, *frequency);
        }

        let expected = vec![
            Suggestion::new("e", 9),
            Suggestion::new("a", 7),
            Suggestion::new("c", 7),
        ];
        assert_eq!(forward.into_sorted_vec(), expected);
        assert_eq!(backward.into_sorted_vec(), expected);
    }

    #[test]
    fn test_topk_fewer_offers_than_limit() {
        let mut top = TopK::new(10);
        top.offer("x", 1);
        top.offer("y", 2);

        assert_eq!(top.len(), 2);
        assert_eq!(
            top.into_sorted_vec(),
            vec![Suggestion::new("y", 2), Suggestion::new("x", 1)]
        );
    }

    #[test]
    fn test_topk_zero_limit() {
        let mut top = TopK::new(0);
        top.offer("x", 100);

        assert!(top.is_empty());
        assert!(top.into_sorted_vec().is_empty());
    }

    // ============================================================
    // SUGGESTER TESTS
    // ============================================================

    #[test]
    fn test_suggest_orders_subtree() {
        let index = index_with(&[("java", 2200), ("javascript", 2300), ("jakarta", 50)]);
        let suggester = RankedSuggester::new(index, DEFAULT_MAX_SUGGESTIONS);

        assert_eq!(
            suggester.suggest("JA", 10),
            vec![
                Suggestion::new("javascript", 2300),
                Suggestion::new("java", 2200),
                Suggestion::new("jakarta", 50),
            ]
        );
        assert_eq!(
            suggester.suggest("jav", 1),
            vec![Suggestion::new("javascript", 2300)]
        );
    }

    #[test]
    fn test_suggest_prefix_equal_to_term() {
        let index = index_with(&[("go", 4), ("golang", 8)]);
        let suggester = RankedSuggester::new(index, DEFAULT_MAX_SUGGESTIONS);

        let suggestions = suggester.suggest("go", 10);

        assert_eq!(
            suggestions,
            vec![Suggestion::new("golang", 8), Suggestion::new("go", 4)]
        );
        assert_eq!(suggester.suggest("golang", 10).len(), 1);
        assert!(suggester.suggest("golangs", 10).is_empty());
    }

    #[test]
    fn test_suggest_clamps_to_max() {
        let terms: Vec<(String, u64)> = (0..30u64).map(|i| (format!("w{:02}", i), i)).collect();
        let index = Arc::new(PrefixIndex::new());
        for (term, frequency) in &terms {
            index.insert(term, *frequency);
        }
        let suggester = RankedSuggester::new(index, 4);

        let suggestions = suggester.suggest("w", usize::MAX);

        assert_eq!(suggester.max_suggestions(), 4);
        assert_eq!(suggestions.len(), 4);
        assert_eq!(suggestions[0], Suggestion::new("w29", 29));
    }

    #[test]
    fn test_top_global_across_shards() {
        let index = index_with(&[("kafka", 3), ("rust", 9), ("axum", 9), ("tokio", 1)]);
        let suggester = RankedSuggester::new(index, 1);

        assert_eq!(
            suggester.top_global(3),
            vec![
                Suggestion::new("axum", 9),
                Suggestion::new("rust", 9),
                Suggestion::new("kafka", 3),
            ]
        );
        assert!(suggester.top_global(0).is_empty());
    }

    // ============================================================
    // TYPES TESTS
    // ============================================================

    #[test]
    fn test_limit_from() {
        assert_eq!(limit_from(None, 10), 10);
        assert_eq!(limit_from(Some(3), 10), 3);
        assert_eq!(limit_from(Some(0), 10), 0);
        assert_eq!(limit_from(Some(-5), 10), 0);
    }

    #[test]
    fn test_suggestion_from_entry() {
        let entry = TermEntry {
            term: "redis".to_string(),
            frequency: 1600,
        };

        assert_eq!(Suggestion::from(&entry), Suggestion::new("redis", 1600));
    }

    #[test]
    fn test_response_serialization() {
        let response = AutocompleteResponse {
            prefix: "re".to_string(),
            suggestions: vec![Suggestion::new("react", 2000)],
            execution_time_ms: 0,
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "prefix": "re",
                "suggestions": [{"term": "react", "frequency": 2000}],
                "execution_time_ms": 0
            })
        );
    }

    // ============================================================
    // HANDLER TESTS
    // ============================================================

    fn service_with(records: Vec<TermRecord>) -> Arc<AutocompleteService> {
        let store = Arc::new(MemoryTermStore::with_records(records.clone()));
        let index = Arc::new(PrefixIndex::new());
        for record in &records {
            index.insert(&record.term, record.frequency);
        }
        let publisher = UpdatePublisher::new(Arc::new(LocalBroadcast::new()), "handler-tests");
        Arc::new(AutocompleteService::new(index, store, publisher, 10))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_handle_suggest() {
        let service = service_with(vec![
            TermRecord::new("spring", 1600),
            TermRecord::new("spring boot", 300),
            TermRecord::new("sql", 10),
        ]);

        let (status, Json(body)) = handle_suggest(
            Extension(service),
            Query(SuggestParams {
                prefix: "spr".to_string(),
                limit: Some(5),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.prefix, "spr");
        assert_eq!(
            body.suggestions,
            vec![
                Suggestion::new("spring", 1600),
                Suggestion::new("spring boot", 300),
            ]
        );
    }

    #[tokio::test]
    async fn test_handle_suggest_negative_limit() {
        let service = service_with(vec![TermRecord::new("sql", 10)]);

        let (status, Json(body)) = handle_suggest(
            Extension(service),
            Query(SuggestParams {
                prefix: "s".to_string(),
                limit: Some(-1),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_handle_submit_counts_term() {
        let service = service_with(vec![]);

        let response = handle_submit(
            Extension(service.clone()),
            Json(SubmitTermRequest {
                term: "Docker".to_string(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["term"], "docker");
        assert_eq!(body["frequency"], 1);
        assert_eq!(service.index().frequency_of("docker"), Some(1));
    }

    #[tokio::test]
    async fn test_handle_submit_rejects_invalid_terms() {
        let service = service_with(vec![]);

        for term in ["   ".to_string(), "x".repeat(MAX_TERM_LENGTH + 1)] {
            let response =
                handle_submit(Extension(service.clone()), Json(SubmitTermRequest { term })).await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body: ErrorResponse = serde_json::from_value(body_json(response).await).unwrap();
            assert!(!body.partially_durable);
        }
        assert!(service.index().is_empty());
    }

    #[tokio::test]
    async fn test_handle_submit_accepts_max_length() {
        let service = service_with(vec![]);

        let response = handle_submit(
            Extension(service),
            Json(SubmitTermRequest {
                term: "y".repeat(MAX_TERM_LENGTH),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_handle_top_and_init() {
        let service = service_with(vec![]);

        let (status, Json(body)) = handle_init(Extension(service.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.seeded, 23);

        let (status, Json(top)) =
            handle_top(Extension(service.clone()), Query(TopParams { limit: Some(3) })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            top,
            vec![
                Suggestion::new("javascript", 2300),
                Suggestion::new("java", 2200),
                Suggestion::new("python", 2100),
            ]
        );

        let (_, Json(again)) = handle_init(Extension(service)).await;
        assert_eq!(again.seeded, 0);
    }
}
