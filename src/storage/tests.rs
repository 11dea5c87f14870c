//! Storage Module Tests
//!
//! ## Test Scopes
//! - **MemoryTermStore**: Upsert-increment semantics, ordered reads, prefix reads.
//! - **FileTermStore**: Snapshot persistence across reopen, corrupt-file detection,
//!   rollback when the snapshot cannot be written.
//! - **Serialization**: Row JSON compatibility.

#[cfg(test)]
mod tests {
    use crate::storage::{
        FileTermStore, MemoryTermStore, StoreError, TermRecord, TermStore, order_by_frequency,
    };
    use std::sync::Arc;

    fn terms(records: &[TermRecord]) -> Vec<(&str, u64)> {
        records
            .iter()
            .map(|record| (record.term.as_str(), record.frequency))
            .collect()
    }

    // ============================================================
    // MEMORY STORE
    // ============================================================

    #[test]
    fn test_upsert_increment_creates_with_one() {
        let store = MemoryTermStore::new();

        let row = store.upsert_increment("nodejs").unwrap();

        assert_eq!(row.term, "nodejs");
        assert_eq!(row.frequency, 1);
        assert_eq!(store.find_by_term("nodejs").unwrap(), Some(row));
    }

    #[test]
    fn test_upsert_increment_bumps_existing() {
        let store = MemoryTermStore::new();

        store.upsert_increment("nodejs").unwrap();
        store.upsert_increment("nodejs").unwrap();
        let row = store.upsert_increment("nodejs").unwrap();

        assert_eq!(row.frequency, 3);
        assert!(row.last_used >= row.created_at);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_find_by_term_missing_is_none() {
        let store = MemoryTermStore::new();

        assert_eq!(store.find_by_term("missing").unwrap(), None);
    }

    #[test]
    fn test_ordered_read_breaks_ties_by_term() {
        let store = MemoryTermStore::with_records(vec![
            TermRecord::new("b", 5),
            TermRecord::new("c", 9),
            TermRecord::new("a", 5),
            TermRecord::new("d", 1),
        ]);

        let ordered = store.find_all_ordered_by_frequency_desc().unwrap();

        assert_eq!(terms(&ordered), vec![("c", 9), ("a", 5), ("b", 5), ("d", 1)]);
    }

    #[test]
    fn test_prefix_read_is_normalized_and_ordered() {
        let store = MemoryTermStore::with_records(vec![
            TermRecord::new("react", 10),
            TermRecord::new("react native", 30),
            TermRecord::new("redis", 50),
            TermRecord::new("rust", 5),
        ]);

        let rows = store.find_by_prefix_ordered("  REA").unwrap();

        assert_eq!(terms(&rows), vec![("react native", 30), ("react", 10)]);
    }

    #[test]
    fn test_parallel_upserts_are_not_lost() {
        let store = Arc::new(MemoryTermStore::new());
        let mut handles = Vec::new();

        for _ in 0..4 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..250 {
                    store.upsert_increment("mongodb").unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.find_by_term("mongodb").unwrap().unwrap().frequency, 1000);
    }

    #[test]
    fn test_order_by_frequency_helper() {
        let mut records = vec![TermRecord::new("x", 1), TermRecord::new("y", 2)];

        order_by_frequency(&mut records);

        assert_eq!(records[0].term, "y");
    }

    // ============================================================
    // FILE STORE
    // ============================================================

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terms.json");

        {
            let store = FileTermStore::open(&path).unwrap();
            store.upsert_increment("postgresql").unwrap();
            store.upsert_increment("postgresql").unwrap();
            store.save(TermRecord::new("mysql", 40)).unwrap();
        }

        let reopened = FileTermStore::open(&path).unwrap();

        assert_eq!(reopened.count().unwrap(), 2);
        assert_eq!(
            reopened.find_by_term("postgresql").unwrap().unwrap().frequency,
            2
        );
        assert_eq!(
            terms(&reopened.find_all_ordered_by_frequency_desc().unwrap()),
            vec![("mysql", 40), ("postgresql", 2)]
        );
    }

    #[test]
    fn test_file_store_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();

        let store = FileTermStore::open(dir.path().join("nested").join("terms.json")).unwrap();

        assert_eq!(store.count().unwrap(), 0);
        store.upsert_increment("flask").unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_file_store_rejects_corrupt_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terms.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let result = FileTermStore::open(&path);

        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[test]
    fn test_file_store_rolls_back_failed_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terms.json");
        let store = FileTermStore::open(&path).unwrap();
        store.upsert_increment("vue").unwrap();

        // A non-empty directory at the snapshot path makes the atomic rename fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"x").unwrap();

        let result = store.upsert_increment("vue");

        assert!(matches!(result, Err(StoreError::Io(_))));
        assert_eq!(store.find_by_term("vue").unwrap().unwrap().frequency, 1);
    }

    // ============================================================
    // SERIALIZATION
    // ============================================================

    #[test]
    fn test_term_record_serialization() {
        let record = TermRecord {
            term: "google cloud".to_string(),
            frequency: 300,
            created_at: 1_700_000_000_000,
            last_used: 1_700_000_000_500,
        };

        let json = serde_json::to_string(&record).unwrap();
        let restored: TermRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, record);
        assert!(json.contains("\"frequency\":300"));
    }
}
