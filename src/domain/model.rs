use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// One row of the source feed, keyed by column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, String>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.data.get(column).map(String::as_str)
    }
}

/// Tabular data parsed from the source feed. Column order is shared by all
/// records and comes from the CSV header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Handle to the rendered workbook sitting in storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub size_bytes: usize,
}

/// Failure policy for the dispatch step: how many times to retry after the
/// first attempt, and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 1,
            delay: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_get_returns_field_value() {
        let mut data = HashMap::new();
        data.insert("name".to_string(), "Alice".to_string());
        let record = Record { data };

        assert_eq!(record.get("name"), Some("Alice"));
        assert_eq!(record.get("age"), None);
    }

    #[test]
    fn test_dataset_len_and_columns() {
        let dataset = Dataset {
            columns: vec!["name".to_string(), "age".to_string()],
            records: vec![Record {
                data: HashMap::new(),
            }],
        };

        assert_eq!(dataset.len(), 1);
        assert!(!dataset.is_empty());
        assert_eq!(dataset.column_count(), 2);
    }

    #[test]
    fn test_default_retry_policy_is_one_retry_after_five_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 1);
        assert_eq!(policy.delay, Duration::from_secs(5));
    }
}
