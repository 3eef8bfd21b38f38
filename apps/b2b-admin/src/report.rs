//! Per-run outcome tracking for invitation and enrollment runs

use serde::Serialize;

/// Status of a single processed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Mutation applied (user invited or added)
    Success,
    /// Nothing to do (already a member, already in the directory)
    Skipped,
    /// Mutation attempted and rejected
    Failed,
}

/// Result for a single item
#[derive(Debug, Clone, Serialize)]
pub struct ItemResult {
    /// Position in the processed list (0-based)
    pub index: usize,
    /// Principal name of the user
    pub name: String,
    /// Directory object ID, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub status: ItemStatus,
    /// Error or skip reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Type of operation performed
    pub operation: String,
    /// Items selected for processing
    pub total: usize,
    pub success_count: usize,
    pub skipped_count: usize,
    pub failure_count: usize,
    pub items: Vec<ItemResult>,
}

impl RunReport {
    pub fn new(operation: &str, total: usize) -> Self {
        Self {
            operation: operation.to_string(),
            total,
            success_count: 0,
            skipped_count: 0,
            failure_count: 0,
            items: Vec::with_capacity(total),
        }
    }

    pub fn add_success(&mut self, index: usize, name: String, id: Option<String>) {
        self.success_count += 1;
        self.items.push(ItemResult {
            index,
            name,
            id,
            status: ItemStatus::Success,
            detail: None,
        });
    }

    pub fn add_skipped(&mut self, index: usize, name: String, id: Option<String>, reason: String) {
        self.skipped_count += 1;
        self.items.push(ItemResult {
            index,
            name,
            id,
            status: ItemStatus::Skipped,
            detail: Some(reason),
        });
    }

    pub fn add_failure(&mut self, index: usize, name: String, id: Option<String>, error: String) {
        self.failure_count += 1;
        self.items.push(ItemResult {
            index,
            name,
            id,
            status: ItemStatus::Failed,
            detail: Some(error),
        });
    }

    /// Number of items with an outcome
    pub fn processed(&self) -> usize {
        self.success_count + self.skipped_count + self.failure_count
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count > 0
    }

    pub fn failed_items(&self) -> impl Iterator<Item = &ItemResult> {
        self.items
            .iter()
            .filter(|item| item.status == ItemStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_track_items() {
        let mut report = RunReport::new("enroll", 3);
        report.add_success(0, "a@x.com".to_string(), Some("1".to_string()));
        report.add_skipped(1, "b@x.com".to_string(), None, "already a member".to_string());
        report.add_failure(2, "c@x.com".to_string(), None, "boom".to_string());

        assert_eq!(report.processed(), report.total);
        assert_eq!(report.success_count, 1);
        assert_eq!(report.skipped_count, 1);
        assert!(report.has_failures());
        assert_eq!(report.failed_items().count(), 1);
    }

    #[test]
    fn test_report_serialization() {
        let mut report = RunReport::new("invite", 1);
        report.add_success(0, "a@x.com".to_string(), None);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["success_count"], 1);
        assert_eq!(json["items"][0]["status"], "success");
        assert!(json["items"][0].get("id").is_none());
        assert!(json["items"][0].get("detail").is_none());
    }
}
