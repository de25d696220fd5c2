//! The report index — the single source of truth for ledger ordering.
//!
//! One index record exists per store. It lists every successfully appended
//! report id in creation order and remembers the last chapter number handed
//! out. Creation order and chapter order are recorded independently so each
//! stays auditable on its own; the index is never reconstructed by sorting
//! timestamps.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, evidence::Evidence, report::Report};

/// The singleton ordering record for a case ledger.
///
/// Serialised field names (`order`, `lastChapterIndex`) are part of the
/// persisted layout and must not change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportIndex {
  /// Ids of all reports ever appended, each exactly once, in creation order.
  pub order: Vec<Uuid>,

  /// Chapter index of the most recently appended report; 0 when empty.
  #[serde(rename = "lastChapterIndex")]
  pub last_chapter_index: u32,
}

impl ReportIndex {
  /// Record an append: reserve the next chapter number for `report_id` and
  /// push it onto the order list.
  ///
  /// Chapter numbers start at 1 and never repeat, even across bulk clears
  /// of individual reports — the counter only resets when the whole ledger
  /// is cleared.
  pub fn assign_next(&mut self, report_id: Uuid) -> u32 {
    let chapter = self.last_chapter_index + 1;
    self.order.push(report_id);
    self.last_chapter_index = chapter;
    chapter
  }

  /// Rebuild from the two persisted meta columns.
  pub fn from_parts(order_json: &str, last_chapter_index: u32) -> Result<Self> {
    Ok(Self {
      order: serde_json::from_str(order_json)?,
      last_chapter_index,
    })
  }

  /// The order list serialised for the persisted meta record.
  pub fn order_json(&self) -> Result<String> {
    Ok(serde_json::to_string(&self.order)?)
  }
}

/// The result of [`crate::store::CaseStore::get_all_indexed`]: reports in
/// ledger order plus the evidence they reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseSnapshot {
  /// Ordered exactly per [`ReportIndex::order`].
  pub reports:  Vec<Report>,
  /// Restricted to evidence referenced by at least one returned report,
  /// in first-reference order.
  pub evidence: Vec<Evidence>,
}

impl CaseSnapshot {
  pub fn empty() -> Self {
    Self { reports: Vec::new(), evidence: Vec::new() }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn assign_next_counts_from_one() {
    let mut index = ReportIndex::default();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    assert_eq!(index.assign_next(a), 1);
    assert_eq!(index.assign_next(b), 2);
    assert_eq!(index.order, vec![a, b]);
    assert_eq!(index.last_chapter_index, 2);
  }

  #[test]
  fn meta_columns_roundtrip() {
    let mut index = ReportIndex::default();
    index.assign_next(Uuid::new_v4());
    index.assign_next(Uuid::new_v4());

    let rebuilt = ReportIndex::from_parts(
      &index.order_json().unwrap(),
      index.last_chapter_index,
    )
    .unwrap();
    assert_eq!(rebuilt, index);
  }

  #[test]
  fn persisted_field_names_are_stable() {
    let mut index = ReportIndex::default();
    let id = Uuid::nil();
    index.assign_next(id);

    let json = serde_json::to_value(&index).unwrap();
    assert!(json.get("order").is_some());
    assert_eq!(json.get("lastChapterIndex").unwrap(), 1);
  }
}
