//! Text scanners shared by the detectors.
//!
//! Both scanners return sorted, de-duplicated results so that detector
//! output — and therefore explanation text — is identical on every pass
//! regardless of input order.

use std::{collections::BTreeSet, sync::OnceLock};

use chrono::NaiveDate;
use regex::Regex;

fn iso_date_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").expect("valid literal regex")
  })
}

fn slash_date_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("valid literal regex")
  })
}

fn reference_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    // "see 12", "Exhibit A-7", "attachment 3b" — the token must carry a
    // digit so prose like "see the attached letter" is not a reference.
    Regex::new(
      r"(?i)\b(?:see|exhibit|attachment)\s+([A-Za-z]{1,3}-?\d+[A-Za-z0-9-]*|\d+[A-Za-z0-9-]*)",
    )
    .expect("valid literal regex")
  })
}

/// Calendar dates mentioned in `text` (ISO `YYYY-MM-DD` and US `M/D/YYYY`),
/// sorted and de-duplicated. Impossible dates are skipped.
pub fn mentioned_dates(text: &str) -> Vec<NaiveDate> {
  let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();

  for caps in iso_date_re().captures_iter(text) {
    if let (Ok(y), Ok(m), Ok(d)) =
      (caps[1].parse::<i32>(), caps[2].parse::<u32>(), caps[3].parse::<u32>())
      && let Some(date) = NaiveDate::from_ymd_opt(y, m, d)
    {
      dates.insert(date);
    }
  }

  for caps in slash_date_re().captures_iter(text) {
    if let (Ok(m), Ok(d), Ok(y)) =
      (caps[1].parse::<u32>(), caps[2].parse::<u32>(), caps[3].parse::<i32>())
      && let Some(date) = NaiveDate::from_ymd_opt(y, m, d)
    {
      dates.insert(date);
    }
  }

  dates.into_iter().collect()
}

/// Tokens named by reference phrases ("see", "exhibit", "attachment"),
/// case-folded, sorted and de-duplicated.
pub fn referenced_tokens(text: &str) -> Vec<String> {
  let mut tokens: BTreeSet<String> = BTreeSet::new();
  for caps in reference_re().captures_iter(text) {
    tokens.insert(caps[1].to_lowercase());
  }
  tokens.into_iter().collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn finds_iso_dates() {
    let dates = mentioned_dates("invoiced on 2024-03-15, due 2024-04-01");
    assert_eq!(
      dates,
      vec![
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
      ]
    );
  }

  #[test]
  fn finds_slash_dates() {
    let dates = mentioned_dates("signed 3/15/2024");
    assert_eq!(dates, vec![NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()]);
  }

  #[test]
  fn skips_impossible_dates() {
    assert!(mentioned_dates("ref 2024-13-40 and 13/32/2024").is_empty());
  }

  #[test]
  fn duplicate_dates_collapse() {
    let dates = mentioned_dates("2024-01-05 again 2024-01-05 and 1/5/2024");
    assert_eq!(dates.len(), 1);
  }

  #[test]
  fn finds_exhibit_tokens() {
    let tokens = referenced_tokens("as shown in Exhibit A-7 and attachment 3b");
    assert_eq!(tokens, vec!["3b".to_string(), "a-7".to_string()]);
  }

  #[test]
  fn prose_after_see_is_not_a_reference() {
    assert!(referenced_tokens("see the attached letter for details").is_empty());
  }

  #[test]
  fn tokens_are_case_folded() {
    assert_eq!(referenced_tokens("SEE EXHIBIT B-12"), vec!["b-12".to_string()]);
  }
}
