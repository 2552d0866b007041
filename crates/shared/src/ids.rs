//! Identifier generation for complaints and audit transactions.
//!
//! Identifiers are date-prefixed so support staff can read the submission day
//! straight off the id, e.g. `CMP-20260825-7KQ3Z9`.

use chrono::{DateTime, Utc};

/// Prefix for complaint identifiers.
pub const COMPLAINT_ID_PREFIX: &str = "CMP";

/// Prefix for transaction identifiers.
pub const TRANSACTION_ID_PREFIX: &str = "TXN";

/// Length of the random suffix segment.
const SUFFIX_LEN: usize = 6;

const SUFFIX_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789"; // Avoiding confusing chars: 0, O, I, 1

/// Generate a complaint id for the given submission time.
pub fn complaint_id(submitted_at: DateTime<Utc>) -> String {
    prefixed_id(COMPLAINT_ID_PREFIX, submitted_at)
}

/// Generate a transaction id for the given entry time.
pub fn transaction_id(created_at: DateTime<Utc>) -> String {
    prefixed_id(TRANSACTION_ID_PREFIX, created_at)
}

fn prefixed_id(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}-{}", prefix, at.format("%Y%m%d"), random_suffix())
}

fn random_suffix() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..SUFFIX_CHARS.len());
            SUFFIX_CHARS[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_complaint_id_format() {
        let at = Utc.with_ymd_and_hms(2026, 8, 25, 10, 30, 0).unwrap();
        let id = complaint_id(at);

        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "CMP");
        assert_eq!(parts[1], "20260825");
        assert_eq!(parts[2].len(), SUFFIX_LEN);
    }

    #[test]
    fn test_transaction_id_format() {
        let at = Utc.with_ymd_and_hms(2025, 1, 3, 0, 0, 0).unwrap();
        let id = transaction_id(at);

        assert!(id.starts_with("TXN-20250103-"));
        assert_eq!(id.len(), "TXN-20250103-".len() + SUFFIX_LEN);
    }

    #[test]
    fn test_suffix_uses_unambiguous_charset() {
        let id = complaint_id(Utc::now());
        let suffix = id.rsplit('-').next().unwrap();

        for c in suffix.bytes() {
            assert!(SUFFIX_CHARS.contains(&c), "unexpected char {}", c as char);
        }
    }

    #[test]
    fn test_ids_are_unique_in_practice() {
        let at = Utc::now();
        let ids: std::collections::HashSet<String> =
            (0..200).map(|_| complaint_id(at)).collect();
        // 32^6 suffixes make a collision in 200 draws vanishingly unlikely
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_date_segment_uses_utc() {
        let at = Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap();
        let id = complaint_id(at);
        assert!(id.contains("-20261231-"));
    }
}
