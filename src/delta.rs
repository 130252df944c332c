/// Deferred Stash mutations, replayed in one pass when the list is consumed
use crate::error::{Result, StashError};
use crate::stash::{Stash, bump_within, move_to_front};
use crate::urls::{deduplicate, is_url, is_well_formed_url, sanitize_url};
use serde::{Deserialize, Serialize};

/// Stored form of a pending change: `{ "type": "BUMP", "url": ..., "bumpAmount": 2 }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bump_amount: Option<i64>,
}

/// A validated pending change
#[derive(Debug, Clone, PartialEq)]
pub enum Delta {
    Add { url: String },
    Remove { url: String },
    Bump { url: String, amount: i64 },
}

impl Delta {
    pub fn url(&self) -> &str {
        match self {
            Delta::Add { url } | Delta::Remove { url } | Delta::Bump { url, .. } => url,
        }
    }

    /// Replay this change onto `list`. Removing or bumping an absent URL
    /// leaves the list alone.
    fn apply_to(&self, list: &mut Stash) {
        match self {
            Delta::Add { url } => move_to_front(list, url),
            Delta::Remove { url } => list.retain(|x| x != url),
            Delta::Bump { url, amount } => {
                bump_within(list, url, *amount);
            }
        }
    }
}

impl TryFrom<&DeltaRecord> for Delta {
    type Error = StashError;

    fn try_from(record: &DeltaRecord) -> Result<Delta> {
        let url = record.url.clone();
        match record.kind.as_str() {
            "ADD" => Ok(Delta::Add { url }),
            "REMOVE" => Ok(Delta::Remove { url }),
            "BUMP" => record
                .bump_amount
                .map(|amount| Delta::Bump { url, amount })
                .ok_or(StashError::MissingBumpAmount),
            other => Err(StashError::UnsupportedDelta(other.to_string())),
        }
    }
}

impl From<&Delta> for DeltaRecord {
    fn from(delta: &Delta) -> DeltaRecord {
        let (kind, bump_amount) = match delta {
            Delta::Add { .. } => ("ADD", None),
            Delta::Remove { .. } => ("REMOVE", None),
            Delta::Bump { amount, .. } => ("BUMP", Some(*amount)),
        };
        DeltaRecord {
            kind: kind.to_string(),
            url: delta.url().to_string(),
            bump_amount,
        }
    }
}

/// Validate `record` and append it to `queue`. ADD records are stored
/// with the query string stripped.
pub fn enqueue(queue: &mut Vec<DeltaRecord>, mut record: DeltaRecord) -> Result<()> {
    let delta = Delta::try_from(&record)?;
    if let Delta::Add { url } = &delta {
        if !is_well_formed_url(url) {
            return Err(StashError::InvalidInput(format!(
                "could not add {:?} because it is not a valid http(s) URL",
                url
            )));
        }
        record.url = sanitize_url(url);
    }

    queue.push(record);
    Ok(())
}

/// Replay `deltas` in order over a copy of `base`
pub fn apply_all(base: &[String], deltas: &[DeltaRecord]) -> Result<Stash> {
    let mut list = base.to_vec();
    for record in deltas {
        Delta::try_from(record)?.apply_to(&mut list);
    }
    Ok(list)
}

/// Outcome of folding the pending queue into a base list
#[derive(Debug, Clone, PartialEq)]
pub struct Materialized {
    pub stash: Stash,
    /// Records that could not be replayed and were dropped
    pub rejected: usize,
}

/// Replay every valid record, drop the rest, then keep only sanitized,
/// unique http(s) entries.
pub fn materialize_list(base: &[String], deltas: &[DeltaRecord]) -> Materialized {
    let mut list = base.to_vec();
    let mut rejected = 0;

    for record in deltas {
        match Delta::try_from(record) {
            Ok(delta) => delta.apply_to(&mut list),
            Err(e) => {
                log::warn!("Dropping pending delta for {}: {}", record.url, e);
                rejected += 1;
            }
        }
    }

    let cleaned = list
        .into_iter()
        .filter(|x| is_url(x))
        .map(|x| sanitize_url(&x))
        .collect();

    Materialized {
        stash: deduplicate(cleaned),
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str, url: &str, bump_amount: Option<i64>) -> DeltaRecord {
        DeltaRecord {
            kind: kind.to_string(),
            url: url.to_string(),
            bump_amount,
        }
    }

    fn list(urls: &[&str]) -> Stash {
        urls.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn test_add_remove_add_nets_to_single_front_entry() {
        let base = list(&["https://b.com", "https://c.com"]);
        let deltas = vec![
            record("ADD", "https://a.com", None),
            record("REMOVE", "https://a.com", None),
            record("ADD", "https://a.com", None),
        ];

        let result = materialize_list(&base, &deltas);

        assert_eq!(result.stash, list(&["https://a.com", "https://b.com", "https://c.com"]));
        assert_eq!(result.rejected, 0);
    }

    #[test]
    fn test_apply_all_does_not_mutate_input() {
        let base = list(&["https://a.com", "https://b.com"]);
        let deltas = vec![record("REMOVE", "https://a.com", None)];

        let result = apply_all(&base, &deltas).unwrap();

        assert_eq!(result, list(&["https://b.com"]));
        assert_eq!(base, list(&["https://a.com", "https://b.com"]));
    }

    #[test]
    fn test_apply_all_bump_uses_clamped_index() {
        let base = list(&["https://a.com", "https://b.com", "https://c.com"]);
        let deltas = vec![
            record("BUMP", "https://c.com", Some(1)),
            record("BUMP", "https://a.com", Some(-10)),
        ];

        let result = apply_all(&base, &deltas).unwrap();

        assert_eq!(result, list(&["https://c.com", "https://b.com", "https://a.com"]));
    }

    #[test]
    fn test_apply_all_rejects_unknown_type() {
        let deltas = vec![record("SHUFFLE", "https://a.com", None)];

        let result = apply_all(&[], &deltas);

        assert!(matches!(result, Err(StashError::UnsupportedDelta(kind)) if kind == "SHUFFLE"));
    }

    #[test]
    fn test_no_op_deltas_are_dropped_silently() {
        let base = list(&["https://a.com"]);
        let deltas = vec![
            record("BUMP", "https://missing.com", Some(3)),
            record("REMOVE", "https://missing.com", None),
        ];

        let result = materialize_list(&base, &deltas);

        assert_eq!(result.stash, base);
        assert_eq!(result.rejected, 0);
    }

    #[test]
    fn test_materialize_skips_invalid_records_and_cleans_list() {
        let base = list(&["https://a.com?x=1", "", "https://a.com"]);
        let deltas = vec![
            record("BUMP", "https://a.com", None),
            record("ROTATE", "https://a.com", None),
            record("ADD", "https://b.com", None),
        ];

        let result = materialize_list(&base, &deltas);

        assert_eq!(result.stash, list(&["https://b.com", "https://a.com"]));
        assert_eq!(result.rejected, 2);
    }

    #[test]
    fn test_enqueue_validation() {
        let mut queue = Vec::new();

        assert!(matches!(
            enqueue(&mut queue, record("BUMP", "https://a.com", None)),
            Err(StashError::MissingBumpAmount)
        ));
        assert!(matches!(
            enqueue(&mut queue, record("ADD", "nope", None)),
            Err(StashError::InvalidInput(_))
        ));
        assert!(matches!(
            enqueue(&mut queue, record("MOVE", "https://a.com", None)),
            Err(StashError::UnsupportedDelta(_))
        ));
        assert!(queue.is_empty());

        enqueue(&mut queue, record("BUMP", "https://a.com", Some(2))).unwrap();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_enqueued_add_is_stored_without_query() {
        let mut queue = Vec::new();

        enqueue(&mut queue, record("ADD", "https://a.com/page?ref=x", None)).unwrap();

        assert_eq!(queue[0].url, "https://a.com/page");
        assert_eq!(apply_all(&[], &queue).unwrap(), materialize_list(&[], &queue).stash);
    }

    #[test]
    fn test_record_wire_format() {
        let bump = DeltaRecord::from(&Delta::Bump {
            url: "https://a.com".to_string(),
            amount: -3,
        });
        let add = DeltaRecord::from(&Delta::Add {
            url: "https://a.com".to_string(),
        });

        assert_eq!(
            serde_json::to_value(&bump).unwrap(),
            serde_json::json!({"type": "BUMP", "url": "https://a.com", "bumpAmount": -3})
        );
        assert_eq!(
            serde_json::to_value(&add).unwrap(),
            serde_json::json!({"type": "ADD", "url": "https://a.com"})
        );
    }
}
