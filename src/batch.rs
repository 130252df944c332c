/// Batch planning: which Stash entries a "Stash Open" request opens
use crate::error::{Result, StashError};
use crate::urls::{batch_end_url, end_of_stash_url, is_url};

/// Which list an open request reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenSession {
    /// Batch 1 or open-all: snapshot the live list first
    Fresh,
    /// Later batches reuse the snapshot taken by batch 1
    Continuing,
}

/// Normalize a batch argument: 0 behaves like no batch (open everything)
pub fn normalize_batch(batch: Option<u32>) -> Option<u32> {
    batch.filter(|b| *b > 0)
}

pub fn session_for(batch: Option<u32>) -> OpenSession {
    match normalize_batch(batch) {
        None | Some(1) => OpenSession::Fresh,
        Some(_) => OpenSession::Continuing,
    }
}

/// Compute the URLs to open, markers included, in the order tabs are created.
///
/// With no batch every valid entry of `reference` is returned without
/// markers. Batch `b` takes `[(b-1)*n, b*n)`, drops invalid entries, and if
/// anything is left appends the batch-end marker plus, when the batch reaches
/// the end of the list, the end-of-stash marker.
pub fn plan_batch(reference: &[String], batch: Option<u32>, batch_size: u32) -> Result<Vec<String>> {
    let urls = match normalize_batch(batch) {
        None => valid_urls(reference),
        Some(b) => {
            let size = batch_size.max(1) as usize;
            let start = (b as usize - 1).saturating_mul(size);
            let end = (b as usize).saturating_mul(size);

            let mut urls = if start < reference.len() {
                valid_urls(&reference[start..end.min(reference.len())])
            } else {
                Vec::new()
            };

            if !urls.is_empty() {
                urls.push(batch_end_url(b));
                if end >= reference.len() {
                    urls.push(end_of_stash_url());
                }
            }
            urls
        }
    };

    if urls.is_empty() {
        return Err(StashError::NothingToOpen);
    }

    Ok(urls)
}

fn valid_urls(entries: &[String]) -> Vec<String> {
    entries.iter().filter(|x| is_url(x)).cloned().collect()
}
