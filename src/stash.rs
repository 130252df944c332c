/// The Stash record and its mutation primitives
use crate::error::{Result, StashError};
use crate::urls::{is_well_formed_url, sanitize_url};
use serde::{Deserialize, Deserializer, Serialize};

/// Ordered URL list, index 0 is opened first
pub type Stash = Vec<String>;

/// Record persisted under the stash data key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StashData {
    /// Live list, changed by every mutation
    #[serde(default, deserialize_with = "lenient_list")]
    pub stash: Stash,
    /// Snapshot taken when batch 1 is opened; later batches read from it
    #[serde(default, deserialize_with = "lenient_list")]
    pub opened_stash: Stash,
    /// Bumped on every successful write, used for the optimistic write check
    #[serde(default)]
    pub revision: u64,
}

/// Partial update merged over the stored record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StashDataUpdate {
    pub stash: Option<Stash>,
    pub opened_stash: Option<Stash>,
}

impl StashData {
    pub fn new() -> Self {
        StashData::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.stash.iter().any(|x| x == url)
    }

    /// Merge only the fields present in `update`
    pub fn merge(&mut self, update: StashDataUpdate) {
        if let Some(stash) = update.stash {
            self.stash = stash;
        }
        if let Some(opened_stash) = update.opened_stash {
            self.opened_stash = opened_stash;
        }
    }

    /// Move `url` to the top of the Stash, dropping any earlier occurrence.
    /// The query string is stripped before the URL is stored.
    pub fn add(&mut self, url: &str) -> Result<()> {
        if !is_well_formed_url(url) {
            return Err(StashError::InvalidInput(format!(
                "could not add {:?} because it is not a valid http(s) URL",
                url
            )));
        }

        move_to_front(&mut self.stash, &sanitize_url(url));
        Ok(())
    }

    pub fn remove(&mut self, url: &str) -> Result<()> {
        if !self.contains(url) {
            return Err(StashError::NotFound(url.to_string()));
        }

        self.stash.retain(|x| x != url);
        Ok(())
    }

    /// Reposition `url` by `amount` slots toward the front (negative moves it
    /// toward the end). Returns the new index.
    pub fn bump(&mut self, url: &str, amount: i64) -> Result<usize> {
        bump_within(&mut self.stash, url, amount)
            .ok_or_else(|| StashError::NotFound(url.to_string()))
    }

    pub fn clear(&mut self) {
        self.stash.clear();
        self.opened_stash.clear();
    }

    /// Freeze the live list as the reference for a multi-batch open
    pub fn snapshot_for_open(&mut self) {
        self.opened_stash = self.stash.clone();
    }
}

/// Remove every occurrence of `url` and insert it at index 0
pub(crate) fn move_to_front(list: &mut Stash, url: &str) {
    list.retain(|x| x != url);
    list.insert(0, url.to_string());
}

/// Move `url` to `clamp(old - amount, 0, len - 1)`. None if absent.
pub(crate) fn bump_within(list: &mut Stash, url: &str, amount: i64) -> Option<usize> {
    let old_index = list.iter().position(|x| x == url)?;
    let last_index = (list.len() - 1) as i64;
    let new_index = (old_index as i64).saturating_sub(amount).clamp(0, last_index) as usize;

    let entry = list.remove(old_index);
    list.insert(new_index, entry);
    Some(new_index)
}

/// Stored lists written by older versions may hold non-array values or
/// non-string entries; treat those as empty / skip them.
pub(crate) fn lenient_list<'de, D>(deserializer: D) -> std::result::Result<Stash, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    })
}
