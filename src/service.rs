/// Stash operations over a key-value store: mutations, batch open,
/// deferred deltas, notes, settings and import/export.
use crate::batch::{OpenSession, plan_batch, session_for};
use crate::delta::{self, Delta, DeltaRecord, materialize_list};
use crate::error::{Result, StashError};
use crate::notes::{Notes, clean_notes};
use crate::settings::Settings;
use crate::stash::{Stash, StashData, StashDataUpdate};
use crate::storage::{
    DELTAS_KEY, KeyValueStore, NOTES_KEY, SETTINGS_KEY, STASH_DATA_KEY, read_record, write_record,
};
use crate::transfer::{self, ExportFile, ImportFormat, Imported};

/// How many times a write is retried when another writer got there first
pub const MAX_WRITE_ATTEMPTS: usize = 3;

/// Issues tab creation requests, in list order
#[allow(async_fn_in_trait)]
pub trait TabOpener {
    async fn open_tabs(&self, urls: &[String]) -> Result<()>;
}

/// Saves an exported file; resolves once the download finished
#[allow(async_fn_in_trait)]
pub trait Downloader {
    async fn download(&self, file: ExportFile) -> Result<()>;
}

pub struct StashService<S> {
    store: S,
}

impl<S: KeyValueStore> StashService<S> {
    pub fn new(store: S) -> Self {
        StashService { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn get_data(&self) -> Result<StashData> {
        read_record(&self.store, STASH_DATA_KEY).await
    }

    /// Merge the given fields over the stored record
    pub async fn update_data(&self, update: StashDataUpdate) -> Result<StashData> {
        let (data, _) = self
            .modify(|data| {
                data.merge(update.clone());
                Ok(())
            })
            .await?;
        Ok(data)
    }

    /// Read-modify-write of the stash record.
    ///
    /// Pending deltas are folded in before `f` runs. If `f` fails nothing is
    /// written. The stored revision is re-read right before the write; if it
    /// moved, the whole cycle is retried.
    async fn modify<T, F>(&self, mut f: F) -> Result<(StashData, T)>
    where
        F: FnMut(&mut StashData) -> Result<T>,
    {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let mut data = self.get_data().await?;
            let expected_revision = data.revision;

            let pending = self.pending_deltas().await?;
            if !pending.is_empty() {
                let materialized = materialize_list(&data.stash, &pending);
                log::debug!(
                    "Applied {} pending deltas ({} dropped)",
                    pending.len(),
                    materialized.rejected
                );
                data.stash = materialized.stash;
            }

            let output = f(&mut data)?;

            let current_revision = self.get_data().await?.revision;
            if current_revision != expected_revision {
                log::warn!(
                    "Stash data changed during update (attempt {}/{}): revision {} -> {}",
                    attempt,
                    MAX_WRITE_ATTEMPTS,
                    expected_revision,
                    current_revision
                );
                continue;
            }

            data.revision = expected_revision + 1;
            write_record(&self.store, STASH_DATA_KEY, &data).await?;

            if !pending.is_empty() {
                self.drop_applied_deltas(pending.len()).await?;
            }

            return Ok((data, output));
        }

        Err(StashError::Conflict)
    }

    pub async fn add(&self, url: &str) -> Result<()> {
        self.modify(|data| data.add(url)).await?;
        log::info!("Added {} to the Stash", url);
        Ok(())
    }

    pub async fn remove(&self, url: &str) -> Result<()> {
        self.modify(|data| data.remove(url)).await?;
        log::info!("Removed {} from the Stash", url);
        Ok(())
    }

    /// Returns the URL's new index
    pub async fn bump(&self, url: &str, amount: i64) -> Result<usize> {
        let (_, index) = self.modify(|data| data.bump(url, amount)).await?;
        log::info!("Bumped {} by {} to index {}", url, amount, index);
        Ok(index)
    }

    pub async fn clear(&self) -> Result<()> {
        self.modify(|data| {
            data.clear();
            Ok(())
        })
        .await?;
        log::info!("Cleared the Stash");
        Ok(())
    }

    /// Open a batch of the Stash (or all of it when `batch` is None or 0)
    /// and return the URLs that were requested, markers included.
    pub async fn open<T: TabOpener>(&self, batch: Option<u32>, tabs: &T) -> Result<Vec<String>> {
        let batch_size = self.get_settings().await?.batch_size;

        let urls = match session_for(batch) {
            OpenSession::Fresh => {
                let (_, urls) = self
                    .modify(|data| {
                        data.snapshot_for_open();
                        plan_batch(&data.opened_stash, batch, batch_size)
                    })
                    .await?;
                urls
            }
            OpenSession::Continuing => {
                plan_batch(&self.get_data().await?.opened_stash, batch, batch_size)?
            }
        };

        log::info!("Opening {} tabs for batch {:?}", urls.len(), batch);
        tabs.open_tabs(&urls).await?;
        Ok(urls)
    }

    // Deferred mutations

    pub async fn pending_deltas(&self) -> Result<Vec<DeltaRecord>> {
        read_record(&self.store, DELTAS_KEY).await
    }

    /// Validate and append a record to the pending queue
    pub async fn enqueue(&self, record: DeltaRecord) -> Result<()> {
        let mut queue = self.pending_deltas().await?;
        delta::enqueue(&mut queue, record)?;
        write_record(&self.store, DELTAS_KEY, &queue).await
    }

    pub async fn enqueue_add(&self, url: &str) -> Result<()> {
        self.enqueue(DeltaRecord::from(&Delta::Add {
            url: url.to_string(),
        }))
        .await
    }

    pub async fn enqueue_remove(&self, url: &str) -> Result<()> {
        self.ensure_present_after_pending(url).await?;
        self.enqueue(DeltaRecord::from(&Delta::Remove {
            url: url.to_string(),
        }))
        .await
    }

    pub async fn enqueue_bump(&self, url: &str, amount: i64) -> Result<()> {
        self.ensure_present_after_pending(url).await?;
        self.enqueue(DeltaRecord::from(&Delta::Bump {
            url: url.to_string(),
            amount,
        }))
        .await
    }

    /// The Stash as it will read once the pending queue is materialized.
    /// Nothing is written.
    pub async fn projected_stash(&self) -> Result<Stash> {
        let data = self.get_data().await?;
        let pending = self.pending_deltas().await?;
        if pending.is_empty() {
            return Ok(data.stash);
        }
        Ok(materialize_list(&data.stash, &pending).stash)
    }

    /// NotFound unless `url` would be in the Stash once every pending delta
    /// is applied
    async fn ensure_present_after_pending(&self, url: &str) -> Result<()> {
        if self.projected_stash().await?.iter().any(|x| x == url) {
            Ok(())
        } else {
            Err(StashError::NotFound(url.to_string()))
        }
    }

    /// Apply and clear the pending queue. No write happens when it is empty.
    pub async fn materialize(&self) -> Result<StashData> {
        if self.pending_deltas().await?.is_empty() {
            return self.get_data().await;
        }

        let (data, _) = self.modify(|_| Ok(())).await?;
        Ok(data)
    }

    /// Drop the first `count` records; anything queued meanwhile survives
    async fn drop_applied_deltas(&self, count: usize) -> Result<()> {
        let mut queue = self.pending_deltas().await?;
        queue.drain(..count.min(queue.len()));
        write_record(&self.store, DELTAS_KEY, &queue).await
    }

    // Notes

    // Notes are kept for URLs in the projected Stash, so a URL added by a
    // shortcut can be annotated before the queue is materialized.

    pub async fn get_notes(&self) -> Result<Notes> {
        let notes: Notes = read_record(&self.store, NOTES_KEY).await?;
        Ok(clean_notes(notes, &self.projected_stash().await?))
    }

    pub async fn save_notes(&self, notes: Notes) -> Result<()> {
        let stash = self.projected_stash().await?;
        write_record(&self.store, NOTES_KEY, &clean_notes(notes, &stash)).await
    }

    pub async fn note_for(&self, url: &str) -> Result<Option<String>> {
        Ok(self.get_notes().await?.remove(url))
    }

    /// Attach `note` to a stashed URL
    pub async fn save_note(&self, url: &str, note: &str) -> Result<()> {
        self.ensure_present_after_pending(url).await?;

        let mut notes = self.get_notes().await?;
        notes.insert(url.to_string(), note.to_string());
        self.save_notes(notes).await
    }

    // Settings

    pub async fn get_settings(&self) -> Result<Settings> {
        read_record(&self.store, SETTINGS_KEY).await
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        write_record(&self.store, SETTINGS_KEY, settings).await
    }

    pub async fn set_batch_size(&self, batch_size: i64) -> Result<Settings> {
        let mut settings = self.get_settings().await?;
        settings.set_batch_size(batch_size)?;
        self.save_settings(&settings).await?;
        Ok(settings)
    }

    pub async fn set_default_bump(&self, default_bump: i64) -> Result<Settings> {
        let mut settings = self.get_settings().await?;
        settings.set_default_bump(default_bump)?;
        self.save_settings(&settings).await?;
        Ok(settings)
    }

    // Import / export

    /// Replace the Stash with the contents of a text or JSON export file.
    /// Returns the number of imported URLs.
    pub async fn import(&self, content: &str) -> Result<usize> {
        let format = ImportFormat::detect(content);
        let imported = match format {
            ImportFormat::Text => transfer::parse_text_import(content)?,
            ImportFormat::Json => transfer::parse_json_import(content)?,
        };
        let count = imported.stash.len();

        self.replace_with(imported, format == ImportFormat::Json).await?;
        log::info!("Imported {} URLs ({:?})", count, format);
        Ok(count)
    }

    async fn replace_with(&self, imported: Imported, with_notes: bool) -> Result<()> {
        let Imported { stash, notes } = imported;
        self.modify(|data| {
            data.stash = stash.clone();
            data.opened_stash = stash.clone();
            Ok(())
        })
        .await?;

        if with_notes {
            self.save_notes(notes).await?;
        }
        Ok(())
    }

    pub async fn export_text(&self) -> Result<ExportFile> {
        let data = self.materialize().await?;
        Ok(transfer::export_text(&data.stash))
    }

    pub async fn export_json(&self) -> Result<ExportFile> {
        let data = self.materialize().await?;
        let notes = self.get_notes().await?;
        transfer::export_json(&data.stash, &notes)
    }

    /// Export (JSON) and clear only once the download completed
    pub async fn export_then_clear<D: Downloader>(&self, downloader: &D) -> Result<()> {
        let file = self.export_json().await?;
        downloader.download(file).await?;
        self.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::urls::{batch_end_url, end_of_stash_url};
    use pollster::block_on;
    use serde_json::Value;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct RecordingTabs {
        opened: RefCell<Vec<String>>,
    }

    impl TabOpener for RecordingTabs {
        async fn open_tabs(&self, urls: &[String]) -> Result<()> {
            self.opened.borrow_mut().extend_from_slice(urls);
            Ok(())
        }
    }

    struct FakeDownloader {
        fail: bool,
        files: RefCell<Vec<ExportFile>>,
    }

    impl FakeDownloader {
        fn new(fail: bool) -> Self {
            FakeDownloader {
                fail,
                files: RefCell::new(Vec::new()),
            }
        }
    }

    impl Downloader for FakeDownloader {
        async fn download(&self, file: ExportFile) -> Result<()> {
            if self.fail {
                return Err(StashError::Browser("download interrupted".to_string()));
            }
            self.files.borrow_mut().push(file);
            Ok(())
        }
    }

    /// Store that simulates another writer saving the stash record right
    /// after our first read, `interruptions` times.
    struct InterleavingStore {
        inner: MemoryStore,
        interruptions: Cell<usize>,
    }

    impl KeyValueStore for InterleavingStore {
        async fn get(&self, key: &str) -> Result<Option<Value>> {
            let value = self.inner.get(key).await?;
            if key == STASH_DATA_KEY && self.interruptions.get() > 0 {
                self.interruptions.set(self.interruptions.get() - 1);
                let mut other: StashData = read_record(&self.inner, key).await?;
                other.stash.push("https://other-writer.com".to_string());
                other.revision += 1;
                write_record(&self.inner, key, &other).await?;
            }
            Ok(value)
        }

        async fn set(&self, key: &str, value: Value) -> Result<()> {
            self.inner.set(key, value).await
        }
    }

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|u| u.to_string()).collect()
    }

    fn service_with(stash: &[&str]) -> StashService<MemoryStore> {
        let service = StashService::new(MemoryStore::new());
        block_on(service.update_data(StashDataUpdate {
            stash: Some(urls(stash)),
            opened_stash: None,
        }))
        .unwrap();
        service
    }

    fn numbered(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("https://example.com/{}", i)).collect()
    }

    #[test]
    fn test_first_access_initializes_empty_record() {
        let service = StashService::new(MemoryStore::new());

        let data = block_on(service.get_data()).unwrap();

        assert!(data.stash.is_empty());
        assert!(data.opened_stash.is_empty());
    }

    #[test]
    fn test_add_persists_new_order() {
        let service = service_with(&["https://a.com", "https://b.com"]);

        block_on(service.add("https://b.com")).unwrap();

        let data = block_on(service.get_data()).unwrap();
        assert_eq!(data.stash, urls(&["https://b.com", "https://a.com"]));
    }

    #[test]
    fn test_failed_remove_leaves_store_byte_identical() {
        let service = service_with(&["https://a.com", "https://b.com"]);
        let before = service.store().snapshot(STASH_DATA_KEY);

        let result = block_on(service.remove("https://missing.com"));

        assert!(matches!(result, Err(StashError::NotFound(_))));
        assert_eq!(service.store().snapshot(STASH_DATA_KEY), before);
    }

    #[test]
    fn test_bump_round_trip() {
        let service = service_with(&["https://a.com", "https://b.com", "https://c.com", "https://d.com", "https://e.com"]);

        assert_eq!(block_on(service.bump("https://d.com", 2)).unwrap(), 1);
        assert_eq!(block_on(service.bump("https://d.com", -2)).unwrap(), 3);

        let data = block_on(service.get_data()).unwrap();
        assert_eq!(data.stash[3], "https://d.com");
    }

    #[test]
    fn test_revision_increments_on_every_write() {
        let service = service_with(&["https://a.com"]);
        let start = block_on(service.get_data()).unwrap().revision;

        block_on(service.add("https://b.com")).unwrap();
        block_on(service.remove("https://a.com")).unwrap();

        assert_eq!(block_on(service.get_data()).unwrap().revision, start + 2);
    }

    #[test]
    fn test_concurrent_writer_triggers_retry_without_lost_update() {
        let inner = MemoryStore::new();
        block_on(write_record(
            &inner,
            STASH_DATA_KEY,
            &StashData {
                stash: urls(&["https://a.com"]),
                ..StashData::new()
            },
        ))
        .unwrap();
        let service = StashService::new(InterleavingStore {
            inner,
            interruptions: Cell::new(1),
        });

        block_on(service.add("https://b.com")).unwrap();

        let data = block_on(service.get_data()).unwrap();
        assert_eq!(
            data.stash,
            urls(&["https://b.com", "https://a.com", "https://other-writer.com"])
        );
    }

    #[test]
    fn test_persistent_contention_is_conflict() {
        let service = StashService::new(InterleavingStore {
            inner: MemoryStore::new(),
            interruptions: Cell::new(usize::MAX),
        });

        let result = block_on(service.add("https://b.com"));

        assert!(matches!(result, Err(StashError::Conflict)));
    }

    #[test]
    fn test_open_batches_use_snapshot_from_first_batch() {
        let service = StashService::new(MemoryStore::new());
        block_on(service.update_data(StashDataUpdate {
            stash: Some(numbered(85)),
            opened_stash: None,
        }))
        .unwrap();
        let tabs = RecordingTabs::default();

        let first = block_on(service.open(Some(1), &tabs)).unwrap();
        assert_eq!(first.len(), 41);
        assert_eq!(first[40], batch_end_url(1));

        // edits after batch 1 must not shift later batches
        block_on(service.add("https://new.com")).unwrap();

        let third = block_on(service.open(Some(3), &tabs)).unwrap();
        assert_eq!(&third[..5], &numbered(85)[80..85]);
        assert_eq!(third[5], batch_end_url(3));
        assert_eq!(third[6], end_of_stash_url());

        assert_eq!(tabs.opened.borrow().len(), 41 + 7);
    }

    #[test]
    fn test_open_respects_batch_size_setting() {
        let service = service_with(&["https://a.com", "https://b.com", "https://c.com"]);
        block_on(service.set_batch_size(2)).unwrap();
        let tabs = RecordingTabs::default();

        let second = block_on(service.open(Some(1), &tabs)).unwrap();
        let next = block_on(service.open(Some(2), &tabs)).unwrap();

        assert_eq!(second, urls(&["https://a.com", "https://b.com", "/html/batchEnd.html?batch=1"]));
        assert_eq!(next, vec!["https://c.com".to_string(), batch_end_url(2), end_of_stash_url()]);
    }

    #[test]
    fn test_open_empty_stash_fails_without_writing() {
        let service = StashService::new(MemoryStore::new());
        let tabs = RecordingTabs::default();

        let result = block_on(service.open(Some(1), &tabs));

        assert!(matches!(result, Err(StashError::NothingToOpen)));
        assert!(tabs.opened.borrow().is_empty());
        assert_eq!(service.store().snapshot(STASH_DATA_KEY), None);
    }

    #[test]
    fn test_open_all_opens_every_valid_url() {
        let service = service_with(&["https://a.com", "https://b.com"]);
        let tabs = RecordingTabs::default();

        let opened = block_on(service.open(None, &tabs)).unwrap();

        assert_eq!(opened, urls(&["https://a.com", "https://b.com"]));
        assert_eq!(*tabs.opened.borrow(), opened);
    }

    #[test]
    fn test_clear_resets_both_lists() {
        let service = service_with(&["https://a.com"]);
        block_on(service.open(None, &RecordingTabs::default())).unwrap();

        block_on(service.clear()).unwrap();

        let data = block_on(service.get_data()).unwrap();
        assert!(data.stash.is_empty());
        assert!(data.opened_stash.is_empty());
    }

    #[test]
    fn test_deltas_materialize_on_export() {
        let service = service_with(&["https://b.com"]);

        block_on(service.enqueue_add("https://a.com")).unwrap();
        block_on(service.enqueue_remove("https://a.com")).unwrap();
        block_on(service.enqueue_add("https://a.com")).unwrap();

        // nothing applied yet
        assert_eq!(block_on(service.get_data()).unwrap().stash, urls(&["https://b.com"]));

        let file = block_on(service.export_text()).unwrap();
        assert_eq!(file.contents, "STASH\nhttps://a.com\nhttps://b.com");
        assert!(block_on(service.pending_deltas()).unwrap().is_empty());
    }

    #[test]
    fn test_delta_bump_requires_url_after_pending_changes() {
        let service = service_with(&["https://a.com"]);

        assert!(matches!(
            block_on(service.enqueue_bump("https://b.com", 1)),
            Err(StashError::NotFound(_))
        ));

        block_on(service.enqueue_add("https://b.com")).unwrap();
        block_on(service.enqueue_bump("https://b.com", -1)).unwrap();

        block_on(service.enqueue_remove("https://b.com")).unwrap();
        assert!(matches!(
            block_on(service.enqueue_bump("https://b.com", 1)),
            Err(StashError::NotFound(_))
        ));

        assert_eq!(block_on(service.pending_deltas()).unwrap().len(), 3);
    }

    #[test]
    fn test_immediate_mutation_sees_pending_deltas() {
        let service = service_with(&["https://a.com"]);
        block_on(service.enqueue_add("https://b.com")).unwrap();

        block_on(service.remove("https://b.com")).unwrap();

        assert_eq!(block_on(service.get_data()).unwrap().stash, urls(&["https://a.com"]));
        assert!(block_on(service.pending_deltas()).unwrap().is_empty());
    }

    #[test]
    fn test_fresh_open_materializes_pending_deltas() {
        let service = service_with(&["https://a.com", "https://b.com"]);
        block_on(service.enqueue_bump("https://b.com", 1)).unwrap();

        let opened = block_on(service.open(None, &RecordingTabs::default())).unwrap();

        assert_eq!(opened, urls(&["https://b.com", "https://a.com"]));
    }

    #[test]
    fn test_materialize_without_pending_does_not_write() {
        let service = service_with(&["https://a.com"]);
        let before = block_on(service.get_data()).unwrap();

        let after = block_on(service.materialize()).unwrap();

        assert_eq!(after, before);
    }

    #[test]
    fn test_notes_are_pruned_to_stash() {
        let service = service_with(&["https://a.com", "https://b.com"]);

        block_on(service.save_note("https://a.com", "read me")).unwrap();
        assert!(matches!(
            block_on(service.save_note("https://zzz.com", "nope")),
            Err(StashError::NotFound(_))
        ));
        assert_eq!(
            block_on(service.note_for("https://a.com")).unwrap(),
            Some("read me".to_string())
        );

        block_on(service.remove("https://a.com")).unwrap();
        assert!(block_on(service.get_notes()).unwrap().is_empty());
    }

    #[test]
    fn test_note_survives_materialize_after_query_url_add() {
        let service = service_with(&["https://b.com"]);

        block_on(service.add("https://a.com/page?ref=x")).unwrap();
        block_on(service.save_note("https://a.com/page", "read later")).unwrap();
        block_on(service.enqueue_add("https://c.com")).unwrap();
        let data = block_on(service.materialize()).unwrap();

        assert_eq!(data.stash, urls(&["https://c.com", "https://a.com/page", "https://b.com"]));
        assert_eq!(
            block_on(service.note_for("https://a.com/page")).unwrap(),
            Some("read later".to_string())
        );
    }

    #[test]
    fn test_note_for_url_added_by_shortcut() {
        let service = service_with(&["https://a.com"]);
        block_on(service.enqueue_add("https://b.com")).unwrap();

        block_on(service.save_note("https://b.com", "hi")).unwrap();
        assert_eq!(block_on(service.note_for("https://b.com")).unwrap(), Some("hi".to_string()));

        block_on(service.materialize()).unwrap();
        assert_eq!(block_on(service.note_for("https://b.com")).unwrap(), Some("hi".to_string()));
    }

    #[test]
    fn test_invalid_stored_delta_does_not_block_shortcuts() {
        let service = service_with(&["https://a.com", "https://b.com"]);
        let bad = vec![DeltaRecord {
            kind: "SHUFFLE".to_string(),
            url: "https://a.com".to_string(),
            bump_amount: None,
        }];
        block_on(write_record(service.store(), DELTAS_KEY, &bad)).unwrap();

        block_on(service.enqueue_bump("https://b.com", 1)).unwrap();
        block_on(service.enqueue_remove("https://a.com")).unwrap();

        assert_eq!(block_on(service.materialize()).unwrap().stash, urls(&["https://b.com"]));
    }

    #[test]
    fn test_text_import_replaces_both_lists() {
        let service = service_with(&["https://old.com"]);

        let count = block_on(service.import("STASH\nhttp://a\nnotaurl\nhttp://a")).unwrap();

        let data = block_on(service.get_data()).unwrap();
        assert_eq!(count, 1);
        assert_eq!(data.stash, urls(&["http://a"]));
        assert_eq!(data.opened_stash, urls(&["http://a"]));
    }

    #[test]
    fn test_empty_import_leaves_store_alone() {
        let service = service_with(&["https://old.com"]);
        let before = service.store().snapshot(STASH_DATA_KEY);

        assert!(matches!(block_on(service.import("STASH\njunk")), Err(StashError::EmptyImport)));
        assert_eq!(service.store().snapshot(STASH_DATA_KEY), before);
    }

    #[test]
    fn test_json_export_import_round_trip_with_notes() {
        let service = service_with(&["https://a.com", "https://b.com"]);
        block_on(service.save_note("https://b.com", "later")).unwrap();
        let file = block_on(service.export_json()).unwrap();

        let other = StashService::new(MemoryStore::new());
        block_on(other.import(&file.contents)).unwrap();

        assert_eq!(block_on(other.get_data()).unwrap().stash, urls(&["https://a.com", "https://b.com"]));
        assert_eq!(block_on(other.note_for("https://b.com")).unwrap(), Some("later".to_string()));
    }

    #[test]
    fn test_export_then_clear() {
        let service = service_with(&["https://a.com"]);
        let downloader = FakeDownloader::new(false);

        block_on(service.export_then_clear(&downloader)).unwrap();

        assert_eq!(downloader.files.borrow().len(), 1);
        assert!(downloader.files.borrow()[0].contents.contains("https://a.com"));
        assert!(block_on(service.get_data()).unwrap().stash.is_empty());
    }

    #[test]
    fn test_failed_export_does_not_clear() {
        let service = service_with(&["https://a.com"]);
        let downloader = FakeDownloader::new(true);

        let result = block_on(service.export_then_clear(&downloader));

        assert!(matches!(result, Err(StashError::Browser(_))));
        assert_eq!(block_on(service.get_data()).unwrap().stash, urls(&["https://a.com"]));
    }

    #[test]
    fn test_settings_defaults_and_validation() {
        let service = StashService::new(MemoryStore::new());

        assert_eq!(block_on(service.get_settings()).unwrap(), Settings::default());
        assert!(matches!(block_on(service.set_batch_size(0)), Err(StashError::InvalidInput(_))));
        assert_eq!(block_on(service.set_default_bump(5)).unwrap().default_bump, 5);
        assert_eq!(block_on(service.get_settings()).unwrap().batch_size, 40);
    }
}
