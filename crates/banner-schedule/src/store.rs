//! Banner record store adapter.
//!
//! The hosted document database sits behind [`ScheduleStore`]. Every write is
//! conditional so a decision computed from a stale snapshot fails instead of
//! silently overwriting another writer:
//!
//! - [`ScheduleStore::update`] checks the record's own `version`; enough for
//!   transitions that only look at one banner.
//! - [`ScheduleStore::update_at_revision`] checks the store-wide revision;
//!   needed when the decision depends on *other* banners (activation), since
//!   two banners activated at once would each pass a per-record check.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::error::{Result, ScheduleError};
use crate::record::BannerRecord;
use crate::window::TimeWindow;

pub trait ScheduleStore: Send + Sync {
    /// Every banner record, in id order.
    fn list(&self) -> Result<Vec<BannerRecord>>;

    fn get(&self, id: &str) -> Result<BannerRecord>;

    /// Store a new record. Fails if the id is taken.
    fn insert(&self, record: BannerRecord) -> Result<BannerRecord>;

    /// Store-wide revision, bumped by every successful write.
    fn revision(&self) -> Result<u64>;

    /// Replace a record if its stored version still equals
    /// `expected_version`. Returns the record as stored, version bumped.
    fn update(&self, record: BannerRecord, expected_version: u64) -> Result<BannerRecord>;

    /// Replace a record if nothing in the store has been written since
    /// `expected_revision` was read.
    fn update_at_revision(
        &self,
        record: BannerRecord,
        expected_revision: u64,
    ) -> Result<BannerRecord>;
}

impl<T: ScheduleStore + ?Sized> ScheduleStore for Arc<T> {
    fn list(&self) -> Result<Vec<BannerRecord>> {
        (**self).list()
    }

    fn get(&self, id: &str) -> Result<BannerRecord> {
        (**self).get(id)
    }

    fn insert(&self, record: BannerRecord) -> Result<BannerRecord> {
        (**self).insert(record)
    }

    fn revision(&self) -> Result<u64> {
        (**self).revision()
    }

    fn update(&self, record: BannerRecord, expected_version: u64) -> Result<BannerRecord> {
        (**self).update(record, expected_version)
    }

    fn update_at_revision(
        &self,
        record: BannerRecord,
        expected_revision: u64,
    ) -> Result<BannerRecord> {
        (**self).update_at_revision(record, expected_revision)
    }
}

/// Snapshot of the windows of every scheduled, active banner except
/// `exclude_banner_id`, paired with their ids. A record flagged
/// `scheduled: false` never blocks, whatever its `isActive` says.
///
/// Records whose schedule fields cannot be read are skipped with a warning
/// rather than blocking every other activation.
pub fn list_active_windows<S: ScheduleStore + ?Sized>(
    store: &S,
    exclude_banner_id: &str,
) -> Result<Vec<(String, TimeWindow)>> {
    let records = store.list()?;
    let windows = records
        .iter()
        .filter(|r| r.id != exclude_banner_id && r.is_active)
        .filter_map(|r| match r.to_schedule() {
            Ok(schedule) if schedule.is_active() => {
                schedule.window().map(|w| (r.id.clone(), w))
            }
            Ok(_) => None,
            Err(e) => {
                warn!(banner_id = %r.id, error = %e, "skipping banner with unreadable schedule");
                None
            }
        })
        .collect();
    Ok(windows)
}

#[derive(Debug, Default)]
struct Inner {
    revision: u64,
    records: BTreeMap<String, BannerRecord>,
}

impl Inner {
    fn replace(&mut self, mut record: BannerRecord, stored_version: u64) -> BannerRecord {
        record.version = stored_version + 1;
        self.revision += 1;
        self.records.insert(record.id.clone(), record.clone());
        record
    }

    fn stored_version(&self, id: &str) -> Result<u64> {
        self.records
            .get(id)
            .map(|r| r.version)
            .ok_or_else(|| ScheduleError::NotFound(id.to_string()))
    }
}

/// Records held in memory behind a `RwLock`.
///
/// Backs the CLI (loaded from and saved to a JSON file) and the tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = BannerRecord>) -> Self {
        let records = records.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self {
            inner: RwLock::new(Inner {
                revision: 0,
                records,
            }),
        }
    }

    /// All records, in id order.
    pub fn into_records(self) -> Vec<BannerRecord> {
        self.inner
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .records
            .into_values()
            .collect()
    }

    fn poisoned<T>(_: T) -> ScheduleError {
        ScheduleError::Store("record store lock poisoned".to_string())
    }
}

impl ScheduleStore for InMemoryStore {
    fn list(&self) -> Result<Vec<BannerRecord>> {
        let inner = self.inner.read().map_err(Self::poisoned)?;
        Ok(inner.records.values().cloned().collect())
    }

    fn get(&self, id: &str) -> Result<BannerRecord> {
        let inner = self.inner.read().map_err(Self::poisoned)?;
        inner
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| ScheduleError::NotFound(id.to_string()))
    }

    fn insert(&self, record: BannerRecord) -> Result<BannerRecord> {
        let mut inner = self.inner.write().map_err(Self::poisoned)?;
        if inner.records.contains_key(&record.id) {
            return Err(ScheduleError::Store(format!(
                "banner '{}' already exists",
                record.id
            )));
        }
        inner.revision += 1;
        inner.records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn revision(&self) -> Result<u64> {
        let inner = self.inner.read().map_err(Self::poisoned)?;
        Ok(inner.revision)
    }

    fn update(&self, record: BannerRecord, expected_version: u64) -> Result<BannerRecord> {
        let mut inner = self.inner.write().map_err(Self::poisoned)?;
        let stored = inner.stored_version(&record.id)?;

        if stored != expected_version {
            return Err(ScheduleError::VersionConflict {
                id: record.id,
                expected: expected_version,
                found: stored,
            });
        }
        Ok(inner.replace(record, stored))
    }

    fn update_at_revision(
        &self,
        record: BannerRecord,
        expected_revision: u64,
    ) -> Result<BannerRecord> {
        let mut inner = self.inner.write().map_err(Self::poisoned)?;
        let stored = inner.stored_version(&record.id)?;

        if inner.revision != expected_revision {
            return Err(ScheduleError::StaleSnapshot {
                expected: expected_revision,
                found: inner.revision,
            });
        }
        Ok(inner.replace(record, stored))
    }
}
