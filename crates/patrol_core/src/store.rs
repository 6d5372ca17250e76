//! Holds the most recent scan result and notifies observers when it changes.
//!
//! The store is the single owner of "current findings". Readers take cheap
//! [`Arc`] snapshots; only [`FindingStore::refresh`] replaces the held result,
//! and it does so in one swap so no reader can observe a partial set.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::error::ScanError;
use crate::finding::Finding;
use crate::scanner::ScanResult;

/// Shared, immutable view of one completed scan.
pub type Snapshot = Arc<ScanResult>;

/// Receives a snapshot each time the store is refreshed.
pub trait FindingObserver: Send + Sync {
    /// Called exactly once per [`FindingStore::refresh`].
    fn findings_changed(&self, snapshot: &Snapshot);
}

impl<F> FindingObserver for F
where
    F: Fn(&Snapshot) + Send + Sync,
{
    fn findings_changed(&self, snapshot: &Snapshot) {
        self(snapshot);
    }
}

/// Findings for one pattern name, in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingGroup {
    /// Pattern name shared by every finding in the group.
    pub name: String,
    /// Findings in original scan order.
    pub findings: Vec<Finding>,
}

impl FindingGroup {
    /// Returns the number of findings in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Returns `true` if the group holds no findings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Groups `findings` by pattern name in first-seen order.
#[must_use]
pub fn group_by_name(findings: &[Finding]) -> Vec<FindingGroup> {
    let mut groups: Vec<FindingGroup> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for finding in findings {
        if let Some(&idx) = positions.get(finding.name.as_str()) {
            groups[idx].findings.push(finding.clone());
        } else {
            positions.insert(&finding.name, groups.len());
            groups.push(FindingGroup {
                name: finding.name.clone(),
                findings: vec![finding.clone()],
            });
        }
    }

    groups
}

/// Returns the first finding on `line` of `file`, in stored order.
#[must_use]
pub fn find_at<'a>(findings: &'a [Finding], file: &Path, line: u32) -> Option<&'a Finding> {
    findings.iter().find(|f| f.is_at(file, line))
}

/// Thread-safe holder of the latest scan result.
pub struct FindingStore {
    current: RwLock<Snapshot>,
    observers: Mutex<Vec<Box<dyn FindingObserver>>>,
    scanning: AtomicBool,
}

impl fmt::Debug for FindingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FindingStore")
            .field("findings", &self.snapshot().findings.len())
            .field("scanning", &self.is_scanning())
            .finish_non_exhaustive()
    }
}

impl Default for FindingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FindingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(ScanResult::default())),
            observers: Mutex::new(Vec::new()),
            scanning: AtomicBool::new(false),
        }
    }

    /// Registers an observer for future refreshes.
    ///
    /// Observers run while the observer list is locked and must not call
    /// `subscribe` or `refresh` themselves.
    pub fn subscribe(&self, observer: impl FindingObserver + 'static) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(observer));
    }

    /// Replaces the held result and notifies every observer once.
    ///
    /// Refreshes are mutually exclusive: the observer list stays locked from
    /// the swap until the last notification, so observers always finish on
    /// the snapshot the store holds.
    pub fn refresh(&self, result: ScanResult) -> Snapshot {
        let snapshot = Arc::new(result);
        let observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);

        {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            *current = Arc::clone(&snapshot);
        }

        for observer in observers.iter() {
            observer.findings_changed(&snapshot);
        }

        snapshot
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*current)
    }

    /// Returns every finding from the latest scan.
    #[must_use]
    pub fn all(&self) -> Vec<Finding> {
        self.snapshot().findings.clone()
    }

    /// Returns the number of files skipped by the latest scan.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.snapshot().skipped_count()
    }

    /// Returns the first finding at `file:line`, if any.
    #[must_use]
    pub fn by_location(&self, file: &Path, line: u32) -> Option<Finding> {
        find_at(&self.snapshot().findings, file, line).cloned()
    }

    /// Groups the current findings by pattern name.
    #[must_use]
    pub fn grouped_by_name(&self) -> Vec<FindingGroup> {
        group_by_name(&self.snapshot().findings)
    }

    /// Returns `true` while a [`ScanPermit`] is outstanding.
    #[must_use]
    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::Acquire)
    }

    /// Claims the right to run a scan.
    ///
    /// Only one permit exists at a time, so a scan that started earlier can
    /// never overwrite the result of one that started later.
    pub fn begin_scan(&self) -> Result<ScanPermit<'_>, ScanError> {
        self.scanning
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ScanError::InProgress)?;
        Ok(ScanPermit { store: self })
    }
}

/// Exclusive right to refresh a [`FindingStore`] with a new scan.
///
/// Dropping the permit without committing releases it and leaves the store
/// unchanged.
#[derive(Debug)]
#[must_use = "a scan permit is released as soon as it is dropped"]
pub struct ScanPermit<'a> {
    store: &'a FindingStore,
}

impl ScanPermit<'_> {
    /// Publishes `result` to the store and releases the permit.
    pub fn commit(self, result: ScanResult) -> Snapshot {
        self.store.refresh(result)
    }
}

impl Drop for ScanPermit<'_> {
    fn drop(&mut self) {
        self.store.scanning.store(false, Ordering::Release);
    }
}
