//! Test-object lifecycle: remember everything a scenario creates on the
//! server and remove it afterwards, whatever the scenario's outcome.

use std::fmt::Debug;

use async_trait::async_trait;
use log::info;

use crate::TestFailure;

/// Ordered, de-duplicated ids of remote objects created by one scenario.
#[derive(Debug, Clone)]
pub struct TrackedObjects<K> {
    ids: Vec<K>,
}

impl<K> Default for TrackedObjects<K> {
    fn default() -> Self {
        Self { ids: Vec::new() }
    }
}

impl<K: Clone + PartialEq + Debug> TrackedObjects<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything tracked so far.
    pub fn initialize(&mut self) {
        self.ids.clear();
    }

    /// Track one id; returns false if it was already tracked.
    pub fn track(&mut self, id: K) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Track every id not yet tracked; returns how many were new.
    pub fn observe<I: IntoIterator<Item = K>>(&mut self, ids: I) -> usize {
        ids.into_iter().filter(|id| self.track(id.clone())).count()
    }

    /// Stop tracking an id the scenario removed itself.
    pub fn forget(&mut self, id: &K) -> bool {
        let before = self.ids.len();
        self.ids.retain(|tracked| tracked != id);
        self.ids.len() != before
    }

    pub fn contains(&self, id: &K) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.ids.iter()
    }

    pub fn drain(&mut self) -> Vec<K> {
        std::mem::take(&mut self.ids)
    }
}

/// A response from which created object ids can be read.
pub trait ObjectIdSource<K> {
    fn object_ids(&self) -> Vec<K>;
}

/// Removes remote objects for good (hard delete).
#[async_trait]
pub trait Disposer<K: Send + Sync>: Send + Sync {
    /// One result per id, in order.
    async fn dispose(&self, ids: &[K]) -> Vec<Result<(), String>>;
}

/// Dispose of every tracked object and leave the collection empty.
///
/// The collection is drained even when some disposals fail; the failures are
/// reported as [`TestFailure::Cleanup`].
pub async fn teardown<K, D>(
    tracked: &mut TrackedObjects<K>,
    disposer: &D,
) -> Result<usize, TestFailure>
where
    K: Clone + PartialEq + Debug + Send + Sync,
    D: Disposer<K> + ?Sized,
{
    if tracked.is_empty() {
        return Ok(0);
    }
    let ids = tracked.drain();
    let results = disposer.dispose(&ids).await;

    let mut failures = Vec::new();
    for (i, id) in ids.iter().enumerate() {
        match results.get(i) {
            Some(Ok(())) => {}
            Some(Err(message)) => failures.push(format!("{:?}: {}", id, message)),
            None => failures.push(format!("{:?}: no delete result returned", id)),
        }
    }
    info!(
        "cleanup removed {} of {} tracked objects",
        ids.len() - failures.len(),
        ids.len()
    );
    if failures.is_empty() {
        Ok(ids.len())
    } else {
        Err(TestFailure::Cleanup(failures.join("; ")))
    }
}
