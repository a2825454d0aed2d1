//! State shared between the acquisition and presentation loops.

use arc_swap::ArcSwap;
use proximity_data::SectorDistances;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Sector distances together with the number of scans stored so far.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DistanceSnapshot {
    pub distances: SectorDistances,
    /// 0 until the first scan has been stored.
    pub sequence: u64,
}

/// Latest sector distances, replaced as a whole on every scan.
///
/// Readers always observe the three values of a single scan. There must be
/// only one writer.
pub struct SharedDistances {
    inner: ArcSwap<DistanceSnapshot>,
}

impl SharedDistances {
    pub fn new() -> Self {
        SharedDistances {
            inner: ArcSwap::from_pointee(DistanceSnapshot::default()),
        }
    }

    pub fn store(&self, distances: SectorDistances) {
        let sequence = self.inner.load().sequence + 1;
        self.inner.store(Arc::new(DistanceSnapshot {
            distances,
            sequence,
        }));
    }

    pub fn snapshot(&self) -> DistanceSnapshot {
        **self.inner.load()
    }

    pub fn distances(&self) -> SectorDistances {
        self.snapshot().distances
    }
}

impl Default for SharedDistances {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide stop request. Set once, never reset.
#[derive(Debug, Default)]
pub struct StopSignal {
    flag: AtomicBool,
}

impl StopSignal {
    pub fn new() -> Self {
        StopSignal {
            flag: AtomicBool::new(false),
        }
    }

    pub fn set(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Everything both loops share.
#[derive(Default)]
pub struct FusionContext {
    pub distances: SharedDistances,
    pub stop: StopSignal,
}

impl FusionContext {
    pub fn new() -> Self {
        Self::default()
    }
}
