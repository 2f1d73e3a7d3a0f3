//! Named in-process locks.
//!
//! The registry hands out one reader-writer lock per path. Callers lock a
//! whole plan at once: the directories from the store root down to a layer,
//! outermost first, then whatever the operation mutates. Because every plan
//! is ordered root-first, two plans that share locks always take them in the
//! same order. Other processes are not coordinated.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;

/// How a path in a lock plan is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Shared,
    Exclusive,
}

/// A held lock; released on drop.
enum Guard<'a> {
    #[allow(dead_code)]
    Read(RwLockReadGuard<'a, ()>),
    #[allow(dead_code)]
    Write(RwLockWriteGuard<'a, ()>),
}

/// Registry of path-keyed locks shared by a store and the stores derived from it.
///
/// Entries exist only while some caller holds or waits on them.
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: Mutex<HashMap<PathBuf, Arc<RwLock<()>>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the lock registered under `path`, creating it on first use.
    fn entry(&self, path: &Path) -> Arc<RwLock<()>> {
        // The guarded data is `()`, so a poisoned lock carries no broken state.
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(locks.entry(path.to_path_buf()).or_default())
    }

    /// Drop entries nobody else is holding.
    fn prune<'p>(&self, paths: impl Iterator<Item = &'p PathBuf>) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        for path in paths {
            if locks.get(path).is_some_and(|lock| Arc::strong_count(lock) == 1) {
                locks.remove(path);
            }
        }
    }

    /// Run `f` while holding every lock in `plan`, acquired in order.
    pub fn with_locks<T>(&self, plan: &[(PathBuf, Access)], f: impl FnOnce() -> T) -> T {
        let locks: Vec<(Arc<RwLock<()>>, Access)> = plan
            .iter()
            .map(|(path, access)| (self.entry(path), *access))
            .collect();

        let result = {
            let _guards: Vec<Guard<'_>> = locks
                .iter()
                .map(|(lock, access)| match access {
                    Access::Shared => Guard::Read(lock.read().unwrap_or_else(|e| e.into_inner())),
                    Access::Exclusive => {
                        Guard::Write(lock.write().unwrap_or_else(|e| e.into_inner()))
                    }
                })
                .collect();

            if let Some((path, access)) = plan.last() {
                debug!("Acquired {} locks ending at {} ({:?})", plan.len(), path.display(), access);
            }
            f()
        };

        drop(locks);
        self.prune(plan.iter().map(|(path, _)| path));
        result
    }

    /// Number of paths currently held or waited on.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
