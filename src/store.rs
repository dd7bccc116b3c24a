//! Transposition cache shared across searches and across runs.
//!
//! Three independent tables, all keyed by [`Fingerprint`]:
//! - generated children (the ordered legal actions of a position)
//! - leaf evaluations, from player 1's point of view
//! - root-optimal actions chosen by the deep strategy
//!
//! The driver loads the store once at start-up and saves it once at exit.
//! Persistence uses MessagePack via `rmp_serde` inside a versioned envelope.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::constants::CACHE_FORMAT_VERSION;
use crate::error::{Error, Result};
use crate::position::{Action, Fingerprint};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranspositionStore {
    children: HashMap<Fingerprint, Vec<Action>>,
    evaluations: HashMap<Fingerprint, i32>,
    optimal: HashMap<Fingerprint, Action>,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    store: &'a TranspositionStore,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    store: TranspositionStore,
}

impl TranspositionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store, falling back to an empty one on any failure.
    ///
    /// A missing, unreadable or malformed file is reported as a warning and
    /// never propagates to the caller.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(store) => {
                debug!(
                    "loaded transposition cache from {}: {} children, {} evaluations, {} optimal",
                    path.display(),
                    store.children.len(),
                    store.evaluations.len(),
                    store.optimal.len()
                );
                store
            }
            Err(e) => {
                warn!("starting with an empty transposition cache: {e}");
                Self::default()
            }
        }
    }

    /// Load a store, reporting why it could not be read.
    pub fn try_load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open cache file {}", path.display()),
            source,
        })?;

        let envelope: Envelope = rmp_serde::decode::from_read(BufReader::new(file))?;
        if envelope.version != CACHE_FORMAT_VERSION {
            return Err(Error::CacheVersion {
                found: envelope.version,
                expected: CACHE_FORMAT_VERSION,
            });
        }
        envelope.store.validate()?;
        Ok(envelope.store)
    }

    /// Reject entries no search could have produced. Cached children are
    /// applied without a legality check, so an off-board action here would
    /// corrupt the search.
    fn validate(&self) -> Result<()> {
        let invalid = |reason: String| -> Result<()> { Err(Error::CacheInvalid { reason }) };

        let keys = self
            .children
            .keys()
            .chain(self.evaluations.keys())
            .chain(self.optimal.keys());
        for key in keys {
            if !key.is_well_formed() {
                return invalid(format!("malformed position key {key:?}"));
            }
        }

        for (key, actions) in &self.children {
            let can_place = key.remaining(key.to_move()) > 0;
            for action in actions {
                if !action.in_bounds() {
                    return invalid(format!("off-board child action {action:?}"));
                }
                if !action.is_advance() && !can_place {
                    return invalid(format!("child barrier {action} without budget"));
                }
            }
        }

        for action in self.optimal.values() {
            if !action.in_bounds() {
                return invalid(format!("off-board optimal action {action:?}"));
            }
        }
        Ok(())
    }

    /// Write the store to `path`, replacing any previous file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create cache file {}", path.display()),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        let envelope = EnvelopeRef {
            version: CACHE_FORMAT_VERSION,
            store: self,
        };
        rmp_serde::encode::write(&mut writer, &envelope)?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush cache file {}", path.display()),
            source,
        })?;
        Ok(())
    }

    /// Cached legal actions of a position, in generation order.
    pub fn children(&self, key: &Fingerprint) -> Option<&[Action]> {
        self.children.get(key).map(Vec::as_slice)
    }

    pub fn insert_children(&mut self, key: Fingerprint, actions: Vec<Action>) {
        self.children.insert(key, actions);
    }

    /// Cached static evaluation, from player 1's point of view.
    pub fn evaluation(&self, key: &Fingerprint) -> Option<i32> {
        self.evaluations.get(key).copied()
    }

    pub fn insert_evaluation(&mut self, key: Fingerprint, value: i32) {
        self.evaluations.insert(key, value);
    }

    /// Action the deep strategy chose last time it searched this position.
    pub fn optimal(&self, key: &Fingerprint) -> Option<Action> {
        self.optimal.get(key).copied()
    }

    pub fn insert_optimal(&mut self, key: Fingerprint, action: Action) {
        self.optimal.insert(key, action);
    }

    /// Sizes of the three tables: (children, evaluations, optimal).
    pub fn sizes(&self) -> (usize, usize, usize) {
        (self.children.len(), self.evaluations.len(), self.optimal.len())
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.evaluations.is_empty() && self.optimal.is_empty()
    }

    pub fn clear(&mut self) {
        self.children.clear();
        self.evaluations.clear();
        self.optimal.clear();
    }
}
