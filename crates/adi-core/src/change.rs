// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Change masks and change observers.
//!
//! Every node accumulates a [`ChangeMask`] as it is mutated. The hosting
//! runtime either polls and clears masks
//! ([`AddressSpace::collect_changes`](crate::address_space::AddressSpace::collect_changes))
//! or registers a [`ChangeObserver`] on a node, which is notified when the
//! node's mask is cleared.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::types::{NodeId, QualifiedName};

// =============================================================================
// ChangeMask
// =============================================================================

/// Bit set describing what changed on a node since the last clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeMask(u8);

impl ChangeMask {
    /// Nothing changed.
    pub const NONE: ChangeMask = ChangeMask(0);
    /// A child was added, removed or replaced.
    pub const CHILDREN: ChangeMask = ChangeMask(0x01);
    /// A reference changed.
    pub const REFERENCES: ChangeMask = ChangeMask(0x02);
    /// The value attribute changed.
    pub const VALUE: ChangeMask = ChangeMask(0x04);
    /// A non-value attribute changed.
    pub const NON_VALUE: ChangeMask = ChangeMask(0x08);
    /// The node was removed from its parent.
    pub const DELETED: ChangeMask = ChangeMask(0x10);

    /// Creates a mask from raw bits.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Returns `true` if no bit is set.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every bit of `other` is set.
    pub const fn contains(&self, other: ChangeMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if any bit of `other` is set.
    pub const fn intersects(&self, other: ChangeMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for ChangeMask {
    type Output = ChangeMask;

    fn bitor(self, rhs: ChangeMask) -> ChangeMask {
        ChangeMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for ChangeMask {
    fn bitor_assign(&mut self, rhs: ChangeMask) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ChangeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "None");
        }
        let names = [
            (Self::CHILDREN, "Children"),
            (Self::REFERENCES, "References"),
            (Self::VALUE, "Value"),
            (Self::NON_VALUE, "NonValue"),
            (Self::DELETED, "Deleted"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        Ok(())
    }
}

// =============================================================================
// ChangeRecord
// =============================================================================

/// A cleared change mask, as delivered to observers and pollers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// The changed node.
    pub node_id: NodeId,
    /// The changed node's browse name.
    pub browse_name: QualifiedName,
    /// What changed.
    pub mask: ChangeMask,
    /// When the mask was cleared.
    pub timestamp: DateTime<Utc>,
}

impl ChangeRecord {
    /// Creates a record stamped with the current time.
    pub fn new(node_id: NodeId, browse_name: QualifiedName, mask: ChangeMask) -> Self {
        Self {
            node_id,
            browse_name,
            mask,
            timestamp: Utc::now(),
        }
    }
}

// =============================================================================
// ChangeObserver
// =============================================================================

/// Receives change notifications when a node's mask is cleared.
///
/// Observers run synchronously on the clearing thread and must not block.
pub trait ChangeObserver: Send + Sync {
    /// Returns the observer name for logging.
    fn name(&self) -> &str {
        "anonymous"
    }

    /// Handles a change record.
    fn on_change(&self, record: &ChangeRecord);
}

impl<F> ChangeObserver for F
where
    F: Fn(&ChangeRecord) + Send + Sync,
{
    fn on_change(&self, record: &ChangeRecord) {
        self(record)
    }
}

/// An observer that logs changes using tracing.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ChangeObserver for TracingObserver {
    fn name(&self) -> &str {
        "tracing_observer"
    }

    fn on_change(&self, record: &ChangeRecord) {
        tracing::debug!(
            node_id = %record.node_id,
            browse_name = %record.browse_name,
            mask = %record.mask,
            "Node changed"
        );
    }
}

/// An observer that collects records in memory (useful for testing).
#[derive(Debug, Default)]
pub struct ChangeCollector {
    records: RwLock<Vec<ChangeRecord>>,
}

impl ChangeCollector {
    /// Creates a new collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns collected records.
    pub fn records(&self) -> Vec<ChangeRecord> {
        self.records.read().clone()
    }

    /// Clears collected records.
    pub fn clear(&self) {
        self.records.write().clear();
    }

    /// Returns the number of collected records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if no records were collected.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl ChangeObserver for ChangeCollector {
    fn name(&self) -> &str {
        "change_collector"
    }

    fn on_change(&self, record: &ChangeRecord) {
        self.records.write().push(record.clone());
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_operations() {
        let mut mask = ChangeMask::NONE;
        assert!(mask.is_empty());

        mask |= ChangeMask::VALUE;
        mask |= ChangeMask::CHILDREN;
        assert!(mask.contains(ChangeMask::VALUE));
        assert!(mask.contains(ChangeMask::CHILDREN | ChangeMask::VALUE));
        assert!(!mask.contains(ChangeMask::DELETED));
        assert!(mask.intersects(ChangeMask::DELETED | ChangeMask::VALUE));
        assert_eq!(mask.bits(), 0x05);
    }

    #[test]
    fn test_mask_display() {
        assert_eq!(ChangeMask::NONE.to_string(), "None");
        assert_eq!(
            (ChangeMask::CHILDREN | ChangeMask::VALUE).to_string(),
            "Children|Value"
        );
    }

    #[test]
    fn test_collector_and_closure_observers() {
        let collector = ChangeCollector::new();
        let record = ChangeRecord::new(
            NodeId::string(1, "Device"),
            QualifiedName::new(1, "Device"),
            ChangeMask::VALUE,
        );
        collector.on_change(&record);
        assert_eq!(collector.len(), 1);
        assert_eq!(collector.records()[0].mask, ChangeMask::VALUE);
        collector.clear();
        assert!(collector.is_empty());

        let seen = RwLock::new(0u32);
        let closure = |r: &ChangeRecord| *seen.write() += u32::from(r.mask.bits());
        closure.on_change(&record);
        assert_eq!(*seen.read(), 4);
    }
}
