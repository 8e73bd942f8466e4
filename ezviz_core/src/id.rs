// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable mark identities.

use core::fmt;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// A stable identifier for a mark across render passes.
///
/// Ids are derived hierarchically: a chart scope, then a series key, then a category key.
/// Two marks rendered in different passes with the same derivation path are the same element,
/// regardless of the order they were emitted in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(pub u64);

impl MarkId {
    /// The root scope every derivation starts from.
    pub const ROOT: Self = Self(FNV_OFFSET);

    /// Wraps a raw id.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Derives a child id keyed by a string (series name, category name, role).
    #[must_use]
    pub fn child(self, key: &str) -> Self {
        // 0xff never occurs in UTF-8, so `("ab", "c")` and `("a", "bc")` stay distinct.
        let mut hash = fnv_step(self.0, 0xff);
        for byte in key.bytes() {
            hash = fnv_step(hash, byte);
        }
        Self(hash)
    }

    /// Derives a child id keyed by a position (tick index, legend row).
    #[must_use]
    pub fn child_index(self, index: usize) -> Self {
        let mut hash = fnv_step(self.0, 0xfe);
        for byte in (index as u64).to_le_bytes() {
            hash = fnv_step(hash, byte);
        }
        Self(hash)
    }

    /// Derives an id keyed by a scope name from the root.
    pub fn keyed(scope: &str) -> Self {
        Self::ROOT.child(scope)
    }
}

fn fnv_step(hash: u64, byte: u8) -> u64 {
    (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
}

impl fmt::Debug for MarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MarkId({:#018x})", self.0)
    }
}
