//! /64-bounded IPv6 range arithmetic and enumeration.
//!
//! A range is a pair of addresses that share their upper 64 bits; only the
//! low 64 bits (the host portion) vary. Enumeration is an arithmetic walk
//! over that host portion.

use std::net::Ipv6Addr;

use crate::netlink::{Error, Result};

/// Decode the low 64 bits of an address into a host-order integer.
pub fn low64(addr: Ipv6Addr) -> u64 {
    let o = addr.octets();
    u64::from_be_bytes([o[8], o[9], o[10], o[11], o[12], o[13], o[14], o[15]])
}

/// Rebuild an address from `prefix_of`'s upper 64 bits and a host value.
pub fn with_low64(prefix_of: Ipv6Addr, low: u64) -> Ipv6Addr {
    let mut octets = prefix_of.octets();
    octets[8..16].copy_from_slice(&low.to_be_bytes());
    Ipv6Addr::from(octets)
}

/// An inclusive, /64-bounded address range with a sequential cursor.
///
/// The cursor is 128 bits wide so that even a sweep of a whole /64
/// (2^64 addresses) terminates instead of wrapping.
#[derive(Debug, Clone)]
pub struct AddrRange {
    /// First address; also carries the shared upper 64 bits.
    start: Ipv6Addr,
    /// Low 64 bits of the first address, host order.
    low_start: u64,
    /// Low 64 bits of the last address, host order.
    low_end: u64,
    /// Sequential enumeration position; only ever increases.
    cursor: u128,
}

impl AddrRange {
    /// Build a range from its first and last address (both inclusive).
    ///
    /// Fails when the two addresses differ in their upper 64 bits or when
    /// `start` is numerically above `end`.
    pub fn new(start: Ipv6Addr, end: Ipv6Addr) -> Result<Self> {
        if start.octets()[..8] != end.octets()[..8] {
            return Err(Error::PrefixMismatch { start, end });
        }

        let low_start = low64(start);
        let low_end = low64(end);
        if low_start > low_end {
            return Err(Error::InvertedRange {
                start: low_start,
                end: low_end,
            });
        }

        Ok(Self {
            start,
            low_start,
            low_end,
            cursor: 0,
        })
    }

    /// The next address in ascending order, or `None` once the range is
    /// exhausted. Exhaustion is permanent; the cursor never resets.
    pub fn next_sequential(&mut self) -> Option<Ipv6Addr> {
        let low = self.low_start as u128 + self.cursor;
        if low > self.low_end as u128 {
            return None;
        }
        self.cursor += 1;
        Some(with_low64(self.start, low as u64))
    }

    /// Map a raw 64-bit draw uniformly onto the range.
    ///
    /// The draw is reduced modulo the inclusive span; a full-span range
    /// takes the draw as-is, since every value already lands inside.
    pub fn pick(&self, draw: u64) -> Ipv6Addr {
        let span = self.low_end - self.low_start;
        let low = if span == u64::MAX {
            draw
        } else {
            self.low_start + draw % (span + 1)
        };
        with_low64(self.start, low)
    }

    /// Total number of addresses in the range. Never zero.
    pub fn count(&self) -> u128 {
        (self.low_end - self.low_start) as u128 + 1
    }

    /// Addresses not yet yielded by sequential enumeration.
    pub fn remaining(&self) -> u128 {
        self.count().saturating_sub(self.cursor)
    }

    /// Low 64 bits of the first address.
    pub fn low_start(&self) -> u64 {
        self.low_start
    }

    /// Low 64 bits of the last address.
    pub fn low_end(&self) -> u64 {
        self.low_end
    }
}
