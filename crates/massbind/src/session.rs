//! A provisioning session: one interface, one /64-bounded range.

use std::fs::File;
use std::io::Read;
use std::net::Ipv6Addr;

use tracing::debug;

use crate::netlink::{Connection, Result};
use crate::range::AddrRange;
use crate::util::ifname;

/// Where random draws come from. Uniformity is all that matters here;
/// nothing about these addresses is a secret.
const ENTROPY_SOURCE: &str = "/dev/urandom";

/// An open provisioning session.
///
/// Owns a netlink connection, the random source, and the enumeration
/// cursor. The session is single-threaded by construction: enumeration
/// takes `&mut self`, mutations run one at a time, and nothing is `Clone`.
/// Dropping the session closes both handles; [`close`](Self::close) makes
/// that explicit at the call site.
pub struct Session {
    conn: Connection,
    entropy: File,
    device: String,
    ifindex: u32,
    prefix_len: u8,
    range: AddrRange,
}

impl Session {
    /// Validate the inputs, open the OS handles, and resolve the interface.
    ///
    /// The name and range checks run before anything is opened, so invalid
    /// input never costs a file descriptor. The netlink exchange is a
    /// single GETLINK round trip; its failure (including an unknown
    /// interface) fails the open, and any handle opened earlier is closed
    /// on the way out.
    pub async fn open(
        device: &str,
        start: Ipv6Addr,
        end: Ipv6Addr,
        prefix_len: u8,
    ) -> Result<Self> {
        ifname::validate(device)?;
        let range = AddrRange::new(start, end)?;

        let entropy = File::open(ENTROPY_SOURCE)?;
        let conn = Connection::new()?;
        let ifindex = conn.resolve_ifindex(device).await?;

        debug!(device, ifindex, prefix_len, count = %range.count(), "session open");

        Ok(Self {
            conn,
            entropy,
            device: device.to_string(),
            ifindex,
            prefix_len,
            range,
        })
    }

    /// The next address in ascending order, or `None` once the range is
    /// exhausted. Exhaustion is permanent for this session.
    pub fn next_sequential(&mut self) -> Option<Ipv6Addr> {
        self.range.next_sequential()
    }

    /// An address drawn uniformly at random from the range.
    ///
    /// Never exhausts and does not advance the sequential cursor. Fails
    /// only if the random source does.
    pub fn next_random(&mut self) -> Result<Ipv6Addr> {
        let mut draw = [0u8; 8];
        self.entropy.read_exact(&mut draw)?;
        Ok(self.range.pick(u64::from_ne_bytes(draw)))
    }

    /// Add one address to the interface.
    ///
    /// A kernel rejection is returned to the caller and leaves the session
    /// fully usable; nothing is retried.
    pub async fn add(&self, addr: Ipv6Addr) -> Result<()> {
        debug!(address = %addr, device = %self.device, "add");
        self.conn
            .add_address6(self.ifindex, addr, self.prefix_len)
            .await
            .map_err(|e| e.with_context(self.describe("adding", addr)))
    }

    /// Delete one address from the interface.
    pub async fn delete(&self, addr: Ipv6Addr) -> Result<()> {
        debug!(address = %addr, device = %self.device, "delete");
        self.conn
            .del_address6(self.ifindex, addr, self.prefix_len)
            .await
            .map_err(|e| e.with_context(self.describe("deleting", addr)))
    }

    /// Release the netlink channel and the random source.
    ///
    /// Equivalent to dropping the session; close errors from the OS are
    /// not surfaced.
    pub fn close(self) {}

    /// The interface name this session is bound to.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// The resolved kernel interface index.
    pub fn ifindex(&self) -> u32 {
        self.ifindex
    }

    /// The prefix length applied to every mutation.
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Addresses the sequential enumerator has not yielded yet.
    pub fn remaining(&self) -> u128 {
        self.range.remaining()
    }

    fn describe(&self, verb: &str, addr: Ipv6Addr) -> String {
        format!(
            "{} {}/{} on {}",
            verb, addr, self.prefix_len, self.device
        )
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!(device = %self.device, "session closed");
    }
}
