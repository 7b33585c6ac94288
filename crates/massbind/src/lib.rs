//! Bulk IPv6 address provisioning over rtnetlink.
//!
//! This crate assigns or removes a contiguous, /64-bounded range of IPv6
//! addresses on a network interface by talking routing-netlink to the kernel
//! directly, with no external tools involved. It exists for workloads that
//! want thousands of addresses on one host: scanners, honeypots,
//! address-space testing.
//!
//! A [`Session`] binds one interface and one address range. Addresses are
//! enumerated either sequentially or uniformly at random, and each one is
//! applied with a single `RTM_NEWADDR`/`RTM_DELADDR` exchange that suppresses
//! duplicate address detection and the automatic prefix route.
//!
//! # Example
//!
//! ```ignore
//! use massbind::Session;
//!
//! let mut session = Session::open(
//!     "eth0",
//!     "fd00::1".parse()?,
//!     "fd00::ffff".parse()?,
//!     64,
//! ).await?;
//!
//! while let Some(addr) = session.next_sequential() {
//!     if let Err(e) = session.add(addr).await {
//!         eprintln!("{}: {}", addr, e);
//!     }
//! }
//! ```
//!
//! Mutations require `CAP_NET_ADMIN`; interface resolution does not.
//!
//! The library never retries and never applies a timeout to a netlink
//! exchange: a kernel that does not answer stalls the caller. Callers that
//! want deadlines or retries add them on top.

pub mod netlink;
pub mod range;
pub mod session;
pub mod util;

pub use netlink::{Error, Result};
pub use range::AddrRange;
pub use session::Session;
