//! Routing-netlink plumbing.
//!
//! This module carries everything that has to be bit-exact against the
//! kernel: message and attribute framing ([`message`], [`attr`]), request
//! construction ([`MessageBuilder`]), the socket itself ([`NetlinkSocket`]),
//! and the request/reply exchange ([`Connection`]).
//!
//! The protocol surface is deliberately small: one `RTM_GETLINK` lookup to
//! resolve an interface name ([`Connection::resolve_ifindex`]) and the
//! `RTM_NEWADDR`/`RTM_DELADDR` mutations ([`Connection::add_address6`],
//! [`Connection::del_address6`]). Every request is tagged with a sequence
//! number and its reply is matched against it.

pub mod addr;
pub mod attr;
mod builder;
pub mod connection;
mod error;
pub mod link;
pub mod message;
mod socket;
pub mod types;

pub use attr::{AttrIter, NlAttr};
pub use builder::MessageBuilder;
pub use connection::Connection;
pub use error::{Error, Result};
pub use message::{MessageIter, NLMSG_HDRLEN, NlMsgError, NlMsgHdr, NlMsgType};
pub use socket::NetlinkSocket;
