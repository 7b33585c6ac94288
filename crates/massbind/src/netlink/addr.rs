//! IPv6 address mutation via RTM_NEWADDR / RTM_DELADDR.

use std::net::Ipv6Addr;

use super::builder::MessageBuilder;
use super::connection::Connection;
use super::error::Result;
use super::message::{NLM_F_ACK, NLM_F_REQUEST, NlMsgType};
use super::types::AF_INET6;
use super::types::addr::{IfAddrMsg, ifa, ifa_flags};

/// Flags applied to every address this crate touches: DAD is skipped and no
/// prefix route is installed, for additions and deletions alike.
const PROVISION_FLAGS: u32 = ifa_flags::NODAD | ifa_flags::NOPREFIXROUTE;

/// Build one add/delete request for `addr/prefix_len` on the interface.
pub(crate) fn addr_request(
    msg_type: u16,
    ifindex: u32,
    addr: Ipv6Addr,
    prefix_len: u8,
) -> MessageBuilder {
    let mut builder = MessageBuilder::new(msg_type, NLM_F_REQUEST | NLM_F_ACK);
    builder.append_struct(
        &IfAddrMsg::new()
            .with_family(AF_INET6)
            .with_prefixlen(prefix_len)
            .with_index(ifindex),
    );
    builder.append_attr(ifa::ADDRESS, &addr.octets());
    builder.append_attr_u32(ifa::FLAGS, PROVISION_FLAGS);
    builder
}

impl Connection {
    /// Add `addr/prefix_len` on the interface with the given index.
    ///
    /// The exchange always requests an acknowledgment; a zero error code in
    /// the reply envelope is success, anything else surfaces as
    /// [`Error::Kernel`](super::Error::Kernel) with the errno preserved.
    pub async fn add_address6(&self, ifindex: u32, addr: Ipv6Addr, prefix_len: u8) -> Result<()> {
        self.request_ack(addr_request(NlMsgType::RTM_NEWADDR, ifindex, addr, prefix_len))
            .await
    }

    /// Delete `addr/prefix_len` from the interface with the given index.
    pub async fn del_address6(&self, ifindex: u32, addr: Ipv6Addr, prefix_len: u8) -> Result<()> {
        self.request_ack(addr_request(NlMsgType::RTM_DELADDR, ifindex, addr, prefix_len))
            .await
    }
}
