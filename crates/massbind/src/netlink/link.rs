//! Interface resolution via RTM_GETLINK.

use super::builder::MessageBuilder;
use super::connection::Connection;
use super::error::{Error, Result};
use super::message::{NLM_F_REQUEST, NlMsgType};
use super::types::AF_UNSPEC;
use super::types::link::{IFLA_IFNAME, IfInfoMsg};

/// Build a targeted GETLINK request carrying the interface name.
///
/// The kernel answers a name-tagged GETLINK with the one matching link
/// instead of a dump, so resolution is a single round trip.
pub(crate) fn getlink_request(name: &str) -> MessageBuilder {
    let mut builder = MessageBuilder::new(NlMsgType::RTM_GETLINK, NLM_F_REQUEST);
    let mut info = IfInfoMsg::new();
    info.ifi_family = AF_UNSPEC;
    builder.append_struct(&info);
    builder.append_attr_str(IFLA_IFNAME, name);
    builder
}

impl Connection {
    /// Resolve an interface name to its kernel index.
    ///
    /// Issues one GETLINK exchange and takes `ifi_index` from the reply
    /// header. Does not require privileges.
    pub async fn resolve_ifindex(&self, name: &str) -> Result<u32> {
        let (header, payload) = self.request(getlink_request(name)).await.map_err(|e| {
            if e.is_not_found() {
                Error::InterfaceNotFound {
                    name: name.to_string(),
                }
            } else {
                e
            }
        })?;

        if header.nlmsg_type != NlMsgType::RTM_NEWLINK {
            return Err(Error::InvalidMessage(format!(
                "unexpected reply type {} to GETLINK",
                header.nlmsg_type
            )));
        }

        let info = IfInfoMsg::from_bytes(&payload)?;
        Ok(info.ifi_index as u32)
    }
}
