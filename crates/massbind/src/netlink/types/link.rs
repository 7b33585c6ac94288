//! Link (interface) message types and constants.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::netlink::error::{Error, Result};

/// IFLA_IFNAME - interface name attribute (null-terminated string).
pub const IFLA_IFNAME: u16 = 3;

/// ifinfomsg structure for RTM_*LINK messages.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct IfInfoMsg {
    /// Address family (AF_UNSPEC for link operations).
    pub ifi_family: u8,
    /// Padding, must be zero.
    pub ifi_pad: u8,
    /// Device type (ARPHRD_*).
    pub ifi_type: u16,
    /// Interface index.
    pub ifi_index: i32,
    /// Device flags (IFF_*).
    pub ifi_flags: u32,
    /// Change mask for ifi_flags.
    pub ifi_change: u32,
}

impl IfInfoMsg {
    /// Create a zeroed header (family AF_UNSPEC).
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert to bytes for message building.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse from the front of a reply payload.
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::Truncated {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        // Kernel ABI: struct ifinfomsg is 16 bytes.
        assert_eq!(std::mem::size_of::<IfInfoMsg>(), 16);
    }

    #[test]
    fn test_parse_index() {
        let mut msg = IfInfoMsg::new();
        msg.ifi_index = 42;
        let mut buf = msg.as_bytes().to_vec();
        buf.extend_from_slice(&[0xaa; 8]); // trailing attributes are ignored

        let parsed = IfInfoMsg::from_bytes(&buf).unwrap();
        assert_eq!(parsed.ifi_index, 42);
        assert_eq!(parsed.ifi_family, 0);
    }

    #[test]
    fn test_truncated_rejected() {
        assert!(IfInfoMsg::from_bytes(&[0u8; 15]).is_err());
    }
}
