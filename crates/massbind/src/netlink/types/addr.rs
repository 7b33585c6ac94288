//! Address message types and constants.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Address message attributes (IFA_*).
pub mod ifa {
    /// Interface address (16 raw bytes for IPv6).
    pub const ADDRESS: u16 = 1;
    /// Local address (equals ADDRESS except on point-to-point links).
    pub const LOCAL: u16 = 2;
    /// Address label (IPv4 only).
    pub const LABEL: u16 = 3;
    /// Extended 32-bit address flags; supersedes the 8-bit header field.
    pub const FLAGS: u16 = 8;
}

/// Extended address flags (IFA_F_*).
pub mod ifa_flags {
    /// Skip duplicate address detection.
    pub const NODAD: u32 = 0x02;
    /// Address is permanent (kernel-set).
    pub const PERMANENT: u32 = 0x80;
    /// Do not create an automatic prefix route.
    pub const NOPREFIXROUTE: u32 = 0x200;
}

/// ifaddrmsg structure for RTM_*ADDR messages.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct IfAddrMsg {
    /// Address family (AF_INET6 here).
    pub ifa_family: u8,
    /// Prefix length of the address.
    pub ifa_prefixlen: u8,
    /// Legacy 8-bit flags; superseded by the IFA_FLAGS attribute.
    pub ifa_flags: u8,
    /// Address scope (RT_SCOPE_*).
    pub ifa_scope: u8,
    /// Interface index.
    pub ifa_index: u32,
}

impl IfAddrMsg {
    /// Create a zeroed header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the address family.
    pub fn with_family(mut self, family: u8) -> Self {
        self.ifa_family = family;
        self
    }

    /// Set the prefix length.
    pub fn with_prefixlen(mut self, prefixlen: u8) -> Self {
        self.ifa_prefixlen = prefixlen;
        self
    }

    /// Set the interface index.
    pub fn with_index(mut self, index: u32) -> Self {
        self.ifa_index = index;
        self
    }

    /// Convert to bytes for message building.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        // Kernel ABI: struct ifaddrmsg is 8 bytes.
        assert_eq!(std::mem::size_of::<IfAddrMsg>(), 8);
    }

    #[test]
    fn test_builder_fields() {
        let msg = IfAddrMsg::new()
            .with_family(crate::netlink::types::AF_INET6)
            .with_prefixlen(64)
            .with_index(7);
        assert_eq!(msg.ifa_family, 10);
        assert_eq!(msg.ifa_prefixlen, 64);
        assert_eq!(msg.ifa_index, 7);
        assert_eq!(msg.ifa_flags, 0);
        assert_eq!(msg.ifa_scope, 0);
    }

    #[test]
    fn test_flag_values() {
        // Pinned to the kernel's IFA_F_* values.
        assert_eq!(ifa_flags::NODAD, 0x02);
        assert_eq!(ifa_flags::NOPREFIXROUTE, 0x200);
        assert_eq!(ifa_flags::NODAD | ifa_flags::NOPREFIXROUTE, 0x202);
    }
}
