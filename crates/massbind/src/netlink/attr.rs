//! Netlink attribute (rtattr/nlattr) framing.
//!
//! A netlink attribute is a `{length, type}` header followed by a payload,
//! padded to 4-byte alignment. [`MessageBuilder::append_attr`] and
//! [`AttrIter`] are the only two places in the crate that touch this layout.
//!
//! [`MessageBuilder::append_attr`]: super::MessageBuilder::append_attr

use super::error::{Error, Result};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Netlink attribute alignment.
pub const NLA_ALIGNTO: usize = 4;

/// Align a length to the NLA_ALIGNTO boundary.
#[inline]
pub const fn nla_align(len: usize) -> usize {
    (len + NLA_ALIGNTO - 1) & !(NLA_ALIGNTO - 1)
}

/// Size of the attribute header.
pub const NLA_HDRLEN: usize = 4;

/// Netlink attribute header (mirrors struct nlattr / struct rtattr).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlAttr {
    /// Length including this header.
    pub nla_len: u16,
    /// Attribute type.
    pub nla_type: u16,
}

impl NlAttr {
    /// Create a header for a payload of `data_len` bytes.
    pub fn new(attr_type: u16, data_len: usize) -> Self {
        Self {
            nla_len: (NLA_HDRLEN + data_len) as u16,
            nla_type: attr_type,
        }
    }

    /// Payload length (total length minus header).
    pub fn payload_len(&self) -> usize {
        (self.nla_len as usize).saturating_sub(NLA_HDRLEN)
    }

    /// Convert to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse from the front of a buffer.
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::Truncated {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }
}

/// Iterator over the attributes in a message payload.
pub struct AttrIter<'a> {
    data: &'a [u8],
}

impl<'a> AttrIter<'a> {
    /// Iterate the attributes in `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for AttrIter<'a> {
    /// Yields (attribute type, payload).
    type Item = (u16, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.len() < NLA_HDRLEN {
            return None;
        }

        let attr = NlAttr::from_bytes(self.data).ok()?;

        let len = attr.nla_len as usize;
        if len < NLA_HDRLEN || len > self.data.len() {
            return None;
        }

        let payload = &self.data[NLA_HDRLEN..len];
        let aligned = nla_align(len);

        self.data = if aligned >= self.data.len() {
            &[]
        } else {
            &self.data[aligned..]
        };

        Some((attr.nla_type, payload))
    }
}

/// Typed extraction from attribute payloads.
pub mod get {
    use super::*;

    /// Extract a u32 value (native endian).
    pub fn u32_ne(data: &[u8]) -> Result<u32> {
        if data.len() < 4 {
            return Err(Error::InvalidAttribute("truncated u32 attribute".into()));
        }
        Ok(u32::from_ne_bytes([data[0], data[1], data[2], data[3]]))
    }

    /// Extract a null-terminated string.
    pub fn string(data: &[u8]) -> Result<&str> {
        let len = data.iter().position(|&b| b == 0).unwrap_or(data.len());
        std::str::from_utf8(&data[..len])
            .map_err(|e| Error::InvalidAttribute(format!("invalid UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nla_align() {
        assert_eq!(nla_align(0), 0);
        assert_eq!(nla_align(1), 4);
        assert_eq!(nla_align(4), 4);
        assert_eq!(nla_align(5), 8);
        assert_eq!(nla_align(16), 16);
    }

    #[test]
    fn test_iterate_padded_attrs() {
        // Two attributes: type 1 with a 5-byte payload (padded to 8),
        // type 8 with a 4-byte payload.
        let mut buf = Vec::new();
        buf.extend_from_slice(NlAttr::new(1, 5).as_bytes());
        buf.extend_from_slice(b"hello");
        buf.extend_from_slice(&[0u8; 3]); // pad
        buf.extend_from_slice(NlAttr::new(8, 4).as_bytes());
        buf.extend_from_slice(&0x0202u32.to_ne_bytes());

        let attrs: Vec<_> = AttrIter::new(&buf).collect();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0], (1, &b"hello"[..]));
        assert_eq!(attrs[1].0, 8);
        assert_eq!(get::u32_ne(attrs[1].1).unwrap(), 0x0202);
    }

    #[test]
    fn test_iterate_stops_on_garbage_length() {
        let mut buf = Vec::new();
        buf.extend_from_slice(NlAttr::new(1, 200).as_bytes()); // claims more than present
        buf.extend_from_slice(&[0u8; 4]);
        assert_eq!(AttrIter::new(&buf).count(), 0);
    }

    #[test]
    fn test_get_string() {
        assert_eq!(get::string(b"eth0\0").unwrap(), "eth0");
        assert_eq!(get::string(b"eth0").unwrap(), "eth0");
        assert_eq!(get::string(b"eth0\0junk").unwrap(), "eth0");
        assert!(get::string(&[0xff, 0xfe]).is_err());
    }

    #[test]
    fn test_get_u32_truncated() {
        assert!(get::u32_ne(&[1, 2]).is_err());
    }
}
