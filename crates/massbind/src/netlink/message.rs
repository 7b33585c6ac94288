//! Netlink message header, flags, and reply parsing.

use super::attr::{AttrIter, get};
use super::error::{Error, Result};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Netlink message alignment.
pub const NLMSG_ALIGNTO: usize = 4;

/// Align a length to the NLMSG_ALIGNTO boundary.
#[inline]
pub const fn nlmsg_align(len: usize) -> usize {
    (len + NLMSG_ALIGNTO - 1) & !(NLMSG_ALIGNTO - 1)
}

/// Size of the netlink message header.
pub const NLMSG_HDRLEN: usize = nlmsg_align(std::mem::size_of::<NlMsgHdr>());

/// Netlink message header (mirrors struct nlmsghdr).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlMsgHdr {
    /// Length of message including header.
    pub nlmsg_len: u32,
    /// Message type.
    pub nlmsg_type: u16,
    /// Request/ack flags.
    pub nlmsg_flags: u16,
    /// Sequence number.
    pub nlmsg_seq: u32,
    /// Sending port ID.
    pub nlmsg_pid: u32,
}

impl NlMsgHdr {
    /// Create a header with the length of the bare header.
    pub fn new(msg_type: u16, flags: u16) -> Self {
        Self {
            nlmsg_len: NLMSG_HDRLEN as u32,
            nlmsg_type: msg_type,
            nlmsg_flags: flags,
            nlmsg_seq: 0,
            nlmsg_pid: 0,
        }
    }

    /// Check if this is an error/ack envelope.
    pub fn is_error(&self) -> bool {
        self.nlmsg_type == NlMsgType::ERROR
    }

    /// Check if this ends a multipart reply.
    pub fn is_done(&self) -> bool {
        self.nlmsg_type == NlMsgType::DONE
    }

    /// Convert header to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse a header from the front of a buffer.
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::Truncated {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }
}

/// Netlink message types used by this crate.
pub struct NlMsgType;

impl NlMsgType {
    /// No operation, message must be discarded.
    pub const NOOP: u16 = 1;
    /// Error message or ACK.
    pub const ERROR: u16 = 2;
    /// End of multipart message.
    pub const DONE: u16 = 3;
    /// Data lost, request resend.
    pub const OVERRUN: u16 = 4;

    // Link messages
    pub const RTM_NEWLINK: u16 = 16;
    pub const RTM_DELLINK: u16 = 17;
    pub const RTM_GETLINK: u16 = 18;

    // Address messages
    pub const RTM_NEWADDR: u16 = 20;
    pub const RTM_DELADDR: u16 = 21;
    pub const RTM_GETADDR: u16 = 22;
}

/// Netlink message flags.
pub const NLM_F_REQUEST: u16 = 0x01;
pub const NLM_F_MULTI: u16 = 0x02;
pub const NLM_F_ACK: u16 = 0x04;
pub const NLM_F_ECHO: u16 = 0x08;

/// Iterator over the netlink messages packed into one receive buffer.
pub struct MessageIter<'a> {
    data: &'a [u8],
}

impl<'a> MessageIter<'a> {
    /// Iterate the messages in `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for MessageIter<'a> {
    type Item = Result<(&'a NlMsgHdr, &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.len() < NLMSG_HDRLEN {
            return None;
        }

        let header = match NlMsgHdr::from_bytes(self.data) {
            Ok(h) => h,
            Err(e) => return Some(Err(e)),
        };

        let msg_len = header.nlmsg_len as usize;
        if msg_len < NLMSG_HDRLEN || msg_len > self.data.len() {
            return Some(Err(Error::InvalidMessage(format!(
                "invalid message length: {}",
                msg_len
            ))));
        }

        let payload = &self.data[NLMSG_HDRLEN..msg_len];
        let aligned = nlmsg_align(msg_len);

        self.data = if aligned >= self.data.len() {
            &[]
        } else {
            &self.data[aligned..]
        };

        Some(Ok((header, payload)))
    }
}

/// Netlink error envelope payload (mirrors struct nlmsgerr).
///
/// A zero `error` field is the kernel's acknowledgment of success.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout)]
pub struct NlMsgError {
    /// Error code (negative errno, or 0 for ACK).
    pub error: i32,
    /// Header of the request that triggered this reply.
    pub msg: NlMsgHdr,
}

/// Extended-ack attribute carrying a human-readable message.
const NLMSGERR_ATTR_MSG: u16 = 1;

impl NlMsgError {
    /// Parse the envelope from an ERROR message payload.
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::Truncated {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }

    /// Check if this is an ACK (no error).
    pub fn is_ack(&self) -> bool {
        self.error == 0
    }

    /// Extended-ack message text, when the kernel attached one.
    ///
    /// `payload` is the same ERROR payload this envelope was parsed from;
    /// attributes follow the envelope structure.
    pub fn ext_ack_msg<'a>(&self, payload: &'a [u8]) -> Option<&'a str> {
        let offset = std::mem::size_of::<Self>();
        if payload.len() <= offset {
            return None;
        }
        AttrIter::new(&payload[offset..])
            .find(|(kind, _)| *kind == NLMSGERR_ATTR_MSG)
            .and_then(|(_, data)| get::string(data).ok())
    }

    /// Convert a non-zero envelope into an [`Error`], preferring the
    /// extended-ack text over strerror.
    pub fn to_error(&self, payload: &[u8]) -> Error {
        match self.ext_ack_msg(payload) {
            Some(msg) => Error::Kernel {
                errno: -self.error,
                message: msg.to_string(),
            },
            None => Error::from_errno(self.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::attr::NlAttr;

    fn raw_message(msg_type: u16, seq: u32, payload: &[u8]) -> Vec<u8> {
        let mut header = NlMsgHdr::new(msg_type, 0);
        header.nlmsg_seq = seq;
        header.nlmsg_len = (NLMSG_HDRLEN + payload.len()) as u32;
        let mut buf = header.as_bytes().to_vec();
        buf.extend_from_slice(payload);
        buf
    }

    fn error_payload(errno: i32) -> Vec<u8> {
        // nlmsgerr: i32 error + echoed request header
        let mut payload = errno.to_ne_bytes().to_vec();
        payload.extend_from_slice(NlMsgHdr::new(NlMsgType::RTM_NEWADDR, 0x05).as_bytes());
        payload
    }

    #[test]
    fn test_iterate_two_messages() {
        let mut buf = raw_message(NlMsgType::RTM_NEWLINK, 1, &[0u8; 16]);
        buf.extend_from_slice(&raw_message(NlMsgType::DONE, 1, &[]));

        let msgs: Vec<_> = MessageIter::new(&buf).map(|m| m.unwrap()).collect();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].0.nlmsg_type, NlMsgType::RTM_NEWLINK);
        assert_eq!(msgs[0].1.len(), 16);
        assert!(msgs[1].0.is_done());
    }

    #[test]
    fn test_iterate_rejects_bad_length() {
        let mut buf = raw_message(NlMsgType::RTM_NEWLINK, 1, &[]);
        buf[0] = 7; // below NLMSG_HDRLEN
        let first = MessageIter::new(&buf).next().unwrap();
        assert!(first.is_err());
    }

    #[test]
    fn test_short_buffer_yields_nothing() {
        assert!(MessageIter::new(&[0u8; 8]).next().is_none());
    }

    #[test]
    fn test_ack_envelope() {
        let payload = error_payload(0);
        let err = NlMsgError::from_bytes(&payload).unwrap();
        assert!(err.is_ack());
        assert_eq!(err.msg.nlmsg_type, NlMsgType::RTM_NEWADDR);
    }

    #[test]
    fn test_error_envelope_to_error() {
        let payload = error_payload(-17); // EEXIST
        let err = NlMsgError::from_bytes(&payload).unwrap();
        assert!(!err.is_ack());
        assert_eq!(err.to_error(&payload).errno(), Some(17));
    }

    #[test]
    fn test_truncated_envelope_rejected() {
        assert!(NlMsgError::from_bytes(&[0u8; 4]).is_err());
    }

    #[test]
    fn test_ext_ack_message_preferred() {
        let mut payload = error_payload(-22); // EINVAL
        let text = b"prefix length out of range\0";
        payload.extend_from_slice(NlAttr::new(NLMSGERR_ATTR_MSG, text.len()).as_bytes());
        payload.extend_from_slice(text);
        payload.extend_from_slice(&[0u8; 1]); // align

        let err = NlMsgError::from_bytes(&payload).unwrap();
        assert_eq!(err.ext_ack_msg(&payload), Some("prefix length out of range"));
        let e = err.to_error(&payload);
        assert_eq!(e.errno(), Some(22));
        assert!(e.to_string().contains("prefix length out of range"));
    }
}
