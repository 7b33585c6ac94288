//! Request/reply exchange over a netlink socket.

use super::builder::MessageBuilder;
use super::error::{Error, Result};
use super::message::{MessageIter, NlMsgError, NlMsgHdr};
use super::socket::NetlinkSocket;

/// A NETLINK_ROUTE connection.
///
/// Exchanges are strictly sequential: one request is sent, then exactly one
/// reply datagram is awaited. No timeout is applied; a kernel that never
/// answers stalls the caller. Replies are correlated with their request by
/// sequence number, so a stray datagram from an earlier exchange is skipped
/// rather than misinterpreted.
pub struct Connection {
    socket: NetlinkSocket,
}

impl Connection {
    /// Open a new connection.
    pub fn new() -> Result<Self> {
        Ok(Self {
            socket: NetlinkSocket::new()?,
        })
    }

    /// Get the underlying socket.
    pub fn socket(&self) -> &NetlinkSocket {
        &self.socket
    }

    /// Send a request and return its single data reply.
    ///
    /// An error envelope carrying a non-zero code fails the exchange; the
    /// matched reply is returned as a copied header plus owned payload.
    pub async fn request(&self, builder: MessageBuilder) -> Result<(NlMsgHdr, Vec<u8>)> {
        let seq = self.send_tagged(builder).await?;

        let response = self.socket.recv_msg().await?;
        for result in MessageIter::new(&response) {
            let (header, payload) = result?;

            if header.nlmsg_seq != seq {
                continue;
            }

            if header.is_error() {
                let err = NlMsgError::from_bytes(payload)?;
                if err.is_ack() {
                    continue;
                }
                return Err(err.to_error(payload));
            }

            return Ok((*header, payload.to_vec()));
        }

        Err(Error::InvalidMessage("no reply matched the request".into()))
    }

    /// Send a request that expects an acknowledgment envelope only.
    pub async fn request_ack(&self, builder: MessageBuilder) -> Result<()> {
        let seq = self.send_tagged(builder).await?;

        let response = self.socket.recv_msg().await?;
        for result in MessageIter::new(&response) {
            let (header, payload) = result?;

            if header.nlmsg_seq != seq {
                continue;
            }

            if header.is_error() {
                let err = NlMsgError::from_bytes(payload)?;
                if err.is_ack() {
                    return Ok(());
                }
                return Err(err.to_error(payload));
            }
        }

        Err(Error::InvalidMessage("expected acknowledgment".into()))
    }

    /// Stamp seq and pid into the request and send it. Returns the seq.
    async fn send_tagged(&self, mut builder: MessageBuilder) -> Result<u32> {
        let seq = self.socket.next_seq();
        builder.set_seq(seq);
        builder.set_pid(self.socket.pid());

        let msg = builder.finish();
        self.socket.send(&msg).await?;
        Ok(seq)
    }
}
