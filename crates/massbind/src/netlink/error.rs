//! Error types for netlink and range operations.

use std::io;
use std::net::Ipv6Addr;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by sessions and the netlink layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from socket or file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Kernel rejected a request.
    #[error("kernel error: {message} (errno {errno})")]
    Kernel {
        /// The errno value from the kernel, as a positive number.
        errno: i32,
        /// Human-readable message (extended ack text when the kernel
        /// provides one, strerror otherwise).
        message: String,
    },

    /// Kernel error with operation context.
    #[error("{operation}: {message} (errno {errno})")]
    KernelWithContext {
        /// The operation that failed.
        operation: String,
        /// The errno value from the kernel, as a positive number.
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// Reply was shorter than the structure it must carry.
    #[error("message truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Minimum expected length.
        expected: usize,
        /// Actual bytes available.
        actual: usize,
    },

    /// Reply did not follow the protocol.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Attribute payload did not match its advertised type.
    #[error("invalid attribute: {0}")]
    InvalidAttribute(String),

    /// Interface name did not resolve to a kernel index.
    #[error("interface not found: {name}")]
    InterfaceNotFound {
        /// The interface name that was looked up.
        name: String,
    },

    /// Interface name is empty, too long, or contains invalid characters.
    #[error("invalid interface name: {0}")]
    InvalidName(String),

    /// Range start and end do not share their upper 64 bits.
    #[error("range {start}..{end} spans more than one /64 prefix")]
    PrefixMismatch {
        /// First address of the range.
        start: Ipv6Addr,
        /// Last address of the range.
        end: Ipv6Addr,
    },

    /// Range start is numerically above range end.
    #[error("range is inverted: start {start:#x} is above end {end:#x}")]
    InvertedRange {
        /// Low 64 bits of the start address, host order.
        start: u64,
        /// Low 64 bits of the end address, host order.
        end: u64,
    },
}

impl Error {
    /// Create a kernel error from a raw (negative) errno value.
    pub fn from_errno(errno: i32) -> Self {
        let message = io::Error::from_raw_os_error(-errno).to_string();
        Self::Kernel {
            errno: -errno,
            message,
        }
    }

    /// Wrap a kernel error with operation context. Other errors are
    /// returned unchanged.
    pub fn with_context(self, operation: impl Into<String>) -> Self {
        match self {
            Self::Kernel { errno, message } => Self::KernelWithContext {
                operation: operation.into(),
                errno,
                message,
            },
            other => other,
        }
    }

    /// Check if this is a "not found" error (ENOENT, ENODEV).
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Kernel { errno, .. } | Self::KernelWithContext { errno, .. } => {
                matches!(*errno, 2 | 19) // ENOENT=2, ENODEV=19
            }
            Self::InterfaceNotFound { .. } => true,
            _ => false,
        }
    }

    /// Check if this is a permission error (EPERM, EACCES).
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::Kernel { errno, .. } | Self::KernelWithContext { errno, .. } => {
                matches!(*errno, 1 | 13) // EPERM=1, EACCES=13
            }
            _ => false,
        }
    }

    /// Get the errno value if this is a kernel error.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Kernel { errno, .. } | Self::KernelWithContext { errno, .. } => Some(*errno),
            _ => None,
        }
    }
}
