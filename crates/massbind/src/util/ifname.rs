//! Interface name validation.

use crate::netlink::{Error, Result};

/// Maximum interface name length (including null terminator), per the
/// kernel's IFNAMSIZ.
pub const IFNAMSIZ: usize = 16;

/// Validate an interface name before it is put on the wire.
///
/// Rejects names the kernel could never match, so a bad name fails here,
/// before any handle is opened.
pub fn validate(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidName("empty name".to_string()));
    }

    if name.len() >= IFNAMSIZ {
        return Err(Error::InvalidName(format!(
            "name too long (max {} chars)",
            IFNAMSIZ - 1
        )));
    }

    if name.contains('/') || name.contains('\0') {
        return Err(Error::InvalidName(
            "name contains invalid characters".to_string(),
        ));
    }

    if name.chars().any(|c| c.is_whitespace()) {
        return Err(Error::InvalidName("name contains whitespace".to_string()));
    }

    Ok(())
}
