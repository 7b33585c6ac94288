//! Integration tests against a real kernel.
//!
//! Enable with `cargo test --features integration`. Resolution tests run
//! unprivileged; mutation tests need CAP_NET_ADMIN and skip themselves
//! otherwise:
//!
//! ```bash
//! sudo cargo test --features integration -- --nocapture
//! ```

use std::net::Ipv6Addr;

use massbind::{Result, Session};

fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

/// Skip the current test (successfully) unless running as root.
macro_rules! require_root {
    () => {
        if !is_root() {
            eprintln!("skipping: requires root (CAP_NET_ADMIN)");
            return Ok(());
        }
    };
}

fn addr(s: &str) -> Ipv6Addr {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_resolve_loopback() -> Result<()> {
    let session = Session::open("lo", addr("fd00:6d62::1"), addr("fd00:6d62::1"), 128).await?;
    assert!(session.ifindex() > 0);
    assert_eq!(session.device(), "lo");
    session.close();
    Ok(())
}

#[tokio::test]
async fn test_unknown_interface_fails_open() {
    let err = match Session::open("mb-nonesuch0", addr("fd00::1"), addr("fd00::2"), 64).await {
        Ok(_) => panic!("open should fail for an unknown interface"),
        Err(e) => e,
    };
    assert!(err.is_not_found(), "got: {}", err);
}

#[tokio::test]
async fn test_add_then_delete_range_on_loopback() -> Result<()> {
    require_root!();

    let start = addr("fd00:6d62:1::1");
    let end = addr("fd00:6d62:1::4");

    let mut session = Session::open("lo", start, end, 128).await?;
    let mut added = 0;
    while let Some(a) = session.next_sequential() {
        session.add(a).await?;
        added += 1;
    }
    assert_eq!(added, 4);
    assert_eq!(session.remaining(), 0);
    session.close();

    // A fresh session gets a fresh cursor for the delete sweep.
    let mut session = Session::open("lo", start, end, 128).await?;
    while let Some(a) = session.next_sequential() {
        session.delete(a).await?;
    }
    session.close();
    Ok(())
}

#[tokio::test]
async fn test_unprivileged_add_is_rejected() -> Result<()> {
    if is_root() {
        eprintln!("skipping: covers the unprivileged path only");
        return Ok(());
    }

    let session = Session::open("lo", addr("fd00:6d62:2::1"), addr("fd00:6d62:2::1"), 128).await?;
    let err = session.add(addr("fd00:6d62:2::1")).await.unwrap_err();
    assert!(err.is_permission_denied(), "got: {}", err);
    Ok(())
}

#[tokio::test]
async fn test_failed_delete_keeps_session_usable() -> Result<()> {
    require_root!();

    let a = addr("fd00:6d62:3::1");
    let b = addr("fd00:6d62:3::2");
    let mut session = Session::open("lo", a, b, 128).await?;

    // Deleting an address that was never added is rejected by the kernel...
    let first = session.next_sequential().unwrap();
    let err = session.delete(first).await.unwrap_err();
    assert!(err.errno().is_some(), "got: {}", err);

    // ...and the session keeps going: the next address can still be added.
    let second = session.next_sequential().unwrap();
    session.add(second).await?;
    session.delete(second).await?;
    Ok(())
}

#[tokio::test]
async fn test_random_draws_stay_in_range() -> Result<()> {
    let start = addr("fd00:6d62:4::10");
    let end = addr("fd00:6d62:4::1f");
    let mut session = Session::open("lo", start, end, 128).await?;

    for _ in 0..256 {
        let a = session.next_random()?;
        let low = massbind::range::low64(a);
        assert!((0x10..=0x1f).contains(&low), "escaped: {}", a);
        assert_eq!(a.octets()[..8], start.octets()[..8]);
    }
    // random mode never advances the sequential cursor
    assert_eq!(session.remaining(), 16);
    Ok(())
}
