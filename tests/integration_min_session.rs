// Drives the compiled binary through a PTY so the real event loop, terminal
// setup and crossterm input handling run end to end.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Unix-only and ignored by default.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

fn command(args: &str) -> Result<String, Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("phrasedash");
    // keep scores and logs out of the real home directory
    let home = tempfile::tempdir()?.into_path();
    Ok(format!("env HOME={} {} {args}", home.display(), bin.display()))
}

#[test]
#[ignore]
fn starts_and_quits_on_escape() -> Result<(), Box<dyn std::error::Error>> {
    let mut p = spawn(command("--no-keyboard")?)?;
    std::thread::sleep(Duration::from_millis(300));

    p.send("\x1b")?;
    p.expect(Eof)?;
    Ok(())
}

#[test]
#[ignore]
fn short_challenge_ends_then_quits() -> Result<(), Box<dyn std::error::Error>> {
    let mut p = spawn(command("--challenge --challenge-secs 1")?)?;
    std::thread::sleep(Duration::from_millis(1_500));

    // first escape closes the "time's up" box, the second quits
    p.send("\x1b")?;
    std::thread::sleep(Duration::from_millis(200));
    p.send("\x1b")?;
    p.expect(Eof)?;
    Ok(())
}
