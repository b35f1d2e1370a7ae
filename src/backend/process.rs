use anyhow::{Context, Result};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::protocol::channel::{Transport, TransportPeer};

/// Spawns the backend process and bridges its stdio to a message
/// transport: one command per line out, one JSON reply/push per line in.
pub fn spawn(command_line: &str) -> Result<Transport> {
    let mut parts = command_line.split_whitespace();
    let program = parts.next().context("backend command is empty")?;

    let mut child = tokio::process::Command::new(program)
        .args(parts)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        // The child must not outlive the UI; dropping the handle on exit
        // takes the backend down with it.
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("Failed to spawn backend: {}", command_line))?;

    let mut stdin = child.stdin.take().context("backend stdin unavailable")?;
    let stdout = child.stdout.take().context("backend stdout unavailable")?;

    let (transport, peer) = Transport::pair();
    let TransportPeer { mut from_ui, to_ui } = peer;

    tokio::spawn(async move {
        while let Some(line) = from_ui.recv().await {
            if stdin.write_all(line.as_bytes()).await.is_err()
                || stdin.write_all(b"\n").await.is_err()
                || stdin.flush().await.is_err()
            {
                tracing::warn!("backend stdin closed");
                break;
            }
        }
    });

    tokio::spawn(async move {
        let mut lines = BufReader::new(stdout).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if to_ui.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!(%err, "error reading from backend");
                    break;
                }
            }
        }
        tracing::warn!("backend stdout closed");
    });

    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => tracing::warn!(%status, "backend process exited"),
            Err(err) => tracing::warn!(%err, "failed to wait on backend process"),
        }
    });

    Ok(transport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_command_line_is_rejected() {
        assert!(spawn("").is_err());
        assert!(spawn("   ").is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stdio_lines_round_trip_through_the_transport() {
        // `cat` echoes stdin back line by line.
        let mut transport = spawn("cat").unwrap();
        transport.outbound.send("refresh".to_string()).unwrap();
        assert_eq!(transport.inbound.recv().await.unwrap(), "refresh");
    }
}
