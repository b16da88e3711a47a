//! Client mode — bridges the console to a running server.
//!
//! Every console line is sent as-is, then the reply block is printed. Typing
//! the exit phrase (or closing the console) ends the client; the phrase
//! itself never reaches the server.

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::Result;
use crate::protocol::{is_exit_phrase, read_block};

/// Run the console/server dialogue until the exit phrase or end of console input.
pub async fn bridge<C, S, O>(console: C, server: S, out: &mut O) -> Result<()>
where
    C: AsyncBufRead + Unpin,
    S: AsyncRead + AsyncWrite,
    O: AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(server);
    let mut replies = BufReader::new(reader);
    let mut console = console.lines();

    print_block(&mut replies, out).await?;

    while let Some(input) = console.next_line().await? {
        if is_exit_phrase(&input) {
            break;
        }

        writer.write_all(input.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;

        print_block(&mut replies, out).await?;
    }

    info!("ending communication with server");
    Ok(())
}

async fn print_block<R, O>(replies: &mut R, out: &mut O) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let lines = read_block(replies).await?;
    for line in &lines {
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\n").await?;
    }
    out.flush().await?;

    debug!(lines = lines.len(), "received lines from the server");
    Ok(())
}

/// Connect to the configured server and bridge stdin/stdout to it.
pub async fn start_client(settings: &Settings) -> anyhow::Result<()> {
    let addr = settings.server_addr();
    let stream = TcpStream::connect(&addr)
        .await
        .with_context(|| format!("failed to establish connectivity with server {}", addr))?;
    info!(server = %addr, "beginning communication with server");

    let console = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    bridge(console, stream, &mut stdout).await?;
    Ok(())
}
