//! Connection dispatcher — TCP server that runs one session per client.
//!
//! ```text
//! ┌───────────────────────────────┐
//! │  accept loop                  │
//! │   └─ spawn task per client ───┼──► Session ──► WordStore (shared)
//! └───────────────────────────────┘        │
//!                                          └──► AnagramMatcher
//! ```
//!
//! Each task owns its session outright. A client that disconnects, resets
//! or errors only ends its own task.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::dictionary::WordStore;
use crate::error::{AnagramError, Result};
use crate::matcher::AnagramMatcher;
use crate::protocol::{ResponseBlock, Session};

/// Accepts connections and hands each one a fresh [`Session`].
pub struct ConnectionDispatcher {
    listener: TcpListener,
    matcher: AnagramMatcher,
}

impl ConnectionDispatcher {
    /// Bind the listening socket. Failure here is fatal for the server.
    pub async fn bind(addr: &str, matcher: AnagramMatcher) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| AnagramError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        info!(addr = %listener.local_addr()?, "server listening");
        Ok(Self { listener, matcher })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept clients until the process is stopped.
    pub async fn run(self) -> Result<()> {
        loop {
            debug!("waiting for a client");
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    info!(peer = %peer, "client connected");
                    let session = Session::new(peer.to_string(), self.matcher.clone());

                    tokio::spawn(async move {
                        if let Err(e) = serve_connection(stream, session).await {
                            warn!(peer = %peer, error = %e, "connection with client failed");
                        }
                        info!(peer = %peer, "client disconnected");
                    });
                }
                Err(e) => {
                    error!(error = %e, "accept error");
                }
            }
        }
    }
}

/// Drive one session over `stream` until the peer closes it.
///
/// Sends the menu first, then exactly one response block per input line.
/// Lines that are not valid UTF-8 are decoded lossily rather than dropped.
/// Store and matcher work runs on the blocking pool so a large anagram
/// search does not stall other connections sharing the worker thread.
pub async fn serve_connection<S>(stream: S, mut session: Session) -> Result<()>
where
    S: AsyncRead + AsyncWrite,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    send_block(&mut writer, &session.greeting()).await?;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let line = decode_line(&buf);
        debug!(client = %session.client_id(), input = %line, "client says");

        let (returned, block) = tokio::task::spawn_blocking(move || {
            let block = session.handle_line(&line);
            (session, block)
        })
        .await?;
        session = returned;

        send_block(&mut writer, &block).await?;
    }

    Ok(())
}

/// Strip the line terminator (`\n` or `\r\n`) and decode, replacing invalid UTF-8.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

async fn send_block<W>(writer: &mut W, block: &ResponseBlock) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(block.render().as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Load the dictionary, bind the listener and serve forever.
pub async fn start_server(settings: &Settings) -> anyhow::Result<()> {
    let (store, _stats) = WordStore::from_path(settings.dictionary.as_deref(), settings.fold_rule())
        .context("failed to load dictionary")?;
    let matcher = AnagramMatcher::new(Arc::new(store));

    let dispatcher = ConnectionDispatcher::bind(&settings.listen_addr(), matcher).await?;
    dispatcher.run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::FoldRule;
    use crate::protocol::read_block;

    fn matcher(words: &[&str]) -> AnagramMatcher {
        AnagramMatcher::new(Arc::new(WordStore::with_words(
            words.iter().copied(),
            FoldRule::Insensitive,
        )))
    }

    #[tokio::test]
    async fn test_serve_connection_over_duplex() {
        let (client, server) = tokio::io::duplex(4096);
        let session = Session::new("duplex", matcher(&["bat", "tab"]));
        let handle = tokio::spawn(serve_connection(server, session));

        let (reader, mut writer) = tokio::io::split(client);
        let mut reader = BufReader::new(reader);

        let menu = read_block(&mut reader).await.unwrap();
        assert_eq!(menu, ResponseBlock::menu().lines());

        writer.write_all(b"p\nbat\n").await.unwrap();
        let prompt = read_block(&mut reader).await.unwrap();
        assert_eq!(prompt, ResponseBlock::find_prompt().lines());
        let found = read_block(&mut reader).await.unwrap();
        assert_eq!(found[1], "tab");

        drop(writer);
        drop(reader);
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_crlf_input_is_accepted() {
        let (client, server) = tokio::io::duplex(4096);
        let session = Session::new("crlf", matcher(&[]));
        let handle = tokio::spawn(serve_connection(server, session));

        let (reader, mut writer) = tokio::io::split(client);
        let mut reader = BufReader::new(reader);
        read_block(&mut reader).await.unwrap();

        writer.write_all(b"A\r\nzebra\r\n").await.unwrap();
        read_block(&mut reader).await.unwrap();
        let added = read_block(&mut reader).await.unwrap();
        assert_eq!(added[0], "Word [zebra] was added.");

        drop(writer);
        drop(reader);
        handle.await.unwrap().unwrap();
    }

    #[test]
    fn test_decode_line() {
        assert_eq!(decode_line(b"word\n"), "word");
        assert_eq!(decode_line(b"word\r\n"), "word");
        assert_eq!(decode_line(b"last"), "last");
        assert_eq!(decode_line(b"caf\xe9\n"), "caf\u{FFFD}");
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_still_gets_a_reply() {
        let (client, server) = tokio::io::duplex(4096);
        let session = Session::new("latin1", matcher(&["tab"]));
        let handle = tokio::spawn(serve_connection(server, session));

        let (reader, mut writer) = tokio::io::split(client);
        let mut reader = BufReader::new(reader);
        read_block(&mut reader).await.unwrap();

        writer.write_all(b"a\n").await.unwrap();
        read_block(&mut reader).await.unwrap();

        writer.write_all(b"caf\xe9\n").await.unwrap();
        let added = read_block(&mut reader).await.unwrap();
        assert_eq!(added[0], "Word [caf\u{FFFD}] was added.");

        // Session is still alive and in the same state machine.
        writer.write_all(b"<<\np\nbat\n").await.unwrap();
        assert_eq!(read_block(&mut reader).await.unwrap(), ResponseBlock::menu().lines());
        read_block(&mut reader).await.unwrap();
        let found = read_block(&mut reader).await.unwrap();
        assert_eq!(found[1], "tab");

        drop(writer);
        drop(reader);
        handle.await.unwrap().unwrap();
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_sessions_interleave_on_single_thread_runtime() {
        let words: Vec<String> = (0..2000).map(|i| format!("w{:05}", i)).collect();
        let shared = AnagramMatcher::new(Arc::new(WordStore::with_words(
            words.iter(),
            FoldRule::Insensitive,
        )));

        let mut clients = Vec::new();
        for id in ["first", "second"] {
            let (client, server) = tokio::io::duplex(64 * 1024);
            tokio::spawn(serve_connection(server, Session::new(id, shared.clone())));
            clients.push(client);
        }

        let mut readers = Vec::new();
        for client in clients {
            let (reader, mut writer) = tokio::io::split(client);
            let mut reader = BufReader::new(reader);
            read_block(&mut reader).await.unwrap();
            writer.write_all(b"p\n00001w\n").await.unwrap();
            readers.push((reader, writer));
        }

        for (reader, _writer) in &mut readers {
            read_block(reader).await.unwrap();
            let found = read_block(reader).await.unwrap();
            assert_eq!(found[0], "Found 4 anagrams for word 00001w");
        }
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let first = ConnectionDispatcher::bind("127.0.0.1:0", matcher(&[])).await.unwrap();
        let taken = first.local_addr().unwrap().to_string();

        let second = ConnectionDispatcher::bind(&taken, matcher(&[])).await;
        assert!(matches!(second, Err(AnagramError::Bind { .. })));
    }
}
