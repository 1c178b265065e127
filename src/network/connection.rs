//! Connection - Handles an individual client connection.
//!
//! Each Connection runs in its own Tokio task, split in two halves:
//!
//! ```text
//!  socket ──▶ FramedRead<LineCodec> ──▶ Registry::dispatch ──▶ Session::send
//!                                                                   │
//!  socket ◀── FramedWrite<LineCodec> ◀── writer task ◀── mpsc queue ◀┘
//! ```
//!
//! Anything (own replies, broadcasts from other tasks) reaches the socket
//! through the session's bounded queue. The writer exits once the session
//! is closed and the queue is drained.

use crate::config::LimitsConfig;
use crate::error::HandlerError;
use crate::handlers::{Context, Registry};
use crate::state::{Matrix, Session, SessionId};
use futures_util::{SinkExt, StreamExt};
use relay_proto::{LineCodec, Message, ProtocolError};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWrite;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, warn};

/// How long teardown waits for queued output to reach the socket.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Why the read loop stopped.
enum Exit {
    /// Peer closed the socket.
    Eof,
    /// Client sent QUIT.
    Quit(String),
    /// Registration failed the password check.
    BadPassword,
    /// Inbound line exceeded the configured limit.
    LineTooLong,
    /// Our own outbound queue failed or some other fatal handler error.
    Fatal(HandlerError),
    /// Socket read failed.
    Io(ProtocolError),
}

impl Exit {
    /// Reason shown to channel peers in the QUIT notice.
    fn reason(&self) -> String {
        match self {
            Self::Eof => "Connection closed".to_string(),
            Self::Quit(reason) => reason.clone(),
            Self::BadPassword => "Bad password".to_string(),
            Self::LineTooLong => "Input line too long".to_string(),
            Self::Fatal(_) => "Send queue exceeded".to_string(),
            Self::Io(e) => format!("Read error: {}", e),
        }
    }

    /// Text for the `ERROR :Closing Link` line, if one is sent.
    fn closing_note(&self) -> Option<String> {
        match self {
            Self::Quit(reason) => Some(format!("Quit: {}", reason)),
            Self::BadPassword => Some("Bad password".to_string()),
            Self::LineTooLong => Some("Input line too long".to_string()),
            Self::Eof | Self::Fatal(_) | Self::Io(_) => None,
        }
    }
}

/// A client connection handler.
pub struct Connection {
    session: Arc<Session>,
    outbound: mpsc::Receiver<Arc<Message>>,
    addr: SocketAddr,
    stream: TcpStream,
    matrix: Arc<Matrix>,
    registry: Arc<Registry>,
    max_line_len: usize,
}

impl Connection {
    /// Create a connection and its session for an accepted socket.
    pub fn new(
        stream: TcpStream,
        addr: SocketAddr,
        matrix: Arc<Matrix>,
        registry: Arc<Registry>,
        limits: &LimitsConfig,
    ) -> Self {
        let (tx, outbound) = mpsc::channel(limits.sendq.max(1));
        let session = Session::new(matrix.next_session_id(), addr.ip().to_string(), tx);
        Self {
            session,
            outbound,
            addr,
            stream,
            matrix,
            registry,
            max_line_len: limits.max_line_len,
        }
    }

    pub fn id(&self) -> SessionId {
        self.session.id()
    }

    /// Run the connection until the client leaves or fails, then tear it down.
    ///
    /// Only a socket read failure is reported as an error.
    pub async fn run(self) -> anyhow::Result<()> {
        let Self {
            session,
            outbound,
            addr,
            stream,
            matrix,
            registry,
            max_line_len,
        } = self;

        if let Err(e) = stream.set_nodelay(true) {
            debug!(error = %e, "Failed to set TCP_NODELAY");
        }

        let (read_half, write_half) = stream.into_split();
        let mut writer = tokio::spawn(write_loop(
            FramedWrite::new(write_half, LineCodec::new()),
            outbound,
        ));
        let mut lines = FramedRead::new(read_half, LineCodec::with_max_len(max_line_len));

        info!(session = session.id(), %addr, "Client connected");

        let exit = loop {
            let line = match lines.next().await {
                Some(Ok(line)) => line,
                Some(Err(ProtocolError::LineTooLong { actual, limit })) => {
                    warn!(actual, limit, "Inbound line too long");
                    break Exit::LineTooLong;
                }
                Some(Err(e)) => break Exit::Io(e),
                None => break Exit::Eof,
            };

            if line.trim().is_empty() {
                continue;
            }

            let msg = match Message::parse(&line) {
                Ok(msg) => msg,
                Err(e) => {
                    debug!(line = %line, error = %e, "Dropping malformed line");
                    continue;
                }
            };

            let mut ctx = Context::new(&session, &matrix);
            match registry.dispatch(&mut ctx, &msg).await {
                Ok(()) => {}
                Err(HandlerError::Quit(reason)) => break Exit::Quit(reason),
                Err(HandlerError::PasswordMismatch) => break Exit::BadPassword,
                Err(e) => break Exit::Fatal(e),
            }
        };

        if let Some(note) = exit.closing_note() {
            send_closing_link(&session, &note);
        }
        matrix.disconnect(&session, &exit.reason());

        match tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut writer).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Writer task failed"),
            Err(_) => {
                warn!("Writer did not drain in time, aborting");
                writer.abort();
            }
        }

        match exit {
            Exit::Io(e) => Err(e.into()),
            Exit::Fatal(e) => {
                debug!(code = e.error_code(), error = %e, "Connection ended by handler error");
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Queue `ERROR :Closing Link: <host> (<note>)` ahead of teardown.
fn send_closing_link(session: &Session, note: &str) {
    let text = format!("Closing Link: {} ({})", session.remote_host(), note);
    if let Err(e) = session.send(Message::new("ERROR", vec![]).with_trailing(text)) {
        debug!(error = %e, "Could not queue closing link");
    }
}

/// Drain the outbound queue into the socket until every sender is gone.
async fn write_loop<W>(mut sink: FramedWrite<W, LineCodec>, mut outbound: mpsc::Receiver<Arc<Message>>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(msg) = outbound.recv().await {
        if let Err(e) = sink.feed(msg.to_string()).await {
            debug!(error = %e, "Write failed, stopping writer");
            return;
        }
        if outbound.is_empty()
            && let Err(e) = sink.flush().await
        {
            debug!(error = %e, "Flush failed, stopping writer");
            return;
        }
    }

    if let Err(e) = sink.close().await {
        debug!(error = %e, "Socket shutdown failed");
    }
}
