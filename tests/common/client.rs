//! Test IRC client.
//!
//! Provides an IRC client for integration testing that can send commands
//! and assert on received responses.

use relay_proto::{Message, Response};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test IRC client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    nick: String,
}

#[allow(dead_code)]
impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str, nick: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;

        // Split stream for reading and writing
        let (read_half, write_half) = stream.into_split();
        let reader = BufReader::new(read_half);
        let writer = BufWriter::new(write_half);

        Ok(Self {
            reader,
            writer,
            nick: nick.to_string(),
        })
    }

    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// Send a raw IRC line; CRLF is appended when missing.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with('\n') {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive a single message from the server.
    pub async fn recv(&mut self) -> anyhow::Result<Message> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a message with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Message> {
        let mut line = String::new();
        let read = timeout(dur, self.reader.read_line(&mut line)).await??;
        if read == 0 {
            anyhow::bail!("connection closed by server");
        }

        Message::parse(line.trim_end()).map_err(|e| anyhow::anyhow!("Parse error: {}", e))
    }

    /// Receive multiple messages until the given predicate returns true.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Message>>
    where
        F: FnMut(&Message) -> bool,
    {
        let mut messages = Vec::new();
        loop {
            let msg = self.recv().await?;
            let done = predicate(&msg);
            messages.push(msg);
            if done {
                break;
            }
        }
        Ok(messages)
    }

    /// Receive until a numeric reply with the given code arrives.
    pub async fn recv_numeric(&mut self, response: Response) -> anyhow::Result<Message> {
        let mut messages = self
            .recv_until(|msg| msg.response() == Some(response))
            .await?;
        messages
            .pop()
            .ok_or_else(|| anyhow::anyhow!("no {} received", response))
    }

    /// Receive until a message with the given command arrives.
    pub async fn recv_command(&mut self, command: &str) -> anyhow::Result<Message> {
        let mut messages = self
            .recv_until(|msg| msg.command.eq_ignore_ascii_case(command))
            .await?;
        messages
            .pop()
            .ok_or_else(|| anyhow::anyhow!("no {} received", command))
    }

    /// Discard whatever arrives within a short quiet period.
    pub async fn drain(&mut self) {
        while self.recv_timeout(Duration::from_millis(50)).await.is_ok() {}
    }

    /// Assert nothing arrives within `dur`.
    pub async fn expect_silence(&mut self, dur: Duration) -> anyhow::Result<()> {
        match self.recv_timeout(dur).await {
            Ok(msg) => anyhow::bail!("unexpected message: {}", msg.to_string().trim_end()),
            Err(_) => Ok(()),
        }
    }

    /// Read until the server closes the socket, returning what arrived.
    pub async fn recv_until_closed(&mut self) -> anyhow::Result<Vec<Message>> {
        let mut messages = Vec::new();
        loop {
            let mut line = String::new();
            let read = timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await?;
            match read {
                Ok(0) | Err(_) => return Ok(messages),
                Ok(_) => messages.push(
                    Message::parse(line.trim_end())
                        .map_err(|e| anyhow::anyhow!("Parse error: {}", e))?,
                ),
            }
        }
    }

    /// Register with the server (NICK + USER).
    pub async fn register(&mut self) -> anyhow::Result<()> {
        let nick = self.nick.clone();
        self.send_raw(&format!("NICK {}", nick)).await?;
        self.send_raw(&format!("USER {} 0 * :Test User {}", nick.to_lowercase(), nick))
            .await?;

        // Wait for RPL_WELCOME (001)
        let welcome = self.recv_numeric(Response::RPL_WELCOME).await?;
        if welcome.arg(0) == Some(nick.as_str()) {
            Ok(())
        } else {
            anyhow::bail!("Registration failed: unexpected welcome {}", welcome)
        }
    }

    /// Join a channel and wait for the end of its name list.
    pub async fn join(&mut self, channel: &str) -> anyhow::Result<Vec<Message>> {
        self.send_raw(&format!("JOIN {}", channel)).await?;
        self.recv_until(|msg| msg.response() == Some(Response::RPL_ENDOFNAMES))
            .await
    }

    /// Send a PRIVMSG.
    pub async fn privmsg(&mut self, target: &str, text: &str) -> anyhow::Result<()> {
        self.send_raw(&format!("PRIVMSG {} :{}", target, text)).await
    }

    /// Send QUIT.
    pub async fn quit(&mut self, reason: Option<&str>) -> anyhow::Result<()> {
        match reason {
            Some(reason) => self.send_raw(&format!("QUIT :{}", reason)).await,
            None => self.send_raw("QUIT").await,
        }
    }
}
