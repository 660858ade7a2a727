//! In-process SMTP relay for tests

use std::{io, net::SocketAddr, time::Duration};

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
    sync::mpsc,
    time::timeout,
};

use crate::domain::communication::email_addresses::{EmailAddress, EmailAddressError};

use super::smtp::{SmtpConfig, TlsMode};

/// How the stub relay answers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behaviour {
    /// Accepts every login and every message
    AcceptAll,

    /// Rejects every login with `535`
    RejectCredentials,

    /// Answers `AUTH` with `454`, a temporary authentication failure
    AuthUnavailable,

    /// Answers `AUTH` with `504`, an unsupported mechanism
    AuthUnsupported,

    /// Reads the message data, then closes the socket without replying
    DropAfterData,

    /// Greets with `421` and closes
    ServiceUnavailable,

    /// Rejects every recipient with `550`
    RejectRecipient,
}

/// A plaintext SMTP relay listening on a random local port
#[derive(Debug)]
pub struct StubRelay {
    address: SocketAddr,
    received: mpsc::UnboundedReceiver<String>,
}

impl StubRelay {
    /// Starts the relay on `127.0.0.1` with a random port
    pub async fn start(behaviour: Behaviour) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;
        let (sender, received) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let sender = sender.clone();

                tokio::spawn(async move {
                    let _ = session(stream, behaviour, sender).await;
                });
            }
        });

        Ok(Self { address, received })
    }

    /// A configuration pointing an [`SmtpMailer`](super::smtp::SmtpMailer) at this relay
    pub fn config(&self) -> Result<SmtpConfig, EmailAddressError> {
        config(self.address.port())
    }

    /// The next accepted message, as raw DATA, or `None` after a short wait
    pub async fn received(&mut self) -> Option<String> {
        timeout(Duration::from_millis(500), self.received.recv())
            .await
            .ok()
            .flatten()
    }
}

/// A plaintext configuration for a relay on `127.0.0.1:port`
pub fn config(port: u16) -> Result<SmtpConfig, EmailAddressError> {
    Ok(SmtpConfig {
        host: "127.0.0.1".to_string(),
        port,
        sender: EmailAddress::new("sender@example.com")?,
        password: "app-password".to_string(),
        tls: TlsMode::None,
    })
}

/// A local port nothing is listening on
pub async fn unused_port() -> io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;

    Ok(listener.local_addr()?.port())
}

async fn session(
    stream: TcpStream,
    behaviour: Behaviour,
    received: mpsc::UnboundedSender<String>,
) -> io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    if behaviour == Behaviour::ServiceUnavailable {
        writer
            .write_all(b"421 4.3.2 Service not available, closing transmission channel\r\n")
            .await?;
        return Ok(());
    }

    writer.write_all(b"220 stub.relay ESMTP\r\n").await?;

    while let Some(line) = lines.next_line().await? {
        let command = line.to_ascii_uppercase();

        let reply: &[u8] = if command.starts_with("EHLO") {
            b"250-stub.relay\r\n250-AUTH PLAIN LOGIN\r\n250 8BITMIME\r\n".as_slice()
        } else if command.starts_with("HELO") {
            b"250 stub.relay\r\n".as_slice()
        } else if command.starts_with("AUTH") {
            match behaviour {
                Behaviour::RejectCredentials => {
                    b"535 5.7.8 Authentication credentials invalid\r\n".as_slice()
                }
                Behaviour::AuthUnavailable => {
                    b"454 4.7.0 Temporary authentication failure\r\n".as_slice()
                }
                Behaviour::AuthUnsupported => {
                    b"504 5.5.4 Unrecognized authentication type\r\n".as_slice()
                }
                _ => b"235 2.7.0 Authentication successful\r\n".as_slice(),
            }
        } else if command.starts_with("MAIL FROM") {
            b"250 2.1.0 Ok\r\n".as_slice()
        } else if command.starts_with("RCPT TO") {
            match behaviour {
                Behaviour::RejectRecipient => b"550 5.1.1 Mailbox unavailable\r\n".as_slice(),
                _ => b"250 2.1.5 Ok\r\n".as_slice(),
            }
        } else if command == "DATA" {
            writer
                .write_all(b"354 End data with <CR><LF>.<CR><LF>\r\n")
                .await?;

            let mut data = String::new();

            while let Some(line) = lines.next_line().await? {
                if line == "." {
                    break;
                }
                data.push_str(&line);
                data.push('\n');
            }

            if behaviour == Behaviour::DropAfterData {
                return Ok(());
            }

            let _ = received.send(data);

            b"250 2.0.0 Ok: queued\r\n".as_slice()
        } else if command == "QUIT" {
            writer.write_all(b"221 2.0.0 Bye\r\n").await?;
            return Ok(());
        } else if command == "RSET" || command == "NOOP" {
            b"250 2.0.0 Ok\r\n".as_slice()
        } else {
            b"502 5.5.2 Command not recognized\r\n".as_slice()
        };

        writer.write_all(reply).await?;
    }

    Ok(())
}
