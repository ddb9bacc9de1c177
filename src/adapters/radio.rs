//! Mesh radio adapter over a text serial link.
//!
//! The radio runs its serial module in TEXTMSG mode: every received text
//! message arrives as one line `<sender>: <text>`, and every line written
//! to it is broadcast as a text message on the primary channel.
//!
//! ```text
//!   UART RX ──▶ LineAssembler ──▶ parse_line ──▶ EventQueue
//!   RadioPort::send_text ──▶ "<text>\n" ──▶ UART TX
//! ```

use std::io::{self, Read, Write};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::app::ports::RadioPort;
use crate::drivers::hw_init;
use crate::drivers::task_pin::RADIO_READER;
use crate::drivers::worker::Worker;
use crate::error::RadioError;
use crate::events::{EventQueue, InboundPacket, MAX_SENDER_LEN, MAX_TEXT_LEN, NodeEvent};

/// Sender label for lines without a `<sender>: ` prefix.
pub const UNKNOWN_SENDER: &str = "unknown";

const SENDER_SEPARATOR: &str = ": ";

/// Longest raw line kept before the rest is discarded.
const MAX_LINE_LEN: usize = MAX_TEXT_LEN + 64;

// ── Line framing ──────────────────────────────────────────────

/// Splits a byte stream into `\n`-terminated lines.
///
/// `\r` is dropped.  Bytes past [`MAX_LINE_LEN`] are discarded up to the
/// next newline.  Invalid UTF-8 is replaced.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buf: Vec<u8>,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, bytes: &[u8], mut on_line: impl FnMut(&str)) {
        for &b in bytes {
            match b {
                b'\n' => {
                    let line = String::from_utf8_lossy(&self.buf);
                    on_line(&line);
                    self.buf.clear();
                }
                b'\r' => {}
                _ if self.buf.len() < MAX_LINE_LEN => self.buf.push(b),
                _ => {}
            }
        }
    }
}

/// Parse one received line.  Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<InboundPacket> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let packet = match line.split_once(SENDER_SEPARATOR) {
        Some((from, text)) if is_node_label(from) && !text.trim().is_empty() => {
            InboundPacket::text(from, text.trim())
        }
        _ => InboundPacket::text(UNKNOWN_SENDER, line),
    };
    Some(packet)
}

/// Short name or `!nodeid`: one token, fits [`SenderId`](crate::events::SenderId).
fn is_node_label(s: &str) -> bool {
    !s.is_empty() && s.len() <= MAX_SENDER_LEN && !s.contains(|c: char| c.is_whitespace() || c == ':')
}

// ── Outbound ──────────────────────────────────────────────────

/// [`RadioPort`] writing one line per message.
pub struct SerialTextRadio<W> {
    link: W,
}

impl<W: Write> SerialTextRadio<W> {
    pub fn new(link: W) -> Self {
        Self { link }
    }

    pub fn into_inner(self) -> W {
        self.link
    }
}

impl<W: Write> RadioPort for SerialTextRadio<W> {
    fn send_text(&mut self, text: &str, channel_index: u8) -> Result<(), RadioError> {
        if text.contains(['\n', '\r']) {
            return Err(RadioError::InvalidText);
        }
        if text.len() > MAX_TEXT_LEN {
            return Err(RadioError::MessageTooLong);
        }
        if channel_index != 0 {
            // TEXTMSG mode always transmits on the primary channel.
            debug!("Radio: channel {} requested, serial module sends on primary", channel_index);
        }
        self.link
            .write_all(text.as_bytes())
            .and_then(|()| self.link.write_all(b"\n"))
            .and_then(|()| self.link.flush())
            .map_err(|e| {
                warn!("Radio: serial write failed: {}", e);
                RadioError::WriteFailed
            })
    }
}

// ── Inbound ───────────────────────────────────────────────────

/// Start the reader thread.  It pushes every parsed packet to `queue`
/// until cancelled or the link fails (then it pushes
/// [`NodeEvent::RadioDown`] and exits).
pub fn spawn_reader<R>(mut link: R, queue: Arc<EventQueue>) -> io::Result<Worker>
where
    R: Read + Send + 'static,
{
    Worker::spawn(RADIO_READER, move |token| {
        let mut lines = LineAssembler::new();
        let mut buf = [0u8; 128];
        info!("Radio: reader started");
        while !token.is_cancelled() {
            let n = match link.read(&mut buf) {
                Ok(n) => n,
                Err(e) if is_transient(&e) => continue,
                Err(e) => {
                    warn!("Radio: read failed, reader stopping: {}", e);
                    queue.push(NodeEvent::RadioDown);
                    return;
                }
            };
            lines.feed(&buf[..n], |line| {
                if let Some(packet) = parse_line(line) {
                    if !queue.push(NodeEvent::Packet(packet)) {
                        warn!("Radio: event queue full, packet dropped");
                    }
                }
            });
        }
    })
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}

/// The board's radio UART as a byte stream.
///
/// Reads return `Ok(0)` when the line stays idle for [`Uart::READ_TIMEOUT_MS`],
/// so a reader loop gets to check its cancellation flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uart;

impl Uart {
    pub const READ_TIMEOUT_MS: u32 = 100;
}

impl Read for Uart {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        hw_init::uart_read(buf, Self::READ_TIMEOUT_MS)
            .map_err(|rc| io::Error::other(format!("uart_read_bytes rc={rc}")))
    }
}

impl Write for Uart {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        hw_init::uart_write(buf).map_err(|rc| io::Error::other(format!("uart_write_bytes rc={rc}")))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
