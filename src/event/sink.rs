use std::io::Write;
use std::net::{SocketAddr, UdpSocket};

use tracing::debug;

use super::Event;

/// Local client socket that receives check events
pub const DEFAULT_INTAKE_ADDR: &str = "127.0.0.1:3030";

/// Destination for check events
///
/// Delivery is fire-and-forget: sinks never report failure to the caller.
pub trait EventSink {
    fn send(&mut self, event: &Event);
}

/// Sends each event as one newline-terminated UDP datagram
#[derive(Debug, Clone)]
pub struct UdpSink {
    addr: String,
}

impl UdpSink {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    fn try_send(&self, payload: &[u8]) -> std::io::Result<usize> {
        let target: SocketAddr = self
            .addr
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        let bind_addr = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };

        // One socket per event, closed on drop
        let socket = UdpSocket::bind(bind_addr)?;
        socket.send_to(payload, target)
    }
}

impl Default for UdpSink {
    fn default() -> Self {
        Self::new(DEFAULT_INTAKE_ADDR)
    }
}

impl EventSink for UdpSink {
    fn send(&mut self, event: &Event) {
        let mut payload = event.to_json();
        payload.push('\n');

        match self.try_send(payload.as_bytes()) {
            Ok(bytes) => debug!(name = %event.name, addr = %self.addr, bytes, "Event sent"),
            Err(e) => debug!(
                name = %event.name,
                addr = %self.addr,
                error = %e,
                "Event delivery failed"
            ),
        }
    }
}

/// Writes events to a writer (stdout in dry-run mode) instead of the network
pub struct DryRunSink<W: Write> {
    writer: W,
}

impl<W: Write> DryRunSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for DryRunSink<W> {
    fn send(&mut self, event: &Event) {
        if let Err(e) = writeln!(self.writer, "{}", event.to_json()) {
            debug!(name = %event.name, error = %e, "Failed to print event");
        }
    }
}
