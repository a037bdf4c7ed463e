//! Per-event receive buffers.
//!
//! A [`PacketBuffer`] holds the bytes delivered by one socket read; a
//! [`RequestBuffer`] is the exactly-sized, NUL-terminated copy the handler
//! works on. Both report allocation and release to a shared
//! [`BufferAccounting`] ledger. Release happens on drop, so every code path
//! frees each buffer exactly once.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;

#[derive(Debug, Default)]
struct Counter {
    allocated: AtomicUsize,
    released: AtomicUsize,
}

impl Counter {
    fn allocate(&self) {
        self.allocated.fetch_add(1, Ordering::Relaxed);
    }

    fn release(&self) {
        self.released.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> (usize, usize) {
        (
            self.allocated.load(Ordering::Relaxed),
            self.released.load(Ordering::Relaxed),
        )
    }
}

/// Ledger of buffer allocations and releases shared by all connections.
#[derive(Debug, Default)]
pub struct BufferAccounting {
    packets: Counter,
    requests: Counter,
}

/// Point-in-time copy of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferStats {
    pub packets_allocated: usize,
    pub packets_released: usize,
    pub requests_allocated: usize,
    pub requests_released: usize,
}

impl BufferStats {
    pub fn live_packets(&self) -> usize {
        self.packets_allocated - self.packets_released
    }

    pub fn live_requests(&self) -> usize {
        self.requests_allocated - self.requests_released
    }
}

impl BufferAccounting {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn snapshot(&self) -> BufferStats {
        let (packets_allocated, packets_released) = self.packets.snapshot();
        let (requests_allocated, requests_released) = self.requests.snapshot();
        BufferStats {
            packets_allocated,
            packets_released,
            requests_allocated,
            requests_released,
        }
    }
}

/// Why a request buffer could not be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// Payload is larger than the configured request limit.
    TooLarge { len: usize, limit: usize },
    /// The allocator refused the reservation.
    AllocationFailed { len: usize },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::TooLarge { len, limit } => {
                write!(f, "request of {} bytes exceeds limit of {} bytes", len, limit)
            }
            BufferError::AllocationFailed { len } => {
                write!(f, "could not allocate {} bytes for request", len)
            }
        }
    }
}

impl std::error::Error for BufferError {}

/// Bytes delivered by a single receive event.
pub struct PacketBuffer {
    payload: Bytes,
    ledger: Arc<BufferAccounting>,
}

impl PacketBuffer {
    pub fn new(payload: Bytes, ledger: &Arc<BufferAccounting>) -> Self {
        ledger.packets.allocate();
        Self {
            payload,
            ledger: Arc::clone(ledger),
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Hands the packet back to the ledger.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for PacketBuffer {
    fn drop(&mut self) {
        self.ledger.packets.release();
    }
}

impl fmt::Debug for PacketBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketBuffer")
            .field("len", &self.payload.len())
            .finish()
    }
}

/// Owned copy of the request text with a trailing NUL terminator.
pub struct RequestBuffer {
    bytes: Vec<u8>,
    ledger: Arc<BufferAccounting>,
}

impl RequestBuffer {
    /// Copies the packet payload into a buffer of exactly `len + 1` bytes.
    pub fn copy_from(packet: &PacketBuffer, limit: usize) -> Result<Self, BufferError> {
        let payload = packet.payload();
        let len = payload.len();

        if len > limit {
            return Err(BufferError::TooLarge { len, limit });
        }

        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(len + 1)
            .map_err(|_| BufferError::AllocationFailed { len })?;
        bytes.extend_from_slice(payload);
        bytes.push(0);

        packet.ledger.requests.allocate();
        Ok(Self {
            bytes,
            ledger: Arc::clone(&packet.ledger),
        })
    }

    /// Payload bytes without the terminator.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 1]
    }

    /// Payload plus terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes
    }

    /// Request text up to the first NUL, as a C string reader would see it.
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn as_text(&self) -> Cow<'_, str> {
        let end = self
            .bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.bytes.len());
        String::from_utf8_lossy(&self.bytes[..end])
    }

    pub fn release(self) {
        drop(self);
    }
}

impl Drop for RequestBuffer {
    fn drop(&mut self) {
        self.ledger.requests.release();
    }
}

impl fmt::Debug for RequestBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuffer")
            .field("len", &self.payload().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_copy_is_exactly_sized_and_terminated() {
        let ledger = BufferAccounting::new();
        let packet = PacketBuffer::new(Bytes::from_static(b"GET / HTTP/1.1\r\n\r\n"), &ledger);

        let request = RequestBuffer::copy_from(&packet, 1024).unwrap();

        assert_eq!(request.as_bytes_with_nul().len(), packet.len() + 1);
        assert_eq!(request.as_bytes_with_nul().last(), Some(&0));
        assert_eq!(request.payload(), packet.payload());
    }

    #[test]
    fn text_ends_at_first_nul() {
        let ledger = BufferAccounting::new();
        let packet = PacketBuffer::new(Bytes::from_static(b"GET /\0GET /ligar_luzes"), &ledger);

        let request = RequestBuffer::copy_from(&packet, 1024).unwrap();

        assert_eq!(request.as_text(), "GET /");
        assert_eq!(request.payload().len(), packet.len());
    }

    #[test]
    fn oversized_payload_allocates_nothing() {
        let ledger = BufferAccounting::new();
        let packet = PacketBuffer::new(Bytes::from(vec![b'a'; 64]), &ledger);

        let err = RequestBuffer::copy_from(&packet, 16).unwrap_err();
        packet.release();

        assert_eq!(err, BufferError::TooLarge { len: 64, limit: 16 });
        let stats = ledger.snapshot();
        assert_eq!(stats.requests_allocated, 0);
        assert_eq!(stats.packets_released, 1);
    }
}
