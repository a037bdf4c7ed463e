#![allow(dead_code)]

use homecontrol::context::ServiceContext;
use homecontrol::control::Dispatcher;
use homecontrol::sensor::TemperatureSensor;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};

pub struct FixedSensor(pub f32);

impl TemperatureSensor for FixedSensor {
    fn read_celsius(&self) -> f32 {
        self.0
    }
}

pub fn context(dispatcher: Dispatcher) -> ServiceContext {
    ServiceContext::new(dispatcher, Arc::new(FixedSensor(23.456)))
}

pub fn get(path: &str) -> String {
    format!("GET {} HTTP/1.1\r\nHost: x\r\n\r\n", path)
}

/// Reads one response framed by Content-Length. `None` if the server closed
/// before sending anything.
pub async fn read_response<R: AsyncRead + Unpin>(reader: &mut R) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = std::str::from_utf8(&buf[..end]).unwrap();
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("Content-Length: "))
                .map(|v| v.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            if buf.len() >= end + 4 + len {
                return Some(String::from_utf8(buf).unwrap());
            }
        }

        let n = reader.read(&mut chunk).await.unwrap();
        if n == 0 {
            return if buf.is_empty() {
                None
            } else {
                Some(String::from_utf8(buf).unwrap())
            };
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}
