//! HTTP protocol handling for the dashboard.
//!
//! - **`connection`**: per-client state machine
//! - **`buffer`**: packet and request buffers with release accounting
//! - **`parser`**: request line and header parsing
//! - **`request`**: parsed request representation
//! - **`response`**: response representation with builder
//! - **`writer`**: serializes and writes responses
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │ AwaitingRequest  │ ← wait for a receive event
//!        └──────┬───────────┘
//!               │ payload            (no payload / error / idle → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← dispatch, sample temperature, render
//!        └──────┬───────────┘
//!               │ response ready, request buffer released
//!               ▼
//!        ┌──────────────────┐
//!        │   Responding     │ ← write + flush
//!        └──────┬───────────┘
//!               └─ back to AwaitingRequest (connection stays open)
//! ```

pub mod buffer;
pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
