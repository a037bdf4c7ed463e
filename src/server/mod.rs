//! Startup networking: link bring-up and the TCP accept loop.

pub mod listener;
pub mod network;
