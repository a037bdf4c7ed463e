//! HomeControl - home automation dashboard endpoint
//!
//! Serves a single control page over HTTP, maps command paths to actuator
//! actions and reports the on-die temperature sensor.

pub mod config;
pub mod context;
pub mod control;
pub mod dashboard;
pub mod http;
pub mod sensor;
pub mod server;
pub mod tasks;
