//! Metronome - Step-Driven HTTP Server
//!
//! A non-blocking HTTP/1.1 engine driven one bounded step at a time by the
//! caller, so unrelated time-critical work can run between ticks.

pub mod config;
pub mod http;
pub mod server;
