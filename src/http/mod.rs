//! HTTP/1.1 protocol implementation.
//!
//! One request per accepted connection, no keep-alive, no chunked encoding.
//! Everything here is non-blocking and advances in bounded steps.
//!
//! # Modules
//!
//! - **`channel`**: buffered non-blocking reads and writes over one stream
//! - **`parser`**: incremental request parsing under strict size limits
//! - **`request`**: parsed request representation
//! - **`response`**: response representation and serialization
//! - **`connection`**: the per-connection state machine
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Parsing   │ ← fill() once, feed the parser
//!        └──────┬──────┘
//!               │ request complete          │ parse failure
//!               ▼                           ▼ (synthesized 4xx)
//!        ┌──────────────┐            ┌──────────────┐
//!        │   Dispatch   │──────────► │   Writing    │ ← drain() once
//!        └──────────────┘            └──────┬───────┘
//!                                           │ fully drained
//!                                           ▼
//!                                    ┌──────────────┐
//!                                    │    Closed    │
//!                                    └──────────────┘
//! ```
//!
//! A deadline check sits at the top of every step; exceeding it closes the
//! connection from any state with no response bytes attempted.

pub mod channel;
pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
