//! Serving layer: route registration and the step-driven engine.

pub mod engine;
pub mod router;
