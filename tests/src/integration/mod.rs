//! Cross-subsystem scenarios.

#[cfg(test)]
mod fixtures;

mod delegation;
mod idempotency;
mod request_flow;
mod responses;
