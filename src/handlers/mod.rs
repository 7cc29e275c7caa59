// handlers/mod.rs - HTTP handlers
//
// Public (no auth) handlers serve token-addressed views; system handlers
// report service identity and backend health.
pub mod public;
pub mod system;
