// src/lib.rs
pub mod config;
pub mod discovery;
pub mod dispatch;
pub mod metrics;
pub mod probe;
pub mod report;
