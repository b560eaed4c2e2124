//! Outbound adapters backing the domain ports.

pub mod persistence;
