//! Lead Radar: rank salespeople by great-circle distance to a lead.
//!
//! The [`ranker`] is a pure function over explicit candidates. The
//! [`roster`] holds live salesperson positions and feeds the ranker per
//! request; [`server`] and the `lead-radar` binary expose it.

pub mod config;
pub mod geo;
pub mod presentation;
pub mod ranker;
pub mod roster;
pub mod server;
pub mod telemetry;
