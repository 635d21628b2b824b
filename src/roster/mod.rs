//! Live salesperson roster.
//!
//! Holds each salesperson's display fields and last reported position, and
//! feeds them to the ranker as explicit candidates per request.

pub mod store;
pub mod types;

pub use store::Roster;
pub use types::{LocationUpdate, NearbySalesperson, RosterError, Salesperson, SalespersonStatus};
