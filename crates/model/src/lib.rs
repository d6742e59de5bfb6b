//! Domain records shared by the auction services and the status
//! derivation rules every call site must agree on.

pub mod auction;
pub mod bid;
