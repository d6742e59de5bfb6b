//! Off-chain services for the auction platform: the per-user bid
//! history view, and the orchestration of settle and withdraw
//! transactions between the database and the auction contract.

pub mod auction_house;
pub mod chain;
pub mod database;
pub mod history;
pub mod settlement;
