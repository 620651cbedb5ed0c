//! Auction engine: one English auction per governance proposal.
//!
//! Lifecycle per proposal id: `NoBids → Open → Expired`. An auction is
//! created by its first bid, runs for a fixed window, and is never closed
//! explicitly: once the window has passed it simply stops accepting bids and
//! keeps its last highest bidder forever. Every accepted bid injects proceeds
//! into the reward engine.

pub mod auction;
pub mod book;
pub mod error;

pub use auction::{Auction, AuctionStatus, BidInfo};
pub use book::{AuctionBook, BidReceipt};
pub use error::AuctionError;
