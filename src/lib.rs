// src/lib.rs
//! Banksy client
//!
//! Drives the Banksy NFT ledger program and its companion Auction program
//! over Solana JSON-RPC:
//! - Instruction builders and account decoders for both programs
//! - Program-derived address lookups
//! - An async client that signs, submits and confirms transactions
//! - Scenarios that check the programs' behaviour on a live cluster

pub mod client;
pub mod config;
pub mod connection;
pub mod error_handling;
pub mod instruction;
pub mod scenarios;
pub mod state;
pub mod utils;

pub use client::{expect_failure, AuctionHandle, BanksyClient, REFERENCE_URI};
pub use config::{ClientConfig, ProgramIds};
pub use connection::Connection;
pub use error_handling::{BanksyError, Result};
pub use instruction::{allocate_account, AuctionInstruction, BanksyInstruction};
pub use scenarios::Scenario;
pub use state::{Auction, NftAccount, ProgramAccount, UserAccount};
