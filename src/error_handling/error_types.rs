// src/error_handling/error_types.rs
//! Error types for the Banksy client
//!
//! Every fallible operation in the crate returns [`BanksyError`], so callers
//! (the CLI, the scenario suite) can tell an RPC failure from a decoding
//! problem or a failed scenario check.

use solana_client::client_error::ClientError;
use solana_program::{program_error::ProgramError, pubkey::Pubkey};
use solana_sdk::signer::SignerError;
use thiserror::Error;

/// First code of the range holding Solana's builtin program errors
pub const BUILTIN_PROGRAM_ERROR_BASE: u32 = 2000;

/// Base error type for the Banksy client
#[derive(Error, Debug)]
pub enum BanksyError {
    /// JSON-RPC transport or cluster-side rejection
    #[error("RPC error: {0}")]
    Rpc(#[from] ClientError),

    /// Solana program error
    #[error("Program error: {0}")]
    ProgramError(#[from] ProgramError),

    /// Transaction could not be signed with the supplied keypairs
    #[error("Signing error: {0}")]
    Signing(#[from] SignerError),

    /// Borsh encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Account data does not start with the expected discriminator
    #[error("Discriminator mismatch for {account_type}: expected {expected}, found {found}")]
    DiscriminatorMismatch {
        account_type: &'static str,
        expected: String,
        found: String,
    },

    /// Instruction data carries a sighash neither program understands
    #[error("Unknown instruction: {0}")]
    UnknownInstruction(String),

    /// No account lives at the address
    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    /// Uri does not fit in the NFT account
    #[error("Uri too long: {len} bytes, at most {max} allowed")]
    UriTooLong { len: usize, max: usize },

    /// Invalid or missing configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A scenario check did not hold
    #[error("Assertion failed: {0}")]
    Assertion(String),
}

impl BanksyError {
    /// Convert to error code
    pub fn to_error_code(&self) -> u32 {
        match self {
            BanksyError::ProgramError(ProgramError::Custom(code)) => *code,
            BanksyError::ProgramError(e) => {
                // Builtin errors live in the upper half of the u64 encoding
                BUILTIN_PROGRAM_ERROR_BASE + (u64::from(e.clone()) >> 32) as u32
            }
            BanksyError::Rpc(_) => 1000,
            BanksyError::Signing(_) => 1001,
            BanksyError::Serialization(_) => 1002,
            BanksyError::DiscriminatorMismatch { .. } => 1003,
            BanksyError::UnknownInstruction(_) => 1004,
            BanksyError::AccountNotFound(_) => 1005,
            BanksyError::UriTooLong { .. } => 1006,
            BanksyError::Config(_) => 1007,
            BanksyError::Io(_) => 1008,
            BanksyError::Assertion(_) => 1009,
        }
    }

    /// Whether the error came back from the cluster rather than from local checks
    pub fn is_remote(&self) -> bool {
        matches!(self, BanksyError::Rpc(_) | BanksyError::ProgramError(_))
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, BanksyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = vec![
            BanksyError::Serialization("x".to_string()),
            BanksyError::UnknownInstruction("x".to_string()),
            BanksyError::AccountNotFound(Pubkey::new_unique()),
            BanksyError::UriTooLong { len: 300, max: 236 },
            BanksyError::Config("x".to_string()),
            BanksyError::Assertion("x".to_string()),
        ];

        let mut codes: Vec<u32> = errors.iter().map(|e| e.to_error_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_program_error_keeps_its_code() {
        let error = BanksyError::from(ProgramError::Custom(6000));
        assert_eq!(error.to_error_code(), 6000);
        assert!(error.is_remote());
    }

    #[test]
    fn test_builtin_program_errors_get_distinct_codes() {
        let builtins = vec![
            ProgramError::InvalidArgument,
            ProgramError::InvalidInstructionData,
            ProgramError::InvalidAccountData,
            ProgramError::MissingRequiredSignature,
            ProgramError::AccountAlreadyInitialized,
            ProgramError::InsufficientFunds,
        ];

        let mut codes: Vec<u32> = builtins
            .into_iter()
            .map(|e| BanksyError::from(e).to_error_code())
            .collect();
        assert!(codes.iter().all(|code| *code > BUILTIN_PROGRAM_ERROR_BASE));

        let custom_zero = BanksyError::from(ProgramError::Custom(0)).to_error_code();
        assert_eq!(custom_zero, 0);
        assert!(!codes.contains(&custom_zero));

        let count = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), count);
    }

    #[test]
    fn test_display() {
        let error = BanksyError::UriTooLong { len: 300, max: 236 };
        assert_eq!(error.to_string(), "Uri too long: 300 bytes, at most 236 allowed");
        assert!(!error.is_remote());
    }
}
