// src/state.rs
//! Account records owned by the Banksy and Auction programs
//!
//! Both programs store accounts in the Anchor layout: an eight byte
//! discriminator followed by the Borsh encoding of the fields. Account space
//! may exceed the payload, so decoding ignores trailing bytes.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use solana_program::pubkey::Pubkey;
use std::mem::size_of;

use crate::error_handling::{BanksyError, Result};
use crate::utils::{account_discriminator, discriminator_to_hex, DISCRIMINATOR_LEN};

/// Serialize a pubkey as its base58 string
mod pubkey_string {
    use serde::Serializer;
    use solana_program::pubkey::Pubkey;

    pub fn serialize<S: Serializer>(key: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(key)
    }
}

/// An account type stored with an Anchor discriminator
pub trait ProgramAccount: BorshSerialize + BorshDeserialize + Sized {
    /// Type name hashed into the discriminator
    const TYPE_NAME: &'static str;

    /// Discriminator prefix of the account data
    fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        account_discriminator(Self::TYPE_NAME)
    }

    /// Decode raw account data, checking the discriminator
    fn try_deserialize(data: &[u8]) -> Result<Self> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(BanksyError::Serialization(format!(
                "{} data too short: {} bytes",
                Self::TYPE_NAME,
                data.len()
            )));
        }

        let (prefix, mut payload) = data.split_at(DISCRIMINATOR_LEN);
        let expected = Self::discriminator();
        if prefix != expected {
            return Err(BanksyError::DiscriminatorMismatch {
                account_type: Self::TYPE_NAME,
                expected: discriminator_to_hex(&expected),
                found: discriminator_to_hex(prefix),
            });
        }

        <Self as BorshDeserialize>::deserialize(&mut payload)
            .map_err(|e| BanksyError::Serialization(e.to_string()))
    }

    /// Encode with the discriminator prefix
    fn try_serialize(&self) -> Result<Vec<u8>> {
        let mut data = Self::discriminator().to_vec();
        BorshSerialize::serialize(self, &mut data)
            .map_err(|e| BanksyError::Serialization(e.to_string()))?;
        Ok(data)
    }
}

/// Token descriptor: metadata uri and total supply
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct NftAccount {
    /// Metadata uri
    pub uri: String,
    /// Total number of units minted at creation
    pub supply: u64,
}

impl NftAccount {
    /// Space pre-allocated for every NFT account
    pub const SPACE: usize = 256;

    /// Longest uri that still fits in [`NftAccount::SPACE`]
    pub const MAX_URI_LEN: usize =
        Self::SPACE - DISCRIMINATOR_LEN - size_of::<u32>() - size_of::<u64>();

    /// Reject uris the program could not store
    pub fn check_uri(uri: &str) -> Result<()> {
        if uri.len() > Self::MAX_URI_LEN {
            return Err(BanksyError::UriTooLong {
                len: uri.len(),
                max: Self::MAX_URI_LEN,
            });
        }
        Ok(())
    }
}

impl ProgramAccount for NftAccount {
    const TYPE_NAME: &'static str = "NftAccount";
}

/// Per-owner balance of one NFT
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct UserAccount {
    /// Wallet allowed to move the balance
    #[serde(with = "pubkey_string")]
    pub authority: Pubkey,
    /// NFT account this balance belongs to
    #[serde(with = "pubkey_string")]
    pub nft: Pubkey,
    /// Units held
    pub amount: u64,
}

impl UserAccount {
    pub const LEN: usize = size_of::<Pubkey>() + size_of::<Pubkey>() + size_of::<u64>();
}

impl ProgramAccount for UserAccount {
    const TYPE_NAME: &'static str = "UserAccount";
}

/// Sale of NFT units held by the auction vault
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct Auction {
    #[serde(with = "pubkey_string")]
    pub seller: Pubkey,
    /// Current highest bidder; the seller until a bid arrives
    #[serde(with = "pubkey_string")]
    pub bidder: Pubkey,
    pub price: u64,
    /// User account holding the units on sale
    #[serde(with = "pubkey_string")]
    pub nft_holder: Pubkey,
    pub ongoing: bool,
    pub no_bid: bool,
}

impl Auction {
    pub const LEN: usize = size_of::<Pubkey>() * 3 + size_of::<u64>() + 2;

    /// Space allocated for an auction account, discriminator included
    pub const SPACE: usize = DISCRIMINATOR_LEN + Self::LEN;
}

impl ProgramAccount for Auction {
    const TYPE_NAME: &'static str = "Auction";
}
