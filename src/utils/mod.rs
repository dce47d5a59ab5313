// src/utils/mod.rs
//! Utility functions for the Banksy client
//!
//! This module contains the Anchor wire-format hashing helpers and the
//! program-derived address lookups shared by the instruction builders,
//! the account decoders and the client.

use sha2::{Digest, Sha256};
use solana_program::pubkey::Pubkey;

/// Length of an Anchor discriminator or sighash
pub const DISCRIMINATOR_LEN: usize = 8;

/// Seed prefix Anchor uses for associated accounts
pub const ASSOCIATED_SEED: &[u8] = b"anchor";

/// Hash `namespace:name` and keep the first eight bytes
fn namespaced_hash(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    hasher.update(b":");
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();

    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    out
}

/// Instruction sighash for a snake_case instruction name
pub fn sighash(instruction_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    namespaced_hash("global", instruction_name)
}

/// Account discriminator for a CamelCase account type name
pub fn account_discriminator(type_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    namespaced_hash("account", type_name)
}

/// Address of the user account tracking `nft` for `authority`
///
/// Seeds: `["anchor", authority, nft]` under the Banksy program.
pub fn associated_user_address(program_id: &Pubkey, authority: &Pubkey, nft: &Pubkey) -> Pubkey {
    let (address, _bump) = Pubkey::find_program_address(
        &[ASSOCIATED_SEED, authority.as_ref(), nft.as_ref()],
        program_id,
    );
    address
}

/// Address of the auction program's vault for a seller
///
/// Seeds: `[seller]` under the Auction program. NFT units put up for sale
/// are moved to the user account this address owns.
pub fn auction_vault_address(auction_program_id: &Pubkey, seller: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seller.as_ref()], auction_program_id)
}

/// Render a discriminator for logs and error messages
pub fn discriminator_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
