// src/instruction.rs
//! Instructions understood by the Banksy and Auction programs
//!
//! Instruction data is the eight byte sighash of the instruction name
//! followed by the Borsh encoding of its arguments. Account lists follow the
//! programs' account structs in declaration order.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_instruction, system_program,
    sysvar,
};

use crate::error_handling::{BanksyError, Result};
use crate::utils::{discriminator_to_hex, sighash, DISCRIMINATOR_LEN};

#[derive(BorshSerialize, BorshDeserialize)]
struct CreateNftArgs {
    uri: String,
    supply: u64,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct AmountArgs {
    amount: u64,
}

/// Split instruction data into its sighash and argument bytes
fn split_sighash(data: &[u8]) -> Result<([u8; DISCRIMINATOR_LEN], &[u8])> {
    if data.len() < DISCRIMINATOR_LEN {
        return Err(BanksyError::UnknownInstruction(format!(
            "instruction data too short: {} bytes",
            data.len()
        )));
    }
    let (head, rest) = data.split_at(DISCRIMINATOR_LEN);
    let mut tag = [0u8; DISCRIMINATOR_LEN];
    tag.copy_from_slice(head);
    Ok((tag, rest))
}

fn encode<T: BorshSerialize>(name: &str, args: &T) -> Result<Vec<u8>> {
    let mut data = sighash(name).to_vec();
    args.serialize(&mut data)
        .map_err(|e| BanksyError::Serialization(e.to_string()))?;
    Ok(data)
}

fn decode<T: BorshDeserialize>(mut args: &[u8]) -> Result<T> {
    T::deserialize(&mut args).map_err(|e| BanksyError::Serialization(e.to_string()))
}

/// Instructions of the Banksy NFT ledger program
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BanksyInstruction {
    /// Creates an NFT and credits the whole supply to the creator
    ///
    /// Accounts:
    /// 0. `[writable]` NFT account, pre-allocated and owned by the program
    /// 1. `[signer]` Creator wallet
    /// 2. `[writable]` Creator's associated user account
    /// 3. `[writable, signer]` Fee payer
    /// 4. `[]` System program
    /// 5. `[]` Rent sysvar
    CreateNft {
        /// Metadata uri
        uri: String,
        /// Total supply
        supply: u64,
    },

    /// Creates the associated user account of a wallet for an NFT
    ///
    /// Accounts:
    /// 0. `[]` NFT account
    /// 1. `[writable, signer]` Fee payer
    /// 2. `[writable]` Associated user account
    /// 3. `[]` Wallet owning the new account
    /// 4. `[]` System program
    /// 5. `[]` Rent sysvar
    CreateUser,

    /// Moves units between two user accounts of the same NFT
    ///
    /// Accounts:
    /// 0. `[writable]` Source user account
    /// 1. `[writable]` Destination user account
    /// 2. `[signer]` Authority of the source account
    Transfer {
        /// Units to move
        amount: u64,
    },
}

impl BanksyInstruction {
    /// Snake case name hashed into the sighash
    pub fn name(&self) -> &'static str {
        match self {
            BanksyInstruction::CreateNft { .. } => "create_nft",
            BanksyInstruction::CreateUser => "create_user",
            BanksyInstruction::Transfer { .. } => "transfer",
        }
    }

    /// Encode as instruction data
    pub fn pack(&self) -> Result<Vec<u8>> {
        match self {
            BanksyInstruction::CreateNft { uri, supply } => encode(
                self.name(),
                &CreateNftArgs {
                    uri: uri.clone(),
                    supply: *supply,
                },
            ),
            BanksyInstruction::CreateUser => Ok(sighash(self.name()).to_vec()),
            BanksyInstruction::Transfer { amount } => {
                encode(self.name(), &AmountArgs { amount: *amount })
            }
        }
    }

    /// Decode instruction data
    pub fn unpack(data: &[u8]) -> Result<Self> {
        let (tag, args) = split_sighash(data)?;

        if tag == sighash("create_nft") {
            let CreateNftArgs { uri, supply } = decode(args)?;
            Ok(BanksyInstruction::CreateNft { uri, supply })
        } else if tag == sighash("create_user") {
            Ok(BanksyInstruction::CreateUser)
        } else if tag == sighash("transfer") {
            let AmountArgs { amount } = decode(args)?;
            Ok(BanksyInstruction::Transfer { amount })
        } else {
            Err(BanksyError::UnknownInstruction(discriminator_to_hex(&tag)))
        }
    }

    /// Create a `create_nft` instruction
    pub fn create_nft(
        program_id: &Pubkey,
        nft: &Pubkey,
        authority: &Pubkey,
        user: &Pubkey,
        payer: &Pubkey,
        uri: String,
        supply: u64,
    ) -> Result<Instruction> {
        let accounts = vec![
            AccountMeta::new(*nft, false),
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new(*user, false),
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ];

        Ok(Instruction {
            program_id: *program_id,
            accounts,
            data: BanksyInstruction::CreateNft { uri, supply }.pack()?,
        })
    }

    /// Create a `create_user` instruction
    pub fn create_user(
        program_id: &Pubkey,
        nft: &Pubkey,
        payer: &Pubkey,
        user: &Pubkey,
        authority: &Pubkey,
    ) -> Result<Instruction> {
        let accounts = vec![
            AccountMeta::new_readonly(*nft, false),
            AccountMeta::new(*payer, true),
            AccountMeta::new(*user, false),
            AccountMeta::new_readonly(*authority, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ];

        Ok(Instruction {
            program_id: *program_id,
            accounts,
            data: BanksyInstruction::CreateUser.pack()?,
        })
    }

    /// Create a `transfer` instruction
    pub fn transfer(
        program_id: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        authority: &Pubkey,
        amount: u64,
    ) -> Result<Instruction> {
        let accounts = vec![
            AccountMeta::new(*from, false),
            AccountMeta::new(*to, false),
            AccountMeta::new_readonly(*authority, true),
        ];

        Ok(Instruction {
            program_id: *program_id,
            accounts,
            data: BanksyInstruction::Transfer { amount }.pack()?,
        })
    }
}

/// Instructions of the Auction program
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuctionInstruction {
    /// Opens an auction over units held by the seller's vault
    ///
    /// Accounts:
    /// 0. `[writable]` Auction account, pre-allocated and owned by the program
    /// 1. `[]` Seller wallet
    /// 2. `[]` Vault user account holding the units on sale
    /// 3. `[]` Rent sysvar
    CreateAuction {
        /// Starting price
        price: u64,
    },
}

impl AuctionInstruction {
    pub fn name(&self) -> &'static str {
        match self {
            AuctionInstruction::CreateAuction { .. } => "create_auction",
        }
    }

    pub fn pack(&self) -> Result<Vec<u8>> {
        match self {
            AuctionInstruction::CreateAuction { price } => {
                encode(self.name(), &AmountArgs { amount: *price })
            }
        }
    }

    pub fn unpack(data: &[u8]) -> Result<Self> {
        let (tag, args) = split_sighash(data)?;

        if tag == sighash("create_auction") {
            let AmountArgs { amount } = decode(args)?;
            Ok(AuctionInstruction::CreateAuction { price: amount })
        } else {
            Err(BanksyError::UnknownInstruction(discriminator_to_hex(&tag)))
        }
    }

    /// Create a `create_auction` instruction
    pub fn create_auction(
        program_id: &Pubkey,
        auction: &Pubkey,
        seller: &Pubkey,
        nft_holder: &Pubkey,
        price: u64,
    ) -> Result<Instruction> {
        let accounts = vec![
            AccountMeta::new(*auction, false),
            AccountMeta::new_readonly(*seller, false),
            AccountMeta::new_readonly(*nft_holder, false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ];

        Ok(Instruction {
            program_id: *program_id,
            accounts,
            data: AuctionInstruction::CreateAuction { price }.pack()?,
        })
    }
}

/// Pre-allocate a program-owned account funded by `payer`
pub fn allocate_account(
    payer: &Pubkey,
    new_account: &Pubkey,
    lamports: u64,
    space: usize,
    owner: &Pubkey,
) -> Instruction {
    system_instruction::create_account(payer, new_account, lamports, space as u64, owner)
}
