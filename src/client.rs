// src/client.rs
//! Client for the Banksy NFT ledger and Auction programs
//!
//! Every method builds its instructions, signs with the fee payer plus any
//! extra keypairs and waits for confirmation before returning. Calls never
//! overlap.

use log::{debug, info};
use solana_program::{instruction::Instruction, pubkey::Pubkey};
use solana_sdk::{
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use std::future::Future;

use crate::config::ProgramIds;
use crate::connection::Connection;
use crate::error_handling::{BanksyError, Result};
use crate::instruction::{allocate_account, AuctionInstruction, BanksyInstruction};
use crate::state::{Auction, NftAccount, ProgramAccount, UserAccount};
use crate::utils::{associated_user_address, auction_vault_address};

/// Metadata uri used for NFTs created by the client's composite helpers
pub const REFERENCE_URI: &str = "ipfs://ipfs/QmVLAo3EQvkkQKjLTt1dawYsehSEnwYBi19vzh85pohpuw";

/// Supply of the NFT minted by [`BanksyClient::create_auction`]
pub const AUCTION_NFT_SUPPLY: u64 = 100;

/// Units [`BanksyClient::create_auction`] puts up for sale
pub const AUCTION_LOT_SIZE: u64 = 10;

/// Addresses involved in a freshly opened auction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuctionHandle {
    pub auction: Pubkey,
    pub seller: Pubkey,
    pub nft: Pubkey,
    /// Vault user account holding the units on sale
    pub nft_holder: Pubkey,
}

pub struct BanksyClient<C: Connection> {
    connection: C,
    payer: Keypair,
    program_ids: ProgramIds,
}

impl<C: Connection> BanksyClient<C> {
    pub fn new(connection: C, payer: Keypair, program_ids: ProgramIds) -> Self {
        Self {
            connection,
            payer,
            program_ids,
        }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Fee payer address
    pub fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    pub fn program_ids(&self) -> ProgramIds {
        self.program_ids
    }

    /// Sign `instructions` with the payer and `signers`, then submit them
    async fn send(&self, instructions: &[Instruction], signers: &[&Keypair]) -> Result<Signature> {
        let blockhash = self.connection.latest_blockhash().await?;

        let mut all_signers: Vec<&Keypair> = vec![&self.payer];
        for signer in signers {
            if all_signers.iter().all(|s| s.pubkey() != signer.pubkey()) {
                all_signers.push(*signer);
            }
        }

        let mut transaction = Transaction::new_with_payer(instructions, Some(&self.payer.pubkey()));
        transaction.try_sign(&all_signers, blockhash)?;

        self.connection.send_and_confirm(&transaction).await
    }

    /// Create an NFT whose whole supply is credited to `authority`
    pub async fn create_nft(&self, uri: &str, supply: u64, authority: &Keypair) -> Result<Pubkey> {
        NftAccount::check_uri(uri)?;

        let nft = Keypair::new();
        let user = associated_user_address(&self.program_ids.banksy, &authority.pubkey(), &nft.pubkey());
        let lamports = self
            .connection
            .minimum_balance_for_rent_exemption(NftAccount::SPACE)
            .await?;

        let instructions = [
            allocate_account(
                &self.payer.pubkey(),
                &nft.pubkey(),
                lamports,
                NftAccount::SPACE,
                &self.program_ids.banksy,
            ),
            BanksyInstruction::create_nft(
                &self.program_ids.banksy,
                &nft.pubkey(),
                &authority.pubkey(),
                &user,
                &self.payer.pubkey(),
                uri.to_string(),
                supply,
            )?,
        ];

        self.send(&instructions, &[&nft, authority]).await?;
        info!("Created NFT {} with supply {} for {}", nft.pubkey(), supply, authority.pubkey());

        Ok(nft.pubkey())
    }

    /// Address of the user account of `authority` for `nft`, created on first use
    pub async fn find_user_account(&self, authority: &Pubkey, nft: &Pubkey) -> Result<Pubkey> {
        let user = associated_user_address(&self.program_ids.banksy, authority, nft);

        if self.connection.get_account(&user).await?.is_some() {
            debug!("User account {} already exists", user);
            return Ok(user);
        }

        let instruction = BanksyInstruction::create_user(
            &self.program_ids.banksy,
            nft,
            &self.payer.pubkey(),
            &user,
            authority,
        )?;
        self.send(&[instruction], &[]).await?;
        info!("Created user account {} for {} on NFT {}", user, authority, nft);

        Ok(user)
    }

    /// Move `amount` units of `nft` from the wallet `from` to the wallet `to`
    pub async fn transfer(&self, nft: &Pubkey, from: &Keypair, to: &Pubkey, amount: u64) -> Result<Signature> {
        self.transfer_signed_by(nft, &from.pubkey(), to, amount, &[from])
            .await
    }

    /// Like [`BanksyClient::transfer`], with the caller choosing the signers
    ///
    /// Without the owner's keypair among `signers` the transfer fails,
    /// either while signing or when the cluster rejects it.
    pub async fn transfer_signed_by(
        &self,
        nft: &Pubkey,
        from_authority: &Pubkey,
        to: &Pubkey,
        amount: u64,
        signers: &[&Keypair],
    ) -> Result<Signature> {
        let from_account = self.find_user_account(from_authority, nft).await?;
        let to_account = self.find_user_account(to, nft).await?;

        let instruction = BanksyInstruction::transfer(
            &self.program_ids.banksy,
            &from_account,
            &to_account,
            from_authority,
            amount,
        )?;
        let signature = self.send(&[instruction], signers).await?;
        info!("Transferred {} units of {} from {} to {}", amount, nft, from_authority, to);

        Ok(signature)
    }

    /// Open an auction over `lot` units of `nft` owned by `seller`
    ///
    /// The units move to the user account of the seller's auction vault,
    /// which becomes the auction's NFT holder.
    pub async fn open_auction(
        &self,
        seller: &Keypair,
        nft: &Pubkey,
        lot: u64,
        price: u64,
    ) -> Result<AuctionHandle> {
        let (vault, _bump) = auction_vault_address(&self.program_ids.auction, &seller.pubkey());
        let nft_holder = self.find_user_account(&vault, nft).await?;
        debug!("Auction vault {} holds units in {}", vault, nft_holder);

        self.transfer(nft, seller, &vault, lot).await?;

        let auction = Keypair::new();
        let lamports = self
            .connection
            .minimum_balance_for_rent_exemption(Auction::SPACE)
            .await?;

        let instructions = [
            allocate_account(
                &self.payer.pubkey(),
                &auction.pubkey(),
                lamports,
                Auction::SPACE,
                &self.program_ids.auction,
            ),
            AuctionInstruction::create_auction(
                &self.program_ids.auction,
                &auction.pubkey(),
                &seller.pubkey(),
                &nft_holder,
                price,
            )?,
        ];
        self.send(&instructions, &[&auction]).await?;
        info!("Opened auction {} at price {}", auction.pubkey(), price);

        Ok(AuctionHandle {
            auction: auction.pubkey(),
            seller: seller.pubkey(),
            nft: *nft,
            nft_holder,
        })
    }

    /// Mint a fresh NFT for `seller` and auction part of it at `price`
    pub async fn create_auction(&self, seller: &Keypair, price: u64) -> Result<AuctionHandle> {
        let nft = self.create_nft(REFERENCE_URI, AUCTION_NFT_SUPPLY, seller).await?;
        self.open_auction(seller, &nft, AUCTION_LOT_SIZE, price).await
    }

    /// Fetch and decode a program account
    pub async fn fetch<T: ProgramAccount>(&self, address: &Pubkey) -> Result<T> {
        let account = self
            .connection
            .get_account(address)
            .await?
            .ok_or(BanksyError::AccountNotFound(*address))?;
        T::try_deserialize(&account.data)
    }

    pub async fn fetch_nft(&self, address: &Pubkey) -> Result<NftAccount> {
        self.fetch(address).await
    }

    pub async fn fetch_user(&self, address: &Pubkey) -> Result<UserAccount> {
        self.fetch(address).await
    }

    pub async fn fetch_auction(&self, address: &Pubkey) -> Result<Auction> {
        self.fetch(address).await
    }

    /// Fund an address from the cluster faucet
    pub async fn airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature> {
        let signature = self.connection.request_airdrop(to, lamports).await?;
        info!("Airdropped {} lamports to {}", lamports, to);
        Ok(signature)
    }
}

/// Await `operation` and report whether it failed
pub async fn expect_failure<T, F>(operation: F) -> bool
where
    F: Future<Output = Result<T>>,
{
    match operation.await {
        Ok(_) => false,
        Err(e) => {
            debug!("Operation failed as expected: {}", e);
            true
        }
    }
}
