// src/scenarios.rs
//! End-to-end checks against deployed Banksy and Auction programs
//!
//! Each scenario drives a [`BanksyClient`] through one user story and
//! compares the resulting on-chain records with what the programs promise.
//! A broken promise comes back as [`BanksyError::Assertion`].

use clap::ValueEnum;
use log::info;
use solana_program::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};

use crate::client::{expect_failure, BanksyClient, AUCTION_LOT_SIZE, REFERENCE_URI};
use crate::connection::Connection;
use crate::error_handling::{BanksyError, Result};
use crate::state::UserAccount;

macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err(BanksyError::Assertion(format!($($arg)+)));
        }
    };
}

/// Scenarios the suite knows how to run
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Create an NFT, then move part of the supply to a second wallet
    NftLifecycle,
    /// A transfer not signed by the owner must leave balances untouched
    TransferWithoutAuthority,
    /// Open an auction and inspect its initial state
    StartAuction,
}

impl Scenario {
    pub fn all() -> [Scenario; 3] {
        [
            Scenario::NftLifecycle,
            Scenario::TransferWithoutAuthority,
            Scenario::StartAuction,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::NftLifecycle => "nft-lifecycle",
            Scenario::TransferWithoutAuthority => "transfer-without-authority",
            Scenario::StartAuction => "start-auction",
        }
    }

    pub async fn run<C: Connection>(&self, client: &BanksyClient<C>) -> Result<()> {
        info!("Running scenario {}", self.name());
        match self {
            Scenario::NftLifecycle => nft_lifecycle(client).await,
            Scenario::TransferWithoutAuthority => transfer_without_authority(client).await,
            Scenario::StartAuction => start_auction(client).await,
        }
    }
}

fn check_user(user: &UserAccount, authority: &Pubkey, nft: &Pubkey, amount: u64) -> Result<()> {
    ensure!(
        user.amount == amount,
        "balance of {} is {}, expected {}",
        authority,
        user.amount,
        amount
    );
    ensure!(
        user.authority == *authority,
        "user account authority is {}, expected {}",
        user.authority,
        authority
    );
    ensure!(user.nft == *nft, "user account tracks {}, expected {}", user.nft, nft);
    Ok(())
}

/// Mint 100 units, check the records, then transfer 10 of them
pub async fn nft_lifecycle<C: Connection>(client: &BanksyClient<C>) -> Result<()> {
    let supply = 100;
    let amount = 10;
    let user1 = Keypair::new();
    let user2 = Keypair::new();

    let nft = client.create_nft(REFERENCE_URI, supply, &user1).await?;

    let info = client.fetch_nft(&nft).await?;
    ensure!(info.supply == supply, "supply is {}, expected {}", info.supply, supply);
    ensure!(info.uri == REFERENCE_URI, "uri is {:?}, expected {:?}", info.uri, REFERENCE_URI);

    let user1_account = client.find_user_account(&user1.pubkey(), &nft).await?;
    check_user(&client.fetch_user(&user1_account).await?, &user1.pubkey(), &nft, supply)?;

    client.transfer(&nft, &user1, &user2.pubkey(), amount).await?;

    let user2_account = client.find_user_account(&user2.pubkey(), &nft).await?;
    check_user(
        &client.fetch_user(&user1_account).await?,
        &user1.pubkey(),
        &nft,
        supply - amount,
    )?;
    check_user(&client.fetch_user(&user2_account).await?, &user2.pubkey(), &nft, amount)?;

    Ok(())
}

/// A third wallet cannot move units out of the owner's account
pub async fn transfer_without_authority<C: Connection>(client: &BanksyClient<C>) -> Result<()> {
    let supply = 100;
    let user1 = Keypair::new();
    let user2 = Keypair::new();
    let user3 = Keypair::new();

    let nft = client.create_nft(REFERENCE_URI, supply, &user1).await?;

    let user1_account = client.find_user_account(&user1.pubkey(), &nft).await?;
    let user2_account = client.find_user_account(&user2.pubkey(), &nft).await?;

    let rejected = expect_failure(client.transfer_signed_by(
        &nft,
        &user1.pubkey(),
        &user2.pubkey(),
        10,
        &[&user3],
    ))
    .await;
    ensure!(rejected, "transfer signed by {} went through", user3.pubkey());

    check_user(&client.fetch_user(&user1_account).await?, &user1.pubkey(), &nft, supply)?;
    check_user(&client.fetch_user(&user2_account).await?, &user2.pubkey(), &nft, 0)?;

    Ok(())
}

/// A new auction is ongoing, without bids, and holds the lot
pub async fn start_auction<C: Connection>(client: &BanksyClient<C>) -> Result<()> {
    let price = 10;
    let seller = Keypair::new();

    let handle = client.create_auction(&seller, price).await?;
    let auction = client.fetch_auction(&handle.auction).await?;

    ensure!(auction.ongoing, "auction {} is not ongoing", handle.auction);
    ensure!(auction.no_bid, "auction {} already has a bid", handle.auction);
    ensure!(
        auction.seller == seller.pubkey(),
        "seller is {}, expected {}",
        auction.seller,
        seller.pubkey()
    );
    ensure!(
        auction.bidder == seller.pubkey(),
        "bidder is {}, expected the seller {}",
        auction.bidder,
        seller.pubkey()
    );
    ensure!(
        auction.nft_holder == handle.nft_holder,
        "nft holder is {}, expected {}",
        auction.nft_holder,
        handle.nft_holder
    );

    let holder = client.fetch_user(&auction.nft_holder).await?;
    ensure!(
        holder.amount == AUCTION_LOT_SIZE,
        "nft holder has {} units, expected {}",
        holder.amount,
        AUCTION_LOT_SIZE
    );
    ensure!(auction.price == price, "price is {}, expected {}", auction.price, price);

    Ok(())
}
