//! Scenarios against a local validator
//!
//! Needs both programs deployed (`anchor deploy`) and the environment
//! exported by the Anchor tooling (`ANCHOR_PROVIDER_URL`, `ANCHOR_WALLET`)
//! plus `BANKSY_PROGRAM_ID` and `AUCTION_PROGRAM_ID`. Run with
//! `cargo test -- --ignored`.

use banksy_client::{
    scenarios, BanksyClient, ClientConfig, Connection, ProgramAccount, UserAccount, REFERENCE_URI,
};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::signature::{Keypair, Signer};

const MIN_PAYER_LAMPORTS: u64 = 1_000_000_000;

async fn live_client() -> BanksyClient<RpcClient> {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = ClientConfig::from_env();
    config.validate().unwrap();

    let client = BanksyClient::new(
        config.rpc_client().unwrap(),
        config.load_payer().unwrap(),
        config.program_ids().unwrap(),
    );

    let balance = Connection::get_account(client.connection(), &client.payer())
        .await
        .unwrap()
        .map(|account| account.lamports)
        .unwrap_or(0);
    if balance < MIN_PAYER_LAMPORTS {
        client.airdrop(&client.payer(), MIN_PAYER_LAMPORTS).await.unwrap();
    }

    client
}

#[tokio::test]
#[ignore]
async fn test_nft_lifecycle() {
    let client = live_client().await;
    scenarios::nft_lifecycle(&client).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_transfer_without_authority() {
    let client = live_client().await;
    scenarios::transfer_without_authority(&client).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_start_auction() {
    let client = live_client().await;
    scenarios::start_auction(&client).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_find_user_account_is_idempotent() {
    let client = live_client().await;
    let owner = Keypair::new();
    let stranger = Keypair::new();

    let nft = client.create_nft(REFERENCE_URI, 5, &owner).await.unwrap();

    let first = client.find_user_account(&stranger.pubkey(), &nft).await.unwrap();
    let second = client.find_user_account(&stranger.pubkey(), &nft).await.unwrap();
    assert_eq!(first, second);

    let account = Connection::get_account(client.connection(), &first).await.unwrap().unwrap();
    assert_eq!(account.owner, client.program_ids().banksy);

    let user = UserAccount::try_deserialize(&account.data).unwrap();
    assert_eq!(user.amount, 0);
    assert_eq!(user.authority, stranger.pubkey());
    assert_eq!(user.nft, nft);
}

#[tokio::test]
#[ignore]
async fn test_overdrawn_transfer_is_rejected() {
    let client = live_client().await;
    let owner = Keypair::new();
    let recipient = Keypair::new();

    let nft = client.create_nft(REFERENCE_URI, 5, &owner).await.unwrap();

    let rejected =
        banksy_client::expect_failure(client.transfer(&nft, &owner, &recipient.pubkey(), 6)).await;
    assert!(rejected);

    let owner_account = client.find_user_account(&owner.pubkey(), &nft).await.unwrap();
    assert_eq!(client.fetch_user(&owner_account).await.unwrap().amount, 5);
}
