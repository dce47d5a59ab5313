// src/connection.rs
//! Connection to a Solana cluster
//!
//! The client only needs a handful of RPC calls. They sit behind the
//! [`Connection`] trait so orchestration can run against the JSON-RPC client
//! or, in unit tests, against an in-memory recorder.

use async_trait::async_trait;
use log::debug;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_program::{hash::Hash, pubkey::Pubkey};
use solana_sdk::{account::Account, signature::Signature, transaction::Transaction};

use crate::error_handling::Result;

/// RPC surface used by the client
#[async_trait]
pub trait Connection: Send + Sync {
    /// Fetch an account, `None` when nothing lives at the address
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>>;

    /// Lamports needed for an account of `space` bytes to be rent exempt
    async fn minimum_balance_for_rent_exemption(&self, space: usize) -> Result<u64>;

    /// Blockhash to sign new transactions with
    async fn latest_blockhash(&self) -> Result<Hash>;

    /// Submit a signed transaction and wait for confirmation
    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature>;

    /// Ask the cluster faucet for lamports and wait for them to land
    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature>;
}

#[async_trait]
impl Connection for RpcClient {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>> {
        let response = self
            .get_account_with_commitment(address, self.commitment())
            .await?;
        Ok(response.value)
    }

    async fn minimum_balance_for_rent_exemption(&self, space: usize) -> Result<u64> {
        Ok(self.get_minimum_balance_for_rent_exemption(space).await?)
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(self.get_latest_blockhash().await?)
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature> {
        let signature = self.send_and_confirm_transaction(transaction).await?;
        debug!("Confirmed transaction {}", signature);
        Ok(signature)
    }

    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature> {
        let signature = RpcClient::request_airdrop(self, to, lamports).await?;
        self.poll_for_signature(&signature).await?;
        debug!("Airdropped {} lamports to {}", lamports, to);
        Ok(signature)
    }
}

#[cfg(test)]
pub mod mock {
    //! Recording connection for unit tests
    //!
    //! Serves accounts from a map and records every transaction it receives.
    //! It does not execute programs: tests seed the accounts a real cluster
    //! would have produced, either up front or from an [`OnSend`] hook that
    //! writes canned post-state whenever a transaction lands.

    use super::*;
    use solana_client::client_error::ClientError;
    use solana_sdk::transaction::TransactionError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    pub const RENT_PER_BYTE: u64 = 6_960;

    /// Called with every verified transaction; an error rejects it
    pub type OnSend =
        Box<dyn Fn(&Transaction, &mut HashMap<Pubkey, Account>) -> Result<()> + Send + Sync>;

    /// Account record as the mock stores it
    pub fn account(owner: Pubkey, data: Vec<u8>) -> Account {
        Account {
            lamports: 1_000_000,
            data,
            owner,
            executable: false,
            rent_epoch: 0,
        }
    }

    #[derive(Default)]
    pub struct MockConnection {
        accounts: Mutex<HashMap<Pubkey, Account>>,
        sent: Mutex<Vec<Transaction>>,
        airdrops: Mutex<Vec<(Pubkey, u64)>>,
        on_send: Option<OnSend>,
    }

    impl MockConnection {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_on_send(on_send: OnSend) -> Self {
            Self {
                on_send: Some(on_send),
                ..Self::default()
            }
        }

        pub fn set_account(&self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
            self.accounts.lock().unwrap().insert(address, account(owner, data));
        }

        pub fn sent(&self) -> Vec<Transaction> {
            self.sent.lock().unwrap().clone()
        }

        pub fn airdrops(&self) -> Vec<(Pubkey, u64)> {
            self.airdrops.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Connection for MockConnection {
        async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>> {
            Ok(self.accounts.lock().unwrap().get(address).cloned())
        }

        async fn minimum_balance_for_rent_exemption(&self, space: usize) -> Result<u64> {
            Ok(space as u64 * RENT_PER_BYTE)
        }

        async fn latest_blockhash(&self) -> Result<Hash> {
            Ok(Hash::new_unique())
        }

        async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature> {
            if transaction.verify().is_err() {
                return Err(ClientError::from(TransactionError::SignatureFailure).into());
            }
            if let Some(on_send) = &self.on_send {
                on_send(transaction, &mut *self.accounts.lock().unwrap())?;
            }
            self.sent.lock().unwrap().push(transaction.clone());
            Ok(transaction.signatures[0])
        }

        async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature> {
            self.airdrops.lock().unwrap().push((*to, lamports));
            Ok(Signature::new_unique())
        }
    }
}
