//! JSON-RPC chain client.

use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;
use solana_instruction::Instruction;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;
use solana_transaction::Transaction;
use solana_transaction_error::TransactionError;
use tracing::debug;

use crate::chain::{ChainError, ChainReader, ChainWriter, RejectionReason, TransactionStatus};

/// [`ChainReader`] and [`ChainWriter`] over a Solana RPC node.
pub struct RpcChain {
    client: RpcClient,
}

impl RpcChain {
    /// Connect to `url` at `confirmed` commitment.
    pub fn new(url: String) -> Self {
        Self::with_commitment(url, CommitmentConfig::confirmed())
    }

    /// Connect to `url` at the given commitment.
    pub fn with_commitment(url: String, commitment: CommitmentConfig) -> Self {
        Self {
            client: RpcClient::new_with_commitment(url, commitment),
        }
    }

    /// Endpoint this client talks to.
    pub fn url(&self) -> String {
        self.client.url()
    }
}

/// Transaction and preflight failures are rejections; everything else is
/// transport.
fn classify(error: ClientError) -> ChainError {
    match error.get_transaction_error() {
        Some(tx_error) => ChainError::Rejected(RejectionReason::from_transaction_error(&tx_error)),
        None => ChainError::Network(error.to_string()),
    }
}

impl ChainReader for RpcChain {
    async fn get_account_bytes(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, ChainError> {
        let response = self
            .client
            .get_account_with_commitment(address, self.client.commitment())
            .await
            .map_err(classify)?;
        Ok(response.value.map(|account| account.data))
    }
}

impl ChainWriter for RpcChain {
    async fn submit_instruction(
        &self,
        instruction: Instruction,
        signer: &Keypair,
    ) -> Result<Signature, ChainError> {
        let blockhash = self.client.get_latest_blockhash().await.map_err(classify)?;
        let transaction = Transaction::new_signed_with_payer(
            &[instruction],
            Some(&signer.pubkey()),
            &[signer],
            blockhash,
        );
        let signature = self
            .client
            .send_transaction(&transaction)
            .await
            .map_err(classify)?;
        debug!(%signature, "transaction sent");
        Ok(signature)
    }

    async fn get_transaction_status(
        &self,
        signature: &Signature,
    ) -> Result<TransactionStatus, ChainError> {
        let response = self
            .client
            .get_signature_statuses(&[*signature])
            .await
            .map_err(classify)?;
        let Some(status) = response.value.into_iter().next().flatten() else {
            return Ok(TransactionStatus::Pending);
        };
        if let Some(error) = status.err.clone() {
            let error: TransactionError = error.into();
            return Ok(TransactionStatus::Failed(
                RejectionReason::from_transaction_error(&error),
            ));
        }
        if status.satisfies_commitment(self.client.commitment()) {
            Ok(TransactionStatus::Confirmed)
        } else {
            Ok(TransactionStatus::Pending)
        }
    }
}
