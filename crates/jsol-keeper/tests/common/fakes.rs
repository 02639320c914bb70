//! In-memory chain fakes.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use jsol_keeper::{ChainError, ChainReader, ChainWriter, Clock, TransactionStatus};
use solana_instruction::Instruction;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signature::Signature;

pub fn signature(byte: u8) -> Signature {
    Signature::from([byte; 64])
}

// ============================================================================
// Reader
// ============================================================================

/// Serves scripted account data. Unknown addresses do not exist.
#[derive(Default)]
pub struct FakeReader {
    accounts: Mutex<HashMap<Pubkey, Result<Vec<u8>, ChainError>>>,
    delay: Mutex<Option<Duration>>,
    reads: AtomicUsize,
}

impl FakeReader {
    pub fn set_account(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts.lock().unwrap().insert(address, Ok(data));
    }

    pub fn fail_account(&self, address: Pubkey, error: ChainError) {
        self.accounts.lock().unwrap().insert(address, Err(error));
    }

    /// Delay every read, to exercise the request timeout.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ChainReader for FakeReader {
    async fn get_account_bytes(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, ChainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.accounts.lock().unwrap().get(address) {
            Some(Ok(data)) => Ok(Some(data.clone())),
            Some(Err(error)) => Err(error.clone()),
            None => Ok(None),
        }
    }
}

// ============================================================================
// Writer
// ============================================================================

/// Records submissions and replays scripted results.
///
/// Submissions succeed with [`signature`]`(9)` unless scripted otherwise.
/// Status checks report `Pending` once the script runs out.
#[derive(Default)]
pub struct FakeWriter {
    submit_results: Mutex<VecDeque<Result<Signature, ChainError>>>,
    statuses: Mutex<VecDeque<Result<TransactionStatus, ChainError>>>,
    submit_delay: Mutex<Duration>,
    submitted: Mutex<Vec<Instruction>>,
    signers: Mutex<Vec<Pubkey>>,
    status_checks: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeWriter {
    pub fn push_submit(&self, result: Result<Signature, ChainError>) {
        self.submit_results.lock().unwrap().push_back(result);
    }

    pub fn push_status(&self, status: Result<TransactionStatus, ChainError>) {
        self.statuses.lock().unwrap().push_back(status);
    }

    pub fn set_submit_delay(&self, delay: Duration) {
        *self.submit_delay.lock().unwrap() = delay;
    }

    pub fn submitted(&self) -> Vec<Instruction> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn signers(&self) -> Vec<Pubkey> {
        self.signers.lock().unwrap().clone()
    }

    pub fn status_checks(&self) -> usize {
        self.status_checks.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl ChainWriter for FakeWriter {
    async fn submit_instruction(
        &self,
        instruction: Instruction,
        signer: &Keypair,
    ) -> Result<Signature, ChainError> {
        use solana_signer::Signer;

        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        let delay = *self.submit_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.submitted.lock().unwrap().push(instruction);
        self.signers.lock().unwrap().push(signer.pubkey());
        let result = self
            .submit_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(signature(9)));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn get_transaction_status(
        &self,
        _signature: &Signature,
    ) -> Result<TransactionStatus, ChainError> {
        self.status_checks.fetch_add(1, Ordering::SeqCst);
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(TransactionStatus::Pending))
    }
}

// ============================================================================
// Clock
// ============================================================================

/// Settable unix clock.
pub struct FakeClock(AtomicI64);

impl FakeClock {
    pub fn at(now: i64) -> Self {
        Self(AtomicI64::new(now))
    }

    pub fn set(&self, now: i64) {
        self.0.store(now, Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}
