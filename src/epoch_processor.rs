use crate::validation::{InvalidTransaction, TransactionValidator};
use crate::{CoinTotal, Transaction, UtxoPool};
use tracing::{debug, info};

/// Processes epochs of candidate transactions against its own copy of the utxo pool.
///
/// Candidates are handled one at a time, in the order given. A valid transaction is committed
/// before the next candidate is validated, so a later transaction may spend the outputs of an
/// earlier one, and the first of two conflicting transactions wins.
/// An epoch must finish before the next one starts. Callers that share a processor between
/// threads must hold a lock for the whole `accept_epoch` call.
pub struct EpochProcessor {
    utxo_pool: UtxoPool,
    epoch: u64,
}

impl EpochProcessor {
    /// Creates a processor from a copy of `utxo_pool`. The given pool is never modified.
    pub fn new(utxo_pool: &UtxoPool) -> Self {
        Self {
            utxo_pool: utxo_pool.clone(),
            epoch: 0,
        }
    }

    pub fn utxo_pool(&self) -> &UtxoPool {
        &self.utxo_pool
    }

    pub fn into_utxo_pool(self) -> UtxoPool {
        self.utxo_pool
    }

    /// Returns the number of epochs processed so far.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_valid(&self, transaction: &Transaction) -> bool {
        TransactionValidator::is_valid(&self.utxo_pool, transaction)
    }

    pub fn validate(&self, transaction: &Transaction) -> Result<(), InvalidTransaction> {
        TransactionValidator::validate(&self.utxo_pool, transaction)
    }

    /// Accepts the valid transactions among `candidates`, in the order they are given, and
    /// updates the pool. Invalid transactions are dropped.
    pub fn accept_epoch(&mut self, candidates: Vec<Transaction>) -> Vec<Transaction> {
        self.epoch += 1;
        let num_candidates = candidates.len();
        let mut accepted = Vec::with_capacity(num_candidates);
        let mut fees = CoinTotal::zero();

        for transaction in candidates {
            match TransactionValidator::fee(&self.utxo_pool, &transaction) {
                Ok(fee) => fees = fees + fee,
                Err(reason) => {
                    debug!(
                        epoch = self.epoch,
                        transaction = %transaction.id(),
                        %reason,
                        "Rejected transaction"
                    );
                    continue;
                }
            }
            self.commit(&transaction);
            accepted.push(transaction);
        }

        info!(
            epoch = self.epoch,
            candidates = num_candidates,
            accepted = accepted.len(),
            rejected = num_candidates - accepted.len(),
            fees = %fees,
            utxos = self.utxo_pool.len(),
            "Processed epoch"
        );
        accepted
    }

    // Must only be called for a transaction that has just been validated against the pool.
    fn commit(&mut self, transaction: &Transaction) {
        for input in transaction.inputs() {
            self.utxo_pool.remove(input.utxo());
        }
        for (utxo, output) in transaction.created_utxos() {
            self.utxo_pool.add(utxo, output.clone());
        }
    }
}

/// Returns the value that left the pool between two snapshots, i.e. the fees paid by the
/// transactions accepted in between.
pub fn burned_value(before: &UtxoPool, after: &UtxoPool) -> CoinTotal {
    before.total_value() - after.total_value()
}
