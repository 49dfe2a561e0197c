use crate::{CoinTotal, PublicKey, TransactionOutput, Utxo};
use std::collections::{BTreeMap, HashMap};
use std::iter::FromIterator;
use thiserror::Error;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum UtxoPoolError {
    #[error("Utxo: {0} is not in the pool")]
    NotFound(Utxo),
}

/// A pool of unspent transaction outputs, indexed by the transaction that created them and
/// their index in that transaction.
/// Cloning the pool produces an independent snapshot.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct UtxoPool {
    utxos: HashMap<Utxo, TransactionOutput>,
}

impl UtxoPool {
    pub fn new() -> Self {
        Self {
            utxos: HashMap::new(),
        }
    }

    pub fn contains(&self, utxo: &Utxo) -> bool {
        self.utxos.contains_key(utxo)
    }

    pub fn get(&self, utxo: &Utxo) -> Result<&TransactionOutput, UtxoPoolError> {
        self.utxos
            .get(utxo)
            .ok_or(UtxoPoolError::NotFound(*utxo))
    }

    /// Inserts the output, replacing any output previously stored under the same utxo.
    pub fn add(&mut self, utxo: Utxo, output: TransactionOutput) {
        self.utxos.insert(utxo, output);
    }

    /// Removes the utxo from the pool and returns its output.
    /// Callers are expected to check that the utxo exists first.
    pub fn remove(&mut self, utxo: &Utxo) -> Option<TransactionOutput> {
        self.utxos.remove(utxo)
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Returns all utxos in the pool in ascending order.
    pub fn all_utxos(&self) -> Vec<Utxo> {
        let mut utxos: Vec<Utxo> = self.utxos.keys().copied().collect();
        utxos.sort();
        utxos
    }

    pub fn total_value(&self) -> CoinTotal {
        self.utxos.values().map(TransactionOutput::value).sum()
    }

    /// Sums the unspent outputs per recipient.
    pub fn balances(&self) -> BTreeMap<PublicKey, CoinTotal> {
        let mut balances = BTreeMap::new();
        for output in self.utxos.values() {
            let balance = balances
                .entry(*output.recipient())
                .or_insert_with(CoinTotal::zero);
            *balance = *balance + output.value();
        }
        balances
    }
}

impl FromIterator<(Utxo, TransactionOutput)> for UtxoPool {
    fn from_iter<I: IntoIterator<Item = (Utxo, TransactionOutput)>>(iter: I) -> Self {
        Self {
            utxos: iter.into_iter().collect(),
        }
    }
}
