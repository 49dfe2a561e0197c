use crate::{EpochProcessor, Transaction, TransactionOutput, Utxo, UtxoPool};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;

/// An output that exists before the first epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisOutput {
    pub utxo: Utxo,
    pub output: TransactionOutput,
}

/// The input of the CLI commands: the genesis outputs and the candidate transactions of
/// every epoch, stored as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerFile {
    pub genesis: Vec<GenesisOutput>,
    #[serde(default)]
    pub epochs: Vec<Vec<Transaction>>,
}

impl LedgerFile {
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read ledger file: {}. Reason: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, Box<dyn Error>> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn genesis_pool(&self) -> UtxoPool {
        self.genesis
            .iter()
            .map(|genesis| (genesis.utxo, genesis.output.clone()))
            .collect()
    }

    /// Returns a processor that has already accepted the first `num_epochs` epochs.
    pub fn processor_after(&self, num_epochs: usize) -> Result<EpochProcessor, String> {
        if num_epochs > self.epochs.len() {
            return Err(format!(
                "Epoch: {} doesn't exist, the ledger has {} epochs",
                num_epochs,
                self.epochs.len()
            ));
        }
        let mut processor = EpochProcessor::new(&self.genesis_pool());
        for candidates in &self.epochs[..num_epochs] {
            processor.accept_epoch(candidates.clone());
        }
        Ok(processor)
    }
}
