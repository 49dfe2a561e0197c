use crate::signature::{sign, SecretKey};
use crate::{Coin, CoinTotal, PublicKey, Sha256, Signature};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Input index: {index} is out of range for a transaction with {len} inputs")]
    InputOutOfRange { index: usize, len: usize },
    #[error("Failed to encode transaction data: {0}")]
    Encoding(#[from] bincode::Error),
}

/// A double SHA-256 hash of the transaction data, excluding the input signatures.
#[derive(Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Sha256);

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TransactionId {
    pub const fn new(data: Sha256) -> Self {
        Self(data)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

/// The index of the transaction output, the first one is 0.
#[derive(Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputIndex(u32);

impl Display for OutputIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OutputIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

/// Identifies a transaction output by the transaction that created it and its position.
/// Utxos are ordered by the transaction id first, and then by the output index.
#[derive(Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct Utxo {
    transaction_id: TransactionId,
    output_index: OutputIndex,
}

impl Display for Utxo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.transaction_id, self.output_index)
    }
}

impl Utxo {
    pub const fn new(transaction_id: TransactionId, output_index: OutputIndex) -> Self {
        Self {
            transaction_id,
            output_index,
        }
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    pub fn output_index(&self) -> OutputIndex {
        self.output_index
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    // The transaction output that this input spends.
    utxo: Utxo,
    // Signs the transaction's signing payload at this input's position with the key
    // that owns the spent output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signature: Option<Signature>,
}

impl Display for TransactionInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.utxo)
    }
}

impl TransactionInput {
    /// Creates an unsigned input. It must be signed before the transaction can be valid.
    pub fn new(utxo: Utxo) -> Self {
        Self {
            utxo,
            signature: None,
        }
    }

    pub fn signed(utxo: Utxo, signature: Signature) -> Self {
        Self {
            utxo,
            signature: Some(signature),
        }
    }

    pub fn utxo(&self) -> &Utxo {
        &self.utxo
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutput {
    recipient: PublicKey,
    value: Coin,
}

impl Display for TransactionOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.value, self.recipient)
    }
}

impl TransactionOutput {
    pub fn new(recipient: PublicKey, value: Coin) -> Self {
        Self { recipient, value }
    }

    pub fn recipient(&self) -> &PublicKey {
        &self.recipient
    }

    pub fn value(&self) -> Coin {
        self.value
    }
}

/// The data that identifies a transaction. Signatures are left out because they sign
/// data derived from the same inputs and outputs.
#[derive(Serialize)]
struct HashedData<'a> {
    inputs: Vec<&'a Utxo>,
    outputs: &'a [TransactionOutput],
}

/// The message that the input at a given index signs.
#[derive(Serialize)]
struct SigningPayload<'a> {
    utxo: &'a Utxo,
    outputs: &'a [TransactionOutput],
}

/// The serialized form of the transaction. The id is never stored, it is always recomputed
/// from the content.
#[derive(Serialize, Deserialize)]
struct TransactionBody {
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(into = "TransactionBody", try_from = "TransactionBody")]
pub struct Transaction {
    id: TransactionId,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

impl Transaction {
    pub fn new(
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
    ) -> Result<Self, TransactionError> {
        let id = Self::hash_transaction_data(&inputs, &outputs)?;
        Ok(Self {
            id,
            inputs,
            outputs,
        })
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    pub fn input(&self, index: usize) -> Option<&TransactionInput> {
        self.inputs.get(index)
    }

    pub fn output(&self, index: usize) -> Option<&TransactionOutput> {
        self.outputs.get(index)
    }

    pub fn inputs(&self) -> &[TransactionInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    /// Returns the utxos that this transaction creates, paired with their outputs.
    pub fn created_utxos(&self) -> impl Iterator<Item = (Utxo, &TransactionOutput)> + '_ {
        let id = self.id;
        self.outputs
            .iter()
            .enumerate()
            .map(move |(index, output)| (Utxo::new(id, OutputIndex::new(index as u32)), output))
    }

    pub fn output_value(&self) -> CoinTotal {
        self.outputs.iter().map(TransactionOutput::value).sum()
    }

    /// Returns the message that the input at `index` must sign: the utxo spent by that input
    /// together with all outputs of the transaction.
    pub fn raw_data_to_sign(&self, index: usize) -> Result<Vec<u8>, TransactionError> {
        let input = self
            .inputs
            .get(index)
            .ok_or(TransactionError::InputOutOfRange {
                index,
                len: self.inputs.len(),
            })?;
        let payload = SigningPayload {
            utxo: &input.utxo,
            outputs: &self.outputs,
        };
        Ok(bincode::serialize(&payload)?)
    }

    /// Signs the input at `index`. The transaction id doesn't change.
    pub fn sign_input(
        &mut self,
        index: usize,
        secret_key: &SecretKey,
    ) -> Result<(), TransactionError> {
        let message = self.raw_data_to_sign(index)?;
        self.inputs[index].signature = Some(sign(secret_key, &message));
        Ok(())
    }

    fn hash_transaction_data(
        inputs: &[TransactionInput],
        outputs: &[TransactionOutput],
    ) -> Result<TransactionId, TransactionError> {
        let data = HashedData {
            inputs: inputs.iter().map(TransactionInput::utxo).collect(),
            outputs,
        };
        let encoded = bincode::serialize(&data)?;
        Ok(TransactionId(Sha256::double_digest(&encoded)))
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} inputs, {} outputs)",
            self.id,
            self.inputs.len(),
            self.outputs.len()
        )
    }
}

impl From<Transaction> for TransactionBody {
    fn from(transaction: Transaction) -> Self {
        Self {
            inputs: transaction.inputs,
            outputs: transaction.outputs,
        }
    }
}

impl TryFrom<TransactionBody> for Transaction {
    type Error = TransactionError;

    fn try_from(body: TransactionBody) -> Result<Self, Self::Error> {
        Transaction::new(body.inputs, body.outputs)
    }
}
