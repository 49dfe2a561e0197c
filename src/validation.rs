use crate::signature::verify_signature;
use crate::utxo_pool::UtxoPoolError;
use crate::{Coin, CoinTotal, Transaction, Utxo, UtxoPool};
use std::collections::HashSet;
use thiserror::Error;

/// The reason why a transaction can't be accepted against a utxo pool.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum InvalidTransaction {
    #[error("Claimed utxo: {0} is not in the pool")]
    MissingUtxo(Utxo),
    #[error("Signature of input: {input_index} is missing or doesn't verify")]
    BadSignature { input_index: usize },
    #[error("Utxo: {0} is claimed by more than one input")]
    DuplicateClaim(Utxo),
    #[error("Output: {output_index} has a negative value: {value}")]
    NegativeOutput { output_index: usize, value: Coin },
    #[error("Outputs are worth: {output_value} but inputs only: {input_value}")]
    ValueNotConserved {
        input_value: CoinTotal,
        output_value: CoinTotal,
    },
}

impl From<UtxoPoolError> for InvalidTransaction {
    fn from(err: UtxoPoolError) -> Self {
        match err {
            UtxoPoolError::NotFound(utxo) => InvalidTransaction::MissingUtxo(utxo),
        }
    }
}

// Checks whether a transaction can be accepted against a utxo pool.
// The checks run in a fixed order and stop at the first failure. None of them touches the pool.
pub struct TransactionValidator {}

impl TransactionValidator {
    pub fn validate(pool: &UtxoPool, transaction: &Transaction) -> Result<(), InvalidTransaction> {
        Self::validate_claimed_utxos_are_in_pool(pool, transaction)?;
        Self::validate_input_signatures(pool, transaction)?;
        Self::validate_no_utxo_claimed_twice(transaction)?;
        Self::validate_output_values_are_non_negative(transaction)?;
        Self::validate_value_is_conserved(pool, transaction)
    }

    pub fn is_valid(pool: &UtxoPool, transaction: &Transaction) -> bool {
        Self::validate(pool, transaction).is_ok()
    }

    /// Returns the surplus of the input value over the output value of a valid transaction.
    pub fn fee(
        pool: &UtxoPool,
        transaction: &Transaction,
    ) -> Result<CoinTotal, InvalidTransaction> {
        Self::validate(pool, transaction)?;
        Ok(Self::input_value(pool, transaction)? - transaction.output_value())
    }

    fn validate_claimed_utxos_are_in_pool(
        pool: &UtxoPool,
        transaction: &Transaction,
    ) -> Result<(), InvalidTransaction> {
        match transaction
            .inputs()
            .iter()
            .find(|input| !pool.contains(input.utxo()))
        {
            Some(input) => Err(InvalidTransaction::MissingUtxo(*input.utxo())),
            None => Ok(()),
        }
    }

    fn validate_input_signatures(
        pool: &UtxoPool,
        transaction: &Transaction,
    ) -> Result<(), InvalidTransaction> {
        for (input_index, input) in transaction.inputs().iter().enumerate() {
            let bad_signature = InvalidTransaction::BadSignature { input_index };
            // The owner of the spent output is the only one who can sign for it.
            let owner = pool.get(input.utxo())?.recipient();
            let signature = input.signature().ok_or_else(|| bad_signature.clone())?;
            let message = transaction
                .raw_data_to_sign(input_index)
                .map_err(|_| bad_signature.clone())?;
            if !verify_signature(owner, &message, signature) {
                return Err(bad_signature);
            }
        }
        Ok(())
    }

    fn validate_no_utxo_claimed_twice(transaction: &Transaction) -> Result<(), InvalidTransaction> {
        let mut claimed = HashSet::with_capacity(transaction.num_inputs());
        for input in transaction.inputs() {
            if !claimed.insert(input.utxo()) {
                return Err(InvalidTransaction::DuplicateClaim(*input.utxo()));
            }
        }
        Ok(())
    }

    fn validate_output_values_are_non_negative(
        transaction: &Transaction,
    ) -> Result<(), InvalidTransaction> {
        match transaction
            .outputs()
            .iter()
            .enumerate()
            .find(|(_, output)| output.value().is_negative())
        {
            Some((output_index, output)) => Err(InvalidTransaction::NegativeOutput {
                output_index,
                value: output.value(),
            }),
            None => Ok(()),
        }
    }

    fn validate_value_is_conserved(
        pool: &UtxoPool,
        transaction: &Transaction,
    ) -> Result<(), InvalidTransaction> {
        let input_value = Self::input_value(pool, transaction)?;
        let output_value = transaction.output_value();
        if input_value < output_value {
            Err(InvalidTransaction::ValueNotConserved {
                input_value,
                output_value,
            })
        } else {
            Ok(())
        }
    }

    fn input_value(
        pool: &UtxoPool,
        transaction: &Transaction,
    ) -> Result<CoinTotal, InvalidTransaction> {
        let mut total = CoinTotal::zero();
        for input in transaction.inputs() {
            total = total + pool.get(input.utxo())?.value();
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{public_key_of, SecretKey};
    use crate::{
        OutputIndex, PublicKey, Sha256, Signature, TransactionId, TransactionInput,
        TransactionOutput,
    };

    const ALICE: SecretKey = [1; 32];
    const BOB: SecretKey = [2; 32];
    const EVE: SecretKey = [3; 32];

    fn genesis_utxo(index: u32) -> Utxo {
        Utxo::new(
            TransactionId::new(Sha256::digest(b"genesis")),
            OutputIndex::new(index),
        )
    }

    fn output(owner: &SecretKey, value: i64) -> TransactionOutput {
        TransactionOutput::new(public_key_of(owner), Coin::new(value))
    }

    // Alice owns genesis outputs 0 (10 SCR) and 1 (5 SCR).
    fn pool() -> UtxoPool {
        vec![
            (genesis_utxo(0), output(&ALICE, 10)),
            (genesis_utxo(1), output(&ALICE, 5)),
        ]
        .into_iter()
        .collect()
    }

    fn signed(utxos: &[Utxo], outputs: Vec<TransactionOutput>, key: &SecretKey) -> Transaction {
        let inputs = utxos.iter().copied().map(TransactionInput::new).collect();
        let mut transaction = Transaction::new(inputs, outputs).unwrap();
        for index in 0..utxos.len() {
            transaction.sign_input(index, key).unwrap();
        }
        transaction
    }

    #[test]
    fn accepts_exact_spend() {
        let tx = signed(&[genesis_utxo(0)], vec![output(&BOB, 10)], &ALICE);
        assert_eq!(TransactionValidator::validate(&pool(), &tx), Ok(()));
        assert_eq!(TransactionValidator::fee(&pool(), &tx), Ok(CoinTotal::zero()));
    }

    #[test]
    fn accepts_spend_with_fee() {
        let tx = signed(
            &[genesis_utxo(0), genesis_utxo(1)],
            vec![output(&BOB, 6), output(&ALICE, 5)],
            &ALICE,
        );
        assert!(TransactionValidator::is_valid(&pool(), &tx));
        assert_eq!(TransactionValidator::fee(&pool(), &tx), Ok(CoinTotal::new(4)));
    }

    #[test]
    fn accepts_zero_value_output() {
        let tx = signed(&[genesis_utxo(1)], vec![output(&BOB, 0)], &ALICE);
        assert!(TransactionValidator::is_valid(&pool(), &tx));
    }

    #[test]
    fn accepts_transaction_without_outputs() {
        let tx = signed(&[genesis_utxo(1)], vec![], &ALICE);
        assert!(TransactionValidator::is_valid(&pool(), &tx));
    }

    #[test]
    fn accepts_empty_transaction() {
        let tx = Transaction::new(vec![], vec![]).unwrap();
        assert!(TransactionValidator::is_valid(&pool(), &tx));
    }

    #[test]
    fn rejects_missing_utxo() {
        let tx = signed(&[genesis_utxo(7)], vec![output(&BOB, 1)], &ALICE);
        assert_eq!(
            TransactionValidator::validate(&pool(), &tx),
            Err(InvalidTransaction::MissingUtxo(genesis_utxo(7)))
        );
    }

    #[test]
    fn missing_utxo_is_reported_before_bad_signature() {
        // Input 0 is signed by the wrong key and input 1 doesn't exist.
        let tx = signed(
            &[genesis_utxo(0), genesis_utxo(9)],
            vec![output(&BOB, 1)],
            &EVE,
        );
        assert_eq!(
            TransactionValidator::validate(&pool(), &tx),
            Err(InvalidTransaction::MissingUtxo(genesis_utxo(9)))
        );
    }

    #[test]
    fn rejects_signature_from_other_key() {
        let tx = signed(&[genesis_utxo(0)], vec![output(&EVE, 10)], &EVE);
        assert_eq!(
            TransactionValidator::validate(&pool(), &tx),
            Err(InvalidTransaction::BadSignature { input_index: 0 })
        );
    }

    #[test]
    fn rejects_bad_signature_on_later_input() {
        let mut tx = Transaction::new(
            vec![
                TransactionInput::new(genesis_utxo(0)),
                TransactionInput::new(genesis_utxo(1)),
            ],
            vec![output(&BOB, 15)],
        )
        .unwrap();
        tx.sign_input(0, &ALICE).unwrap();
        tx.sign_input(1, &EVE).unwrap();
        assert_eq!(
            TransactionValidator::validate(&pool(), &tx),
            Err(InvalidTransaction::BadSignature { input_index: 1 })
        );
    }

    #[test]
    fn rejects_unsigned_input() {
        let tx = Transaction::new(
            vec![TransactionInput::new(genesis_utxo(0))],
            vec![output(&BOB, 10)],
        )
        .unwrap();
        assert_eq!(
            TransactionValidator::validate(&pool(), &tx),
            Err(InvalidTransaction::BadSignature { input_index: 0 })
        );
    }

    #[test]
    fn rejects_signature_copied_from_other_transaction() {
        let original = signed(&[genesis_utxo(0)], vec![output(&BOB, 10)], &ALICE);
        let signature = *original.input(0).unwrap().signature().unwrap();
        let forged = Transaction::new(
            vec![TransactionInput::signed(genesis_utxo(0), signature)],
            vec![output(&EVE, 10)],
        )
        .unwrap();
        assert_eq!(
            TransactionValidator::validate(&pool(), &forged),
            Err(InvalidTransaction::BadSignature { input_index: 0 })
        );
    }

    #[test]
    fn rejects_garbage_signature_and_key() {
        let mut pool = pool();
        pool.add(
            genesis_utxo(2),
            TransactionOutput::new(PublicKey::new([0xff; 32]), Coin::new(3)),
        );
        let tx = Transaction::new(
            vec![TransactionInput::signed(genesis_utxo(2), Signature::new([0xff; 64]))],
            vec![output(&BOB, 3)],
        )
        .unwrap();
        assert!(!TransactionValidator::is_valid(&pool, &tx));
    }

    #[test]
    fn rejects_utxo_claimed_twice() {
        let tx = signed(
            &[genesis_utxo(1), genesis_utxo(1)],
            vec![output(&BOB, 10)],
            &ALICE,
        );
        assert_eq!(
            TransactionValidator::validate(&pool(), &tx),
            Err(InvalidTransaction::DuplicateClaim(genesis_utxo(1)))
        );
    }

    #[test]
    fn rejects_negative_output() {
        // The negative output would otherwise let Bob receive more than Alice spends.
        let tx = signed(
            &[genesis_utxo(1)],
            vec![output(&BOB, 8), output(&ALICE, -3)],
            &ALICE,
        );
        assert_eq!(
            TransactionValidator::validate(&pool(), &tx),
            Err(InvalidTransaction::NegativeOutput {
                output_index: 1,
                value: Coin::new(-3),
            })
        );
    }

    #[test]
    fn rejects_value_creation() {
        let tx = signed(&[genesis_utxo(1)], vec![output(&BOB, 6)], &ALICE);
        assert_eq!(
            TransactionValidator::validate(&pool(), &tx),
            Err(InvalidTransaction::ValueNotConserved {
                input_value: CoinTotal::new(5),
                output_value: CoinTotal::new(6),
            })
        );
        assert!(TransactionValidator::fee(&pool(), &tx).is_err());
    }

    #[test]
    fn large_outputs_do_not_overflow() {
        let tx = signed(
            &[genesis_utxo(0)],
            vec![output(&BOB, i64::MAX), output(&BOB, i64::MAX)],
            &ALICE,
        );
        assert!(matches!(
            TransactionValidator::validate(&pool(), &tx),
            Err(InvalidTransaction::ValueNotConserved { .. })
        ));
    }

    #[test]
    fn validation_is_repeatable_and_leaves_pool_alone() {
        let pool = pool();
        let before = pool.clone();
        let tx = signed(&[genesis_utxo(0)], vec![output(&BOB, 10)], &ALICE);
        let first = TransactionValidator::validate(&pool, &tx);
        let second = TransactionValidator::validate(&pool, &tx);
        assert_eq!(first, second);
        assert_eq!(pool, before);
    }
}
