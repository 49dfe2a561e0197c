pub mod coin;
pub mod commands;
pub mod epoch_processor;
pub mod hash;
pub mod public_key;
pub mod signature;
pub mod transaction;
pub mod utxo_pool;
pub mod validation;

pub use self::{
    coin::*, epoch_processor::*, hash::*, public_key::*, signature::*, transaction::*,
    utxo_pool::*, validation::*,
};
