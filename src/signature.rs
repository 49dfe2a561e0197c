use crate::public_key::decode_hex_array;
use crate::PublicKey;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

pub const SIGNATURE_BYTE_COUNT: usize = 64;

/// The 32-byte seed of an Ed25519 signing key.
pub type SecretKey = ed25519_dalek::SecretKey;

/// An Ed25519 signature over the signing payload of one transaction input.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Signature([u8; SIGNATURE_BYTE_COUNT]);

impl Signature {
    pub const fn new(bytes: [u8; SIGNATURE_BYTE_COUNT]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_BYTE_COUNT] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, String> {
        decode_hex_array(s).map(Self)
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Signature::from_hex(&s).map_err(D::Error::custom)
    }
}

/// Returns whether `signature` is an authentic signature of `message` by `public_key`.
/// Keys that are not valid curve points never verify.
pub fn verify_signature(public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    let verifying_key = match VerifyingKey::from_bytes(public_key.as_bytes()) {
        Ok(key) => key,
        Err(_) => return false,
    };
    let signature = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
    verifying_key.verify_strict(message, &signature).is_ok()
}

pub fn sign(secret_key: &SecretKey, message: &[u8]) -> Signature {
    let signing_key = SigningKey::from_bytes(secret_key);
    Signature(signing_key.sign(message).to_bytes())
}

pub fn public_key_of(secret_key: &SecretKey) -> PublicKey {
    PublicKey::new(SigningKey::from_bytes(secret_key).verifying_key().to_bytes())
}
