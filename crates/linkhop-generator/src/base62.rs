use crate::{CodeLength, Generator};
use linkhop_core::ShortCode;
use rand::RngCore;

/// Characters a generated code is drawn from: digits, lowercase, uppercase.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Random code generator backed by the thread-local CSPRNG.
///
/// Each output character comes from one random byte reduced modulo 62. The
/// reduction is slightly biased towards the first 8 characters of [`ALPHABET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Base62Generator;

impl Base62Generator {
    pub fn new() -> Self {
        Self
    }

    /// Maps every byte onto [`ALPHABET`].
    pub fn encode(bytes: &[u8]) -> String {
        bytes
            .iter()
            .map(|b| ALPHABET[usize::from(*b) % ALPHABET.len()] as char)
            .collect()
    }
}

impl Generator for Base62Generator {
    fn generate(&self, length: CodeLength) -> ShortCode {
        let mut bytes = vec![0u8; length.get()];
        rand::rng().fill_bytes(&mut bytes);
        ShortCode::new_unchecked(Self::encode(&bytes))
    }
}
