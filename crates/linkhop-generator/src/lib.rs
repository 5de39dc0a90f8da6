mod base62;
mod length;

pub use base62::{Base62Generator, ALPHABET};
pub use length::{CodeLength, InvalidCodeLength};

use linkhop_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// Uniqueness is not guaranteed; callers resolve collisions against the store.
pub trait Generator: Send + Sync + 'static {
    /// Generates a code of exactly `length` characters.
    fn generate(&self, length: CodeLength) -> ShortCode;
}

impl<G: Generator + ?Sized> Generator for std::sync::Arc<G> {
    fn generate(&self, length: CodeLength) -> ShortCode {
        (**self).generate(length)
    }
}
