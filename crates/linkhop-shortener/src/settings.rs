use jiff::SignedDuration;
use linkhop_generator::CodeLength;
use std::num::NonZeroU32;
use thiserror::Error;
use typed_builder::TypedBuilder;

/// Number of codes tried before giving up on a single create.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

/// Lifetime of a new link in whole days, always within `1..=3650`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TtlDays(u32);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("ttl days must be between 1 and 3650, got {got}")]
pub struct InvalidTtlDays {
    pub got: u32,
}

impl TtlDays {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 3650;
    pub const DEFAULT: TtlDays = TtlDays(30);

    pub fn new(days: u32) -> Result<Self, InvalidTtlDays> {
        if (Self::MIN..=Self::MAX).contains(&days) {
            Ok(Self(days))
        } else {
            Err(InvalidTtlDays { got: days })
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// UTC days are always 24 hours long.
    pub fn as_duration(self) -> SignedDuration {
        SignedDuration::from_hours(i64::from(self.0) * 24)
    }
}

impl Default for TtlDays {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerSettings {
    #[builder(default)]
    pub code_length: CodeLength,
    #[builder(default)]
    pub ttl_days: TtlDays,
    #[builder(default = NonZeroU32::new(DEFAULT_MAX_ATTEMPTS).unwrap_or(NonZeroU32::MIN))]
    pub max_attempts: NonZeroU32,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}
