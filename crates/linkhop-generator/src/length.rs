use std::fmt::Display;

/// Length of a generated short code, always within `4..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodeLength(usize);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("code length must be between 4 and 12, got {got}")]
pub struct InvalidCodeLength {
    pub got: usize,
}

impl CodeLength {
    pub const MIN: usize = 4;
    pub const MAX: usize = 12;
    pub const DEFAULT: CodeLength = CodeLength(7);

    pub fn new(length: usize) -> Result<Self, InvalidCodeLength> {
        if (Self::MIN..=Self::MAX).contains(&length) {
            Ok(Self(length))
        } else {
            Err(InvalidCodeLength { got: length })
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for CodeLength {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for CodeLength {
    type Error = InvalidCodeLength;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Display for CodeLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
