use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Kind of expense being declared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Restaurant,
    Hotel,
    Misc,
}

impl ExpenseCategory {
    /// Display label, also the value stored in the database.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Restaurant => "Restaurant",
            Self::Hotel => "Hotel",
            Self::Misc => "Misc",
        }
    }
}

impl core::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<&str> for ExpenseCategory {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "restaurant" => Ok(Self::Restaurant),
            "hotel" => Ok(Self::Hotel),
            "misc" => Ok(Self::Misc),
            _ => Err(EngineError::InvalidArgument(format!(
                "unrecognized expense category: {value}"
            ))),
        }
    }
}
