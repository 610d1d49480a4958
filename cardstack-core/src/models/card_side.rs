use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two cards in the stack. The front is index 0, the back index 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSide {
    #[default]
    Front,
    Back,
}

impl CardSide {
    pub const ALL: [CardSide; 2] = [CardSide::Front, CardSide::Back];

    pub fn index(self) -> usize {
        match self {
            CardSide::Front => 0,
            CardSide::Back => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(CardSide::Front),
            1 => Some(CardSide::Back),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CardSide::Front => "front",
            CardSide::Back => "back",
        }
    }
}

impl fmt::Display for CardSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCardSideError(String);

impl fmt::Display for ParseCardSideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid card side: '{}'. Valid values: front, back",
            self.0
        )
    }
}

impl std::error::Error for ParseCardSideError {}

impl FromStr for CardSide {
    type Err = ParseCardSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "front" | "0" => Ok(CardSide::Front),
            "back" | "1" => Ok(CardSide::Back),
            _ => Err(ParseCardSideError(s.to_string())),
        }
    }
}
