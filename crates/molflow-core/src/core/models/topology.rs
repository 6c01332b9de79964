use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum BondOrder {
    #[default]
    Single = 1,
    Double = 2,
    Triple = 3,
}

impl BondOrder {
    /// Number of line segments this order is drawn with.
    pub fn multiplicity(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid bond order: {0}")]
pub struct ParseBondOrderError(String);

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "-" | "s" | "single" => Ok(Self::Single),
            "2" | "=" | "d" | "double" => Ok(Self::Double),
            "3" | "#" | "t" | "triple" => Ok(Self::Triple),
            _ => Err(ParseBondOrderError(s.to_string())),
        }
    }
}

impl TryFrom<u8> for BondOrder {
    type Error = ParseBondOrderError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Single),
            2 => Ok(Self::Double),
            3 => Ok(Self::Triple),
            other => Err(ParseBondOrderError(other.to_string())),
        }
    }
}

impl From<BondOrder> for u8 {
    fn from(order: BondOrder) -> Self {
        order as u8
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Single => "Single",
                Self::Double => "Double",
                Self::Triple => "Triple",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bond {
    pub from: usize, // index of the first atom
    pub to: usize,   // index of the second atom
    pub order: BondOrder,
}

impl Bond {
    pub fn new(from: usize, to: usize, order: BondOrder) -> Self {
        Self { from, to, order }
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.from == atom || self.to == atom
    }

    /// Returns the atom at the opposite end of the bond, if `atom` is one of its ends.
    pub fn partner(&self, atom: usize) -> Option<usize> {
        if self.from == atom {
            Some(self.to)
        } else if self.to == atom {
            Some(self.from)
        } else {
            None
        }
    }

    /// Whether both bonds join the same pair of atoms, in either direction.
    pub fn joins_same_pair(&self, other: &Bond) -> bool {
        (self.from == other.from && self.to == other.to)
            || (self.from == other.to && self.to == other.from)
    }
}
