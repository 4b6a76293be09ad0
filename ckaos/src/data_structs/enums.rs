use std::fmt::Display;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

use crate::error::KaosError;

#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord)]
pub enum Nucleotide {
    A,
    C,
    G,
    T,
}

impl Nucleotide {
    pub const ALL: [Nucleotide; 4] =
        [Nucleotide::A, Nucleotide::C, Nucleotide::G, Nucleotide::T];

    /// Corner of the CGR square the chaos game moves toward, as `(x, y)`.
    pub fn corner(self) -> (i8, i8) {
        match self {
            Nucleotide::A => (-1, 1),
            Nucleotide::C => (1, -1),
            Nucleotide::G => (-1, -1),
            Nucleotide::T => (1, 1),
        }
    }

    pub fn is_gc(self) -> bool {
        matches!(self, Nucleotide::C | Nucleotide::G)
    }

    pub fn try_from_char(
        symbol: char,
        position: usize,
    ) -> Result<Self, KaosError> {
        match symbol.to_ascii_uppercase() {
            'A' => Ok(Nucleotide::A),
            'C' => Ok(Nucleotide::C),
            'G' => Ok(Nucleotide::G),
            'T' => Ok(Nucleotide::T),
            _ => Err(KaosError::InvalidAlphabet { symbol, position }),
        }
    }
}

impl TryFrom<char> for Nucleotide {
    type Error = KaosError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Nucleotide::try_from_char(value, 0)
    }
}

impl TryFrom<u8> for Nucleotide {
    type Error = KaosError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Nucleotide::try_from_char(value as char, 0)
    }
}

impl From<Nucleotide> for char {
    fn from(value: Nucleotide) -> Self {
        match value {
            Nucleotide::A => 'A',
            Nucleotide::C => 'C',
            Nucleotide::G => 'G',
            Nucleotide::T => 'T',
        }
    }
}

impl FromStr for Nucleotide {
    type Err = KaosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => Nucleotide::try_from(symbol),
            _ => {
                Err(KaosError::malformed(format!(
                    "expected a single nucleotide, got {:?}",
                    s
                )))
            },
        }
    }
}

impl Display for Nucleotide {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

impl Serialize for Nucleotide {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Nucleotide {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        std::str::FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}
