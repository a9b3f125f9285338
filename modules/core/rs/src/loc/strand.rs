use std::fmt::Display;

use eyre::{bail, Report, Result};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(i8)]
pub enum Strand {
    /// The forward strand, also known as the positive strand or Watson strand.
    Forward = 1,
    /// The reverse strand, also known as the negative strand or Crick strand.
    Reverse = -1,
}

impl Strand {
    /// Flip the strand from forward to reverse or vice versa.
    pub fn flip(&mut self) -> &mut Self {
        *self = self.flipped();
        self
    }

    /// New strand that is the opposite of the current one.
    pub fn flipped(&self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }

    /// Get the symbolic representation of the strand.
    pub fn symbol(&self) -> char {
        match self {
            Self::Forward => '+',
            Self::Reverse => '-',
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<char> for Strand {
    type Error = Report;

    fn try_from(value: char) -> Result<Self> {
        match value {
            '+' => Ok(Self::Forward),
            '-' => Ok(Self::Reverse),
            _ => bail!("Unknown strand symbol: {value:?}"),
        }
    }
}

impl Default for Strand {
    fn default() -> Self {
        Self::Forward
    }
}

/// Strand signs of the two sequences participating in one alignment.
/// `++`/`--` mean the sequences align on the same strand, `+-`/`-+` mean a
/// reverse-complement relationship.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct StrandPair {
    query: Strand,
    target: Strand,
}

impl StrandPair {
    pub fn new(query: Strand, target: Strand) -> Self {
        Self { query, target }
    }

    pub fn query(&self) -> Strand {
        self.query
    }

    pub fn target(&self) -> Strand {
        self.target
    }

    pub fn is_same_strand(&self) -> bool {
        self.query == self.target
    }
}

impl Display for StrandPair {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.query.symbol(), self.target.symbol())
    }
}

impl TryFrom<&str> for StrandPair {
    type Error = Report;

    /// Parse a 1- or 2-character strand field. A single sign applies to both
    /// sequences so that the pair is never ambiguous.
    fn try_from(value: &str) -> Result<Self> {
        let mut symbols = value.chars();
        match (symbols.next(), symbols.next(), symbols.next()) {
            (Some(single), None, _) => {
                let strand = single.try_into()?;
                Ok(Self::new(strand, strand))
            }
            (Some(query), Some(target), None) => {
                Ok(Self::new(query.try_into()?, target.try_into()?))
            }
            _ => bail!("Invalid strand field: {value:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_flip() {
        assert_eq!(*Strand::Forward.flip(), Strand::Reverse);
        assert_eq!(*Strand::Reverse.flip(), Strand::Forward);
    }

    #[test]
    fn test_strand_symbol() {
        assert_eq!(Strand::Forward.symbol(), '+');
        assert_eq!(Strand::Reverse.symbol(), '-');
    }

    #[test]
    fn test_strand_try_from() {
        assert_eq!(Strand::try_from('+').unwrap(), Strand::Forward);
        assert_eq!(Strand::try_from('-').unwrap(), Strand::Reverse);
        assert!(Strand::try_from('x').is_err());
    }

    #[test]
    fn test_strand_pair_mirroring() {
        for (field, query, target) in [
            ("+", Strand::Forward, Strand::Forward),
            ("-", Strand::Reverse, Strand::Reverse),
            ("++", Strand::Forward, Strand::Forward),
            ("+-", Strand::Forward, Strand::Reverse),
            ("-+", Strand::Reverse, Strand::Forward),
            ("--", Strand::Reverse, Strand::Reverse),
        ] {
            let pair = StrandPair::try_from(field).unwrap();
            assert_eq!(pair.query(), query);
            assert_eq!(pair.target(), target);
        }

        for field in ["", "x", "+x", "+-+"] {
            assert!(StrandPair::try_from(field).is_err(), "Field: {field:?}");
        }
    }

    #[test]
    fn test_strand_pair_same_strand() {
        assert!(StrandPair::try_from("++").unwrap().is_same_strand());
        assert!(StrandPair::try_from("--").unwrap().is_same_strand());
        assert!(!StrandPair::try_from("+-").unwrap().is_same_strand());
        assert!(!StrandPair::try_from("-+").unwrap().is_same_strand());
    }

    #[test]
    fn test_strand_pair_display() {
        assert_eq!(StrandPair::try_from("+").unwrap().to_string(), "++");
        assert_eq!(StrandPair::try_from("+-").unwrap().to_string(), "+-");
    }

    #[test]
    fn test_strand_pair_default() {
        assert_eq!(StrandPair::default().to_string(), "++");
    }
}
