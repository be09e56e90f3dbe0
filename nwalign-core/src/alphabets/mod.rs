pub mod dna;
pub mod protein;

use bit_set::BitSet;
use std::borrow::Borrow;

#[derive(Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Alphabet {
    pub symbols: BitSet,
}

impl Alphabet {
    pub fn new<C, T>(symbols: T) -> Self
    where
        C: Borrow<u8>,
        T: IntoIterator<Item = C>,
    {
        let mut s = BitSet::new();
        s.extend(symbols.into_iter().map(|c| *c.borrow() as usize));

        Alphabet { symbols: s }
    }

    /// Alphabet holding every symbol in both ASCII cases.
    pub fn case_insensitive<C, T>(symbols: T) -> Self
    where
        C: Borrow<u8>,
        T: IntoIterator<Item = C>,
    {
        let mut alphabet = Alphabet::default();
        for c in symbols {
            let b = *c.borrow();
            alphabet.insert(b.to_ascii_uppercase());
            alphabet.insert(b.to_ascii_lowercase());
        }
        alphabet
    }

    pub fn insert(&mut self, a: u8) {
        self.symbols.insert(a as usize);
    }

    #[inline]
    pub fn contains(&self, a: u8) -> bool {
        self.symbols.contains(a as usize)
    }

    pub fn is_word<C, T>(&self, text: T) -> bool
    where
        C: Borrow<u8>,
        T: IntoIterator<Item = C>,
    {
        text.into_iter()
            .all(|c| self.symbols.contains(*c.borrow() as usize))
    }

    /// Position and value of the first byte outside the alphabet.
    pub fn first_invalid(&self, text: &[u8]) -> Option<(usize, u8)> {
        text.iter()
            .enumerate()
            .find(|(_, &b)| !self.contains(b))
            .map(|(pos, &b)| (pos, b))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_holds_both_cases() {
        let a = Alphabet::case_insensitive(b"Ac");
        assert!(a.contains(b'A'));
        assert!(a.contains(b'a'));
        assert!(a.contains(b'C'));
        assert!(a.contains(b'c'));
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn first_invalid_reports_leftmost() {
        let a = Alphabet::new(b"ACGT");
        assert_eq!(a.first_invalid(b"ACXTZ"), Some((2, b'X')));
        assert_eq!(a.first_invalid(b"GATTACA"), None);
        assert_eq!(a.first_invalid(b""), None);
    }
}
