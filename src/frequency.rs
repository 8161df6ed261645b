use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Per-byte occurrence counts of one input.
///
/// Iteration is in ascending symbol order, which the tree builder relies on
/// to seed its heap deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<u8, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every byte of `data` in a single pass.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = BTreeMap::new();
        for &byte in data {
            *counts.entry(byte).or_insert(0) += 1;
        }
        FrequencyTable { counts }
    }

    /// Rebuild a table from persisted `(symbol, count)` pairs.
    ///
    /// Rejects duplicate symbols, zero counts and totals that overflow `u64`.
    pub fn from_counts<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u8, u64)>,
    {
        let mut counts = BTreeMap::new();
        let mut total: u64 = 0;
        for (symbol, count) in pairs {
            if count == 0 {
                return Err(Error::malformed(format!(
                    "symbol 0x{symbol:02x} has a zero count"
                )));
            }
            total = total
                .checked_add(count)
                .ok_or_else(|| Error::malformed("symbol counts overflow"))?;
            if counts.insert(symbol, count).is_some() {
                return Err(Error::malformed(format!(
                    "symbol 0x{symbol:02x} appears twice"
                )));
            }
        }
        Ok(FrequencyTable { counts })
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, symbol: u8) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    /// Sum of all counts, i.e. the length of the analyzed input.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_abracadabra() {
        let table = FrequencyTable::from_bytes(b"abracadabra");
        assert_eq!(table.len(), 5);
        assert_eq!(table.get(b'a'), Some(5));
        assert_eq!(table.get(b'b'), Some(2));
        assert_eq!(table.get(b'r'), Some(2));
        assert_eq!(table.get(b'c'), Some(1));
        assert_eq!(table.get(b'd'), Some(1));
        assert_eq!(table.get(b'z'), None);
        assert_eq!(table.total(), 11);
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let table = FrequencyTable::from_bytes(&[]);
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn iterates_in_symbol_order() {
        let table = FrequencyTable::from_bytes(b"zyxzy\n ");
        let symbols: Vec<u8> = table.iter().map(|(s, _)| s).collect();
        assert_eq!(symbols, vec![b'\n', b' ', b'x', b'y', b'z']);
    }

    #[test]
    fn from_counts_matches_counted_table() {
        let counted = FrequencyTable::from_bytes(b"hello world");
        let rebuilt = FrequencyTable::from_counts(counted.iter()).unwrap();
        assert_eq!(counted, rebuilt);
    }

    #[test]
    fn from_counts_rejects_bad_pairs() {
        assert!(FrequencyTable::from_counts([(b'a', 0)]).is_err());
        assert!(FrequencyTable::from_counts([(b'a', 1), (b'a', 2)]).is_err());
        assert!(FrequencyTable::from_counts([(0, u64::MAX), (1, 1)]).is_err());
    }
}
