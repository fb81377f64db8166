use std::collections::BTreeMap;

/// Occurrence counts for every byte value present in an input.
///
/// Bytes that never occur have no entry. Iteration is in ascending byte order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<u8, u64>,
}

impl FrequencyTable {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut histogram = [0u64; 256];
        for &byte in bytes {
            histogram[byte as usize] += 1;
        }

        let counts = histogram
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(byte, &count)| (byte as u8, count))
            .collect();

        FrequencyTable { counts }
    }

    pub fn get(&self, byte: u8) -> Option<u64> {
        self.counts.get(&byte).copied()
    }

    /// Number of distinct byte values.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, equal to the input length.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().map(|(&byte, &count)| (byte, count))
    }
}

impl FromIterator<(u8, u64)> for FrequencyTable {
    /// Builds a table from explicit counts. Zero counts are dropped and
    /// repeated bytes accumulate.
    fn from_iter<I: IntoIterator<Item = (u8, u64)>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        for (byte, count) in iter.into_iter().filter(|&(_, count)| count > 0) {
            *counts.entry(byte).or_insert(0) += count;
        }
        FrequencyTable { counts }
    }
}
