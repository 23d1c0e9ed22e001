use rustc_hash::FxHashMap;

/// Symbol counts for one buffer. Only symbols that actually occur are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: FxHashMap<u8, usize>,
}

impl FrequencyTable {
    /// Number of distinct symbols observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Count for a symbol, or None if it never occurred.
    pub fn get(&self, symbol: u8) -> Option<usize> {
        self.counts.get(&symbol).copied()
    }

    /// (symbol, count) pairs in ascending symbol order. The tree builder depends on
    /// this order being stable so repeated runs build the same tree.
    pub fn sorted(&self) -> Vec<(u8, usize)> {
        let mut pairs: Vec<(u8, usize)> = self.counts.iter().map(|(&s, &c)| (s, c)).collect();
        pairs.sort_unstable_by_key(|&(s, _)| s);
        pairs
    }

    /// Sum of all counts, i.e. the length of the buffer that was counted.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Returns a frequency count of the input data.
pub fn freqs(data: &[u8]) -> FrequencyTable {
    // Count into a flat array first, then keep only the symbols that showed up.
    let mut flat = [0_usize; 256];
    data.iter().for_each(|&el| flat[el as usize] += 1);

    let counts = flat
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(sym, &count)| (sym as u8, count))
        .collect();
    FrequencyTable { counts }
}
