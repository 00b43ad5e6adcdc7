use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

/// 256-bit bloom filter over lowercased header keys.
///
/// Populated once per request head and consulted by
/// [`Request::header`](crate::Request::header) to skip the linear slot
/// scan for keys that are definitely absent. False positives only cost
/// the scan they were supposed to save.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct BloomFilter {
    bits: [u64; 4],
}

impl BloomFilter {
    #[inline(always)]
    pub(crate) fn add(&mut self, key: &[u8]) {
        let h = hash(key);
        for probe in probes(h) {
            self.bits[(probe >> 6) as usize] |= 1u64 << (probe & 63);
        }
    }

    #[inline(always)]
    pub(crate) fn might_have(&self, key: &[u8]) -> bool {
        let h = hash(key);
        probes(h).iter().all(|&probe| {
            self.bits[(probe >> 6) as usize] & (1u64 << (probe & 63)) != 0
        })
    }
}

#[inline(always)]
fn hash(key: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write(key);
    hasher.finish()
}

// Three independent 8-bit probes carved out of one 64-bit hash.
#[inline(always)]
fn probes(h: u64) -> [u8; 3] {
    [h as u8, (h >> 8) as u8, (h >> 16) as u8]
}
