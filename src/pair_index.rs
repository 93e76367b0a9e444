//! Key lookup for object nodes.
//!
//! A separately chained hash table whose bucket counts walk a fixed schedule of primes.
//! Entries remember the key's span rather than the key itself, so lookups compare
//! against the document text and nothing is copied.

use smallvec::SmallVec;
use xson_lexer::Span;

use crate::error::AllocError;
use crate::node::NodeId;

/// Bucket counts, each roughly double the one before.
const PRIMES: [usize; 32] = [
    11, 17, 23, 29, 37, 47, 53, 97, 193, 389, 769, 1543, 3079, 6151, 12289, 24593, 49157,
    98317, 196613, 393241, 786433, 1572869, 3145739, 6291469, 12582917, 25165843, 50331653,
    100663319, 201326611, 402653189, 805306457, 1610612741,
];

/// Grow once the number of entries would exceed this fraction of the bucket count.
const MAX_LOAD_FACTOR: f64 = 0.7;

/// Multiplicative string hash over the raw key bytes.
pub(crate) fn hash_key(key: &[u8]) -> u32 {
    key.iter()
        .fold(0u32, |hash, &b| hash.wrapping_mul(131).wrapping_add(b as u32))
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    hash: u32,
    key: Span,
    pair: NodeId,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PairIndex {
    buckets: Vec<SmallVec<[Entry; 2]>>,
    /// Position of `buckets.len()` in `PRIMES`. Meaningless while `buckets` is empty.
    prime: usize,
    len: usize,
}

impl PairIndex {
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Indexes `pair` under the key at `key` in `text`.
    ///
    /// If the key is already present the new pair takes over its slot and the pair it
    /// displaced is returned.
    pub(crate) fn insert(
        &mut self,
        text: &[u8],
        key: Span,
        pair: NodeId,
    ) -> Result<Option<NodeId>, AllocError> {
        let key_bytes = &text[key.start..key.end];
        let hash = hash_key(key_bytes);

        let bucket_count = self.buckets.len();
        if bucket_count != 0 {
            let bucket = &mut self.buckets[hash as usize % bucket_count];
            if let Some(entry) = bucket
                .iter_mut()
                .find(|e| e.hash == hash && &text[e.key.start..e.key.end] == key_bytes)
            {
                let previous = entry.pair;
                entry.key = key;
                entry.pair = pair;
                return Ok(Some(previous));
            }
        }

        self.reserve_for(self.len + 1)?;
        let bucket_count = self.buckets.len();
        let bucket = &mut self.buckets[hash as usize % bucket_count];
        bucket.try_reserve(1)?;
        bucket.push(Entry { hash, key, pair });
        self.len += 1;
        Ok(None)
    }

    pub(crate) fn get(&self, text: &[u8], key: &[u8]) -> Option<NodeId> {
        if self.buckets.is_empty() {
            return None;
        }
        let hash = hash_key(key);
        self.buckets[hash as usize % self.buckets.len()]
            .iter()
            .find(|e| e.hash == hash && &text[e.key.start..e.key.end] == key)
            .map(|e| e.pair)
    }

    /// Makes sure `required` entries fit under the load factor, rehashing into the next
    /// large enough prime if they don't. At the end of the schedule the table just keeps
    /// chaining.
    fn reserve_for(&mut self, required: usize) -> Result<(), AllocError> {
        let fits = |prime: usize| PRIMES[prime] as f64 * MAX_LOAD_FACTOR >= required as f64;

        if self.buckets.is_empty() {
            let mut prime = 0;
            while !fits(prime) && prime + 1 < PRIMES.len() {
                prime += 1;
            }
            self.buckets = new_buckets(PRIMES[prime])?;
            self.prime = prime;
            return Ok(());
        }

        if fits(self.prime) || self.prime + 1 == PRIMES.len() {
            return Ok(());
        }
        let mut prime = self.prime + 1;
        while !fits(prime) && prime + 1 < PRIMES.len() {
            prime += 1;
        }

        let mut buckets = new_buckets(PRIMES[prime])?;
        for entry in self.buckets.iter().flat_map(|bucket| bucket.iter()) {
            let bucket = &mut buckets[entry.hash as usize % PRIMES[prime]];
            bucket.try_reserve(1)?;
            bucket.push(*entry);
        }
        log::trace!(
            "pair index grew from {} to {} buckets ({} entries)",
            self.buckets.len(),
            buckets.len(),
            self.len
        );
        self.buckets = buckets;
        self.prime = prime;
        Ok(())
    }
}

fn new_buckets(count: usize) -> Result<Vec<SmallVec<[Entry; 2]>>, AllocError> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(count)?;
    buckets.resize_with(count, SmallVec::new);
    Ok(buckets)
}
