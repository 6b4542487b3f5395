//! BloomFilter implementation.
use std::fmt;

use fixedbitset::FixedBitSet;
use tracing::{debug, trace, warn};

use crate::config::BloomConfig;
use crate::error::{Error, Result};
use crate::filters::Filter;
use crate::hash_utils::{DigestHasher, Probes, SeededHasher};
use crate::sizing::{calculate_hash_count, calculate_space, estimate_fp_rate};

/// A BloomFilter is a set-like data structure, that keeps track of elements it has seen without
/// the need to store them. Looking up values has a certain false positive rate, but a false
/// negative rate of 0%.
///
/// # Examples
/// ```
/// use simplebloom::filters::bloomfilter::BloomFilter;
///
/// // set up filter
/// let error_rate = 0.001;  // = 0.1%
/// let capacity = 1000;
/// let mut filter = BloomFilter::new(capacity, error_rate).unwrap();
/// assert_eq!(filter.bit_count(), 14378);
///
/// // add some data
/// filter.add("my super long string").unwrap();
///
/// // later
/// assert!(filter.contains("my super long string").unwrap());
/// assert_eq!(filter.count(), 1);
/// ```
///
/// # How It Works
/// The filter is represented by a bit vector of size `m`. Given a hash function `h(x, seed)`,
/// `k` positions `h(x, i) mod m, for i in 0..k` are derived for every element `x`. Initially,
/// all bits are unset.
///
/// During insertion of value `x`, the `k` bits addressed by these positions are set.
///
/// During lookup, it is checked if all these bits are set. If so, the value might be in the
/// filter. If only a single bit is not set, it is clear that the value was never added to the
/// filter.
///
/// Elements are hashed by their byte representation (`AsRef<[u8]>`), e.g. `&str`, `String`,
/// `&[u8]` or `Vec<u8>`. Integers and other values must be turned into bytes first, for example
/// with `to_string()` or `to_le_bytes()`.
///
/// `m` and `k` are derived from the expected number of elements and the target false positive
/// rate (see [`sizing`](crate::sizing)) and never change. Bits are never unset, there is no
/// deletion.
///
/// # Concurrency
/// Mutation requires `&mut self`. To share a filter between threads, wrap it into a `Mutex` or
/// `RwLock`.
///
/// # References
/// - ["Space/Time Trade-offs in Hash Coding with Allowable Errors", Burton H. Bloom, 1970](http://dmod.eu/deca/ft_gateway.cfm.pdf)
/// - [Wikipedia: Bloom filter](https://en.wikipedia.org/wiki/Bloom_filter)
#[derive(Clone)]
pub struct BloomFilter<H = DigestHasher>
where
    H: SeededHasher,
{
    bs: FixedBitSet,
    k: usize,
    n: usize,
    capacity: usize,
    error_rate: f64,
    hasher: H,
}

impl BloomFilter {
    /// Create new, empty BloomFilter with given properties, using the default [`DigestHasher`].
    ///
    /// - `capacity` number of elements the BloomFilter is expected to hold, must be `> 0`
    /// - `error_rate` false positive rate when querying the BloomFilter after adding
    ///   `capacity` elements, must be `> 0` and `< 1`
    ///
    /// Returns [`Error::InvalidArgument`] if the parameters are not in range.
    pub fn new(capacity: usize, error_rate: f64) -> Result<Self> {
        Self::with_hasher(capacity, error_rate, DigestHasher::default())
    }

    /// Same as `new` but reads the properties from `config`.
    pub fn from_config(config: &BloomConfig) -> Result<Self> {
        Self::new(config.capacity, config.error_rate)
    }
}

impl<H> BloomFilter<H>
where
    H: SeededHasher,
{
    /// Same as `new` but with specific hash strategy.
    pub fn with_hasher(capacity: usize, error_rate: f64, hasher: H) -> Result<Self> {
        let m = calculate_space(capacity, error_rate)?;
        let k = calculate_hash_count(capacity, m)?;
        debug!(capacity, error_rate, m, k, "created BloomFilter");

        Ok(Self {
            bs: FixedBitSet::with_capacity(m),
            k,
            n: 0,
            capacity,
            error_rate,
            hasher,
        })
    }

    /// Same as `from_config` but with specific hash strategy.
    pub fn from_config_and_hasher(config: &BloomConfig, hasher: H) -> Result<Self> {
        Self::with_hasher(config.capacity, config.error_rate, hasher)
    }

    /// Number of elements this filter was sized for.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Target false positive rate at `capacity` elements.
    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Get `m` (number of stored bits).
    pub fn bit_count(&self) -> usize {
        self.bs.len()
    }

    /// Get `k` (number of hash rounds).
    pub fn hash_rounds(&self) -> usize {
        self.k
    }

    /// Get hash strategy.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Number of `add` calls so far, duplicates included.
    pub fn count(&self) -> usize {
        self.n
    }

    /// Check whether nothing was added to the BloomFilter yet.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Number of set bits.
    pub fn ones(&self) -> usize {
        self.bs.count_ones(..)
    }

    fn probes<'a>(&'a self, element: &'a [u8]) -> Probes<'a, 'a, H> {
        Probes::new(self.bs.len(), self.k, element, &self.hasher)
    }

    /// Add new element to the BloomFilter.
    ///
    /// The element count is incremented on every call, even if the same element was added
    /// before.
    ///
    /// If the hash strategy fails, the error is returned and the count stays unchanged. Some
    /// bits might have been set already.
    pub fn add<T>(&mut self, element: &T) -> Result<()>
    where
        T: AsRef<[u8]> + ?Sized,
    {
        let element = element.as_ref();
        for pos in Probes::new(self.bs.len(), self.k, element, &self.hasher) {
            let pos = pos.inspect_err(|e| {
                warn!(%e, "add failed, filter may be partially updated");
            })?;
            self.bs.insert(pos);
        }

        self.n = self.n.saturating_add(1);
        trace!(n = self.n, "added element");
        if self.n - 1 == self.capacity {
            warn!(
                capacity = self.capacity,
                error_rate = self.error_rate,
                "BloomFilter exceeds its capacity, false positive rate will rise above target"
            );
        }
        Ok(())
    }

    /// Guess if the given element was added to the BloomFilter.
    ///
    /// Elements that were added are always reported. Elements that were never added may be
    /// reported as well, see [`fp_rate`](Self::fp_rate).
    pub fn contains<T>(&self, element: &T) -> Result<bool>
    where
        T: AsRef<[u8]> + ?Sized,
    {
        for pos in self.probes(element.as_ref()) {
            if !self.bs.contains(pos?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Estimated false positive rate for the current number of elements,
    /// `(1 - e^(-k * n / m))^k`.
    ///
    /// This is roughly `error_rate` once `capacity` elements were added, lower before and higher
    /// after.
    pub fn fp_rate(&self) -> f64 {
        estimate_fp_rate(self.bs.len(), self.k, self.n)
    }

    /// Measure the false positive rate empirically.
    ///
    /// `probes` must be elements that were never added. Returns the fraction of them that the
    /// BloomFilter reports as present, or 0 if `probes` is empty.
    pub fn measure_fp_rate<I, T>(&self, probes: I) -> Result<f64>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut total = 0usize;
        let mut hits = 0usize;
        for probe in probes {
            total += 1;
            if self.contains(&probe)? {
                hits += 1;
            }
        }

        if total == 0 {
            return Ok(0.);
        }
        Ok(hits as f64 / total as f64)
    }

    /// Guess the number of distinct elements added to the BloomFilter, based on the number of
    /// set bits.
    ///
    /// Saturates at `usize::MAX` when all bits are set.
    pub fn guess_distinct(&self) -> usize {
        let m = self.bs.len() as f64;
        let k = self.k as f64;
        let x = self.ones() as f64;

        (-m / k * (1. - x / m).ln()) as usize
    }

    /// Add the entire content of another BloomFilter to this BloomFilter.
    ///
    /// The result is the same as adding all elements added to `other` to `self` in the first
    /// place; counts add up.
    ///
    /// Returns [`Error::InvalidArgument`] if the parameters or hash strategies of the two
    /// BloomFilters are not identical. `self` is left untouched in that case.
    pub fn union(&mut self, other: &Self) -> Result<()>
    where
        H: PartialEq,
    {
        if self.capacity != other.capacity || self.error_rate != other.error_rate {
            return Err(Error::InvalidArgument(format!(
                "properties must be equal (left=({}, {}), right=({}, {}))",
                self.capacity, self.error_rate, other.capacity, other.error_rate
            )));
        }
        if self.k != other.k {
            return Err(Error::InvalidArgument(format!(
                "k must be equal (left={}, right={})",
                self.k, other.k
            )));
        }
        if self.bs.len() != other.bs.len() {
            return Err(Error::InvalidArgument(format!(
                "m must be equal (left={}, right={})",
                self.bs.len(),
                other.bs.len()
            )));
        }
        if self.hasher != other.hasher {
            return Err(Error::InvalidArgument(
                "hasher must be equal".to_owned(),
            ));
        }

        self.bs.union_with(&other.bs);
        self.n = self.n.saturating_add(other.n);
        Ok(())
    }
}

impl<H> fmt::Debug for BloomFilter<H>
where
    H: SeededHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BloomFilter {{ m: {}, k: {}, n: {} }}",
            self.bs.len(),
            self.k,
            self.n
        )
    }
}

impl<T, H> Filter<T> for BloomFilter<H>
where
    T: AsRef<[u8]> + ?Sized,
    H: SeededHasher,
{
    type Err = Error;

    fn insert(&mut self, obj: &T) -> Result<()> {
        self.add(obj)
    }

    fn query(&self, obj: &T) -> Result<bool> {
        self.contains(obj)
    }

    fn len(&self) -> usize {
        self.n
    }

    fn is_empty(&self) -> bool {
        self.n == 0
    }
}
