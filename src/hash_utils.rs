//! Hash-related utils.
//!
//! A Bloom filter needs `k` hash functions `h_i(x)`. They are derived from a single
//! [`SeededHasher`] by passing the round index `i` as seed, see [`Probes`].
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{BuildHasher, Hasher};
use std::marker;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// A hash function that maps an element and a seed to an integer.
///
/// Implementations must be deterministic: the same `(element, seed)` pair must always produce
/// the same value. The filter does not assume anything else about the algorithm, but a roughly
/// uniform output distribution keeps the false positive rate close to its estimate.
pub trait SeededHasher {
    /// Hash `element` (its canonical byte representation) using `seed`.
    fn hash_with_seed(&self, element: &[u8], seed: u64) -> Result<u64>;
}

impl<H> SeededHasher for &H
where
    H: SeededHasher + ?Sized,
{
    fn hash_with_seed(&self, element: &[u8], seed: u64) -> Result<u64> {
        (**self).hash_with_seed(element, seed)
    }
}

impl<H> SeededHasher for Box<H>
where
    H: SeededHasher + ?Sized,
{
    fn hash_with_seed(&self, element: &[u8], seed: u64) -> Result<u64> {
        (**self).hash_with_seed(element, seed)
    }
}

impl<H> SeededHasher for Arc<H>
where
    H: SeededHasher + ?Sized,
{
    fn hash_with_seed(&self, element: &[u8], seed: u64) -> Result<u64> {
        (**self).hash_with_seed(element, seed)
    }
}

/// Default hash strategy based on a general-purpose digest (SHA-256 unless specified otherwise).
///
/// The element bytes are followed by the decimal representation of the seed, the concatenation
/// is digested and the first 8 bytes of the digest are read as big-endian `u64`.
///
/// Cryptographic digests are slow compared to non-cryptographic hashes. For throughput-critical
/// use, consider [`StdHasher`] or a custom [`SeededHasher`].
pub struct DigestHasher<D = Sha256>(marker::PhantomData<fn() -> D>);

impl<D> DigestHasher<D>
where
    D: Digest,
{
    /// Create new `DigestHasher`.
    pub fn new() -> Self {
        Self(marker::PhantomData)
    }
}

impl<D> SeededHasher for DigestHasher<D>
where
    D: Digest,
{
    fn hash_with_seed(&self, element: &[u8], seed: u64) -> Result<u64> {
        let mut digest = D::new();
        Digest::update(&mut digest, element);
        Digest::update(&mut digest, seed.to_string().as_bytes());
        digest_head(&digest.finalize())
    }
}

/// Read the first 8 bytes of a digest as big-endian `u64`.
fn digest_head(out: &[u8]) -> Result<u64> {
    let head: [u8; 8] = out
        .get(..8)
        .and_then(|head| head.try_into().ok())
        .ok_or_else(|| {
            Error::HashFailure(format!(
                "digest output has {} bytes, at least 8 are required",
                out.len()
            ))
        })?;
    Ok(u64::from_be_bytes(head))
}

impl<D> fmt::Debug for DigestHasher<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("DigestHasher")
    }
}

impl<D> Clone for DigestHasher<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for DigestHasher<D> {}

impl<D> Default for DigestHasher<D> {
    fn default() -> Self {
        Self(marker::PhantomData)
    }
}

impl<D> PartialEq for DigestHasher<D> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}
impl<D> Eq for DigestHasher<D> {}

/// Hash strategy backed by a `std::hash::BuildHasher`.
///
/// The `BuildHasher` must be stable, i.e. create identically seeded `Hasher`s on every call.
/// `std::hash::BuildHasherDefault` is, `std::collections::hash_map::RandomState` is not.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StdHasher<B> {
    buildhasher: B,
}

impl<B> StdHasher<B>
where
    B: BuildHasher,
{
    /// Create new `StdHasher` using the given `BuildHasher`.
    pub fn new(buildhasher: B) -> Self {
        Self { buildhasher }
    }

    /// Get `BuildHasher`.
    pub fn buildhasher(&self) -> &B {
        &self.buildhasher
    }
}

impl<B> SeededHasher for StdHasher<B>
where
    B: BuildHasher,
{
    fn hash_with_seed(&self, element: &[u8], seed: u64) -> Result<u64> {
        let mut hasher = self.buildhasher.build_hasher();
        hasher.write_u64(seed);
        hasher.write(element);
        Ok(hasher.finish())
    }
}

/// BuildHasher that takes a seed.
///
/// Useful together with [`StdHasher`] to get independent, but stable hash strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildHasherSeeded {
    seed: u64,
}

impl BuildHasherSeeded {
    /// Create new BuildHasherSeeded with given seed.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BuildHasher for BuildHasherSeeded {
    type Hasher = DefaultHasher;

    fn build_hasher(&self) -> DefaultHasher {
        let mut h = DefaultHasher::default();
        h.write_u64(self.seed);
        h
    }
}

/// Hash strategy wrapping a function or closure.
///
/// # Examples
/// ```
/// use simplebloom::hash_utils::{FnHasher, SeededHasher};
///
/// let hasher = FnHasher::new(|element: &[u8], seed: u64| {
///     Ok(element
///         .iter()
///         .fold(seed, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(*b))))
/// });
/// assert_eq!(
///     hasher.hash_with_seed(b"abc", 0).unwrap(),
///     hasher.hash_with_seed(b"abc", 0).unwrap(),
/// );
/// ```
#[derive(Clone)]
pub struct FnHasher<F> {
    f: F,
}

impl<F> FnHasher<F>
where
    F: Fn(&[u8], u64) -> Result<u64>,
{
    /// Create new `FnHasher` from `f`.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> SeededHasher for FnHasher<F>
where
    F: Fn(&[u8], u64) -> Result<u64>,
{
    fn hash_with_seed(&self, element: &[u8], seed: u64) -> Result<u64> {
        (self.f)(element, seed)
    }
}

impl<F> fmt::Debug for FnHasher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("FnHasher")
    }
}

/// `Iterator` that creates the bit positions `h_i(x) mod m, for i in 0..k` of an element.
///
/// Every position is derived by calling the hasher with the element and the round index `i` as
/// seed. Once the hasher failed, the iterator yields the error and stops.
pub struct Probes<'a, 'b, H>
where
    H: SeededHasher + ?Sized,
{
    m: usize,
    k: usize,
    i: usize,
    element: &'a [u8],
    hasher: &'b H,
}

impl<'a, 'b, H> Probes<'a, 'b, H>
where
    H: SeededHasher + ?Sized,
{
    /// Create new `Probes` with the following parameters:
    ///
    /// - `m`: number of bits, all results are `< m`
    /// - `k`: number of positions to generate
    /// - `element`: the element that should be hashed, i.e. `x` in `h_i(x)`
    /// - `hasher`: the hash strategy
    pub fn new(m: usize, k: usize, element: &'a [u8], hasher: &'b H) -> Self {
        Self {
            m,
            k,
            i: 0,
            element,
            hasher,
        }
    }
}

impl<H> fmt::Debug for Probes<'_, '_, H>
where
    H: SeededHasher + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probes")
            .field("m", &self.m)
            .field("k", &self.k)
            .field("i", &self.i)
            .finish()
    }
}

impl<H> Iterator for Probes<'_, '_, H>
where
    H: SeededHasher + ?Sized,
{
    type Item = Result<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.i >= self.k {
            return None;
        }

        let res = self
            .hasher
            .hash_with_seed(self.element, self.i as u64)
            .and_then(|h| {
                h.checked_rem(self.m as u64)
                    .map(|pos| pos as usize)
                    .ok_or_else(|| Error::InvalidArgument("m must be greater than 0".to_owned()))
            });

        self.i = if res.is_ok() { self.i + 1 } else { self.k };
        Some(res)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.k - self.i;
        (0, Some(remaining))
    }
}
