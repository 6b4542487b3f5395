use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

pub(crate) fn assert_send<T>(_: &T)
where
    T: Send,
{
}

pub(crate) fn assert_sync<T>(_: &T)
where
    T: Sync,
{
}

/// Deterministic RNG so statistical tests are reproducible.
pub(crate) fn rng() -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(42)
}

/// Generate `n` distinct elements, elements with different prefixes never collide.
pub(crate) fn random_elements<R>(rng: &mut R, prefix: &str, n: usize) -> Vec<String>
where
    R: Rng,
{
    (0..n)
        .map(|i| format!("{}-{}-{:016x}", prefix, i, rng.random::<u64>()))
        .collect()
}
