pub mod distill;
pub mod mlm;

use crate::error::{Result, SampleError};

/// A uniform random source the samplers draw from.
pub trait RandomSource {
    /// Pick an index uniformly from `0..len`. `len` is never zero.
    fn choose_index(&mut self, len: usize) -> usize;
    /// Restart the generator from a fixed seed.
    fn reseed(&mut self, seed: u64);
}

impl RandomSource for fastrand::Rng {
    fn choose_index(&mut self, len: usize) -> usize {
        self.usize(..len)
    }

    fn reseed(&mut self, seed: u64) {
        self.seed(seed);
    }
}

/// The process-wide generator.
///
/// It is seeded from entropy when a thread first touches it. Reseeding only
/// affects the calling thread; share one stream across threads through
/// [`crate::sampler_route`] instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalRandom;

impl RandomSource for GlobalRandom {
    fn choose_index(&mut self, len: usize) -> usize {
        fastrand::usize(..len)
    }

    fn reseed(&mut self, seed: u64) {
        fastrand::seed(seed);
    }
}

/// Fail if any of the named candidate sets is empty.
pub fn ensure_candidates(sets: &[(&'static str, &[usize])]) -> Result<()> {
    match sets.iter().find(|(_, candidates)| candidates.is_empty()) {
        Some(&(field, _)) => Err(SampleError::EmptyCandidates { field }),
        None => Ok(()),
    }
}

/// Draw one value uniformly from `candidates`.
pub fn choose<R: RandomSource + ?Sized>(
    source: &mut R,
    field: &'static str,
    candidates: &[usize],
) -> Result<usize> {
    if candidates.is_empty() {
        return Err(SampleError::EmptyCandidates { field });
    }
    let index = source.choose_index(candidates.len());
    Ok(candidates[index])
}
