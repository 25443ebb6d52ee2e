//! Per-pixel sample generators.
//!
//! A generator is reset once per pixel and then queried with a
//! `(sample_index, dim)` pair for every random decision that pixel makes.
//! Dimension 0 is the pixel jitter; integrators own dimension 1 onward.

use lumen_math::{Vec2, ONE_MINUS_EPSILON};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Number of dimensions the jittered sampler stratifies. Queries for higher
/// dimensions return independent uniform points.
pub const STRATIFIED_DIMENSIONS: usize = 30;

/// Source of 2D sample points on `[0, 1)²`.
pub trait SampleGenerator: Send {
    /// Samples taken per pixel. Fixed for the generator's lifetime.
    fn num_samples(&self) -> usize;

    /// Prepare a fresh pattern for the next pixel.
    fn reset(&mut self);

    /// Point for sample `sample_index` in dimension `dim`.
    fn sample(&mut self, sample_index: usize, dim: usize) -> Vec2;
}

fn uniform(rng: &mut StdRng) -> Vec2 {
    Vec2::new(rng.gen::<f32>(), rng.gen::<f32>())
}

/// Every query is an independent uniform point.
pub struct IndependentSampler {
    num_samples: usize,
    rng: StdRng,
}

impl IndependentSampler {
    pub fn new(num_samples: usize, seed: u64) -> Self {
        Self {
            num_samples: num_samples.max(1),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl SampleGenerator for IndependentSampler {
    fn num_samples(&self) -> usize {
        self.num_samples
    }

    fn reset(&mut self) {}

    fn sample(&mut self, _sample_index: usize, _dim: usize) -> Vec2 {
        uniform(&mut self.rng)
    }
}

/// Jittered stratified sampler over an `nu × nv` grid.
///
/// Each stratified dimension keeps its own random permutation of the strata,
/// so within a pixel every dimension places exactly one sample per stratum
/// while different dimensions stay decorrelated.
pub struct JitteredSampler {
    nu: usize,
    nv: usize,
    permutations: Vec<Vec<usize>>,
    rng: StdRng,
}

impl JitteredSampler {
    /// Create a sampler with `nu × nv` strata. Zero counts are raised to one.
    pub fn new(nu: usize, nv: usize, seed: u64) -> Self {
        let nu = nu.max(1);
        let nv = nv.max(1);
        let mut sampler = Self {
            nu,
            nv,
            permutations: vec![(0..nu * nv).collect(); STRATIFIED_DIMENSIONS],
            rng: StdRng::seed_from_u64(seed),
        };
        sampler.reset();
        sampler
    }

    pub fn strata(&self) -> (usize, usize) {
        (self.nu, self.nv)
    }
}

impl SampleGenerator for JitteredSampler {
    fn num_samples(&self) -> usize {
        self.nu * self.nv
    }

    fn reset(&mut self) {
        for permutation in &mut self.permutations {
            permutation.shuffle(&mut self.rng);
        }
    }

    fn sample(&mut self, sample_index: usize, dim: usize) -> Vec2 {
        let Some(permutation) = self.permutations.get(dim) else {
            return uniform(&mut self.rng);
        };

        let stratum = permutation[sample_index % permutation.len()];
        let su = (stratum % self.nu) as f32;
        let sv = (stratum / self.nu) as f32;
        let jitter = uniform(&mut self.rng);

        Vec2::new(
            ((su + jitter.x) / self.nu as f32).min(ONE_MINUS_EPSILON),
            ((sv + jitter.y) / self.nv as f32).min(ONE_MINUS_EPSILON),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stratum_of(p: Vec2, nu: usize, nv: usize) -> usize {
        let u = (p.x * nu as f32) as usize;
        let v = (p.y * nv as f32) as usize;
        v * nu + u
    }

    #[test]
    fn test_independent_stays_in_unit_square() {
        let mut sampler = IndependentSampler::new(16, 7);
        assert_eq!(sampler.num_samples(), 16);
        sampler.reset();
        for i in 0..1000 {
            let p = sampler.sample(i % 16, i % 5);
            assert!((0.0..1.0).contains(&p.x) && (0.0..1.0).contains(&p.y));
        }
    }

    #[test]
    fn test_jittered_one_sample_per_stratum() {
        let (nu, nv) = (4, 3);
        let mut sampler = JitteredSampler::new(nu, nv, 11);
        assert_eq!(sampler.num_samples(), 12);

        for _pixel in 0..4 {
            sampler.reset();
            for dim in [0, 1, 7, STRATIFIED_DIMENSIONS - 1] {
                let mut seen = vec![false; nu * nv];
                for i in 0..sampler.num_samples() {
                    let p = sampler.sample(i, dim);
                    assert!((0.0..1.0).contains(&p.x) && (0.0..1.0).contains(&p.y));
                    let s = stratum_of(p, nu, nv);
                    assert!(!seen[s], "stratum {s} hit twice in dim {dim}");
                    seen[s] = true;
                }
                assert!(seen.iter().all(|&s| s));
            }
        }
    }

    #[test]
    fn test_jittered_dimensions_are_decorrelated() {
        // With 64 strata, 30 identically ordered permutations are vanishingly unlikely
        let mut sampler = JitteredSampler::new(8, 8, 3);
        sampler.reset();
        let order = |sampler: &mut JitteredSampler, dim| -> Vec<usize> {
            (0..64).map(|i| stratum_of(sampler.sample(i, dim), 8, 8)).collect()
        };
        let first = order(&mut sampler, 0);
        let differs = (1..STRATIFIED_DIMENSIONS).any(|dim| order(&mut sampler, dim) != first);
        assert!(differs);
    }

    #[test]
    fn test_jittered_falls_back_past_stratified_dimensions() {
        let mut sampler = JitteredSampler::new(2, 2, 5);
        sampler.reset();
        let mut sum = Vec2::ZERO;
        let n = 4000;
        for i in 0..n {
            let p = sampler.sample(i, STRATIFIED_DIMENSIONS + 3);
            assert!((0.0..1.0).contains(&p.x) && (0.0..1.0).contains(&p.y));
            sum += p;
        }
        let mean = sum / n as f32;
        assert!((mean - Vec2::splat(0.5)).abs().max_element() < 0.05);
    }

    #[test]
    fn test_jittered_zero_strata_is_single_sample() {
        let sampler = JitteredSampler::new(0, 0, 1);
        assert_eq!(sampler.strata(), (1, 1));
        assert_eq!(sampler.num_samples(), 1);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = JitteredSampler::new(3, 3, 99);
        let mut b = JitteredSampler::new(3, 3, 99);
        for i in 0..9 {
            assert_eq!(a.sample(i, 2), b.sample(i, 2));
        }
    }
}
