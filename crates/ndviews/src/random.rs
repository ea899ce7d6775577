//! Random array construction.
//!
//! Every constructor takes a `rand` distribution, so the element type only
//! needs `D: Distribution<T>`. The `random`/`randn` shorthands cover the
//! real types `rand` samples natively; complex arrays use
//! [`ComplexStandardNormal`] through [`NdArray::sample_with_rng`].
//!
//! Sparse fixtures decide occupancy per cell with a [`Bernoulli`] draw, so a
//! seeded RNG reproduces both the pattern and the values.

use rand::Rng;
use rand::distr::{Bernoulli, Distribution, StandardUniform};
use rand_distr::StandardNormal;

use crate::array::NdArray;
use crate::error::Result;
use crate::scalar::{Scalar, c64};

/// Complex normal with `E|z|^2 = 1`: both parts drawn from `N(0, 1/2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplexStandardNormal;

impl Distribution<c64> for ComplexStandardNormal {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> c64 {
        let scale = std::f64::consts::FRAC_1_SQRT_2;
        let re: f64 = StandardNormal.sample(rng);
        let im: f64 = StandardNormal.sample(rng);
        c64::new(re * scale, im * scale)
    }
}

impl<T: Scalar> NdArray<T> {
    /// Dense array whose cells are independent draws from `dist`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedRank` unless `shape` has 1 to 3 entries.
    ///
    /// # Example
    ///
    /// ```
    /// use ndviews::NdArray;
    /// use rand::SeedableRng;
    /// use rand::distr::Uniform;
    /// use rand::rngs::StdRng;
    ///
    /// let dice = Uniform::new_inclusive(1, 6).unwrap();
    /// let a = NdArray::<i32>::sample_with_rng(&[4, 4], &dice, &mut StdRng::seed_from_u64(3)).unwrap();
    /// assert!(a.to_vec().iter().all(|v| (1..=6).contains(v)));
    /// ```
    pub fn sample_with_rng<D, R>(shape: &[usize], dist: &D, rng: &mut R) -> Result<Self>
    where
        D: Distribution<T>,
        R: Rng + ?Sized,
    {
        let len: usize = shape.iter().product();
        let data: Vec<T> = (0..len).map(|_| dist.sample(rng)).collect();
        Self::from_vec(data, shape)
    }

    /// Sparse array where each cell is occupied with the probability of
    /// `fill` and occupied cells are drawn from `dist`.
    ///
    /// Draws that come out as zero leave the cell absent.
    pub fn sparse_sample_with_rng<D, R>(
        shape: &[usize],
        fill: &Bernoulli,
        dist: &D,
        rng: &mut R,
    ) -> Result<Self>
    where
        D: Distribution<T>,
        R: Rng + ?Sized,
    {
        let out = Self::sparse(shape)?;
        for key in 0..out.size() {
            if fill.sample(rng) {
                let v = dist.sample(rng);
                if !v.is_zero() {
                    out.storage().set(key, v);
                }
            }
        }
        Ok(out)
    }
}

impl<T: Scalar> NdArray<T>
where
    StandardUniform: Distribution<T>,
{
    /// Dense array of `StandardUniform` draws from the thread-local RNG.
    /// Floats land in `[0, 1)`, integers span their whole range.
    pub fn random(shape: &[usize]) -> Result<Self> {
        Self::random_with_rng(shape, &mut rand::rng())
    }

    pub fn random_with_rng<R: Rng + ?Sized>(shape: &[usize], rng: &mut R) -> Result<Self> {
        Self::sample_with_rng(shape, &StandardUniform, rng)
    }
}

impl<T: Scalar> NdArray<T>
where
    StandardNormal: Distribution<T>,
{
    /// Dense array of standard normal draws from the thread-local RNG.
    pub fn randn(shape: &[usize]) -> Result<Self> {
        Self::randn_with_rng(shape, &mut rand::rng())
    }

    pub fn randn_with_rng<R: Rng + ?Sized>(shape: &[usize], rng: &mut R) -> Result<Self> {
        Self::sample_with_rng(shape, &StandardNormal, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_f64_in_unit_interval() {
        let a: NdArray<f64> = NdArray::random(&[4, 5]).unwrap();
        assert_eq!(a.shape(), vec![4, 5]);
        assert!(a.to_vec().iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn test_randn_moments() {
        let a: NdArray<f64> = NdArray::randn_with_rng(&[400], &mut StdRng::seed_from_u64(7)).unwrap();
        let v = a.to_vec();
        let mean = v.iter().sum::<f64>() / 400.0;
        let var = v.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / 400.0;
        assert!(mean.abs() < 0.3, "mean {mean} too far from 0");
        assert!(var > 0.6 && var < 1.5, "variance {var} too far from 1");
    }

    #[test]
    fn test_complex_normal_unit_power() {
        let mut rng = StdRng::seed_from_u64(5);
        let z = NdArray::<c64>::sample_with_rng(&[20, 20], &ComplexStandardNormal, &mut rng).unwrap();
        let power = z.to_vec().iter().map(|z| z.re * z.re + z.im * z.im).sum::<f64>() / 400.0;
        assert!(power > 0.8 && power < 1.2, "mean power {power} too far from 1");
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let a: NdArray<f64> = NdArray::randn_with_rng(&[2, 2, 2], &mut StdRng::seed_from_u64(5)).unwrap();
        let b: NdArray<f64> = NdArray::randn_with_rng(&[2, 2, 2], &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sparse_fill_rate() {
        let fill = Bernoulli::new(0.1).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let a = NdArray::<f64>::sparse_sample_with_rng(&[50, 40], &fill, &StandardNormal, &mut rng).unwrap();
        assert!(a.storage().is_sparse());
        let stored = a.cardinality();
        assert!((120..=280).contains(&stored), "{stored} cells stored out of 2000");
        assert_eq!(stored, a.non_zeros().len());
    }

    #[test]
    fn test_sparse_zero_draws_stay_absent() {
        let always = Bernoulli::new(1.0).unwrap();
        let bits = rand::distr::Uniform::new_inclusive(0, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let a = NdArray::<i32>::sparse_sample_with_rng(&[64], &always, &bits, &mut rng).unwrap();
        let ones = a.to_vec().iter().filter(|&&v| v == 1).count();
        assert_eq!(a.cardinality(), ones);
    }

    #[test]
    fn test_rank_checked() {
        assert!(NdArray::<f64>::random(&[]).is_err());
        let fill = Bernoulli::new(0.5).unwrap();
        let err = NdArray::<f64>::sparse_sample_with_rng(&[1, 1, 1, 1], &fill, &StandardUniform, &mut rand::rng());
        assert!(err.is_err());
    }
}
