//! Random permutation of a closed range.

use rand::Rng;

use crate::error::Result;

use super::check_range;

/// Fisher-Yates shuffle of `data[from..=to]`.
///
/// The generator is an explicit parameter; seed it for reproducible output.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use ndviews::sorting::shuffle;
///
/// let mut a = [1, 2, 3, 4, 5];
/// let mut b = a;
/// shuffle(&mut a, 0, 4, &mut StdRng::seed_from_u64(9)).unwrap();
/// shuffle(&mut b, 0, 4, &mut StdRng::seed_from_u64(9)).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn shuffle<T, R>(data: &mut [T], from: usize, to: usize, rng: &mut R) -> Result<()>
where
    R: Rng + ?Sized,
{
    check_range(data.len(), from, to)?;
    for i in (from + 1..=to).rev() {
        let j = rng.random_range(from..=i);
        data.swap(i, j);
    }
    Ok(())
}
