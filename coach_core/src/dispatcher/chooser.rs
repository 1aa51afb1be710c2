//! Chooser - the injected source of variety for reply templates.

use rand::Rng;

/// Picks one position out of a small fixed set of options.
pub trait Chooser: Send + Sync {
    /// Return an index in `0..len`. `len` is never zero.
    fn choose(&self, len: usize) -> usize;
}

/// Pick one element of `options` using `chooser`.
///
/// Out-of-range indices from a misbehaving chooser are clamped to the last
/// option, so a non-empty slice always yields an element.
pub fn pick<'a, T>(chooser: &dyn Chooser, options: &'a [T]) -> Option<&'a T> {
    if options.is_empty() {
        return None;
    }
    let index = chooser.choose(options.len()).min(options.len() - 1);
    options.get(index)
}

/// Uniform random choice backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomChooser;

impl Chooser for RandomChooser {
    fn choose(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always picks the same position.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedChooser(pub usize);

impl Chooser for FixedChooser {
    fn choose(&self, _len: usize) -> usize {
        self.0
    }
}

impl<F> Chooser for F
where
    F: Fn(usize) -> usize + Send + Sync,
{
    fn choose(&self, len: usize) -> usize {
        self(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_chooser() {
        let options = ["a", "b", "c"];
        assert_eq!(pick(&FixedChooser(1), &options), Some(&"b"));
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let options = ["a", "b"];
        assert_eq!(pick(&FixedChooser(9), &options), Some(&"b"));
    }

    #[test]
    fn test_empty_options() {
        let options: [&str; 0] = [];
        assert_eq!(pick(&FixedChooser(0), &options), None);
    }

    #[test]
    fn test_random_chooser_in_range() {
        let chooser = RandomChooser;
        for _ in 0..100 {
            assert!(chooser.choose(2) < 2);
        }
    }

    #[test]
    fn test_closure_chooser() {
        let last = |len: usize| len - 1;
        assert_eq!(pick(&last, &[1, 2, 3]), Some(&3));
    }
}
