use rand::Rng;

/// Uniform draws used while laying out a trial sequence
pub trait RandomSource {
    /// Uniform integer in `[0, bound)`. `bound` must be non-zero.
    fn next_int(&mut self, bound: usize) -> usize;

    /// Uniform float in `[0, 1)`.
    fn next_float(&mut self) -> f32;
}

impl<R: Rng> RandomSource for R {
    fn next_int(&mut self, bound: usize) -> usize {
        self.random_range(0..bound)
    }

    fn next_float(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// In-place Fisher-Yates shuffle. Draws exactly `items.len()` integers.
pub fn fisher_yates<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    let n = items.len();
    for i in 0..n {
        let k = i + rng.next_int(n - i);
        items.swap(i, k);
    }
}
