//! Series Terms
//!
//! The evaluator only ever asks a term for the sum over a half-open block of
//! indices. That keeps the alternating-sign bookkeeping inside the block and
//! lets tests swap the Leibniz formula for a counting function.

/// A series whose terms can be summed over contiguous index blocks
pub trait SeriesTerm: Sync {
    /// Sum of the terms with index in `start..end`
    fn block_sum(&self, start: u64, end: u64) -> f64;
}

/// The Leibniz series `Σ (-1)^k / (2k + 1)`, which converges to π/4
#[derive(Debug, Clone, Copy, Default)]
pub struct Leibniz;

impl Leibniz {
    /// Value of the single term `k`
    #[inline]
    pub fn term(k: u64) -> f64 {
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        sign / (2.0 * k as f64 + 1.0)
    }
}

impl SeriesTerm for Leibniz {
    #[inline]
    fn block_sum(&self, start: u64, end: u64) -> f64 {
        // The factor follows the parity of the absolute index, not the loop counter.
        let mut factor = if start % 2 == 0 { 1.0 } else { -1.0 };
        let mut sum = 0.0;
        for k in start..end {
            sum += factor / (2.0 * k as f64 + 1.0);
            factor = -factor;
        }
        sum
    }
}

/// Adapts a per-index function into a [`SeriesTerm`]
#[derive(Debug, Clone, Copy)]
pub struct PerIndex<F>(pub F);

impl<F> SeriesTerm for PerIndex<F>
where
    F: Fn(u64) -> f64 + Sync,
{
    fn block_sum(&self, start: u64, end: u64) -> f64 {
        (start..end).map(&self.0).sum()
    }
}

/// Single-threaded reference approximation of π over `n` terms
pub fn sequential(n: u64) -> f64 {
    4.0 * Leibniz.block_sum(0, n)
}
