//! Index-based subset enumeration over vertices `0..n`, with subsets encoded
//! as `u64` bitmasks (bit `i` set means vertex `i` is a member).

/// Widest vertex set a `u64` mask can address.
pub const MAX_MASK_VERTICES: usize = 64;

pub(crate) fn full_mask(n: usize) -> u64 {
    debug_assert!(n <= MAX_MASK_VERTICES);
    if n == MAX_MASK_VERTICES {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

/// Vertex indices of a mask, ascending.
pub(crate) fn indices(mask: u64) -> impl Iterator<Item = usize> {
    let mut rest = mask;
    std::iter::from_fn(move || {
        if rest == 0 {
            return None;
        }
        let index = rest.trailing_zeros() as usize;
        rest &= rest - 1;
        Some(index)
    })
}

/// Every non-empty sub-mask of `mask`, each exactly once.
pub(crate) fn non_empty_submasks(mask: u64) -> impl Iterator<Item = u64> {
    let mut next = mask;
    std::iter::from_fn(move || {
        if next == 0 {
            return None;
        }
        let current = next;
        next = (next - 1) & mask;
        Some(current)
    })
}

/// r-element subsets of `0..n` in lexicographic order of their sorted index
/// tuples: `{0,1,2}, {0,1,3}, …, {n-3,n-2,n-1}`.
pub(crate) struct Combinations {
    indices: Vec<usize>,
    n: usize,
    exhausted: bool,
}

impl Combinations {
    pub(crate) fn new(n: usize, r: usize) -> Self {
        debug_assert!(n <= MAX_MASK_VERTICES);
        Self {
            indices: (0..r).collect(),
            n,
            exhausted: r > n,
        }
    }

    fn mask(&self) -> u64 {
        self.indices.iter().fold(0u64, |mask, &i| mask | (1u64 << i))
    }

    fn advance(&mut self) {
        let r = self.indices.len();
        // Rightmost position that can still move right.
        let Some(pos) = (0..r).rev().find(|&pos| self.indices[pos] < self.n - r + pos) else {
            self.exhausted = true;
            return;
        };
        self.indices[pos] += 1;
        for next in pos + 1..r {
            self.indices[next] = self.indices[next - 1] + 1;
        }
    }
}

impl Iterator for Combinations {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.exhausted {
            return None;
        }
        let mask = self.mask();
        self.advance();
        Some(mask)
    }
}

/// C(n, r), saturating at `u64::MAX`.
pub(crate) fn binomial(n: usize, r: usize) -> u64 {
    if r > n {
        return 0;
    }
    let r = r.min(n - r);
    let mut acc: u128 = 1;
    for i in 0..r {
        acc = acc * (n - i) as u128 / (i + 1) as u128;
        if acc > u64::MAX as u128 {
            return u64::MAX;
        }
    }
    acc as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn combinations_are_lexicographic() {
        let masks: Vec<u64> = Combinations::new(4, 2).collect();
        assert_eq!(
            masks,
            vec![0b0011, 0b0101, 0b1001, 0b0110, 0b1010, 0b1100]
        );
    }

    #[test]
    fn combination_counts_match_binomials() {
        for n in 0..=10 {
            for r in 0..=n + 1 {
                assert_eq!(
                    Combinations::new(n, r).count() as u64,
                    binomial(n, r),
                    "C({n}, {r})"
                );
            }
        }
    }

    #[test]
    fn empty_choice_yields_the_empty_mask_once() {
        assert_eq!(Combinations::new(3, 0).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn submasks_cover_every_non_empty_subset() {
        let mut subs: Vec<u64> = non_empty_submasks(0b1011).collect();
        subs.sort_unstable();
        assert_eq!(
            subs,
            vec![0b0001, 0b0010, 0b0011, 0b1000, 0b1001, 0b1010, 0b1011]
        );
        assert_eq!(non_empty_submasks(0).count(), 0);
    }

    #[test]
    fn indices_and_full_mask() {
        assert_eq!(indices(0b1010_0001).collect::<Vec<_>>(), vec![0, 5, 7]);
        assert_eq!(full_mask(3), 0b111);
        assert_eq!(full_mask(64), u64::MAX);
        assert_eq!(indices(u64::MAX).count(), 64);
    }

    #[test]
    fn binomial_saturates() {
        assert_eq!(binomial(64, 32), 1_832_624_140_942_590_534);
        assert_eq!(binomial(5, 0), 1);
        assert_eq!(binomial(5, 6), 0);
    }
}
