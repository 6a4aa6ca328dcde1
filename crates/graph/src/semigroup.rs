use crate::error::{AnalysisError, Result};
use crate::types::Generators;

/// Default safety ceiling for the additive closure.
pub const DEFAULT_CLOSURE_BOUND: u64 = 2000;

/// Hard ceiling on the closure bound; the member bitmap is dense.
pub const MAX_CLOSURE_BOUND: u64 = 1 << 24;

/// Numerical semigroup truncated to `0..=bound`.
///
/// Membership above the bound is reported as absent. The truncation is exact
/// for Apéry purposes as long as the bound exceeds the largest Apéry element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Semigroup {
    members: Vec<bool>,
    len: usize,
    bound: u64,
}

impl Semigroup {
    /// Closure of `{0}` under adding generators, saturated up to `bound`.
    pub fn generate(generators: &Generators, bound: u64) -> Result<Self> {
        if bound > MAX_CLOSURE_BOUND {
            return Err(AnalysisError::InvalidInput(format!(
                "closure bound {bound} exceeds the maximum of {MAX_CLOSURE_BOUND}"
            )));
        }

        let mut members = vec![false; bound as usize + 1];
        members[0] = true;
        let mut len = 1;

        // Each pass extends the members discovered by the previous one; the
        // loop ends at the fixed point where a pass discovers nothing new.
        let mut frontier = vec![0u64];
        while !frontier.is_empty() {
            let mut discovered = Vec::new();
            for &member in &frontier {
                for &generator in generators.as_slice() {
                    let Some(sum) = member.checked_add(generator) else {
                        continue;
                    };
                    if sum <= bound && !members[sum as usize] {
                        members[sum as usize] = true;
                        len += 1;
                        discovered.push(sum);
                    }
                }
            }
            frontier = discovered;
        }

        log::debug!(
            "Generated semigroup <{:?}>: {} members up to {}",
            generators.as_slice(),
            len,
            bound
        );

        Ok(Self {
            members,
            len,
            bound,
        })
    }

    pub fn contains(&self, value: u64) -> bool {
        value <= self.bound && self.members[value as usize]
    }

    pub fn bound(&self) -> u64 {
        self.bound
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.members
            .iter()
            .enumerate()
            .filter_map(|(value, &present)| present.then_some(value as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn generators(values: &[i64]) -> Generators {
        Generators::new(values.iter().copied()).unwrap()
    }

    #[test]
    fn single_generator_yields_its_multiples() {
        let s = Semigroup::generate(&generators(&[5]), 23).unwrap();
        let members: Vec<u64> = s.iter().collect();
        assert_eq!(members, vec![0, 5, 10, 15, 20]);
        assert_eq!(s.len(), 5);
    }

    #[test]
    fn three_and_five_fill_in_after_the_frobenius_number() {
        let s = Semigroup::generate(&generators(&[3, 5]), 20).unwrap();
        let members: Vec<u64> = s.iter().collect();
        assert_eq!(
            members,
            vec![0, 3, 5, 6, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20]
        );
        assert!(!s.contains(7));
        assert!(s.contains(8));
    }

    #[test]
    fn membership_above_bound_is_absent() {
        let s = Semigroup::generate(&generators(&[1]), 10).unwrap();
        assert!(s.contains(10));
        assert!(!s.contains(11));
        assert!(!s.contains(u64::MAX));
    }

    #[test]
    fn zero_is_always_a_member() {
        let s = Semigroup::generate(&generators(&[7]), 0).unwrap();
        assert!(s.contains(0));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn generators_larger_than_the_bound_add_nothing() {
        let s = Semigroup::generate(&generators(&[3, 1_000_000]), 9).unwrap();
        let members: Vec<u64> = s.iter().collect();
        assert_eq!(members, vec![0, 3, 6, 9]);
    }

    #[test]
    fn oversized_bound_is_rejected() {
        let err = Semigroup::generate(&generators(&[2]), MAX_CLOSURE_BOUND + 1).unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
    }
}
