use crate::error::{AnalysisError, Result};
use crate::semigroup::Semigroup;
use serde::Serialize;

/// Apéry set of a semigroup with respect to a modulus: the smallest member
/// of every residue class, sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AperySet {
    modulus: u64,
    elements: Vec<u64>,
}

impl AperySet {
    pub fn compute(semigroup: &Semigroup, modulus: u64) -> Result<Self> {
        if modulus == 0 {
            return Err(AnalysisError::InvalidInput(
                "Apéry modulus must be positive".to_string(),
            ));
        }

        // Every member below the modulus is its own residue, so the first gap
        // in 1..=bound+1 is the first unrepresented residue. Bail out before
        // sizing a table by the modulus.
        if modulus > semigroup.bound() + 1 {
            let bound = semigroup.bound();
            let residue = (1..=bound + 1)
                .find(|&value| !semigroup.contains(value))
                .unwrap_or(bound + 1);
            return Err(AnalysisError::IncompleteClosure {
                residue,
                modulus,
                bound,
            });
        }

        let mut representatives: Vec<Option<u64>> = vec![None; modulus as usize];
        let mut found = 0usize;
        for member in semigroup.iter() {
            let slot = &mut representatives[(member % modulus) as usize];
            if slot.is_none() {
                *slot = Some(member);
                found += 1;
                if found == representatives.len() {
                    break;
                }
            }
        }

        let mut elements = Vec::with_capacity(representatives.len());
        for (residue, representative) in representatives.into_iter().enumerate() {
            match representative {
                Some(value) => elements.push(value),
                None => {
                    return Err(AnalysisError::IncompleteClosure {
                        residue: residue as u64,
                        modulus,
                        bound: semigroup.bound(),
                    })
                }
            }
        }
        elements.sort_unstable();

        log::debug!("Apéry set mod {}: {:?}", modulus, elements);

        Ok(Self { modulus, elements })
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Elements in ascending order.
    pub fn elements(&self) -> &[u64] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Smallest semigroup member congruent to `residue`.
    pub fn representative(&self, residue: u64) -> Option<u64> {
        if residue >= self.modulus {
            return None;
        }
        self.elements
            .iter()
            .copied()
            .find(|value| value % self.modulus == residue)
    }

    pub fn into_elements(self) -> Vec<u64> {
        self.elements
    }
}
