//! Generator declarations and the immutable generator table.
//!
//! An algebra is described by a finite ordered list of generators.
//! Non-central generators occupy the monomial slots of the PBW basis;
//! central generators never appear in a monomial — once a central
//! character is fixed they act as scalars, and the lift of the
//! structure constants replaces them by multiples of the vacuum.

use crate::error::{Result, VoaError};
use crate::scalar::Scalar;
use num_traits::Signed;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parity of a generator: even (bosonic) or odd (fermionic).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parity {
    /// Even generator: parts in its slot may repeat.
    Even,
    /// Odd generator: parts in its slot must be strictly decreasing.
    Odd,
}

impl Parity {
    /// `0` for even, `1` for odd.
    pub fn bit(self) -> u8 {
        match self {
            Parity::Even => 0,
            Parity::Odd => 1,
        }
    }
}

/// Declaration of one generator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratorSpec {
    /// Display name; also the key used by structure constants and
    /// central parameters.
    pub name: String,
    /// Conformal weight. `None` declares an ungraded generator; the
    /// algebra is graded only when every non-central generator carries
    /// a weight.
    pub weight: Option<Scalar>,
    /// Even or odd.
    pub parity: Parity,
    /// Whether the generator is central.
    pub central: bool,
}

impl GeneratorSpec {
    /// An even non-central generator of the given weight.
    pub fn even(name: &str, weight: Scalar) -> Self {
        GeneratorSpec {
            name: name.to_string(),
            weight: Some(weight),
            parity: Parity::Even,
            central: false,
        }
    }

    /// An odd non-central generator of the given weight.
    pub fn odd(name: &str, weight: Scalar) -> Self {
        GeneratorSpec {
            name: name.to_string(),
            weight: Some(weight),
            parity: Parity::Odd,
            central: false,
        }
    }

    /// An even non-central generator with no conformal weight.
    pub fn ungraded(name: &str) -> Self {
        GeneratorSpec {
            name: name.to_string(),
            weight: None,
            parity: Parity::Even,
            central: false,
        }
    }

    /// A central generator.
    pub fn central(name: &str) -> Self {
        GeneratorSpec {
            name: name.to_string(),
            weight: None,
            parity: Parity::Even,
            central: true,
        }
    }
}

/// Where a name resolves inside the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NameRef {
    /// Non-central generator at the given slot.
    Slot(usize),
    /// Central generator at the given position of the central list.
    Central(usize),
}

#[derive(Clone, Debug)]
pub(crate) struct SlotInfo {
    pub(crate) name: String,
    pub(crate) weight: Option<Scalar>,
    pub(crate) parity: Parity,
}

/// The immutable generator table of one algebra instance.
#[derive(Clone, Debug)]
pub(crate) struct GeneratorTable {
    slots: Vec<SlotInfo>,
    central: Vec<String>,
    by_name: HashMap<String, NameRef>,
    graded: bool,
}

impl GeneratorTable {
    pub(crate) fn new(specs: &[GeneratorSpec]) -> Result<Self> {
        let mut slots = Vec::new();
        let mut central = Vec::new();
        let mut by_name = HashMap::new();
        for spec in specs {
            if let Some(w) = &spec.weight {
                if !w.is_positive() {
                    return Err(VoaError::InvalidWeight(spec.name.clone()));
                }
            }
            let name_ref = if spec.central {
                central.push(spec.name.clone());
                NameRef::Central(central.len() - 1)
            } else {
                slots.push(SlotInfo {
                    name: spec.name.clone(),
                    weight: spec.weight.clone(),
                    parity: spec.parity,
                });
                NameRef::Slot(slots.len() - 1)
            };
            if by_name.insert(spec.name.clone(), name_ref).is_some() {
                return Err(VoaError::DuplicateGenerator(spec.name.clone()));
            }
        }
        let graded = slots.iter().all(|s| s.weight.is_some());
        Ok(GeneratorTable {
            slots,
            central,
            by_name,
            graded,
        })
    }

    pub(crate) fn n_slots(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn slot_name(&self, slot: usize) -> &str {
        &self.slots[slot].name
    }

    pub(crate) fn parity(&self, slot: usize) -> Parity {
        self.slots[slot].parity
    }

    /// Weight of the slot generator; only meaningful when graded.
    pub(crate) fn weight(&self, slot: usize) -> &Scalar {
        self.slots[slot]
            .weight
            .as_ref()
            .expect("weight queried on an ungraded generator")
    }

    pub(crate) fn weights(&self) -> Vec<Scalar> {
        self.slots
            .iter()
            .map(|s| s.weight.clone().expect("weights queried on an ungraded table"))
            .collect()
    }

    pub(crate) fn strict_flags(&self) -> Vec<bool> {
        self.slots.iter().map(|s| s.parity == Parity::Odd).collect()
    }

    pub(crate) fn is_graded(&self) -> bool {
        self.graded
    }

    pub(crate) fn central_names(&self) -> &[String] {
        &self.central
    }

    pub(crate) fn resolve(&self, name: &str) -> Result<NameRef> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| VoaError::UnknownGenerator(name.to_string()))
    }
}

/// The central character: one scalar per central generator. Missing
/// entries default to zero.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CentralParameters(HashMap<String, Scalar>);

impl CentralParameters {
    /// The all-zero character.
    pub fn new() -> Self {
        CentralParameters(HashMap::new())
    }

    /// Set the value of one central generator.
    pub fn set(&mut self, name: &str, value: Scalar) -> &mut Self {
        self.0.insert(name.to_string(), value);
        self
    }

    /// The value assigned to `name` (zero when unset).
    pub fn get(&self, name: &str) -> Scalar {
        self.0
            .get(name)
            .cloned()
            .unwrap_or_else(|| Scalar::from_integer(0.into()))
    }

    /// Check every key names a central generator of `table`.
    pub(crate) fn validate(&self, table: &GeneratorTable) -> Result<()> {
        for name in self.0.keys() {
            match table.resolve(name)? {
                NameRef::Central(_) => {}
                NameRef::Slot(_) => return Err(VoaError::NotCentral(name.clone())),
            }
        }
        Ok(())
    }
}
