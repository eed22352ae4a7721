//! Session-scoped swap overrides.
//!
//! A [`PlanPatch`] is a sparse set of replacement portions keyed by
//! (meal slot, option, role). It is layered over a base plan at render time
//! and never written back to the stored plan document.

use crate::foods::FoodKnowledgeBase;
use crate::solver::{solve_equivalent_quantity, SolvedQuantity, SubstitutionSource};
use crate::{Error, FoodCategory, FoodPortion, MealChoice, MealSlot, Plan, Result};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Address of one food role inside a plan
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatchKey {
    pub slot: MealSlot,
    pub choice: MealChoice,
    pub role: FoodCategory,
}

impl PatchKey {
    pub fn new(slot: MealSlot, choice: MealChoice, role: FoodCategory) -> Self {
        Self { slot, choice, role }
    }
}

impl FromStr for MealSlot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            "meal4" | "meal 4" | "snack" => Ok(MealSlot::Meal4),
            _ => Err(Error::UnknownMealSlot(s.to_string())),
        }
    }
}

impl FromStr for MealChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "a" | "1" => Ok(MealChoice::A),
            "b" | "2" => Ok(MealChoice::B),
            _ => Err(Error::Other(format!("Unknown meal option: {} (expected a or b)", s))),
        }
    }
}

impl FromStr for FoodCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "protein" => Ok(FoodCategory::Protein),
            "carb" | "carbs" => Ok(FoodCategory::Carbs),
            "fat" | "fats" => Ok(FoodCategory::Fats),
            _ => Err(Error::Other(format!("Unknown food category: {}", s))),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanPatch {
    overrides: BTreeMap<PatchKey, FoodPortion>,
}

impl PlanPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: PatchKey, portion: FoodPortion) {
        self.overrides.insert(key, portion);
    }

    pub fn remove(&mut self, key: &PatchKey) -> Option<FoodPortion> {
        self.overrides.remove(key)
    }

    pub fn get(&self, key: &PatchKey) -> Option<&FoodPortion> {
        self.overrides.get(key)
    }

    pub fn clear(&mut self) {
        self.overrides.clear();
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// The portion shown for a key: the override if any, else the base plan's
    pub fn effective<'a>(&'a self, plan: &'a Plan, key: &PatchKey) -> &'a FoodPortion {
        self.overrides.get(key).unwrap_or_else(|| {
            plan.meals
                .get(key.slot)
                .option(key.choice)
                .portion(key.role)
        })
    }

    /// Render a copy of `plan` with every override applied
    pub fn apply(&self, plan: &Plan) -> Plan {
        let mut patched = plan.clone();
        for (key, portion) in &self.overrides {
            *patched.meals.get_mut(key.slot).options[key.choice.index()].portion_mut(key.role) =
                portion.clone();
        }
        patched
    }

    /// Swap the food at `key` for `target_key`, sized by the equivalence
    /// solver against the portion currently shown
    ///
    /// Returns None, leaving the patch untouched, when no equivalence exists.
    pub fn swap(
        &mut self,
        foods: &FoodKnowledgeBase,
        plan: &Plan,
        key: PatchKey,
        target_key: &str,
    ) -> Option<SolvedQuantity> {
        let current = self.effective(plan, &key);
        let source = SubstitutionSource::from((current, key.role));
        let solved = solve_equivalent_quantity(foods, &source, target_key)?;

        tracing::debug!(
            "Swap {:?}: {} -> {} ({})",
            key,
            source.food_key,
            solved.food_key,
            solved.label
        );
        self.set(key, solved.portion());
        Some(solved)
    }
}
