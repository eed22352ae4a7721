//! Food quantity solvers.
//!
//! Two independent solvers back the swap drawer and the meal builder:
//!
//! - **Equivalence**: replace a source food and quantity with another food,
//!   holding the anchor macro (protein by default) constant. Grams are
//!   rounded to the nearest 5 g with a 5 g floor; pieces are rounded with a
//!   floor of one.
//! - **Target quantity**: size a freely picked food directly from a macro
//!   target. Grams are clamped to a per-category range and floored to 5 g
//!   steps; pieces are floored with a floor of one. This solver biases under
//!   target while the equivalence solver is unbiased.
//!
//! An unknown food or a zero anchor density is a normal "no result" outcome,
//! so the public entry points return `Option`.

use crate::foods::FoodKnowledgeBase;
use crate::{FoodCategory, FoodItem, FoodPortion, Macro, Macros, Quantity, UnitKind};
use serde::{Deserialize, Serialize};

/// Gram snapping step shared by both solvers
const GRAM_STEP: f64 = 5.0;

/// Why a solver produced no quantity
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SolveFailure {
    #[error("unknown food '{0}'")]
    UnknownFood(String),

    #[error("food '{food_key}' has no {anchor:?} to match on")]
    ZeroDensity { food_key: String, anchor: Macro },

    #[error("quantity of '{0}' cannot be converted to its density unit")]
    UnitMismatch(String),
}

/// The food being replaced
///
/// `category` is the meal role the food fills. Swaps anchor on protein unless
/// the caller asks for the role's own macro via [`solve_equivalent_in_category`].
#[derive(Clone, Debug, PartialEq)]
pub struct SubstitutionSource {
    pub food_key: String,
    pub quantity: Quantity,
    pub category: FoodCategory,
}

impl SubstitutionSource {
    pub fn new(food_key: impl Into<String>, quantity: Quantity, category: FoodCategory) -> Self {
        Self {
            food_key: food_key.into(),
            quantity,
            category,
        }
    }

    /// Primary macro of the role this food fills
    pub fn category_anchor(&self) -> Macro {
        self.category.primary_macro()
    }
}

impl From<(&FoodPortion, FoodCategory)> for SubstitutionSource {
    fn from((portion, category): (&FoodPortion, FoodCategory)) -> Self {
        Self::new(portion.food_key.clone(), portion.quantity, category)
    }
}

/// A solved quantity with its macro breakdown for display
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolvedQuantity {
    pub food_key: String,
    pub food_name: String,
    pub quantity: Quantity,
    pub label: String,
    pub macros: Macros,
}

impl SolvedQuantity {
    fn new(food: &FoodItem, quantity: Quantity) -> Self {
        Self {
            food_key: food.key.clone(),
            food_name: food.display_name.clone(),
            quantity,
            label: food.label(quantity),
            macros: food.macros_for(quantity).unwrap_or_default(),
        }
    }

    pub fn portion(&self) -> FoodPortion {
        FoodPortion {
            food_key: self.food_key.clone(),
            food_name: self.food_name.clone(),
            quantity: self.quantity,
        }
    }
}

/// Allowed gram range per category for the target quantity solver
pub fn category_range(category: FoodCategory) -> (f64, f64) {
    match category {
        FoodCategory::Protein => (60.0, 220.0),
        FoodCategory::Carbs => (40.0, 300.0),
        FoodCategory::Fats => (5.0, 60.0),
    }
}

fn lookup<'a>(foods: &'a FoodKnowledgeBase, key: &str) -> Result<&'a FoodItem, SolveFailure> {
    foods
        .get(key)
        .ok_or_else(|| SolveFailure::UnknownFood(key.to_string()))
}

fn anchor_density(food: &FoodItem, anchor: Macro) -> Result<f64, SolveFailure> {
    let density = food.density.of(anchor);
    if density > 0.0 {
        Ok(density)
    } else {
        Err(SolveFailure::ZeroDensity {
            food_key: food.key.clone(),
            anchor,
        })
    }
}

/// Equivalent quantity of `target_key`, anchored on protein
pub fn solve_equivalent_quantity(
    foods: &FoodKnowledgeBase,
    source: &SubstitutionSource,
    target_key: &str,
) -> Option<SolvedQuantity> {
    solve_equivalent_quantity_with_anchor(foods, source, target_key, Macro::Protein)
}

/// Equivalent quantity of `target_key`, anchored on an explicit macro
pub fn solve_equivalent_quantity_with_anchor(
    foods: &FoodKnowledgeBase,
    source: &SubstitutionSource,
    target_key: &str,
    anchor: Macro,
) -> Option<SolvedQuantity> {
    match solve_equivalent_explained(foods, source, target_key, anchor) {
        Ok(solved) => Some(solved),
        Err(failure) => {
            tracing::debug!("No equivalence for {} -> {}: {}", source.food_key, target_key, failure);
            None
        }
    }
}

/// Equivalent quantity of `target_key`, anchored on the source's role macro
pub fn solve_equivalent_in_category(
    foods: &FoodKnowledgeBase,
    source: &SubstitutionSource,
    target_key: &str,
) -> Option<SolvedQuantity> {
    solve_equivalent_quantity_with_anchor(foods, source, target_key, source.category_anchor())
}

/// Equivalence solver reporting why no quantity could be found
pub fn solve_equivalent_explained(
    foods: &FoodKnowledgeBase,
    source: &SubstitutionSource,
    target_key: &str,
    anchor: Macro,
) -> Result<SolvedQuantity, SolveFailure> {
    let source_food = lookup(foods, &source.food_key)?;
    let target_food = lookup(foods, target_key)?;

    let anchor_grams = source_food
        .macros_for(source.quantity)
        .ok_or_else(|| SolveFailure::UnitMismatch(source.food_key.clone()))?
        .of(anchor);
    let density = anchor_density(target_food, anchor)?;

    let quantity = match target_food.unit {
        UnitKind::PerPiece => Quantity::Pieces(((anchor_grams / density).round() as u32).max(1)),
        UnitKind::Per100g => {
            let grams = (anchor_grams / density * 100.0 / GRAM_STEP).round() * GRAM_STEP;
            Quantity::Grams(grams.max(GRAM_STEP) as u32)
        }
    };

    tracing::debug!(
        "Equivalence: {:?} of {} ({:.1}g {:?}) -> {:?} of {}",
        source.quantity,
        source.food_key,
        anchor_grams,
        anchor,
        quantity,
        target_key
    );
    Ok(SolvedQuantity::new(target_food, quantity))
}

/// Quantity of `food_key` that supplies `target_macro_grams` of the
/// category's macro, for picks without a source food
pub fn solve_quantity_for_target(
    foods: &FoodKnowledgeBase,
    target_macro_grams: f64,
    food_key: &str,
    category: FoodCategory,
) -> Option<SolvedQuantity> {
    match solve_quantity_for_target_explained(foods, target_macro_grams, food_key, category) {
        Ok(solved) => Some(solved),
        Err(failure) => {
            tracing::debug!("No quantity for {}: {}", food_key, failure);
            None
        }
    }
}

/// Target quantity solver reporting why no quantity could be found
pub fn solve_quantity_for_target_explained(
    foods: &FoodKnowledgeBase,
    target_macro_grams: f64,
    food_key: &str,
    category: FoodCategory,
) -> Result<SolvedQuantity, SolveFailure> {
    let food = lookup(foods, food_key)?;
    let density = anchor_density(food, category.primary_macro())?;
    let target = target_macro_grams.max(0.0);

    let quantity = match food.unit {
        UnitKind::PerPiece => Quantity::Pieces(((target / density).floor() as u32).max(1)),
        UnitKind::Per100g => {
            let (min, max) = category_range(category);
            let grams = (target / density * 100.0).clamp(min, max);
            Quantity::Grams(((grams / GRAM_STEP).floor() * GRAM_STEP) as u32)
        }
    };

    Ok(SolvedQuantity::new(food, quantity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foods::default_foods;

    fn source(key: &str, quantity: Quantity, category: FoodCategory) -> SubstitutionSource {
        SubstitutionSource::new(key, quantity, category)
    }

    #[test]
    fn test_chicken_to_tuna() {
        let src = source("chicken_breast", Quantity::Grams(200), FoodCategory::Protein);
        let solved = solve_equivalent_quantity(default_foods(), &src, "tuna").unwrap();
        // 62 g protein / 26 g per 100 g = 238.5 g -> 240 g
        assert_eq!(solved.quantity, Quantity::Grams(240));
        assert_eq!(solved.label, "240g");
        assert!((solved.macros.protein - 62.4).abs() < 1e-9);
    }

    #[test]
    fn test_self_substitution_roundtrips() {
        let foods = default_foods();
        let cases = [
            ("chicken_breast", Quantity::Grams(200)),
            ("tuna", Quantity::Grams(150)),
            ("oats", Quantity::Grams(80)),
            ("egg", Quantity::Pieces(4)),
            ("whole_wheat_toast", Quantity::Pieces(3)),
            ("almonds", Quantity::Grams(30)),
        ];
        for (key, quantity) in cases {
            let food = foods.get(key).unwrap();
            let src = source(key, quantity, food.category);
            let solved = solve_equivalent_quantity(foods, &src, key).unwrap();
            assert_eq!(solved.quantity, quantity, "{}", key);
        }

        // Not on the 5 g grid: within one snapping step
        let src = source("greek_yogurt", Quantity::Grams(308), FoodCategory::Protein);
        let solved = solve_equivalent_quantity(foods, &src, "greek_yogurt").unwrap();
        assert_eq!(solved.quantity, Quantity::Grams(310));
    }

    #[test]
    fn test_pieces_never_below_one() {
        let src = source("strawberry", Quantity::Grams(10), FoodCategory::Carbs);
        let solved = solve_equivalent_quantity(default_foods(), &src, "egg").unwrap();
        assert_eq!(solved.quantity, Quantity::Pieces(1));
        assert_eq!(solved.label, "1 egg");
    }

    #[test]
    fn test_grams_never_below_five() {
        let src = source("watermelon", Quantity::Grams(20), FoodCategory::Carbs);
        let solved = solve_equivalent_quantity(default_foods(), &src, "whey_protein").unwrap();
        assert_eq!(solved.quantity, Quantity::Grams(5));
    }

    #[test]
    fn test_eggs_to_chicken() {
        let src = source("egg", Quantity::Pieces(6), FoodCategory::Protein);
        let solved = solve_equivalent_quantity(default_foods(), &src, "chicken_breast").unwrap();
        // 39 g protein / 31 = 125.8 g -> 125 g
        assert_eq!(solved.quantity, Quantity::Grams(125));
    }

    #[test]
    fn test_zero_density_and_unknown_food() {
        let foods = default_foods();
        let src = source("almonds", Quantity::Grams(30), FoodCategory::Fats);
        assert!(solve_equivalent_quantity(foods, &src, "olive_oil").is_none());
        assert_eq!(
            solve_equivalent_explained(foods, &src, "olive_oil", Macro::Protein),
            Err(SolveFailure::ZeroDensity {
                food_key: "olive_oil".into(),
                anchor: Macro::Protein,
            })
        );

        assert!(solve_equivalent_quantity(foods, &src, "unicorn_steak").is_none());
        let missing = source("unicorn_steak", Quantity::Grams(30), FoodCategory::Protein);
        assert_eq!(
            solve_equivalent_explained(foods, &missing, "tuna", Macro::Protein),
            Err(SolveFailure::UnknownFood("unicorn_steak".into()))
        );
    }

    #[test]
    fn test_fat_anchor_for_fat_swaps() {
        let src = source("almonds", Quantity::Grams(30), FoodCategory::Fats);
        // 14.7 g fat -> 14.7 g olive oil -> 15 g
        let solved =
            solve_equivalent_quantity_with_anchor(default_foods(), &src, "olive_oil", Macro::Fat)
                .unwrap();
        assert_eq!(solved.quantity, Quantity::Grams(15));

        assert_eq!(src.category_anchor(), Macro::Fat);
        assert_eq!(
            solve_equivalent_in_category(default_foods(), &src, "olive_oil"),
            Some(solved)
        );

        let protein = source("chicken_breast", Quantity::Grams(150), FoodCategory::Protein);
        assert_eq!(
            solve_equivalent_in_category(default_foods(), &protein, "tuna"),
            solve_equivalent_quantity(default_foods(), &protein, "tuna")
        );
    }

    #[test]
    fn test_target_quantity_floors_to_step() {
        let foods = default_foods();
        // 40 g protein / 31 = 129.03 g -> 125 g
        let solved =
            solve_quantity_for_target(foods, 40.0, "chicken_breast", FoodCategory::Protein).unwrap();
        assert_eq!(solved.quantity, Quantity::Grams(125));

        // 65 g carbs / 28 = 232.1 g -> 230 g
        let solved = solve_quantity_for_target(foods, 65.0, "white_rice", FoodCategory::Carbs).unwrap();
        assert_eq!(solved.quantity, Quantity::Grams(230));
    }

    #[test]
    fn test_target_quantity_clamped_to_category_range() {
        let foods = default_foods();
        let solved = solve_quantity_for_target(foods, 5.0, "tuna", FoodCategory::Protein).unwrap();
        assert_eq!(solved.quantity, Quantity::Grams(60));

        let solved = solve_quantity_for_target(foods, 200.0, "potato", FoodCategory::Carbs).unwrap();
        assert_eq!(solved.quantity, Quantity::Grams(300));

        let solved = solve_quantity_for_target(foods, 0.5, "olive_oil", FoodCategory::Fats).unwrap();
        assert_eq!(solved.quantity, Quantity::Grams(5));
    }

    #[test]
    fn test_target_quantity_pieces() {
        let foods = default_foods();
        // 40 / 6.5 = 6.15 -> 6 eggs
        let solved = solve_quantity_for_target(foods, 40.0, "egg", FoodCategory::Protein).unwrap();
        assert_eq!(solved.quantity, Quantity::Pieces(6));
        // 12.9 / 6.5 floors to 1 where the rounding solver would give 2
        let solved = solve_quantity_for_target(foods, 12.9, "egg", FoodCategory::Protein).unwrap();
        assert_eq!(solved.quantity, Quantity::Pieces(1));
        let solved = solve_quantity_for_target(foods, 1.0, "egg", FoodCategory::Protein).unwrap();
        assert_eq!(solved.quantity, Quantity::Pieces(1));
    }

    #[test]
    fn test_target_quantity_zero_density() {
        let foods = default_foods();
        assert!(solve_quantity_for_target(foods, 30.0, "olive_oil", FoodCategory::Protein).is_none());
        assert!(solve_quantity_for_target(foods, 30.0, "nope", FoodCategory::Protein).is_none());
    }
}
