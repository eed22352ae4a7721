//! Meal composition.
//!
//! The daily targets are split across four fixed slots. Each slot has two
//! predefined protein/carb/fat food triples; every role is sized from the
//! slot's target for that role's macro.

use crate::foods::FoodKnowledgeBase;
use crate::{
    Error, FoodCategory, FoodPortion, Goal, MacroTargets, Meal, MealOption, MealSlot, Meals,
    Quantity, Result, UnitKind,
};
use rand::Rng;

/// Per-meal share of the daily targets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MealTargets {
    pub calories: u32,
    pub protein_grams: u32,
    pub fat_grams: u32,
    pub carb_grams: u32,
}

impl MealTargets {
    pub fn grams_for(&self, role: FoodCategory) -> u32 {
        match role {
            FoodCategory::Protein => self.protein_grams,
            FoodCategory::Carbs => self.carb_grams,
            FoodCategory::Fats => self.fat_grams,
        }
    }
}

/// meal4 fat is kept within this range before sizing
const MEAL4_FAT_RANGE: (u32, u32) = (5, 20);

/// Carb role of a template: a fixed food or the slot's fruit pick
#[derive(Clone, Copy, Debug)]
enum CarbSource {
    Food(&'static str),
    Fruit,
}

#[derive(Clone, Copy, Debug)]
struct OptionTemplate {
    protein: &'static str,
    carb: CarbSource,
    fat: &'static str,
}

fn templates(slot: MealSlot) -> [OptionTemplate; 2] {
    use CarbSource::{Food, Fruit};

    match slot {
        MealSlot::Breakfast => [
            OptionTemplate {
                protein: "egg",
                carb: Food("oats"),
                fat: "almonds",
            },
            OptionTemplate {
                protein: "egg",
                carb: Food("whole_wheat_toast"),
                fat: "peanut_butter",
            },
        ],
        MealSlot::Lunch => [
            OptionTemplate {
                protein: "chicken_breast",
                carb: Food("white_rice"),
                fat: "olive_oil",
            },
            OptionTemplate {
                protein: "lean_beef",
                carb: Food("sweet_potato"),
                fat: "avocado",
            },
        ],
        MealSlot::Dinner => [
            OptionTemplate {
                protein: "tuna",
                carb: Food("potato"),
                fat: "olive_oil",
            },
            OptionTemplate {
                protein: "turkey_breast",
                carb: Food("pasta"),
                fat: "mixed_nuts",
            },
        ],
        MealSlot::Meal4 => [
            OptionTemplate {
                protein: "greek_yogurt",
                carb: Fruit,
                fat: "almonds",
            },
            OptionTemplate {
                protein: "cottage_cheese",
                carb: Fruit,
                fat: "peanut_butter",
            },
        ],
    }
}

/// Every food key the templates can reference, for table validation
pub fn referenced_foods() -> Vec<&'static str> {
    let mut keys = vec!["banana", "strawberry", "watermelon"];
    for slot in MealSlot::ALL {
        for template in templates(slot) {
            keys.push(template.protein);
            keys.push(template.fat);
            if let CarbSource::Food(key) = template.carb {
                keys.push(key);
            }
        }
    }
    keys.sort_unstable();
    keys.dedup();
    keys
}

/// Apply a slot's ratio to the daily targets
pub fn split_targets(targets: &MacroTargets, slot: MealSlot) -> MealTargets {
    let share = |value: u32| (f64::from(value) * slot.ratio()).round() as u32;
    MealTargets {
        calories: share(targets.calories),
        protein_grams: share(targets.protein_grams),
        fat_grams: share(targets.fat_grams),
        carb_grams: share(targets.carb_grams),
    }
}

/// meal4 carb source: banana when gaining, otherwise a coin flip
pub fn pick_fruit<R: Rng + ?Sized>(goal: Goal, rng: &mut R) -> &'static str {
    match goal {
        Goal::Gain => "banana",
        Goal::Lose | Goal::Maintain => {
            if rng.gen_bool(0.5) {
                "strawberry"
            } else {
                "watermelon"
            }
        }
    }
}

/// Size one role of a meal option from its macro target
///
/// - per 100 g: `round(target / density * 100)` grams
/// - per piece: `round(target / density)` pieces, at least one
pub fn size_portion(
    foods: &FoodKnowledgeBase,
    key: &str,
    role: FoodCategory,
    target_grams: u32,
) -> Result<FoodPortion> {
    let food = foods
        .get(key)
        .ok_or_else(|| Error::KnowledgeBase(format!("Meal template references unknown food '{}'", key)))?;

    let density = food.density.of(role.primary_macro());
    if density <= 0.0 {
        return Err(Error::KnowledgeBase(format!(
            "Food '{}' has no {} to size a {} portion",
            key,
            role.as_str(),
            role.as_str()
        )));
    }

    let target = f64::from(target_grams);
    let quantity = match food.unit {
        UnitKind::Per100g => Quantity::Grams((target / density * 100.0).round() as u32),
        UnitKind::PerPiece => Quantity::Pieces(((target / density).round() as u32).max(1)),
    };

    Ok(food.portion(quantity))
}

fn compose_option(
    foods: &FoodKnowledgeBase,
    template: &OptionTemplate,
    fruit: &str,
    targets: &MealTargets,
) -> Result<MealOption> {
    let carb_key = match template.carb {
        CarbSource::Food(key) => key,
        CarbSource::Fruit => fruit,
    };

    Ok(MealOption {
        protein: size_portion(foods, template.protein, FoodCategory::Protein, targets.protein_grams)?,
        carb: size_portion(foods, carb_key, FoodCategory::Carbs, targets.carb_grams)?,
        fat: size_portion(foods, template.fat, FoodCategory::Fats, targets.fat_grams)?,
    })
}

/// Compose one slot given an already chosen fruit
pub fn compose_meal(
    foods: &FoodKnowledgeBase,
    targets: &MacroTargets,
    slot: MealSlot,
    fruit: &str,
) -> Result<Meal> {
    let mut meal_targets = split_targets(targets, slot);
    if slot == MealSlot::Meal4 {
        let (lo, hi) = MEAL4_FAT_RANGE;
        meal_targets.fat_grams = meal_targets.fat_grams.clamp(lo, hi);
    }

    tracing::debug!(
        "{}: {} kcal, P {}g / F {}g / C {}g",
        slot.title(),
        meal_targets.calories,
        meal_targets.protein_grams,
        meal_targets.fat_grams,
        meal_targets.carb_grams
    );

    let [a, b] = templates(slot);
    Ok(Meal {
        title: slot.title().to_string(),
        options: [
            compose_option(foods, &a, fruit, &meal_targets)?,
            compose_option(foods, &b, fruit, &meal_targets)?,
        ],
    })
}

/// Compose all four meals for the day
pub fn compose_meals<R: Rng + ?Sized>(
    foods: &FoodKnowledgeBase,
    targets: &MacroTargets,
    goal: Goal,
    rng: &mut R,
) -> Result<Meals> {
    let fruit = pick_fruit(goal, rng);
    tracing::debug!("meal4 fruit: {}", fruit);

    Ok(Meals {
        breakfast: compose_meal(foods, targets, MealSlot::Breakfast, fruit)?,
        lunch: compose_meal(foods, targets, MealSlot::Lunch, fruit)?,
        dinner: compose_meal(foods, targets, MealSlot::Dinner, fruit)?,
        meal4: compose_meal(foods, targets, MealSlot::Meal4, fruit)?,
    })
}
