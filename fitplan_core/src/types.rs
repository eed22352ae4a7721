//! Core domain types for the plan engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Biometric profile and derived macro targets
//! - Food items, quantities and portions
//! - Meals with their two precomputed options
//! - Workout days and the assembled plan document

use serde::{Deserialize, Serialize};

// ============================================================================
// Profile Types
// ============================================================================

/// Biological sex used by the BMR formula and the workout templates
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

/// Self-reported activity level, mapped to a TDEE multiplier
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    #[serde(alias = "veryActive", alias = "very-active")]
    VeryActive,
}

/// Body composition goal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

/// A complete, validated biometric profile
///
/// Built from a [`crate::profile::ProfileDraft`]; every field is guaranteed
/// present and within range.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BiometricProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub sex: Sex,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

/// Daily calorie and macro targets
///
/// `protein_grams * 4 + fat_grams * 9 + carb_grams * 4` approximates
/// `calories`; carbs are the residual and never negative.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MacroTargets {
    pub calories: u32,
    pub protein_grams: u32,
    pub fat_grams: u32,
    pub carb_grams: u32,
}

impl MacroTargets {
    /// Calories implied by the macro grams
    pub fn macro_calories(&self) -> u32 {
        self.protein_grams * 4 + self.fat_grams * 9 + self.carb_grams * 4
    }
}

// ============================================================================
// Food Types
// ============================================================================

/// Macro category of a food, and the role it plays inside a meal option
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    Protein,
    #[serde(alias = "carb")]
    Carbs,
    #[serde(alias = "fat")]
    Fats,
}

impl FoodCategory {
    pub const ALL: [FoodCategory; 3] = [
        FoodCategory::Protein,
        FoodCategory::Carbs,
        FoodCategory::Fats,
    ];

    /// The macro a food in this category is sized by
    pub fn primary_macro(self) -> Macro {
        match self {
            FoodCategory::Protein => Macro::Protein,
            FoodCategory::Carbs => Macro::Carbs,
            FoodCategory::Fats => Macro::Fat,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FoodCategory::Protein => "protein",
            FoodCategory::Carbs => "carbs",
            FoodCategory::Fats => "fats",
        }
    }
}

/// A single macronutrient
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Macro {
    Protein,
    Carbs,
    Fat,
}

/// Whether a food's density is expressed per 100 g or per discrete piece
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Per100g,
    PerPiece,
}

/// Nutrients contained in one unit (100 g or one piece) of a food
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct NutrientDensity {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub calories: f64,
}

impl NutrientDensity {
    pub fn of(&self, m: Macro) -> f64 {
        match m {
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fat => self.fat,
        }
    }
}

/// A knowledge base entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FoodItem {
    pub key: String,
    pub display_name: String,
    pub category: FoodCategory,
    pub unit: UnitKind,
    pub density: NutrientDensity,
    /// Only set for `PerPiece` foods
    pub grams_per_piece: Option<f64>,
    /// Singular name of one piece, e.g. "egg"
    pub piece_name: Option<String>,
}

/// Absolute macro amounts for a concrete quantity of food
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub calories: f64,
}

impl Macros {
    pub fn of(&self, m: Macro) -> f64 {
        match m {
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fat => self.fat,
        }
    }
}

impl std::ops::Add for Macros {
    type Output = Macros;

    fn add(self, other: Macros) -> Macros {
        Macros {
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
            calories: self.calories + other.calories,
        }
    }
}

/// Amount of a food, either continuous grams or discrete pieces
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "unit", content = "amount", rename_all = "snake_case")]
pub enum Quantity {
    Grams(u32),
    Pieces(u32),
}

impl Quantity {
    pub fn amount(&self) -> u32 {
        match self {
            Quantity::Grams(n) | Quantity::Pieces(n) => *n,
        }
    }
}

/// A food and how much of it to eat
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FoodPortion {
    pub food_key: String,
    pub food_name: String,
    pub quantity: Quantity,
}

// ============================================================================
// Meal Types
// ============================================================================

/// The four fixed daily meal slots
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    #[serde(alias = "snack")]
    Meal4,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Meal4,
    ];

    /// Share of the daily targets allocated to this slot
    pub fn ratio(self) -> f64 {
        match self {
            MealSlot::Breakfast => 0.25,
            MealSlot::Lunch => 0.30,
            MealSlot::Dinner => 0.25,
            MealSlot::Meal4 => 0.20,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
            MealSlot::Meal4 => "Meal 4",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Meal4 => "meal4",
        }
    }
}

/// Which of the two precomputed alternatives of a meal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MealChoice {
    A,
    B,
}

impl MealChoice {
    pub fn index(self) -> usize {
        match self {
            MealChoice::A => 0,
            MealChoice::B => 1,
        }
    }
}

/// One composition of a meal: a protein, a carb and a fat source
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MealOption {
    pub protein: FoodPortion,
    pub carb: FoodPortion,
    pub fat: FoodPortion,
}

impl MealOption {
    pub fn portion(&self, role: FoodCategory) -> &FoodPortion {
        match role {
            FoodCategory::Protein => &self.protein,
            FoodCategory::Carbs => &self.carb,
            FoodCategory::Fats => &self.fat,
        }
    }

    pub fn portion_mut(&mut self, role: FoodCategory) -> &mut FoodPortion {
        match role {
            FoodCategory::Protein => &mut self.protein,
            FoodCategory::Carbs => &mut self.carb,
            FoodCategory::Fats => &mut self.fat,
        }
    }
}

/// A meal always carries exactly two alternatives
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    pub title: String,
    pub options: [MealOption; 2],
}

impl Meal {
    pub fn option(&self, choice: MealChoice) -> &MealOption {
        &self.options[choice.index()]
    }
}

/// The day's meals keyed by slot
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Meals {
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
    pub meal4: Meal,
}

impl Meals {
    pub fn get(&self, slot: MealSlot) -> &Meal {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
            MealSlot::Meal4 => &self.meal4,
        }
    }

    pub fn get_mut(&mut self, slot: MealSlot) -> &mut Meal {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
            MealSlot::Meal4 => &mut self.meal4,
        }
    }
}

// ============================================================================
// Workout Types
// ============================================================================

/// A scheduled exercise with its resolved demonstration video
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub video_url: Option<String>,
}

/// Kind of conditioning work attached to a day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CardioKind {
    SteadyState,
    Hiit,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Cardio {
    #[serde(rename = "type")]
    pub kind: CardioKind,
    pub duration_minutes: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutDay {
    pub day_label: String,
    pub title: String,
    pub gym_exercises: Vec<Exercise>,
    pub home_exercises: Vec<Exercise>,
    pub cardio: Option<Cardio>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutPlan {
    pub days: Vec<WorkoutDay>,
}

// ============================================================================
// Plan Document
// ============================================================================

/// The complete generated plan, persisted as an opaque document
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    pub calories: u32,
    pub protein: u32,
    pub fat: u32,
    pub carbs: u32,
    pub meals: Meals,
    pub workout: WorkoutPlan,
}

impl Plan {
    /// The headline numbers read by overview screens
    pub fn targets(&self) -> MacroTargets {
        MacroTargets {
            calories: self.calories,
            protein_grams: self.protein,
            fat_grams: self.fat,
            carb_grams: self.carbs,
        }
    }
}
