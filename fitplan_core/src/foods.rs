//! Food knowledge base.
//!
//! Static nutrient densities for protein, carb and fat sources, plus a
//! free-text name lookup used to match user-authored meal descriptions.
//! Densities are per 100 g, or per piece for countable foods (eggs, bread
//! slices).

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};

/// Cached default knowledge base, built once and shared read-only
static DEFAULT_FOODS: Lazy<FoodKnowledgeBase> = Lazy::new(build_default_foods);

/// Get a reference to the cached default knowledge base
pub fn default_foods() -> &'static FoodKnowledgeBase {
    &DEFAULT_FOODS
}

/// Read-only table of foods keyed by stable identifier
#[derive(Clone, Debug, Default)]
pub struct FoodKnowledgeBase {
    foods: HashMap<String, FoodItem>,
    name_to_key: HashMap<String, String>,
}

impl FoodKnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a food; its key and display name become lookup aliases
    pub fn insert(&mut self, item: FoodItem) {
        self.name_to_key
            .insert(normalize_name(&item.key), item.key.clone());
        self.name_to_key
            .insert(normalize_name(&item.display_name), item.key.clone());
        self.foods.insert(item.key.clone(), item);
    }

    /// Register an extra free-text name for a food key
    pub fn alias(&mut self, name: &str, key: &str) {
        self.name_to_key.insert(normalize_name(name), key.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&FoodItem> {
        self.foods.get(key)
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    /// All foods of one category, ordered by key
    pub fn by_category(&self, category: FoodCategory) -> BTreeMap<&str, &FoodItem> {
        self.foods
            .iter()
            .filter(|(_, item)| item.category == category)
            .map(|(key, item)| (key.as_str(), item))
            .collect()
    }

    /// The name lookup table (normalized name -> key)
    pub fn name_to_key(&self) -> &HashMap<String, String> {
        &self.name_to_key
    }

    /// Resolve a free-text food name to a knowledge base entry
    ///
    /// An exact match on a normalized key or alias wins. Otherwise the
    /// longest alias appearing as whole words inside the text is used, so
    /// "2 slices of whole wheat toast" resolves to the toast entry.
    pub fn resolve_name(&self, text: &str) -> Option<&FoodItem> {
        let normalized = normalize_name(text);
        if normalized.is_empty() {
            return None;
        }

        if let Some(key) = self.name_to_key.get(&normalized) {
            return self.foods.get(key);
        }

        self.name_to_key
            .iter()
            .filter(|(alias, _)| contains_words(&normalized, alias))
            .max_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| b.cmp(a)))
            .and_then(|(_, key)| self.foods.get(key))
    }

    /// Validate the table for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (key, item) in &self.foods {
            if key.is_empty() || item.key.is_empty() {
                errors.push("Food has empty key".to_string());
            }
            if key != &item.key {
                errors.push(format!(
                    "Food key '{}' doesn't match item.key '{}'",
                    key, item.key
                ));
            }
            if item.display_name.is_empty() {
                errors.push(format!("Food '{}' has empty display name", key));
            }

            let d = &item.density;
            if d.protein < 0.0 || d.carbs < 0.0 || d.fat < 0.0 || d.calories < 0.0 {
                errors.push(format!("Food '{}' has a negative density", key));
            }
            if d.of(item.category.primary_macro()) <= 0.0 {
                errors.push(format!(
                    "Food '{}' has no {} content",
                    key,
                    item.category.as_str()
                ));
            }

            match (item.unit, item.grams_per_piece) {
                (UnitKind::PerPiece, None) => {
                    errors.push(format!("Per-piece food '{}' has no grams_per_piece", key));
                }
                (UnitKind::PerPiece, Some(g)) if g <= 0.0 => {
                    errors.push(format!("Food '{}' has non-positive grams_per_piece", key));
                }
                _ => {}
            }
        }

        for (alias, key) in &self.name_to_key {
            if !self.foods.contains_key(key) {
                errors.push(format!(
                    "Alias '{}' points to unknown food '{}'",
                    alias, key
                ));
            }
        }

        for category in FoodCategory::ALL {
            if self.by_category(category).is_empty() {
                errors.push(format!("No foods in category {}", category.as_str()));
            }
        }

        errors
    }
}

impl FoodItem {
    /// Number of density units (100 g blocks or pieces) in a quantity
    ///
    /// Returns None when converting between grams and pieces is impossible
    /// because the piece weight is unknown.
    pub fn units_in(&self, quantity: Quantity) -> Option<f64> {
        match (self.unit, quantity) {
            (UnitKind::Per100g, Quantity::Grams(g)) => Some(f64::from(g) / 100.0),
            (UnitKind::Per100g, Quantity::Pieces(n)) => self
                .grams_per_piece
                .map(|per_piece| f64::from(n) * per_piece / 100.0),
            (UnitKind::PerPiece, Quantity::Pieces(n)) => Some(f64::from(n)),
            (UnitKind::PerPiece, Quantity::Grams(g)) => self
                .grams_per_piece
                .filter(|per_piece| *per_piece > 0.0)
                .map(|per_piece| f64::from(g) / per_piece),
        }
    }

    /// Macro content of a quantity of this food
    pub fn macros_for(&self, quantity: Quantity) -> Option<Macros> {
        let units = self.units_in(quantity)?;
        Some(Macros {
            protein: self.density.protein * units,
            carbs: self.density.carbs * units,
            fat: self.density.fat * units,
            calories: self.density.calories * units,
        })
    }

    pub fn portion(&self, quantity: Quantity) -> FoodPortion {
        FoodPortion {
            food_key: self.key.clone(),
            food_name: self.display_name.clone(),
            quantity,
        }
    }

    /// Human-readable amount, e.g. "150g" or "3 eggs"
    pub fn label(&self, quantity: Quantity) -> String {
        match quantity {
            Quantity::Grams(g) => format!("{}g", g),
            Quantity::Pieces(n) => {
                let name = self.piece_name.as_deref().unwrap_or("pc");
                if n == 1 {
                    format!("1 {}", name)
                } else {
                    format!("{} {}s", n, name)
                }
            }
        }
    }
}

/// Lowercase, strip punctuation, collapse whitespace and underscores
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether `needle` occurs in `haystack` as whole words (a trailing plural
/// "s" or "es" on the last word still counts)
fn contains_words(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| c == ' ');
        let rest = &haystack[start + needle.len()..];
        let after_ok = rest.is_empty()
            || rest.starts_with(' ')
            || rest == "s"
            || rest.starts_with("s ")
            || rest == "es"
            || rest.starts_with("es ");
        before_ok && after_ok
    })
}

fn per_100g(
    key: &str,
    name: &str,
    category: FoodCategory,
    protein: f64,
    carbs: f64,
    fat: f64,
    calories: f64,
) -> FoodItem {
    FoodItem {
        key: key.into(),
        display_name: name.into(),
        category,
        unit: UnitKind::Per100g,
        density: NutrientDensity {
            protein,
            carbs,
            fat,
            calories,
        },
        grams_per_piece: None,
        piece_name: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn per_piece(
    key: &str,
    name: &str,
    category: FoodCategory,
    piece_name: &str,
    grams_per_piece: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    calories: f64,
) -> FoodItem {
    FoodItem {
        key: key.into(),
        display_name: name.into(),
        category,
        unit: UnitKind::PerPiece,
        density: NutrientDensity {
            protein,
            carbs,
            fat,
            calories,
        },
        grams_per_piece: Some(grams_per_piece),
        piece_name: Some(piece_name.into()),
    }
}

/// Builds the canonical food table
///
/// **Note**: For production use, prefer `default_foods()` which returns a
/// cached reference.
pub fn build_default_foods() -> FoodKnowledgeBase {
    use FoodCategory::{Carbs, Fats, Protein};

    let mut kb = FoodKnowledgeBase::new();

    // ========================================================================
    // Protein sources
    // ========================================================================

    // One egg is 50 g at 13 g protein / 100 g
    kb.insert(per_piece("egg", "Whole egg", Protein, "egg", 50.0, 6.5, 0.55, 5.5, 78.0));
    kb.insert(per_100g("egg_whites", "Egg whites", Protein, 11.0, 0.7, 0.2, 52.0));
    kb.insert(per_100g("chicken_breast", "Chicken breast", Protein, 31.0, 0.0, 3.6, 165.0));
    kb.insert(per_100g("turkey_breast", "Turkey breast", Protein, 29.0, 0.0, 1.5, 135.0));
    kb.insert(per_100g("lean_beef", "Lean beef", Protein, 26.0, 0.0, 10.0, 200.0));
    kb.insert(per_100g("tuna", "Tuna (in water)", Protein, 26.0, 0.0, 1.0, 116.0));
    kb.insert(per_100g("salmon", "Salmon", Protein, 20.0, 0.0, 13.0, 208.0));
    kb.insert(per_100g("white_fish", "White fish", Protein, 26.0, 0.0, 2.7, 128.0));
    kb.insert(per_100g("greek_yogurt", "Greek yogurt (0%)", Protein, 10.0, 3.6, 0.4, 59.0));
    kb.insert(per_100g("cottage_cheese", "Cottage cheese", Protein, 11.0, 3.4, 4.3, 98.0));
    kb.insert(per_100g("whey_protein", "Whey protein", Protein, 80.0, 8.0, 6.0, 400.0));
    kb.insert(per_100g("tofu", "Firm tofu", Protein, 8.0, 1.9, 4.8, 76.0));

    // ========================================================================
    // Carb sources
    // ========================================================================

    kb.insert(per_100g("oats", "Rolled oats", Carbs, 13.0, 66.0, 7.0, 389.0));
    kb.insert(per_piece(
        "whole_wheat_toast",
        "Whole wheat toast",
        Carbs,
        "slice",
        35.0,
        4.5,
        14.5,
        1.2,
        86.0,
    ));
    kb.insert(per_100g("white_rice", "White rice (cooked)", Carbs, 2.7, 28.0, 0.3, 130.0));
    kb.insert(per_100g("brown_rice", "Brown rice (cooked)", Carbs, 2.6, 23.0, 0.9, 112.0));
    kb.insert(per_100g("sweet_potato", "Sweet potato", Carbs, 1.6, 20.0, 0.1, 86.0));
    kb.insert(per_100g("potato", "Potato", Carbs, 2.0, 17.0, 0.1, 77.0));
    kb.insert(per_100g("pasta", "Pasta (cooked)", Carbs, 5.8, 31.0, 0.9, 158.0));
    kb.insert(per_100g("banana", "Banana", Carbs, 1.1, 23.0, 0.3, 89.0));
    kb.insert(per_100g("strawberry", "Strawberries", Carbs, 0.7, 7.7, 0.3, 32.0));
    kb.insert(per_100g("watermelon", "Watermelon", Carbs, 0.6, 7.6, 0.2, 30.0));
    kb.insert(per_100g("apple", "Apple", Carbs, 0.3, 14.0, 0.2, 52.0));

    // ========================================================================
    // Fat sources
    // ========================================================================

    kb.insert(per_100g("almonds", "Almonds", Fats, 21.0, 22.0, 49.0, 579.0));
    kb.insert(per_100g("mixed_nuts", "Mixed nuts", Fats, 20.0, 21.0, 54.0, 607.0));
    kb.insert(per_100g("walnuts", "Walnuts", Fats, 15.0, 14.0, 65.0, 654.0));
    kb.insert(per_100g("peanut_butter", "Peanut butter", Fats, 25.0, 20.0, 50.0, 588.0));
    kb.insert(per_100g("olive_oil", "Olive oil", Fats, 0.0, 0.0, 100.0, 884.0));
    kb.insert(per_100g("avocado", "Avocado", Fats, 2.0, 9.0, 15.0, 160.0));

    // ========================================================================
    // Free-text aliases
    // ========================================================================

    for (alias, key) in [
        ("eggs", "egg"),
        ("whole eggs", "egg"),
        ("egg white", "egg_whites"),
        ("chicken", "chicken_breast"),
        ("grilled chicken", "chicken_breast"),
        ("turkey", "turkey_breast"),
        ("beef", "lean_beef"),
        ("steak", "lean_beef"),
        ("canned tuna", "tuna"),
        ("fish", "white_fish"),
        ("tilapia", "white_fish"),
        ("cod", "white_fish"),
        ("yogurt", "greek_yogurt"),
        ("yoghurt", "greek_yogurt"),
        ("whey", "whey_protein"),
        ("protein powder", "whey_protein"),
        ("oatmeal", "oats"),
        ("toast", "whole_wheat_toast"),
        ("bread", "whole_wheat_toast"),
        ("whole wheat bread", "whole_wheat_toast"),
        ("rice", "white_rice"),
        ("brown rice", "brown_rice"),
        ("potatoes", "potato"),
        ("sweet potatoes", "sweet_potato"),
        ("spaghetti", "pasta"),
        ("strawberries", "strawberry"),
        ("nuts", "mixed_nuts"),
        ("almond", "almonds"),
        ("walnut", "walnuts"),
        ("pb", "peanut_butter"),
        ("peanut butter", "peanut_butter"),
        ("oil", "olive_oil"),
        ("evoo", "olive_oil"),
    ] {
        kb.alias(alias, key);
    }

    kb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_foods_validate() {
        let kb = build_default_foods();
        let errors = kb.validate();
        assert!(
            errors.is_empty(),
            "Default food table has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_categories_populated() {
        let kb = default_foods();
        assert!(kb.by_category(FoodCategory::Protein).contains_key("chicken_breast"));
        assert!(kb.by_category(FoodCategory::Carbs).contains_key("oats"));
        assert!(kb.by_category(FoodCategory::Fats).contains_key("olive_oil"));
        assert!(!kb.by_category(FoodCategory::Fats).contains_key("egg"));
    }

    #[test]
    fn test_single_egg_model() {
        let kb = default_foods();
        let egg = kb.get("egg").unwrap();
        assert_eq!(egg.unit, UnitKind::PerPiece);
        // 50 g per egg at 13 g protein per 100 g
        let per_100g = egg.macros_for(Quantity::Grams(100)).unwrap();
        assert!((per_100g.protein - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_exact_and_alias() {
        let kb = default_foods();
        assert_eq!(kb.resolve_name("chicken_breast").unwrap().key, "chicken_breast");
        assert_eq!(kb.resolve_name("Chicken Breast").unwrap().key, "chicken_breast");
        assert_eq!(kb.resolve_name("PB").unwrap().key, "peanut_butter");
        assert_eq!(kb.resolve_name("Tuna (in water)").unwrap().key, "tuna");
    }

    #[test]
    fn test_resolve_fuzzy_prefers_longest_alias() {
        let kb = default_foods();
        assert_eq!(
            kb.resolve_name("2 slices of whole wheat bread").unwrap().key,
            "whole_wheat_toast"
        );
        assert_eq!(kb.resolve_name("baked sweet potatoes").unwrap().key, "sweet_potato");
        assert_eq!(kb.resolve_name("boiled chicken with rice").unwrap().key, "chicken_breast");
        assert_eq!(kb.resolve_name("3 scrambled eggs").unwrap().key, "egg");
    }

    #[test]
    fn test_resolve_requires_word_boundaries() {
        let kb = default_foods();
        // "oil" inside "boiled" must not match olive oil
        assert!(kb.resolve_name("boiled").is_none());
        assert!(kb.resolve_name("").is_none());
        assert!(kb.resolve_name("quinoa").is_none());
    }

    #[test]
    fn test_labels() {
        let kb = default_foods();
        let egg = kb.get("egg").unwrap();
        assert_eq!(egg.label(Quantity::Pieces(1)), "1 egg");
        assert_eq!(egg.label(Quantity::Pieces(3)), "3 eggs");
        let toast = kb.get("whole_wheat_toast").unwrap();
        assert_eq!(toast.label(Quantity::Pieces(2)), "2 slices");
        let rice = kb.get("white_rice").unwrap();
        assert_eq!(rice.label(Quantity::Grams(180)), "180g");
    }

    #[test]
    fn test_unit_conversion() {
        let kb = default_foods();
        let toast = kb.get("whole_wheat_toast").unwrap();
        assert_eq!(toast.units_in(Quantity::Grams(70)), Some(2.0));

        let oats = kb.get("oats").unwrap();
        assert_eq!(oats.units_in(Quantity::Pieces(2)), None);
        let m = oats.macros_for(Quantity::Grams(50)).unwrap();
        assert!((m.carbs - 33.0).abs() < 1e-9);
    }

    #[test]
    fn test_validation_catches_bad_entries() {
        let mut kb = build_default_foods();
        let mut broken = kb.get("egg").unwrap().clone();
        broken.key = "broken_egg".into();
        broken.grams_per_piece = None;
        kb.insert(broken);
        kb.alias("ghost", "does_not_exist");

        let errors = kb.validate();
        assert!(errors.iter().any(|e| e.contains("broken_egg")));
        assert!(errors.iter().any(|e| e.contains("does_not_exist")));
    }
}
