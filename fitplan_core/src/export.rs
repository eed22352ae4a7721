//! CSV export of a plan's meals.
//!
//! One row per food role: 4 meals x 2 options x 3 roles.

use crate::foods::FoodKnowledgeBase;
use crate::{FoodCategory, MealChoice, MealSlot, Plan, Result};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    meal: &'static str,
    option: &'static str,
    role: &'static str,
    food_key: &'a str,
    food: &'a str,
    amount: u32,
    unit: &'static str,
    label: String,
    protein_g: Option<f64>,
    carbs_g: Option<f64>,
    fat_g: Option<f64>,
    kcal: Option<f64>,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn rows<'a>(plan: &'a Plan, foods: &FoodKnowledgeBase) -> Vec<CsvRow<'a>> {
    let mut rows = Vec::with_capacity(24);
    for slot in MealSlot::ALL {
        let meal = plan.meals.get(slot);
        for choice in [MealChoice::A, MealChoice::B] {
            let option = meal.option(choice);
            for role in FoodCategory::ALL {
                let portion = option.portion(role);
                let food = foods.get(&portion.food_key);
                if food.is_none() {
                    tracing::warn!("Exporting {} without nutrition data", portion.food_key);
                }
                let macros = food.and_then(|f| f.macros_for(portion.quantity));
                let label = match food {
                    Some(f) => f.label(portion.quantity),
                    None => portion.quantity.amount().to_string(),
                };

                rows.push(CsvRow {
                    meal: slot.as_str(),
                    option: match choice {
                        MealChoice::A => "a",
                        MealChoice::B => "b",
                    },
                    role: role.as_str(),
                    food_key: &portion.food_key,
                    food: &portion.food_name,
                    amount: portion.quantity.amount(),
                    unit: match portion.quantity {
                        crate::Quantity::Grams(_) => "g",
                        crate::Quantity::Pieces(_) => "pieces",
                    },
                    label,
                    protein_g: macros.map(|m| round1(m.protein)),
                    carbs_g: macros.map(|m| round1(m.carbs)),
                    fat_g: macros.map(|m| round1(m.fat)),
                    kcal: macros.map(|m| round1(m.calories)),
                });
            }
        }
    }
    rows
}

/// Write every meal option of `plan` to a CSV file, replacing it
///
/// Returns the number of rows written.
pub fn write_meals_csv(plan: &Plan, foods: &FoodKnowledgeBase, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = std::fs::File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(file);

    let rows = rows(plan, foods);
    for row in &rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} meal rows to {:?}", rows.len(), path);
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foods::default_foods;
    use crate::plan::{generate_plan_for, GenerationContext};
    use crate::{ActivityLevel, BiometricProfile, Config, Goal, Sex};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn reference_plan() -> Plan {
        let config = Config::default();
        let ctx = GenerationContext::with_defaults(&config);
        let profile = BiometricProfile {
            weight_kg: 80.0,
            height_cm: 180.0,
            age: 30,
            sex: Sex::Male,
            activity_level: ActivityLevel::Moderate,
            goal: Goal::Lose,
        };
        generate_plan_for(&profile, &ctx, &mut StdRng::seed_from_u64(3)).unwrap()
    }

    #[test]
    fn test_export_writes_all_roles() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("out").join("meals.csv");

        let count = write_meals_csv(&reference_plan(), default_foods(), &csv_path).unwrap();
        assert_eq!(count, 24);

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec![
                "meal", "option", "role", "food_key", "food", "amount", "unit", "label",
                "protein_g", "carbs_g", "fat_g", "kcal"
            ]
        );

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 24);
        assert_eq!(&records[0][0], "breakfast");
        assert_eq!(&records[0][3], "egg");
        assert_eq!(&records[0][6], "pieces");
        assert_eq!(&records[0][7], "6 eggs");
        assert_eq!(records[0][8].parse::<f64>().unwrap(), 39.0);
    }

    #[test]
    fn test_export_replaces_existing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("meals.csv");
        let plan = reference_plan();

        write_meals_csv(&plan, default_foods(), &csv_path).unwrap();
        write_meals_csv(&plan, default_foods(), &csv_path).unwrap();

        let reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.into_records().count(), 24);
    }

    #[test]
    fn test_unknown_food_exports_blank_macros() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("meals.csv");
        let mut plan = reference_plan();
        plan.meals.lunch.options[0].fat.food_key = "ghee".into();

        write_meals_csv(&plan, default_foods(), &csv_path).unwrap();

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let row = reader
            .records()
            .map(|r| r.unwrap())
            .find(|r| &r[3] == "ghee")
            .unwrap();
        assert_eq!(&row[11], "");
    }
}
