//! Calorie and macro target calculation.
//!
//! - BMR from the Mifflin-St Jeor equation
//! - TDEE as BMR scaled by an activity factor
//! - Goal adjustment (deficit / surplus) with a configurable floor
//! - Protein by bodyweight, fat by the larger of a bodyweight or calorie
//!   minimum, carbs as the residual

use crate::config::{CalorieFloor, NutritionConfig};
use crate::{ActivityLevel, BiometricProfile, Goal, MacroTargets, Sex};

/// Basal Metabolic Rate (kcal/day), Mifflin-St Jeor (1990)
///
/// - Men: `10w + 6.25h - 5a + 5`
/// - Women: `10w + 6.25h - 5a - 161`
pub fn bmr(profile: &BiometricProfile) -> f64 {
    let base = 10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * f64::from(profile.age);
    match profile.sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// TDEE multiplier for an activity level; unset levels use the sedentary factor
pub fn activity_factor(level: Option<ActivityLevel>) -> f64 {
    match level {
        Some(ActivityLevel::Sedentary) | None => 1.2,
        Some(ActivityLevel::Light) => 1.375,
        Some(ActivityLevel::Moderate) => 1.55,
        Some(ActivityLevel::Active) => 1.725,
        Some(ActivityLevel::VeryActive) => 1.9,
    }
}

/// Total Daily Energy Expenditure (kcal/day)
pub fn tdee(profile: &BiometricProfile) -> f64 {
    bmr(profile) * activity_factor(Some(profile.activity_level))
}

/// Protein grams per kg of bodyweight
pub fn protein_per_kg(goal: Goal) -> f64 {
    match goal {
        Goal::Lose => 2.0,
        Goal::Gain => 1.8,
        Goal::Maintain => 1.6,
    }
}

/// Daily calorie target after the goal adjustment, floored per config
pub fn calorie_target(profile: &BiometricProfile, config: &NutritionConfig) -> u32 {
    let tdee = tdee(profile);
    let adjusted = match profile.goal {
        Goal::Lose => tdee - config.deficit_kcal,
        Goal::Gain => tdee + config.surplus_kcal,
        Goal::Maintain => tdee,
    };

    let floor = match config.calorie_floor {
        CalorieFloor::Bmr => bmr(profile).round().max(0.0),
        CalorieFloor::None => 0.0,
    };

    let target = adjusted.round();
    if target < floor {
        tracing::debug!(
            "Calorie target {} below floor {}, clamping",
            target,
            floor
        );
    }
    target.max(floor) as u32
}

/// Derive the full set of daily targets from a profile
pub fn calculate_targets(profile: &BiometricProfile, config: &NutritionConfig) -> MacroTargets {
    let calories = calorie_target(profile, config);
    let protein = (profile.weight_kg * protein_per_kg(profile.goal)).round();

    let fat = (profile.weight_kg * config.fat_min_g_per_kg)
        .max(f64::from(calories) * config.fat_min_calorie_fraction / 9.0)
        .round();

    let carbs = ((f64::from(calories) - (protein * 4.0 + fat * 9.0)) / 4.0)
        .round()
        .max(0.0);

    let targets = MacroTargets {
        calories,
        protein_grams: protein as u32,
        fat_grams: fat as u32,
        carb_grams: carbs as u32,
    };

    tracing::debug!(
        "Targets: {} kcal, P {}g / F {}g / C {}g",
        targets.calories,
        targets.protein_grams,
        targets.fat_grams,
        targets.carb_grams
    );
    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(sex: Sex, activity_level: ActivityLevel, goal: Goal) -> BiometricProfile {
        BiometricProfile {
            weight_kg: 80.0,
            height_cm: 180.0,
            age: 30,
            sex,
            activity_level,
            goal,
        }
    }

    #[test]
    fn test_reference_male_cut() {
        let p = profile(Sex::Male, ActivityLevel::Moderate, Goal::Lose);
        assert_eq!(bmr(&p), 1780.0);
        assert!((tdee(&p) - 2759.0).abs() < 1e-6);

        let targets = calculate_targets(&p, &NutritionConfig::default());
        assert_eq!(
            targets,
            MacroTargets {
                calories: 2259,
                protein_grams: 160,
                fat_grams: 64,
                carb_grams: 261,
            }
        );
    }

    #[test]
    fn test_female_offset() {
        let male = profile(Sex::Male, ActivityLevel::Sedentary, Goal::Maintain);
        let female = profile(Sex::Female, ActivityLevel::Sedentary, Goal::Maintain);
        assert_eq!(bmr(&male) - bmr(&female), 166.0);
    }

    #[test]
    fn test_activity_factors() {
        assert_eq!(activity_factor(None), 1.2);
        assert_eq!(activity_factor(Some(ActivityLevel::Light)), 1.375);
        assert_eq!(activity_factor(Some(ActivityLevel::Active)), 1.725);
        assert_eq!(activity_factor(Some(ActivityLevel::VeryActive)), 1.9);
    }

    #[test]
    fn test_goal_adjustments() {
        let config = NutritionConfig::default();
        let maintain = calorie_target(&profile(Sex::Male, ActivityLevel::Moderate, Goal::Maintain), &config);
        let gain = calorie_target(&profile(Sex::Male, ActivityLevel::Moderate, Goal::Gain), &config);
        assert_eq!(maintain, 2759);
        assert_eq!(gain, 3059);
    }

    #[test]
    fn test_fat_uses_calorie_minimum_when_larger() {
        // 60 kg gain: fat by weight 48 g, by calories ~ 25% of intake
        let p = BiometricProfile {
            weight_kg: 60.0,
            height_cm: 175.0,
            age: 25,
            sex: Sex::Male,
            activity_level: ActivityLevel::VeryActive,
            goal: Goal::Gain,
        };
        let targets = calculate_targets(&p, &NutritionConfig::default());
        let by_calories = (f64::from(targets.calories) * 0.25 / 9.0).round() as u32;
        assert!(by_calories > 48);
        assert_eq!(targets.fat_grams, by_calories);
    }

    #[test]
    fn test_calorie_floor_at_bmr() {
        let p = BiometricProfile {
            weight_kg: 45.0,
            height_cm: 150.0,
            age: 70,
            sex: Sex::Female,
            activity_level: ActivityLevel::Sedentary,
            goal: Goal::Lose,
        };
        // BMR = 450 + 937.5 - 350 - 161 = 876.5
        let floored = calorie_target(&p, &NutritionConfig::default());
        assert_eq!(floored, 877);

        let config = NutritionConfig {
            calorie_floor: CalorieFloor::None,
            ..NutritionConfig::default()
        };
        // 876.5 * 1.2 - 500 = 551.8
        assert_eq!(calorie_target(&p, &config), 552);
    }

    #[test]
    fn test_macro_energy_balances_across_profiles() {
        let config = NutritionConfig::default();
        let levels = [
            ActivityLevel::Sedentary,
            ActivityLevel::Light,
            ActivityLevel::Moderate,
            ActivityLevel::Active,
            ActivityLevel::VeryActive,
        ];
        for sex in [Sex::Male, Sex::Female] {
            for level in levels {
                for goal in [Goal::Lose, Goal::Maintain, Goal::Gain] {
                    for weight in [50.0, 65.0, 80.0, 100.0, 120.0] {
                        for (height, age) in [(155.0, 22), (170.0, 35), (190.0, 55)] {
                            let p = BiometricProfile {
                                weight_kg: weight,
                                height_cm: height,
                                age,
                                sex,
                                activity_level: level,
                                goal,
                            };
                            let t = calculate_targets(&p, &config);
                            if t.carb_grams > 0 {
                                let diff = i64::from(t.macro_calories()) - i64::from(t.calories);
                                assert!(
                                    diff.abs() <= 4,
                                    "{:?} -> {:?} off by {} kcal",
                                    p,
                                    t,
                                    diff
                                );
                            } else {
                                assert!(t.macro_calories() + 4 >= t.calories);
                            }
                        }
                    }
                }
            }
        }
    }
}
