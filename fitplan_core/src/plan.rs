//! Plan assembly.
//!
//! Validates the stored profile, derives macro targets, then composes the
//! meals (from the targets) and the workout week (from sex and goal only)
//! into one plan document.

use crate::config::Config;
use crate::exercises::{default_exercises, ExerciseLibrary};
use crate::foods::{default_foods, FoodKnowledgeBase};
use crate::macros::calculate_targets;
use crate::meals::compose_meals;
use crate::profile::ProfileDraft;
use crate::workout::compose_workout;
use crate::{BiometricProfile, Plan, Result};
use rand::Rng;

/// Read-only inputs shared by every generation
#[derive(Clone, Copy, Debug)]
pub struct GenerationContext<'a> {
    pub foods: &'a FoodKnowledgeBase,
    pub exercises: &'a ExerciseLibrary,
    pub config: &'a Config,
}

impl<'a> GenerationContext<'a> {
    /// Context over the built-in food and exercise tables
    pub fn with_defaults(config: &'a Config) -> Self {
        Self {
            foods: default_foods(),
            exercises: default_exercises(),
            config,
        }
    }
}

/// Generate a plan from a stored, possibly incomplete profile
///
/// Fails with `IncompleteProfile` before any computation when a required
/// field is missing.
pub fn generate_plan<R: Rng + ?Sized>(
    draft: &ProfileDraft,
    ctx: &GenerationContext<'_>,
    rng: &mut R,
) -> Result<Plan> {
    let profile = BiometricProfile::try_from(draft)?;
    generate_plan_for(&profile, ctx, rng)
}

/// Generate a plan from a validated profile
pub fn generate_plan_for<R: Rng + ?Sized>(
    profile: &BiometricProfile,
    ctx: &GenerationContext<'_>,
    rng: &mut R,
) -> Result<Plan> {
    let targets = calculate_targets(profile, &ctx.config.nutrition);
    let meals = compose_meals(ctx.foods, &targets, profile.goal, rng)?;
    let workout = compose_workout(ctx.exercises, profile.sex, profile.goal, &ctx.config.workout);

    tracing::info!(
        "Generated plan: {} kcal (P {}g / F {}g / C {}g), {} workout days",
        targets.calories,
        targets.protein_grams,
        targets.fat_grams,
        targets.carb_grams,
        workout.days.len()
    );

    Ok(Plan {
        calories: targets.calories,
        protein: targets.protein_grams,
        fat: targets.fat_grams,
        carbs: targets.carb_grams,
        meals,
        workout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActivityLevel, Error, Goal, MacroTargets, Quantity, Sex};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn reference_draft() -> ProfileDraft {
        ProfileDraft {
            weight_kg: Some(80.0),
            height_cm: Some(180.0),
            age: Some(30),
            sex: Some(Sex::Male),
            activity_level: Some(ActivityLevel::Moderate),
            goal: Some(Goal::Lose),
        }
    }

    #[test]
    fn test_reference_plan() {
        crate::logging::init_test();
        let config = Config::default();
        let ctx = GenerationContext::with_defaults(&config);
        let plan = generate_plan(&reference_draft(), &ctx, &mut StdRng::seed_from_u64(9)).unwrap();

        assert_eq!(
            plan.targets(),
            MacroTargets {
                calories: 2259,
                protein_grams: 160,
                fat_grams: 64,
                carb_grams: 261,
            }
        );
        assert_eq!(plan.meals.breakfast.options[0].protein.quantity, Quantity::Pieces(6));
        assert_eq!(plan.workout.days.len(), 6);
        assert_eq!(plan.workout.days[5].title, "HIIT");
    }

    #[test]
    fn test_incomplete_profile_fails_fast() {
        let config = Config::default();
        let ctx = GenerationContext::with_defaults(&config);
        let draft = ProfileDraft {
            goal: None,
            ..reference_draft()
        };

        match generate_plan(&draft, &ctx, &mut StdRng::seed_from_u64(1)) {
            Err(Error::IncompleteProfile { missing }) => assert_eq!(missing, vec!["goal"]),
            other => panic!("expected IncompleteProfile, got {:?}", other),
        }
    }

    #[test]
    fn test_idempotent_apart_from_fruit() {
        let config = Config::default();
        let ctx = GenerationContext::with_defaults(&config);
        let draft = ProfileDraft {
            goal: Some(Goal::Maintain),
            sex: Some(Sex::Female),
            ..reference_draft()
        };

        let first = generate_plan(&draft, &ctx, &mut rand::thread_rng()).unwrap();
        let second = generate_plan(&draft, &ctx, &mut rand::thread_rng()).unwrap();

        assert_eq!(first.targets(), second.targets());
        assert_eq!(first.workout, second.workout);
        assert_eq!(first.meals.breakfast, second.meals.breakfast);
        assert_eq!(first.meals.lunch, second.meals.lunch);
        assert_eq!(first.meals.dinner, second.meals.dinner);
        assert_eq!(first.meals.meal4.options[0].protein, second.meals.meal4.options[0].protein);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let config = Config::default();
        let ctx = GenerationContext::with_defaults(&config);
        let a = generate_plan(&reference_draft(), &ctx, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate_plan(&reference_draft(), &ctx, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_plan_serializes_as_document() {
        let config = Config::default();
        let ctx = GenerationContext::with_defaults(&config);
        let plan = generate_plan(&reference_draft(), &ctx, &mut StdRng::seed_from_u64(5)).unwrap();

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["calories"], 2259);
        assert_eq!(json["meals"]["breakfast"]["options"][0]["protein"]["quantity"]["unit"], "pieces");
        assert_eq!(json["workout"]["days"][0]["cardio"]["type"], "steady_state");

        let back: Plan = serde_json::from_value(json).unwrap();
        assert_eq!(back, plan);
    }
}
