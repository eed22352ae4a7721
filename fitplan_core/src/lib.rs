#![forbid(unsafe_code)]

//! Core domain model and business logic for the fitplan generator.
//!
//! This crate provides:
//! - Domain types (profiles, foods, meals, workouts, plans)
//! - Macro target calculation
//! - Meal and workout composition
//! - Food equivalence solving and session-scoped swaps
//! - Persistence (plan store, generation log, CSV export)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod profile;
pub mod macros;
pub mod foods;
pub mod exercises;
pub mod meals;
pub mod workout;
pub mod plan;
pub mod solver;
pub mod patch;
pub mod store;
pub mod journal;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use profile::ProfileDraft;
pub use macros::calculate_targets;
pub use foods::{default_foods, FoodKnowledgeBase};
pub use exercises::{default_exercises, ExerciseLibrary};
pub use plan::{generate_plan, generate_plan_for, GenerationContext};
pub use solver::{
    solve_equivalent_in_category, solve_equivalent_quantity, solve_quantity_for_target,
    SolveFailure, SolvedQuantity, SubstitutionSource,
};
pub use patch::{PatchKey, PlanPatch};
pub use store::PlanStore;
pub use journal::{GenerationRecord, GenerationSink, JsonlLog};
pub use export::write_meals_csv;
