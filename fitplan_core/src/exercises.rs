//! Exercise library: stable exercise IDs mapped to display names and
//! demonstration videos.
//!
//! Workout templates reference exercises by ID, and resolution is a plain
//! key lookup.

use crate::Exercise;
use once_cell::sync::Lazy;
use std::collections::HashMap;

static DEFAULT_EXERCISES: Lazy<ExerciseLibrary> = Lazy::new(build_default_exercises);

/// Get a reference to the cached default exercise library
pub fn default_exercises() -> &'static ExerciseLibrary {
    &DEFAULT_EXERCISES
}

#[derive(Clone, Debug, Default)]
pub struct ExerciseLibrary {
    exercises: HashMap<String, Exercise>,
}

impl ExerciseLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, exercise: Exercise) {
        self.exercises.insert(exercise.id.clone(), exercise);
    }

    pub fn get(&self, id: &str) -> Option<&Exercise> {
        self.exercises.get(id)
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Resolve an ID for display
    ///
    /// Unknown IDs still render, using the ID as the name and no video.
    pub fn resolve(&self, id: &str) -> Exercise {
        match self.exercises.get(id) {
            Some(exercise) => exercise.clone(),
            None => {
                tracing::warn!("Exercise '{}' not in library, rendering without video", id);
                Exercise {
                    id: id.to_string(),
                    name: id.replace('_', " "),
                    video_url: None,
                }
            }
        }
    }

    /// Validate the library against a set of referenced IDs
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate<'a>(&self, referenced: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, exercise) in &self.exercises {
            if id.is_empty() || exercise.id.is_empty() {
                errors.push("Exercise has empty ID".to_string());
            }
            if id != &exercise.id {
                errors.push(format!(
                    "Exercise key '{}' doesn't match exercise.id '{}'",
                    id, exercise.id
                ));
            }
            if exercise.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", id));
            }
        }

        for id in referenced {
            if !self.exercises.contains_key(id) {
                errors.push(format!("Template references unknown exercise '{}'", id));
            }
        }

        errors
    }
}

/// YouTube search link for an exercise name
fn video_search_url(name: &str) -> String {
    let query: Vec<&str> = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    format!(
        "https://www.youtube.com/results?search_query={}+form",
        query.join("+").to_lowercase()
    )
}

fn exercise(id: &str, name: &str) -> Exercise {
    Exercise {
        id: id.into(),
        name: name.into(),
        video_url: Some(video_search_url(name)),
    }
}

/// Builds the default exercise library
pub fn build_default_exercises() -> ExerciseLibrary {
    let mut library = ExerciseLibrary::new();

    for (id, name) in [
        // Push
        ("bench_press", "Barbell Bench Press"),
        ("incline_db_press", "Incline Dumbbell Press"),
        ("overhead_press", "Overhead Press"),
        ("db_shoulder_press", "Dumbbell Shoulder Press"),
        ("lateral_raise", "Lateral Raise"),
        ("cable_fly", "Cable Fly"),
        ("triceps_pushdown", "Triceps Pushdown"),
        ("push_up", "Push-up"),
        ("pike_push_up", "Pike Push-up"),
        ("chair_dip", "Chair Dip"),
        // Pull
        ("deadlift", "Deadlift"),
        ("lat_pulldown", "Lat Pulldown"),
        ("barbell_row", "Barbell Row"),
        ("seated_cable_row", "Seated Cable Row"),
        ("face_pull", "Face Pull"),
        ("db_curl", "Dumbbell Curl"),
        ("band_row", "Resistance Band Row"),
        ("band_pulldown", "Resistance Band Pulldown"),
        ("backpack_row", "Backpack Row"),
        ("superman_hold", "Superman Hold"),
        // Lower
        ("back_squat", "Barbell Back Squat"),
        ("leg_press", "Leg Press"),
        ("romanian_deadlift", "Romanian Deadlift"),
        ("leg_curl", "Lying Leg Curl"),
        ("leg_extension", "Leg Extension"),
        ("walking_lunge", "Walking Lunge"),
        ("hip_thrust", "Barbell Hip Thrust"),
        ("cable_kickback", "Cable Glute Kickback"),
        ("hip_abduction", "Hip Abduction Machine"),
        ("goblet_squat", "Goblet Squat"),
        ("bulgarian_split_squat", "Bulgarian Split Squat"),
        ("step_up", "Step-up"),
        ("calf_raise", "Standing Calf Raise"),
        ("bodyweight_squat", "Bodyweight Squat"),
        ("reverse_lunge", "Reverse Lunge"),
        ("glute_bridge", "Glute Bridge"),
        ("single_leg_rdl", "Single-leg Romanian Deadlift"),
        ("donkey_kick", "Donkey Kick"),
        ("fire_hydrant", "Fire Hydrant"),
        ("wall_sit", "Wall Sit"),
        // Core
        ("plank", "Plank"),
        ("hanging_leg_raise", "Hanging Leg Raise"),
        ("dead_bug", "Dead Bug"),
        ("bicycle_crunch", "Bicycle Crunch"),
        // Conditioning
        ("bike_sprint", "Stationary Bike Sprint"),
        ("rower_interval", "Rowing Machine Interval"),
        ("kettlebell_swing", "Kettlebell Swing"),
        ("burpee", "Burpee"),
        ("mountain_climber", "Mountain Climber"),
        ("jumping_jack", "Jumping Jack"),
        ("high_knees", "High Knees"),
    ] {
        library.insert(exercise(id, name));
    }

    library
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_loads() {
        let library = build_default_exercises();
        assert!(library.len() > 40);
        assert!(library.validate(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_resolve_known_id() {
        let library = default_exercises();
        let bench = library.resolve("bench_press");
        assert_eq!(bench.name, "Barbell Bench Press");
        assert_eq!(
            bench.video_url.as_deref(),
            Some("https://www.youtube.com/results?search_query=barbell+bench+press+form")
        );
    }

    #[test]
    fn test_resolve_unknown_id_has_no_video() {
        let library = default_exercises();
        let unknown = library.resolve("zercher_squat");
        assert_eq!(unknown.name, "zercher squat");
        assert!(unknown.video_url.is_none());
    }

    #[test]
    fn test_overlapping_names_resolve_independently() {
        let library = default_exercises();
        // "Deadlift" is a substring of "Romanian Deadlift"; IDs keep them apart
        assert_eq!(library.resolve("deadlift").name, "Deadlift");
        assert_eq!(library.resolve("romanian_deadlift").name, "Romanian Deadlift");
        assert_ne!(
            library.resolve("deadlift").video_url,
            library.resolve("romanian_deadlift").video_url
        );
    }

    #[test]
    fn test_validate_reports_unknown_references() {
        let library = default_exercises();
        let errors = library.validate(["push_up", "moon_walk"]);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("moon_walk"));
    }
}
