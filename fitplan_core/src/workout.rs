//! Weekly workout composition.
//!
//! A fixed five-day template per sex (gym and home variants of each day),
//! steady-state cardio sized by goal, and a trailing Saturday that is either
//! a HIIT block (fat loss) or a rest day.

use crate::config::WorkoutConfig;
use crate::exercises::ExerciseLibrary;
use crate::{Cardio, CardioKind, Goal, Sex, WorkoutDay, WorkoutPlan};

const DAY_LABELS: [&str; 6] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Length of the Saturday interval block
const HIIT_MINUTES: u32 = 20;

/// Female upper-body days never drop below this many cardio minutes
const FEMALE_REDUCED_FLOOR: u32 = 20;
const FEMALE_REDUCTION: u32 = 10;

struct DayTemplate {
    title: &'static str,
    lower_body: bool,
    gym: &'static [&'static str],
    home: &'static [&'static str],
}

const MALE_WEEK: [DayTemplate; 5] = [
    DayTemplate {
        title: "Push",
        lower_body: false,
        gym: &[
            "bench_press",
            "incline_db_press",
            "overhead_press",
            "lateral_raise",
            "triceps_pushdown",
        ],
        home: &["push_up", "pike_push_up", "chair_dip", "plank"],
    },
    DayTemplate {
        title: "Pull",
        lower_body: false,
        gym: &[
            "deadlift",
            "lat_pulldown",
            "barbell_row",
            "face_pull",
            "db_curl",
        ],
        home: &["band_row", "band_pulldown", "backpack_row", "superman_hold"],
    },
    DayTemplate {
        title: "Legs",
        lower_body: true,
        gym: &[
            "back_squat",
            "leg_press",
            "romanian_deadlift",
            "leg_curl",
            "calf_raise",
        ],
        home: &[
            "bodyweight_squat",
            "reverse_lunge",
            "single_leg_rdl",
            "wall_sit",
        ],
    },
    DayTemplate {
        title: "Upper",
        lower_body: false,
        gym: &[
            "incline_db_press",
            "seated_cable_row",
            "db_shoulder_press",
            "cable_fly",
            "hanging_leg_raise",
        ],
        home: &["push_up", "band_row", "pike_push_up", "dead_bug"],
    },
    DayTemplate {
        title: "Legs & Glutes",
        lower_body: true,
        gym: &[
            "hip_thrust",
            "bulgarian_split_squat",
            "leg_extension",
            "walking_lunge",
            "calf_raise",
        ],
        home: &[
            "glute_bridge",
            "bulgarian_split_squat",
            "step_up",
            "bicycle_crunch",
        ],
    },
];

const FEMALE_WEEK: [DayTemplate; 5] = [
    DayTemplate {
        title: "Glutes & Hamstrings",
        lower_body: true,
        gym: &[
            "hip_thrust",
            "romanian_deadlift",
            "leg_curl",
            "cable_kickback",
            "hip_abduction",
        ],
        home: &["glute_bridge", "single_leg_rdl", "donkey_kick", "fire_hydrant"],
    },
    DayTemplate {
        title: "Upper Body",
        lower_body: false,
        gym: &[
            "lat_pulldown",
            "db_shoulder_press",
            "seated_cable_row",
            "lateral_raise",
            "triceps_pushdown",
        ],
        home: &["push_up", "band_row", "pike_push_up", "plank"],
    },
    DayTemplate {
        title: "Quads & Glutes",
        lower_body: true,
        gym: &[
            "goblet_squat",
            "leg_press",
            "walking_lunge",
            "leg_extension",
            "calf_raise",
        ],
        home: &[
            "bodyweight_squat",
            "reverse_lunge",
            "step_up",
            "wall_sit",
        ],
    },
    DayTemplate {
        title: "Upper Body & Core",
        lower_body: false,
        gym: &[
            "incline_db_press",
            "face_pull",
            "db_curl",
            "hanging_leg_raise",
            "plank",
        ],
        home: &["band_pulldown", "chair_dip", "dead_bug", "bicycle_crunch"],
    },
    DayTemplate {
        title: "Full Lower Body",
        lower_body: true,
        gym: &[
            "back_squat",
            "bulgarian_split_squat",
            "hip_thrust",
            "hip_abduction",
            "calf_raise",
        ],
        home: &[
            "bulgarian_split_squat",
            "glute_bridge",
            "fire_hydrant",
            "single_leg_rdl",
        ],
    },
];

const HIIT_GYM: &[&str] = &["bike_sprint", "rower_interval", "kettlebell_swing"];
const HIIT_HOME: &[&str] = &["burpee", "mountain_climber", "jumping_jack", "high_knees"];

fn week(sex: Sex) -> &'static [DayTemplate; 5] {
    match sex {
        Sex::Male => &MALE_WEEK,
        Sex::Female => &FEMALE_WEEK,
    }
}

/// Every exercise ID the templates can schedule, for library validation
pub fn referenced_exercises() -> Vec<&'static str> {
    let mut ids: Vec<&'static str> = MALE_WEEK
        .iter()
        .chain(FEMALE_WEEK.iter())
        .flat_map(|day| day.gym.iter().chain(day.home.iter()).copied())
        .chain(HIIT_GYM.iter().copied())
        .chain(HIIT_HOME.iter().copied())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Base steady-state minutes per training day
pub fn cardio_minutes(goal: Goal) -> u32 {
    match goal {
        Goal::Lose => 45,
        Goal::Gain => 15,
        Goal::Maintain => 25,
    }
}

/// Cardio minutes for one template day
///
/// Female upper-body days are reduced by ten minutes, floored at twenty,
/// and never raised above the base.
fn day_cardio_minutes(sex: Sex, goal: Goal, lower_body: bool) -> u32 {
    let base = cardio_minutes(goal);
    match sex {
        Sex::Female if !lower_body => base
            .saturating_sub(FEMALE_REDUCTION)
            .max(FEMALE_REDUCED_FLOOR)
            .min(base),
        _ => base,
    }
}

/// Build the weekly schedule for a sex and goal
pub fn compose_workout(
    library: &ExerciseLibrary,
    sex: Sex,
    goal: Goal,
    config: &WorkoutConfig,
) -> WorkoutPlan {
    let resolve = |ids: &[&str]| ids.iter().map(|id| library.resolve(id)).collect::<Vec<_>>();

    let mut days: Vec<WorkoutDay> = week(sex)
        .iter()
        .zip(DAY_LABELS.iter())
        .map(|(template, label)| WorkoutDay {
            day_label: (*label).to_string(),
            title: template.title.to_string(),
            gym_exercises: resolve(template.gym),
            home_exercises: resolve(template.home),
            cardio: Some(Cardio {
                kind: CardioKind::SteadyState,
                duration_minutes: day_cardio_minutes(sex, goal, template.lower_body),
            }),
        })
        .collect();

    let saturday = DAY_LABELS[5].to_string();
    match goal {
        Goal::Lose => days.push(WorkoutDay {
            day_label: saturday,
            title: "HIIT".into(),
            gym_exercises: resolve(HIIT_GYM),
            home_exercises: resolve(HIIT_HOME),
            cardio: Some(Cardio {
                kind: CardioKind::Hiit,
                duration_minutes: HIIT_MINUTES,
            }),
        }),
        Goal::Maintain | Goal::Gain if config.include_rest_day => days.push(WorkoutDay {
            day_label: saturday,
            title: "Rest day".into(),
            gym_exercises: Vec::new(),
            home_exercises: Vec::new(),
            cardio: None,
        }),
        Goal::Maintain | Goal::Gain => {}
    }

    tracing::debug!("Composed {}-day schedule for {:?}/{:?}", days.len(), sex, goal);
    WorkoutPlan { days }
}
