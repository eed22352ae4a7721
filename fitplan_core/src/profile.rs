//! Profile intake and validation.
//!
//! Profiles are persisted in a nullable form ([`ProfileDraft`]) because they
//! are filled in over several onboarding steps. Plan generation only accepts
//! a [`BiometricProfile`], which can only be obtained through validation.

use crate::{ActivityLevel, BiometricProfile, Error, Goal, Result, Sex};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

/// A possibly incomplete profile as stored on the user record
///
/// Empty strings and `null` deserialize as unset, and enum values are parsed
/// with the same loose rules as their `FromStr` impls.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfileDraft {
    #[serde(default, alias = "weightKg", deserialize_with = "loose_number")]
    pub weight_kg: Option<f64>,
    #[serde(default, alias = "heightCm", deserialize_with = "loose_number")]
    pub height_cm: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub age: Option<u32>,
    #[serde(default, deserialize_with = "loose_enum")]
    pub sex: Option<Sex>,
    #[serde(default, alias = "activityLevel", deserialize_with = "loose_enum")]
    pub activity_level: Option<ActivityLevel>,
    #[serde(default, deserialize_with = "loose_enum")]
    pub goal: Option<Goal>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText<T> {
    Number(T),
    Text(String),
}

fn parse_unless_blank<T, E>(text: &str) -> std::result::Result<Option<T>, E>
where
    T: FromStr,
    T::Err: Display,
    E: serde::de::Error,
{
    match text.trim() {
        "" => Ok(None),
        s => s.parse().map(Some).map_err(E::custom),
    }
}

fn loose_number<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<NumberOrText<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(text)) => parse_unless_blank(&text),
    }
}

fn loose_enum<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(text) => parse_unless_blank(&text),
    }
}

impl ProfileDraft {
    /// Load a draft from a TOML or JSON file, chosen by extension
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let draft = if is_json {
            serde_json::from_str(&contents)?
        } else {
            toml::from_str(&contents)?
        };
        tracing::debug!("Loaded profile draft from {:?}", path);
        Ok(draft)
    }

    /// Names of the required fields that are still unset, in declaration order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.weight_kg.is_none() {
            missing.push("weight_kg");
        }
        if self.height_cm.is_none() {
            missing.push("height_cm");
        }
        if self.age.is_none() {
            missing.push("age");
        }
        if self.sex.is_none() {
            missing.push("sex");
        }
        if self.activity_level.is_none() {
            missing.push("activity_level");
        }
        if self.goal.is_none() {
            missing.push("goal");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

impl TryFrom<&ProfileDraft> for BiometricProfile {
    type Error = Error;

    fn try_from(draft: &ProfileDraft) -> Result<Self> {
        match (
            draft.weight_kg,
            draft.height_cm,
            draft.age,
            draft.sex,
            draft.activity_level,
            draft.goal,
        ) {
            (
                Some(weight_kg),
                Some(height_cm),
                Some(age),
                Some(sex),
                Some(activity_level),
                Some(goal),
            ) => {
                let profile = BiometricProfile {
                    weight_kg,
                    height_cm,
                    age,
                    sex,
                    activity_level,
                    goal,
                };
                profile.validate()?;
                Ok(profile)
            }
            _ => Err(Error::IncompleteProfile {
                missing: draft.missing_fields(),
            }),
        }
    }
}

impl TryFrom<ProfileDraft> for BiometricProfile {
    type Error = Error;

    fn try_from(draft: ProfileDraft) -> Result<Self> {
        BiometricProfile::try_from(&draft)
    }
}

impl BiometricProfile {
    /// Check that every value lies in the range the BMR formula is valid for
    pub fn validate(&self) -> Result<()> {
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 || self.weight_kg > 300.0 {
            return Err(Error::InvalidProfile(format!(
                "weight must be between 0 and 300 kg, got {}",
                self.weight_kg
            )));
        }
        if !self.height_cm.is_finite() || self.height_cm <= 0.0 || self.height_cm > 300.0 {
            return Err(Error::InvalidProfile(format!(
                "height must be between 0 and 300 cm, got {}",
                self.height_cm
            )));
        }
        if !(10..=120).contains(&self.age) {
            return Err(Error::InvalidProfile(format!(
                "age must be between 10 and 120 years, got {}",
                self.age
            )));
        }
        Ok(())
    }
}

fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Sex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => Err(Error::InvalidProfile(format!("unknown sex: {}", s))),
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "veryactive" => Ok(ActivityLevel::VeryActive),
            _ => Err(Error::InvalidProfile(format!("unknown activity level: {}", s))),
        }
    }
}

impl FromStr for Goal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "lose" => Ok(Goal::Lose),
            "maintain" => Ok(Goal::Maintain),
            "gain" => Ok(Goal::Gain),
            _ => Err(Error::InvalidProfile(format!("unknown goal: {}", s))),
        }
    }
}
