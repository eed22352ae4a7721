//! Configuration file support for fitplan.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/fitplan/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub nutrition: NutritionConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub workout: WorkoutConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Lower bound applied to the daily calorie target
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CalorieFloor {
    /// Never prescribe less than the resting expenditure
    Bmr,
    /// Only clamp at zero
    None,
}

/// Calorie adjustment and macro split parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NutritionConfig {
    #[serde(default = "default_deficit_kcal")]
    pub deficit_kcal: f64,

    #[serde(default = "default_surplus_kcal")]
    pub surplus_kcal: f64,

    #[serde(default = "default_fat_min_g_per_kg")]
    pub fat_min_g_per_kg: f64,

    #[serde(default = "default_fat_min_calorie_fraction")]
    pub fat_min_calorie_fraction: f64,

    #[serde(default = "default_calorie_floor")]
    pub calorie_floor: CalorieFloor,
}

impl Default for NutritionConfig {
    fn default() -> Self {
        Self {
            deficit_kcal: default_deficit_kcal(),
            surplus_kcal: default_surplus_kcal(),
            fat_min_g_per_kg: default_fat_min_g_per_kg(),
            fat_min_calorie_fraction: default_fat_min_calorie_fraction(),
            calorie_floor: default_calorie_floor(),
        }
    }
}

/// Plan generation parameters
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct GenerationConfig {
    /// Fixed seed for the meal4 fruit pick; entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Weekly schedule parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutConfig {
    #[serde(default = "default_include_rest_day")]
    pub include_rest_day: bool,
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            include_rest_day: default_include_rest_day(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("fitplan")
}

fn default_deficit_kcal() -> f64 {
    500.0
}

fn default_surplus_kcal() -> f64 {
    300.0
}

fn default_fat_min_g_per_kg() -> f64 {
    0.8
}

fn default_fat_min_calorie_fraction() -> f64 {
    0.25
}

fn default_calorie_floor() -> CalorieFloor {
    CalorieFloor::Bmr
}

fn default_include_rest_day() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("fitplan").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject values that would produce nonsensical targets
    pub fn validate(&self) -> Result<()> {
        let n = &self.nutrition;
        if n.deficit_kcal < 0.0 || n.surplus_kcal < 0.0 {
            return Err(Error::Config(
                "deficit_kcal and surplus_kcal must not be negative".into(),
            ));
        }
        if n.fat_min_g_per_kg < 0.0 {
            return Err(Error::Config("fat_min_g_per_kg must not be negative".into()));
        }
        if !(0.0..=1.0).contains(&n.fat_min_calorie_fraction) {
            return Err(Error::Config(format!(
                "fat_min_calorie_fraction must be within 0..=1, got {}",
                n.fat_min_calorie_fraction
            )));
        }
        Ok(())
    }
}
