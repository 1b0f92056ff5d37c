use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recommend::tables::STORED_FLAVOR_SCALE_MAX;
use crate::recommend::{Constitution, CurrentCondition, Flavor, MealScenario, Preferences, UserProfile};

pub const DEFAULT_FLAVOR_LEVEL: i64 = 50;
pub const DEFAULT_COOKING_DIFFICULTY: i64 = 3;
pub const DEFAULT_MAX_COOKING_TIME: i64 = 60;
pub const MIN_COOKING_DIFFICULTY: i64 = 1;
pub const MAX_COOKING_DIFFICULTY: i64 = 5;

/// How a constitution was determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosisMethod {
    #[default]
    Manual,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstitutionAssessment {
    #[serde(rename = "type")]
    pub constitution: Constitution,
    pub diagnosis_method: DiagnosisMethod,
    pub diagnosed_at: DateTime<Utc>,
}

/// Session-keyed user as held by the profile store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub session_id: String,
    pub constitution: Option<ConstitutionAssessment>,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn anonymous(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            constitution: None,
            created_at: now,
            last_active_at: now,
        }
    }

    pub fn assess(&mut self, constitution: Constitution, method: DiagnosisMethod) {
        let now = Utc::now();
        self.constitution = Some(ConstitutionAssessment {
            constitution,
            diagnosis_method: method,
            diagnosed_at: now,
        });
        self.last_active_at = now;
    }

    pub fn constitution(&self) -> Option<Constitution> {
        self.constitution
            .as_ref()
            .map(|assessment| assessment.constitution)
    }
}

/// Stored five-flavor levels on the 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlavorPreference {
    pub sour: i64,
    pub sweet: i64,
    pub bitter: i64,
    pub spicy: i64,
    pub salty: i64,
}

impl Default for FlavorPreference {
    fn default() -> Self {
        Self {
            sour: DEFAULT_FLAVOR_LEVEL,
            sweet: DEFAULT_FLAVOR_LEVEL,
            bitter: DEFAULT_FLAVOR_LEVEL,
            spicy: DEFAULT_FLAVOR_LEVEL,
            salty: DEFAULT_FLAVOR_LEVEL,
        }
    }
}

impl FlavorPreference {
    pub fn get(&self, flavor: Flavor) -> i64 {
        match flavor {
            Flavor::Sour => self.sour,
            Flavor::Sweet => self.sweet,
            Flavor::Bitter => self.bitter,
            Flavor::Spicy => self.spicy,
            Flavor::Salty => self.salty,
        }
    }

    fn slot(&mut self, flavor: Flavor) -> &mut i64 {
        match flavor {
            Flavor::Sour => &mut self.sour,
            Flavor::Sweet => &mut self.sweet,
            Flavor::Bitter => &mut self.bitter,
            Flavor::Spicy => &mut self.spicy,
            Flavor::Salty => &mut self.salty,
        }
    }
}

/// Persisted preference shape, one per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferenceRecord {
    pub flavor_preference: FlavorPreference,
    pub dietary_restrictions: Vec<String>,
    pub allergies: Vec<String>,
    pub disliked_ingredients: Vec<String>,
    pub current_conditions: Vec<String>,
    pub meal_scenarios: Vec<String>,
    pub cooking_difficulty: i64,
    pub max_cooking_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for PreferenceRecord {
    fn default() -> Self {
        Self {
            flavor_preference: FlavorPreference::default(),
            dietary_restrictions: Vec::new(),
            allergies: Vec::new(),
            disliked_ingredients: Vec::new(),
            current_conditions: Vec::new(),
            meal_scenarios: Vec::new(),
            cooking_difficulty: DEFAULT_COOKING_DIFFICULTY,
            max_cooking_time: DEFAULT_MAX_COOKING_TIME,
            updated_at: None,
        }
    }
}

impl PreferenceRecord {
    pub fn validate(&self) -> Result<(), PreferenceError> {
        for flavor in Flavor::ALL {
            check_flavor(flavor, self.flavor_preference.get(flavor))?;
        }
        check_difficulty(self.cooking_difficulty)?;
        check_cooking_time(self.max_cooking_time)
    }

    /// Apply a partial update; unspecified fields keep their stored value.
    pub fn merge(&mut self, update: PreferenceUpdate) -> Result<(), PreferenceError> {
        update.validate()?;

        if let Some(flavors) = update.flavor_preference {
            for flavor in Flavor::ALL {
                if let Some(level) = flavors.get(flavor) {
                    *self.flavor_preference.slot(flavor) = level;
                }
            }
        }
        if let Some(restrictions) = update.dietary_restrictions {
            self.dietary_restrictions = restrictions;
        }
        if let Some(allergies) = update.allergies {
            self.allergies = allergies;
        }
        if let Some(disliked) = update.disliked_ingredients {
            self.disliked_ingredients = disliked;
        }
        if let Some(conditions) = update.current_conditions {
            self.current_conditions = conditions;
        }
        if let Some(scenarios) = update.meal_scenarios {
            self.meal_scenarios = scenarios;
        }
        if let Some(difficulty) = update.cooking_difficulty {
            self.cooking_difficulty = difficulty;
        }
        if let Some(minutes) = update.max_cooking_time {
            self.max_cooking_time = minutes;
        }
        self.updated_at = Some(Utc::now());

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlavorPreferenceUpdate {
    pub sour: Option<i64>,
    pub sweet: Option<i64>,
    pub bitter: Option<i64>,
    pub spicy: Option<i64>,
    pub salty: Option<i64>,
}

impl FlavorPreferenceUpdate {
    pub fn get(&self, flavor: Flavor) -> Option<i64> {
        match flavor {
            Flavor::Sour => self.sour,
            Flavor::Sweet => self.sweet,
            Flavor::Bitter => self.bitter,
            Flavor::Spicy => self.spicy,
            Flavor::Salty => self.salty,
        }
    }
}

/// Body of a preference update request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferenceUpdate {
    pub flavor_preference: Option<FlavorPreferenceUpdate>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
    pub disliked_ingredients: Option<Vec<String>>,
    pub current_conditions: Option<Vec<String>>,
    pub meal_scenarios: Option<Vec<String>>,
    pub cooking_difficulty: Option<i64>,
    pub max_cooking_time: Option<i64>,
}

impl PreferenceUpdate {
    pub fn validate(&self) -> Result<(), PreferenceError> {
        if let Some(flavors) = &self.flavor_preference {
            for flavor in Flavor::ALL {
                if let Some(level) = flavors.get(flavor) {
                    check_flavor(flavor, level)?;
                }
            }
        }
        if let Some(difficulty) = self.cooking_difficulty {
            check_difficulty(difficulty)?;
        }
        if let Some(minutes) = self.max_cooking_time {
            check_cooking_time(minutes)?;
        }
        Ok(())
    }
}

fn check_flavor(flavor: Flavor, level: i64) -> Result<(), PreferenceError> {
    if (0..=i64::from(STORED_FLAVOR_SCALE_MAX)).contains(&level) {
        Ok(())
    } else {
        Err(PreferenceError::FlavorOutOfRange {
            flavor: flavor.key(),
            value: level,
        })
    }
}

fn check_difficulty(level: i64) -> Result<(), PreferenceError> {
    if (MIN_COOKING_DIFFICULTY..=MAX_COOKING_DIFFICULTY).contains(&level) {
        Ok(())
    } else {
        Err(PreferenceError::DifficultyOutOfRange(level))
    }
}

fn check_cooking_time(minutes: i64) -> Result<(), PreferenceError> {
    if minutes < 0 {
        Err(PreferenceError::NegativeCookingTime(minutes))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreferenceError {
    #[error("{flavor} must be between 0 and 100, got {value}")]
    FlavorOutOfRange { flavor: &'static str, value: i64 },
    #[error("cookingDifficulty must be between 1 and 5, got {0}")]
    DifficultyOutOfRange(i64),
    #[error("maxCookingTime must not be negative, got {0}")]
    NegativeCookingTime(i64),
}

impl UserProfile {
    /// Build the scorer's view of a user from the stored records.
    ///
    /// Flavor levels are copied as stored (0-100); the scorer's thresholds
    /// expect 0-4, so stored levels of 3 or more always read as "liked".
    pub fn assemble(user: Option<&UserRecord>, preference: Option<&PreferenceRecord>) -> Self {
        UserProfile {
            constitution: user.and_then(UserRecord::constitution),
            preferences: preference.map(preferences_from_record),
        }
    }
}

fn preferences_from_record(record: &PreferenceRecord) -> Preferences {
    let flavors = Flavor::ALL
        .into_iter()
        .map(|flavor| (flavor, record.flavor_preference.get(flavor) as f64))
        .collect();

    let exclusions = record
        .dietary_restrictions
        .iter()
        .chain(record.allergies.iter())
        .cloned()
        .collect();

    Preferences {
        flavors,
        exclusions,
        current_conditions: parse_tags::<CurrentCondition>(&record.current_conditions),
        meal_scenarios: parse_tags::<MealScenario>(&record.meal_scenarios),
        max_cooking_time: u32::try_from(record.max_cooking_time).ok(),
        cooking_difficulty: u8::try_from(record.cooking_difficulty).ok(),
    }
}

fn parse_tags<T: serde::de::DeserializeOwned>(tags: &[String]) -> Vec<T> {
    tags.iter()
        .filter_map(|tag| {
            let parsed = serde_json::from_value(serde_json::Value::String(tag.clone())).ok();
            if parsed.is_none() {
                tracing::debug!(%tag, "dropping unrecognised stored tag");
            }
            parsed
        })
        .collect()
}
