use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use super::tables::{DEFAULT_BASE_SCORE, DEFAULT_COOKING_TIME};

const DEFAULT_EMOJI: &str = "🍲";

/// Identifier wrapper for catalog recipes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub String);

/// Nine-way body constitution classification used to personalise guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constitution {
    Balanced,
    QiDeficiency,
    YangDeficiency,
    YinDeficiency,
    PhlegmDampness,
    DampHeat,
    BloodStasis,
    QiStagnation,
    Special,
}

impl Constitution {
    pub const ALL: [Constitution; 9] = [
        Constitution::Balanced,
        Constitution::QiDeficiency,
        Constitution::YangDeficiency,
        Constitution::YinDeficiency,
        Constitution::PhlegmDampness,
        Constitution::DampHeat,
        Constitution::BloodStasis,
        Constitution::QiStagnation,
        Constitution::Special,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Constitution::Balanced => "balanced",
            Constitution::QiDeficiency => "qi_deficiency",
            Constitution::YangDeficiency => "yang_deficiency",
            Constitution::YinDeficiency => "yin_deficiency",
            Constitution::PhlegmDampness => "phlegm_dampness",
            Constitution::DampHeat => "damp_heat",
            Constitution::BloodStasis => "blood_stasis",
            Constitution::QiStagnation => "qi_stagnation",
            Constitution::Special => "special",
        }
    }

    pub fn from_tag(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|kind| kind.tag() == raw)
    }
}

/// Thermal property of a dish on the five-point scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nature {
    #[serde(rename = "寒", alias = "cold")]
    Cold,
    #[serde(rename = "凉", alias = "cool")]
    Cool,
    #[serde(rename = "平", alias = "neutral")]
    Neutral,
    #[serde(rename = "温", alias = "warm")]
    Warm,
    #[serde(rename = "热", alias = "hot")]
    Hot,
}

impl Nature {
    pub fn label(self) -> &'static str {
        match self {
            Nature::Cold => "寒",
            Nature::Cool => "凉",
            Nature::Neutral => "平",
            Nature::Warm => "温",
            Nature::Hot => "热",
        }
    }

    pub fn is_warming(self) -> bool {
        matches!(self, Nature::Warm | Nature::Hot)
    }

    pub fn is_cooling(self) -> bool {
        matches!(self, Nature::Cool | Nature::Cold)
    }
}

/// Canonical taste keys as stored in a user's preference record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flavor {
    Sour,
    Sweet,
    Bitter,
    #[serde(alias = "pungent")]
    Spicy,
    Salty,
}

impl Flavor {
    pub const ALL: [Flavor; 5] = [
        Flavor::Sour,
        Flavor::Sweet,
        Flavor::Bitter,
        Flavor::Spicy,
        Flavor::Salty,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Flavor::Sour => "sour",
            Flavor::Sweet => "sweet",
            Flavor::Bitter => "bitter",
            Flavor::Spicy => "spicy",
            Flavor::Salty => "salty",
        }
    }
}

/// Effort level authored on a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "简单", alias = "easy")]
    Easy,
    #[serde(rename = "中等", alias = "medium")]
    Medium,
    #[serde(rename = "困难", alias = "hard")]
    Hard,
}

impl Difficulty {
    /// Ordinal used by the difficulty fit rule (easy=1, medium=2, hard=3).
    pub fn level(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

/// Storefront grouping persisted alongside each recipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeCategory {
    Warming,
    Cooling,
    #[default]
    Neutral,
    Quick,
}

/// Situational body state a user reports for the current period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentCondition {
    Menstrual,
    #[serde(rename = "stayup", alias = "sleep_deprived")]
    StayedUp,
    #[serde(alias = "common_cold")]
    Cold,
    #[serde(alias = "post_exercise")]
    Exercise,
    Hangover,
    #[serde(alias = "pregnancy")]
    Pregnant,
}

/// Meal occasion a user is cooking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealScenario {
    #[serde(rename = "宵夜", alias = "late_night_snack")]
    LateNightSnack,
    #[serde(rename = "约会", alias = "date")]
    Date,
    #[serde(rename = "家庭聚餐", alias = "family_meal")]
    FamilyMeal,
    #[serde(rename = "上班族", alias = "office_worker")]
    OfficeWorker,
    #[serde(rename = "养生", alias = "wellness")]
    Wellness,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ingredient {
    pub name: String,
    #[serde(deserialize_with = "lenient_value")]
    pub amount: String,
    #[serde(deserialize_with = "lenient_value")]
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookingStep {
    pub order: u32,
    pub content: String,
}

/// Catalog recipe as consumed by the scorer and exposed over the API.
///
/// Decoding never rejects a record over one malformed field: unknown list
/// entries are dropped and null or mistyped scalars fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipe {
    #[serde(deserialize_with = "lenient_value")]
    pub id: RecipeId,
    #[serde(deserialize_with = "lenient_value")]
    pub name: String,
    #[serde(deserialize_with = "lenient_value")]
    pub description: String,
    #[serde(deserialize_with = "lenient_value")]
    pub image: String,
    #[serde(deserialize_with = "lenient_emoji")]
    pub emoji: String,
    #[serde(deserialize_with = "lenient_option")]
    pub nature: Option<Nature>,
    #[serde(deserialize_with = "lenient_list")]
    pub flavors: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub meridians: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub suitable_constitutions: Vec<Constitution>,
    #[serde(deserialize_with = "lenient_list")]
    pub avoid_constitutions: Vec<Constitution>,
    #[serde(deserialize_with = "lenient_value")]
    pub category: RecipeCategory,
    #[serde(deserialize_with = "lenient_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub ingredients: Vec<Ingredient>,
    #[serde(deserialize_with = "lenient_list")]
    pub steps: Vec<CookingStep>,
    #[serde(deserialize_with = "lenient_cooking_time")]
    pub cooking_time: u32,
    #[serde(deserialize_with = "lenient_option")]
    pub difficulty: Option<Difficulty>,
    #[serde(deserialize_with = "lenient_value")]
    pub analysis: String,
    #[serde(deserialize_with = "lenient_base_score")]
    pub base_score: i32,
    #[serde(deserialize_with = "lenient_active")]
    pub is_active: bool,
    #[serde(deserialize_with = "lenient_value")]
    pub sort_order: i32,
    #[serde(deserialize_with = "lenient_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Recipe {
    fn default() -> Self {
        Self {
            id: RecipeId::default(),
            name: String::new(),
            description: String::new(),
            image: String::new(),
            emoji: DEFAULT_EMOJI.to_string(),
            nature: None,
            flavors: Vec::new(),
            meridians: Vec::new(),
            suitable_constitutions: Vec::new(),
            avoid_constitutions: Vec::new(),
            category: RecipeCategory::Neutral,
            tags: Vec::new(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            cooking_time: DEFAULT_COOKING_TIME,
            difficulty: Some(Difficulty::Easy),
            analysis: String::new(),
            base_score: DEFAULT_BASE_SCORE,
            is_active: true,
            sort_order: 0,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Recipe {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }
}

/// Taste, exclusion, and situational settings attached to a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Taste level per flavor. Any JSON number is kept as-is, fractions and negatives included.
    #[serde(deserialize_with = "lenient_map")]
    pub flavors: BTreeMap<Flavor, f64>,
    pub exclusions: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub current_conditions: Vec<CurrentCondition>,
    #[serde(deserialize_with = "lenient_list")]
    pub meal_scenarios: Vec<MealScenario>,
    pub max_cooking_time: Option<u32>,
    pub cooking_difficulty: Option<u8>,
}

/// Everything the scorer knows about the person it ranks for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(deserialize_with = "lenient_option")]
    pub constitution: Option<Constitution>,
    pub preferences: Option<Preferences>,
}

impl UserProfile {
    pub fn is_empty(&self) -> bool {
        self.constitution.is_none() && self.preferences.is_none()
    }
}

// Unknown enumeration values degrade to "absent" instead of rejecting the record.
fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::debug!(%value, "ignoring unrecognised value");
            None
        }
    }))
}

fn lenient_value<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let parsed: Option<T> = lenient_option(deserializer)?;
    Ok(parsed.unwrap_or_default())
}

fn lenient_emoji<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed: Option<String> = lenient_option(deserializer)?;
    Ok(parsed.unwrap_or_else(|| DEFAULT_EMOJI.to_string()))
}

fn lenient_base_score<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed: Option<i32> = lenient_option(deserializer)?;
    Ok(parsed.unwrap_or(DEFAULT_BASE_SCORE))
}

fn lenient_cooking_time<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed: Option<u32> = lenient_option(deserializer)?;
    Ok(parsed.unwrap_or(DEFAULT_COOKING_TIME))
}

fn lenient_active<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed: Option<bool> = lenient_option(deserializer)?;
    Ok(parsed.unwrap_or(true))
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Array(items)) => items,
        Some(serde_json::Value::Null) | None => Vec::new(),
        Some(other) => {
            tracing::debug!(value = %other, "ignoring non-list value");
            Vec::new()
        }
    };
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value.clone()) {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                tracing::debug!(%value, "dropping unrecognised tag");
                None
            }
        })
        .collect())
}

fn lenient_map<'de, D>(deserializer: D) -> Result<BTreeMap<Flavor, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Object(entries)) => entries,
        Some(serde_json::Value::Null) | None => serde_json::Map::new(),
        Some(other) => {
            tracing::debug!(value = %other, "ignoring non-object flavor levels");
            serde_json::Map::new()
        }
    };
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| {
            let flavor = serde_json::from_value(serde_json::Value::String(key)).ok()?;
            let level = value.as_f64()?;
            Some((flavor, level))
        })
        .collect())
}
