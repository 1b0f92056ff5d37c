//! Static rule data consulted by the scorer.
//!
//! Every table is a process-wide constant so each entry can be audited and
//! unit-tested in isolation from the scoring pipeline.

use super::domain::{
    Constitution, CurrentCondition, Difficulty, Flavor, MealScenario, Nature, Recipe,
};
use super::reason::MatchReason;

/// Upper bound of the flavor preference scale the thresholds below are written for.
pub const FLAVOR_PREFERENCE_SCALE_MAX: u8 = 4;

/// Upper bound of the flavor scale persisted in preference records.
///
/// Stored values are handed to the scorer unscaled, so a stored default of 50
/// reads as "likes" against the compact thresholds.
pub const STORED_FLAVOR_SCALE_MAX: u8 = 100;

/// Preference level at or above which a flavor counts as liked.
pub const FLAVOR_LIKE_THRESHOLD: f64 = 3.0;

/// Preference level at or below which a flavor counts as disliked.
pub const FLAVOR_DISLIKE_THRESHOLD: f64 = 1.0;

pub const FLAVOR_LIKE_BONUS: i32 = 3;
pub const FLAVOR_DISLIKE_PENALTY: i32 = -5;

pub const SUITABLE_CONSTITUTION_BONUS: i32 = 10;
pub const AVOID_CONSTITUTION_PENALTY: i32 = -20;
pub const EXCLUSION_PENALTY: i32 = -30;

pub const COOKING_TIME_FIT_BONUS: i32 = 3;
pub const COOKING_TIME_OVERRUN_PENALTY: i32 = -5;
/// A recipe slower than this multiple of the user's ceiling is penalised.
pub const COOKING_TIME_OVERRUN_FACTOR: f64 = 1.5;

pub const DIFFICULTY_FIT_BONUS: i32 = 2;
pub const DIFFICULTY_OVERREACH_PENALTY: i32 = -3;
/// Level assumed for recipes with no recognised difficulty.
pub const DEFAULT_DIFFICULTY_LEVEL: u8 = 2;

/// Starting score for recipes authored without one.
pub const DEFAULT_BASE_SCORE: i32 = 80;

/// Cooking time assumed for recipes authored without one, in minutes.
pub const DEFAULT_COOKING_TIME: u32 = 30;

pub const MIN_MATCH_SCORE: i32 = 50;
pub const MAX_MATCH_SCORE: i32 = 99;

/// Signed adjustment for one constitution against a set of natures.
#[derive(Debug, Clone, Copy)]
pub struct NatureAffinity {
    pub constitution: Constitution,
    pub natures: &'static [Nature],
    pub delta: i32,
    pub reason: Option<MatchReason>,
}

/// Constitution × nature compatibility matrix; the first matching row wins.
pub const NATURE_AFFINITIES: &[NatureAffinity] = &[
    NatureAffinity {
        constitution: Constitution::YangDeficiency,
        natures: &[Nature::Warm, Nature::Hot],
        delta: 5,
        reason: Some(MatchReason::WarmingForYangDeficiency),
    },
    NatureAffinity {
        constitution: Constitution::YangDeficiency,
        natures: &[Nature::Cool, Nature::Cold],
        delta: -10,
        reason: Some(MatchReason::CoolingCautionForYangDeficiency),
    },
    NatureAffinity {
        constitution: Constitution::YinDeficiency,
        natures: &[Nature::Cool, Nature::Neutral],
        delta: 5,
        reason: Some(MatchReason::MoisteningForYinDeficiency),
    },
    NatureAffinity {
        constitution: Constitution::YinDeficiency,
        natures: &[Nature::Hot],
        delta: -10,
        reason: Some(MatchReason::HotCautionForYinDeficiency),
    },
    NatureAffinity {
        constitution: Constitution::DampHeat,
        natures: &[Nature::Cool, Nature::Cold],
        delta: 5,
        reason: Some(MatchReason::ClearingForDampHeat),
    },
    NatureAffinity {
        constitution: Constitution::DampHeat,
        natures: &[Nature::Hot],
        delta: -10,
        reason: Some(MatchReason::HotCautionForDampHeat),
    },
    NatureAffinity {
        constitution: Constitution::PhlegmDampness,
        natures: &[Nature::Warm],
        delta: 3,
        reason: Some(MatchReason::ResolvesPhlegmDampness),
    },
    NatureAffinity {
        constitution: Constitution::PhlegmDampness,
        natures: &[Nature::Cold],
        delta: -5,
        reason: None,
    },
    NatureAffinity {
        constitution: Constitution::QiDeficiency,
        natures: &[Nature::Warm, Nature::Neutral],
        delta: 5,
        reason: Some(MatchReason::TonifiesQi),
    },
    NatureAffinity {
        constitution: Constitution::QiDeficiency,
        natures: &[Nature::Cold],
        delta: -5,
        reason: None,
    },
    NatureAffinity {
        constitution: Constitution::BloodStasis,
        natures: &[Nature::Warm],
        delta: 3,
        reason: Some(MatchReason::WarmsBloodVessels),
    },
    NatureAffinity {
        constitution: Constitution::QiStagnation,
        natures: &[Nature::Neutral, Nature::Warm],
        delta: 3,
        reason: None,
    },
];

pub fn nature_affinity(constitution: Constitution, nature: Nature) -> Option<&'static NatureAffinity> {
    NATURE_AFFINITIES
        .iter()
        .find(|row| row.constitution == constitution && row.natures.contains(&nature))
}

/// Recipe flavor tags (as authored) mapped to preference keys.
pub const FLAVOR_KEYS: &[(&str, Flavor)] = &[
    ("酸", Flavor::Sour),
    ("甘", Flavor::Sweet),
    ("苦", Flavor::Bitter),
    ("辛", Flavor::Spicy),
    ("咸", Flavor::Salty),
];

pub fn flavor_key(tag: &str) -> Option<Flavor> {
    FLAVOR_KEYS
        .iter()
        .find(|(label, _)| *label == tag)
        .map(|(_, flavor)| *flavor)
}

/// Exclusion categories expanded into ingredient-name keywords.
pub const EXCLUSION_KEYWORDS: &[(&str, &[&str])] = &[
    ("seafood", &["海鲜", "虾", "蟹", "鱼", "贝", "海参", "鲍鱼"]),
    ("cilantro", &["香菜", "芫荽"]),
    ("spicy", &["辣椒", "辣", "花椒", "胡椒"]),
    ("garlic", &["大蒜", "蒜"]),
    ("onion", &["洋葱", "葱"]),
    ("ginger", &["生姜", "姜"]),
    ("nuts", &["花生", "核桃", "杏仁", "坚果", "腰果"]),
    ("milk", &["牛奶", "奶", "乳"]),
    ("egg", &["鸡蛋", "蛋"]),
    ("gluten", &["面粉", "面条", "小麦"]),
    ("meat", &["肉", "猪", "牛", "羊", "鸡", "鸭"]),
    ("alcohol", &["酒", "米酒", "料酒", "黄酒"]),
];

/// Keywords for an exclusion; unknown categories match on their own text.
pub fn exclusion_keywords(exclusion: &str) -> Vec<&str> {
    match EXCLUSION_KEYWORDS
        .iter()
        .find(|(category, _)| *category == exclusion)
    {
        Some((_, keywords)) => keywords.to_vec(),
        None => vec![exclusion],
    }
}

/// Predicate over a recipe used by situational rules.
#[derive(Debug, Clone, Copy)]
pub enum RecipeTest {
    NatureIn(&'static [Nature]),
    /// Nature matches and the dish is ready within the given minutes.
    NatureWithin(Nature, u32),
    HasTag(&'static str),
    HasAnyTag(&'static [&'static str]),
    DifficultyIs(Difficulty),
    /// Ready within the given minutes and not marked hard.
    QuickAndManageable(u32),
    SlowerThan(u32),
}

impl RecipeTest {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        match *self {
            RecipeTest::NatureIn(natures) => recipe
                .nature
                .map(|nature| natures.contains(&nature))
                .unwrap_or(false),
            RecipeTest::NatureWithin(nature, minutes) => {
                recipe.nature == Some(nature) && recipe.cooking_time <= minutes
            }
            RecipeTest::HasTag(tag) => recipe.has_tag(tag),
            RecipeTest::HasAnyTag(tags) => tags.iter().any(|tag| recipe.has_tag(tag)),
            RecipeTest::DifficultyIs(difficulty) => recipe.difficulty == Some(difficulty),
            RecipeTest::QuickAndManageable(minutes) => {
                recipe.cooking_time <= minutes && recipe.difficulty != Some(Difficulty::Hard)
            }
            RecipeTest::SlowerThan(minutes) => recipe.cooking_time > minutes,
        }
    }
}

/// One arm of an if/else-if chain.
#[derive(Debug, Clone, Copy)]
pub struct Adjustment {
    pub test: RecipeTest,
    pub delta: i32,
    pub reason: Option<MatchReason>,
}

/// Rules owned by a single situational tag. Each chain fires at most one arm.
#[derive(Debug, Clone, Copy)]
pub struct SituationalRule<T> {
    pub tag: T,
    pub chains: &'static [&'static [Adjustment]],
}

pub const CONDITION_RULES: &[SituationalRule<CurrentCondition>] = &[
    SituationalRule {
        tag: CurrentCondition::Menstrual,
        chains: &[&[
            Adjustment {
                test: RecipeTest::NatureIn(&[Nature::Warm, Nature::Hot]),
                delta: 5,
                reason: Some(MatchReason::MenstrualNourishment),
            },
            Adjustment {
                test: RecipeTest::NatureIn(&[Nature::Cold, Nature::Cool]),
                delta: -10,
                reason: None,
            },
        ]],
    },
    SituationalRule {
        tag: CurrentCondition::StayedUp,
        chains: &[&[Adjustment {
            test: RecipeTest::NatureIn(&[Nature::Cool, Nature::Neutral]),
            delta: 3,
            reason: Some(MatchReason::RecoveryAfterLateNight),
        }]],
    },
    SituationalRule {
        tag: CurrentCondition::Cold,
        chains: &[&[Adjustment {
            test: RecipeTest::NatureWithin(Nature::Warm, 30),
            delta: 3,
            reason: Some(MatchReason::GentleDuringCold),
        }]],
    },
    SituationalRule {
        tag: CurrentCondition::Exercise,
        chains: &[&[Adjustment {
            test: RecipeTest::HasTag("高蛋白"),
            delta: 5,
            reason: None,
        }]],
    },
    SituationalRule {
        tag: CurrentCondition::Hangover,
        chains: &[&[Adjustment {
            test: RecipeTest::NatureIn(&[Nature::Neutral, Nature::Cool]),
            delta: 3,
            reason: Some(MatchReason::SoothingAfterDrinking),
        }]],
    },
    SituationalRule {
        tag: CurrentCondition::Pregnant,
        chains: &[
            &[Adjustment {
                test: RecipeTest::NatureIn(&[Nature::Neutral, Nature::Warm]),
                delta: 3,
                reason: None,
            }],
            &[Adjustment {
                test: RecipeTest::HasTag("活血"),
                delta: -15,
                reason: None,
            }],
        ],
    },
];

pub const SCENARIO_RULES: &[SituationalRule<MealScenario>] = &[
    SituationalRule {
        tag: MealScenario::LateNightSnack,
        chains: &[&[
            Adjustment {
                test: RecipeTest::NatureWithin(Nature::Neutral, 30),
                delta: 3,
                reason: Some(MatchReason::LightLateNightSnack),
            },
            Adjustment {
                test: RecipeTest::DifficultyIs(Difficulty::Hard),
                delta: -2,
                reason: None,
            },
        ]],
    },
    SituationalRule {
        tag: MealScenario::Date,
        chains: &[&[
            Adjustment {
                test: RecipeTest::HasAnyTag(&["精致", "美观"]),
                delta: 4,
                reason: Some(MatchReason::RefinedForDate),
            },
            Adjustment {
                test: RecipeTest::SlowerThan(90),
                delta: -2,
                reason: None,
            },
        ]],
    },
    SituationalRule {
        tag: MealScenario::FamilyMeal,
        chains: &[&[Adjustment {
            test: RecipeTest::HasTag("家常菜"),
            delta: 3,
            reason: Some(MatchReason::HomeStyleFamilyMeal),
        }]],
    },
    SituationalRule {
        tag: MealScenario::OfficeWorker,
        chains: &[&[Adjustment {
            test: RecipeTest::QuickAndManageable(45),
            delta: 3,
            reason: Some(MatchReason::QuickForOfficeWorker),
        }]],
    },
    SituationalRule {
        tag: MealScenario::Wellness,
        chains: &[&[Adjustment {
            test: RecipeTest::HasAnyTag(&["滋补", "调理"]),
            delta: 5,
            reason: Some(MatchReason::NourishingForWellness),
        }]],
    },
];

pub fn situational_rule<T: PartialEq + Copy + 'static>(
    rules: &'static [SituationalRule<T>],
    tag: T,
) -> Option<&'static SituationalRule<T>> {
    rules.iter().find(|rule| rule.tag == tag)
}
