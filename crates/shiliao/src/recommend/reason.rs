use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::Constitution;

/// Language used when rendering match reasons for API consumers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasonLocale {
    #[default]
    Zh,
    En,
}

impl ReasonLocale {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "zh" | "zh-cn" | "zh_cn" | "cn" => Some(Self::Zh),
            "en" | "en-us" | "en_us" => Some(Self::En),
            _ => None,
        }
    }
}

/// Fallback bands applied when no rule produced a specific reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Everyday,
    Fair,
}

impl ScoreBand {
    pub fn for_score(score: i32) -> Self {
        if score >= 90 {
            ScoreBand::Excellent
        } else if score >= 80 {
            ScoreBand::Good
        } else if score >= 70 {
            ScoreBand::Everyday
        } else {
            ScoreBand::Fair
        }
    }
}

/// Explanation attached to a match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    SuitsConstitution,
    UnsuitedToConstitution,
    WarmingForYangDeficiency,
    CoolingCautionForYangDeficiency,
    MoisteningForYinDeficiency,
    HotCautionForYinDeficiency,
    ClearingForDampHeat,
    HotCautionForDampHeat,
    ResolvesPhlegmDampness,
    TonifiesQi,
    WarmsBloodVessels,
    ContainsExcludedIngredient,
    MenstrualNourishment,
    RecoveryAfterLateNight,
    GentleDuringCold,
    SoothingAfterDrinking,
    LightLateNightSnack,
    RefinedForDate,
    HomeStyleFamilyMeal,
    QuickForOfficeWorker,
    NourishingForWellness,
    Banded {
        band: ScoreBand,
        constitution: Option<Constitution>,
    },
}

impl MatchReason {
    /// Reason used when no profile is available at all.
    pub const EVERYDAY: MatchReason = MatchReason::Banded {
        band: ScoreBand::Everyday,
        constitution: None,
    };

    pub fn fallback(score: i32, constitution: Option<Constitution>) -> Self {
        MatchReason::Banded {
            band: ScoreBand::for_score(score),
            constitution,
        }
    }

    pub fn text(&self, locale: ReasonLocale) -> Cow<'static, str> {
        match locale {
            ReasonLocale::Zh => self.zh(),
            ReasonLocale::En => self.en(),
        }
    }

    fn zh(&self) -> Cow<'static, str> {
        let text = match self {
            MatchReason::SuitsConstitution => "适合您的体质",
            MatchReason::UnsuitedToConstitution => "不太适合您的体质",
            MatchReason::WarmingForYangDeficiency => "温补之品，适合阳虚体质",
            MatchReason::CoolingCautionForYangDeficiency => "性凉，阳虚体质慎食",
            MatchReason::MoisteningForYinDeficiency => "清润之品，适合阴虚体质",
            MatchReason::HotCautionForYinDeficiency => "性热燥，阴虚体质慎食",
            MatchReason::ClearingForDampHeat => "清热之品，适合湿热体质",
            MatchReason::HotCautionForDampHeat => "性热，湿热体质慎食",
            MatchReason::ResolvesPhlegmDampness => "温化痰湿",
            MatchReason::TonifiesQi => "补气之品，适合气虚体质",
            MatchReason::WarmsBloodVessels => "温通血脉",
            MatchReason::ContainsExcludedIngredient => "含有您忌口的食材",
            MatchReason::MenstrualNourishment => "温补气血，适合生理期",
            MatchReason::RecoveryAfterLateNight => "滋阴润燥，适合熬夜后调理",
            MatchReason::GentleDuringCold => "温和易消化，适合感冒期间",
            MatchReason::SoothingAfterDrinking => "清淡养胃，适合解酒后",
            MatchReason::LightLateNightSnack => "清淡易消化，适合宵夜",
            MatchReason::RefinedForDate => "精致美观，适合约会用餐",
            MatchReason::HomeStyleFamilyMeal => "家常美味，适合家庭聚餐",
            MatchReason::QuickForOfficeWorker => "制作快捷，适合上班族",
            MatchReason::NourishingForWellness => "滋补调理，适合养生需求",
            MatchReason::Banded { band, constitution } => {
                return match (band, constitution) {
                    (ScoreBand::Excellent, Some(kind)) => {
                        Cow::Owned(format!("非常适合您的{}", constitution_name(*kind)))
                    }
                    (ScoreBand::Excellent, None) => Cow::Borrowed("非常适合您"),
                    (ScoreBand::Good, Some(kind)) => {
                        Cow::Owned(format!("适合您的{}", constitution_name(*kind)))
                    }
                    (ScoreBand::Good, None) => Cow::Borrowed("适合您的口味偏好"),
                    (ScoreBand::Everyday, _) => Cow::Borrowed("性味平和，适合日常调养"),
                    (ScoreBand::Fair, _) => Cow::Borrowed("可尝试，但不是最佳选择"),
                };
            }
        };
        Cow::Borrowed(text)
    }

    fn en(&self) -> Cow<'static, str> {
        let text = match self {
            MatchReason::SuitsConstitution => "suits your constitution",
            MatchReason::UnsuitedToConstitution => "not well suited to your constitution",
            MatchReason::WarmingForYangDeficiency => {
                "warming and tonifying, suited to yang deficiency"
            }
            MatchReason::CoolingCautionForYangDeficiency => {
                "cooling in nature, eat sparingly with yang deficiency"
            }
            MatchReason::MoisteningForYinDeficiency => {
                "clearing and moistening, suited to yin deficiency"
            }
            MatchReason::HotCautionForYinDeficiency => {
                "hot and drying, eat sparingly with yin deficiency"
            }
            MatchReason::ClearingForDampHeat => "clears heat, suited to damp-heat",
            MatchReason::HotCautionForDampHeat => "hot in nature, eat sparingly with damp-heat",
            MatchReason::ResolvesPhlegmDampness => "warms and resolves phlegm-dampness",
            MatchReason::TonifiesQi => "tonifies qi, suited to qi deficiency",
            MatchReason::WarmsBloodVessels => "warms and unblocks the blood vessels",
            MatchReason::ContainsExcludedIngredient => "contains an ingredient you avoid",
            MatchReason::MenstrualNourishment => {
                "nourishes blood and qi, suited to menstrual period"
            }
            MatchReason::RecoveryAfterLateNight => {
                "nourishes yin and moistens, suited to recovering from a late night"
            }
            MatchReason::GentleDuringCold => "gentle and easy to digest, suited to a common cold",
            MatchReason::SoothingAfterDrinking => "light and stomach-soothing, suited to a hangover",
            MatchReason::LightLateNightSnack => "light and easy to digest, suited to a late-night snack",
            MatchReason::RefinedForDate => "refined and presentable, suited to a date",
            MatchReason::HomeStyleFamilyMeal => "home-style flavour, suited to a family meal",
            MatchReason::QuickForOfficeWorker => "quick to prepare, suited to office workers",
            MatchReason::NourishingForWellness => "nourishing and restorative, suited to wellness goals",
            MatchReason::Banded { band, constitution } => match (band, constitution) {
                (ScoreBand::Excellent, Some(_)) => "extremely well suited to your constitution",
                (ScoreBand::Excellent, None) => "extremely well suited to you",
                (ScoreBand::Good, Some(_)) => "suited to your constitution",
                (ScoreBand::Good, None) => "suited to your taste",
                (ScoreBand::Everyday, _) => "neutral, suitable for everyday nourishment",
                (ScoreBand::Fair, _) => "worth trying, but not the best match",
            },
        };
        Cow::Borrowed(text)
    }
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.zh())
    }
}

/// Display name of a constitution in the catalog's language.
pub fn constitution_name(kind: Constitution) -> &'static str {
    match kind {
        Constitution::Balanced => "平和质",
        Constitution::QiDeficiency => "气虚质",
        Constitution::YangDeficiency => "阳虚质",
        Constitution::YinDeficiency => "阴虚质",
        Constitution::PhlegmDampness => "痰湿质",
        Constitution::DampHeat => "湿热质",
        Constitution::BloodStasis => "血瘀质",
        Constitution::QiStagnation => "气郁质",
        Constitution::Special => "特禀质",
    }
}

pub fn constitution_name_en(kind: Constitution) -> &'static str {
    match kind {
        Constitution::Balanced => "balanced",
        Constitution::QiDeficiency => "qi-deficiency",
        Constitution::YangDeficiency => "yang-deficiency",
        Constitution::YinDeficiency => "yin-deficiency",
        Constitution::PhlegmDampness => "phlegm-dampness",
        Constitution::DampHeat => "damp-heat",
        Constitution::BloodStasis => "blood-stasis",
        Constitution::QiStagnation => "qi-stagnation",
        Constitution::Special => "special",
    }
}

/// Headline shown above a recommended list.
pub fn recommendation_headline(
    constitution: Option<Constitution>,
    locale: ReasonLocale,
) -> String {
    match (constitution, locale) {
        (Some(kind), ReasonLocale::Zh) => {
            format!("根据您的{}，为您精选的食养方案", constitution_name(kind))
        }
        (None, ReasonLocale::Zh) => "为您推荐的健康食谱".to_string(),
        (Some(kind), ReasonLocale::En) => format!(
            "Diet-therapy picks selected for your {} constitution",
            constitution_name_en(kind)
        ),
        (None, ReasonLocale::En) => "Healthy recipes recommended for you".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_follow_score_thresholds() {
        assert_eq!(ScoreBand::for_score(99), ScoreBand::Excellent);
        assert_eq!(ScoreBand::for_score(90), ScoreBand::Excellent);
        assert_eq!(ScoreBand::for_score(89), ScoreBand::Good);
        assert_eq!(ScoreBand::for_score(80), ScoreBand::Good);
        assert_eq!(ScoreBand::for_score(70), ScoreBand::Everyday);
        assert_eq!(ScoreBand::for_score(69), ScoreBand::Fair);
    }

    #[test]
    fn banded_reasons_name_the_constitution_in_chinese() {
        let reason = MatchReason::fallback(95, Some(Constitution::DampHeat));
        assert_eq!(reason.text(ReasonLocale::Zh), "非常适合您的湿热质");
        assert_eq!(
            reason.text(ReasonLocale::En),
            "extremely well suited to your constitution"
        );

        let reason = MatchReason::fallback(82, None);
        assert_eq!(reason.text(ReasonLocale::Zh), "适合您的口味偏好");
        assert_eq!(reason.text(ReasonLocale::En), "suited to your taste");
    }

    #[test]
    fn everyday_reason_matches_no_profile_text() {
        assert_eq!(
            MatchReason::EVERYDAY.text(ReasonLocale::Zh),
            "性味平和，适合日常调养"
        );
        assert_eq!(
            MatchReason::EVERYDAY.text(ReasonLocale::En),
            "neutral, suitable for everyday nourishment"
        );
    }

    #[test]
    fn locale_parsing_accepts_common_spellings() {
        assert_eq!(ReasonLocale::parse("EN"), Some(ReasonLocale::En));
        assert_eq!(ReasonLocale::parse("zh-CN"), Some(ReasonLocale::Zh));
        assert_eq!(ReasonLocale::parse("fr"), None);
    }

    #[test]
    fn headline_names_the_constitution_when_known() {
        assert_eq!(
            recommendation_headline(Some(Constitution::YinDeficiency), ReasonLocale::Zh),
            "根据您的阴虚质，为您精选的食养方案"
        );
        assert_eq!(
            recommendation_headline(None, ReasonLocale::Zh),
            "为您推荐的健康食谱"
        );
        assert_eq!(
            recommendation_headline(Some(Constitution::DampHeat), ReasonLocale::En),
            "Diet-therapy picks selected for your damp-heat constitution"
        );
    }
}
