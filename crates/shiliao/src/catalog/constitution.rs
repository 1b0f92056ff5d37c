//! Reference descriptions of the nine body constitutions.

use serde::Serialize;

use crate::recommend::Constitution;

/// Foods to lean on and foods to limit for one constitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DietaryGuidelines {
    pub recommended: &'static [&'static str],
    pub avoided: &'static [&'static str],
}

/// Display and dietary guidance for one constitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstitutionProfile {
    #[serde(rename = "type")]
    pub constitution: Constitution,
    pub name: &'static str,
    pub description: &'static str,
    pub characteristics: &'static [&'static str],
    pub dietary_guidelines: DietaryGuidelines,
    pub recommended_ingredients: &'static [&'static str],
    pub icon: &'static str,
    pub color: &'static str,
}

/// All constitutions in display order.
pub fn constitution_profiles() -> &'static [ConstitutionProfile] {
    CONSTITUTION_PROFILES
}

pub fn constitution_profile(constitution: Constitution) -> Option<&'static ConstitutionProfile> {
    CONSTITUTION_PROFILES
        .iter()
        .find(|profile| profile.constitution == constitution)
}

const CONSTITUTION_PROFILES: &[ConstitutionProfile] = &[
    ConstitutionProfile {
        constitution: Constitution::Balanced,
        name: "平和质",
        description: "阴阳气血调和，体态适中，面色红润，精力充沛",
        characteristics: &["体形匀称健壮", "面色润泽", "精力充沛", "睡眠良好", "二便正常"],
        dietary_guidelines: DietaryGuidelines {
            recommended: &["五谷杂粮", "新鲜蔬果", "适量肉类", "豆制品"],
            avoided: &["过度辛辣", "过于油腻", "生冷过度"],
        },
        recommended_ingredients: &["大米", "小麦", "玉米", "苹果", "胡萝卜", "鸡肉", "鱼肉"],
        icon: "☯️",
        color: "#4CAF50",
    },
    ConstitutionProfile {
        constitution: Constitution::QiDeficiency,
        name: "气虚质",
        description: "元气不足，疲乏气短，容易出汗，抵抗力较弱",
        characteristics: &["容易疲劳", "气短懒言", "容易出汗", "抵抗力差", "容易感冒"],
        dietary_guidelines: DietaryGuidelines {
            recommended: &["黄芪", "党参", "山药", "大枣", "鸡肉", "牛肉"],
            avoided: &["生冷食物", "油腻难消化", "耗气食物如萝卜"],
        },
        recommended_ingredients: &["黄芪", "党参", "山药", "大枣", "糯米", "小米", "鸡肉", "牛肉", "香菇"],
        icon: "🌬️",
        color: "#FFC107",
    },
    ConstitutionProfile {
        constitution: Constitution::YangDeficiency,
        name: "阳虚质",
        description: "阳气不足，畏寒怕冷，手脚冰凉，喜热饮食",
        characteristics: &["畏寒怕冷", "手脚冰凉", "喜热饮食", "精神不振", "大便稀溏"],
        dietary_guidelines: DietaryGuidelines {
            recommended: &["羊肉", "韭菜", "生姜", "桂圆", "核桃", "肉桂"],
            avoided: &["生冷瓜果", "冷饮", "苦寒食物"],
        },
        recommended_ingredients: &["羊肉", "韭菜", "生姜", "桂圆", "核桃", "肉桂", "红枣", "糯米"],
        icon: "❄️",
        color: "#03A9F4",
    },
    ConstitutionProfile {
        constitution: Constitution::YinDeficiency,
        name: "阴虚质",
        description: "阴液亏少，口燥咽干，手足心热，喜冷饮",
        characteristics: &["手足心热", "口干咽燥", "喜冷饮", "大便干燥", "舌红少苔"],
        dietary_guidelines: DietaryGuidelines {
            recommended: &["银耳", "百合", "枸杞", "鸭肉", "甲鱼", "梨"],
            avoided: &["辛辣刺激", "煎炸烧烤", "温燥食物"],
        },
        recommended_ingredients: &["银耳", "百合", "枸杞", "鸭肉", "梨", "莲子", "绿豆", "冬瓜"],
        icon: "🔥",
        color: "#FF5722",
    },
    ConstitutionProfile {
        constitution: Constitution::PhlegmDampness,
        name: "痰湿质",
        description: "痰湿凝聚，形体肥胖，腹部肥满，容易困倦",
        characteristics: &["形体肥胖", "腹部肥满松软", "容易困倦", "痰多", "口黏腻"],
        dietary_guidelines: DietaryGuidelines {
            recommended: &["薏米", "冬瓜", "山楂", "荷叶", "陈皮", "白萝卜"],
            avoided: &["肥甘厚味", "甜食", "油腻食物"],
        },
        recommended_ingredients: &["薏米", "冬瓜", "山楂", "荷叶", "陈皮", "白萝卜", "海带", "绿豆"],
        icon: "💧",
        color: "#795548",
    },
    ConstitutionProfile {
        constitution: Constitution::DampHeat,
        name: "湿热质",
        description: "湿热内蕴，面垢油光，口苦口干，容易长痘",
        characteristics: &["面垢油光", "口苦口干", "容易长痘", "大便黏滞", "小便短黄"],
        dietary_guidelines: DietaryGuidelines {
            recommended: &["绿豆", "苦瓜", "黄瓜", "薏米", "冬瓜", "芹菜"],
            avoided: &["辛辣油腻", "牛羊肉", "酒类"],
        },
        recommended_ingredients: &["绿豆", "苦瓜", "黄瓜", "薏米", "冬瓜", "芹菜", "莲藕", "西瓜"],
        icon: "🌡️",
        color: "#FF9800",
    },
    ConstitutionProfile {
        constitution: Constitution::BloodStasis,
        name: "血瘀质",
        description: "血行不畅，面色晦暗，容易出现瘀斑，肤色暗沉",
        characteristics: &["面色晦暗", "皮肤粗糙", "容易出现瘀斑", "口唇暗淡", "舌质紫暗"],
        dietary_guidelines: DietaryGuidelines {
            recommended: &["山楂", "红糖", "玫瑰花", "黑木耳", "醋", "桃仁"],
            avoided: &["寒凉食物", "高脂肪食物"],
        },
        recommended_ingredients: &["山楂", "红糖", "玫瑰花", "黑木耳", "桃仁", "红花", "当归", "川芎"],
        icon: "🩸",
        color: "#9C27B0",
    },
    ConstitutionProfile {
        constitution: Constitution::QiStagnation,
        name: "气郁质",
        description: "气机郁滞，情绪抑郁，容易焦虑，胸闷不舒",
        characteristics: &["情绪低落", "容易焦虑", "胸闷不舒", "叹气频繁", "咽部异物感"],
        dietary_guidelines: DietaryGuidelines {
            recommended: &["玫瑰花", "佛手", "陈皮", "柑橘", "小麦", "百合"],
            avoided: &["收敛酸涩", "过于寒凉"],
        },
        recommended_ingredients: &["玫瑰花", "佛手", "陈皮", "柑橘", "小麦", "百合", "金桔", "茉莉花"],
        icon: "😔",
        color: "#607D8B",
    },
    ConstitutionProfile {
        constitution: Constitution::Special,
        name: "特禀质",
        description: "先天禀赋不足或过敏体质，容易过敏，适应能力差",
        characteristics: &["容易过敏", "适应能力差", "容易打喷嚏", "皮肤易起疹", "对气候敏感"],
        dietary_guidelines: DietaryGuidelines {
            recommended: &["新鲜蔬果", "清淡饮食", "糙米", "适量蛋白质"],
            avoided: &["海鲜发物", "辛辣刺激", "已知过敏原"],
        },
        recommended_ingredients: &["糙米", "小米", "南瓜", "胡萝卜", "苹果", "葡萄"],
        icon: "🌸",
        color: "#E91E63",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::constitution_name;

    #[test]
    fn every_constitution_has_one_profile_in_tag_order() {
        let kinds: Vec<Constitution> = constitution_profiles()
            .iter()
            .map(|profile| profile.constitution)
            .collect();
        assert_eq!(kinds, Constitution::ALL.to_vec());

        for kind in Constitution::ALL {
            let profile = constitution_profile(kind).expect("profile present");
            assert_eq!(profile.name, constitution_name(kind));
            assert!(!profile.characteristics.is_empty());
            assert!(!profile.dietary_guidelines.recommended.is_empty());
        }
    }

    #[test]
    fn profile_serialises_with_type_key() {
        let profile = constitution_profile(Constitution::YangDeficiency).expect("profile");
        let json = serde_json::to_value(profile).expect("serialises");

        assert_eq!(json["type"], "yang_deficiency");
        assert_eq!(json["name"], "阳虚质");
        assert!(json["dietaryGuidelines"]["recommended"]
            .as_array()
            .expect("recommended list")
            .contains(&serde_json::json!("羊肉")));
        assert!(json["recommendedIngredients"].is_array());
    }
}
