use crate::infra::seed_recipes;
use clap::Args;
use shiliao::error::AppError;
use shiliao::recommend::{
    constitution_name, constitution_name_en, recommendation_headline, Constitution, Preferences,
    Recipe, RecipeRanker, ReasonLocale, ScoredRecipe, UserProfile,
};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct RankArgs {
    /// JSON recipe catalog to rank. Defaults to the bundled seed recipes.
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Constitution to rank for (e.g. yang_deficiency).
    #[arg(long, value_parser = parse_constitution)]
    pub(crate) constitution: Option<Constitution>,
    /// Preferences as inline JSON or a path to a JSON file.
    #[arg(long)]
    pub(crate) preferences: Option<String>,
    /// Only print the top N matches.
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Language for match reasons (zh or en).
    #[arg(long, value_parser = parse_locale)]
    pub(crate) locale: Option<ReasonLocale>,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let locale = args.locale.unwrap_or_default();
    let (profile, ranked) = rank_catalog(args)?;

    println!("{}", recommendation_headline(profile.constitution, locale));
    if let Some(constitution) = profile.constitution {
        let label = match locale {
            ReasonLocale::Zh => constitution_name(constitution),
            ReasonLocale::En => constitution_name_en(constitution),
        };
        println!("Constitution: {label}");
    }
    if ranked.is_empty() {
        println!("No recipes to rank.");
        return Ok(());
    }

    for (position, entry) in ranked.iter().enumerate() {
        println!("{}", render_entry(position + 1, entry));
    }

    Ok(())
}

pub(crate) fn rank_catalog(args: RankArgs) -> Result<(UserProfile, Vec<ScoredRecipe>), AppError> {
    let RankArgs {
        catalog,
        constitution,
        preferences,
        limit,
        locale,
    } = args;

    let recipes = load_catalog(catalog)?;
    let preferences = preferences.map(|raw| load_preferences(&raw)).transpose()?;
    let profile = UserProfile {
        constitution,
        preferences,
    };

    let ranker = RecipeRanker::new(locale.unwrap_or_default());
    let mut ranked = ranker.rank(recipes, Some(&profile));
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }

    Ok((profile, ranked))
}

fn load_catalog(path: Option<PathBuf>) -> Result<Vec<Recipe>, AppError> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(seed_recipes()?),
    }
}

fn load_preferences(raw: &str) -> Result<Preferences, AppError> {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') {
        return Ok(serde_json::from_str(trimmed)?);
    }
    let contents = std::fs::read_to_string(trimmed)?;
    Ok(serde_json::from_str(&contents)?)
}

fn render_entry(position: usize, entry: &ScoredRecipe) -> String {
    let recipe = &entry.recipe;
    let nature = recipe.nature.map(|nature| nature.label()).unwrap_or("-");
    format!(
        "{position:>2}. {} {} [{nature}] {} min | score {} | {}",
        recipe.emoji, recipe.name, recipe.cooking_time, entry.match_score, entry.match_reason
    )
}

fn parse_constitution(raw: &str) -> Result<Constitution, String> {
    Constitution::from_tag(raw).ok_or_else(|| {
        let known: Vec<&str> = Constitution::ALL.iter().map(|kind| kind.tag()).collect();
        format!("unknown constitution '{raw}' (expected one of {})", known.join(", "))
    })
}

fn parse_locale(raw: &str) -> Result<ReasonLocale, String> {
    ReasonLocale::parse(raw).ok_or_else(|| format!("unknown locale '{raw}' (expected zh or en)"))
}
