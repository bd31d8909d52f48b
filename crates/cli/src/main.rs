//! Command-line front end for Recipe Finder.
//!
//! Usage:
//!     recipefinder generate chicken rice tomatoes --time 30
//!     recipefinder --corpus recipes.json search pasta
//!     recipefinder recent --limit 3
//!     recipefinder health

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use recipefinder_backend::{FirestoreBackend, FirestoreConfig, MemoryBackend, RecipeBackend};
use recipefinder_explain::{explain_match, summarize_match, Explanation};
use recipefinder_generator::{RecipeGenerator, DEFAULT_SUGGESTIONS};
use recipefinder_model::{MatchedRecipe, Recipe};
use recipefinder_rerank::MatchConfig;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recipefinder")]
#[command(about = "Find recipes for the ingredients you have")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Read recipes from a JSON file instead of Firestore
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    /// Firestore project id
    #[arg(long, env = "FIRESTORE_PROJECT", default_value = "")]
    project: String,

    /// Firestore REST base URL
    #[arg(long, env = "FIRESTORE_URL", default_value = "https://firestore.googleapis.com/v1")]
    firestore_url: String,

    /// Firebase web API key
    #[arg(long, env = "FIRESTORE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Firebase ID token of the signed-in user
    #[arg(long, env = "FIRESTORE_ID_TOKEN", hide_env_values = true)]
    id_token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest recipes for the ingredients you have
    Generate {
        /// Ingredients on hand
        #[arg(required = true, num_args = 1..)]
        ingredients: Vec<String>,

        /// Available cooking time in minutes
        #[arg(short, long, default_value = "30", allow_negative_numbers = true)]
        time: i64,

        /// Maximum suggestions
        #[arg(long, default_value_t = DEFAULT_SUGGESTIONS)]
        top: usize,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Search recipes by title, description, category or ingredient
    Search {
        query: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show the most recently added recipes
    Recent {
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Show catalog and per-user recipe counts
    Counts {
        /// User id
        user: String,
    },

    /// Show favorite recipes by id
    Favorites {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Check backend health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("recipefinder=debug".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.corpus {
        Some(path) => {
            let backend = MemoryBackend::from_json_file(&path)
                .await
                .with_context(|| format!("Failed to load corpus from {}", path.display()))?;
            run(RecipeGenerator::new(backend), cli.command).await
        }
        None => {
            let config = FirestoreConfig {
                base_url: cli.firestore_url,
                project_id: cli.project,
                api_key: cli.api_key,
                id_token: cli.id_token,
                ..Default::default()
            };
            let backend = FirestoreBackend::new(config)
                .context("Set --project or FIRESTORE_PROJECT, or pass --corpus")?;
            run(RecipeGenerator::new(backend), cli.command).await
        }
    }
}

async fn run<B: RecipeBackend>(generator: RecipeGenerator<B>, command: Commands) -> Result<()> {
    tracing::debug!(backend = generator.backend().name(), "Using recipe backend");

    match command {
        Commands::Generate {
            ingredients,
            time,
            top,
            format,
        } => {
            let generator = generator.with_config(MatchConfig::default().with_top_n(top));
            run_generate(&generator, &ingredients, time, &format).await
        }
        Commands::Search { query, format } => run_search(&generator, &query, &format).await,
        Commands::Recent { limit } => {
            let recipes = generator.recent(limit).await?;
            print_recipes(&recipes);
            Ok(())
        }
        Commands::Counts { user } => {
            let counts = generator.counts(&user).await?;
            println!("Total recipes: {}", counts.total);
            println!("Recipes by {}: {}", user, counts.user_recipes);
            Ok(())
        }
        Commands::Favorites { ids } => {
            let recipes = generator.favorites(&ids).await;
            print_recipes(&recipes);
            println!("\n{} of {} favorites loaded", recipes.len(), ids.len());
            Ok(())
        }
        Commands::Health => run_health(generator.backend()).await,
    }
}

#[derive(Serialize)]
struct Suggestion<'a> {
    #[serde(flatten)]
    recipe: &'a MatchedRecipe,
    explanations: Vec<Explanation>,
}

async fn run_generate<B: RecipeBackend>(
    generator: &RecipeGenerator<B>,
    ingredients: &[String],
    time: i64,
    format: &str,
) -> Result<()> {
    let results = match generator.generate(ingredients, time).await {
        Ok(results) => results,
        Err(e) if e.is_user_fixable() => bail!("{e}. Check your ingredients and time."),
        Err(e) => return Err(e).context("Could not reach the recipe catalog, try again later"),
    };

    // Validation passed, so the budget is a positive u32
    let available_time = u32::try_from(time)?;

    if format == "json" {
        let suggestions: Vec<Suggestion<'_>> = results
            .iter()
            .map(|recipe| Suggestion {
                recipe,
                explanations: explain_match(recipe, available_time),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    println!("Ingredients: {}", ingredients.join(", "));
    println!("Available time: {} mins", available_time);
    println!("---");

    for (i, hit) in results.iter().enumerate() {
        println!("\n{}. {} ({})", i + 1, hit.recipe.title, hit.recipe.id);
        println!(
            "   Match Score: {:.2} | {} | {} servings",
            hit.match_score, hit.recipe.difficulty, hit.recipe.servings
        );
        println!("   {}", summarize_match(hit, available_time));

        if hit.has_ingredient_match() {
            println!("   Matches your ingredients: {}", hit.matched_ingredients.join(", "));
        }
        if hit.additional_ingredients > 0 {
            println!("   Need {} more ingredient(s)", hit.additional_ingredients);
        }
    }

    println!("\n---");
    println!("Total: {} suggestions", results.len());

    Ok(())
}

async fn run_search<B: RecipeBackend>(
    generator: &RecipeGenerator<B>,
    query: &str,
    format: &str,
) -> Result<()> {
    let recipes = generator.search(query).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
    } else {
        print_recipes(&recipes);
        println!("\n---");
        println!("Total: {} results", recipes.len());
    }

    Ok(())
}

fn print_recipes(recipes: &[Recipe]) {
    for (i, recipe) in recipes.iter().enumerate() {
        println!("\n{}. {} ({})", i + 1, recipe.title, recipe.id);
        println!(
            "   {} | {} | {} mins | {} servings",
            recipe.category, recipe.difficulty, recipe.prep_time, recipe.servings
        );
        if !recipe.description.is_empty() {
            println!("   {}", recipe.description);
        }
    }
}

async fn run_health<B: RecipeBackend>(backend: &B) -> Result<()> {
    print!("Checking {} backend... ", backend.name());

    match backend.health_check().await {
        Ok(()) => {
            println!("OK");
            Ok(())
        }
        Err(e) => {
            println!("FAILED");
            bail!("{} backend unhealthy: {}", backend.name(), e)
        }
    }
}
