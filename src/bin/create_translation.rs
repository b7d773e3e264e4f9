use anyhow::{bail, Context, Result};
use clap::Parser;
use dialoguer::{theme::ColorfulTheme, MultiSelect};
use row_translations::generator::{
    select_by_name, FieldCandidate, GenerateOutcome, GeneratorSettings, TranslationGenerator,
};
use row_translations::{Config, Database, LanguageManager};
use tracing::info;

/// Scaffold a translation table and schema module for a model
#[derive(Parser, Debug)]
#[command(name = "create-translation", version)]
struct Cli {
    /// Model name, e.g. Post or BlogCategory
    model: String,

    /// Translate every candidate column without prompting
    #[arg(long, conflicts_with = "fields")]
    all: bool,

    /// Comma-separated columns to translate, skipping the prompt
    #[arg(long, value_delimiter = ',')]
    fields: Vec<String>,

    /// Overwrite an existing translation model
    #[arg(long)]
    force: bool,

    /// Apply the generated migration to the configured database
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("row_translations=info".parse()?)
                .add_directive("create_translation=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: &Cli) -> Result<()> {
    let config = Config::from_env()?;

    let db = Database::connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database at {}", config.database_url))?;
    let languages = LanguageManager::new(db.clone(), &config.languages_table)?;
    let generator = TranslationGenerator::new(db, languages, GeneratorSettings::from_config(&config));

    let names = generator.names(&cli.model)?;
    info!("Creating translation scaffolding for {}", names.model);

    let candidates = generator.candidate_fields(&cli.model).await?;
    if candidates.is_empty() {
        bail!(
            "Table '{}' has no columns that can be translated",
            names.base_table
        );
    }

    print_candidates(&candidates);

    let selected = if cli.all {
        candidates.iter().map(|c| c.name.clone()).collect()
    } else if !cli.fields.is_empty() {
        select_by_name(&candidates, &cli.fields)?
    } else {
        prompt_fields(&generator, &candidates)?
    };

    match generator.generate(&cli.model, &selected, cli.force)? {
        GenerateOutcome::NothingSelected => {
            println!("No fields selected. Nothing was generated.");
        }
        GenerateOutcome::AlreadyExists(path) => {
            println!(
                "Translation model already exists: {} (use --force to overwrite)",
                path.display()
            );
        }
        GenerateOutcome::Created(files) => {
            println!("📝 Model:     {}", files.model_path.display());
            println!("🗄️  Migration: {}", files.migration_path.display());

            if cli.migrate {
                generator
                    .apply(&files)
                    .await
                    .context("Failed to apply migration")?;
                println!("✓ Created table {}", names.translation_table);
            }

            print_next_steps(&names.schema_const, &names.module_name, cli.migrate);
        }
    }

    Ok(())
}

fn print_candidates(candidates: &[FieldCandidate]) {
    println!("Translatable columns:");
    for candidate in candidates {
        let marker = if candidate.commonly_translatable {
            " 🌟"
        } else {
            ""
        };
        println!("  - {}{}", candidate.name, marker);
    }
}

fn prompt_fields(
    generator: &TranslationGenerator,
    candidates: &[FieldCandidate],
) -> Result<Vec<String>> {
    let items: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
    let defaults = generator.default_selection(candidates);

    let chosen = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select the fields to translate (space to toggle)")
        .items(&items)
        .defaults(&defaults)
        .interact()?;

    Ok(chosen
        .into_iter()
        .map(|i| candidates[i].name.clone())
        .collect())
}

fn print_next_steps(schema_const: &str, module_name: &str, migrated: bool) {
    println!();
    println!("Next steps:");
    let mut step = 1;
    if !migrated {
        println!("  {}. Apply the migration (or rerun with --migrate)", step);
        step += 1;
    }
    println!("  {}. Add `mod {};` to your models module", step, module_name);
    println!(
        "  {}. Implement `Translatable` for the model, returning &{}",
        step + 1,
        schema_const
    );
}
