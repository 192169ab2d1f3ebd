//! `meal-plan` command-line front end
//!
//! Loads a JSON dish catalog, runs one generation and prints the result as
//! JSON on stdout. Logs go to stderr, filtered by `RUST_LOG`.

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use meal_catalog::{FilterOptions, InMemoryCatalog, SlotCategory};
use meal_plan::{
    generate_seed, CategoryProfile, LockedDishes, PlanGenerationResult, PlanGenerator, PlanMode,
    PlanRequest, PlannerConfig,
};
use std::path::PathBuf;

fn cli() -> Command {
    Command::new("meal-plan")
        .version(meal_plan::VERSION)
        .about("Seeded daily and weekly meal plans")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("generate")
                .about("Generate a plan from a JSON catalog")
                .arg(
                    Arg::new("catalog")
                        .long("catalog")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON array of dishes"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML planner configuration"),
                )
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .value_parser(["daily", "weekly"])
                        .help("Plan length, defaults to the configured mode"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed for reproducible plans"),
                )
                .arg(
                    Arg::new("filters")
                        .long("filters")
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON file with filter options"),
                )
                .arg(
                    Arg::new("categories")
                        .long("categories")
                        .value_delimiter(',')
                        .value_parser(value_parser!(SlotCategory))
                        .help("Comma-separated category list, e.g. soup,main_fish"),
                )
                .arg(
                    Arg::new("lock")
                        .long("lock")
                        .action(ArgAction::Append)
                        .value_name("CATEGORY=DISH_ID")
                        .help("Pin a dish to a category on the first day"),
                )
                .arg(
                    Arg::new("allow-repeats")
                        .long("allow-repeats")
                        .action(ArgAction::SetTrue)
                        .help("Allow the same dish on several days of a week"),
                )
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .action(ArgAction::SetTrue)
                        .help("Pretty-print the JSON result"),
                ),
        )
        .subcommand(Command::new("seed").about("Print a fresh random seed"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("generate", args)) => {
            let result = generate(args).await?;
            let json = if args.get_flag("pretty") {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{json}");

            if !result.is_success() {
                for error in result.errors() {
                    eprintln!("error: {error}");
                    if let Some(hint) = error.hint() {
                        eprintln!("  hint: {hint}");
                    }
                }
                std::process::exit(1);
            }
        }
        Some(("seed", _)) => println!("{}", generate_seed()),
        _ => unreachable!("subcommand is required"),
    }
    Ok(())
}

async fn generate(args: &ArgMatches) -> Result<PlanGenerationResult> {
    let config = match args.get_one::<PathBuf>("config") {
        Some(path) => PlannerConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlannerConfig::default(),
    };

    let catalog_path = args
        .get_one::<PathBuf>("catalog")
        .context("--catalog is required")?;
    let catalog = InMemoryCatalog::from_json_file(catalog_path)
        .with_context(|| format!("loading catalog {}", catalog_path.display()))?;
    tracing::info!(dishes = catalog.len(), "catalog loaded");

    let mut request = PlanRequest::from_config(&config);

    if let Some(mode) = args.get_one::<String>("mode") {
        request = request.with_mode(match mode.as_str() {
            "weekly" => PlanMode::Weekly,
            _ => PlanMode::Daily,
        });
    }
    if let Some(seed) = args.get_one::<String>("seed") {
        request = request.with_seed(seed.clone());
    }
    if let Some(path) = args.get_one::<PathBuf>("filters") {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading filters {}", path.display()))?;
        let filters: FilterOptions = serde_json::from_str(&json)
            .with_context(|| format!("parsing filters {}", path.display()))?;
        request = request.with_filters(filters);
    }
    if let Some(categories) = args.get_many::<SlotCategory>("categories") {
        let categories: Vec<SlotCategory> = categories.copied().collect();
        request = request.with_profile(CategoryProfile::from_categories("cli", &categories));
    }
    if let Some(locks) = args.get_many::<String>("lock") {
        request = request.with_locks(parse_locks(locks)?);
    }
    if args.get_flag("allow-repeats") {
        request = request.with_no_repeat_across_week(false);
    }

    let generator = PlanGenerator::with_config(catalog, config);
    Ok(generator.generate_plan(&request).await?)
}

fn parse_locks<'a>(entries: impl Iterator<Item = &'a String>) -> Result<LockedDishes> {
    let mut locks = LockedDishes::new();
    for entry in entries {
        let Some((category, id)) = entry.split_once('=') else {
            bail!("lock `{entry}` is not CATEGORY=DISH_ID");
        };
        let category: SlotCategory = category.trim().parse()?;
        let id: u64 = id
            .trim()
            .parse()
            .with_context(|| format!("lock `{entry}` has a non-numeric dish id"))?;
        locks = locks.with(category, id);
    }
    Ok(locks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn parses_lock_arguments() {
        let entries = vec!["soup=3".to_string(), " main_fish = 12 ".to_string()];
        let locks = parse_locks(entries.iter()).unwrap();
        assert_eq!(locks.get(SlotCategory::Soup).map(|d| d.value()), Some(3));
        assert_eq!(locks.get(SlotCategory::MainFish).map(|d| d.value()), Some(12));
    }

    #[test]
    fn rejects_bad_lock_arguments() {
        for bad in ["soup", "stew=1", "soup=abc"] {
            let entries = vec![bad.to_string()];
            assert!(parse_locks(entries.iter()).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn generate_arguments_parse() {
        let matches = cli()
            .try_get_matches_from([
                "meal-plan",
                "generate",
                "--catalog",
                "dishes.json",
                "--mode",
                "weekly",
                "--categories",
                "soup,muffin",
                "--lock",
                "soup=1",
                "--allow-repeats",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let categories: Vec<SlotCategory> =
            args.get_many::<SlotCategory>("categories").unwrap().copied().collect();
        assert_eq!(categories, vec![SlotCategory::Soup, SlotCategory::Muffin]);
        assert!(args.get_flag("allow-repeats"));
    }
}
