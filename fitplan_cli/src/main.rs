use clap::{Parser, Subcommand};
use fitplan_core::journal::{records_for, GenerationSink};
use fitplan_core::solver::{solve_equivalent_explained, solve_quantity_for_target_explained};
use fitplan_core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fitplan")]
#[command(about = "Nutrition and workout plan generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Whose plan to read or write
    #[arg(long, global = true, default_value = "default")]
    user: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a plan from a profile file (TOML or JSON)
    Generate {
        #[arg(long)]
        profile: PathBuf,

        /// Seed for the snack fruit pick
        #[arg(long)]
        seed: Option<u64>,

        /// Dry run - print the plan without storing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the stored plan
    Show,

    /// Swap one food of a meal option for an equivalent amount of another
    Swap {
        /// breakfast, lunch, dinner or meal4
        #[arg(long)]
        meal: String,

        /// a or b
        #[arg(long)]
        option: String,

        /// protein, carb or fat
        #[arg(long)]
        role: String,

        /// Replacement food (key or name)
        #[arg(long)]
        to: String,
    },

    /// Size a food to supply a macro target
    Quantity {
        /// Food key or name
        #[arg(long)]
        food: String,

        /// Grams of the category's macro
        #[arg(long)]
        target: f64,

        /// protein, carbs or fats (defaults to the food's own category)
        #[arg(long)]
        category: Option<String>,
    },

    /// Export the stored plan's meals to CSV
    Export {
        #[arg(long)]
        out: PathBuf,
    },

    /// List the food knowledge base
    Foods,

    /// List past generations
    History,
}

fn main() {
    fitplan_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let user = cli.user;
    tracing::debug!("Using data dir {:?} for user {}", data_dir, user);

    match cli.command {
        Commands::Generate {
            profile,
            seed,
            dry_run,
        } => cmd_generate(&data_dir, &user, &profile, seed, dry_run, &config),
        Commands::Show => cmd_show(&data_dir, &user),
        Commands::Swap {
            meal,
            option,
            role,
            to,
        } => cmd_swap(&data_dir, &user, &meal, &option, &role, &to),
        Commands::Quantity {
            food,
            target,
            category,
        } => cmd_quantity(&food, target, category.as_deref()),
        Commands::Export { out } => cmd_export(&data_dir, &user, &out),
        Commands::Foods => cmd_foods(),
        Commands::History => cmd_history(&data_dir, &user),
    }
}

fn cmd_generate(
    data_dir: &Path,
    user: &str,
    profile_path: &Path,
    seed: Option<u64>,
    dry_run: bool,
    config: &Config,
) -> Result<()> {
    let draft = ProfileDraft::load_from(profile_path)?;
    let ctx = GenerationContext::with_defaults(config);

    let seed = seed.or(config.generation.seed);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let plan = generate_plan(&draft, &ctx, &mut rng)?;
    display_plan(&plan);

    if dry_run {
        println!("\n[Dry run - plan not saved]");
        return Ok(());
    }

    let store = PlanStore::in_data_dir(data_dir);
    let path = store.save(user, &plan)?;

    let mut log = JsonlLog::in_data_dir(data_dir);
    log.append(&GenerationRecord::new(user, seed, plan.targets()))?;

    println!("\n✓ Plan saved for {}", user);
    println!("  Plan: {}", path.display());
    Ok(())
}

fn load_plan(data_dir: &Path, user: &str) -> Result<Plan> {
    PlanStore::in_data_dir(data_dir)
        .load(user)?
        .ok_or_else(|| Error::Other(format!("No plan stored for {}; run `fitplan generate` first", user)))
}

fn resolve_food<'a>(foods: &'a FoodKnowledgeBase, text: &str) -> Result<&'a FoodItem> {
    foods
        .get(text)
        .or_else(|| foods.resolve_name(text))
        .ok_or_else(|| Error::Other(format!("Unknown food: {}", text)))
}

fn cmd_show(data_dir: &Path, user: &str) -> Result<()> {
    let plan = load_plan(data_dir, user)?;
    display_plan(&plan);
    Ok(())
}

fn cmd_swap(
    data_dir: &Path,
    user: &str,
    meal: &str,
    option: &str,
    role: &str,
    to: &str,
) -> Result<()> {
    let plan = load_plan(data_dir, user)?;
    let foods = default_foods();
    let key = PatchKey::new(meal.parse()?, option.parse()?, role.parse()?);
    let target = resolve_food(foods, to)?;

    let mut patch = PlanPatch::new();
    if patch.swap(foods, &plan, key, &target.key).is_none() {
        let source = SubstitutionSource::from((patch.effective(&plan, &key), key.role));
        let reason = solve_equivalent_explained(foods, &source, &target.key, Macro::Protein)
            .err()
            .map(|failure| failure.to_string())
            .unwrap_or_else(|| "no equivalent quantity".into());
        return Err(Error::Other(format!("Cannot swap to {}: {}", target.display_name, reason)));
    }

    let patched = patch.apply(&plan);
    let meal = patched.meals.get(key.slot);
    println!("{} - option {} (not saved)", meal.title, option.trim().to_uppercase());
    display_option(meal.option(key.choice), Some(key.role));
    Ok(())
}

fn cmd_quantity(food: &str, target: f64, category: Option<&str>) -> Result<()> {
    let foods = default_foods();
    let item = resolve_food(foods, food)?;
    let category = match category {
        Some(c) => c.parse::<FoodCategory>()?,
        None => item.category,
    };

    let solved = solve_quantity_for_target_explained(foods, target, &item.key, category)
        .map_err(|failure| Error::Other(failure.to_string()))?;

    println!("{} {}", solved.label, solved.food_name);
    println!(
        "  P {:.1}g / C {:.1}g / F {:.1}g / {:.0} kcal",
        solved.macros.protein, solved.macros.carbs, solved.macros.fat, solved.macros.calories
    );
    Ok(())
}

fn cmd_export(data_dir: &Path, user: &str, out: &Path) -> Result<()> {
    let plan = load_plan(data_dir, user)?;
    let count = write_meals_csv(&plan, default_foods(), out)?;

    println!("✓ Exported {} rows", count);
    println!("  CSV: {}", out.display());
    Ok(())
}

fn cmd_foods() -> Result<()> {
    let foods = default_foods();
    for category in FoodCategory::ALL {
        println!("{}:", category.as_str());
        for (key, item) in foods.by_category(category) {
            let basis = match item.unit {
                UnitKind::Per100g => "per 100g".to_string(),
                UnitKind::PerPiece => format!("per {}", item.label(Quantity::Pieces(1))),
            };
            println!(
                "  {:<18} {:<22} {:>9}  P {:>5.1} C {:>5.1} F {:>5.1} {:>4.0} kcal",
                key,
                item.display_name,
                basis,
                item.density.protein,
                item.density.carbs,
                item.density.fat,
                item.density.calories
            );
        }
    }
    Ok(())
}

fn cmd_history(data_dir: &Path, user: &str) -> Result<()> {
    let log = JsonlLog::in_data_dir(data_dir);
    let records = records_for(log.path(), user)?;

    if records.is_empty() {
        println!("No generations recorded for {}.", user);
        return Ok(());
    }

    for record in records {
        let seed = record
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{}  {} kcal  P {}g  F {}g  C {}g  seed {}",
            record.generated_at.format("%Y-%m-%d %H:%M:%S"),
            record.targets.calories,
            record.targets.protein_grams,
            record.targets.fat_grams,
            record.targets.carb_grams,
            seed
        );
    }
    Ok(())
}

fn display_plan(plan: &Plan) {
    println!(
        "Daily targets: {} kcal | protein {}g | fat {}g | carbs {}g",
        plan.calories, plan.protein, plan.fat, plan.carbs
    );

    for slot in MealSlot::ALL {
        let meal = plan.meals.get(slot);
        println!("\n{}", meal.title);
        for (choice, label) in [(MealChoice::A, "A"), (MealChoice::B, "B")] {
            println!("  Option {}", label);
            display_option(meal.option(choice), None);
        }
    }

    println!("\nWorkout");
    for day in &plan.workout.days {
        let cardio = match &day.cardio {
            Some(c) => match c.kind {
                CardioKind::SteadyState => format!(" + {} min cardio", c.duration_minutes),
                CardioKind::Hiit => format!(" ({} min)", c.duration_minutes),
            },
            None => String::new(),
        };
        println!("  {:<9} {}{}", day.day_label, day.title, cardio);
        for exercise in &day.gym_exercises {
            println!("    - {}", exercise.name);
        }
    }
}

fn display_option(option: &MealOption, highlight: Option<FoodCategory>) {
    let foods = default_foods();
    for role in FoodCategory::ALL {
        let portion = option.portion(role);
        let amount = foods
            .get(&portion.food_key)
            .map(|f| f.label(portion.quantity))
            .unwrap_or_else(|| portion.quantity.amount().to_string());
        let marker = if highlight == Some(role) { " *" } else { "" };
        println!("    {:<8} {} {}{}", role.as_str(), amount, portion.food_name, marker);
    }
}
