use std::{
    error::Error,
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use household_ledger::{
    CategorySet, ColorScheme, Entry, LedgerConfig, Period, doughnut_chart, filter_by_month,
    load_path, newest_first, report, summarize_month,
};

/// Monthly income and expense summaries for a household ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to a JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write debug logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize the income and expenses of one month.
    Summary(SummaryArgs),

    /// Show or edit the saved list of categories.
    Categories {
        /// File path to the JSON category list.
        #[arg(long)]
        file: PathBuf,

        #[command(subcommand)]
        action: CategoryAction,
    },
}

#[derive(clap::Args, Debug)]
struct SummaryArgs {
    /// File path to the entry snapshot, either `.json` or `.csv`.
    #[arg(long)]
    entries: PathBuf,

    /// The year to summarize. Defaults to the current year in UTC.
    #[arg(long, requires = "month")]
    year: Option<i32>,

    /// The month to summarize, 1 to 12. Defaults to the current month in UTC.
    #[arg(long, requires = "year")]
    month: Option<u8>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write doughnut chart options for ECharts into this directory.
    #[arg(long)]
    chart_dir: Option<PathBuf>,

    /// Overrides the color scheme from the config file.
    #[arg(long, value_enum)]
    colors: Option<Colors>,

    /// Overrides the label for entries without a category.
    #[arg(long)]
    fallback_category: Option<String>,

    /// Also list the month's entries, newest first.
    #[arg(long)]
    list: bool,
}

#[derive(Subcommand, Debug)]
enum CategoryAction {
    /// Print the categories.
    List,
    /// Add a category if it is not already listed.
    Add { label: String },
    /// Remove a category.
    Remove { label: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Colors {
    Palette,
    Hue,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(args.log_file.as_deref())?;

    let config = match &args.config {
        Some(path) => LedgerConfig::from_json_file(path)?,
        None => LedgerConfig::default(),
    };

    match args.command {
        Command::Summary(summary_args) => run_summary(summary_args, config),
        Command::Categories { file, action } => run_categories(&file, action, &config),
    }
}

fn setup_logging(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let console_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()));

    let debug_log = match log_file {
        Some(path) => {
            let log_file = OpenOptions::new().create(true).append(true).open(path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_writer(Arc::new(log_file))
                    .with_filter(filter::LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console_log)
        .with(debug_log)
        .init();

    Ok(())
}

fn run_summary(args: SummaryArgs, mut config: LedgerConfig) -> Result<(), Box<dyn Error>> {
    if let Some(fallback_category) = args.fallback_category {
        if fallback_category.trim().is_empty() {
            return Err(household_ledger::Error::InvalidConfig(
                "fallback category cannot be empty".to_owned(),
            )
            .into());
        }

        config.fallback_category = fallback_category.trim().to_owned();
    }

    if let Some(colors) = args.colors {
        config.color_scheme = color_scheme_for(colors, config.color_scheme);
    }

    let snapshot = load_path(&args.entries)?;

    let (year, month) = match (args.year, args.month) {
        (Some(year), Some(month)) => (year, month),
        _ => {
            let period = Period::current();
            (period.year(), period.month())
        }
    };

    tracing::info!(
        "Summarizing {} entries from {:?} for {year}-{month:02}",
        snapshot.entries.len(),
        args.entries
    );

    let summary = summarize_month(&snapshot.entries, year, month, &config);

    match args.format {
        Format::Text => println!("{}", report::render_summary(&summary)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    if args.list {
        let entries: Vec<Entry> = filter_by_month(&snapshot.entries, year, month)
            .into_iter()
            .filter_map(|entry| entry.validate().ok())
            .collect();

        println!();
        println!(
            "{}",
            report::render_entries(&newest_first(&entries), &config.fallback_category)
        );
    }

    if let Some(chart_dir) = args.chart_dir {
        fs::create_dir_all(&chart_dir)?;

        let charts = [
            ("income", "Income", summary.income_chart(&config.color_scheme)),
            ("expense", "Expenses", summary.expense_chart(&config.color_scheme)),
        ];

        for (name, title, series) in charts {
            match series {
                Some(series) => {
                    let path = chart_dir.join(format!("{name}.json"));
                    fs::write(&path, doughnut_chart(&series, title).to_string())?;
                    tracing::info!("Wrote {title} chart to {path:?}");
                }
                None => eprintln!("{title}: No data"),
            }
        }
    }

    Ok(())
}

/// Applies `--colors` on top of the configured scheme. A configured palette is
/// kept for `palette` unless it is empty, since an empty palette renders as
/// hue rotation.
fn color_scheme_for(colors: Colors, configured: ColorScheme) -> ColorScheme {
    match (colors, configured) {
        (Colors::Hue, _) => ColorScheme::HueRotation,
        (Colors::Palette, ColorScheme::Palette(palette)) if !palette.is_empty() => {
            ColorScheme::Palette(palette)
        }
        (Colors::Palette, _) => ColorScheme::default(),
    }
}

fn run_categories(
    path: &Path,
    action: CategoryAction,
    config: &LedgerConfig,
) -> Result<(), Box<dyn Error>> {
    let categories = load_categories(path, config)?;

    let categories = match action {
        CategoryAction::List => {
            print_categories(&categories);
            return Ok(());
        }
        CategoryAction::Add { label } => categories.add(&label),
        CategoryAction::Remove { label } => categories.remove(&label),
    };

    fs::write(path, serde_json::to_string_pretty(&categories)?)?;
    tracing::info!("Saved {} categories to {path:?}", categories.len());

    print_categories(&categories);

    Ok(())
}

fn load_categories(
    path: &Path,
    config: &LedgerConfig,
) -> Result<CategorySet, household_ledger::Error> {
    if !path.is_file() {
        tracing::debug!("No category list at {path:?}, using the defaults");
        return Ok(CategorySet::with_defaults(config));
    }

    let text = fs::read_to_string(path)?;

    serde_json::from_str(&text)
        .map_err(|error| household_ledger::Error::InvalidCategoryList(error.to_string()))
}

fn print_categories(categories: &CategorySet) {
    if categories.is_empty() {
        println!("No categories");
        return;
    }

    for category in categories.iter() {
        println!("{category}");
    }
}
