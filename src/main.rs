use anyhow::{bail, Context, Result};
use pokedex_to_sqlite::{
    api::PokeApiClient,
    cli::{Cli, Commands},
    config::Settings,
    filter::resolve_ids,
    ingest::{ingest_one, populate, BatchReport},
    parser::display_name,
    repl::{print_lookup, run_prompt},
    schema::DependencyResolver,
    store::initialize_schema,
    ui::{LogUi, Phase, Ui, UiApp},
};
use std::io;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(quiet: bool) {
    let default = if quiet { "error" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Create the schema and fetch `ids`, with either the full-screen or the log UI
fn build_database(settings: &Settings, ids: &[u32], tui: bool) -> Result<BatchReport> {
    let client = PokeApiClient::new(&settings.api_url, settings.timeout)
        .context("Failed to create HTTP client")?;

    if tui {
        let mut ui = UiApp::new()?;
        ui.set_phase(Phase::Preparing);
        if let Err(e) = initialize_schema(&settings.db_path) {
            ui.restore()?;
            return Err(e).context("Failed to initialize database schema");
        }
        let report = populate(&client, &settings.db_path, ids, &mut ui);
        ui.finish(&report.summary())?;
        Ok(report)
    } else {
        let mut ui = LogUi::new();
        ui.set_phase(Phase::Preparing);
        initialize_schema(&settings.db_path).context("Failed to initialize database schema")?;
        let report = populate(&client, &settings.db_path, ids, &mut ui);
        ui.set_phase(Phase::Complete);
        ui.log(report.summary());
        Ok(report)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let quiet = matches!(
        cli.command,
        Commands::Run { tui: true, .. } | Commands::Sync { tui: true, .. }
    );
    init_tracing(quiet);

    let settings = Settings::from_args(&cli.global)?;

    match cli.command {
        Commands::Run { max_id, tui } => {
            if !settings.db_path.exists() {
                println!(
                    "The database file {:?} was not found. Creating database and loading Pokémon data...",
                    settings.db_path
                );
                let ids: Vec<u32> = (1..=max_id).collect();
                let report = build_database(&settings, &ids, tui)?;
                if report.is_complete() {
                    println!("Database created successfully.");
                } else {
                    println!("Database partially created: {}", report.summary());
                    for (id, error) in &report.failed {
                        println!("  ID {}: {}", id, error);
                    }
                }
            }

            let stdin = io::stdin();
            let mut stdout = io::stdout();
            run_prompt(stdin.lock(), &mut stdout, &settings.db_path, max_id)?;
        }

        Commands::Sync { from, to, ids, tui } => {
            let start = Instant::now();
            let ids = resolve_ids(from, to, ids)?;

            let report = build_database(&settings, &ids, tui)?;

            println!(
                "\nPopulated {:?}: {} in {:.1}s",
                settings.db_path,
                report.summary(),
                start.elapsed().as_secs_f64()
            );
            for (id, error) in &report.failed {
                println!("  ID {}: {}", id, error);
            }
        }

        Commands::Fetch { id } => {
            initialize_schema(&settings.db_path).context("Failed to initialize database schema")?;
            let client = PokeApiClient::new(&settings.api_url, settings.timeout)
                .context("Failed to create HTTP client")?;

            let ingested = ingest_one(&client, &settings.db_path, id)
                .with_context(|| format!("Failed to fetch Pokémon {}", id))?;
            info!(summary = ?ingested.summary, "normalized");
            println!(
                "Inserted {} (ID {})",
                display_name(&ingested.name),
                ingested.id
            );
        }

        Commands::Show { id } => {
            if !settings.db_path.exists() {
                bail!(
                    "Database {:?} does not exist; run `sync` or `run` first",
                    settings.db_path
                );
            }
            print_lookup(&settings.db_path, id, &mut io::stdout())?;
        }

        Commands::ListTables => {
            let tables = DependencyResolver::new()
                .creation_order()
                .map_err(anyhow::Error::msg)?;
            println!("Tables:\n");
            for table in tables {
                println!("  {}", table.name);
            }
        }
    }

    Ok(())
}
