use clap::Parser;
use color_eyre::Result;
use plantkeep::{
    cli::{self, Cli, Commands},
    logging::init_logging,
    utils::{expand_path, SystemClock},
    Config, Database, PlantTracker, Profile, ViewCache,
};
use tracing::info;

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev keeps a separate config and database
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from_path(&expand_path(path))?,
        None => Config::load_with_profile(profile)?,
    };

    init_logging(&config.get_log_path(), &config.log_level)?;
    info!(?profile, database = %config.database_path, "starting plantkeep");

    let db_path = config.get_database_path();
    let db = Database::new(
        db_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?,
    )?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let tracker = PlantTracker::new(db, ViewCache::new(), SystemClock);
            let app = plantkeep::tui::App::new(config, tracker);
            plantkeep::tui::run_event_loop(app)?;
        }
        command => {
            let mut tracker = PlantTracker::new(db, ViewCache::new(), SystemClock);
            let stdin = std::io::stdin();
            cli::run_command(command, &mut tracker, stdin.lock(), std::io::stdout())?;
        }
    }

    Ok(())
}
