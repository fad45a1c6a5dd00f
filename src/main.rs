use charsheet::config::AppConfig;
use charsheet::core::CharacterSheetService;
use charsheet::database::{CharacterOps, Database};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load();
    let _log_guard = charsheet::core::logging::init(&config.logging, &config.log_dir());
    log::info!("{} v{} starting", charsheet::NAME, charsheet::VERSION);

    let db = Database::with_config(&config.data_dir(), &config.database).await?;
    let result = run(&db, std::env::args().nth(1)).await;
    db.close().await;

    if let Err(e) = result {
        log::error!("{e}");
        eprintln!("Error: {e}");
        // exit() skips destructors; flush file logs first
        drop(_log_guard);
        std::process::exit(1);
    }

    Ok(())
}

/// Print one character's combat view as JSON, or list all characters.
async fn run(db: &Database, character_id: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    match character_id {
        Some(id) => {
            let view = CharacterSheetService::new(db.clone()).combat_view(&id).await?;
            for warning in &view.warnings {
                log::warn!("{}", warning);
            }
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        None => {
            let characters = db.list_characters(None).await?;
            if characters.is_empty() {
                println!("No characters in {}", db.path().display());
            }
            for character in characters {
                println!("{}\t{}\tlevel {}", character.id, character.name, character.level);
            }
        }
    }
    Ok(())
}
