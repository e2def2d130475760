use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let pool = DatabaseManager::connect(&config.database).await?;

    let result = DatabaseManager::migrate(&pool).await;
    DatabaseManager::close(&pool).await;
    result?;

    let database = config.redacted_database_url();
    match output_format {
        OutputFormat::Json => println!("{}", json!({ "migrated": true, "database": database })),
        OutputFormat::Text => println!("Migrations applied to {}", database),
    }
    Ok(())
}
