use crate::cli::OutputFormat;
use crate::config::AppConfig;

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env()?;
    config.database.url = config.redacted_database_url();

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => {
            println!("environment: {:?}", config.environment);
            println!("listen:      {}", config.bind_addr());
            println!("database:    {}", config.database.url);
            println!(
                "pool:        {} connections, {}s acquire timeout",
                config.database.max_connections, config.database.connection_timeout
            );
            println!("migrations:  {}", if config.database.run_migrations { "on startup" } else { "manual" });
            println!("token ttl:   {}h", config.security.jwt_expiry_hours);
            if config.security.cors_origins.is_empty() {
                println!("cors:        any origin");
            } else {
                println!("cors:        {}", config.security.cors_origins.join(", "));
            }
        }
    }
    Ok(())
}
