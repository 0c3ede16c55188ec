use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub email: EmailSettings,
    pub push: PushSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// Public base URL used when building links embedded in emails and
    /// notification actions.
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_ttl_secs: u64,
    pub refresh_token_ttl_secs: u64,
    pub issuer: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailSettings {
    pub enabled: bool,
    pub api_key: String,
    pub endpoint: String,
    pub from: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PushSettings {
    pub enabled: bool,
    pub server_key: String,
    pub endpoint: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("TRIPDESK"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 3000)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("app.base_url", "http://localhost:3000")?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "tripdesk")?
            .set_default("jwt.secret", "change-me-in-production")?
            .set_default("jwt.access_token_ttl_secs", 3600)?
            .set_default("jwt.refresh_token_ttl_secs", 604800)?
            .set_default("jwt.issuer", "tripdesk")?
            .set_default("email.enabled", false)?
            .set_default("email.api_key", "")?
            .set_default("email.endpoint", "https://api.resend.com/emails")?
            .set_default("email.from", "Tripdesk <bookings@tripdesk.example>")?
            .set_default("push.enabled", false)?
            .set_default("push.server_key", "")?
            .set_default("push.endpoint", "https://fcm.googleapis.com/fcm/send")?
            .build()?;

        config.try_deserialize()
    }
}
