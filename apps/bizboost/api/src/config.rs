use axum_helpers::CorsPolicy;
use core_config::{AppInfo, FromEnv, app_info, env_or_default, server::ServerConfig};
use domain_advisor::AdvisorConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `core_config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub advisor: AdvisorConfig,
    pub cors: CorsPolicy,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let advisor = AdvisorConfig::from_env()?; // Requires GOOGLE_CLOUD_PROJECT
        let cors = CorsPolicy::from_origins(&env_or_default("CORS_ALLOWED_ORIGIN", "*"))?;

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            advisor,
            cors,
        })
    }
}
