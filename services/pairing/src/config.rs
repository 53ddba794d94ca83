/// Pairing service configuration loaded from environment variables.
#[derive(Debug)]
pub struct PairingConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on (default 3114). Env var: `PAIRING_PORT`.
    pub pairing_port: u16,
}

impl PairingConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            pairing_port: std::env::var("PAIRING_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3114),
        }
    }
}
