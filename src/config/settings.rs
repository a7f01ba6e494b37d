const DEFAULT_DATABASE_PATH: &str = "chess_tournament.db";

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub database_path: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TournamentSettings {
    /// Actor id that aborts roster entry
    pub cancel_sentinel: &'static str,
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self {
            cancel_sentinel: "00000000",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreSettings,
    pub tournament: TournamentSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            store: StoreSettings::default(),
            tournament: TournamentSettings::default(),
        }
    }
}
