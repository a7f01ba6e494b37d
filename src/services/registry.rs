use anyhow::Result;
use log::info;
use rusqlite::Connection;

use crate::codec;
use crate::config::TournamentSettings;
use crate::database::{self, records, DbPool, ACTORS_TABLE};
use crate::domain::{Actor, ActorDirectory};
use crate::errors::with_record_context;

/// Loads and saves the actor directory
#[derive(Clone)]
pub struct RegistryService {
    pool: DbPool,
    settings: TournamentSettings,
}

impl RegistryService {
    pub fn new(pool: DbPool, settings: TournamentSettings) -> Self {
        Self { pool, settings }
    }

    pub fn load(&self) -> Result<ActorDirectory> {
        let conn = database::get_connection(&self.pool)?;
        let actors = records::all(&conn, ACTORS_TABLE)?
            .iter()
            .map(|record| with_record_context(codec::deserialize::<Actor>(record), "actor"))
            .collect::<Result<Vec<_>>>()?;

        info!("Loaded {} actors", actors.len());
        Ok(ActorDirectory::from_actors(actors, self.settings.cancel_sentinel))
    }

    /// Replace the stored actors with the directory's content
    pub fn save(&self, directory: &ActorDirectory) -> Result<()> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction()?;
        write_actors(&tx, directory)?;
        tx.commit()?;

        info!("Saved {} actors", directory.len());
        Ok(())
    }
}

/// Replace the actor records inside the caller's transaction
pub(crate) fn write_actors(conn: &Connection, directory: &ActorDirectory) -> Result<()> {
    records::truncate(conn, ACTORS_TABLE)?;
    for actor in directory.actors() {
        records::insert(conn, ACTORS_TABLE, &codec::serialize(actor)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Gender, NewActor};
    use chrono::NaiveDate;

    fn service() -> RegistryService {
        let pool = database::create_memory_pool().unwrap();
        RegistryService::new(pool, TournamentSettings::default())
    }

    #[test]
    fn test_save_and_load_directory() {
        let registry = service();
        let mut directory = registry.load().unwrap();
        assert!(directory.is_empty());

        directory.register(NewActor {
            last_name: "Tano".to_string(),
            first_name: "Ahsoka".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1936, 11, 22).unwrap(),
            gender: Gender::Female,
            rank: 35,
        }).unwrap();
        registry.save(&directory).unwrap();
        registry.save(&directory).unwrap();

        let reloaded = registry.load().unwrap();
        assert_eq!(reloaded.len(), 1);
        let actor = reloaded.get("00000001").unwrap();
        assert_eq!(actor, directory.get("00000001").unwrap());
    }
}
