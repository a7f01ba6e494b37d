use anyhow::{bail, Result};
use chrono::Local;
use log::info;

use super::registry::{self, RegistryService};
use super::snapshot::{self, Resumed};
use crate::config::AppConfig;
use crate::database::{self, DbPool};
use crate::domain::{
    next_identifier, DuplicateOpponentUnavoidable, Enrollment, TimerType, Tournament,
    TournamentState,
};

/// Descriptive fields of a tournament about to be created
#[derive(Debug, Clone)]
pub struct TournamentDraft {
    pub name: String,
    pub location: String,
    pub timer_type: TimerType,
    pub description: String,
}

/// Runs one tournament at a time through the store.
///
/// Every step resumes the stored snapshot, applies one transition and saves it again.
pub struct SessionService {
    pool: DbPool,
    registry: RegistryService,
}

impl SessionService {
    pub fn new(pool: DbPool, config: &AppConfig) -> Self {
        Self {
            registry: RegistryService::new(pool.clone(), config.tournament.clone()),
            pool,
        }
    }

    pub fn registry(&self) -> &RegistryService {
        &self.registry
    }

    /// Create a tournament and fill its roster. `None` when the roster entry was cancelled.
    pub fn create(&self, draft: TournamentDraft, actor_ids: &[String]) -> Result<Option<Tournament>> {
        let tournament_id = {
            let conn = database::get_connection(&self.pool)?;
            if let Some(Resumed { tournament, .. }) = snapshot::resume(&conn)? {
                bail!(
                    "Tournament {} is still {}; finish it before creating another",
                    tournament.tournament_id,
                    tournament.state()
                );
            }
            let archived = snapshot::archived(&conn)?;
            next_identifier(archived.iter().map(|t| t.tournament_id.as_str()))?
        };

        let mut directory = self.registry.load()?;
        let players = match directory.enroll(&tournament_id, actor_ids)? {
            Enrollment::Enrolled(players) => players,
            Enrollment::Cancelled => {
                info!("Tournament creation cancelled");
                return Ok(None);
            }
        };

        let mut tournament = Tournament::new(
            &tournament_id,
            &draft.name,
            &draft.location,
            draft.timer_type,
            &draft.description,
            Local::now().date_naive(),
        );
        tournament.define_players(players)?;

        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction()?;
        snapshot::write_snapshot(&tx, &tournament)?;
        registry::write_actors(&tx, &directory)?;
        tx.commit()?;

        info!("Created tournament {} ({})", tournament.tournament_id, tournament.name);
        Ok(Some(tournament))
    }

    /// Pair the next round of the stored tournament
    pub fn pair_next(&self) -> Result<(Tournament, Vec<DuplicateOpponentUnavoidable>)> {
        let mut conn = database::get_connection(&self.pool)?;
        let mut tournament = self.current(&conn)?;

        let Some(round_nb) = tournament.next_round() else {
            bail!(
                "Tournament {} has no round to pair ({})",
                tournament.tournament_id,
                tournament.state()
            );
        };
        let rematches = tournament.init_round(round_nb)?;

        snapshot::interrupt(&mut conn, &tournament)?;
        Ok((tournament, rematches))
    }

    /// Record the winners of the round in progress; archives the tournament after its last round
    pub fn record(&self, winners: &[u8]) -> Result<Tournament> {
        let mut conn = database::get_connection(&self.pool)?;
        let mut tournament = self.current(&conn)?;

        let TournamentState::RoundInProgress(round_nb) = tournament.state() else {
            bail!(
                "Tournament {} has no round awaiting results ({})",
                tournament.tournament_id,
                tournament.state()
            );
        };

        match tournament.register_round_results(round_nb, winners)? {
            TournamentState::Finished => snapshot::archive(&mut conn, &tournament)?,
            _ => snapshot::interrupt(&mut conn, &tournament)?,
        }
        Ok(tournament)
    }

    /// The stored tournament in progress
    pub fn current_tournament(&self) -> Result<Option<Tournament>> {
        let conn = database::get_connection(&self.pool)?;
        Ok(snapshot::resume(&conn)?.map(|resumed| resumed.tournament))
    }

    pub fn archived(&self) -> Result<Vec<Tournament>> {
        let conn = database::get_connection(&self.pool)?;
        snapshot::archived(&conn)
    }

    /// Look a tournament up by id, in progress or archived
    pub fn find(&self, tournament_id: &str) -> Result<Option<Tournament>> {
        let conn = database::get_connection(&self.pool)?;
        if let Some(Resumed { tournament, .. }) = snapshot::resume(&conn)? {
            if tournament.tournament_id == tournament_id {
                return Ok(Some(tournament));
            }
        }
        Ok(snapshot::archived(&conn)?
            .into_iter()
            .find(|t| t.tournament_id == tournament_id))
    }

    fn current(&self, conn: &rusqlite::Connection) -> Result<Tournament> {
        match snapshot::resume(conn)? {
            Some(resumed) => Ok(resumed.tournament),
            None => bail!("No tournament in progress"),
        }
    }
}
