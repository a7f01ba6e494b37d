//! Interruption and resume of the tournament in progress.

use anyhow::Result;
use log::info;
use rusqlite::Connection;

use crate::codec;
use crate::database::progress::{clear_progress, get_progress, set_progress};
use crate::database::{records, ARCHIVE_TABLE, TOURNAMENT_TABLE};
use crate::domain::Tournament;
use crate::errors::{with_record_context, TournamentError};

/// A tournament read back from its snapshot
#[derive(Debug)]
pub struct Resumed {
    pub tournament: Tournament,
    /// Number of rounds already paired
    pub progress: u32,
}

/// Replace the stored snapshot with `tournament`
pub fn interrupt(conn: &mut Connection, tournament: &Tournament) -> Result<()> {
    let tx = conn.transaction()?;
    let progress = write_snapshot(&tx, tournament)?;
    tx.commit()?;

    info!(
        "Tournament {} saved at step {} ({})",
        tournament.tournament_id,
        progress,
        tournament.state()
    );
    Ok(())
}

/// Write the snapshot and its marker inside the caller's transaction; returns the marker
pub(crate) fn write_snapshot(conn: &Connection, tournament: &Tournament) -> Result<u32> {
    let record = codec::serialize(tournament)?;
    let progress = tournament.rounds.len() as u32;

    records::truncate(conn, TOURNAMENT_TABLE)?;
    records::insert(conn, TOURNAMENT_TABLE, &record)?;
    set_progress(conn, TOURNAMENT_TABLE, progress)?;
    Ok(progress)
}

/// Read the stored snapshot back, if there is one.
///
/// A snapshot that does not decode, or disagrees with its progress marker, is an error.
pub fn resume(conn: &Connection) -> Result<Option<Resumed>> {
    let stored = records::all(conn, TOURNAMENT_TABLE)?;
    let marker = get_progress(conn, TOURNAMENT_TABLE)?;

    let record = match stored.as_slice() {
        [] if marker.is_none() => return Ok(None),
        [record] => record,
        _ => {
            return Err(TournamentError::corrupt(
                "tournament",
                format!("{} snapshots stored", stored.len()),
            )
            .into());
        }
    };

    let tournament = with_record_context(codec::deserialize::<Tournament>(record), "tournament")?;
    let progress = marker.ok_or_else(|| TournamentError::corrupt("tournament", "missing progress marker"))?;
    if progress as usize != tournament.rounds.len() {
        return Err(TournamentError::corrupt(
            "tournament",
            format!(
                "progress marker {} but {} rounds stored",
                progress,
                tournament.rounds.len()
            ),
        )
        .into());
    }

    info!(
        "Resumed tournament {} at step {} ({})",
        tournament.tournament_id,
        progress,
        tournament.state()
    );
    Ok(Some(Resumed { tournament, progress }))
}

/// Move a finished tournament out of the in-progress slot
pub fn archive(conn: &mut Connection, tournament: &Tournament) -> Result<()> {
    let record = codec::serialize(tournament)?;

    let tx = conn.transaction()?;
    records::insert(&tx, ARCHIVE_TABLE, &record)?;
    records::truncate(&tx, TOURNAMENT_TABLE)?;
    clear_progress(&tx, TOURNAMENT_TABLE)?;
    tx.commit()?;

    info!("Tournament {} archived", tournament.tournament_id);
    Ok(())
}

pub fn archived(conn: &Connection) -> Result<Vec<Tournament>> {
    records::all(conn, ARCHIVE_TABLE)?
        .iter()
        .map(|record| with_record_context(codec::deserialize::<Tournament>(record), "tournament"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_memory_pool, get_connection};
    use crate::domain::testing::{roster, tournament};
    use crate::domain::TournamentState;

    fn mid_round_two() -> Tournament {
        let mut t = tournament();
        t.define_players(roster()).unwrap();
        t.init_round(0).unwrap();
        t.register_round_results(0, &[0, 1, 2, 0]).unwrap();
        t.init_round(1).unwrap();
        t.register_round_results(1, &[1, 2, 2, 1]).unwrap();
        t.init_round(2).unwrap();
        t
    }

    #[test]
    fn test_resume_without_snapshot() {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();
        assert!(resume(&conn).unwrap().is_none());
    }

    #[test]
    fn test_interrupt_and_resume_mid_round() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let original = mid_round_two();

        interrupt(&mut conn, &original).unwrap();
        let Resumed { mut tournament, progress } = resume(&conn).unwrap().unwrap();

        assert_eq!(progress, 3);
        assert_eq!(tournament, original);
        assert_eq!(tournament.state(), TournamentState::RoundInProgress(2));
        let err = tournament.init_round(2).unwrap_err();
        assert!(matches!(err, TournamentError::StateSequence { .. }));
    }

    #[test]
    fn test_interrupt_keeps_a_single_snapshot() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let mut t = tournament();
        t.define_players(roster()).unwrap();

        interrupt(&mut conn, &t).unwrap();
        t.init_round(0).unwrap();
        interrupt(&mut conn, &t).unwrap();

        assert_eq!(records::all(&conn, TOURNAMENT_TABLE).unwrap().len(), 1);
        assert_eq!(resume(&conn).unwrap().unwrap().progress, 1);
    }

    #[test]
    fn test_resume_rejects_marker_mismatch() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        interrupt(&mut conn, &mid_round_two()).unwrap();
        set_progress(&conn, TOURNAMENT_TABLE, 1).unwrap();

        let err = resume(&conn).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<TournamentError>(),
            Some(TournamentError::CorruptRecord { .. })
        ));
    }

    #[test]
    fn test_resume_rejects_corrupt_record() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let original = mid_round_two();
        let mut record = codec::serialize(&original).unwrap();
        record.remove("list_of_players");
        records::insert(&conn, TOURNAMENT_TABLE, &record).unwrap();
        set_progress(&conn, TOURNAMENT_TABLE, 3).unwrap();

        assert!(resume(&conn).is_err());

        interrupt(&mut conn, &original).unwrap();
        assert!(resume(&conn).is_ok());
    }

    #[test]
    fn test_archive_clears_snapshot() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let t = mid_round_two();
        interrupt(&mut conn, &t).unwrap();

        archive(&mut conn, &t).unwrap();

        assert!(resume(&conn).unwrap().is_none());
        assert_eq!(archived(&conn).unwrap(), vec![t]);
    }
}
