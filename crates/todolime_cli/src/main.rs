//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `todolime_core` linkage and database bootstrap.
//! - Print deterministic `key=value` lines for quick local checks.

use std::path::PathBuf;
use std::process::ExitCode;
use todolime_core::db::open_db;
use todolime_core::{FilterMode, KvSnapshotRepository, SqliteKeyValueStore, TaskStore};

const DB_PATH_ENV: &str = "TODOLIME_DB_PATH";

fn main() -> ExitCode {
    println!("todolime_core ping={}", todolime_core::ping());
    println!("todolime_core version={}", todolime_core::core_version());

    let Some(db_path) = std::env::var(DB_PATH_ENV)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
    else {
        println!("tasks=skipped reason={DB_PATH_ENV}_unset");
        return ExitCode::SUCCESS;
    };

    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("db_open=error path={} error={err}", db_path.display());
            return ExitCode::FAILURE;
        }
    };
    let store = TaskStore::hydrate(KvSnapshotRepository::new(SqliteKeyValueStore::new(&conn)));
    let counts = store.counts();
    for mode in FilterMode::ALL_MODES {
        println!("tasks.{}={}", mode, counts.get(mode));
    }
    ExitCode::SUCCESS
}
