//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskboard_core` linkage.
//! - Optionally print lane counts of one stored board:
//!   `taskboard_cli <db_path> <account_key>`.
//! - Keep output deterministic for quick local sanity checks.

use std::process::ExitCode;
use taskboard_core::db::open_db;
use taskboard_core::{BoardStore, Lane, SqliteSnapshotRepository};

fn main() -> ExitCode {
    println!("taskboard_core ping={}", taskboard_core::ping());
    println!("taskboard_core version={}", taskboard_core::core_version());

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    match args.as_slice() {
        [] => ExitCode::SUCCESS,
        [db_path, account_key] => match print_board_counts(db_path, account_key) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        },
        _ => {
            eprintln!("usage: taskboard_cli [<db_path> <account_key>]");
            ExitCode::from(2)
        }
    }
}

fn print_board_counts(db_path: &str, account_key: &str) -> Result<(), String> {
    let conn = open_db(db_path).map_err(|err| format!("board DB open failed: {err}"))?;
    let repo = SqliteSnapshotRepository::try_new(&conn)
        .map_err(|err| format!("board repo init failed: {err}"))?;
    let store = BoardStore::open(account_key, repo);
    let stats = store.stats();

    println!("board account={} total={}", store.account_key(), stats.total);
    for lane in Lane::ALL {
        println!("lane {lane}={}", stats.count(lane));
    }
    Ok(())
}
