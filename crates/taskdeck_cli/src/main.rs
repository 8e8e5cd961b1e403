//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire config, logging, session storage, task store and board together.
//! - Print a deterministic summary for quick local sanity checks.
//!
//! Usage: `taskdeck_cli [config.json]`

use std::process::ExitCode;
use std::sync::Arc;

use taskdeck_core::db::{open_db, open_db_in_memory};
use taskdeck_core::{
    due_reminders, init_logging, AuthService, BoardView, Clock, CoreConfig, SqliteKeyValueStore,
    SystemClock, TaskBoard, TaskDraft, TaskStore, DEMO_EMAIL, DEMO_PASSWORD,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("taskdeck: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), String> {
    let config = match std::env::args().nth(1) {
        Some(path) => CoreConfig::load(path).map_err(|err| err.to_string())?,
        None => CoreConfig::default(),
    };

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = match &config.session_db_path {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    }
    .map_err(|err| err.to_string())?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut auth = AuthService::with_clock(SqliteKeyValueStore::new(&conn), clock.clone());
    let session = match auth.restore().map_err(|err| err.to_string())? {
        Some(session) => session,
        None => auth
            .login(DEMO_EMAIL, DEMO_PASSWORD)
            .map_err(|err| err.to_string())?,
    };
    println!("taskdeck_core version={}", taskdeck_core::core_version());
    println!("session user_id={} name={}", session.id, session.name);

    let store = if config.seed_demo_tasks {
        TaskStore::with_demo_tasks(clock.clone(), config.store_latency())
    } else {
        TaskStore::with_clock(clock.clone(), config.store_latency())
    };
    let mut board = TaskBoard::new(store, clock.clone());
    board.refresh().await.map_err(|err| err.to_string())?;

    let created = board
        .create(&TaskDraft::titled("Try TaskDeck from the command line"))
        .await
        .map_err(|err| err.to_string())?;
    board
        .toggle(created.id)
        .await
        .map_err(|err| err.to_string())?;

    match board.view() {
        BoardView::Ready(outcome) => {
            let stats = outcome.stats;
            println!(
                "tasks total={} completed={} pending={} overdue={}",
                stats.total, stats.completed, stats.pending, stats.overdue
            );
            for task in &outcome.visible {
                let mark = if task.completed { 'x' } else { ' ' };
                println!("[{mark}] #{} {} ({})", task.id, task.title, task.priority.as_form_value());
            }
        }
        BoardView::Loading => println!("tasks loading"),
        BoardView::Failed(message) => println!("tasks failed: {message}"),
    }

    let reminders = due_reminders(board.tasks(), clock.now(), &session.email);
    println!("reminders due={}", reminders.len());
    Ok(())
}
