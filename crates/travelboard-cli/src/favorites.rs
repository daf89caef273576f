use std::io::Write;
use std::sync::Arc;

use tabwriter::TabWriter;
use travelboard_core::config::Config;
use travelboard_core::models::Photo;
use travelboard_session::event::{EventLog, SessionEventKind};
use travelboard_session::favorites::FavoritesStore;

use crate::{CommandOutput, FavoritesCommand, TravelboardBackend};

pub fn run_favorites(
    action: FavoritesCommand,
    config: &Config,
    backend: &dyn TravelboardBackend,
) -> CommandOutput {
    let events = Arc::new(EventLog::new());
    let mut store = FavoritesStore::load_with_events(
        backend.open_storage(config),
        config.favorites_key(),
        events.clone(),
    );
    // A malformed payload on load already degraded to an empty set.
    events.drain();

    let result = execute_favorites(action, &mut store);
    let persist_errors: Vec<String> = events
        .drain()
        .into_iter()
        .filter(|e| e.kind == SessionEventKind::PersistFailed)
        .map(|e| e.detail)
        .collect();

    match result {
        Ok(stdout) if persist_errors.is_empty() => CommandOutput::ok(stdout),
        Ok(stdout) => CommandOutput {
            stdout,
            stderr: format!("Error: favorites not saved: {}\n", persist_errors.join("; ")),
            exit_code: 1,
        },
        Err((code, msg)) => CommandOutput::fail(code, format!("Error: {msg}\n")),
    }
}

pub fn execute_favorites(
    action: FavoritesCommand,
    store: &mut FavoritesStore,
) -> Result<String, (i32, String)> {
    match action {
        FavoritesCommand::List { json } => {
            if json {
                render_json(&store.list())
            } else {
                render_table(&store.list())
            }
        }
        FavoritesCommand::Count => Ok(format!("{}\n", store.count())),
        FavoritesCommand::Add { photo } => {
            let photo = parse_photo(&photo)?;
            let id = photo.id.clone();
            store.add(photo);
            Ok(format!("saved {id}\n"))
        }
        FavoritesCommand::Remove { id } => {
            if store.remove(&id) {
                Ok(format!("removed {id}\n"))
            } else {
                Ok(format!("not a favorite: {id}\n"))
            }
        }
        FavoritesCommand::Toggle { photo } => {
            let photo = parse_photo(&photo)?;
            if store.toggle(&photo) {
                Ok(format!("saved {}\n", photo.id))
            } else {
                Ok(format!("removed {}\n", photo.id))
            }
        }
    }
}

fn parse_photo(raw: &str) -> Result<Photo, (i32, String)> {
    let photo: Photo =
        serde_json::from_str(raw).map_err(|e| (2, format!("invalid photo JSON: {e}")))?;
    if photo.id.trim().is_empty() {
        return Err((2, "photo id is required".to_string()));
    }
    Ok(photo)
}

fn render_json(photos: &[&Photo]) -> Result<String, (i32, String)> {
    let mut out =
        serde_json::to_string_pretty(photos).map_err(|e| (1, format!("encode favorites: {e}")))?;
    out.push('\n');
    Ok(out)
}

fn render_table(photos: &[&Photo]) -> Result<String, (i32, String)> {
    if photos.is_empty() {
        return Ok("No favorites\n".to_string());
    }
    let mut tw = TabWriter::new(Vec::new()).padding(2);
    let write_err = |e: std::io::Error| (1, format!("output: {e}"));
    writeln!(tw, "ID\tLOCATION\tAUTHOR\tALT").map_err(write_err)?;
    for photo in photos {
        writeln!(
            tw,
            "{}\t{}\t{}\t{}",
            photo.id,
            photo.place_name().unwrap_or("-"),
            photo.author.as_deref().unwrap_or("-"),
            photo.alt
        )
        .map_err(write_err)?;
    }
    let bytes = tw
        .into_inner()
        .map_err(|e| (1, format!("output: {}", e.error())))?;
    String::from_utf8(bytes).map_err(|e| (1, format!("output: {e}")))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::run_cli_for_test;
    use crate::tests_common::MockBackend;
    use travelboard_session::storage::KeyValueStore;

    const PHOTO: &str = r#"{"id":"a1","src":"https://img/a1.jpg","alt":"Fushimi Inari","author":"Aiko","location":"Kyoto"}"#;

    #[test]
    fn parse_photo_requires_id() {
        let err = parse_photo(r#"{"id":" ","src":"s","alt":"a"}"#).unwrap_err();
        assert_eq!(err.0, 2);
        assert!(err.1.contains("id is required"));
    }

    #[test]
    fn parse_photo_rejects_garbage() {
        let err = parse_photo("not json").unwrap_err();
        assert_eq!(err.0, 2);
        assert!(err.1.starts_with("invalid photo JSON"));
    }

    #[test]
    fn empty_list_message() {
        let backend = MockBackend::new();
        let out = run_cli_for_test(&["favorites", "list"], &backend);
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout, "No favorites\n");
    }

    #[test]
    fn table_lists_columns() {
        let backend = MockBackend::new();
        run_cli_for_test(&["favorites", "add", PHOTO], &backend);
        let out = run_cli_for_test(&["favorites", "list"], &backend);
        assert_eq!(out.exit_code, 0);
        let lines: Vec<&str> = out.stdout.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("a1"));
        assert!(lines[1].contains("Kyoto"));
        assert!(lines[1].contains("Aiko"));
    }

    #[test]
    fn persist_failure_is_reported() {
        let backend = MockBackend::new();
        backend.storage.set_fail_writes(true);
        let out = run_cli_for_test(&["favorites", "add", PHOTO], &backend);
        assert_eq!(out.exit_code, 1);
        assert_eq!(out.stdout, "saved a1\n");
        assert!(out.stderr.contains("favorites not saved"), "stderr: {}", out.stderr);
    }

    #[test]
    fn removing_unknown_id_is_not_an_error() {
        let backend = MockBackend::new();
        let out = run_cli_for_test(&["favorites", "remove", "ghost"], &backend);
        assert_eq!(out, CommandOutput::ok("not a favorite: ghost\n"));
        assert_eq!(backend.storage.write_count(), 0);
    }

    #[test]
    fn malformed_payload_does_not_fail_commands() {
        let backend = MockBackend::new();
        backend
            .storage
            .set("travelboard:favorites:v1", "[]")
            .unwrap();
        let out = run_cli_for_test(&["favorites", "count"], &backend);
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout, "0\n");
    }
}
