//! End-to-end pipeline runs against an in-memory DuckDB engine

use sparkify_core::{EngineConfig, OutputTable, ResolvedConfig, TimeBasis};
use sparkify_db::DuckDbEngine;
use sparkify_etl::{run, Pipeline, RunSummary};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SAMPLE_TS: i64 = 1542837407796;

fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn song_json(song_id: &str, artist_id: &str, artist_name: &str, year: i32) -> String {
    format!(
        r#"{{"num_songs": 1, "artist_id": "{artist_id}", "artist_latitude": null, "artist_longitude": null, "artist_location": "Berlin", "artist_name": "{artist_name}", "song_id": "{song_id}", "title": "Song {song_id}", "duration": 200.0, "year": {year}}}"#
    )
}

fn event_json(page: &str, artist: &str, user_id: &str, level: &str, ts: i64) -> String {
    format!(
        r#"{{"artist": "{artist}", "auth": "Logged In", "firstName": "User", "gender": "F", "itemInSession": 0, "lastName": "{user_id}", "length": 200.0, "level": "{level}", "location": "Somewhere", "method": "PUT", "page": "{page}", "registration": 1540919166796.0, "sessionId": 99, "song": "Song", "status": 200, "ts": {ts}, "userAgent": "UA", "userId": "{user_id}"}}"#
    )
}

struct Fixture {
    _dir: TempDir,
    input: String,
    output: String,
}

impl Fixture {
    fn new(events: &[String]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input");
        write_file(&input, "song_data/A/A/A/TRAAAAA.json", &song_json("S1", "A1", "Foo", 2000));
        write_file(&input, "song_data/A/A/B/TRAAAAB.json", &song_json("S2", "A2", "Bar", 1999));
        write_file(&input, "song_data/A/B/A/TRAABAA.json", &song_json("S1", "A1", "Foo", 2000));
        write_file(&input, "log_data/2018/11/2018-11-21-events.json", &events.join("\n"));

        Self {
            input: input.display().to_string(),
            output: dir.path().join("output").display().to_string(),
            _dir: dir,
        }
    }

    fn config(&self) -> ResolvedConfig {
        ResolvedConfig {
            name: "sparkify".to_string(),
            target: None,
            input_root: self.input.clone(),
            output_root: self.output.clone(),
            song_glob: "song_data/*/*/*/*.json".to_string(),
            log_glob: "log_data/*/*/*.json".to_string(),
            time_basis: TimeBasis::Utc,
            engine: EngineConfig::default(),
            credentials: None,
        }
    }

    fn table_glob(&self, table: OutputTable) -> String {
        format!(
            "read_parquet('{}/{}/**/*.parquet', hive_partitioning = true)",
            self.output, table
        )
    }

    fn table_path(&self, rel: &str) -> std::path::PathBuf {
        Path::new(&self.output).join(rel)
    }
}

fn default_events() -> Vec<String> {
    vec![
        event_json("NextSong", "Foo", "7", "free", SAMPLE_TS),
        event_json("Home", "Foo", "7", "free", SAMPLE_TS + 1_000),
        event_json("NextSong", "Nobody", "8", "paid", SAMPLE_TS + 60_000),
        event_json("NextSong", "Bar", "8", "paid", SAMPLE_TS + 120_000),
    ]
}

fn rows_written(summary: &RunSummary, table: OutputTable) -> usize {
    summary
        .pipelines
        .iter()
        .flat_map(|p| &p.tables)
        .find(|t| t.table == table)
        .map(|t| t.rows)
        .unwrap()
}

/// Read written output back on a connection of its own.
fn query_text(sql: &str) -> Option<String> {
    let conn = duckdb::Connection::open_in_memory().unwrap();
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

fn count_rows(source: &str) -> i64 {
    let conn = duckdb::Connection::open_in_memory().unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", source), [], |row| row.get(0))
        .unwrap()
}

fn snapshot(fixture: &Fixture) -> Vec<Option<String>> {
    let queries = [
        format!(
            "SELECT string_agg(concat_ws('/', song_id, title, year), ',' ORDER BY song_id) FROM {}",
            fixture.table_glob(OutputTable::Songs)
        ),
        format!(
            "SELECT string_agg(concat_ws('/', artist_id, name), ',' ORDER BY artist_id) FROM {}",
            fixture.table_glob(OutputTable::Artists)
        ),
        format!(
            "SELECT string_agg(concat_ws('/', user_id, level), ',' ORDER BY user_id, level) FROM {}",
            fixture.table_glob(OutputTable::Users)
        ),
        format!(
            "SELECT string_agg(concat_ws('/', \"timestamp\", hour, weekday), ',' ORDER BY \"timestamp\") FROM {}",
            fixture.table_glob(OutputTable::Time)
        ),
    ];
    queries.iter().map(|sql| query_text(sql)).collect()
}

#[tokio::test]
async fn test_full_run_writes_star_schema() {
    let fixture = Fixture::new(&default_events());
    let engine = DuckDbEngine::in_memory().unwrap();

    let summary = run(&engine, &fixture.config(), &Pipeline::ALL).await;

    assert!(summary.is_success(), "{:?}", summary);
    assert_eq!(rows_written(&summary, OutputTable::Songs), 2);
    assert_eq!(rows_written(&summary, OutputTable::Artists), 2);
    assert_eq!(rows_written(&summary, OutputTable::Users), 2);
    assert_eq!(rows_written(&summary, OutputTable::Time), 3);
    // S1 appears in two song files, so the Foo play fans out twice
    assert_eq!(rows_written(&summary, OutputTable::Songplays), 3);

    assert!(fixture.table_path("songs/year=2000/artist_id=A1").is_dir());
    assert!(fixture.table_path("songs/year=1999/artist_id=A2").is_dir());
    assert!(fixture.table_path("artists/part-0.parquet").is_file());
    assert!(fixture.table_path("users/part-0.parquet").is_file());
    assert!(fixture.table_path("time/year=2018/month=11").is_dir());
    assert!(fixture.table_path("songplays/year=2018/month=11").is_dir());

    assert_eq!(count_rows(&fixture.table_glob(OutputTable::Songplays)), 3);
}

#[tokio::test]
async fn test_songplay_columns() {
    let fixture = Fixture::new(&[event_json("NextSong", "Bar", "7", "free", SAMPLE_TS)]);
    let engine = DuckDbEngine::in_memory().unwrap();

    let summary = run(&engine, &fixture.config(), &[Pipeline::Logs]).await;
    assert!(summary.is_success(), "{:?}", summary);

    let row = query_text(&format!(
        "SELECT concat_ws('|', song_id, artist_id, user_id, session_id, level, location, user_agent, month, year, CAST(start_time AS VARCHAR)) FROM {}",
        fixture.table_glob(OutputTable::Songplays)
    ));
    assert_eq!(
        row.as_deref(),
        Some("S2|A2|7|99|free|Berlin|UA|11|2018|2018-11-21 21:56:47.796")
    );
}

#[tokio::test]
async fn test_no_song_plays_yield_empty_log_tables() {
    let fixture = Fixture::new(&[
        event_json("PageView", "Foo", "7", "free", SAMPLE_TS),
        event_json("Home", "Foo", "7", "free", SAMPLE_TS),
    ]);
    let engine = DuckDbEngine::in_memory().unwrap();

    let summary = run(&engine, &fixture.config(), &[Pipeline::Logs]).await;

    assert!(summary.is_success(), "{:?}", summary);
    assert_eq!(rows_written(&summary, OutputTable::Users), 0);
    assert_eq!(rows_written(&summary, OutputTable::Time), 0);
    assert_eq!(rows_written(&summary, OutputTable::Songplays), 0);
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let fixture = Fixture::new(&default_events());
    let engine = DuckDbEngine::in_memory().unwrap();

    assert!(run(&engine, &fixture.config(), &Pipeline::ALL).await.is_success());
    let first = snapshot(&fixture);

    assert!(run(&engine, &fixture.config(), &Pipeline::ALL).await.is_success());
    let second = snapshot(&fixture);

    assert_eq!(first, second);
    assert_eq!(first[0].as_deref(), Some("S1/Song S1/2000,S2/Song S2/1999"));
    assert_eq!(first[2].as_deref(), Some("7/free,8/paid"));
}

#[tokio::test]
async fn test_missing_logs_fail_only_log_pipeline() {
    let fixture = Fixture::new(&[]);
    fs::remove_dir_all(Path::new(&fixture.input).join("log_data")).unwrap();
    let engine = DuckDbEngine::in_memory().unwrap();

    let summary = run(&engine, &fixture.config(), &Pipeline::ALL).await;

    assert!(!summary.is_success());
    assert_eq!(summary.success_count, 1);
    assert_eq!(summary.failure_count, 1);
    assert_eq!(summary.pipelines[0].pipeline, Pipeline::Songs);
    assert!(summary.pipelines[1].error.as_deref().unwrap().contains("[P001]"));
    assert!(fixture.table_path("songs").is_dir());
    assert!(!fixture.table_path("users").exists());
}

#[tokio::test]
async fn test_failed_log_pipeline_reports_tables_on_disk() {
    let fixture = Fixture::new(&default_events());
    fs::remove_dir_all(Path::new(&fixture.input).join("song_data")).unwrap();
    let engine = DuckDbEngine::in_memory().unwrap();

    let summary = run(&engine, &fixture.config(), &[Pipeline::Logs]).await;

    assert!(!summary.is_success());
    let result = &summary.pipelines[0];
    assert!(result.error.as_deref().unwrap().starts_with("[P001] logs"));
    let reported: Vec<OutputTable> = result.tables.iter().map(|t| t.table).collect();
    assert_eq!(reported, vec![OutputTable::Users, OutputTable::Time]);

    assert!(fixture.table_path("users/part-0.parquet").is_file());
    assert!(fixture.table_path("time/year=2018/month=11").is_dir());
    assert!(!fixture.table_path("songplays").exists());
    assert_eq!(count_rows(&fixture.table_glob(OutputTable::Users)), 2);
}
