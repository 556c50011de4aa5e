use super::*;
use std::fs;
use tempfile::tempdir;

const CONFIG: &str = r#"
name: test_project
input_root: "data"
output_root: "warehouse"
"#;

fn global(project_dir: &std::path::Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: project_dir.display().to_string(),
        config: None,
        target: None,
    }
}

#[tokio::test]
async fn test_clean_removes_table_directories() {
    let temp_dir = tempdir().unwrap();
    let project_path = temp_dir.path();
    fs::write(project_path.join("sparkify.yml"), CONFIG).unwrap();

    let songs_dir = project_path.join("warehouse/songs/year=2000");
    fs::create_dir_all(&songs_dir).unwrap();
    fs::write(songs_dir.join("data_0.parquet"), "x").unwrap();

    let args = CleanArgs { dry_run: false };
    execute(&args, &global(project_path)).await.unwrap();

    assert!(!project_path.join("warehouse/songs").exists());
    assert!(project_path.join("warehouse").exists());
}

#[tokio::test]
async fn test_clean_dry_run_does_not_remove() {
    let temp_dir = tempdir().unwrap();
    let project_path = temp_dir.path();
    fs::write(project_path.join("sparkify.yml"), CONFIG).unwrap();

    let users_dir = project_path.join("warehouse/users");
    fs::create_dir_all(&users_dir).unwrap();

    let args = CleanArgs { dry_run: true };
    execute(&args, &global(project_path)).await.unwrap();

    assert!(users_dir.exists());
}

#[tokio::test]
async fn test_clean_handles_missing_directory() {
    let temp_dir = tempdir().unwrap();
    let project_path = temp_dir.path();
    fs::write(project_path.join("sparkify.yml"), CONFIG).unwrap();

    let args = CleanArgs { dry_run: false };
    execute(&args, &global(project_path)).await.unwrap();
}

#[tokio::test]
async fn test_clean_rejects_remote_output() {
    let temp_dir = tempdir().unwrap();
    let project_path = temp_dir.path();
    fs::write(
        project_path.join("sparkify.yml"),
        "name: test_project\ninput_root: data\noutput_root: \"s3://bucket/out\"\n",
    )
    .unwrap();

    let args = CleanArgs { dry_run: false };
    let err = execute(&args, &global(project_path)).await.unwrap_err();
    assert!(format!("{:#}", err).contains("[P005]"));
}
