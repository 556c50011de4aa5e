use super::*;
use object_store::memory::InMemory;
use object_store::PutPayload;

async fn put(store: &InMemory, key: &str) {
    store
        .put(&ObjectPath::from(key), PutPayload::from_static(b"x"))
        .await
        .unwrap();
}

async fn keys(store: &InMemory) -> Vec<String> {
    let mut keys: Vec<String> = store
        .list(None)
        .map_ok(|meta| meta.location.to_string())
        .try_collect()
        .await
        .unwrap();
    keys.sort();
    keys
}

#[test]
fn test_parse_s3_uri() {
    assert_eq!(
        parse_s3_uri("s3://lake/warehouse/songs"),
        Some(("lake", "warehouse/songs"))
    );
    assert_eq!(parse_s3_uri("s3://lake/songs/"), Some(("lake", "songs")));
    assert_eq!(parse_s3_uri("s3://lake"), None);
    assert_eq!(parse_s3_uri("s3://lake/"), None);
    assert_eq!(parse_s3_uri("gs://lake/songs"), None);
    assert_eq!(parse_s3_uri("/tmp/songs"), None);
}

#[test]
fn test_s3_store_builds_with_custom_endpoint() {
    let creds = AwsCredentials {
        access_key_id: "minio".to_string(),
        secret_access_key: "minio123".to_string(),
        region: Some("us-east-1".to_string()),
        endpoint: Some("http://localhost:9000".to_string()),
    };
    assert!(s3_store("lake", Some(&creds)).is_ok());
}

#[tokio::test]
async fn test_clear_prefix_removes_stale_partitions() {
    let store = InMemory::new();
    put(&store, "out/songplays/year=2018/month=10/data_0.parquet").await;
    put(&store, "out/songplays/year=2018/month=11/data_0.parquet").await;
    put(&store, "out/songplays_archive/data_0.parquet").await;
    put(&store, "out/songs/part-0.parquet").await;

    let removed = clear_prefix(&store, &ObjectPath::from("out/songplays"))
        .await
        .unwrap();

    assert_eq!(removed, 2);
    assert_eq!(
        keys(&store).await,
        vec![
            "out/songplays_archive/data_0.parquet".to_string(),
            "out/songs/part-0.parquet".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_clear_prefix_empty() {
    let store = InMemory::new();
    let removed = clear_prefix(&store, &ObjectPath::from("out/time"))
        .await
        .unwrap();
    assert_eq!(removed, 0);
}
