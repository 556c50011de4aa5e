//! Object-store housekeeping for remote table destinations
//!
//! DuckDB cannot delete objects, so stale output under an `s3://` table
//! prefix is removed here before the table is rewritten.

use futures::TryStreamExt;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use sparkify_core::AwsCredentials;

/// Split `s3://bucket/some/prefix` into bucket and key prefix.
///
/// Returns `None` for other schemes and for URIs without a key prefix, so a
/// whole bucket is never addressed.
pub(crate) fn parse_s3_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("s3://")?;
    let (bucket, key) = rest.split_once('/')?;
    let key = key.trim_matches('/');
    if bucket.is_empty() || key.is_empty() {
        return None;
    }
    Some((bucket, key))
}

/// S3 client for one bucket. Explicit credentials override the AWS_* env.
pub(crate) fn s3_store(
    bucket: &str,
    credentials: Option<&AwsCredentials>,
) -> object_store::Result<AmazonS3> {
    let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
    if let Some(creds) = credentials {
        builder = builder
            .with_access_key_id(&creds.access_key_id)
            .with_secret_access_key(&creds.secret_access_key);
        if let Some(region) = &creds.region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = &creds.endpoint {
            let url = if endpoint.contains("://") {
                endpoint.clone()
            } else {
                format!("https://{}", endpoint)
            };
            builder = builder
                .with_allow_http(url.starts_with("http://"))
                .with_endpoint(url);
        }
    }
    builder.build()
}

/// Delete every object under `prefix`, returning how many were removed.
pub(crate) async fn clear_prefix(
    store: &dyn ObjectStore,
    prefix: &ObjectPath,
) -> object_store::Result<usize> {
    let stale: Vec<ObjectPath> = store
        .list(Some(prefix))
        .map_ok(|meta| meta.location)
        .try_collect()
        .await?;
    for location in &stale {
        store.delete(location).await?;
    }
    Ok(stale.len())
}

#[cfg(test)]
#[path = "remote_test.rs"]
mod tests;
