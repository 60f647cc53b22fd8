use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

/// location id => registered display name. TTL keeps renames from
/// sticking forever.
pub static LOCATION_CACHE: Lazy<Cache<String, String>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(50_000)
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

/// Record a location's display name
pub async fn mark_known(id: &str, name: &str) {
    LOCATION_CACHE.insert(id.to_string(), name.to_string()).await;
}

/// Registered name for a location id, if any
pub async fn name_of(id: &str) -> Option<String> {
    LOCATION_CACHE.get(id).await
}

/// Batch insert id/name pairs
async fn batch_mark(locations: &[(String, String)]) {
    let futures: Vec<_> = locations
        .iter()
        .map(|(id, name)| LOCATION_CACHE.insert(id.clone(), name.clone()))
        .collect();

    futures::future::join_all(futures).await;
}

/// Load the location registry into the in-memory cache (batched)
pub async fn warmup_location_cache(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream =
        sqlx::query_as::<_, (String, String)>("SELECT id, name FROM locations").fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        let pair = row?;
        batch.push(pair);
        total_count += 1;

        if batch.len() >= batch_size {
            batch_mark(&batch).await;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        batch_mark(&batch).await;
    }

    log::info!("Location cache warmup complete: {} locations", total_count);

    Ok(())
}
