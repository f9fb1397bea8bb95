use {
	crate::model::{PriceMetadata, StoredPrice},
	async_trait::async_trait,
	common::key::TOKEN_PRICE_CACHE_KEY,
	dashmap::DashMap,
	deadpool_redis::Pool,
	redis::AsyncCommands,
	tracing::warn,
};

/// Durable key-value store holding one price per token identifier.
///
/// Adapters never judge freshness: an expired entry is returned like any other and the
/// gateway decides. Writes to an existing key overwrite it.
#[async_trait]
pub trait PriceStore: Send + Sync {
	/// Stored value and its metadata, `None` when the key was never written
	async fn get_with_metadata(&self, key: &str) -> anyhow::Result<Option<StoredPrice>>;

	async fn set_with_metadata(&self, key: &str, value: f64, metadata: PriceMetadata) -> anyhow::Result<()>;
}

/// Parses one stored JSON entry. Unreadable data counts as absent and is overwritten
/// by the next refresh.
pub fn decode_stored(key: &str, json_str: &str) -> Option<StoredPrice> {
	match serde_json::from_str::<StoredPrice>(json_str) {
		Ok(stored) => Some(stored),
		Err(e) => {
			warn!("Unreadable cached price for {}: {} (raw={})", key, e, json_str);
			None
		}
	}
}

/// Redis adapter: every entry is a field of the `token_price` hash, value is JSON
pub struct RedisPriceStore {
	pool: Pool,
}

impl RedisPriceStore {
	pub fn new(pool: Pool) -> Self {
		Self { pool }
	}
}

#[async_trait]
impl PriceStore for RedisPriceStore {
	async fn get_with_metadata(&self, key: &str) -> anyhow::Result<Option<StoredPrice>> {
		let mut conn = self.pool.get().await.map_err(|e| anyhow::anyhow!("Failed to get cache redis connection: {}", e))?;
		let raw: Option<String> = conn.hget(TOKEN_PRICE_CACHE_KEY, key).await.map_err(|e| anyhow::anyhow!("HGET {} {} failed: {}", TOKEN_PRICE_CACHE_KEY, key, e))?;

		Ok(raw.and_then(|json_str| decode_stored(key, &json_str)))
	}

	async fn set_with_metadata(&self, key: &str, value: f64, metadata: PriceMetadata) -> anyhow::Result<()> {
		let json_str = serde_json::to_string(&StoredPrice { value, metadata })?;
		let mut conn = self.pool.get().await.map_err(|e| anyhow::anyhow!("Failed to get cache redis connection: {}", e))?;
		let _: () = conn.hset(TOKEN_PRICE_CACHE_KEY, key, json_str).await.map_err(|e| anyhow::anyhow!("HSET {} {} failed: {}", TOKEN_PRICE_CACHE_KEY, key, e))?;
		Ok(())
	}
}

/// In-process adapter, nothing survives a restart
#[derive(Default)]
pub struct MemoryPriceStore {
	entries: DashMap<String, StoredPrice>,
}

impl MemoryPriceStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[async_trait]
impl PriceStore for MemoryPriceStore {
	async fn get_with_metadata(&self, key: &str) -> anyhow::Result<Option<StoredPrice>> {
		Ok(self.entries.get(key).map(|entry| *entry.value()))
	}

	async fn set_with_metadata(&self, key: &str, value: f64, metadata: PriceMetadata) -> anyhow::Result<()> {
		self.entries.insert(key.to_string(), StoredPrice { value, metadata });
		Ok(())
	}
}
