use serde::{Deserialize, Serialize};

/// Metadata attached to every stored price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceMetadata {
	/// 过期时间戳（毫秒）
	#[serde(rename = "expiresAt")]
	pub expires_at: i64,
}

/// Value + metadata as held by a store adapter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoredPrice {
	pub value: f64,
	pub metadata: PriceMetadata,
}

/// One cached USD price for a token identifier
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPrice {
	pub token_address: String,
	pub price: f64,
	pub expires_at: i64,
}

impl CachedPrice {
	pub fn from_stored(token_address: &str, stored: StoredPrice) -> Self {
		Self { token_address: token_address.to_string(), price: stored.value, expires_at: stored.metadata.expires_at }
	}

	/// Entries expiring exactly at `now_ms` are already stale
	pub fn is_fresh(&self, now_ms: i64) -> bool {
		self.expires_at > now_ms
	}
}
