//! Price cache gateway.
//!
//! Serves USD prices from the store while they are fresh and refreshes the rest from the
//! upstream provider, writing every fetched price back with a fixed TTL.

use {
	crate::{
		consts::{NATIVE_ASSET_KEY, PRICE_TTL_MS},
		model::{CachedPrice, PriceMetadata},
		provider::{PriceProvider, ProviderError},
		store::PriceStore,
	},
	chrono::Utc,
	futures_util::future::{join_all, try_join_all},
	std::{collections::HashMap, sync::Arc},
	thiserror::Error,
	tracing::{debug, info, warn},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
	#[error("No token identifiers supplied")]
	NoTokens,

	#[error("Upstream API key is not configured")]
	MissingCredentials,

	#[error("Upstream error: {0}")]
	Upstream(String),

	#[error("Store error: {0}")]
	Store(String),
}

impl From<ProviderError> for GatewayError {
	fn from(e: ProviderError) -> Self {
		match e {
			ProviderError::MissingCredentials => GatewayError::MissingCredentials,
			other => GatewayError::Upstream(other.to_string()),
		}
	}
}

pub struct PriceGateway {
	store: Arc<dyn PriceStore>,
	provider: Arc<dyn PriceProvider>,
}

impl PriceGateway {
	pub fn new(store: Arc<dyn PriceStore>, provider: Arc<dyn PriceProvider>) -> Self {
		Self { store, provider }
	}

	/// Splits a comma separated token list. Blank segments are dropped and repeated
	/// identifiers keep only their first occurrence.
	pub fn parse_tokens(raw: Option<&str>) -> Result<Vec<String>, GatewayError> {
		let mut tokens: Vec<String> = Vec::new();
		for token in raw.unwrap_or_default().split(',').map(str::trim).filter(|token| !token.is_empty()) {
			if !tokens.iter().any(|seen| seen == token) {
				tokens.push(token.to_string());
			}
		}
		if tokens.is_empty() {
			return Err(GatewayError::NoTokens);
		}
		Ok(tokens)
	}

	pub async fn get_prices(&self, tokens: &[String]) -> Result<HashMap<String, f64>, GatewayError> {
		self.get_prices_at(tokens, Utc::now().timestamp_millis()).await
	}

	/// Token identifier -> USD price as of `now_ms`.
	///
	/// Any store or upstream failure fails the whole request, cache hits included.
	pub async fn get_prices_at(&self, tokens: &[String], now_ms: i64) -> Result<HashMap<String, f64>, GatewayError> {
		if tokens.is_empty() {
			return Err(GatewayError::NoTokens);
		}

		// 并发读取缓存
		let lookups = join_all(tokens.iter().map(|token| self.lookup(token))).await;

		let mut prices = HashMap::with_capacity(tokens.len());
		let mut misses: Vec<&str> = Vec::new();
		for (token, lookup) in tokens.iter().zip(lookups) {
			match lookup? {
				Some(cached) if cached.is_fresh(now_ms) => {
					prices.insert(cached.token_address, cached.price);
				}
				_ => misses.push(token.as_str()),
			}
		}
		debug!("Price cache lookup: {} hits, {} misses", prices.len(), misses.len());

		if misses.is_empty() {
			return Ok(prices);
		}

		let fetched = self.fetch_upstream(&misses).await?;

		let metadata = PriceMetadata { expires_at: now_ms + PRICE_TTL_MS };
		try_join_all(fetched.iter().map(|(token, price)| self.store.set_with_metadata(token, *price, metadata))).await.map_err(|e| GatewayError::Store(e.to_string()))?;
		info!("Refreshed {} of {} missed prices from upstream, expires_at={}", fetched.len(), misses.len(), metadata.expires_at);

		prices.extend(fetched);
		Ok(prices)
	}

	async fn lookup(&self, token: &str) -> Result<Option<CachedPrice>, GatewayError> {
		let stored = self.store.get_with_metadata(token).await.map_err(|e| GatewayError::Store(e.to_string()))?;
		Ok(stored.map(|stored| CachedPrice::from_stored(token, stored)))
	}

	/// Contract tokens go out in one batched call, the native asset in a second one.
	/// Returned prices are keyed by the identifier the caller used.
	async fn fetch_upstream(&self, misses: &[&str]) -> Result<Vec<(String, f64)>, GatewayError> {
		let wants_native = misses.contains(&NATIVE_ASSET_KEY);
		let contract_tokens: Vec<String> = misses.iter().filter(|token| **token != NATIVE_ASSET_KEY).map(|token| token.to_string()).collect();

		let contract_fut = async {
			if contract_tokens.is_empty() {
				return Ok(HashMap::new());
			}
			self.provider.token_prices(&contract_tokens).await
		};
		let native_fut = async {
			if !wants_native {
				return Ok(None);
			}
			self.provider.native_price().await.map(Some)
		};
		let (by_address, native_price) = tokio::try_join!(contract_fut, native_fut)?;

		let mut fetched = Vec::with_capacity(misses.len());
		for token in contract_tokens {
			match by_address.get(&token.to_lowercase()) {
				Some(price) => fetched.push((token, *price)),
				None => warn!("Upstream returned no price for {}", token),
			}
		}
		if let Some(price) = native_price {
			fetched.push((NATIVE_ASSET_KEY.to_string(), price));
		}
		Ok(fetched)
	}
}
