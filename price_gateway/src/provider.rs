use {
	crate::consts::VS_CURRENCY,
	async_trait::async_trait,
	reqwest::Client,
	serde::{Deserialize, Serialize, de::DeserializeOwned},
	std::{collections::HashMap, time::Duration},
	thiserror::Error,
};

const SIMPLE_TOKEN_PRICE_PATH: &str = "/simple/token_price";
const SIMPLE_PRICE_PATH: &str = "/simple/price";

/// 上游价格服务错误
#[derive(Debug, Error)]
pub enum ProviderError {
	#[error("Upstream API key is not configured")]
	MissingCredentials,

	#[error("Upstream request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("Upstream returned status {status}: {body}")]
	Status { status: u16, body: String },

	#[error("Upstream response has no {currency} price for {asset}")]
	MissingPrice { asset: String, currency: String },
}

/// Third-party USD pricing API.
///
/// Contract-address lookups and the native asset lookup are separate calls because the
/// upstream cannot mix them in one request.
#[async_trait]
pub trait PriceProvider: Send + Sync {
	/// One batched lookup. Keys of the result are lowercase addresses, unknown tokens are absent.
	async fn token_prices(&self, contract_addresses: &[String]) -> Result<HashMap<String, f64>, ProviderError>;

	async fn native_price(&self) -> Result<f64, ProviderError>;
}

/// `[upstream]` section of the gateway config. The API key comes from the environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
	pub base_url: String,
	/// Asset platform the contract addresses live on, e.g. `ethereum`
	pub platform_id: String,
	/// Asset id of the chain's native coin
	pub native_asset_id: String,
	pub api_key_header: String,
	pub timeout_secs: u64,
	pub connect_timeout_secs: u64,
	#[serde(skip)]
	pub api_key: Option<String>,
}

impl UpstreamConfig {
	pub fn check(&self) -> anyhow::Result<()> {
		url::Url::parse(&self.base_url).map_err(|e| anyhow::anyhow!("Invalid upstream base_url {}: {}", self.base_url, e))?;
		if self.platform_id.is_empty() {
			return Err(anyhow::anyhow!("Upstream platform_id is empty"));
		}
		if self.native_asset_id.is_empty() {
			return Err(anyhow::anyhow!("Upstream native_asset_id is empty"));
		}
		if self.api_key_header.is_empty() {
			return Err(anyhow::anyhow!("Upstream api_key_header is empty"));
		}
		if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
			return Err(anyhow::anyhow!("Upstream timeouts must be greater than 0"));
		}
		Ok(())
	}
}

/// `{ "<id or address>": { "usd": 1.23 } }`
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

pub struct CoinGeckoProvider {
	client: Client,
	config: UpstreamConfig,
}

impl CoinGeckoProvider {
	pub fn new(config: UpstreamConfig) -> anyhow::Result<Self> {
		let client = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).connect_timeout(Duration::from_secs(config.connect_timeout_secs)).build()?;
		Ok(Self { client, config })
	}

	fn api_key(&self) -> Result<&str, ProviderError> {
		match self.config.api_key.as_deref().map(str::trim) {
			Some(key) if !key.is_empty() => Ok(key),
			_ => Err(ProviderError::MissingCredentials),
		}
	}

	fn endpoint(&self, path: &str) -> String {
		format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
	}

	async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)], api_key: &str) -> Result<T, ProviderError> {
		let response = self.client.get(url).header(self.config.api_key_header.as_str(), api_key).query(query).send().await?;
		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(ProviderError::Status { status: status.as_u16(), body });
		}
		Ok(response.json::<T>().await?)
	}
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
	async fn token_prices(&self, contract_addresses: &[String]) -> Result<HashMap<String, f64>, ProviderError> {
		let api_key = self.api_key()?;
		if contract_addresses.is_empty() {
			return Ok(HashMap::new());
		}

		let url = self.endpoint(&format!("{}/{}", SIMPLE_TOKEN_PRICE_PATH, self.config.platform_id));
		let addresses = contract_addresses.join(",");
		let body: SimplePriceResponse = self.get_json(&url, &[("contract_addresses", addresses.as_str()), ("vs_currencies", VS_CURRENCY)], api_key).await?;

		Ok(body.into_iter().filter_map(|(address, quotes)| quotes.get(VS_CURRENCY).map(|price| (address.to_lowercase(), *price))).collect())
	}

	async fn native_price(&self) -> Result<f64, ProviderError> {
		let api_key = self.api_key()?;
		let url = self.endpoint(SIMPLE_PRICE_PATH);
		let body: SimplePriceResponse = self.get_json(&url, &[("ids", self.config.native_asset_id.as_str()), ("vs_currencies", VS_CURRENCY)], api_key).await?;

		body.get(&self.config.native_asset_id)
			.and_then(|quotes| quotes.get(VS_CURRENCY))
			.copied()
			.ok_or_else(|| ProviderError::MissingPrice { asset: self.config.native_asset_id.clone(), currency: VS_CURRENCY.to_string() })
	}
}
