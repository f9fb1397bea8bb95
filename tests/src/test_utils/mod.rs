use {
	async_trait::async_trait,
	price_gateway::{
		gateway::PriceGateway,
		model::{PriceMetadata, StoredPrice},
		provider::{PriceProvider, ProviderError},
		server::{AppState, app},
		store::{MemoryPriceStore, PriceStore},
	},
	std::{
		collections::HashMap,
		sync::{
			Arc, Mutex,
			atomic::{AtomicUsize, Ordering},
		},
		time::Duration,
	},
};

/// 固定的测试时间（毫秒）
pub const NOW_MS: i64 = 1_700_000_000_000;

/// 30 分钟
pub const TTL_MS: i64 = 30 * 60 * 1000;

/// 上游失败方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
	None,
	MissingCredentials,
	Status,
}

/// 假的上游价格服务，记录每次调用
pub struct FakeProvider {
	/// lowercase address -> price
	prices: HashMap<String, f64>,
	native: Option<f64>,
	failure: FailureMode,
	delay: Option<Duration>,
	pub token_calls: Mutex<Vec<Vec<String>>>,
	pub native_calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeProvider {
	pub fn new() -> Self {
		Self { prices: HashMap::new(), native: None, failure: FailureMode::None, delay: None, token_calls: Mutex::new(Vec::new()), native_calls: AtomicUsize::new(0) }
	}

	/// 上游返回的 key 是小写地址
	pub fn with_price(mut self, address: &str, price: f64) -> Self {
		self.prices.insert(address.to_lowercase(), price);
		self
	}

	pub fn with_native_price(mut self, price: f64) -> Self {
		self.native = Some(price);
		self
	}

	pub fn failing(mut self, failure: FailureMode) -> Self {
		self.failure = failure;
		self
	}

	/// 每次调用先等待一段时间, 用来制造并发请求
	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);
		self
	}

	pub fn token_call_count(&self) -> usize {
		self.token_calls.lock().unwrap().len()
	}

	pub fn native_call_count(&self) -> usize {
		self.native_calls.load(Ordering::SeqCst)
	}

	pub fn total_calls(&self) -> usize {
		self.token_call_count() + self.native_call_count()
	}

	async fn wait(&self) {
		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}
	}

	fn check_failure(&self) -> Result<(), ProviderError> {
		match self.failure {
			FailureMode::None => Ok(()),
			FailureMode::MissingCredentials => Err(ProviderError::MissingCredentials),
			FailureMode::Status => Err(ProviderError::Status { status: 503, body: "upstream unavailable".to_string() }),
		}
	}
}

#[async_trait]
impl PriceProvider for FakeProvider {
	async fn token_prices(&self, contract_addresses: &[String]) -> Result<HashMap<String, f64>, ProviderError> {
		// 缺少凭证时不应该有任何请求发出
		if self.failure == FailureMode::MissingCredentials {
			return Err(ProviderError::MissingCredentials);
		}
		self.token_calls.lock().unwrap().push(contract_addresses.to_vec());
		self.wait().await;
		self.check_failure()?;
		Ok(contract_addresses.iter().filter_map(|address| self.prices.get(&address.to_lowercase()).map(|price| (address.to_lowercase(), *price))).collect())
	}

	async fn native_price(&self) -> Result<f64, ProviderError> {
		if self.failure == FailureMode::MissingCredentials {
			return Err(ProviderError::MissingCredentials);
		}
		self.native_calls.fetch_add(1, Ordering::SeqCst);
		self.wait().await;
		self.check_failure()?;
		self.native.ok_or_else(|| ProviderError::MissingPrice { asset: "ethereum".to_string(), currency: "usd".to_string() })
	}
}

/// 包一层内存存储，记录读写次数和写入内容
#[derive(Default)]
pub struct RecordingStore {
	inner: MemoryPriceStore,
	pub reads: AtomicUsize,
	pub writes: Mutex<Vec<(String, f64, PriceMetadata)>>,
}

#[allow(dead_code)]
impl RecordingStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// 直接写入底层存储，不计入 writes
	pub async fn seed(&self, key: &str, price: f64, expires_at: i64) {
		self.inner.set_with_metadata(key, price, PriceMetadata { expires_at }).await.unwrap();
	}

	pub async fn stored(&self, key: &str) -> Option<StoredPrice> {
		self.inner.get_with_metadata(key).await.unwrap()
	}

	pub fn read_count(&self) -> usize {
		self.reads.load(Ordering::SeqCst)
	}

	pub fn write_log(&self) -> Vec<(String, f64, PriceMetadata)> {
		self.writes.lock().unwrap().clone()
	}
}

#[async_trait]
impl PriceStore for RecordingStore {
	async fn get_with_metadata(&self, key: &str) -> anyhow::Result<Option<StoredPrice>> {
		self.reads.fetch_add(1, Ordering::SeqCst);
		self.inner.get_with_metadata(key).await
	}

	async fn set_with_metadata(&self, key: &str, value: f64, metadata: PriceMetadata) -> anyhow::Result<()> {
		self.writes.lock().unwrap().push((key.to_string(), value, metadata));
		self.inner.set_with_metadata(key, value, metadata).await
	}
}

/// 读写都失败的存储
pub struct BrokenStore;

#[async_trait]
impl PriceStore for BrokenStore {
	async fn get_with_metadata(&self, _key: &str) -> anyhow::Result<Option<StoredPrice>> {
		Err(anyhow::anyhow!("connection refused"))
	}

	async fn set_with_metadata(&self, _key: &str, _value: f64, _metadata: PriceMetadata) -> anyhow::Result<()> {
		Err(anyhow::anyhow!("connection refused"))
	}
}

/// 测试环境：网关 + 可检查的存储和上游
pub struct TestEnv {
	pub store: Arc<RecordingStore>,
	pub provider: Arc<FakeProvider>,
	pub gateway: Arc<PriceGateway>,
}

#[allow(dead_code)]
impl TestEnv {
	pub fn new(provider: FakeProvider) -> Self {
		let store = Arc::new(RecordingStore::new());
		let provider = Arc::new(provider);
		let gateway = Arc::new(PriceGateway::new(store.clone(), provider.clone()));
		Self { store, provider, gateway }
	}

	pub fn router(&self) -> axum::Router {
		app(AppState::new(self.gateway.clone()))
	}
}

pub fn tokens(list: &[&str]) -> Vec<String> {
	list.iter().map(|token| token.to_string()).collect()
}
