use {
	crate::{
		config::{get_config, load_config},
		consts::STORE_BACKEND_REDIS,
		gateway::PriceGateway,
		provider::CoinGeckoProvider,
		server::AppState,
		store::{MemoryPriceStore, PriceStore, RedisPriceStore},
	},
	common::common_env,
	std::sync::Arc,
};

pub async fn init_all() -> anyhow::Result<AppState> {
	init_load()?;
	init_logging()?;
	let store = init_store().await?; // 初始化价格存储
	let provider = init_provider()?; // 初始化上游价格 HTTP Client
	let gateway = PriceGateway::new(store, provider);
	Ok(AppState::new(Arc::new(gateway)))
}

fn init_load() -> anyhow::Result<()> {
	common_env::load_common_env()?;
	load_config(common::consts::PRICE_GATEWAY_CONFIG_PATH)?;
	Ok(())
}

fn init_logging() -> anyhow::Result<()> {
	common::logging::init_logging(&get_config().logging)
}

async fn init_store() -> anyhow::Result<Arc<dyn PriceStore>> {
	let config = get_config();
	if config.store.backend != STORE_BACKEND_REDIS {
		tracing::warn!("Using in-memory price store, cached prices are lost on restart");
		return Ok(Arc::new(MemoryPriceStore::new()));
	}

	let env = common_env::get_common_env();
	if env.cache_redis_host.is_empty() {
		return Err(anyhow::anyhow!("Cache Redis host is empty"));
	}
	// 初始化 cache Redis 连接池（用于价格缓存）
	common::redis_pool::init_cache_redis_pool(&env.cache_redis_host, env.cache_redis_password.clone(), common::consts::REDIS_DB_CACHE).await?;
	common::redis_pool::ping_cache_redis().await?;
	tracing::info!("Cache Redis pool initialized (host: {}, db: {})", env.cache_redis_host, common::consts::REDIS_DB_CACHE);

	Ok(Arc::new(RedisPriceStore::new(common::redis_pool::get_cache_redis_pool()?)))
}

fn init_provider() -> anyhow::Result<Arc<CoinGeckoProvider>> {
	let mut upstream = get_config().upstream.clone();
	upstream.api_key = common_env::get_common_env().price_api_key.clone();
	if upstream.api_key.as_deref().is_none_or(|key| key.trim().is_empty()) {
		tracing::warn!("PRICE_API_KEY is not set, cache misses will fail until it is configured");
	}
	let provider = CoinGeckoProvider::new(upstream)?;
	tracing::info!("Upstream price provider initialized (base_url: {})", get_config().upstream.base_url);
	Ok(Arc::new(provider))
}
