use {
	crate::consts::REDIS_POOL_MAX_SIZE,
	deadpool_redis::{Config, Connection, Pool, PoolConfig, Runtime},
	redis::AsyncCommands,
	tokio::sync::OnceCell,
};

// Cache Redis 连接池（价格缓存）
pub static CACHE_REDIS_POOL: OnceCell<Pool> = OnceCell::const_new();

fn redis_url(redis_host: &str, redis_password: Option<String>, db: u32) -> String {
	format!("redis://{}{}/{}", if let Some(pwd) = redis_password { format!(":{}@", pwd) } else { "".to_string() }, redis_host, db)
}

/// 创建连接池
fn create_pool(redis_host: &str, redis_password: Option<String>, db: u32) -> anyhow::Result<Pool> {
	let mut cfg = Config::from_url(redis_url(redis_host, redis_password, db));
	cfg.pool = Some(PoolConfig::new(REDIS_POOL_MAX_SIZE));
	Ok(cfg.create_pool(Some(Runtime::Tokio1))?)
}

/// 初始化 Cache Redis 连接池
pub async fn init_cache_redis_pool(redis_host: &str, redis_password: Option<String>, db: u32) -> anyhow::Result<()> {
	let pool = create_pool(redis_host, redis_password, db)?;
	CACHE_REDIS_POOL.set(pool)?;
	Ok(())
}

/// 获取 Cache Redis 连接池
pub fn get_cache_redis_pool() -> anyhow::Result<Pool> {
	CACHE_REDIS_POOL.get().cloned().ok_or_else(|| anyhow::anyhow!("Cache Redis pool not initialized"))
}

/// 关闭 Cache Redis 连接池 (释放所有连接)
pub fn close_cache_redis_pool() {
	if let Some(pool) = CACHE_REDIS_POOL.get() {
		pool.close();
	}
}

/// 获取 Cache Redis 连接
pub async fn get_cache_redis_connection() -> anyhow::Result<Connection> {
	let pool = get_cache_redis_pool()?;
	pool.get().await.map_err(|e| anyhow::anyhow!("Failed to get cache redis connection: {}", e))
}

/// Ping Cache Redis
pub async fn ping_cache_redis() -> anyhow::Result<()> {
	get_cache_redis_connection().await?.ping().await.map_err(|e| anyhow::anyhow!("Cache Redis ping error: {}", e))
}
