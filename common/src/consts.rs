pub const COMMON_ENV_PATH: &str = "./deploy/common.env";
pub const PRICE_GATEWAY_CONFIG_PATH: &str = "./deploy/price_gateway";

/// 运行模式常量
pub const RUN_MODE_DEV: &str = "dev";
pub const RUN_MODE_PROD: &str = "prod";

/// Redis DB 常量 - 价格缓存使用的数据库编号
pub const REDIS_DB_CACHE: u32 = 4;

pub const REDIS_POOL_MAX_SIZE: usize = 32;

/// 验证运行模式是否有效
pub fn validate_run_mode(run_mode: &str) -> anyhow::Result<()> {
	match run_mode {
		RUN_MODE_DEV | RUN_MODE_PROD => Ok(()),
		_ => Err(anyhow::anyhow!("Invalid RUN_MODE: {}. Must be either '{}' or '{}'", run_mode, RUN_MODE_DEV, RUN_MODE_PROD)),
	}
}
