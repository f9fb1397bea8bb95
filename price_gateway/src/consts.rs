/// Sentinel identifier of the chain's native asset, also its store key on every chain
pub const NATIVE_ASSET_KEY: &str = "ethereum";

/// 新拉取价格的有效期：30 分钟（毫秒）
pub const PRICE_TTL_MS: i64 = 30 * 60 * 1000;

/// 所有价格都以美元计
pub const VS_CURRENCY: &str = "usd";

/// Store backends selectable in `[store]`
pub const STORE_BACKEND_REDIS: &str = "redis";
pub const STORE_BACKEND_MEMORY: &str = "memory";
