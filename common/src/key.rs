// Redis key and field generation utilities

/// Token price cache hash key (used with HSET/HGET)
/// Field is the token identifier exactly as the caller sent it, value is the JSON encoded stored price
pub const TOKEN_PRICE_CACHE_KEY: &str = "token_price";
