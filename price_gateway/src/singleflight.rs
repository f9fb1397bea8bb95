use {
	crate::{api_types::TokenPricesResponse, gateway::GatewayError},
	async_singleflight::Group,
};

//Group中Hashmap中的key-value都是send 外面加了Mutex
//所以Group是send+sync的 可以放在 AppState 里用 Arc 共享

/// Token prices 查询的 singleflight group
/// Key: 去重后的 token 列表, 逗号拼接 (保持请求顺序)
pub type TokenPricesGroup = Group<String, TokenPricesResponse, GatewayError>;

pub fn token_prices_key(tokens: &[String]) -> String {
	tokens.join(",")
}
