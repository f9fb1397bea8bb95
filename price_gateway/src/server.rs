use {
	crate::{
		gateway::PriceGateway,
		handlers::{handle_hi, handle_token_prices},
		singleflight::TokenPricesGroup,
	},
	axum::{Router, http::HeaderName, routing::get},
	std::{sync::Arc, time::Duration},
	tower_http::{
		compression::CompressionLayer,
		cors::{Any, CorsLayer},
		request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	},
};

pub const X_REQUEST_ID: &str = "x-request-id";

#[derive(Clone)]
pub struct AppState {
	pub gateway: Arc<PriceGateway>,
	pub token_prices_group: Arc<TokenPricesGroup>,
}

impl AppState {
	pub fn new(gateway: Arc<PriceGateway>) -> Self {
		Self { gateway, token_prices_group: Arc::new(TokenPricesGroup::new()) }
	}
}

pub fn app(state: AppState) -> Router {
	let x_request_id = HeaderName::from_static(X_REQUEST_ID);
	let sub_router = Router::new()
		.route("/hi", get(handle_hi))
		.route("/token_prices", get(handle_token_prices))
		.layer(PropagateRequestIdLayer::new(x_request_id.clone())) //将请求id从请求头中传递到响应头中
		.layer(CompressionLayer::new())
		.layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid)) //生成请求id 并放到请求头中
		.layer(CorsLayer::new().allow_methods(Any).allow_origin(Any).allow_credentials(false).allow_headers(Any).expose_headers(Any).max_age(Duration::from_secs(60) * 10))
		.with_state(state);

	Router::new().nest("/api", sub_router)
}
