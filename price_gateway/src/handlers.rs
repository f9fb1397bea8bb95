use {
	crate::{
		api_error::{ApiError, ApiErrorCode},
		api_types::{ApiResponse, TokenPricesRequest, TokenPricesResponse},
		gateway::{GatewayError, PriceGateway},
		server::{AppState, X_REQUEST_ID},
		singleflight::token_prices_key,
	},
	axum::{
		extract::{Query, State, rejection::QueryRejection},
		http::HeaderMap,
		response::Json,
	},
	uuid::Uuid,
};

fn request_id(headers: &HeaderMap) -> String {
	headers.get(X_REQUEST_ID).and_then(|header| header.to_str().ok()).map(|header| header.to_string()).unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// GET /token_prices?tokens=0xAAA,0xBBB,ethereum - 获取 token 的 USD 价格
///
/// The upstream API key is only checked on a cache miss: without one, fully cached requests
/// keep succeeding and every miss returns 500 until `PRICE_API_KEY` is set.
pub async fn handle_token_prices(State(state): State<AppState>, headers: HeaderMap, query: Result<Query<TokenPricesRequest>, QueryRejection>) -> Result<Json<ApiResponse<TokenPricesResponse>>, ApiError> {
	let request_id = request_id(&headers);

	// 参数错误是调用方的问题, 不按服务端错误记录
	let Query(params) = query.map_err(|e| {
		tracing::debug!("request_id={} - Unparsable token prices query: {}", request_id, e);
		ApiError(ApiErrorCode::MissingTokens)
	})?;
	let tokens = PriceGateway::parse_tokens(params.tokens.as_deref()).map_err(|e| {
		tracing::debug!("request_id={} - Rejected token prices request: {}", request_id, e);
		ApiError::from(&e)
	})?;

	let singleflight_key = token_prices_key(&tokens);
	let gateway = state.gateway.clone();
	let result = state.token_prices_group.work(&singleflight_key, async move { gateway.get_prices(&tokens).await }).await;

	match result {
		Ok(prices) => Ok(Json(ApiResponse::success(prices))),
		Err(Some(e)) => {
			match &e {
				GatewayError::MissingCredentials => tracing::error!("request_id={}, tokens={} - Upstream price API key is not configured", request_id, singleflight_key),
				_ => tracing::error!("request_id={}, tokens={} - Failed to get token prices: {}", request_id, singleflight_key, e),
			}
			Err(ApiError::from(&e))
		}
		// 跟随者拿不到发起者的具体错误, 详细日志在发起者那边
		Err(None) => {
			tracing::warn!("request_id={}, tokens={} - Shared token prices request failed", request_id, singleflight_key);
			Err(ApiError(ApiErrorCode::PriceUnavailable))
		}
	}
}

pub async fn handle_hi() -> &'static str {
	"You will succeed."
}
