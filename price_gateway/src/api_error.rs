use {
	crate::{api_types::ApiResponse, gateway::GatewayError},
	axum::{
		Json,
		http::StatusCode,
		response::{IntoResponse, Response},
	},
};

/// API 错误码定义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
	/// tokens 参数缺失或为空
	MissingTokens,
	/// 上游 / 配置 / 存储失败, 对调用方统一返回
	PriceUnavailable,
}

impl ApiErrorCode {
	/// 获取错误消息
	pub fn message(&self) -> &'static str {
		match self {
			ApiErrorCode::MissingTokens => "Missing tokens parameter",
			ApiErrorCode::PriceUnavailable => "Failed to fetch token prices",
		}
	}

	pub fn status(&self) -> StatusCode {
		match self {
			ApiErrorCode::MissingTokens => StatusCode::BAD_REQUEST,
			ApiErrorCode::PriceUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl From<&GatewayError> for ApiErrorCode {
	fn from(e: &GatewayError) -> Self {
		match e {
			GatewayError::NoTokens => ApiErrorCode::MissingTokens,
			GatewayError::MissingCredentials | GatewayError::Upstream(_) | GatewayError::Store(_) => ApiErrorCode::PriceUnavailable,
		}
	}
}

/// Error returned by handlers, rendered as `{"error": "..."}` with the code's status.
/// Details stay in the server log.
#[derive(Debug)]
pub struct ApiError(pub ApiErrorCode);

impl From<&GatewayError> for ApiError {
	fn from(e: &GatewayError) -> Self {
		ApiError(ApiErrorCode::from(e))
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ApiResponse::<()>::error(self.0);
		(self.0.status(), Json(body)).into_response()
	}
}
