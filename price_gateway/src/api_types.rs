use {
	serde::{Deserialize, Serialize},
	std::collections::HashMap,
};

/// API 统一响应格式: 成功只有 data, 失败只有 error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
	#[serde(rename = "data", skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(rename = "error", skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl<T> ApiResponse<T> {
	/// 创建成功响应
	pub fn success(data: T) -> Self {
		Self { data: Some(data), error: None }
	}

	/// 创建失败响应
	pub fn error(error_code: crate::api_error::ApiErrorCode) -> Self {
		Self { data: None, error: Some(error_code.message().to_string()) }
	}
}

/// GET /token_prices 查询参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPricesRequest {
	/// comma separated token identifiers
	#[serde(rename = "tokens")]
	pub tokens: Option<String>,
}

/// token identifier -> USD price
pub type TokenPricesResponse = HashMap<String, f64>;
