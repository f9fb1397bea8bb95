//! Integration Tests Crate
//!
//! This crate contains all integration tests for the price gateway.
//! Tests are organized by module:
//! - `test_utils`: fake upstream provider, recording store and gateway builders
//! - `price_gateway_tests`: cache hit/miss partition, TTL and upstream fan-out
//! - `coingecko_provider_tests`: upstream HTTP client against a mock server
//! - `token_prices_api_tests`: HTTP surface through the axum router
//! - `config_tests`: config file loading and validation

pub mod test_utils;
