use {
	price_gateway::{config, init, server},
	tracing::info,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let state = init::init_all().await?;

	let addr = config::get_config().server.get_addr();
	let listener = tokio::net::TcpListener::bind(&addr).await?;
	info!("🚀 Price Gateway is running at {}", listener.local_addr()?);

	let app = server::app(state);

	// 使用 axum 的 with_graceful_shutdown 实现优雅停机, 请求处理完再关闭 Redis 连接池
	axum::serve(listener, app).with_graceful_shutdown(common::graceful::shutdown_signal()).await?;
	common::redis_pool::close_cache_redis_pool();

	info!("Price gateway stopped");
	Ok(())
}
