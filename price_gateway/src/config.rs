use {
	crate::{
		consts::{STORE_BACKEND_MEMORY, STORE_BACKEND_REDIS},
		provider::UpstreamConfig,
	},
	common::logging::LoggingConfig,
	config::{Config, File},
	serde::{Deserialize, Serialize},
	tokio::sync::OnceCell,
};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayAppConfig {
	pub logging: LoggingConfig,
	pub server: ServerConfig,
	pub store: StoreConfig,
	pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
	pub port: u16,
}

impl ServerConfig {
	pub fn get_addr(&self) -> String {
		format!("0.0.0.0:{}", self.port)
	}
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
	/// `redis` or `memory`
	pub backend: String,
}

impl StoreConfig {
	pub fn check(&self) -> anyhow::Result<()> {
		match self.backend.as_str() {
			STORE_BACKEND_REDIS | STORE_BACKEND_MEMORY => Ok(()),
			other => Err(anyhow::anyhow!("Invalid store backend: {}. Must be either '{}' or '{}'", other, STORE_BACKEND_REDIS, STORE_BACKEND_MEMORY)),
		}
	}
}

pub static CONFIG: OnceCell<GatewayAppConfig> = OnceCell::const_new();

pub fn load_config(config_path: &str) -> anyhow::Result<()> {
	let run_mode = &common::common_env::get_common_env().run_mode;

	let gateway_config = read_config(&format!("{}/{}", config_path, run_mode))?;
	println!("Configuration loaded for mode: {}", run_mode);
	println!("Configuration: {:?}", gateway_config);
	CONFIG.set(gateway_config)?;
	Ok(())
}

/// Reads and validates one config file, `file` is the path without the `.toml` extension
pub fn read_config(file: &str) -> anyhow::Result<GatewayAppConfig> {
	let config = Config::builder().add_source(File::with_name(file).required(true)).build()?;
	let gateway_config: GatewayAppConfig = config.try_deserialize()?;
	check_config(&gateway_config)?;
	Ok(gateway_config)
}

fn check_config(config: &GatewayAppConfig) -> anyhow::Result<()> {
	config.logging.check()?;
	config.store.check()?;
	config.upstream.check()?;
	Ok(())
}

pub fn get_config() -> &'static GatewayAppConfig {
	CONFIG.get().expect("Config not loaded")
}
