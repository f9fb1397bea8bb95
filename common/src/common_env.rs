use {
	crate::consts::COMMON_ENV_PATH,
	config::{Config, Environment},
	serde::{Deserialize, Serialize},
	tokio::sync::OnceCell,
};

#[derive(Clone, Deserialize, Serialize)]
pub struct CommonEnv {
	pub run_mode: String,

	// Cache Redis 配置
	#[serde(default)]
	pub cache_redis_host: String,
	pub cache_redis_password: Option<String>,

	// 上游价格 API key, 缺失时在请求时报配置错误而不是启动失败
	pub price_api_key: Option<String>,
}

// 不打印密钥
impl std::fmt::Debug for CommonEnv {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CommonEnv")
			.field("run_mode", &self.run_mode)
			.field("cache_redis_host", &self.cache_redis_host)
			.field("cache_redis_password", &self.cache_redis_password.as_ref().map(|_| "***"))
			.field("price_api_key", &self.price_api_key.as_ref().map(|_| "***"))
			.finish()
	}
}

pub static COMMON_ENV: OnceCell<CommonEnv> = OnceCell::const_new();

pub fn load_common_env() -> anyhow::Result<()> {
	// 使用 dotenvy 从文件加载环境变量到进程环境变量中, 文件不存在时直接使用进程环境变量
	if let Err(e) = dotenvy::from_path(COMMON_ENV_PATH) {
		if !e.not_found() {
			return Err(e.into());
		}
		println!("{} not found, using process environment only", COMMON_ENV_PATH);
	}

	// 使用 config crate 从环境变量反序列化到 CommonEnv
	let config = Config::builder().add_source(Environment::default()).build()?;

	let common_env: CommonEnv = config.try_deserialize()?;
	println!("Common env configuration: {:?}", common_env);
	COMMON_ENV.set(common_env)?;
	check_common_env()?;
	Ok(())
}

pub fn check_common_env() -> anyhow::Result<()> {
	let common_env = get_common_env();

	// 验证 RUN_MODE
	crate::consts::validate_run_mode(&common_env.run_mode)?;

	Ok(())
}

pub fn get_common_env() -> &'static CommonEnv {
	COMMON_ENV.get().expect("Common env not loaded")
}
