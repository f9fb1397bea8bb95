use {
	serde::{Deserialize, Serialize},
	std::path::Path,
	tokio::sync::OnceCell,
	tracing::info,
	tracing_appender::{
		non_blocking::{NonBlocking, WorkerGuard},
		rolling::{RollingFileAppender, Rotation},
	},
	tracing_subscriber::fmt::MakeWriter,
};

// 文件日志的后台写线程 guard, 进程存活期间不能 drop
static FILE_WRITER_GUARD: OnceCell<WorkerGuard> = OnceCell::const_new();

/// `[logging]` section. `console = true` wins over `file`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
	pub level: String,
	pub file: Option<String>,
	pub console: bool,
	/// Daily files kept when logging to a file
	pub rotation_max_files: usize,
}

impl LoggingConfig {
	pub fn check(&self) -> anyhow::Result<()> {
		if self.level.is_empty() {
			return Err(anyhow::anyhow!("Logging level is empty"));
		}
		if self.console {
			return Ok(());
		}
		match self.file.as_deref() {
			None | Some("") => Err(anyhow::anyhow!("Logging needs either console = true or a file")),
			Some(_) if self.rotation_max_files == 0 => Err(anyhow::anyhow!("Logging rotation_max_files must be greater than 0")),
			Some(_) => Ok(()),
		}
	}
}

/// Installs the global subscriber described by `config`. Call once, after `check`.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
	match config.file.as_deref() {
		Some(file) if !config.console => {
			let writer = daily_file_writer(file, config.rotation_max_files)?;
			install(&config.level, writer)?;
			info!("Logging to {} (level: {}, keep {} files)", file, config.level, config.rotation_max_files);
		}
		_ => {
			install(&config.level, std::io::stdout)?;
			info!("Logging to console (level: {})", config.level);
		}
	}
	Ok(())
}

fn install<W>(level: &str, writer: W) -> anyhow::Result<()>
where
	W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
	tracing_subscriber::fmt()
		.with_env_filter(level)
		.with_writer(writer)
		.with_file(true)
		.with_target(true)
		.with_line_number(true)
		.with_ansi(false)
		.try_init()
		.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}

fn daily_file_writer(file_path: &str, max_files: usize) -> anyhow::Result<NonBlocking> {
	let path = Path::new(file_path);
	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};
	std::fs::create_dir_all(dir)?;
	let prefix = path.file_name().and_then(|name| name.to_str()).ok_or_else(|| anyhow::anyhow!("Invalid log file name: {}", file_path))?;

	let appender = RollingFileAppender::builder().rotation(Rotation::DAILY).max_log_files(max_files).filename_prefix(prefix).build(dir)?;
	let (writer, guard) = tracing_appender::non_blocking(appender);
	FILE_WRITER_GUARD.set(guard).map_err(|_| anyhow::anyhow!("File logging already initialized"))?;
	Ok(writer)
}
