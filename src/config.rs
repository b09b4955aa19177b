//! 配置系统模块
//!
//! 统一处理 TOML 配置文件、环境变量、命令行参数

use crate::session::Theme;
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use config::{Config as ConfigBuilder, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

/// 应用目录名
const APP_NAME: &str = "med-keeper";
/// 环境变量前缀
const ENV_PREFIX: &str = "MED_KEEPER";
/// 日志文件名
const LOG_FILE_NAME: &str = "med-keeper.log";
/// 回复延迟上限（毫秒）
const MAX_REPLY_DELAY_MS: u64 = 60_000;

/// 命令行参数
#[derive(Parser, Debug, Clone)]
#[command(name = "med-keeper")]
#[command(about = "个人用药管理 - 用药日历、药品库存、复查与就诊记录")]
#[command(version)]
pub struct Cli {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 日志级别
    #[arg(short, long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// 固定"今天"的日期（YYYY-MM-DD）
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// 库存不足阈值
    #[arg(long)]
    pub low_stock_threshold: Option<u32>,

    /// 以 JSON 输出
    #[arg(long, global = true)]
    pub json: bool,

    /// 子命令
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// 支持的命令
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// 个人中心概览与各项统计
    Overview,
    /// 用药提醒
    Reminders {
        /// 只看某一天（YYYY-MM-DD）
        #[arg(long)]
        date: Option<NaiveDate>,
        /// 状态：all | pending | taken | missed
        #[arg(long, default_value = "all")]
        status: String,
        /// 按名称或备注搜索
        #[arg(long, default_value = "")]
        search: String,
    },
    /// 用药日历月视图
    Calendar {
        /// 月份（YYYY-MM），默认当月
        #[arg(long)]
        month: Option<String>,
    },
    /// 药品库存
    Inventory {
        /// 状态：all | normal | low | expired
        #[arg(long, default_value = "all")]
        status: String,
        #[arg(long, default_value = "")]
        search: String,
        /// 只看即将过期的药品
        #[arg(long)]
        expiring: bool,
    },
    /// 复查预约
    Checkups {
        /// 状态：all | upcoming | completed | missed
        #[arg(long, default_value = "all")]
        status: String,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// 门诊历史
    Visits {
        /// 科室，如 "内科"
        #[arg(long, default_value = "all")]
        department: String,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// 健康指标
    Metrics {
        /// 指标：bloodPressure | heartRate | bloodSugar | bodyTemp
        #[arg(long)]
        kind: Option<String>,
    },
    /// 向健康助手提问
    Ask {
        /// 问题
        question: String,
    },
    /// 列出预设问题
    Questions,
    /// 打印生效的配置
    PrintConfig,
    /// 重置配置
    ResetConfig,
}

/// 日志级别
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// 主配置结构
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 日志配置
    pub logging: LoggingConfig,
    /// 库存配置
    pub inventory: InventoryConfig,
    /// 健康咨询配置
    pub consultation: ConsultationConfig,
    /// 日期配置
    pub clock: ClockConfig,
    /// 会话配置
    pub session: SessionConfig,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,
    /// 日志格式
    pub format: LogFormat,
    /// 日志输出目录，按天轮转
    pub directory: Option<PathBuf>,
}

/// 日志格式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// 简洁格式
    Compact,
    /// 详细格式
    Full,
    /// JSON 格式
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InventoryConfig {
    /// 数量低于该值视为库存不足
    pub low_stock_threshold: u32,
    /// 多少天内过期算"即将过期"
    pub expiry_warning_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConsultationConfig {
    /// 助手回复延迟（毫秒）
    pub reply_delay_ms: u64,
    /// 单条消息最大字符数
    pub max_message_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ClockConfig {
    /// 固定"今天"，不设置时使用系统日期
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    pub authenticated: bool,
    pub theme: Theme,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            directory: None,
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 5,
            expiry_warning_days: 30,
        }
    }
}

impl Default for ConsultationConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: 1000,
            max_message_len: 500,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            authenticated: true,
            theme: Theme::Light,
        }
    }
}

impl Config {
    /// 从多种配置源加载配置
    pub fn load() -> Result<Self> {
        let cli = Cli::parse();
        Self::load_with_cli(&cli)
    }

    /// 使用指定的 CLI 参数加载配置
    pub fn load_with_cli(cli: &Cli) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        // 1. 默认配置
        builder = builder.add_source(config::Config::try_from(&Config::default())?);

        // 2. 系统配置文件
        if let Some(system_config) = Self::get_system_config_path() {
            if system_config.exists() {
                builder = builder.add_source(File::from(system_config));
            }
        }

        // 3. 用户配置文件
        if let Some(user_config) = Self::get_user_config_path() {
            if user_config.exists() {
                builder = builder.add_source(File::from(user_config));
            }
        }

        // 4. 指定的配置文件
        if let Some(config_path) = &cli.config {
            if config_path.exists() {
                builder = builder.add_source(File::from(config_path.clone()));
            } else {
                return Err(anyhow!("配置文件不存在: {}", config_path.display()));
            }
        }

        // 5. 环境变量（前缀 MED_KEEPER_，分节用 __）
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let mut config: Config = builder.build()?.try_deserialize()?;

        // 6. 命令行覆盖
        if let Some(log_level) = cli.log_level {
            config.logging.level = log_level;
        }
        if let Some(today) = cli.today {
            config.clock.today = Some(today);
        }
        if let Some(threshold) = cli.low_stock_threshold {
            config.inventory.low_stock_threshold = threshold;
        }

        config.validate()?;

        Ok(config)
    }

    /// 系统配置文件路径
    pub fn get_system_config_path() -> Option<PathBuf> {
        Some(PathBuf::from("/etc/med-keeper/config.toml"))
    }

    /// 用户配置文件路径
    pub fn get_user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// 生成默认配置文件内容
    pub fn generate_default_config() -> Result<String> {
        let config = Config::default();
        toml::to_string_pretty(&config).map_err(|e| anyhow!("生成默认配置失败: {}", e))
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| anyhow!("序列化配置失败: {}", e))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        if self.consultation.reply_delay_ms > MAX_REPLY_DELAY_MS {
            return Err(anyhow!(
                "回复延迟不能超过 {} 毫秒: {}",
                MAX_REPLY_DELAY_MS,
                self.consultation.reply_delay_ms
            ));
        }

        if self.consultation.max_message_len == 0 {
            return Err(anyhow!("消息长度上限必须大于 0"));
        }

        if let Some(log_dir) = &self.logging.directory {
            if !log_dir.exists() {
                std::fs::create_dir_all(log_dir)?;
            }
        }

        Ok(())
    }

    /// 初始化日志系统
    ///
    /// 控制台日志写到 stderr，stdout 留给命令输出。配置了日志目录时
    /// 返回文件写入器的 guard，调用方需要持有到程序退出。
    pub fn init_logging(&self) -> Result<Option<WorkerGuard>> {
        let level_filter = EnvFilter::builder()
            .with_default_directive(Level::from(self.logging.level).into())
            .from_env_lossy();

        let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
        layers.push(match self.logging.format {
            LogFormat::Compact => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
            LogFormat::Full => fmt::layer().with_writer(std::io::stderr).boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        });

        let mut guard = None;
        if let Some(log_dir) = &self.logging.directory {
            std::fs::create_dir_all(log_dir)?;
            let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
            let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
            layers.push(match self.logging.format {
                LogFormat::Json => fmt::layer().json().with_writer(non_blocking).boxed(),
                _ => fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking)
                    .boxed(),
            });
            guard = Some(file_guard);
        }

        tracing_subscriber::registry()
            .with(layers)
            .with(level_filter)
            .try_init()?;

        tracing::info!("日志系统已初始化，级别: {:?}", self.logging.level);
        Ok(guard)
    }
}
