//! 配置集成测试
//!
//! 测试配置文件到存储、会话设置的传递

use anyhow::Result;
use clap::Parser;
use med_keeper::config::{Cli, Config};
use med_keeper::records::{parse_date, StockStatus};
use med_keeper::session::Theme;
use med_keeper::store::{Clock, HealthStore, StatusFilter, StoreSettings};
use med_keeper::{ConsultationSettings, SessionContext};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_config_flows_into_settings() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
[inventory]
low_stock_threshold = 6
expiry_warning_days = 60

[consultation]
reply_delay_ms = 250
max_message_len = 100

[clock]
today = "2025-10-22"

[session]
authenticated = false
theme = "dark"
"#,
    )?;

    let cli = Cli::parse_from(["med-keeper", "--config", config_path.to_str().unwrap_or_default()]);
    let config = Config::load_with_cli(&cli)?;

    let store_settings = StoreSettings::from(&config);
    assert_eq!(store_settings.low_stock_threshold, 6);
    assert_eq!(store_settings.expiry_warning_days, 60);
    assert_eq!(store_settings.clock, Clock::Fixed(parse_date("2025-10-22")?));

    let consultation = ConsultationSettings::from(&config);
    assert_eq!(consultation.reply_delay, Duration::from_millis(250));
    assert_eq!(consultation.max_message_len, 100);

    let session = SessionContext::from(&config.session);
    assert!(!session.authenticated);
    assert_eq!(session.theme, Theme::Dark);

    let store = HealthStore::with_sample_data(store_settings)?;
    let low = store.filter_inventory(&StatusFilter::Only(StockStatus::Low), "");
    assert_eq!(low.len(), 2);
    // 胃药 2025-12-15 过期，落在 60 天窗口内
    assert_eq!(store.expiring_soon().len(), 1);
    Ok(())
}

#[test]
fn test_invalid_reply_delay_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "[consultation]\nreply_delay_ms = 120000\n")?;

    let cli = Cli::parse_from(["med-keeper", "--config", config_path.to_str().unwrap_or_default()]);
    assert!(Config::load_with_cli(&cli).is_err());
    Ok(())
}
