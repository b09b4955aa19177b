use anyhow::{anyhow, Result};
use chrono::Datelike;
use clap::Parser;
use med_keeper::calendar;
use med_keeper::config::{Cli, Commands, Config};
use med_keeper::consultation::{replies, ConsultationSession, ConsultationSettings};
use med_keeper::records::MetricKind;
use med_keeper::report;
use med_keeper::session::SessionContext;
use med_keeper::store::{HealthStore, StatusFilter, StoreSettings};
use serde::Serialize;
use std::time::Duration;

/// 等待回复时在配置延迟之外额外等待的时间
const REPLY_GRACE: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load_with_cli(&cli)?;

    // 初始化日志系统，guard 持有到退出
    let _log_guard = config.init_logging()?;

    tracing::info!("Med Keeper 启动");

    let command = cli.command.clone().unwrap_or(Commands::Overview);
    handle_command(command, &config, cli.json).await
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

async fn handle_command(command: Commands, config: &Config, json: bool) -> Result<()> {
    let store = HealthStore::with_sample_data(StoreSettings::from(config))?;

    match command {
        Commands::Overview => {
            let session = SessionContext::from(&config.session);
            let value = serde_json::json!({
                "today": store.read_context().today,
                "profile": store.profile_overview(),
                "reminders": store.reminder_stats(),
                "inventory": store.inventory_stats(),
                "checkups": store.checkup_stats(),
                "visits": store.visit_stats(),
                "nextCheckup": store.next_upcoming_checkup(),
                "metrics": store.metric_summaries(),
            });
            emit(json, &value, || report::overview(&store, &session))?;
        }
        Commands::Reminders {
            date,
            status,
            search,
        } => {
            let mut reminders = store.filter_reminders(&StatusFilter::parse(&status), &search);
            if let Some(date) = date {
                reminders.retain(|r| r.date == date);
            }
            emit(json, &reminders, || report::reminders(&reminders))?;
        }
        Commands::Calendar { month } => {
            let (year, month) = match month {
                Some(month) => calendar::parse_month(&month)?,
                None => {
                    let today = store.read_context().today;
                    (today.year(), today.month())
                }
            };
            let days = calendar::month_grid(year, month)?;
            let marked = store.dates_with_reminders();
            let value = serde_json::json!({ "days": days, "datesWithReminders": marked });
            let text = report::calendar(&store, year, month)?;
            emit(json, &value, || text)?;
        }
        Commands::Inventory {
            status,
            search,
            expiring,
        } => {
            let mut items = store.filter_inventory(&StatusFilter::parse(&status), &search);
            if expiring {
                let soon = store.expiring_soon();
                items.retain(|item| soon.iter().any(|s| s.id == item.id));
            }
            emit(json, &items, || report::inventory(&store, &items))?;
        }
        Commands::Checkups { status, search } => {
            let checkups = store.filter_checkups(&StatusFilter::parse(&status), &search);
            let today = store.read_context().today;
            let cards = report::checkup_cards(&checkups, today);
            emit(json, &cards, || report::checkups(&checkups, today))?;
        }
        Commands::Visits { department, search } => {
            let visits = store.filter_visits(&store.department_filter(&department), &search);
            emit(json, &visits, || report::visits(&visits))?;
        }
        Commands::Metrics { kind } => {
            let kind = kind.map(|k| k.parse::<MetricKind>()).transpose()?;
            let wanted = |k: MetricKind| kind.map_or(true, |only| only == k);
            let summaries: Vec<_> = store
                .metric_summaries()
                .into_iter()
                .filter(|s| wanted(s.kind))
                .collect();
            let series: Vec<_> = MetricKind::ALL
                .iter()
                .copied()
                .filter(|k| wanted(*k))
                .filter_map(|k| store.metric_series(k))
                .collect();
            let value = serde_json::json!({ "summaries": summaries, "series": series });
            emit(json, &value, || report::metrics(&store, kind))?;
        }
        Commands::Ask { question } => {
            let settings = ConsultationSettings::from(config);
            let session = ConsultationSession::new(settings);
            if session.send(&question)?.is_none() {
                return Err(anyhow!("问题不能为空"));
            }
            tokio::time::timeout(
                settings.reply_delay + REPLY_GRACE,
                session.wait_for_replies(),
            )
            .await
            .map_err(|_| anyhow!("等待回复超时"))?;
            let messages = session.messages();
            session.close();
            emit(json, &messages, || report::conversation(&messages))?;
        }
        Commands::Questions => {
            let questions = replies::PREDEFINED_QUESTIONS;
            emit(json, &questions, || {
                questions
                    .iter()
                    .enumerate()
                    .map(|(i, q)| format!("{}. {q}", i + 1))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        Commands::PrintConfig => {
            println!("{}", toml::to_string_pretty(config)?);
        }
        Commands::ResetConfig => {
            let default_config = Config::default();
            if let Some(config_path) = Config::get_user_config_path() {
                default_config.save_to_file(&config_path)?;
                println!("配置已重置到: {}", config_path.display());
            } else {
                println!("无法确定配置文件路径");
            }
        }
    }

    Ok(())
}
