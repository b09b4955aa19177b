//! 文本输出
//!
//! 把存储的读取结果渲染成终端文本，供命令行使用。

use crate::calendar;
use crate::consultation::ChatMessage;
use crate::error::HealthResult;
use crate::records::{
    format_time, Checkup, HealthReading, InventoryItem, MedicalVisit, MedicationReminder,
    MetricKind,
};
use crate::session::SessionContext;
use crate::store::HealthStore;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

fn notes_suffix(notes: &Option<String>) -> String {
    notes
        .as_deref()
        .map(|n| format!("  （{n}）"))
        .unwrap_or_default()
}

pub fn overview(store: &HealthStore, session: &SessionContext) -> String {
    let profile = store.profile_overview();
    let reminders = store.reminder_stats();
    let inventory = store.inventory_stats();
    let checkups = store.checkup_stats();
    let visits = store.visit_stats();

    let mut lines = vec![
        format!(
            "{}  {} 岁  {}  [{}]",
            session.profile.name,
            session.profile.age,
            session.profile.gender,
            if session.authenticated { "已登录" } else { "未登录" }
        ),
        format!("今天: {}", store.read_context().today),
        String::new(),
        format!(
            "用药提醒 {}  即将复查 {}  门诊记录 {}  药品库存 {}",
            profile.medication_reminders,
            profile.upcoming_checkups,
            profile.completed_visits,
            profile.inventory_items
        ),
        format!(
            "提醒: 共 {} / 待服用 {} / 已服用 {} / 已错过 {}",
            reminders.total, reminders.pending, reminders.taken, reminders.missed
        ),
    ];
    if let Some(adherence) = reminders.adherence() {
        lines.push(format!("依从率: {:.0}%", adherence * 100.0));
    }
    lines.push(format!(
        "库存: 共 {} / 充足 {} / 不足 {} / 已过期 {}",
        inventory.total, inventory.normal, inventory.low, inventory.expired
    ));
    lines.push(format!(
        "复查: 共 {} / 即将到来 {} / 已完成 {} / 已错过 {} / 开启提醒 {}",
        checkups.total,
        checkups.upcoming,
        checkups.completed,
        checkups.missed,
        checkups.reminders_enabled
    ));
    lines.push(format!(
        "门诊: 共 {} / 科室 {}",
        visits.total, visits.departments
    ));
    if let Some(next) = store.next_upcoming_checkup() {
        lines.push(format!(
            "下次复查: {} {} {} {}（{}）",
            next.date,
            format_time(&next.time),
            next.hospital,
            next.department,
            next.purpose
        ));
    }
    lines.join("\n")
}

pub fn reminders(reminders: &[MedicationReminder]) -> String {
    if reminders.is_empty() {
        return "没有符合条件的用药提醒".to_string();
    }
    reminders
        .iter()
        .map(|r| {
            format!(
                "[{}] {} {} {} {}  {}{}",
                r.id,
                r.date,
                format_time(&r.time),
                r.name,
                r.dosage,
                r.status.label(),
                notes_suffix(&r.notes)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 月视图，有提醒的日期用 `*` 标出，非本月日期加括号
pub fn calendar(store: &HealthStore, year: i32, month: u32) -> HealthResult<String> {
    let grid = calendar::month_grid(year, month)?;
    let marked: BTreeSet<_> = store.dates_with_reminders().into_iter().collect();
    let today = store.read_context().today;

    let mut lines = vec![
        format!("{year} 年 {month} 月"),
        "  日    一    二    三    四    五    六".to_string(),
    ];
    for week in grid.chunks(7) {
        let cells: Vec<String> = week
            .iter()
            .map(|day| {
                let mark = if marked.contains(day) {
                    '*'
                } else if *day == today {
                    '<'
                } else {
                    ' '
                };
                if day.month() == month {
                    format!(" {:>2}{mark} ", day.day())
                } else {
                    format!("({:>2}){mark}", day.day())
                }
            })
            .collect();
        lines.push(cells.join(" "));
    }
    Ok(lines.join("\n"))
}

pub fn inventory(store: &HealthStore, items: &[InventoryItem]) -> String {
    if items.is_empty() {
        return "没有符合条件的药品".to_string();
    }
    let today = store.read_context().today;
    items
        .iter()
        .map(|item| {
            format!(
                "[{}] {} {} {}  {}{}  有效期至 {}（{} 天）  {}{}",
                item.id,
                item.name,
                item.dosage_form,
                item.dosage,
                item.quantity,
                item.unit,
                item.expiry_date,
                item.days_until_expiry(today),
                store.stock_status(item).label(),
                notes_suffix(&item.notes)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 带倒计时的复查，用于 JSON 输出
#[derive(Debug, Serialize)]
pub struct CheckupCard<'a> {
    #[serde(flatten)]
    pub checkup: &'a Checkup,
    pub days_until: Option<i64>,
    pub urgent: bool,
}

pub fn checkup_cards(checkups: &[Checkup], today: NaiveDate) -> Vec<CheckupCard<'_>> {
    checkups
        .iter()
        .map(|checkup| CheckupCard {
            checkup,
            days_until: checkup.days_until(today),
            urgent: checkup.is_urgent(today),
        })
        .collect()
}

pub fn checkups(checkups: &[Checkup], today: NaiveDate) -> String {
    if checkups.is_empty() {
        return "没有符合条件的复查".to_string();
    }
    checkups
        .iter()
        .map(|c| {
            let countdown = match c.countdown(today) {
                Some(label) if c.is_urgent(today) => format!("  {label}【紧急】"),
                Some(label) => format!("  {label}"),
                None => String::new(),
            };
            format!(
                "[{}] {} {} {} {} {}  {}  {} / {}{}{}",
                c.id,
                c.date,
                format_time(&c.time),
                c.hospital,
                c.department,
                c.doctor,
                c.purpose,
                c.status.label(),
                c.reminder.label(),
                countdown,
                notes_suffix(&c.notes)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn visits(visits: &[MedicalVisit]) -> String {
    if visits.is_empty() {
        return "没有符合条件的门诊记录".to_string();
    }
    let mut lines = Vec::new();
    for v in visits {
        lines.push(format!(
            "[{}] {} {} {} {} {}  诊断: {}{}",
            v.id,
            v.date,
            format_time(&v.time),
            v.hospital,
            v.department,
            v.doctor,
            v.diagnosis,
            notes_suffix(&v.notes)
        ));
        lines.extend(v.treatment_steps().into_iter().map(|step| format!("    {step}")));
    }
    lines.join("\n")
}

/// 指标卡片、序列和测量记录；`kind` 为空时显示全部指标
pub fn metrics(store: &HealthStore, kind: Option<MetricKind>) -> String {
    let wanted = |k: MetricKind| kind.map_or(true, |only| only == k);
    let mut lines = Vec::new();

    for summary in store.metric_summaries().into_iter().filter(|s| wanted(s.kind)) {
        lines.push(format!(
            "{}: {} {}  趋势 {}",
            summary.kind.label(),
            summary.value,
            summary.unit,
            summary.trend.label()
        ));
        let samples = store.series(summary.kind);
        if !samples.is_empty() {
            let points: Vec<_> = samples
                .iter()
                .map(|s| format!("{} {}", s.label, s.value))
                .collect();
            lines.push(format!("    {}", points.join(", ")));
        }
    }

    let readings: Vec<&HealthReading> = store
        .readings_newest_first()
        .into_iter()
        .filter(|r| wanted(r.kind))
        .collect();
    if !readings.is_empty() {
        lines.push(String::new());
        lines.push("测量记录:".to_string());
        lines.extend(readings.iter().map(|r| {
            format!(
                "[{}] {} {} {} {} {}{}",
                r.id,
                r.date,
                format_time(&r.time),
                r.kind.label(),
                r.value,
                r.unit,
                notes_suffix(&r.notes)
            )
        }));
    }

    if lines.is_empty() {
        return "没有指标数据".to_string();
    }
    lines.join("\n")
}

pub fn conversation(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| {
            let category = m
                .category
                .map(|c| format!("[{}] ", c.label()))
                .unwrap_or_default();
            format!("{}: {category}{}", m.speaker.label(), m.text)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::parse_date;
    use crate::store::{Clock, StoreSettings};

    fn store() -> HealthStore {
        HealthStore::with_sample_data(StoreSettings {
            clock: Clock::Fixed(parse_date("2025-10-22").unwrap()),
            ..StoreSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_overview_mentions_next_checkup() {
        let text = overview(&store(), &SessionContext::default());
        assert!(text.contains("张先生"));
        assert!(text.contains("用药提醒 5"));
        assert!(text.contains("下次复查: 2025-10-25"));
    }

    #[test]
    fn test_calendar_marks_reminder_days() {
        let text = calendar(&store(), 2025, 10).unwrap();
        assert_eq!(text.lines().count(), 8);
        assert!(text.contains(" 22* "));
        assert!(text.contains("(28) "));
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(reminders(&[]), "没有符合条件的用药提醒");
        assert_eq!(visits(&[]), "没有符合条件的门诊记录");
    }

    #[test]
    fn test_metrics_for_single_kind() {
        let text = metrics(&store(), Some(MetricKind::BodyTemp));
        assert!(text.contains("体温: 36.5 °C"));
        assert!(!text.contains("血压"));
    }

    #[test]
    fn test_checkups_show_countdown() {
        let store = store();
        let today = store.read_context().today;
        let text = checkups(store.checkups(), today);
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].ends_with("6天后  （记得带上之前的检查报告）"));
        assert!(lines[1].ends_with("3天后【紧急】"));
        assert!(!lines[2].contains("天后"));

        let cards = checkup_cards(store.checkups(), today);
        let value = serde_json::to_value(&cards).unwrap();
        assert_eq!(value[1]["id"], "2");
        assert_eq!(value[1]["days_until"], 3);
        assert_eq!(value[1]["urgent"], true);
        assert!(value[2]["days_until"].is_null());
        assert_eq!(value[2]["urgent"], false);
    }
}
