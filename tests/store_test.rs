//! 存储集成测试
//!
//! 基于示例数据测试筛选、状态迁移、派生读取和变更通知

use anyhow::Result;
use med_keeper::records::{
    parse_date, CheckupStatus, MetricKind, ReminderStatus, ReminderToggle, StockStatus,
};
use med_keeper::store::{Change, Clock, CollectionKind, HealthStore, StatusFilter, StoreSettings};
use med_keeper::RecordId;

/// 固定在 2025-10-22 的示例存储
fn sample_store() -> Result<HealthStore> {
    Ok(HealthStore::with_sample_data(StoreSettings {
        clock: Clock::Fixed(parse_date("2025-10-22")?),
        ..StoreSettings::default()
    })?)
}

fn ids<T>(items: &[T], id: impl Fn(&T) -> &RecordId) -> Vec<String> {
    items.iter().map(|item| id(item).to_string()).collect()
}

#[test]
fn test_all_filter_returns_every_record_in_order() -> Result<()> {
    let store = sample_store()?;

    let reminders = store.filter_reminders(&StatusFilter::All, "");
    assert_eq!(reminders, store.reminders());

    let checkups = store.filter_checkups(&StatusFilter::parse("all"), "");
    assert_eq!(checkups, store.checkups());

    let visits = store.filter_visits(&StatusFilter::parse(""), "");
    assert_eq!(visits, store.visits());
    Ok(())
}

#[test]
fn test_filter_is_idempotent_and_pure() -> Result<()> {
    let store = sample_store()?;
    let status = StatusFilter::Only(ReminderStatus::Pending);

    let first = store.filter_reminders(&status, "药");
    let second = store.filter_reminders(&status, "药");
    assert_eq!(first, second);
    assert_eq!(ids(&first, |r| &r.id), vec!["3", "4", "5"]);
    assert_eq!(store.revision(), 0);
    Ok(())
}

#[test]
fn test_status_and_search_combine() -> Result<()> {
    let store = sample_store()?;

    let missed = store.filter_reminders(&StatusFilter::parse("MISSED"), "");
    assert_eq!(ids(&missed, |r| &r.id), vec!["7"]);

    // 备注也参与搜索
    let by_note = store.filter_reminders(&StatusFilter::All, "随餐");
    assert_eq!(ids(&by_note, |r| &r.id), vec!["1"]);

    let upcoming_eye = store.filter_checkups(&StatusFilter::Only(CheckupStatus::Upcoming), "眼科");
    assert_eq!(ids(&upcoming_eye, |c| &c.id), vec!["2"]);

    let none = store.filter_checkups(&StatusFilter::Only(CheckupStatus::Completed), "眼科");
    assert!(none.is_empty());
    Ok(())
}

#[test]
fn test_unknown_status_means_all() -> Result<()> {
    let store = sample_store()?;
    let all = store.filter_inventory(&StatusFilter::parse("soon"), "");
    assert_eq!(all.len(), 5);
    Ok(())
}

#[test]
fn test_department_filter() -> Result<()> {
    let store = sample_store()?;

    let internal = store.filter_visits(&store.department_filter("内科"), "");
    assert_eq!(ids(&internal, |v| &v.id), vec!["1"]);

    // 没有出现过的科室按全部处理
    let unknown = store.filter_visits(&store.department_filter("皮肤科"), "");
    assert_eq!(unknown.len(), 4);
    assert_eq!(unknown, store.visits());

    let unknown_with_search = store.filter_visits(&store.department_filter("皮肤科"), "近视");
    assert_eq!(ids(&unknown_with_search, |v| &v.id), vec!["2"]);
    Ok(())
}

#[test]
fn test_inventory_status_derived_from_today_and_threshold() -> Result<()> {
    let store = sample_store()?;
    let expired = store.filter_inventory(&StatusFilter::Only(StockStatus::Expired), "");
    assert_eq!(ids(&expired, |i| &i.id), vec!["4"]);

    // 阈值调高后钙片也算不足
    let strict = HealthStore::with_sample_data(StoreSettings {
        clock: Clock::Fixed(parse_date("2025-10-22")?),
        low_stock_threshold: 6,
        ..StoreSettings::default()
    })?;
    let low = strict.filter_inventory(&StatusFilter::Only(StockStatus::Low), "");
    assert_eq!(ids(&low, |i| &i.id), vec!["2", "5"]);

    // 时间推进后胃药过期
    let later = HealthStore::with_sample_data(StoreSettings {
        clock: Clock::Fixed(parse_date("2025-12-16")?),
        ..StoreSettings::default()
    })?;
    let expired = later.filter_inventory(&StatusFilter::Only(StockStatus::Expired), "");
    assert_eq!(ids(&expired, |i| &i.id), vec!["3", "4"]);
    Ok(())
}

#[test]
fn test_reminder_transitions() -> Result<()> {
    let mut store = sample_store()?;

    assert!(store.mark_taken(&RecordId::from("1")));
    assert!(store.mark_missed(&RecordId::from("2")));
    // 已结束的提醒不再迁移
    assert!(!store.mark_taken(&RecordId::from("7")));
    assert!(!store.mark_missed(&RecordId::from("6")));

    let stats = store.reminder_stats();
    assert_eq!((stats.pending, stats.taken, stats.missed), (3, 2, 2));
    assert_eq!(store.revision(), 2);
    Ok(())
}

#[test]
fn test_checkup_mutations() -> Result<()> {
    let mut store = sample_store()?;
    let missed = RecordId::from("4");

    assert!(store.mark_completed(&missed));
    assert_eq!(store.checkup(&missed).map(|c| c.status), Some(CheckupStatus::Completed));
    assert!(!store.mark_completed(&missed));

    assert!(store.toggle_reminder(&RecordId::from("1")));
    assert_eq!(
        store.checkup(&RecordId::from("1")).map(|c| c.reminder),
        Some(ReminderToggle::Disabled)
    );
    assert_eq!(store.checkup_stats().reminders_enabled, 0);
    Ok(())
}

#[test]
fn test_delete_and_events() -> Result<()> {
    let mut store = sample_store()?;
    let mut events = store.subscribe();
    let id = RecordId::from("2");

    assert!(store.delete(CollectionKind::Visits, &id));
    assert!(!store.contains(CollectionKind::Visits, &id));
    assert!(!store.delete(CollectionKind::Visits, &id));
    assert_eq!(store.departments(), vec!["内科", "骨科", "口腔科"]);

    let event = events.try_recv()?;
    assert_eq!(event.revision, 1);
    assert_eq!(event.collection, CollectionKind::Visits);
    assert_eq!(event.change, Change::Removed(id));
    assert!(events.try_recv().is_err());
    Ok(())
}

#[test]
fn test_update_visit_keeps_identity_and_position() -> Result<()> {
    let mut store = sample_store()?;
    let id = RecordId::from("3");

    assert!(store.update_visit(&id, |visit| {
        visit.id = RecordId::from("changed");
        visit.notes = Some("复诊后好转".to_string());
    }));
    assert_eq!(store.visits()[2].id, id);
    assert_eq!(store.visits()[2].notes.as_deref(), Some("复诊后好转"));

    // 没有改动视为空操作
    assert!(!store.update_visit(&id, |_| {}));
    assert_eq!(store.revision(), 1);
    Ok(())
}

#[test]
fn test_calendar_and_metrics_reads() -> Result<()> {
    let store = sample_store()?;

    let day = parse_date("2025-10-22")?;
    let names: Vec<_> = store.reminders_on(day).iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["维生素C", "钙片", "胃药"]);
    assert_eq!(store.dates_with_reminders().len(), 4);

    let newest = store.readings_newest_first();
    assert_eq!(newest.last().map(|r| r.id.as_str()), Some("5"));
    assert_eq!(
        store.filter_readings(&StatusFilter::Only(MetricKind::BloodPressure), "").len(),
        2
    );
    assert!(store.series(MetricKind::BodyTemp).is_empty());

    let overview = store.profile_overview();
    assert_eq!(overview.medication_reminders, 5);
    assert_eq!(overview.upcoming_checkups, 2);
    assert_eq!(overview.completed_visits, 4);
    assert_eq!(overview.inventory_items, 5);
    Ok(())
}
