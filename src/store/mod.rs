//! 健康记录存储
//!
//! 每个领域一个按插入顺序保存的集合，对外提供筛选、变更和派生读取。
//! 所有操作同步执行；有效变更会递增版本号，并在同一次调用内广播变更事件。

pub mod collection;
pub mod context;
pub mod filter;

pub use collection::Collection;
pub use context::{Clock, ReadContext};
pub use filter::{filter, Classified, Searchable, StatusFilter};

use crate::calendar;
use crate::config::Config;
use crate::records::{
    Checkup, CheckupStatus, HealthReading, InventoryItem, MedicalVisit, MedicationReminder,
    MetricKind, MetricSample, MetricSeries, RecordId, ReminderStatus, StockStatus,
};
use crate::stats::{
    self, CheckupStats, InventoryStats, MetricSummary, ProfileOverview, ReminderStats, VisitStats,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// 默认事件缓冲大小
const DEFAULT_EVENT_CAPACITY: usize = 64;

labeled_enum! {
    /// 集合类型
    pub enum CollectionKind {
        Reminders => ("reminders", "用药提醒"),
        Inventory => ("inventory", "药品库存"),
        Checkups => ("checkups", "复查"),
        Visits => ("visits", "门诊历史"),
        Readings => ("readings", "健康记录"),
    }
}

/// 变更类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum Change {
    Updated(RecordId),
    Removed(RecordId),
}

/// 变更事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEvent {
    /// 变更后的版本号
    pub revision: u64,
    pub collection: CollectionKind,
    pub change: Change,
}

/// 存储设置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreSettings {
    pub low_stock_threshold: u32,
    /// "即将过期"的天数窗口
    pub expiry_warning_days: u32,
    pub clock: Clock,
    pub event_capacity: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            low_stock_threshold: 5,
            expiry_warning_days: 30,
            clock: Clock::System,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl From<&Config> for StoreSettings {
    fn from(config: &Config) -> Self {
        Self {
            low_stock_threshold: config.inventory.low_stock_threshold,
            expiry_warning_days: config.inventory.expiry_warning_days,
            clock: Clock::from(config.clock.today),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// 初始记录
#[derive(Debug, Clone, Default)]
pub struct StoreRecords {
    pub reminders: Vec<MedicationReminder>,
    pub inventory: Vec<InventoryItem>,
    pub checkups: Vec<Checkup>,
    pub visits: Vec<MedicalVisit>,
    pub readings: Vec<HealthReading>,
    pub series: Vec<MetricSeries>,
}

/// 版本号与事件广播
#[derive(Debug)]
struct ChangeJournal {
    revision: u64,
    events: broadcast::Sender<StoreEvent>,
}

impl ChangeJournal {
    fn new(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            revision: 0,
            events,
        }
    }

    fn record(&mut self, collection: CollectionKind, change: Change) {
        self.revision += 1;
        let event = StoreEvent {
            revision: self.revision,
            collection,
            change,
        };
        tracing::debug!(
            revision = event.revision,
            collection = %collection,
            change = ?event.change,
            "记录已变更"
        );
        // 没有订阅者时发送失败，忽略即可
        let _ = self.events.send(event);
    }

    /// 根据变更结果记录事件或写一条空操作日志
    fn settle(
        &mut self,
        changed: bool,
        collection: CollectionKind,
        change: Change,
        operation: &'static str,
    ) -> bool {
        if changed {
            self.record(collection, change);
        } else {
            tracing::trace!(collection = %collection, operation, change = ?change, "空操作");
        }
        changed
    }
}

/// 健康记录存储
#[derive(Debug)]
pub struct HealthStore {
    reminders: Collection<MedicationReminder>,
    inventory: Collection<InventoryItem>,
    checkups: Collection<Checkup>,
    visits: Collection<MedicalVisit>,
    readings: Collection<HealthReading>,
    series: Vec<MetricSeries>,
    settings: StoreSettings,
    journal: ChangeJournal,
}

impl Default for HealthStore {
    fn default() -> Self {
        Self::new(StoreSettings::default())
    }
}

impl HealthStore {
    /// 创建空存储
    pub fn new(settings: StoreSettings) -> Self {
        Self::from_records(settings, StoreRecords::default())
    }

    /// 用初始记录创建存储
    pub fn from_records(settings: StoreSettings, records: StoreRecords) -> Self {
        let store = Self {
            reminders: records.reminders.into(),
            inventory: records.inventory.into(),
            checkups: records.checkups.into(),
            visits: records.visits.into(),
            readings: records.readings.into(),
            series: records.series,
            settings,
            journal: ChangeJournal::new(settings.event_capacity),
        };
        tracing::info!(
            reminders = store.reminders.len(),
            inventory = store.inventory.len(),
            checkups = store.checkups.len(),
            visits = store.visits.len(),
            readings = store.readings.len(),
            "健康记录存储已初始化"
        );
        store
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    pub fn read_context(&self) -> ReadContext {
        ReadContext {
            today: self.settings.clock.today(),
            low_stock_threshold: self.settings.low_stock_threshold,
        }
    }

    /// 当前版本号，每次有效变更加一
    pub fn revision(&self) -> u64 {
        self.journal.revision
    }

    /// 订阅变更事件
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.journal.events.subscribe()
    }

    // ===== 快照 =====

    pub fn reminders(&self) -> &[MedicationReminder] {
        self.reminders.items()
    }

    pub fn inventory(&self) -> &[InventoryItem] {
        self.inventory.items()
    }

    pub fn checkups(&self) -> &[Checkup] {
        self.checkups.items()
    }

    pub fn visits(&self) -> &[MedicalVisit] {
        self.visits.items()
    }

    pub fn readings(&self) -> &[HealthReading] {
        self.readings.items()
    }

    // ===== 筛选 =====

    pub fn filter_reminders(
        &self,
        status: &StatusFilter<ReminderStatus>,
        search: &str,
    ) -> Vec<MedicationReminder> {
        filter(self.reminders(), status, search, &self.read_context())
    }

    pub fn filter_inventory(
        &self,
        status: &StatusFilter<StockStatus>,
        search: &str,
    ) -> Vec<InventoryItem> {
        filter(self.inventory(), status, search, &self.read_context())
    }

    pub fn filter_checkups(
        &self,
        status: &StatusFilter<CheckupStatus>,
        search: &str,
    ) -> Vec<Checkup> {
        filter(self.checkups(), status, search, &self.read_context())
    }

    /// 把界面传入的科室解析为筛选条件
    ///
    /// 与状态筛选一致：空串、"all" 以及没有出现过的科室都按"全部"处理。
    pub fn department_filter(&self, raw: &str) -> StatusFilter<String> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(filter::ALL) {
            return StatusFilter::All;
        }
        match self.departments().into_iter().find(|d| d == raw) {
            Some(department) => StatusFilter::Only(department),
            None => {
                tracing::debug!(filter = raw, "未知的状态筛选值，按全部处理");
                StatusFilter::All
            }
        }
    }

    /// 门诊记录按科室筛选
    pub fn filter_visits(&self, department: &StatusFilter<String>, search: &str) -> Vec<MedicalVisit> {
        filter(self.visits(), department, search, &self.read_context())
    }

    pub fn filter_readings(&self, kind: &StatusFilter<MetricKind>, search: &str) -> Vec<HealthReading> {
        filter(self.readings(), kind, search, &self.read_context())
    }

    // ===== 变更 =====

    /// 标记为已服用；只对待服用的提醒生效
    pub fn mark_taken(&mut self, id: &RecordId) -> bool {
        self.transition_reminder(id, ReminderStatus::Taken, "mark_taken")
    }

    /// 标记为已错过（由系统触发）；只对待服用的提醒生效
    pub fn mark_missed(&mut self, id: &RecordId) -> bool {
        self.transition_reminder(id, ReminderStatus::Missed, "mark_missed")
    }

    fn transition_reminder(
        &mut self,
        id: &RecordId,
        to: ReminderStatus,
        operation: &'static str,
    ) -> bool {
        let changed = self.reminders.replace_with(id, |r| r.transition(to));
        self.journal.settle(
            changed,
            CollectionKind::Reminders,
            Change::Updated(id.clone()),
            operation,
        )
    }

    /// 标记复查为已完成
    pub fn mark_completed(&mut self, id: &RecordId) -> bool {
        let changed = self.checkups.replace_with(id, Checkup::completed);
        self.journal.settle(
            changed,
            CollectionKind::Checkups,
            Change::Updated(id.clone()),
            "mark_completed",
        )
    }

    /// 切换复查提醒开关
    pub fn toggle_reminder(&mut self, id: &RecordId) -> bool {
        let changed = self
            .checkups
            .replace_with(id, |c| Some(c.with_reminder_toggled()));
        self.journal.settle(
            changed,
            CollectionKind::Checkups,
            Change::Updated(id.clone()),
            "toggle_reminder",
        )
    }

    /// 调整库存数量，结果不低于 0；数量不变时视为空操作
    pub fn adjust_quantity(&mut self, id: &RecordId, delta: i64) -> bool {
        let changed = self.inventory.replace_with(id, |item| {
            let adjusted = item.adjusted(delta);
            (adjusted.quantity != item.quantity).then_some(adjusted)
        });
        self.journal.settle(
            changed,
            CollectionKind::Inventory,
            Change::Updated(id.clone()),
            "adjust_quantity",
        )
    }

    /// 编辑门诊记录，保持标识和位置
    pub fn update_visit<F>(&mut self, id: &RecordId, edit: F) -> bool
    where
        F: FnOnce(&mut MedicalVisit),
    {
        let changed = self.visits.replace_with(id, |visit| {
            let mut edited = visit.clone();
            edit(&mut edited);
            edited.id = visit.id.clone();
            (edited != *visit).then_some(edited)
        });
        self.journal.settle(
            changed,
            CollectionKind::Visits,
            Change::Updated(id.clone()),
            "update_visit",
        )
    }

    /// 按标识删除记录
    ///
    /// 删除前的确认由调用方负责，这里无条件删除；标识不存在时为空操作。
    pub fn delete(&mut self, collection: CollectionKind, id: &RecordId) -> bool {
        let removed = match collection {
            CollectionKind::Reminders => self.reminders.remove(id).is_some(),
            CollectionKind::Inventory => self.inventory.remove(id).is_some(),
            CollectionKind::Checkups => self.checkups.remove(id).is_some(),
            CollectionKind::Visits => self.visits.remove(id).is_some(),
            CollectionKind::Readings => self.readings.remove(id).is_some(),
        };
        self.journal
            .settle(removed, collection, Change::Removed(id.clone()), "delete")
    }

    // ===== 派生读取 =====

    /// 库存状态（读取时计算）
    pub fn stock_status(&self, item: &InventoryItem) -> StockStatus {
        item.stock_status(&self.read_context())
    }

    /// 未过期且将在 `days` 天内过期的药品
    pub fn expiring_within(&self, days: u32) -> Vec<InventoryItem> {
        let today = self.read_context().today;
        self.inventory
            .iter()
            .filter(|item| {
                let left = item.days_until_expiry(today);
                (0..=i64::from(days)).contains(&left)
            })
            .cloned()
            .collect()
    }

    /// 使用配置窗口的即将过期药品
    pub fn expiring_soon(&self) -> Vec<InventoryItem> {
        self.expiring_within(self.settings.expiry_warning_days)
    }

    /// 最近一次即将到来的复查
    pub fn next_upcoming_checkup(&self) -> Option<&Checkup> {
        self.checkups
            .iter()
            .filter(|c| c.status == CheckupStatus::Upcoming)
            .min_by_key(|c| c.scheduled_at())
    }

    /// 指定日期的用药提醒
    pub fn reminders_on(&self, date: NaiveDate) -> Vec<&MedicationReminder> {
        calendar::reminders_on(self.reminders(), date)
    }

    /// 有用药提醒的日期（升序）
    pub fn dates_with_reminders(&self) -> Vec<NaiveDate> {
        calendar::dates_with_reminders(self.reminders())
    }

    /// 出现过的科室（首次出现顺序）
    pub fn departments(&self) -> Vec<String> {
        stats::count_by(self.visits(), |v| v.department.clone())
            .into_iter()
            .map(|(department, _)| department)
            .collect()
    }

    /// 指标的图表序列；没有序列的指标返回空
    pub fn series(&self, kind: MetricKind) -> &[MetricSample] {
        self.series
            .iter()
            .find(|s| s.kind == kind)
            .map(MetricSeries::samples)
            .unwrap_or_default()
    }

    pub fn metric_series(&self, kind: MetricKind) -> Option<&MetricSeries> {
        self.series.iter().find(|s| s.kind == kind)
    }

    /// 测量记录，最新的在前
    pub fn readings_newest_first(&self) -> Vec<&HealthReading> {
        let mut readings: Vec<_> = self.readings.iter().collect();
        readings.sort_by(|a, b| b.measured_at().cmp(&a.measured_at()));
        readings
    }

    pub fn reminder_stats(&self) -> ReminderStats {
        stats::reminder_stats(self.reminders())
    }

    pub fn inventory_stats(&self) -> InventoryStats {
        stats::inventory_stats(self.inventory(), &self.read_context())
    }

    pub fn checkup_stats(&self) -> CheckupStats {
        stats::checkup_stats(self.checkups())
    }

    pub fn visit_stats(&self) -> VisitStats {
        stats::visit_stats(self.visits())
    }

    pub fn metric_summaries(&self) -> Vec<MetricSummary> {
        stats::metric_summaries(self.readings(), &self.series)
    }

    pub fn profile_overview(&self) -> ProfileOverview {
        stats::profile_overview(
            self.reminders(),
            self.checkups(),
            self.visits(),
            self.inventory(),
        )
    }

    /// 按标识查找，任意集合
    pub fn contains(&self, collection: CollectionKind, id: &RecordId) -> bool {
        match collection {
            CollectionKind::Reminders => self.reminders.contains(id),
            CollectionKind::Inventory => self.inventory.contains(id),
            CollectionKind::Checkups => self.checkups.contains(id),
            CollectionKind::Visits => self.visits.contains(id),
            CollectionKind::Readings => self.readings.contains(id),
        }
    }

    pub fn reminder(&self, id: &RecordId) -> Option<&MedicationReminder> {
        self.reminders.get(id)
    }

    pub fn inventory_item(&self, id: &RecordId) -> Option<&InventoryItem> {
        self.inventory.get(id)
    }

    pub fn checkup(&self, id: &RecordId) -> Option<&Checkup> {
        self.checkups.get(id)
    }

    pub fn visit(&self, id: &RecordId) -> Option<&MedicalVisit> {
        self.visits.get(id)
    }
}
