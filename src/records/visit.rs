//! 门诊历史

use super::{parse_date, parse_time, Record, RecordId};
use crate::error::HealthResult;
use crate::store::{Classified, ReadContext, Searchable};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// 一次已发生的就诊
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalVisit {
    pub id: RecordId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub doctor: String,
    pub department: String,
    pub hospital: String,
    pub diagnosis: String,
    /// 治疗方案，多行文本，每行一步
    pub treatment_plan: String,
    pub notes: Option<String>,
}

impl MedicalVisit {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<RecordId>,
        date: &str,
        time: &str,
        doctor: impl Into<String>,
        department: impl Into<String>,
        hospital: impl Into<String>,
        diagnosis: impl Into<String>,
        treatment_plan: impl Into<String>,
    ) -> HealthResult<Self> {
        Ok(Self {
            id: id.into(),
            date: parse_date(date)?,
            time: parse_time(time)?,
            doctor: doctor.into(),
            department: department.into(),
            hospital: hospital.into(),
            diagnosis: diagnosis.into(),
            treatment_plan: treatment_plan.into(),
            notes: None,
        })
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// 治疗方案的各个步骤（去掉空行）
    pub fn treatment_steps(&self) -> Vec<&str> {
        self.treatment_plan
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

impl Record for MedicalVisit {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Searchable for MedicalVisit {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.doctor.as_str(),
            self.department.as_str(),
            self.hospital.as_str(),
            self.diagnosis.as_str(),
        ]
    }
}

/// 门诊记录按科室分类筛选
impl Classified for MedicalVisit {
    type Status = String;

    fn status(&self, _ctx: &ReadContext) -> String {
        self.department.clone()
    }
}
