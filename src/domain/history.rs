// ==========================================
// 门店排班系统 - 排班生成历史领域模型
// ==========================================
// 红线: 历史记录只追加, 创建后不再修改
// 用途: 审计追踪, 生成时点的配置与工时快照
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::staffing::DayStaffing;

// ==========================================
// RosterHistory - 排班生成历史
// ==========================================
// 快照字段保存生成时点的状态: 后续对人数目标配置或班次记录的
// 修改不会回写历史; 工时快照即生成时的台账终值。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterHistory {
    pub history_id: String,           // 历史ID
    pub week_id: String,              // 周标识
    pub generated_at: NaiveDateTime,  // 生成时间
    pub generated_by: String,         // 生成人
    pub assignment_ids: Vec<String>,  // 本次生成的班次记录ID列表
    pub staffing_snapshot: Vec<DayStaffing>,     // 人数目标配置快照
    pub hours_snapshot: BTreeMap<String, i32>,   // 员工ID → 周工时快照
}
