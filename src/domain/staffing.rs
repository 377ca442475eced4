// ==========================================
// 门店排班系统 - 每日人数目标配置
// ==========================================
// 每周恰好 7 条 (星期索引 0-6, 周日=0), 由配置层保证;
// 配置缺失或格式错误时回落到内置默认表。
// ==========================================

use crate::domain::types::{DemandLevel, ShiftKind, DAYS_PER_WEEK};
use serde::{Deserialize, Serialize};

// ==========================================
// DayStaffing - 单日人数目标
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStaffing {
    pub day: u8,             // 星期索引 (0=周日)
    pub opening: u32,        // 开店班人数目标
    pub closing: u32,        // 闭店班人数目标
    pub demand: DemandLevel, // 客流等级 (仅说明用)
}

impl DayStaffing {
    /// 指定班次的人数目标
    pub fn target(&self, shift: ShiftKind) -> u32 {
        match shift {
            ShiftKind::Opening => self.opening,
            ShiftKind::Closing => self.closing,
        }
    }

    /// 内置默认周目标表: 周日-周四 5/5 低客流, 周五-周六 7/7 高客流
    pub fn default_week() -> Vec<DayStaffing> {
        (0..DAYS_PER_WEEK as u8)
            .map(|day| {
                let (target, demand) = if day >= 5 {
                    (7, DemandLevel::High)
                } else {
                    (5, DemandLevel::Low)
                };
                DayStaffing {
                    day,
                    opening: target,
                    closing: target,
                    demand,
                }
            })
            .collect()
    }
}
