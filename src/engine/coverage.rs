// ==========================================
// 门店排班系统 - 覆盖校验器
// ==========================================
// 职责: 事后比对槽位人数与每日目标, 输出缺员清单
// 红线: 缺员不是错误; 引擎静默容忍, 由本校验器暴露给上层
// ==========================================

use crate::domain::assignment::AssignmentRecord;
use crate::domain::staffing::DayStaffing;
use crate::domain::types::ShiftKind;
use crate::engine::grid::RosterGrid;
use serde::{Deserialize, Serialize};

// ==========================================
// CoverageGap - 单槽位缺员
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageGap {
    pub day: u8,          // 星期索引
    pub shift: ShiftKind, // 班次
    pub required: u32,    // 目标人数
    pub assigned: u32,    // 实际人数
}

impl CoverageGap {
    /// 缺员人数
    pub fn shortfall(&self) -> u32 {
        self.required.saturating_sub(self.assigned)
    }
}

// ==========================================
// CoverageReport - 覆盖校验报告
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoverageReport {
    pub gaps: Vec<CoverageGap>, // 缺员槽位 (日升序, 先开店后闭店)
}

impl CoverageReport {
    /// 是否全部槽位达标
    pub fn is_fully_covered(&self) -> bool {
        self.gaps.is_empty()
    }

    /// 缺员总人次
    pub fn total_shortfall(&self) -> u32 {
        self.gaps.iter().map(CoverageGap::shortfall).sum()
    }
}

// ==========================================
// CoverageValidator - 覆盖校验器
// ==========================================
pub struct CoverageValidator;

impl CoverageValidator {
    /// 校验内存网格
    pub fn check_grid(grid: &RosterGrid, staffing: &[DayStaffing]) -> CoverageReport {
        let mut gaps = Vec::new();

        for day_staffing in staffing {
            for shift in ShiftKind::ALL {
                let required = day_staffing.target(shift);
                let assigned = grid.count(day_staffing.day, shift);
                if assigned < required {
                    gaps.push(CoverageGap {
                        day: day_staffing.day,
                        shift,
                        required,
                        assigned,
                    });
                }
            }
        }

        CoverageReport { gaps }
    }

    /// 校验落库后的一周班次记录
    pub fn check_records(
        records: &[AssignmentRecord],
        staffing: &[DayStaffing],
    ) -> CoverageReport {
        let mut gaps = Vec::new();

        for day_staffing in staffing {
            for shift in ShiftKind::ALL {
                let required = day_staffing.target(shift);
                let assigned = records
                    .iter()
                    .filter(|r| r.day == day_staffing.day && r.shift == shift)
                    .count() as u32;
                if assigned < required {
                    gaps.push(CoverageGap {
                        day: day_staffing.day,
                        shift,
                        required,
                        assigned,
                    });
                }
            }
        }

        CoverageReport { gaps }
    }
}
