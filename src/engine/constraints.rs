// ==========================================
// 门店排班系统 - 排班约束判定
// ==========================================
// 红线: 纯查询, 无副作用; 台账登记与网格写入只发生在
// PhaseScheduler 确认落位之后。
// ==========================================

use crate::domain::types::ShiftKind;
use crate::domain::worker::Worker;
use crate::engine::grid::RosterGrid;
use crate::engine::ledger::HourLedger;

// ==========================================
// ConstraintEvaluator - 约束判定器
// ==========================================
pub struct ConstraintEvaluator;

impl ConstraintEvaluator {
    /// 员工能否排入指定槽位 (以个人合同周时数为上限)
    ///
    /// 判定: 当日非休息日 + 未在该槽位 + 加上班次工时不超上限
    pub fn is_available(
        grid: &RosterGrid,
        ledger: &HourLedger,
        worker: &Worker,
        day: u8,
        shift: ShiftKind,
    ) -> bool {
        Self::is_available_within(grid, ledger, worker, day, shift, worker.weekly_hours)
    }

    /// 员工能否排入指定槽位 (以指定工时上限判定)
    ///
    /// 全职基础班表阶段用 54 小时组织上限, 兼职阶段用 26 小时,
    /// 其余场合用个人合同周时数; 三个上限是有意区分的口径。
    pub fn is_available_within(
        grid: &RosterGrid,
        ledger: &HourLedger,
        worker: &Worker,
        day: u8,
        shift: ShiftKind,
        cap_hours: i32,
    ) -> bool {
        if worker.has_day_off(day) {
            return false;
        }
        if grid.has_worker(day, shift, &worker.worker_id) {
            return false;
        }
        ledger.hours_of(&worker.worker_id) + shift.hours() <= cap_hours
    }

    /// 员工是否持有指定角色 (主/副/第三岗位任一)
    pub fn has_role(worker: &Worker, role_id: &str) -> bool {
        worker.holds_role(role_id)
    }

    /// 指定槽位是否已有该角色的班次
    pub fn role_already_covered(
        grid: &RosterGrid,
        day: u8,
        shift: ShiftKind,
        role_id: &str,
    ) -> bool {
        grid.has_role(day, shift, role_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assignment::DraftAssignment;
    use crate::domain::role::Role;
    use crate::domain::types::ContractType;

    fn worker(id: &str, weekly_hours: i32, days_off: Vec<u8>) -> Worker {
        Worker {
            worker_id: id.to_string(),
            name: id.to_string(),
            phone: None,
            contract_type: ContractType::FullTime,
            weekly_hours,
            days_off,
            primary_role: Some("r1".to_string()),
            secondary_role: None,
            tertiary_role: None,
        }
    }

    fn role(id: &str) -> Role {
        Role {
            role_id: id.to_string(),
            code: id.to_string(),
            name: id.to_string(),
            color: "#FF6B6B".to_string(),
        }
    }

    #[test]
    fn test_day_off_blocks_availability() {
        let grid = RosterGrid::new();
        let w = worker("w1", 40, vec![1]);
        let ledger = HourLedger::for_workers(std::slice::from_ref(&w));

        assert!(!ConstraintEvaluator::is_available(
            &grid,
            &ledger,
            &w,
            1,
            ShiftKind::Opening
        ));
        assert!(ConstraintEvaluator::is_available(
            &grid,
            &ledger,
            &w,
            2,
            ShiftKind::Opening
        ));
    }

    #[test]
    fn test_duplicate_slot_blocks_availability() {
        let mut grid = RosterGrid::new();
        let w = worker("w1", 40, vec![]);
        let ledger = HourLedger::for_workers(std::slice::from_ref(&w));

        grid.push(DraftAssignment::new(&w, &role("r1"), 0, ShiftKind::Opening));

        assert!(!ConstraintEvaluator::is_available(
            &grid,
            &ledger,
            &w,
            0,
            ShiftKind::Opening
        ));
        // 同日另一班次仍可排
        assert!(ConstraintEvaluator::is_available(
            &grid,
            &ledger,
            &w,
            0,
            ShiftKind::Closing
        ));
    }

    #[test]
    fn test_hour_cap_boundary() {
        let grid = RosterGrid::new();
        let w = worker("w1", 6, vec![]);
        let mut ledger = HourLedger::for_workers(std::slice::from_ref(&w));

        // 6 小时上限恰好容纳一个开店班
        assert!(ConstraintEvaluator::is_available(
            &grid,
            &ledger,
            &w,
            0,
            ShiftKind::Opening
        ));

        ledger.add("w1", 6);
        assert!(!ConstraintEvaluator::is_available(
            &grid,
            &ledger,
            &w,
            1,
            ShiftKind::Closing
        ));
    }

    #[test]
    fn test_zero_hours_worker_never_available() {
        let grid = RosterGrid::new();
        let w = worker("w1", 0, vec![]);
        let ledger = HourLedger::for_workers(std::slice::from_ref(&w));

        for day in 0..7 {
            for shift in ShiftKind::ALL {
                assert!(!ConstraintEvaluator::is_available(
                    &grid, &ledger, &w, day, shift
                ));
            }
        }
    }

    #[test]
    fn test_cap_override() {
        let grid = RosterGrid::new();
        // 合同 40 小时, 但按 54 小时组织上限判定
        let w = worker("w1", 40, vec![]);
        let mut ledger = HourLedger::for_workers(std::slice::from_ref(&w));
        ledger.add("w1", 44);

        assert!(!ConstraintEvaluator::is_available(
            &grid,
            &ledger,
            &w,
            0,
            ShiftKind::Opening
        ));
        assert!(ConstraintEvaluator::is_available_within(
            &grid,
            &ledger,
            &w,
            0,
            ShiftKind::Opening,
            54
        ));
    }

    #[test]
    fn test_role_coverage_query() {
        let mut grid = RosterGrid::new();
        let w = worker("w1", 40, vec![]);
        grid.push(DraftAssignment::new(&w, &role("r1"), 0, ShiftKind::Opening));

        assert!(ConstraintEvaluator::role_already_covered(
            &grid,
            0,
            ShiftKind::Opening,
            "r1"
        ));
        assert!(!ConstraintEvaluator::role_already_covered(
            &grid,
            0,
            ShiftKind::Closing,
            "r1"
        ));
    }
}
