// ==========================================
// 门店排班系统 - 周排班网格
// ==========================================
// 7 天 × 2 班次的内存网格, 单次生成的工作区。
// 只提供查询与追加; 不做约束判定 (约束判定在 ConstraintEvaluator)。
// ==========================================

use crate::domain::assignment::DraftAssignment;
use crate::domain::types::{ShiftKind, DAYS_PER_WEEK};

// ==========================================
// RosterGrid - 周排班网格
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RosterGrid {
    // [日][班次] → 班次草稿列表, 下标见 ShiftKind::slot_index
    slots: [[Vec<DraftAssignment>; 2]; DAYS_PER_WEEK],
}

impl RosterGrid {
    /// 空网格
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定槽位的班次列表
    pub fn slot(&self, day: u8, shift: ShiftKind) -> &[DraftAssignment] {
        &self.slots[day as usize][shift.slot_index()]
    }

    /// 追加一条班次草稿
    pub fn push(&mut self, assignment: DraftAssignment) {
        let day = assignment.day as usize;
        let shift = assignment.shift.slot_index();
        self.slots[day][shift].push(assignment);
    }

    /// 槽位当前人数
    pub fn count(&self, day: u8, shift: ShiftKind) -> u32 {
        self.slot(day, shift).len() as u32
    }

    /// 员工是否已在指定槽位
    pub fn has_worker(&self, day: u8, shift: ShiftKind, worker_id: &str) -> bool {
        self.slot(day, shift).iter().any(|a| a.worker_id == worker_id)
    }

    /// 员工当日是否已有任一班次
    pub fn worker_on_day(&self, day: u8, worker_id: &str) -> bool {
        ShiftKind::ALL
            .iter()
            .any(|shift| self.has_worker(day, *shift, worker_id))
    }

    /// 角色是否已在指定槽位被覆盖
    pub fn has_role(&self, day: u8, shift: ShiftKind, role_id: &str) -> bool {
        self.slot(day, shift).iter().any(|a| a.role_id == role_id)
    }

    /// 遍历全部草稿 (日升序, 班次先开店后闭店)
    pub fn iter(&self) -> impl Iterator<Item = &DraftAssignment> {
        self.slots
            .iter()
            .flat_map(|day| day.iter().flat_map(|slot| slot.iter()))
    }

    /// 草稿总数
    pub fn total(&self) -> usize {
        self.iter().count()
    }
}
