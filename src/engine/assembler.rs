// ==========================================
// 门店排班系统 - 结果装配器
// ==========================================
// 职责: 把内存网格装配为可落库的班次记录
// - 绝对日期 = 本周周日 + 星期索引
// - 周标识 = YYYY-Www (年内天数算法, 周序两位补零)
// ==========================================

use crate::domain::assignment::AssignmentRecord;
use crate::engine::grid::RosterGrid;
use chrono::{Datelike, Duration, NaiveDate};
use uuid::Uuid;

// ==========================================
// AssembledWeek - 装配结果
// ==========================================
#[derive(Debug, Clone)]
pub struct AssembledWeek {
    pub week_id: String,             // 周标识
    pub week_start: NaiveDate,       // 本周周日
    pub records: Vec<AssignmentRecord>, // 可落库班次记录
}

// ==========================================
// ResultAssembler - 结果装配器
// ==========================================
pub struct ResultAssembler;

impl ResultAssembler {
    /// 计算周标识 (YYYY-Www)
    ///
    /// 周序 = ceil((年内第几天(0起) + 1月1日星期索引 + 1) / 7),
    /// 星期索引以周日为 0。
    pub fn week_id(today: NaiveDate) -> String {
        let jan_first = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap();
        let day_of_year = today.ordinal0() as i64;
        let jan_first_weekday = jan_first.weekday().num_days_from_sunday() as i64;

        // 整数向上取整: ceil(n/7) = (n+6)/7
        let week = (day_of_year + jan_first_weekday + 1 + 6) / 7;

        format!("{}-W{:02}", today.year(), week)
    }

    /// 最近的周日 (当天为周日时即当天)
    pub fn reference_sunday(today: NaiveDate) -> NaiveDate {
        today - Duration::days(today.weekday().num_days_from_sunday() as i64)
    }

    /// 装配网格为落库记录
    ///
    /// 记录顺序与网格遍历顺序一致 (日升序, 先开店后闭店),
    /// 记录ID在此处生成。
    pub fn assemble(grid: &RosterGrid, today: NaiveDate) -> AssembledWeek {
        let week_id = Self::week_id(today);
        let week_start = Self::reference_sunday(today);

        let records = grid
            .iter()
            .map(|draft| AssignmentRecord {
                assignment_id: Uuid::new_v4().to_string(),
                worker_id: draft.worker_id.clone(),
                role_id: draft.role_id.clone(),
                day: draft.day,
                date: week_start + Duration::days(draft.day as i64),
                shift: draft.shift,
                week_id: week_id.clone(),
            })
            .collect();

        AssembledWeek {
            week_id,
            week_start,
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assignment::DraftAssignment;
    use crate::domain::role::Role;
    use crate::domain::types::{ContractType, ShiftKind};
    use crate::domain::worker::Worker;

    #[test]
    fn test_week_id_first_week() {
        // 2025-01-01 是周三 (1月1日星期索引=3): 第一周
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(ResultAssembler::week_id(date), "2025-W01");
    }

    #[test]
    fn test_week_id_midyear() {
        // 2025-08-05: 年内第217天, 1月1日周三 → 第32周
        let date = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
        assert_eq!(ResultAssembler::week_id(date), "2025-W32");
    }

    #[test]
    fn test_week_id_zero_padded() {
        // 2025-01-12 是周日: 第3周, 两位补零
        let date = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        assert_eq!(ResultAssembler::week_id(date), "2025-W03");
    }

    #[test]
    fn test_reference_sunday() {
        // 2025-08-05 周二 → 周日为 2025-08-03
        let tuesday = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
        assert_eq!(
            ResultAssembler::reference_sunday(tuesday),
            NaiveDate::from_ymd_opt(2025, 8, 3).unwrap()
        );

        // 周日当天不回退
        let sunday = NaiveDate::from_ymd_opt(2025, 8, 3).unwrap();
        assert_eq!(ResultAssembler::reference_sunday(sunday), sunday);
    }

    #[test]
    fn test_assemble_dates_and_week_id() {
        let worker = Worker {
            worker_id: "w1".to_string(),
            name: "员工".to_string(),
            phone: None,
            contract_type: ContractType::FullTime,
            weekly_hours: 40,
            days_off: vec![],
            primary_role: Some("r1".to_string()),
            secondary_role: None,
            tertiary_role: None,
        };
        let role = Role {
            role_id: "r1".to_string(),
            code: "CJ".to_string(),
            name: "收银".to_string(),
            color: "#FF6B6B".to_string(),
        };

        let mut grid = RosterGrid::new();
        grid.push(DraftAssignment::new(&worker, &role, 0, ShiftKind::Opening));
        grid.push(DraftAssignment::new(&worker, &role, 3, ShiftKind::Closing));

        let today = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
        let assembled = ResultAssembler::assemble(&grid, today);

        assert_eq!(assembled.week_id, "2025-W32");
        assert_eq!(
            assembled.week_start,
            NaiveDate::from_ymd_opt(2025, 8, 3).unwrap()
        );
        assert_eq!(assembled.records.len(), 2);

        // 周日 + 星期索引
        assert_eq!(
            assembled.records[0].date,
            NaiveDate::from_ymd_opt(2025, 8, 3).unwrap()
        );
        assert_eq!(
            assembled.records[1].date,
            NaiveDate::from_ymd_opt(2025, 8, 6).unwrap()
        );

        // 记录ID唯一
        assert_ne!(
            assembled.records[0].assignment_id,
            assembled.records[1].assignment_id
        );
        assert!(assembled
            .records
            .iter()
            .all(|r| r.week_id == "2025-W32"));
    }
}
