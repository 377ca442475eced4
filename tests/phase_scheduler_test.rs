// ==========================================
// PhaseScheduler 四阶段排班引擎测试
// ==========================================
// 测试目标: 验证四阶段贪心算法的约束与边界
// 覆盖范围: 收银前置条件、收银覆盖、全职/兼职配额、
//           工时台账一致性、子类型禁排、确定性
// ==========================================


use store_roster::domain::staffing::DayStaffing;
use store_roster::domain::types::{ContractType, DemandLevel, ShiftKind};
use store_roster::engine::phases::{PhaseScheduler, RosterPolicy, SchedulerError};

use test_helpers::{make_role, make_worker};

// ==========================================
// 测试辅助函数
// ==========================================

/// 全周统一人数目标
fn uniform_staffing(opening: u32, closing: u32) -> Vec<DayStaffing> {
    (0..7)
        .map(|day| DayStaffing {
            day,
            opening,
            closing,
            demand: DemandLevel::Low,
        })
        .collect()
}

// ==========================================
// 测试用例 1: 收银角色前置条件
// ==========================================

#[test]
fn test_missing_cashier_role_aborts_generation() {
    let scheduler = PhaseScheduler::default();

    let roles = vec![make_role("r-al", "AL", "仓管")];
    let workers = vec![make_worker(
        "w1",
        "员工一",
        ContractType::FullTime,
        40,
        vec![],
        Some("r-al"),
    )];

    let result = scheduler.generate(&workers, &roles, &uniform_staffing(1, 1));

    assert!(matches!(
        result,
        Err(SchedulerError::MissingCashierRole(code)) if code == "CJ"
    ));
}

#[test]
fn test_invalid_staffing_length_rejected() {
    let scheduler = PhaseScheduler::default();

    let roles = vec![make_role("r-cj", "CJ", "收银")];
    let workers = vec![];
    let staffing: Vec<DayStaffing> = uniform_staffing(1, 1).into_iter().take(5).collect();

    let result = scheduler.generate(&workers, &roles, &staffing);

    assert!(matches!(
        result,
        Err(SchedulerError::InvalidStaffingLength {
            expected: 7,
            actual: 5
        })
    ));
}

// ==========================================
// 测试用例 2: 阶段1收银覆盖
// ==========================================

#[test]
fn test_every_slot_gets_exactly_one_cashier() {
    let scheduler = PhaseScheduler::default();

    let roles = vec![make_role("r-cj", "CJ", "收银")];
    // 两名主岗收银, 合计 80h > 全周 14 槽位所需 70h
    let workers = vec![
        make_worker("c1", "收银一", ContractType::FullTime, 40, vec![], Some("r-cj")),
        make_worker("c2", "收银二", ContractType::FullTime, 40, vec![], Some("r-cj")),
    ];

    let outcome = scheduler
        .generate(&workers, &roles, &uniform_staffing(1, 1))
        .unwrap();

    for day in 0..7u8 {
        for shift in ShiftKind::ALL {
            let slot = outcome.grid.slot(day, shift);
            assert_eq!(slot.len(), 1, "day={} shift={} 应恰好1人", day, shift);
            assert_eq!(slot[0].role_code, "CJ");
        }
    }

    // 台账与班次工时一致: c1 按日优先吃满 40h (前4天), c2 接余下 30h
    assert_eq!(outcome.ledger.hours_of("c1"), 40);
    assert_eq!(outcome.ledger.hours_of("c2"), 30);
}

#[test]
fn test_backup_cashier_used_when_primary_unavailable() {
    let scheduler = PhaseScheduler::default();

    let roles = vec![
        make_role("r-cj", "CJ", "收银"),
        make_role("r-al", "AL", "仓管"),
    ];

    // 主岗收银周日休息; 替补 (副岗持有收银) 周日顶上
    let primary = make_worker("c1", "收银一", ContractType::FullTime, 54, vec![0], Some("r-cj"));
    let mut backup = make_worker("b1", "替补一", ContractType::FullTime, 54, vec![], Some("r-al"));
    backup.secondary_role = Some("r-cj".to_string());

    let outcome = scheduler
        .generate(&[primary, backup], &roles, &uniform_staffing(1, 1))
        .unwrap();

    for shift in ShiftKind::ALL {
        let slot = outcome.grid.slot(0, shift);
        assert!(
            slot.iter().any(|a| a.worker_id == "b1" && a.role_code == "CJ"),
            "周日{}班应由替补收银覆盖",
            shift
        );
    }
}

// ==========================================
// 测试用例 3: 全职基础班表
// ==========================================

#[test]
fn test_single_full_time_worker_reaches_org_cap() {
    // 场景: 唯一全职员工, 无休息日, 合同 54h, 主岗收银,
    // 每槽位目标 1 → 恰好 5 个双班日 + 1 个闭店 4h, 台账 54
    let scheduler = PhaseScheduler::default();

    let roles = vec![make_role("r-cj", "CJ", "收银")];
    let workers = vec![make_worker(
        "w1",
        "员工一",
        ContractType::FullTime,
        54,
        vec![],
        Some("r-cj"),
    )];

    let outcome = scheduler
        .generate(&workers, &roles, &uniform_staffing(1, 1))
        .unwrap();

    let mut double_days = 0;
    let mut single_closing_days = 0;
    for day in 0..7u8 {
        let opening = outcome.grid.has_worker(day, ShiftKind::Opening, "w1");
        let closing = outcome.grid.has_worker(day, ShiftKind::Closing, "w1");
        match (opening, closing) {
            (true, true) => double_days += 1,
            (false, true) => single_closing_days += 1,
            (true, false) => panic!("不应出现单独的开店班日"),
            (false, false) => {}
        }
    }

    assert_eq!(double_days, 5);
    assert_eq!(single_closing_days, 1);
    assert_eq!(outcome.ledger.hours_of("w1"), 54);
}

#[test]
fn test_full_time_quota_bounds() {
    let scheduler = PhaseScheduler::default();

    let roles = vec![
        make_role("r-cj", "CJ", "收银"),
        make_role("r-al", "AL", "仓管"),
    ];
    let workers = vec![
        make_worker("c1", "收银一", ContractType::FullTime, 40, vec![], Some("r-cj")),
        make_worker("a1", "仓管一", ContractType::FullTime, 40, vec![], Some("r-al")),
        make_worker("a2", "仓管二", ContractType::FullTime, 40, vec![2], Some("r-al")),
    ];

    let outcome = scheduler
        .generate(&workers, &roles, &uniform_staffing(7, 7))
        .unwrap();

    for worker_id in ["c1", "a1", "a2"] {
        let mut double_days = 0;
        let mut single_days = 0;
        for day in 0..7u8 {
            let opening = outcome.grid.has_worker(day, ShiftKind::Opening, worker_id);
            let closing = outcome.grid.has_worker(day, ShiftKind::Closing, worker_id);
            match (opening, closing) {
                (true, true) => double_days += 1,
                (true, false) | (false, true) => single_days += 1,
                (false, false) => {}
            }
        }
        assert!(double_days <= 5, "{} 双班日超额: {}", worker_id, double_days);
        assert!(single_days <= 1, "{} 单班日超额: {}", worker_id, single_days);
    }
}

#[test]
fn test_worker_without_resolvable_role_skipped_silently() {
    let scheduler = PhaseScheduler::default();

    let roles = vec![make_role("r-cj", "CJ", "收银")];
    let workers = vec![
        make_worker("c1", "收银一", ContractType::FullTime, 54, vec![], Some("r-cj")),
        // 主岗位引用不存在的角色: 不报错, 基础班表直接跳过
        make_worker("x1", "无岗者", ContractType::FullTime, 40, vec![], Some("r-missing")),
    ];

    let outcome = scheduler
        .generate(&workers, &roles, &uniform_staffing(2, 2))
        .unwrap();

    assert_eq!(outcome.ledger.hours_of("x1"), 0);
    assert!(outcome.grid.iter().all(|a| a.worker_id != "x1"));
}

// ==========================================
// 测试用例 4: 兼职基础班表与子类型禁排
// ==========================================

#[test]
fn test_part_time_quota_and_fixed_shift() {
    let scheduler = PhaseScheduler::default();

    let roles = vec![
        make_role("r-cj", "CJ", "收银"),
        make_role("r-al", "AL", "仓管"),
    ];
    let workers = vec![
        make_worker("c1", "收银一", ContractType::FullTime, 40, vec![], Some("r-cj")),
        // 合同 16h: 兼职基础班表排满 4 天后, 补位阶段也加不进第 5 天
        make_worker("d1", "日班兼职", ContractType::PartTimeDay, 16, vec![], Some("r-al")),
        make_worker("n1", "夜班兼职", ContractType::PartTimeNight, 16, vec![], Some("r-al")),
    ];

    let outcome = scheduler
        .generate(&workers, &roles, &DayStaffing::default_week())
        .unwrap();

    let d1_assignments: Vec<_> = outcome.grid.iter().filter(|a| a.worker_id == "d1").collect();
    let n1_assignments: Vec<_> = outcome.grid.iter().filter(|a| a.worker_id == "n1").collect();

    assert_eq!(d1_assignments.len(), 4, "日班兼职应恰好4个班日");
    assert!(d1_assignments.iter().all(|a| a.shift == ShiftKind::Opening));

    assert_eq!(n1_assignments.len(), 4, "夜班兼职应恰好4个班日");
    assert!(n1_assignments.iter().all(|a| a.shift == ShiftKind::Closing));
}

#[test]
fn test_gap_fill_respects_subtype_exclusion() {
    let scheduler = PhaseScheduler::default();

    let roles = vec![
        make_role("r-cj", "CJ", "收银"),
        make_role("r-al", "AL", "仓管"),
    ];
    // 兼职给足合同时数, 补位阶段有能力加班次时也不得跨班次
    let workers = vec![
        make_worker("c1", "收银一", ContractType::FullTime, 54, vec![], Some("r-cj")),
        make_worker("d1", "日班兼职", ContractType::PartTimeDay, 40, vec![], Some("r-al")),
        make_worker("n1", "夜班兼职", ContractType::PartTimeNight, 40, vec![], Some("r-al")),
    ];

    let outcome = scheduler
        .generate(&workers, &roles, &uniform_staffing(3, 3))
        .unwrap();

    for assignment in outcome.grid.iter() {
        if assignment.worker_id == "n1" {
            assert_eq!(assignment.shift, ShiftKind::Closing, "夜班兼职不得排开店班");
        }
        if assignment.worker_id == "d1" {
            assert_eq!(assignment.shift, ShiftKind::Opening, "日班兼职不得排闭店班");
        }
    }
}

// ==========================================
// 测试用例 5: 全局不变量
// ==========================================

#[test]
fn test_no_worker_twice_in_same_slot() {
    let scheduler = PhaseScheduler::default();

    let roles = vec![
        make_role("r-cj", "CJ", "收银"),
        make_role("r-al", "AL", "仓管"),
        make_role("r-rp", "RP", "补货"),
    ];
    let mut b1 = make_worker("b1", "替补一", ContractType::FullTime, 54, vec![1], Some("r-al"));
    b1.secondary_role = Some("r-cj".to_string());
    let workers = vec![
        make_worker("c1", "收银一", ContractType::FullTime, 40, vec![0], Some("r-cj")),
        b1,
        make_worker("a1", "仓管一", ContractType::FullTime, 40, vec![3], Some("r-al")),
        make_worker("p1", "补货一", ContractType::FullTime, 40, vec![], Some("r-rp")),
        make_worker("n1", "夜班兼职", ContractType::PartTimeNight, 26, vec![], Some("r-rp")),
        make_worker("d1", "日班兼职", ContractType::PartTimeDay, 26, vec![6], Some("r-al")),
    ];

    let outcome = scheduler
        .generate(&workers, &roles, &DayStaffing::default_week())
        .unwrap();

    for day in 0..7u8 {
        for shift in ShiftKind::ALL {
            let slot = outcome.grid.slot(day, shift);
            let mut ids: Vec<&str> = slot.iter().map(|a| a.worker_id.as_str()).collect();
            ids.sort();
            let before = ids.len();
            ids.dedup();
            assert_eq!(before, ids.len(), "day={} shift={} 出现重复员工", day, shift);
        }
    }
}

#[test]
fn test_ledger_equals_sum_of_shift_hours() {
    let scheduler = PhaseScheduler::default();

    let roles = vec![
        make_role("r-cj", "CJ", "收银"),
        make_role("r-al", "AL", "仓管"),
    ];
    // 仅全职 + 夜班兼职 (兼职基础班日均为闭店 4h, 与班次工时口径一致)
    let workers = vec![
        make_worker("c1", "收银一", ContractType::FullTime, 40, vec![], Some("r-cj")),
        make_worker("a1", "仓管一", ContractType::FullTime, 40, vec![2], Some("r-al")),
        make_worker("n1", "夜班兼职", ContractType::PartTimeNight, 26, vec![], Some("r-al")),
    ];

    let outcome = scheduler
        .generate(&workers, &roles, &DayStaffing::default_week())
        .unwrap();

    let snapshot = outcome.ledger.snapshot();
    for worker_id in ["c1", "a1", "n1"] {
        let expected: i32 = outcome
            .grid
            .iter()
            .filter(|a| a.worker_id == worker_id)
            .map(|a| a.shift.hours())
            .sum();
        assert_eq!(
            snapshot.get(worker_id).copied().unwrap_or(0),
            expected,
            "{} 台账与班次工时不一致",
            worker_id
        );
    }
}

#[test]
fn test_zero_hour_worker_never_assigned() {
    let scheduler = PhaseScheduler::default();

    let roles = vec![
        make_role("r-cj", "CJ", "收银"),
        make_role("r-al", "AL", "仓管"),
    ];
    let workers = vec![
        make_worker("c1", "收银一", ContractType::FullTime, 54, vec![], Some("r-cj")),
        // 合同 0 小时: 任何阶段都不得落位
        make_worker("z1", "零时全职", ContractType::FullTime, 0, vec![], Some("r-al")),
        make_worker("z2", "零时兼职", ContractType::PartTimeNight, 0, vec![], Some("r-al")),
        // 合同 3 小时: 连最短的闭店班 (4h) 都容不下
        make_worker("z3", "三时全职", ContractType::FullTime, 3, vec![], Some("r-al")),
    ];

    let outcome = scheduler
        .generate(&workers, &roles, &uniform_staffing(3, 3))
        .unwrap();

    for worker_id in ["z1", "z2", "z3"] {
        assert!(
            outcome.grid.iter().all(|a| a.worker_id != worker_id),
            "{} 不应获得任何班次",
            worker_id
        );
        assert_eq!(outcome.ledger.hours_of(worker_id), 0);
    }
}

#[test]
fn test_generation_is_deterministic() {
    let build_team = || {
        let roles = vec![
            make_role("r-cj", "CJ", "收银"),
            make_role("r-al", "AL", "仓管"),
            make_role("r-rp", "RP", "补货"),
        ];
        let mut b1 =
            make_worker("b1", "替补一", ContractType::FullTime, 54, vec![], Some("r-al"));
        b1.tertiary_role = Some("r-cj".to_string());
        let workers = vec![
            make_worker("c1", "收银一", ContractType::FullTime, 40, vec![5], Some("r-cj")),
            b1,
            make_worker("a1", "仓管一", ContractType::FullTime, 40, vec![], Some("r-al")),
            make_worker("n1", "夜班兼职", ContractType::PartTimeNight, 26, vec![1], Some("r-rp")),
            make_worker("d1", "日班兼职", ContractType::PartTimeDay, 26, vec![], Some("r-rp")),
        ];
        (workers, roles)
    };

    let scheduler = PhaseScheduler::new(RosterPolicy::default());

    let (workers_a, roles_a) = build_team();
    let (workers_b, roles_b) = build_team();

    let outcome_a = scheduler
        .generate(&workers_a, &roles_a, &DayStaffing::default_week())
        .unwrap();
    let outcome_b = scheduler
        .generate(&workers_b, &roles_b, &DayStaffing::default_week())
        .unwrap();

    let drafts_a: Vec<_> = outcome_a.grid.iter().collect();
    let drafts_b: Vec<_> = outcome_b.grid.iter().collect();
    assert_eq!(drafts_a, drafts_b, "相同输入应产出逐条相同的班表");
    assert_eq!(outcome_a.ledger.snapshot(), outcome_b.ledger.snapshot());
}

// ==========================================
// 测试用例 6: 补位阶段角色覆盖
// ==========================================

#[test]
fn test_gap_fill_covers_missing_roles_by_least_loaded() {
    let scheduler = PhaseScheduler::default();

    let roles = vec![
        make_role("r-cj", "CJ", "收银"),
        make_role("r-al", "AL", "仓管"),
    ];
    // g1/g2 无主岗位 (阶段2跳过), 仅副岗持有仓管 → 只能由阶段4落位
    let mut g1 = make_worker("g1", "机动一", ContractType::FullTime, 40, vec![], None);
    g1.secondary_role = Some("r-al".to_string());
    let mut g2 = make_worker("g2", "机动二", ContractType::FullTime, 40, vec![], None);
    g2.secondary_role = Some("r-al".to_string());

    let workers = vec![
        make_worker("c1", "收银一", ContractType::FullTime, 54, vec![], Some("r-cj")),
        g1,
        g2,
    ];

    let outcome = scheduler
        .generate(&workers, &roles, &uniform_staffing(2, 2))
        .unwrap();

    // 收银覆盖之外, 每个槽位的仓管角色应由机动员工补上 (合同时数允许的范围内)
    let gap_hours: i32 = outcome.ledger.hours_of("g1") + outcome.ledger.hours_of("g2");
    assert!(gap_hours > 0, "补位阶段应有落位");

    for assignment in outcome.grid.iter() {
        if assignment.worker_id == "g1" || assignment.worker_id == "g2" {
            assert_eq!(assignment.role_code, "AL", "机动员工只能以仓管角色落位");
        }
    }

    // 合同周时数上限在补位阶段必须被遵守
    assert!(outcome.ledger.hours_of("g1") <= 40);
    assert!(outcome.ledger.hours_of("g2") <= 40);
}
