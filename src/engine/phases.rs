// ==========================================
// 门店排班系统 - 四阶段排班引擎
// ==========================================
// 职责: 贪心生成一周班表
// 输入: 员工/角色快照 (登记顺序) + 每日人数目标
// 输出: RosterGrid + HourLedger
// 红线: 收银角色缺失立即失败, 不产出部分班表;
//       槽位缺员不是错误, 由覆盖校验事后报告。
// ==========================================

use crate::domain::assignment::DraftAssignment;
use crate::domain::role::{find_role, Role};
use crate::domain::staffing::DayStaffing;
use crate::domain::types::{ContractType, ShiftKind, DAYS_PER_WEEK};
use crate::domain::worker::Worker;
use crate::engine::constraints::ConstraintEvaluator;
use crate::engine::grid::RosterGrid;
use crate::engine::ledger::HourLedger;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

// ==========================================
// 工时上限常量
// ==========================================
// 三个口径有意区分, 不得合并:
// - 54h: 全职基础班表阶段的组织硬上限 (不是个人合同时数)
// - 26h: 兼职基础班表阶段的组织硬上限
// - 个人合同周时数: 收银覆盖与补位阶段的上限

/// 全职基础班表阶段组织工时上限
pub const FULL_TIME_WEEK_CAP_HOURS: i32 = 54;

/// 兼职基础班表阶段组织工时上限
pub const PART_TIME_WEEK_CAP_HOURS: i32 = 26;

/// 全职每周双班日 (10 小时) 名额
pub const FULL_TIME_DOUBLE_DAY_QUOTA: u32 = 5;

/// 兼职每周 4 小时班日名额
pub const PART_TIME_DAY_QUOTA: u32 = 4;

/// 双班日工时 (开店 6h + 闭店 4h)
pub const DOUBLE_DAY_HOURS: i32 = 10;

/// 兼职基础班日记账工时 (不论班次, 按 4 小时口径记账与判上限)
pub const PART_TIME_BASE_DAY_HOURS: i32 = 4;

/// 补位阶段最大轮数 (收敛通常很快, 上界保证必然终止)
pub const GAP_FILL_PASS_LIMIT: u32 = 15;

// ==========================================
// RosterPolicy - 排班策略参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPolicy {
    pub full_time_week_cap_hours: i32, // 全职组织工时上限
    pub part_time_week_cap_hours: i32, // 兼职组织工时上限
    pub gap_fill_pass_limit: u32,      // 补位最大轮数
}

impl Default for RosterPolicy {
    fn default() -> Self {
        Self {
            full_time_week_cap_hours: FULL_TIME_WEEK_CAP_HOURS,
            part_time_week_cap_hours: PART_TIME_WEEK_CAP_HOURS,
            gap_fill_pass_limit: GAP_FILL_PASS_LIMIT,
        }
    }
}

// ==========================================
// SchedulerError - 排班引擎错误
// ==========================================
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// 前置条件失败: 角色表中没有强制收银角色
    #[error("缺少强制收银角色: 角色表中不存在 code={0} 的角色")]
    MissingCashierRole(String),

    /// 人数目标配置条数不对 (配置层应保证 7 条)
    #[error("人数目标配置无效: 需要{expected}条, 实际{actual}条")]
    InvalidStaffingLength { expected: usize, actual: usize },
}

// ==========================================
// GenerationOutcome - 生成结果
// ==========================================
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub grid: RosterGrid,   // 周排班网格
    pub ledger: HourLedger, // 工时台账终值
}

// ==========================================
// PhaseScheduler - 四阶段排班引擎
// ==========================================
pub struct PhaseScheduler {
    policy: RosterPolicy,
}

impl PhaseScheduler {
    /// 构造函数
    pub fn new(policy: RosterPolicy) -> Self {
        Self { policy }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成一周班表
    ///
    /// 阶段顺序:
    /// 1. 强制收银覆盖 (主岗收银优先, 副/第三岗替补)
    /// 2. 全职基础班表 (至多 5 个双班日 + 1 个 4 小时闭店日)
    /// 3. 兼职基础班表 (至多 4 个 4 小时班日, 班次由子类型决定)
    /// 4. 迭代补位 (负载率升序, 未覆盖角色优先)
    ///
    /// 相同输入快照 (含列表顺序) 必产出相同班表: 算法无随机性,
    /// 所有排序均为稳定排序。
    #[instrument(skip_all, fields(workers = workers.len(), roles = roles.len()))]
    pub fn generate(
        &self,
        workers: &[Worker],
        roles: &[Role],
        staffing: &[DayStaffing],
    ) -> Result<GenerationOutcome, SchedulerError> {
        if staffing.len() != DAYS_PER_WEEK {
            return Err(SchedulerError::InvalidStaffingLength {
                expected: DAYS_PER_WEEK,
                actual: staffing.len(),
            });
        }

        // 前置条件: 强制收银角色必须存在, 任何落位之前判定
        let cashier = roles
            .iter()
            .find(|r| r.is_cashier())
            .ok_or_else(|| {
                SchedulerError::MissingCashierRole(
                    crate::domain::role::CASHIER_ROLE_CODE.to_string(),
                )
            })?;

        let mut grid = RosterGrid::new();
        let mut ledger = HourLedger::for_workers(workers);

        self.assign_cashier_coverage(&mut grid, &mut ledger, workers, cashier);
        debug!(assigned = grid.total(), "阶段1完成: 强制收银覆盖");

        self.assign_full_time_base(&mut grid, &mut ledger, workers, roles, staffing);
        debug!(assigned = grid.total(), "阶段2完成: 全职基础班表");

        self.assign_part_time_base(&mut grid, &mut ledger, workers, roles, staffing);
        debug!(assigned = grid.total(), "阶段3完成: 兼职基础班表");

        self.fill_gaps(&mut grid, &mut ledger, workers, roles, staffing);
        debug!(assigned = grid.total(), "阶段4完成: 迭代补位");

        Ok(GenerationOutcome { grid, ledger })
    }

    // ==========================================
    // 阶段 1: 强制收银覆盖
    // ==========================================
    // 槽位按日优先遍历 (日 0-6, 先开店后闭店)。
    // 候选分两级: (a) 主岗收银, (b) 副/第三岗持有收银。
    // 每级按列表顺序取第一个可用者; 两级都落空则该槽位留空,
    // 后续阶段可能补上, 但不保证。
    fn assign_cashier_coverage(
        &self,
        grid: &mut RosterGrid,
        ledger: &mut HourLedger,
        workers: &[Worker],
        cashier: &Role,
    ) {
        let primary_cashiers: Vec<&Worker> = workers
            .iter()
            .filter(|w| w.primary_is(&cashier.role_id))
            .collect();
        let backup_cashiers: Vec<&Worker> = workers
            .iter()
            .filter(|w| w.backup_for(&cashier.role_id))
            .collect();

        for day in 0..DAYS_PER_WEEK as u8 {
            for shift in ShiftKind::ALL {
                if ConstraintEvaluator::role_already_covered(grid, day, shift, &cashier.role_id) {
                    continue;
                }

                for tier in [&primary_cashiers, &backup_cashiers] {
                    let mut assigned = false;
                    for worker in tier {
                        if ConstraintEvaluator::is_available(grid, ledger, worker, day, shift) {
                            Self::commit(grid, ledger, worker, cashier, day, shift);
                            assigned = true;
                            break;
                        }
                    }
                    if assigned {
                        break;
                    }
                }
            }
        }
    }

    // ==========================================
    // 阶段 2: 全职基础班表
    // ==========================================
    // 每个全职员工按星期顺序争取 5 个双班日 (开店+闭店, 10h);
    // 双班日不成且 4 小时名额未用时, 尝试单独的闭店班 (偏好闭店)。
    // 两者都以 54 小时组织上限判定, 不是个人合同时数。
    // 主岗位解析不出角色时当日跳过, 不报错。
    fn assign_full_time_base(
        &self,
        grid: &mut RosterGrid,
        ledger: &mut HourLedger,
        workers: &[Worker],
        roles: &[Role],
        staffing: &[DayStaffing],
    ) {
        let cap = self.policy.full_time_week_cap_hours;

        for worker in workers.iter().filter(|w| w.is_full_time()) {
            // 合同时数连最短班次都容不下的员工不参与基础班表
            if worker.weekly_hours < ShiftKind::Closing.hours() {
                continue;
            }

            let mut double_days = 0u32;
            let mut four_hour_used = false;

            for day in 0..DAYS_PER_WEEK as u8 {
                if worker.has_day_off(day) {
                    continue;
                }

                // 双班日: 两个槽位都有余位 + 当日未排 + 不超组织上限
                if double_days < FULL_TIME_DOUBLE_DAY_QUOTA {
                    let opening_room =
                        grid.count(day, ShiftKind::Opening) < staffing[day as usize].opening;
                    let closing_room =
                        grid.count(day, ShiftKind::Closing) < staffing[day as usize].closing;
                    let already_on_day = grid.worker_on_day(day, &worker.worker_id);

                    if opening_room
                        && closing_room
                        && !already_on_day
                        && ledger.hours_of(&worker.worker_id) + DOUBLE_DAY_HOURS <= cap
                    {
                        if let Some(role) = worker
                            .primary_role
                            .as_deref()
                            .and_then(|r| find_role(roles, r))
                        {
                            grid.push(DraftAssignment::new(worker, role, day, ShiftKind::Opening));
                            grid.push(DraftAssignment::new(worker, role, day, ShiftKind::Closing));
                            ledger.add(&worker.worker_id, DOUBLE_DAY_HOURS);
                            double_days += 1;
                            // 双班日不再消耗当日 4 小时名额
                            continue;
                        }
                    }
                }

                // 每周一次的 4 小时班, 偏好闭店班
                if !four_hour_used {
                    let shift = ShiftKind::Closing;
                    if grid.count(day, shift) < staffing[day as usize].closing
                        && ConstraintEvaluator::is_available_within(
                            grid, ledger, worker, day, shift, cap,
                        )
                    {
                        if let Some(role) = worker
                            .primary_role
                            .as_deref()
                            .and_then(|r| find_role(roles, r))
                        {
                            Self::commit(grid, ledger, worker, role, day, shift);
                            four_hour_used = true;
                        }
                    }
                }
            }
        }
    }

    // ==========================================
    // 阶段 3: 兼职基础班表
    // ==========================================
    // 每个兼职员工至多 4 个班日; 日班兼职固定开店班,
    // 其余固定闭店班。不论班次一律按 4 小时口径记账并
    // 以 26 小时组织上限判定。本阶段没有双班日。
    fn assign_part_time_base(
        &self,
        grid: &mut RosterGrid,
        ledger: &mut HourLedger,
        workers: &[Worker],
        roles: &[Role],
        staffing: &[DayStaffing],
    ) {
        let cap = self.policy.part_time_week_cap_hours;

        for worker in workers.iter().filter(|w| w.is_part_time()) {
            // 合同时数连最短班次都容不下的员工不参与基础班表
            if worker.weekly_hours < ShiftKind::Closing.hours() {
                continue;
            }

            let mut base_days = 0u32;

            let shift = match worker.contract_type {
                ContractType::PartTimeDay => ShiftKind::Opening,
                _ => ShiftKind::Closing,
            };

            for day in 0..DAYS_PER_WEEK as u8 {
                if worker.has_day_off(day) {
                    continue;
                }
                if base_days >= PART_TIME_DAY_QUOTA {
                    break;
                }

                let in_slot = grid.has_worker(day, shift, &worker.worker_id);
                if grid.count(day, shift) < staffing[day as usize].target(shift)
                    && !in_slot
                    && ledger.hours_of(&worker.worker_id) + PART_TIME_BASE_DAY_HOURS <= cap
                {
                    if let Some(role) = worker
                        .primary_role
                        .as_deref()
                        .and_then(|r| find_role(roles, r))
                    {
                        grid.push(DraftAssignment::new(worker, role, day, shift));
                        ledger.add(&worker.worker_id, PART_TIME_BASE_DAY_HOURS);
                        base_days += 1;
                    }
                }
            }
        }
    }

    // ==========================================
    // 阶段 4: 迭代补位
    // ==========================================
    // 至多 GAP_FILL_PASS_LIMIT 轮全量扫描。槽位人数低于目标时:
    // 取候选池 (当日非休息日, 未在槽位, 个人合同周时数内,
    // 并排除班次/子类型禁排组合), 按负载率升序稳定排序;
    // 未覆盖角色按列表顺序逐个找池中第一个持有者落位。
    // 整轮找不到可落位组合即放弃该槽位, 留待下一轮。
    fn fill_gaps(
        &self,
        grid: &mut RosterGrid,
        ledger: &mut HourLedger,
        workers: &[Worker],
        roles: &[Role],
        staffing: &[DayStaffing],
    ) {
        for _pass in 0..self.policy.gap_fill_pass_limit {
            for day in 0..DAYS_PER_WEEK as u8 {
                for shift in ShiftKind::ALL {
                    let target = staffing[day as usize].target(shift);

                    while grid.count(day, shift) < target {
                        // 候选池: 班次/子类型禁排, 开店班排除夜班兼职,
                        // 闭店班排除日班兼职
                        let mut pool: Vec<&Worker> = workers
                            .iter()
                            .filter(|w| {
                                !w.has_day_off(day)
                                    && !grid.has_worker(day, shift, &w.worker_id)
                                    && ledger.hours_of(&w.worker_id) + shift.hours()
                                        <= w.weekly_hours
                                    && !(shift == ShiftKind::Opening
                                        && w.contract_type == ContractType::PartTimeNight)
                                    && !(shift == ShiftKind::Closing
                                        && w.contract_type == ContractType::PartTimeDay)
                            })
                            .collect();

                        if pool.is_empty() {
                            break;
                        }

                        // 负载率升序, 稳定排序保证同负载时保持列表顺序
                        pool.sort_by(|a, b| ledger.load_ratio(a).total_cmp(&ledger.load_ratio(b)));

                        let needed_roles: Vec<&Role> = roles
                            .iter()
                            .filter(|r| !grid.has_role(day, shift, &r.role_id))
                            .collect();

                        let mut assigned = false;
                        'next_role: for role in needed_roles {
                            for worker in &pool {
                                if ConstraintEvaluator::has_role(worker, &role.role_id) {
                                    Self::commit(grid, ledger, worker, role, day, shift);
                                    assigned = true;
                                    break 'next_role;
                                }
                            }
                        }

                        if !assigned {
                            // 本轮该槽位已无可落位组合, 留待下一轮
                            break;
                        }
                    }
                }
            }
        }
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 确认落位: 写入网格并登记班次工时
    fn commit(
        grid: &mut RosterGrid,
        ledger: &mut HourLedger,
        worker: &Worker,
        role: &Role,
        day: u8,
        shift: ShiftKind,
    ) {
        grid.push(DraftAssignment::new(worker, role, day, shift));
        ledger.add(&worker.worker_id, shift.hours());
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for PhaseScheduler {
    fn default() -> Self {
        Self::new(RosterPolicy::default())
    }
}
