// ==========================================
// 门店排班系统 - 生成流程编排器
// ==========================================
// 用途: 协调配置读取、四阶段引擎、结果装配与覆盖校验
// 红线: 不触库; 落库与历史追加由 API 层完成
// ==========================================

use crate::config::RosterConfigReader;
use crate::domain::assignment::AssignmentRecord;
use crate::domain::role::Role;
use crate::domain::staffing::DayStaffing;
use crate::domain::worker::Worker;
use crate::engine::assembler::ResultAssembler;
use crate::engine::coverage::{CoverageReport, CoverageValidator};
use crate::engine::phases::PhaseScheduler;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info};

// ==========================================
// WeekGenerationResult - 周生成结果
// ==========================================
#[derive(Debug, Clone)]
pub struct WeekGenerationResult {
    pub week_id: String,                // 周标识
    pub week_start: NaiveDate,          // 本周周日
    pub records: Vec<AssignmentRecord>, // 可落库班次记录
    pub hours: BTreeMap<String, i32>,   // 工时台账终值快照
    pub staffing: Vec<DayStaffing>,     // 本次生成使用的人数目标 (供历史快照)
    pub coverage: CoverageReport,       // 覆盖校验报告
}

// ==========================================
// RosterOrchestrator - 生成流程编排器
// ==========================================
pub struct RosterOrchestrator<C>
where
    C: RosterConfigReader,
{
    config: Arc<C>,
}

impl<C> RosterOrchestrator<C>
where
    C: RosterConfigReader,
{
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 配置读取器
    pub fn new(config: Arc<C>) -> Self {
        Self { config }
    }

    /// 执行完整周班表生成流程
    ///
    /// 生成是对输入快照的单线程同步计算; 唯一的挂起点是
    /// 开头的配置读取。
    ///
    /// # 参数
    /// - workers: 员工快照 (登记顺序)
    /// - roles: 角色快照 (登记顺序)
    /// - today: 当前日期 (决定周标识与周日基准)
    ///
    /// # 返回
    /// 周生成结果 (未落库)
    pub async fn generate_week(
        &self,
        workers: &[Worker],
        roles: &[Role],
        today: NaiveDate,
    ) -> Result<WeekGenerationResult, Box<dyn Error>> {
        info!(
            workers_count = workers.len(),
            roles_count = roles.len(),
            %today,
            "开始执行周班表生成流程"
        );

        // ==========================================
        // 步骤1: 读取配置 (人数目标 + 策略参数)
        // ==========================================
        debug!("步骤1: 读取人数目标与策略参数");

        let staffing = self.config.get_daily_staffing().await?;
        let policy = self.config.get_roster_policy().await?;

        // ==========================================
        // 步骤2: 四阶段排班
        // ==========================================
        debug!("步骤2: 执行四阶段排班");

        let scheduler = PhaseScheduler::new(policy);
        let outcome = scheduler.generate(workers, roles, &staffing)?;

        info!(assignments = outcome.grid.total(), "四阶段排班完成");

        // ==========================================
        // 步骤3: 结果装配
        // ==========================================
        debug!("步骤3: 装配落库记录");

        let assembled = ResultAssembler::assemble(&outcome.grid, today);

        // ==========================================
        // 步骤4: 覆盖校验 (缺员只报告, 不报错)
        // ==========================================
        debug!("步骤4: 执行覆盖校验");

        let coverage = CoverageValidator::check_grid(&outcome.grid, &staffing);
        if !coverage.is_fully_covered() {
            info!(
                gap_slots = coverage.gaps.len(),
                total_shortfall = coverage.total_shortfall(),
                "存在缺员槽位"
            );
        }

        info!(
            week_id = %assembled.week_id,
            records = assembled.records.len(),
            "周班表生成流程完成"
        );

        Ok(WeekGenerationResult {
            week_id: assembled.week_id,
            week_start: assembled.week_start,
            records: assembled.records,
            hours: outcome.ledger.snapshot(),
            staffing,
            coverage,
        })
    }
}
