// ==========================================
// 门店排班系统 - 排班 API
// ==========================================
// 职责: 周班表生成与落库、单条班次的改派/互换/删除、
//       实时周工时汇总、覆盖报告、生成历史查询
// 红线: 生成前置条件失败不落库任何记录;
//       历史快照只追加, 删除班次不回写历史工时
// ==========================================

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::config::ConfigManager;
use crate::config::RosterConfigReader;
use crate::domain::assignment::AssignmentRecord;
use crate::domain::history::RosterHistory;
use crate::domain::role::Role;
use crate::domain::worker::Worker;
use crate::engine::assembler::ResultAssembler;
use crate::engine::coverage::{CoverageReport, CoverageValidator};
use crate::engine::orchestrator::{RosterOrchestrator, WeekGenerationResult};
use crate::engine::phases::SchedulerError;
use crate::repository::assignment_repo::AssignmentRepository;
use crate::repository::history_repo::HistoryRepository;
use crate::repository::role_repo::RoleRepository;
use crate::repository::worker_repo::WorkerRepository;

// ==========================================
// RosterApi - 排班 API
// ==========================================

/// 排班API
///
/// 职责:
/// 1. 周班表生成 (快照 → 引擎 → 落库 → 历史追加)
/// 2. 单条班次维护 (改派/互换/删除, 落库前重新校验约束)
/// 3. 周视图与实时工时查询
/// 4. 覆盖报告与生成历史
pub struct RosterApi {
    worker_repo: Arc<WorkerRepository>,
    role_repo: Arc<RoleRepository>,
    assignment_repo: Arc<AssignmentRepository>,
    history_repo: Arc<HistoryRepository>,
    config_manager: Arc<ConfigManager>,
    orchestrator: RosterOrchestrator<ConfigManager>,
}

impl RosterApi {
    /// 创建新的RosterApi实例
    pub fn new(
        worker_repo: Arc<WorkerRepository>,
        role_repo: Arc<RoleRepository>,
        assignment_repo: Arc<AssignmentRepository>,
        history_repo: Arc<HistoryRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        let orchestrator = RosterOrchestrator::new(config_manager.clone());

        Self {
            worker_repo,
            role_repo,
            assignment_repo,
            history_repo,
            config_manager,
            orchestrator,
        }
    }

    // ==========================================
    // 生成接口
    // ==========================================

    /// 生成并落库一周班表
    ///
    /// 流程: 快照员工/角色 (登记顺序) → 编排生成 → 单事务落库
    /// → 追加历史 (人数目标快照 + 工时快照)。
    ///
    /// # 参数
    /// - actor: 生成人
    /// - today: 当前日期 (决定周标识与周日基准)
    ///
    /// # 返回
    /// - Ok(WeekGenerationResult): 生成结果 (含覆盖报告)
    /// - Err(ApiError::PreconditionFailed): 强制收银角色缺失, 未落库
    pub async fn generate_week(
        &self,
        actor: &str,
        today: NaiveDate,
    ) -> ApiResult<WeekGenerationResult> {
        if actor.trim().is_empty() {
            return Err(ApiError::InvalidInput("生成人不能为空".to_string()));
        }

        let workers = self.worker_repo.list_all()?;
        let roles = self.role_repo.list_all()?;

        let result = self
            .orchestrator
            .generate_week(&workers, &roles, today)
            .await
            .map_err(|e| match e.downcast::<SchedulerError>() {
                Ok(scheduler_err) => ApiError::PreconditionFailed(scheduler_err.to_string()),
                Err(other) => ApiError::InternalError(other.to_string()),
            })?;

        // 落库 (单事务) + 历史追加
        let inserted = self.assignment_repo.insert_week(&result.records)?;

        let history = RosterHistory {
            history_id: Uuid::new_v4().to_string(),
            week_id: result.week_id.clone(),
            generated_at: Utc::now().naive_utc(),
            generated_by: actor.to_string(),
            assignment_ids: result
                .records
                .iter()
                .map(|r| r.assignment_id.clone())
                .collect(),
            staffing_snapshot: result.staffing.clone(),
            hours_snapshot: result.hours.clone(),
        };
        self.history_repo.insert(&history)?;

        info!(
            week_id = %result.week_id,
            inserted,
            actor,
            "周班表已落库并记入历史"
        );

        Ok(result)
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 当前日期所属的周标识
    pub fn current_week_id(&self, today: NaiveDate) -> String {
        ResultAssembler::week_id(today)
    }

    /// 查询指定周的全部班次记录
    pub fn get_week(&self, week_id: &str) -> ApiResult<Vec<AssignmentRecord>> {
        Ok(self.assignment_repo.find_by_week(week_id)?)
    }

    /// 实时周工时汇总 (开店 6h / 闭店 4h, 按当前班次记录重新累加)
    ///
    /// 与历史中的工时快照不同: 快照是生成时点的台账终值,
    /// 本查询反映删除/改派后的现状。
    pub fn weekly_hours(&self, week_id: &str) -> ApiResult<BTreeMap<String, i32>> {
        let records = self.assignment_repo.find_by_week(week_id)?;

        let mut hours: BTreeMap<String, i32> = BTreeMap::new();
        for record in &records {
            *hours.entry(record.worker_id.clone()).or_insert(0) += record.shift.hours();
        }

        Ok(hours)
    }

    /// 指定周的覆盖报告 (按当前人数目标配置比对)
    pub async fn coverage_report(&self, week_id: &str) -> ApiResult<CoverageReport> {
        let records = self.assignment_repo.find_by_week(week_id)?;
        let staffing = self
            .config_manager
            .get_daily_staffing()
            .await
            .map_err(|e| ApiError::InternalError(e.to_string()))?;

        Ok(CoverageValidator::check_records(&records, &staffing))
    }

    // ==========================================
    // 单条班次维护接口
    // ==========================================

    /// 改派单条班次 (可同时换员工与角色)
    ///
    /// 落库前重新校验: 休息日、槽位重复、角色资格、
    /// 个人合同周时数 (按现存班次实时累加)。
    ///
    /// # 参数
    /// - assignment_id: 班次记录ID
    /// - new_worker_id: 新员工ID
    /// - new_role_id: 新角色ID (None 保持原角色)
    pub fn reassign_assignment(
        &self,
        assignment_id: &str,
        new_worker_id: &str,
        new_role_id: Option<&str>,
    ) -> ApiResult<AssignmentRecord> {
        let record = self
            .assignment_repo
            .find_by_id(assignment_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Assignment(id={})不存在", assignment_id))
            })?;

        let worker = self
            .worker_repo
            .find_by_id(new_worker_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Worker(id={})不存在", new_worker_id)))?;

        let role_id = new_role_id.unwrap_or(&record.role_id);
        let role = self
            .role_repo
            .find_by_id(role_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Role(id={})不存在", role_id)))?;

        let violations =
            self.validate_placement(&worker, &role, &record, &[&record.assignment_id])?;
        if !violations.is_empty() {
            return Err(ApiError::OperationValidationFailed {
                reason: format!("改派校验未通过, 共{}项违规", violations.len()),
                violations,
            });
        }

        self.assignment_repo
            .update_worker_and_role(assignment_id, &worker.worker_id, &role.role_id)?;

        info!(
            assignment_id,
            worker_id = %worker.worker_id,
            role_id = %role.role_id,
            "班次已改派"
        );

        self.assignment_repo
            .find_by_id(assignment_id)?
            .ok_or_else(|| ApiError::InternalError("改派后记录读取失败".to_string()))
    }

    /// 互换两条班次的员工 (角色各自保留)
    ///
    /// 两个方向分别重新校验后在单事务内互换。
    pub fn swap_assignments(
        &self,
        assignment_a: &str,
        assignment_b: &str,
    ) -> ApiResult<(AssignmentRecord, AssignmentRecord)> {
        if assignment_a == assignment_b {
            return Err(ApiError::InvalidInput(
                "不能与自身互换".to_string(),
            ));
        }

        let record_a = self
            .assignment_repo
            .find_by_id(assignment_a)?
            .ok_or_else(|| ApiError::NotFound(format!("Assignment(id={})不存在", assignment_a)))?;
        let record_b = self
            .assignment_repo
            .find_by_id(assignment_b)?
            .ok_or_else(|| ApiError::NotFound(format!("Assignment(id={})不存在", assignment_b)))?;

        let worker_a = self
            .worker_repo
            .find_by_id(&record_a.worker_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Worker(id={})不存在", record_a.worker_id))
            })?;
        let worker_b = self
            .worker_repo
            .find_by_id(&record_b.worker_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Worker(id={})不存在", record_b.worker_id))
            })?;

        let role_a = self
            .role_repo
            .find_by_id(&record_a.role_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Role(id={})不存在", record_a.role_id)))?;
        let role_b = self
            .role_repo
            .find_by_id(&record_b.role_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Role(id={})不存在", record_b.role_id)))?;

        // B 员工接 A 槽位, A 员工接 B 槽位; 两条记录都排除在实时统计外
        let excluded = [&record_a.assignment_id, &record_b.assignment_id];
        let mut violations = self.validate_placement(&worker_b, &role_a, &record_a, &excluded)?;
        violations.extend(self.validate_placement(&worker_a, &role_b, &record_b, &excluded)?);

        if !violations.is_empty() {
            return Err(ApiError::OperationValidationFailed {
                reason: format!("互换校验未通过, 共{}项违规", violations.len()),
                violations,
            });
        }

        self.assignment_repo.swap_workers(
            &record_a.assignment_id,
            &record_a.worker_id,
            &record_b.assignment_id,
            &record_b.worker_id,
        )?;

        info!(
            assignment_a,
            assignment_b,
            "两条班次员工已互换"
        );

        let refreshed_a = self
            .assignment_repo
            .find_by_id(assignment_a)?
            .ok_or_else(|| ApiError::InternalError("互换后记录读取失败".to_string()))?;
        let refreshed_b = self
            .assignment_repo
            .find_by_id(assignment_b)?
            .ok_or_else(|| ApiError::InternalError("互换后记录读取失败".to_string()))?;

        Ok((refreshed_a, refreshed_b))
    }

    /// 删除单条班次记录
    ///
    /// 只移除当前记录; 生成历史中的工时快照是时点事实, 不回写。
    pub fn delete_assignment(&self, assignment_id: &str) -> ApiResult<AssignmentRecord> {
        let record = self
            .assignment_repo
            .find_by_id(assignment_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Assignment(id={})不存在", assignment_id))
            })?;

        self.assignment_repo.delete(assignment_id)?;

        info!(assignment_id, "班次记录已删除");

        Ok(record)
    }

    // ==========================================
    // 历史接口
    // ==========================================

    /// 查询指定周的生成历史
    pub fn get_history(&self, week_id: &str) -> ApiResult<Vec<RosterHistory>> {
        Ok(self.history_repo.find_by_week(week_id)?)
    }

    /// 查询最近 N 条生成历史
    pub fn list_history(&self, limit: u32) -> ApiResult<Vec<RosterHistory>> {
        Ok(self.history_repo.list_recent(limit)?)
    }

    // ==========================================
    // 校验辅助
    // ==========================================

    /// 校验员工+角色能否落到目标记录的槽位
    ///
    /// excluded_ids 中的记录不参与重复与工时统计 (即将被覆盖的记录)。
    fn validate_placement(
        &self,
        worker: &Worker,
        role: &Role,
        target: &AssignmentRecord,
        excluded_ids: &[&String],
    ) -> ApiResult<Vec<ValidationViolation>> {
        let mut violations = Vec::new();

        if worker.has_day_off(target.day) {
            violations.push(ValidationViolation {
                violation_type: "DAY_OFF".to_string(),
                assignment_id: target.assignment_id.clone(),
                worker_id: worker.worker_id.clone(),
                reason: format!("员工当日休息 (day={})", target.day),
            });
        }

        if !worker.holds_role(&role.role_id) {
            violations.push(ValidationViolation {
                violation_type: "ROLE_UNQUALIFIED".to_string(),
                assignment_id: target.assignment_id.clone(),
                worker_id: worker.worker_id.clone(),
                reason: format!("员工不持有角色 {} ({})", role.code, role.role_id),
            });
        }

        let week_records = self.assignment_repo.find_by_week(&target.week_id)?;

        let duplicated = week_records.iter().any(|r| {
            r.day == target.day
                && r.shift == target.shift
                && r.worker_id == worker.worker_id
                && !excluded_ids.contains(&&r.assignment_id)
        });
        if duplicated {
            violations.push(ValidationViolation {
                violation_type: "DUPLICATE_SLOT".to_string(),
                assignment_id: target.assignment_id.clone(),
                worker_id: worker.worker_id.clone(),
                reason: format!("员工已在该槽位 (day={}, shift={})", target.day, target.shift),
            });
        }

        // 实时工时: 现存记录累加 (排除将被覆盖的), 加上目标班次工时
        let current_hours: i32 = week_records
            .iter()
            .filter(|r| {
                r.worker_id == worker.worker_id && !excluded_ids.contains(&&r.assignment_id)
            })
            .map(|r| r.shift.hours())
            .sum();
        if current_hours + target.shift.hours() > worker.weekly_hours {
            violations.push(ValidationViolation {
                violation_type: "HOUR_CAP".to_string(),
                assignment_id: target.assignment_id.clone(),
                worker_id: worker.worker_id.clone(),
                reason: format!(
                    "超出合同周时数 ({} + {} > {})",
                    current_hours,
                    target.shift.hours(),
                    worker.weekly_hours
                ),
            });
        }

        Ok(violations)
    }
}
