// ==========================================
// 门店排班系统 - 引擎层
// ==========================================
// 职责: 实现排班业务规则, 不拼 SQL
// 红线: Engine 不拼 SQL; 约束判定纯函数化, 落位才有副作用
// ==========================================

pub mod assembler;
pub mod constraints;
pub mod coverage;
pub mod grid;
pub mod ledger;
pub mod orchestrator;
pub mod phases;

// 重导出核心引擎
pub use assembler::{AssembledWeek, ResultAssembler};
pub use constraints::ConstraintEvaluator;
pub use coverage::{CoverageGap, CoverageReport, CoverageValidator};
pub use grid::RosterGrid;
pub use ledger::HourLedger;
pub use orchestrator::{RosterOrchestrator, WeekGenerationResult};
pub use phases::{GenerationOutcome, PhaseScheduler, RosterPolicy, SchedulerError};
