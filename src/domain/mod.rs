// ==========================================
// 门店排班系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑, 不含引擎逻辑
// ==========================================

pub mod assignment;
pub mod history;
pub mod role;
pub mod staffing;
pub mod types;
pub mod worker;

// 重导出核心类型
pub use assignment::{AssignmentRecord, DraftAssignment};
pub use history::RosterHistory;
pub use role::{find_role, Role, CASHIER_ROLE_CODE};
pub use staffing::DayStaffing;
pub use types::{ContractType, DemandLevel, ShiftKind, DAYS_PER_WEEK};
pub use worker::Worker;
