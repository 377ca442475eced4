// ==========================================
// 门店排班系统 - 应用层
// ==========================================
// 职责: 状态装配与应用入口支持
// ==========================================

pub mod state;

pub use state::{get_default_db_path, AppState};
