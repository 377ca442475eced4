// ==========================================
// 门店排班系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::error::Error;
use std::sync::{Arc, Mutex};

use crate::api::RosterApi;
use crate::config::ConfigManager;
use crate::db;
use crate::repository::{
    AssignmentRepository, HistoryRepository, RoleRepository, WorkerRepository,
};

/// 应用状态
///
/// 包含API实例与共享资源; 所有仓储共享同一个数据库连接。
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 员工仓储 (员工档案维护入口)
    pub worker_repo: Arc<WorkerRepository>,

    /// 角色仓储 (岗位维护入口)
    pub role_repo: Arc<RoleRepository>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 排班API
    pub roster_api: Arc<RosterApi>,
}

impl AppState {
    /// 创建应用状态
    ///
    /// 打开数据库连接, 幂等初始化 schema, 装配仓储与API。
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = db::open_sqlite_connection(db_path)?;
        db::init_schema(&conn)?;
        let conn = Arc::new(Mutex::new(conn));

        let worker_repo = Arc::new(WorkerRepository::from_connection(conn.clone()));
        let role_repo = Arc::new(RoleRepository::from_connection(conn.clone()));
        let assignment_repo = Arc::new(AssignmentRepository::from_connection(conn.clone()));
        let history_repo = Arc::new(HistoryRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(ConfigManager::from_connection(conn)?);

        let roster_api = Arc::new(RosterApi::new(
            worker_repo.clone(),
            role_repo.clone(),
            assignment_repo,
            history_repo,
            config_manager.clone(),
        ));

        Ok(Self {
            db_path: db_path.to_string(),
            worker_repo,
            role_repo,
            config_manager,
            roster_api,
        })
    }
}

/// 默认数据库路径: 系统数据目录下的 store-roster/roster.db
///
/// 数据目录不可用时回落到当前目录。
pub fn get_default_db_path() -> String {
    let base = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    let dir = base.join("store-roster");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!(error = %e, "数据目录创建失败, 使用当前目录");
        return "roster.db".to_string();
    }
    dir.join("roster.db").to_string_lossy().to_string()
}
