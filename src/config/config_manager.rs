// ==========================================
// 门店排班系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::roster_config_trait::RosterConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::staffing::DayStaffing;
use crate::domain::types::DAYS_PER_WEEK;
use crate::engine::phases::{
    RosterPolicy, FULL_TIME_WEEK_CAP_HOURS, GAP_FILL_PASS_LIMIT, PART_TIME_WEEK_CAP_HOURS,
};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明: 为保证连接行为一致, 会对传入连接再次应用统一 PRAGMA (幂等)。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值 (scope_id='global')
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 从 config_kv 表读取配置值, 带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入配置值 (UPSERT, scope_id='global')
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;

        Ok(())
    }

    /// 覆写每日人数目标配置
    ///
    /// # 参数
    /// - staffing: 恰好 7 条, 按星期索引 0-6 排列
    pub fn set_daily_staffing(&self, staffing: &[DayStaffing]) -> Result<(), Box<dyn Error>> {
        if staffing.len() != DAYS_PER_WEEK {
            return Err(format!(
                "人数目标配置必须为{}条, 实际{}条",
                DAYS_PER_WEEK,
                staffing.len()
            )
            .into());
        }

        let json = serde_json::to_string(staffing)?;
        self.set_config_value(config_keys::DAILY_STAFFING, &json)
    }
}

// ==========================================
// RosterConfigReader Trait 实现
// ==========================================
#[async_trait]
impl RosterConfigReader for ConfigManager {
    async fn get_daily_staffing(&self) -> Result<Vec<DayStaffing>, Box<dyn Error>> {
        let raw = match self.get_config_value(config_keys::DAILY_STAFFING)? {
            Some(v) => v,
            None => return Ok(DayStaffing::default_week()),
        };

        // 配置存在但格式错误/条数不对时, 记告警并回落默认表
        match serde_json::from_str::<Vec<DayStaffing>>(&raw) {
            Ok(staffing) if staffing.len() == DAYS_PER_WEEK => Ok(staffing),
            Ok(staffing) => {
                tracing::warn!(
                    config_key = config_keys::DAILY_STAFFING,
                    entries = staffing.len(),
                    "人数目标配置条数异常, 使用内置默认表"
                );
                Ok(DayStaffing::default_week())
            }
            Err(e) => {
                tracing::warn!(
                    config_key = config_keys::DAILY_STAFFING,
                    error = %e,
                    "人数目标配置格式错误, 使用内置默认表"
                );
                Ok(DayStaffing::default_week())
            }
        }
    }

    async fn get_roster_policy(&self) -> Result<RosterPolicy, Box<dyn Error>> {
        let full_time_cap = self
            .get_config_or_default(
                config_keys::FULL_TIME_WEEK_CAP,
                &FULL_TIME_WEEK_CAP_HOURS.to_string(),
            )?
            .parse::<i32>()
            .unwrap_or(FULL_TIME_WEEK_CAP_HOURS);

        let part_time_cap = self
            .get_config_or_default(
                config_keys::PART_TIME_WEEK_CAP,
                &PART_TIME_WEEK_CAP_HOURS.to_string(),
            )?
            .parse::<i32>()
            .unwrap_or(PART_TIME_WEEK_CAP_HOURS);

        let fill_pass_limit = self
            .get_config_or_default(
                config_keys::GAP_FILL_PASS_LIMIT,
                &GAP_FILL_PASS_LIMIT.to_string(),
            )?
            .parse::<u32>()
            .unwrap_or(GAP_FILL_PASS_LIMIT);

        Ok(RosterPolicy {
            full_time_week_cap_hours: full_time_cap,
            part_time_week_cap_hours: part_time_cap,
            gap_fill_pass_limit: fill_pass_limit,
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 每日人数目标 (JSON 数组, 7 条)
    pub const DAILY_STAFFING: &str = "daily_staffing";

    // 组织工时上限 (区别于员工个人合同周时数)
    pub const FULL_TIME_WEEK_CAP: &str = "full_time_week_cap_hours";
    pub const PART_TIME_WEEK_CAP: &str = "part_time_week_cap_hours";

    // 补位阶段最大轮数
    pub const GAP_FILL_PASS_LIMIT: &str = "gap_fill_pass_limit";
}
