// ==========================================
// 门店排班系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免“部分模块外键开启/部分不开启”
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供幂等建表入口，库/测试共用同一套 schema
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明:
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 初始化数据库 schema（幂等）
///
/// 表清单:
/// - schema_version: 版本标记
/// - config_scope / config_kv: 配置存储 (key-value + scope)
/// - role: 岗位角色
/// - worker: 员工档案
/// - assignment: 班次分配记录（按周归组）
/// - roster_history: 排班生成历史（只追加）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_scope (
            scope_id TEXT PRIMARY KEY,
            scope_type TEXT NOT NULL,
            scope_key TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(scope_type, scope_key)
        );

        INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
        VALUES ('global', 'GLOBAL', 'global');

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL REFERENCES config_scope(scope_id) ON DELETE CASCADE,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS role (
            role_id TEXT PRIMARY KEY,
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            color TEXT NOT NULL DEFAULT '#FF6B6B'
        );

        CREATE TABLE IF NOT EXISTS worker (
            worker_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            phone TEXT,
            contract_type TEXT NOT NULL DEFAULT 'FULL_TIME',
            weekly_hours INTEGER NOT NULL DEFAULT 40,
            days_off TEXT NOT NULL DEFAULT '',
            primary_role TEXT REFERENCES role(role_id),
            secondary_role TEXT REFERENCES role(role_id),
            tertiary_role TEXT REFERENCES role(role_id)
        );

        CREATE TABLE IF NOT EXISTS assignment (
            assignment_id TEXT PRIMARY KEY,
            worker_id TEXT NOT NULL REFERENCES worker(worker_id),
            role_id TEXT NOT NULL REFERENCES role(role_id),
            day INTEGER NOT NULL,
            date TEXT NOT NULL,
            shift TEXT NOT NULL,
            week_id TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_assignment_week ON assignment(week_id);

        CREATE TABLE IF NOT EXISTS roster_history (
            history_id TEXT PRIMARY KEY,
            week_id TEXT NOT NULL,
            generated_at TEXT NOT NULL,
            generated_by TEXT NOT NULL,
            assignment_ids_json TEXT NOT NULL,
            staffing_snapshot_json TEXT NOT NULL,
            hours_snapshot_json TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_history_week ON roster_history(week_id);

        INSERT OR IGNORE INTO schema_version (version) VALUES (1);
        "#,
    )?;
    Ok(())
}
