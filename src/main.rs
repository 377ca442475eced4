// ==========================================
// 门店排班系统 - 主入口
// ==========================================
// 技术栈: Rust + SQLite
// 职责: 初始化应用状态并执行一次当前周的班表生成
// ==========================================

use store_roster::app::{get_default_db_path, AppState};

#[tokio::main]
async fn main() {
    // 初始化日志系统
    store_roster::logging::init();

    tracing::info!("==================================================");
    tracing::info!("门店排班系统 - 周班表生成");
    tracing::info!("系统版本: {}", store_roster::VERSION);
    tracing::info!("==================================================");

    // 获取数据库路径
    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    // 创建AppState
    let app_state = AppState::new(&db_path).expect("无法初始化AppState");
    tracing::info!("AppState初始化成功");

    // 以当前日期生成本周班表
    let today = chrono::Local::now().date_naive();
    match app_state.roster_api.generate_week("system", today).await {
        Ok(result) => {
            tracing::info!(
                week_id = %result.week_id,
                records = result.records.len(),
                "班表生成完成"
            );

            if result.coverage.is_fully_covered() {
                tracing::info!("全部槽位达标");
            } else {
                for gap in &result.coverage.gaps {
                    tracing::warn!(
                        day = gap.day,
                        shift = %gap.shift,
                        required = gap.required,
                        assigned = gap.assigned,
                        "缺员槽位"
                    );
                }
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "班表生成失败");
            std::process::exit(1);
        }
    }
}
