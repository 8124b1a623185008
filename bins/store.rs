use dotenvy::dotenv;
use service::RecordStore;
use tracing::{error, info, warn};
use uuid::Uuid;

/// How the effective configuration was obtained. Load errors are kept so
/// they can be logged once the subscriber is up.
enum ConfigOrigin {
    File,
    Defaults,
    Fallback(anyhow::Error),
}

fn load_config() -> (configs::AppConfig, ConfigOrigin) {
    match configs::AppConfig::load_or_default() {
        Ok((cfg, true)) => (cfg, ConfigOrigin::File),
        Ok((cfg, false)) => (cfg, ConfigOrigin::Defaults),
        Err(e) => {
            // 配置文件存在但无效时退回默认值（工作目录下的 users.json / courses.json）
            let mut cfg = configs::AppConfig::default();
            cfg.storage.normalize_from_env();
            (cfg, ConfigOrigin::Fallback(e))
        }
    }
}

fn init_logging(cfg: &configs::LoggingConfig) {
    if cfg.is_json() {
        common::utils::logging::init_logging_json(&cfg.filter);
    } else {
        common::utils::logging::init_logging_default(&cfg.filter);
    }
    info!(service = "course-store", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> std::process::ExitCode {
    // 提前加载 .env，使得 RUST_LOG / CONFIG_PATH / STORE_DATA_DIR 生效
    dotenv().ok();

    let (cfg, origin) = load_config();
    init_logging(&cfg.logging);
    match origin {
        ConfigOrigin::File => info!(service = "course-store", event = "config_loaded", path = %configs::config_path(), "configuration loaded"),
        ConfigOrigin::Defaults => {
            info!(service = "course-store", event = "config_defaults", path = %configs::config_path(), "no config file, using defaults")
        }
        ConfigOrigin::Fallback(e) => {
            warn!(service = "course-store", event = "config_fallback", error = %e, "invalid configuration, using defaults")
        }
    }

    let run_id = Uuid::new_v4();
    let version = env!("CARGO_PKG_VERSION");
    info!(service = "course-store", event = "start", %run_id, version, data_dir = %cfg.storage.data_dir, "opening record store");

    if let Err(e) = common::env::ensure_data_dir(cfg.storage.data_dir()) {
        error!(service = "course-store", event = "data_dir_failed", error = %e, "cannot prepare data directory");
        return std::process::ExitCode::FAILURE;
    }

    let store = RecordStore::from_config(&cfg.storage);
    let users = store.load_users_outcome();
    let courses = store.load_courses_outcome();
    let students = users.records.iter().filter(|u| u.is_student()).count();
    let lessons: usize = courses.records.iter().map(|c| c.lessons.len()).sum();
    info!(
        service = "course-store",
        event = "summary",
        users = users.records.len(),
        students,
        instructors = users.records.len() - students,
        courses = courses.records.len(),
        lessons,
        users_path = %store.users_path().display(),
        courses_path = %store.courses_path().display(),
        "record store ready"
    );

    let notices = store.take_notices();
    if notices.is_empty() {
        std::process::ExitCode::SUCCESS
    } else {
        error!(service = "course-store", event = "stop", notices = notices.len(), "record store reported soft failures");
        std::process::ExitCode::FAILURE
    }
}
