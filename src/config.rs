use std::{env, path::PathBuf};

use log::LevelFilter;

const HISTORY_FILE: &str = ".minifs_history";
const DEFAULT_HISTORY_SIZE: usize = 100;

/// 运行时配置，全部来自环境变量
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub history_path: PathBuf,  // MINIFS_HISTORY
    pub history_size: usize,    // MINIFS_HISTORY_SIZE
    pub log_level: LevelFilter, // MINIFS_LOG
    pub banner: bool,           // MINIFS_NO_BANNER 置位时关闭开机画面
}

impl ShellConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let history_path = lookup("MINIFS_HISTORY")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(HISTORY_FILE)
            });

        let history_size = lookup("MINIFS_HISTORY_SIZE")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_HISTORY_SIZE);

        let log_level = lookup("MINIFS_LOG")
            .and_then(|v| v.parse().ok())
            .unwrap_or(LevelFilter::Warn);

        Self {
            history_path,
            history_size,
            log_level,
            banner: lookup("MINIFS_NO_BANNER").is_none(),
        }
    }
}
