//! Rules-engine runtime configuration consumed by the file sink.

use std::env;
use std::path::PathBuf;

/// Engine home and working directories, read from the environment. Only the
/// sink interprets these: `work_dir` hosts the staging file before the final
/// rename, `home` is logged for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub home: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
}

impl EngineConfig {
    pub const HOME_VAR: &'static str = "RULES_ENGINE_HOME";
    pub const WORK_DIR_VAR: &'static str = "RULES_ENGINE_WORK_DIR";

    pub fn from_env() -> Self {
        Self {
            home: env::var(Self::HOME_VAR).ok().map(PathBuf::from),
            work_dir: env::var(Self::WORK_DIR_VAR).ok().map(PathBuf::from),
        }
    }
}
