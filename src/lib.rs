// ==========================================
// 铁路货运作业链生成系统 - 核心库
// ==========================================
// 依据: JobGen_Core_Spec_v0.2.md - 系统总览
// 系统定位: 作业链构建核心 (执行与持久化归宿主模拟器)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 校验与构建
pub mod engine;

// 配置层 - 生成参数
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CarType, CargoType, ContainerType, JobKind, JobLicenses};

// 领域实体
pub use domain::{
    Car, CarsPerCargoType, CarsPerTrack, ChainState, JobChain, JobChainController, JobDefinition,
    JobPayload, Station, StationsChainData, Track, TrackIndexAssignment, WarehouseMachine,
};

// 构建引擎
pub use engine::{
    BuildError, BuildResult, ChainKindRegistry, ConfigurationError, EmptyHaulJobBuilder,
    GenerationContext, JobChainBuilder, JobDefinitionBuilder, ShuntingLoadJobBuilder,
    ShuntingUnloadJobBuilder, TransportJobBuilder,
};

// 配置
pub use config::GenerationSettings;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "铁路货运作业链生成系统";

// ==========================================
// 预编译检查
// ==========================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
