// ==========================================
// 铁路货运作业链生成系统 - 领域模型层
// ==========================================
// 依据: JobGen_Core_Spec_v0.2.md - §3 数据模型
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含构建逻辑, 不含报酬/执照推导
// ==========================================

pub mod job;
pub mod types;
pub mod yard;

// 重导出核心类型
pub use job::{
    CarsPerCargoType, CarsPerTrack, ChainState, EmptyHaulAppendingController, JobBasePayload,
    JobChain, JobChainController, JobDefinition, JobPayload, StandardChainController,
    StationsChainData, TrackIndexAssignment,
};
pub use types::{CarType, CargoType, ContainerType, JobKind, JobLicenses};
pub use yard::{Car, Station, Track, WarehouseMachine};
