// ==========================================
// 铁路货运作业链生成系统 - 构建引擎层
// ==========================================
// 依据: JobGen_Core_Spec_v0.2.md - §4 组件设计
// ==========================================
// 职责: 作业定义/作业链的校验与构建
// 红线: 构建全有或全无, 失败不留部分状态
// ==========================================

pub mod aggregation;
pub mod chain;
pub mod context;
pub mod definition;
pub mod error;
pub mod haul;
pub mod oracle;
pub mod shunting_load;
pub mod shunting_unload;
pub mod transport;

// 重导出核心类型
pub use aggregation::{group_by_cargo_type, group_by_track, validate_track_partition};
pub use chain::{ChainFactory, ChainKindRegistry, ChainSeed, JobChainBuilder};
pub use context::GenerationContext;
pub use definition::JobDefinitionBuilder;
pub use error::{BuildError, BuildResult, ConfigurationError};
pub use haul::EmptyHaulJobBuilder;
pub use oracle::{
    extract_payment_calculation_data, licenses_for_car_types, train_length_m, LicenseOracle,
    PaymentCalculationData, PaymentOracle, StandardLicenseTable, StandardPaymentOracle,
};
pub use shunting_load::ShuntingLoadJobBuilder;
pub use shunting_unload::ShuntingUnloadJobBuilder;
pub use transport::TransportJobBuilder;
