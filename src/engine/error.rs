// ==========================================
// 铁路货运作业链生成系统 - 构建错误类型
// ==========================================
// 依据: JobGen_Core_Spec_v0.2.md - §7 错误处理
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::JobKind;
use thiserror::Error;

// ==========================================
// ConfigurationError - 配置校验错误
// ==========================================
// 仅在 validate() 时暴露, 配置阶段不提前报错,
// 调用方可以任意顺序设置字段

/// 构建器配置错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    // ===== 必填字段 =====
    #[error("缺少必填字段: {0}")]
    MissingField(&'static str),

    #[error("车型列表为空")]
    EmptyConsist,

    #[error("作业链未附加任何作业定义")]
    NoDefinitions,

    // ===== 跨字段一致性 =====
    #[error("货物数据与车型数量不一致: 车型 {car_types}, 货物类型 {cargo_types}, 货物数量 {cargo_amounts}")]
    CargoMisaligned {
        car_types: usize,
        cargo_types: usize,
        cargo_amounts: usize,
    },

    // ===== 股道索引分配 =====
    #[error("股道分配索引 ({index}) 超出车型数量 ({car_count})")]
    TrackIndexOutOfRange { index: usize, car_count: usize },

    #[error("股道分配索引重复: {index}")]
    DuplicateTrackIndex { index: usize },

    #[error("股道分配未覆盖全部车辆: 已分配 {assigned}, 车型数量 {car_count}")]
    IncompleteTrackPartition { assigned: usize, car_count: usize },
}

// ==========================================
// BuildError - 构建错误
// ==========================================

/// 作业定义/作业链构建错误
#[derive(Error, Debug)]
pub enum BuildError {
    // ===== 构建时输入 =====
    #[error("已生成车辆数量 ({spawned}) 与车型数量 ({expected}) 不一致")]
    CountMismatch { spawned: usize, expected: usize },

    #[error("分组索引 ({index}) 超出车辆列表范围 ({len})")]
    IndexOutOfRange { index: usize, len: usize },

    // ===== 配置兜底校验 =====
    #[error("构建前配置校验未通过: {0}")]
    InvalidConfiguration(#[from] ConfigurationError),

    // ===== 链容器工厂 =====
    #[error("起始作业类型 {kind} 未注册链容器工厂")]
    MissingFactory { kind: JobKind },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type BuildResult<T> = Result<T, BuildError>;
