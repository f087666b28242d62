// ==========================================
// 铁路货运作业链生成系统 - 作业定义构建器分发
// ==========================================
// 依据: JobGen_Core_Spec_v0.2.md - §9 设计修订 (标签联合分发)
// ==========================================
// 职责: 四种作业类型共用的校验/构建入口, 按变体分发
// ==========================================

use crate::config::GenerationSettings;
use crate::domain::job::JobDefinition;
use crate::domain::types::JobKind;
use crate::domain::yard::Car;
use crate::engine::context::GenerationContext;
use crate::engine::error::{BuildResult, ConfigurationError};
use crate::engine::haul::EmptyHaulJobBuilder;
use crate::engine::shunting_load::ShuntingLoadJobBuilder;
use crate::engine::shunting_unload::ShuntingUnloadJobBuilder;
use crate::engine::transport::TransportJobBuilder;

// ==========================================
// JobDefinitionBuilder - 构建器标签联合
// ==========================================

/// 任意作业类型的定义构建器
#[derive(Debug, Clone)]
pub enum JobDefinitionBuilder {
    EmptyHaul(EmptyHaulJobBuilder),
    ShuntingLoad(ShuntingLoadJobBuilder),
    ShuntingUnload(ShuntingUnloadJobBuilder),
    Transport(TransportJobBuilder),
}

impl JobDefinitionBuilder {
    pub fn kind(&self) -> JobKind {
        match self {
            JobDefinitionBuilder::EmptyHaul(_) => JobKind::EmptyHaul,
            JobDefinitionBuilder::ShuntingLoad(_) => JobKind::ShuntingLoad,
            JobDefinitionBuilder::ShuntingUnload(_) => JobKind::ShuntingUnload,
            JobDefinitionBuilder::Transport(_) => JobKind::Transport,
        }
    }

    /// 纯校验, 可重复调用, 无副作用
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self {
            JobDefinitionBuilder::EmptyHaul(b) => b.validate(),
            JobDefinitionBuilder::ShuntingLoad(b) => b.validate(),
            JobDefinitionBuilder::ShuntingUnload(b) => b.validate(),
            JobDefinitionBuilder::Transport(b) => b.validate(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// 编组总长 (米), 展示与配模校验用
    pub fn train_length_m(&self, settings: &GenerationSettings) -> f64 {
        match self {
            JobDefinitionBuilder::EmptyHaul(b) => b.train_length_m(settings),
            JobDefinitionBuilder::ShuntingLoad(b) => b.train_length_m(settings),
            JobDefinitionBuilder::ShuntingUnload(b) => b.train_length_m(settings),
            JobDefinitionBuilder::Transport(b) => b.train_length_m(settings),
        }
    }

    /// 构建不可变作业定义
    pub fn build(&self, ctx: &GenerationContext, cars: &[Car]) -> BuildResult<JobDefinition> {
        match self {
            JobDefinitionBuilder::EmptyHaul(b) => b.build(ctx, cars),
            JobDefinitionBuilder::ShuntingLoad(b) => b.build(ctx, cars),
            JobDefinitionBuilder::ShuntingUnload(b) => b.build(ctx, cars),
            JobDefinitionBuilder::Transport(b) => b.build(ctx, cars),
        }
    }
}

impl From<EmptyHaulJobBuilder> for JobDefinitionBuilder {
    fn from(builder: EmptyHaulJobBuilder) -> Self {
        JobDefinitionBuilder::EmptyHaul(builder)
    }
}

impl From<ShuntingLoadJobBuilder> for JobDefinitionBuilder {
    fn from(builder: ShuntingLoadJobBuilder) -> Self {
        JobDefinitionBuilder::ShuntingLoad(builder)
    }
}

impl From<ShuntingUnloadJobBuilder> for JobDefinitionBuilder {
    fn from(builder: ShuntingUnloadJobBuilder) -> Self {
        JobDefinitionBuilder::ShuntingUnload(builder)
    }
}

impl From<TransportJobBuilder> for JobDefinitionBuilder {
    fn from(builder: TransportJobBuilder) -> Self {
        JobDefinitionBuilder::Transport(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_variant() {
        let builder: JobDefinitionBuilder = EmptyHaulJobBuilder::new().into();
        assert_eq!(builder.kind(), JobKind::EmptyHaul);
        let builder: JobDefinitionBuilder = TransportJobBuilder::new().into();
        assert_eq!(builder.kind(), JobKind::Transport);
    }

    #[test]
    fn test_unconfigured_builder_is_invalid_through_dispatch() {
        let builder: JobDefinitionBuilder = ShuntingLoadJobBuilder::new().into();
        assert!(!builder.is_valid());
    }
}
