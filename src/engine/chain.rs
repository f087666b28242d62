// ==========================================
// 铁路货运作业链生成系统 - 作业链构建器
// ==========================================
// 依据: JobGen_Core_Spec_v0.2.md - §4.3 作业链构建器
// ==========================================
// 职责: 编排多个作业定义构建器, 产出完整作业链
// 红线: 构建全有或全无, 任一定义失败时整条链丢弃
// ==========================================

use crate::domain::job::{
    EmptyHaulAppendingController, JobChain, JobChainController, StandardChainController,
    StationsChainData,
};
use crate::domain::types::JobKind;
use crate::domain::yard::{Car, Station};
use crate::engine::context::GenerationContext;
use crate::engine::definition::JobDefinitionBuilder;
use crate::engine::error::{BuildError, BuildResult, ConfigurationError};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::{debug, error, warn};

// ==========================================
// ChainSeed - 链容器初始数据
// ==========================================
#[derive(Debug, Clone)]
pub struct ChainSeed {
    pub label: String,                 // 链标签
    pub parent_yard_id: String,        // 触发生成的场站
    pub chain_data: StationsChainData, // 链两端场站
}

impl ChainSeed {
    /// 以种子创建空链 (工厂实现的公共起点)
    pub fn into_chain(self) -> JobChain {
        JobChain::new(&self.label, &self.parent_yard_id, self.chain_data)
    }
}

/// 链容器工厂: 起始作业类型 → 空容器
pub type ChainFactory = Box<dyn Fn(ChainSeed) -> Box<dyn JobChainController> + Send + Sync>;

// ==========================================
// ChainKindRegistry - 链容器工厂注册表
// ==========================================

/// 起始作业类型到链容器工厂的注册表
///
/// 显式对象而非进程级全局状态, 测试可各自持有独立实例;
/// 注册走写锁, 查找走读锁
pub struct ChainKindRegistry {
    factories: RwLock<HashMap<JobKind, ChainFactory>>,
}

impl ChainKindRegistry {
    /// 空注册表
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// 预注册内置作业类型的注册表
    ///
    /// 载货链完成后由宿主追加空驶回送, 空驶链用基础容器
    pub fn with_builtin_kinds() -> Self {
        let registry = Self::new();
        registry.register(
            JobKind::ShuntingLoad,
            Box::new(|seed| Box::new(EmptyHaulAppendingController::new(seed.into_chain()))),
        );
        registry.register(
            JobKind::ShuntingUnload,
            Box::new(|seed| Box::new(EmptyHaulAppendingController::new(seed.into_chain()))),
        );
        registry.register(
            JobKind::Transport,
            Box::new(|seed| Box::new(EmptyHaulAppendingController::new(seed.into_chain()))),
        );
        registry.register(
            JobKind::EmptyHaul,
            Box::new(|seed| Box::new(StandardChainController::new(seed.into_chain()))),
        );
        registry
    }

    /// 注册链容器工厂
    ///
    /// 同类型后注册者覆盖先注册者, 覆盖记警告但不视为错误
    pub fn register(&self, kind: JobKind, factory: ChainFactory) {
        let mut factories = self
            .factories
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if factories.insert(kind, factory).is_some() {
            warn!(kind = %kind, "覆盖已注册的链容器工厂");
        }
    }

    /// 指定类型是否已注册工厂
    pub fn contains(&self, kind: JobKind) -> bool {
        self.factories
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(&kind)
    }

    /// 查找工厂并创建空链容器
    ///
    /// 类型未注册时不会产生任何容器
    pub fn build(&self, kind: JobKind, seed: ChainSeed) -> BuildResult<Box<dyn JobChainController>> {
        let factories = self
            .factories
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let Some(factory) = factories.get(&kind) else {
            error!(kind = %kind, "起始作业类型未注册链容器工厂");
            return Err(BuildError::MissingFactory { kind });
        };
        Ok(factory(seed))
    }
}

impl Default for ChainKindRegistry {
    fn default() -> Self {
        Self::with_builtin_kinds()
    }
}

impl fmt::Debug for ChainKindRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<JobKind> = self
            .factories
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .keys()
            .copied()
            .collect();
        f.debug_struct("ChainKindRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

// ==========================================
// JobChainBuilder - 作业链构建器
// ==========================================

/// 作业链构建器
///
/// 配置期流式累积两端车站与作业定义构建器,
/// build 为终态操作, 成功返回已生效的链容器
#[derive(Debug)]
pub struct JobChainBuilder {
    ctx: Arc<GenerationContext>,
    starting_kind: JobKind,
    local_station: Station,
    origin: Option<Station>,
    destination: Option<Station>,
    definition_builders: Vec<JobDefinitionBuilder>,
}

impl JobChainBuilder {
    /// # 参数
    /// - starting_kind: 链首作业类型, 决定容器工厂
    /// - local_station: 触发生成的场站
    pub fn new(ctx: Arc<GenerationContext>, starting_kind: JobKind, local_station: &Station) -> Self {
        Self {
            ctx,
            starting_kind,
            local_station: local_station.clone(),
            origin: None,
            destination: None,
            definition_builders: Vec::new(),
        }
    }

    // ==========================================
    // 流式配置
    // ==========================================

    pub fn start_at(mut self, station: &Station) -> Self {
        if let Some(previous) = &self.origin {
            warn!(was = %previous, now = %station, "覆盖已设置的起点车站");
        }
        self.origin = Some(station.clone());
        self
    }

    pub fn end_at(mut self, station: &Station) -> Self {
        if let Some(previous) = &self.destination {
            warn!(was = %previous, now = %station, "覆盖已设置的终点车站");
        }
        self.destination = Some(station.clone());
        self
    }

    /// 追加一个作业定义构建器
    pub fn then(mut self, builder: impl Into<JobDefinitionBuilder>) -> Self {
        self.definition_builders.push(builder.into());
        self
    }

    /// 批量追加作业定义构建器
    pub fn do_jobs<I>(mut self, builders: I) -> Self
    where
        I: IntoIterator<Item = JobDefinitionBuilder>,
    {
        self.definition_builders.extend(builders);
        self
    }

    // ==========================================
    // 校验与构建
    // ==========================================

    /// 纯校验: 至少一个定义构建器、全部定义有效、两端车站已设置
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.definition_builders.is_empty() {
            return Err(ConfigurationError::NoDefinitions);
        }
        for builder in &self.definition_builders {
            builder.validate()?;
        }
        if self.origin.is_none() {
            return Err(ConfigurationError::MissingField("origin"));
        }
        if self.destination.is_none() {
            return Err(ConfigurationError::MissingField("destination"));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// 构建作业链
    ///
    /// 全部定义共用同一车辆列表; 各定义只读取
    /// 与自身车型数量对齐的槽位, 对齐由调用方保证
    ///
    /// 全有或全无: 任一定义构建失败时, 链容器在此作用域内
    /// 被丢弃, 调用方永远不会见到部分构建的链
    pub fn build(&self, cars: &[Car]) -> BuildResult<Box<dyn JobChainController>> {
        self.validate()?;
        let origin = self
            .origin
            .as_ref()
            .ok_or(ConfigurationError::MissingField("origin"))?;
        let destination = self
            .destination
            .as_ref()
            .ok_or(ConfigurationError::MissingField("destination"))?;

        let label = format!(
            "ChainJob[{}]: {} - {}",
            self.starting_kind, origin.yard_id, destination.yard_id
        );
        let seed = ChainSeed {
            label: label.clone(),
            parent_yard_id: self.local_station.yard_id.clone(),
            chain_data: StationsChainData::new(&origin.yard_id, &destination.yard_id),
        };

        // 工厂缺失时在创建任何容器之前返回
        let mut controller = self.ctx.registry().build(self.starting_kind, seed)?;

        let total = self.definition_builders.len();
        for (position, builder) in self.definition_builders.iter().enumerate() {
            match builder.build(&self.ctx, cars) {
                Ok(definition) => controller.chain_mut().attach(definition),
                Err(e) => {
                    error!(
                        position = position + 1,
                        total,
                        starting_kind = %self.starting_kind,
                        "作业定义构建失败, 丢弃整条链"
                    );
                    return Err(e);
                }
            }
        }

        controller.chain_mut().finalize();
        debug!(chain = %label, jobs = total, "作业链构建完成");
        Ok(controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::ChainState;
    use crate::domain::types::{CarType, CargoType};
    use crate::domain::yard::Track;
    use crate::engine::transport::TransportJobBuilder;

    fn context() -> Arc<GenerationContext> {
        Arc::new(GenerationContext::standard())
    }

    fn transport_builder(origin: &Station, destination: &Station) -> TransportJobBuilder {
        TransportJobBuilder::new()
            .start_at(origin, &Track::new("YA-O1", "YA", 500.0))
            .end_at(destination, &Track::new("YB-I1", "YB", 500.0))
            .haul(
                [CarType::Flatcar],
                [CargoType::Steel],
                [20.0],
            )
    }

    #[test]
    fn test_missing_factory_aborts_before_any_container() {
        let registry = Arc::new(ChainKindRegistry::new()); // 未注册任何工厂
        let settings = crate::config::GenerationSettings::default();
        let ctx = Arc::new(GenerationContext::new(
            settings.clone(),
            Arc::new(crate::engine::oracle::StandardPaymentOracle::new(settings)),
            Arc::new(crate::engine::oracle::StandardLicenseTable),
            registry,
        ));
        let origin = Station::new("YA", "A站", 0.0, 0.0);
        let destination = Station::new("YB", "B站", 5000.0, 0.0);

        let builder = JobChainBuilder::new(ctx, JobKind::Transport, &origin)
            .start_at(&origin)
            .end_at(&destination)
            .then(transport_builder(&origin, &destination));

        let cars = vec![Car::new("car-1", CarType::Flatcar)];
        let result = builder.build(&cars);
        assert!(matches!(
            result,
            Err(BuildError::MissingFactory {
                kind: JobKind::Transport
            })
        ));
    }

    #[test]
    fn test_registry_override_replaces_factory() {
        let registry = ChainKindRegistry::with_builtin_kinds();
        // 覆盖内置的 Transport 工厂: 改用基础容器
        registry.register(
            JobKind::Transport,
            Box::new(|seed| Box::new(StandardChainController::new(seed.into_chain()))),
        );

        let seed = ChainSeed {
            label: "c".to_string(),
            parent_yard_id: "YA".to_string(),
            chain_data: StationsChainData::new("YA", "YB"),
        };
        let controller = registry.build(JobKind::Transport, seed).unwrap();
        // 覆盖后的工厂独占该类型
        assert!(!controller.generates_empty_haul_on_completion());
    }

    #[test]
    fn test_chain_validity_requires_definitions_and_endpoints() {
        let ctx = context();
        let origin = Station::new("YA", "A站", 0.0, 0.0);
        let destination = Station::new("YB", "B站", 5000.0, 0.0);

        let builder = JobChainBuilder::new(ctx.clone(), JobKind::Transport, &origin);
        assert_eq!(builder.validate(), Err(ConfigurationError::NoDefinitions));

        let builder = builder.then(transport_builder(&origin, &destination));
        assert_eq!(
            builder.validate(),
            Err(ConfigurationError::MissingField("origin"))
        );

        let builder = builder.start_at(&origin).end_at(&destination);
        assert!(builder.is_valid());
    }

    #[test]
    fn test_chain_label_format() {
        let ctx = context();
        let origin = Station::new("YA", "A站", 0.0, 0.0);
        let destination = Station::new("YB", "B站", 5000.0, 0.0);

        let controller = JobChainBuilder::new(ctx, JobKind::Transport, &origin)
            .start_at(&origin)
            .end_at(&destination)
            .then(transport_builder(&origin, &destination))
            .build(&[Car::new("car-1", CarType::Flatcar)])
            .unwrap();

        assert_eq!(controller.chain().label, "ChainJob[TRANSPORT]: YA - YB");
        assert_eq!(controller.chain().state(), ChainState::Live);
    }
}
