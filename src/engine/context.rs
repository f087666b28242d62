// ==========================================
// 铁路货运作业链生成系统 - 生成上下文
// ==========================================
// 依据: JobGen_Core_Spec_v0.2.md - §9 设计修订 (注册表对象化)
// ==========================================
// 职责: 聚合构建所需的协作方 (报酬/执照查询、链容器注册表、参数)
// 红线: 不使用进程级全局状态, 测试可各自持有独立上下文
// ==========================================

use crate::config::GenerationSettings;
use crate::engine::chain::ChainKindRegistry;
use crate::engine::oracle::{
    LicenseOracle, PaymentOracle, StandardLicenseTable, StandardPaymentOracle,
};
use std::sync::Arc;

// ==========================================
// GenerationContext - 生成上下文
// ==========================================

/// 作业生成上下文
///
/// 所有构建器共享同一上下文; 宿主可替换任一协作方
#[derive(Clone)]
pub struct GenerationContext {
    settings: GenerationSettings,
    payment: Arc<dyn PaymentOracle>,
    licenses: Arc<dyn LicenseOracle>,
    registry: Arc<ChainKindRegistry>,
}

impl GenerationContext {
    pub fn new(
        settings: GenerationSettings,
        payment: Arc<dyn PaymentOracle>,
        licenses: Arc<dyn LicenseOracle>,
        registry: Arc<ChainKindRegistry>,
    ) -> Self {
        Self {
            settings,
            payment,
            licenses,
            registry,
        }
    }

    /// 标准上下文: 默认公式、默认执照表、内置链容器工厂
    pub fn standard() -> Self {
        let settings = GenerationSettings::default();
        Self {
            payment: Arc::new(StandardPaymentOracle::new(settings.clone())),
            licenses: Arc::new(StandardLicenseTable),
            registry: Arc::new(ChainKindRegistry::with_builtin_kinds()),
            settings,
        }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn payment(&self) -> &dyn PaymentOracle {
        self.payment.as_ref()
    }

    pub fn licenses(&self) -> &dyn LicenseOracle {
        self.licenses.as_ref()
    }

    pub fn registry(&self) -> &ChainKindRegistry {
        self.registry.as_ref()
    }
}

impl std::fmt::Debug for GenerationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
