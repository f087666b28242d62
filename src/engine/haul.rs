// ==========================================
// 铁路货运作业链生成系统 - 空驶回送构建器
// ==========================================
// 依据: JobGen_Core_Spec_v0.2.md - §4.1 作业定义构建器
// ==========================================
// 职责: 单起始股道 → 单目的股道, 编组按原序整体回送
// ==========================================

use crate::config::GenerationSettings;
use crate::domain::job::{JobBasePayload, JobDefinition, JobPayload, StationsChainData};
use crate::domain::types::{CarType, JobKind};
use crate::domain::yard::{Car, Station, Track};
use crate::engine::context::GenerationContext;
use crate::engine::error::{BuildError, BuildResult, ConfigurationError};
use crate::engine::oracle::{
    extract_payment_calculation_data, licenses_for_car_types, train_length_m,
};
use tracing::{debug, error};

// ==========================================
// EmptyHaulJobBuilder - 空驶回送构建器
// ==========================================

/// 空驶回送作业定义构建器
///
/// 流式配置, 字段可按任意顺序设置; 校验只在
/// validate()/build() 时进行
#[derive(Debug, Clone, Default)]
pub struct EmptyHaulJobBuilder {
    origin: Option<Station>,
    destination: Option<Station>,
    start_track: Option<Track>,
    end_track: Option<Track>,
    car_types: Vec<CarType>,
}

/// validate() 产出的已解析配置视图
struct ResolvedEmptyHaul<'a> {
    origin: &'a Station,
    destination: &'a Station,
    start_track: &'a Track,
    end_track: &'a Track,
    car_types: &'a [CarType],
}

impl EmptyHaulJobBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================
    // 流式配置
    // ==========================================

    pub fn start_at(mut self, station: &Station, storage_track: &Track) -> Self {
        self.origin = Some(station.clone());
        self.start_track = Some(storage_track.clone());
        self
    }

    pub fn end_at(mut self, station: &Station, storage_track: &Track) -> Self {
        self.destination = Some(station.clone());
        self.end_track = Some(storage_track.clone());
        self
    }

    pub fn couple<I>(mut self, car_types: I) -> Self
    where
        I: IntoIterator<Item = CarType>,
    {
        self.car_types = car_types.into_iter().collect();
        self
    }

    /// couple 的别名, 读起来更贴近回送语义
    pub fn haul<I>(self, car_types: I) -> Self
    where
        I: IntoIterator<Item = CarType>,
    {
        self.couple(car_types)
    }

    // ==========================================
    // 校验与构建
    // ==========================================

    fn resolve(&self) -> Result<ResolvedEmptyHaul<'_>, ConfigurationError> {
        let origin = self
            .origin
            .as_ref()
            .ok_or(ConfigurationError::MissingField("origin"))?;
        let destination = self
            .destination
            .as_ref()
            .ok_or(ConfigurationError::MissingField("destination"))?;
        let start_track = self
            .start_track
            .as_ref()
            .ok_or(ConfigurationError::MissingField("start_track"))?;
        let end_track = self
            .end_track
            .as_ref()
            .ok_or(ConfigurationError::MissingField("end_track"))?;
        if self.car_types.is_empty() {
            return Err(ConfigurationError::EmptyConsist);
        }
        Ok(ResolvedEmptyHaul {
            origin,
            destination,
            start_track,
            end_track,
            car_types: &self.car_types,
        })
    }

    /// 纯校验, 可重复调用, 无副作用
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.resolve().map(|_| ())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// 编组总长 (米), 展示与配模校验用
    pub fn train_length_m(&self, settings: &GenerationSettings) -> f64 {
        train_length_m(&self.car_types, settings)
    }

    /// 构建不可变作业定义
    ///
    /// # 参数
    /// - cars: 已生成车辆, 与车型列表按位对齐
    pub fn build(&self, ctx: &GenerationContext, cars: &[Car]) -> BuildResult<JobDefinition> {
        if cars.len() != self.car_types.len() {
            error!(
                spawned = cars.len(),
                expected = self.car_types.len(),
                "已生成车辆数量与车型数量不一致"
            );
            return Err(BuildError::CountMismatch {
                spawned: cars.len(),
                expected: self.car_types.len(),
            });
        }
        let cfg = self.resolve()?;

        let payment = ctx.payment();
        let distance_m = payment.distance_between_stations(cfg.origin, cfg.destination);
        let bonus_time_limit_s = payment.haul_bonus_time_limit(distance_m);
        let data = extract_payment_calculation_data(cfg.car_types, &[]);
        let initial_wage = payment.job_payment(JobKind::EmptyHaul, distance_m, &data);

        let licenses = ctx.licenses();
        let required_licenses = licenses.for_job_kind(JobKind::EmptyHaul)
            | licenses_for_car_types(licenses, cfg.car_types)
            | licenses.for_car_count(cfg.car_types.len());

        debug!(
            origin = %cfg.origin,
            destination = %cfg.destination,
            cars = cars.len(),
            wage = initial_wage,
            "空驶回送作业定义构建完成"
        );

        Ok(JobDefinition {
            kind: JobKind::EmptyHaul,
            base: JobBasePayload {
                logic_yard_id: cfg.origin.yard_id.clone(),
                bonus_time_limit_s,
                initial_wage,
                chain_data: StationsChainData::new(&cfg.origin.yard_id, &cfg.destination.yard_id),
                required_licenses,
            },
            payload: JobPayload::EmptyHaul {
                starting_track: cfg.start_track.clone(),
                destination_track: cfg.end_track.clone(),
                consist: cars.to_vec(),
            },
        })
    }
}
