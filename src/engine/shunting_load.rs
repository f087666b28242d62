// ==========================================
// 铁路货运作业链生成系统 - 调车装货构建器
// ==========================================
// 依据: JobGen_Core_Spec_v0.2.md - §4.1 作业定义构建器
// ==========================================
// 职责: 多起始股道取车 → 仓库装货 → 汇集到单一出发股道
// ==========================================

use crate::config::GenerationSettings;
use crate::domain::job::{
    JobBasePayload, JobDefinition, JobPayload, StationsChainData, TrackIndexAssignment,
};
use crate::domain::types::{CarType, CargoType, JobKind};
use crate::domain::yard::{Car, Station, Track, WarehouseMachine};
use crate::engine::aggregation::{group_by_cargo_type, group_by_track, validate_track_partition};
use crate::engine::context::GenerationContext;
use crate::engine::error::{BuildError, BuildResult, ConfigurationError};
use crate::engine::oracle::{extract_payment_calculation_data, train_length_m};
use tracing::{debug, error};

// ==========================================
// ShuntingLoadJobBuilder - 调车装货构建器
// ==========================================

/// 调车装货作业定义构建器
#[derive(Debug, Clone, Default)]
pub struct ShuntingLoadJobBuilder {
    origin: Option<Station>,
    destination: Option<Station>,
    outbound_track: Option<Track>,
    warehouse: Option<WarehouseMachine>,
    car_types: Vec<CarType>,
    cargo_types: Vec<CargoType>,
    cargo_amounts: Vec<f64>,
    start_track_assignment: TrackIndexAssignment,
}

struct ResolvedShuntingLoad<'a> {
    origin: &'a Station,
    destination: &'a Station,
    outbound_track: &'a Track,
    warehouse: &'a WarehouseMachine,
    car_types: &'a [CarType],
    cargo_types: &'a [CargoType],
    cargo_amounts: &'a [f64],
    start_track_assignment: &'a TrackIndexAssignment,
}

impl ShuntingLoadJobBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================
    // 流式配置
    // ==========================================

    pub fn start_at(mut self, station: &Station) -> Self {
        self.origin = Some(station.clone());
        self
    }

    pub fn end_at(mut self, station: &Station, outbound_track: &Track) -> Self {
        self.destination = Some(station.clone());
        self.outbound_track = Some(outbound_track.clone());
        self
    }

    pub fn couple<I>(mut self, car_types: I) -> Self
    where
        I: IntoIterator<Item = CarType>,
    {
        self.car_types = car_types.into_iter().collect();
        self
    }

    /// 起始股道分配: 股道 → 车型索引列表
    pub fn on_tracks(mut self, assignment: TrackIndexAssignment) -> Self {
        self.start_track_assignment = assignment;
        self
    }

    pub fn load<I>(mut self, warehouse: &WarehouseMachine, cargo_types: I) -> Self
    where
        I: IntoIterator<Item = CargoType>,
    {
        self.warehouse = Some(warehouse.clone());
        self.cargo_types = cargo_types.into_iter().collect();
        self
    }

    pub fn of_quantity<I>(mut self, cargo_amounts: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        self.cargo_amounts = cargo_amounts.into_iter().collect();
        self
    }

    /// 一次设置编组、货物、货量与装货机
    pub fn shunt<C, G, A>(
        self,
        car_types: C,
        cargo_types: G,
        cargo_amounts: A,
        warehouse: &WarehouseMachine,
    ) -> Self
    where
        C: IntoIterator<Item = CarType>,
        G: IntoIterator<Item = CargoType>,
        A: IntoIterator<Item = f64>,
    {
        let cargo: Vec<CargoType> = cargo_types.into_iter().collect();
        self.couple(car_types)
            .load(warehouse, cargo)
            .of_quantity(cargo_amounts)
    }

    // ==========================================
    // 校验与构建
    // ==========================================

    fn resolve(&self) -> Result<ResolvedShuntingLoad<'_>, ConfigurationError> {
        let origin = self
            .origin
            .as_ref()
            .ok_or(ConfigurationError::MissingField("origin"))?;
        let destination = self
            .destination
            .as_ref()
            .ok_or(ConfigurationError::MissingField("destination"))?;
        let outbound_track = self
            .outbound_track
            .as_ref()
            .ok_or(ConfigurationError::MissingField("outbound_track"))?;
        let warehouse = self
            .warehouse
            .as_ref()
            .ok_or(ConfigurationError::MissingField("warehouse"))?;
        if self.car_types.is_empty() {
            return Err(ConfigurationError::EmptyConsist);
        }
        if self.cargo_types.len() != self.car_types.len()
            || self.cargo_amounts.len() != self.car_types.len()
        {
            return Err(ConfigurationError::CargoMisaligned {
                car_types: self.car_types.len(),
                cargo_types: self.cargo_types.len(),
                cargo_amounts: self.cargo_amounts.len(),
            });
        }
        validate_track_partition(&self.start_track_assignment, self.car_types.len())?;
        Ok(ResolvedShuntingLoad {
            origin,
            destination,
            outbound_track,
            warehouse,
            car_types: &self.car_types,
            cargo_types: &self.cargo_types,
            cargo_amounts: &self.cargo_amounts,
            start_track_assignment: &self.start_track_assignment,
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

        // 调车作业按股道组数量计时计价
        let track_group_count = cfg.start_track_assignment.len();
        let payment = ctx.payment();
        let bonus_time_limit_s = payment.shunting_bonus_time_limit(track_group_count);
        let distance_m =
            ctx.settings().shunting_distance_per_track_m * track_group_count as f64;
        let data = extract_payment_calculation_data(cfg.car_types, cfg.cargo_types);
        let initial_wage = payment.job_payment(JobKind::ShuntingLoad, distance_m, &data);

        let licenses = ctx.licenses();
        let required_licenses = licenses.for_job_kind(JobKind::ShuntingLoad)
            | licenses.for_cargo_types(cfg.cargo_types)
            | licenses.for_car_count(cfg.car_types.len());

        let cars_per_start_track = group_by_track(cars, cfg.start_track_assignment)?;
        let load_data = group_by_cargo_type(cars, cfg.cargo_types, cfg.cargo_amounts)?;

        debug!(
            origin = %cfg.origin,
            destination = %cfg.destination,
            track_groups = track_group_count,
            wage = initial_wage,
            "调车装货作业定义构建完成"
        );

        Ok(JobDefinition {
            kind: JobKind::ShuntingLoad,
            base: JobBasePayload {
                logic_yard_id: cfg.origin.yard_id.clone(),
                bonus_time_limit_s,
                initial_wage,
                chain_data: StationsChainData::new(&cfg.origin.yard_id, &cfg.destination.yard_id),
                required_licenses,
            },
            payload: JobPayload::ShuntingLoad {
                cars_per_start_track,
                load_machine: cfg.warehouse.clone(),
                load_data,
                destination_track: cfg.outbound_track.clone(),
                force_correct_cargo_state: true,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::JobLicenses;

    fn warehouse() -> WarehouseMachine {
        WarehouseMachine::new("WH-1", "YA", vec![CargoType::Steel, CargoType::Coal])
    }

    fn configured() -> (ShuntingLoadJobBuilder, Track, Track) {
        let origin = Station::new("YA", "A站", 0.0, 0.0);
        let destination = Station::new("YB", "B站", 12_000.0, 0.0);
        let t1 = Track::new("YA-S1", "YA", 300.0);
        let t2 = Track::new("YA-S2", "YA", 300.0);
        let builder = ShuntingLoadJobBuilder::new()
            .start_at(&origin)
            .end_at(&destination, &Track::new("YA-O1", "YA", 600.0))
            .shunt(
                [CarType::Flatcar, CarType::Hopper, CarType::Flatcar],
                [CargoType::Steel, CargoType::Coal, CargoType::Steel],
                [10.0, 30.0, 10.0],
                &warehouse(),
            );
        (builder, t1, t2)
    }

    #[test]
    fn test_partition_invariant_gates_validity() {
        let (builder, t1, t2) = configured();

        // 未设置股道分配
        assert!(!builder.is_valid());

        // 精确划分
        let valid = builder
            .clone()
            .on_tracks(vec![(t1.clone(), vec![0, 2]), (t2.clone(), vec![1])]);
        assert!(valid.is_valid());

        // 重复索引
        let duplicated = builder
            .clone()
            .on_tracks(vec![(t1.clone(), vec![0, 0]), (t2.clone(), vec![1])]);
        assert!(matches!(
            duplicated.validate(),
            Err(ConfigurationError::DuplicateTrackIndex { index: 0 })
        ));

        // 越界索引
        let out_of_range = builder.on_tracks(vec![(t1, vec![0, 3]), (t2, vec![1])]);
        assert!(matches!(
            out_of_range.validate(),
            Err(ConfigurationError::TrackIndexOutOfRange { index: 3, .. })
        ));
    }

    #[test]
    fn test_build_groups_by_start_track() {
        let (builder, t1, t2) = configured();
        let builder = builder.on_tracks(vec![(t1.clone(), vec![0, 2]), (t2.clone(), vec![1])]);
        let ctx = GenerationContext::standard();
        let cars = vec![
            Car::new("car-1", CarType::Flatcar),
            Car::new("car-2", CarType::Hopper),
            Car::new("car-3", CarType::Flatcar),
        ];

        let definition = builder.build(&ctx, &cars).unwrap();
        assert_eq!(definition.kind, JobKind::ShuntingLoad);
        assert!(definition
            .base
            .required_licenses
            .contains(JobLicenses::SHUNTING));
        // 两个股道组, 奖励时限按组数推导
        let expected_bonus = ctx.payment().shunting_bonus_time_limit(2);
        assert_eq!(definition.base.bonus_time_limit_s, expected_bonus);

        match &definition.payload {
            JobPayload::ShuntingLoad {
                cars_per_start_track,
                load_data,
                ..
            } => {
                assert_eq!(cars_per_start_track.len(), 2);
                assert_eq!(
                    cars_per_start_track[0]
                        .cars
                        .iter()
                        .map(|c| c.car_id.as_str())
                        .collect::<Vec<_>>(),
                    vec!["car-1", "car-3"]
                );
                assert_eq!(cars_per_start_track[1].cars.len(), 1);

                // 装货数据按货物类型汇总
                assert_eq!(load_data.len(), 2);
                assert_eq!(load_data[0].cargo_type, CargoType::Steel);
                assert_eq!(load_data[0].total_amount, 20.0);
                assert_eq!(load_data[1].cargo_type, CargoType::Coal);
                assert_eq!(load_data[1].total_amount, 30.0);
            }
            other => panic!("意外的载荷类型: {:?}", other),
        }
    }
}
