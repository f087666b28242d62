// ==========================================
// 铁路货运作业链生成系统 - 调车卸货构建器
// ==========================================
// 依据: JobGen_Core_Spec_v0.2.md - §4.1 作业定义构建器
// ==========================================
// 职责: 单一到达股道取车 → 仓库卸货 → 分散到多目的股道
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
// ShuntingUnloadJobBuilder - 调车卸货构建器
// ==========================================

/// 调车卸货作业定义构建器
#[derive(Debug, Clone, Default)]
pub struct ShuntingUnloadJobBuilder {
    origin: Option<Station>,
    destination: Option<Station>,
    inbound_track: Option<Track>,
    warehouse: Option<WarehouseMachine>,
    car_types: Vec<CarType>,
    cargo_types: Vec<CargoType>,
    cargo_amounts: Vec<f64>,
    end_track_assignment: TrackIndexAssignment,
}

struct ResolvedShuntingUnload<'a> {
    origin: &'a Station,
    destination: &'a Station,
    inbound_track: &'a Track,
    warehouse: &'a WarehouseMachine,
    car_types: &'a [CarType],
    cargo_types: &'a [CargoType],
    cargo_amounts: &'a [f64],
    end_track_assignment: &'a TrackIndexAssignment,
}

impl ShuntingUnloadJobBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================
    // 流式配置
    // ==========================================

    pub fn start_at(mut self, station: &Station, inbound_track: &Track) -> Self {
        self.origin = Some(station.clone());
        self.inbound_track = Some(inbound_track.clone());
        self
    }

    pub fn end_at(mut self, station: &Station) -> Self {
        self.destination = Some(station.clone());
        self
    }

    pub fn couple<I>(mut self, car_types: I) -> Self
    where
        I: IntoIterator<Item = CarType>,
    {
        self.car_types = car_types.into_iter().collect();
        self
    }

    /// 目的股道分配: 股道 → 车型索引列表
    pub fn on_tracks(mut self, assignment: TrackIndexAssignment) -> Self {
        self.end_track_assignment = assignment;
        self
    }

    pub fn unload<I>(mut self, warehouse: &WarehouseMachine, cargo_types: I) -> Self
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

    /// 一次设置编组、货物、货量与卸货机
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
            .unload(warehouse, cargo)
            .of_quantity(cargo_amounts)
    }

    // ==========================================
    // 校验与构建
    // ==========================================

    fn resolve(&self) -> Result<ResolvedShuntingUnload<'_>, ConfigurationError> {
        let origin = self
            .origin
            .as_ref()
            .ok_or(ConfigurationError::MissingField("origin"))?;
        let destination = self
            .destination
            .as_ref()
            .ok_or(ConfigurationError::MissingField("destination"))?;
        let inbound_track = self
            .inbound_track
            .as_ref()
            .ok_or(ConfigurationError::MissingField("inbound_track"))?;
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
        validate_track_partition(&self.end_track_assignment, self.car_types.len())?;
        Ok(ResolvedShuntingUnload {
            origin,
            destination,
            inbound_track,
            warehouse,
            car_types: &self.car_types,
            cargo_types: &self.cargo_types,
            cargo_amounts: &self.cargo_amounts,
            end_track_assignment: &self.end_track_assignment,
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
    /// 卸货作业在终点场站发布
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

        let track_group_count = cfg.end_track_assignment.len();
        let payment = ctx.payment();
        let bonus_time_limit_s = payment.shunting_bonus_time_limit(track_group_count);
        let distance_m =
            ctx.settings().shunting_distance_per_track_m * track_group_count as f64;
        let data = extract_payment_calculation_data(cfg.car_types, cfg.cargo_types);
        let initial_wage = payment.job_payment(JobKind::ShuntingUnload, distance_m, &data);

        let licenses = ctx.licenses();
        let required_licenses = licenses.for_job_kind(JobKind::ShuntingUnload)
            | licenses.for_cargo_types(cfg.cargo_types)
            | licenses.for_car_count(cfg.car_types.len());

        let unload_data = group_by_cargo_type(cars, cfg.cargo_types, cfg.cargo_amounts)?;
        let cars_per_destination_track = group_by_track(cars, cfg.end_track_assignment)?;

        debug!(
            origin = %cfg.origin,
            destination = %cfg.destination,
            track_groups = track_group_count,
            wage = initial_wage,
            "调车卸货作业定义构建完成"
        );

        Ok(JobDefinition {
            kind: JobKind::ShuntingUnload,
            base: JobBasePayload {
                logic_yard_id: cfg.destination.yard_id.clone(),
                bonus_time_limit_s,
                initial_wage,
                chain_data: StationsChainData::new(&cfg.origin.yard_id, &cfg.destination.yard_id),
                required_licenses,
            },
            payload: JobPayload::ShuntingUnload {
                starting_track: cfg.inbound_track.clone(),
                unload_machine: cfg.warehouse.clone(),
                unload_data,
                cars_per_destination_track,
                force_correct_cargo_state: true,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> ShuntingUnloadJobBuilder {
        let origin = Station::new("YA", "A站", 0.0, 0.0);
        let destination = Station::new("YB", "B站", 9000.0, 0.0);
        let warehouse =
            WarehouseMachine::new("WH-2", "YB", vec![CargoType::Logs, CargoType::Lumber]);
        let t1 = Track::new("YB-S1", "YB", 300.0);
        let t2 = Track::new("YB-S2", "YB", 300.0);
        ShuntingUnloadJobBuilder::new()
            .start_at(&origin, &Track::new("YB-I1", "YB", 600.0))
            .end_at(&destination)
            .shunt(
                [CarType::Flatcar, CarType::Flatcar],
                [CargoType::Logs, CargoType::Lumber],
                [25.0, 15.0],
                &warehouse,
            )
            .on_tracks(vec![(t1, vec![1]), (t2, vec![0])])
    }

    #[test]
    fn test_definition_is_published_at_destination() {
        let ctx = GenerationContext::standard();
        let cars = vec![
            Car::new("car-1", CarType::Flatcar),
            Car::new("car-2", CarType::Flatcar),
        ];

        let definition = configured().build(&ctx, &cars).unwrap();
        assert_eq!(definition.kind, JobKind::ShuntingUnload);
        // 卸货作业挂在终点场站
        assert_eq!(definition.base.logic_yard_id, "YB");
        assert_eq!(definition.base.chain_data.origin_yard_id, "YA");
    }

    #[test]
    fn test_build_groups_by_destination_track_in_index_order() {
        let ctx = GenerationContext::standard();
        let cars = vec![
            Car::new("car-1", CarType::Flatcar),
            Car::new("car-2", CarType::Flatcar),
        ];

        let definition = configured().build(&ctx, &cars).unwrap();
        match &definition.payload {
            JobPayload::ShuntingUnload {
                cars_per_destination_track,
                unload_data,
                ..
            } => {
                assert_eq!(cars_per_destination_track.len(), 2);
                assert_eq!(cars_per_destination_track[0].cars[0].car_id, "car-2");
                assert_eq!(cars_per_destination_track[1].cars[0].car_id, "car-1");
                assert_eq!(unload_data.len(), 2);
            }
            other => panic!("意外的载荷类型: {:?}", other),
        }
    }

    #[test]
    fn test_validity_is_idempotent() {
        let builder = configured();
        let first = builder.is_valid();
        let second = builder.is_valid();
        let third = builder.is_valid();
        assert!(first && second && third);
    }
}
