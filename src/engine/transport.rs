// ==========================================
// 铁路货运作业链生成系统 - 货运运输构建器
// ==========================================
// 依据: JobGen_Core_Spec_v0.2.md - §4.1 作业定义构建器
// ==========================================
// 职责: 单起始股道 → 单目的股道, 货物数组与编组按位对齐透传
// ==========================================

use crate::config::GenerationSettings;
use crate::domain::job::{JobBasePayload, JobDefinition, JobPayload, StationsChainData};
use crate::domain::types::{CarType, CargoType, JobKind};
use crate::domain::yard::{Car, Station, Track};
use crate::engine::context::GenerationContext;
use crate::engine::error::{BuildError, BuildResult, ConfigurationError};
use crate::engine::oracle::{extract_payment_calculation_data, train_length_m};
use tracing::{debug, error};

// ==========================================
// TransportJobBuilder - 货运运输构建器
// ==========================================

/// 货运运输作业定义构建器
#[derive(Debug, Clone, Default)]
pub struct TransportJobBuilder {
    origin: Option<Station>,
    destination: Option<Station>,
    outbound_track: Option<Track>,
    inbound_track: Option<Track>,
    car_types: Vec<CarType>,
    cargo_types: Vec<CargoType>,
    cargo_amounts: Vec<f64>,
}

struct ResolvedTransport<'a> {
    origin: &'a Station,
    destination: &'a Station,
    outbound_track: &'a Track,
    inbound_track: &'a Track,
    car_types: &'a [CarType],
    cargo_types: &'a [CargoType],
    cargo_amounts: &'a [f64],
}

impl TransportJobBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================
    // 流式配置
    // ==========================================

    pub fn start_at(mut self, station: &Station, outbound_track: &Track) -> Self {
        self.origin = Some(station.clone());
        self.outbound_track = Some(outbound_track.clone());
        self
    }

    pub fn end_at(mut self, station: &Station, inbound_track: &Track) -> Self {
        self.destination = Some(station.clone());
        self.inbound_track = Some(inbound_track.clone());
        self
    }

    pub fn couple<I>(mut self, car_types: I) -> Self
    where
        I: IntoIterator<Item = CarType>,
    {
        self.car_types = car_types.into_iter().collect();
        self
    }

    pub fn carrying<I>(mut self, cargo_types: I) -> Self
    where
        I: IntoIterator<Item = CargoType>,
    {
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

    /// 一次设置编组、货物与货量
    pub fn haul<C, G, A>(self, car_types: C, cargo_types: G, cargo_amounts: A) -> Self
    where
        C: IntoIterator<Item = CarType>,
        G: IntoIterator<Item = CargoType>,
        A: IntoIterator<Item = f64>,
    {
        self.couple(car_types)
            .carrying(cargo_types)
            .of_quantity(cargo_amounts)
    }

    // ==========================================
    // 校验与构建
    // ==========================================

    fn resolve(&self) -> Result<ResolvedTransport<'_>, ConfigurationError> {
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
        let inbound_track = self
            .inbound_track
            .as_ref()
            .ok_or(ConfigurationError::MissingField("inbound_track"))?;
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
        Ok(ResolvedTransport {
            origin,
            destination,
            outbound_track,
            inbound_track,
            car_types: &self.car_types,
            cargo_types: &self.cargo_types,
            cargo_amounts: &self.cargo_amounts,
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

        let payment = ctx.payment();
        let distance_m = payment.distance_between_stations(cfg.origin, cfg.destination);
        let bonus_time_limit_s = payment.haul_bonus_time_limit(distance_m);
        let data = extract_payment_calculation_data(cfg.car_types, cfg.cargo_types);
        let initial_wage = payment.job_payment(JobKind::Transport, distance_m, &data);

        let licenses = ctx.licenses();
        let required_licenses = licenses.for_job_kind(JobKind::Transport)
            | licenses.for_cargo_types(cfg.cargo_types)
            | licenses.for_car_count(cfg.car_types.len());

        debug!(
            origin = %cfg.origin,
            destination = %cfg.destination,
            cars = cars.len(),
            wage = initial_wage,
            "货运运输作业定义构建完成"
        );

        Ok(JobDefinition {
            kind: JobKind::Transport,
            base: JobBasePayload {
                logic_yard_id: cfg.origin.yard_id.clone(),
                bonus_time_limit_s,
                initial_wage,
                chain_data: StationsChainData::new(&cfg.origin.yard_id, &cfg.destination.yard_id),
                required_licenses,
            },
            payload: JobPayload::Transport {
                starting_track: cfg.outbound_track.clone(),
                destination_track: cfg.inbound_track.clone(),
                consist: cars.to_vec(),
                cargo_per_car: cfg.cargo_types.to_vec(),
                amount_per_car: cfg.cargo_amounts.to_vec(),
                force_correct_cargo_state: true,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::JobLicenses;

    fn configured() -> TransportJobBuilder {
        let origin = Station::new("YA", "A站", 0.0, 0.0);
        let destination = Station::new("YB", "B站", 10_000.0, 0.0);
        TransportJobBuilder::new()
            .start_at(&origin, &Track::new("YA-O1", "YA", 500.0))
            .end_at(&destination, &Track::new("YB-I1", "YB", 500.0))
    }

    #[test]
    fn test_alignment_invariant() {
        // 货物类型数量与车型数量不一致时校验必须失败
        let builder = configured()
            .couple([CarType::Flatcar, CarType::Flatcar])
            .carrying([CargoType::Steel])
            .of_quantity([20.0, 20.0]);
        assert!(matches!(
            builder.validate(),
            Err(ConfigurationError::CargoMisaligned {
                car_types: 2,
                cargo_types: 1,
                cargo_amounts: 2
            })
        ));

        let builder = builder.carrying([CargoType::Steel, CargoType::Steel]);
        assert!(builder.is_valid());
    }

    #[test]
    fn test_build_passes_cargo_arrays_through() {
        let builder = configured().haul(
            [CarType::Flatcar, CarType::Flatcar],
            [CargoType::Steel, CargoType::Steel],
            [20.0, 20.0],
        );
        let ctx = GenerationContext::standard();
        let cars = vec![
            Car::new("car-1", CarType::Flatcar),
            Car::new("car-2", CarType::Flatcar),
        ];

        let definition = builder.build(&ctx, &cars).unwrap();
        assert_eq!(definition.kind, JobKind::Transport);
        assert!(definition
            .base
            .required_licenses
            .contains(JobLicenses::FREIGHT_HAUL));
        match &definition.payload {
            JobPayload::Transport {
                cargo_per_car,
                amount_per_car,
                force_correct_cargo_state,
                ..
            } => {
                assert_eq!(cargo_per_car, &vec![CargoType::Steel, CargoType::Steel]);
                assert_eq!(amount_per_car, &vec![20.0, 20.0]);
                assert!(force_correct_cargo_state);
            }
            other => panic!("意外的载荷类型: {:?}", other),
        }
    }

    #[test]
    fn test_hazmat_cargo_requires_license() {
        let builder = configured().haul(
            [CarType::TankChem, CarType::TankChem],
            [CargoType::Chemicals, CargoType::Chemicals],
            [15.0, 15.0],
        );
        let ctx = GenerationContext::standard();
        let cars = vec![
            Car::new("car-1", CarType::TankChem),
            Car::new("car-2", CarType::TankChem),
        ];

        let definition = builder.build(&ctx, &cars).unwrap();
        assert!(definition
            .base
            .required_licenses
            .contains(JobLicenses::HAZMAT_1 | JobLicenses::HAZMAT_2));
    }
}
