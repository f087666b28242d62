// ==========================================
// 铁路货运作业链生成系统 - 报酬与执照查询
// ==========================================
// 依据: JobGen_Core_Spec_v0.2.md - §6 外部接口
// 依据: Yard_Ops_Design_v1.1.md - 报酬与执照规则
// ==========================================
// 职责: 以纯函数接口消费报酬公式与执照对照表
// 红线: 查询无副作用, 相同输入产出相同结果
// ==========================================

use crate::config::GenerationSettings;
use crate::domain::types::{CarType, CargoType, ContainerType, JobKind, JobLicenses};
use crate::domain::yard::Station;
use std::collections::{HashMap, HashSet};

// ==========================================
// PaymentCalculationData - 计价编组构成
// ==========================================

/// 计价用的车型/货物构成统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentCalculationData {
    pub count_per_car_type: HashMap<CarType, usize>,
    pub count_per_cargo_type: HashMap<CargoType, usize>,
}

impl PaymentCalculationData {
    pub fn total_car_count(&self) -> usize {
        self.count_per_car_type.values().sum()
    }

    pub fn total_cargo_count(&self) -> usize {
        self.count_per_cargo_type.values().sum()
    }
}

/// 从平铺的车型/货物列表统计计价构成
pub fn extract_payment_calculation_data(
    car_types: &[CarType],
    cargo_types: &[CargoType],
) -> PaymentCalculationData {
    let mut data = PaymentCalculationData::default();
    for car_type in car_types {
        *data.count_per_car_type.entry(*car_type).or_insert(0) += 1;
    }
    for cargo_type in cargo_types {
        *data.count_per_cargo_type.entry(*cargo_type).or_insert(0) += 1;
    }
    data
}

/// 编组总长估算: 车体长度合计加车钩间隔
///
/// 仅用于展示与配模校验, 不参与构建成败判定
pub fn train_length_m(car_types: &[CarType], settings: &GenerationSettings) -> f64 {
    if car_types.is_empty() {
        return 0.0;
    }
    let body: f64 = car_types.iter().map(|c| c.length_m()).sum();
    let separations = (car_types.len() - 1) as f64;
    body + separations * settings.car_separation_length_m
}

// ==========================================
// PaymentOracle - 报酬/时限查询接口
// ==========================================

/// 报酬与时限公式 (宿主可替换)
pub trait PaymentOracle: Send + Sync {
    /// 两站之间的运输距离 (米)
    fn distance_between_stations(&self, origin: &Station, destination: &Station) -> f64;

    /// 干线作业奖励时限 (秒), 按站间距离推导
    fn haul_bonus_time_limit(&self, distance_m: f64) -> f64;

    /// 调车作业奖励时限 (秒), 按股道组数量推导
    fn shunting_bonus_time_limit(&self, track_group_count: usize) -> f64;

    /// 作业报酬, 按作业类型、距离与编组构成推导
    fn job_payment(&self, kind: JobKind, distance_m: f64, data: &PaymentCalculationData) -> f64;
}

// ==========================================
// LicenseOracle - 执照查询接口
// ==========================================

/// 执照对照表 (宿主可替换)
pub trait LicenseOracle: Send + Sync {
    /// 作业类型本身要求的执照
    fn for_job_kind(&self, kind: JobKind) -> JobLicenses;

    /// 一组货箱类型要求的执照
    fn for_container_types(&self, containers: &HashSet<ContainerType>) -> JobLicenses;

    /// 一组货物类型要求的执照
    fn for_cargo_types(&self, cargo_types: &[CargoType]) -> JobLicenses;

    /// 移动车辆数量门槛要求的执照
    fn for_car_count(&self, count: usize) -> JobLicenses;
}

/// 车型列表要求的执照: 先归并为货箱类型集合再查表
pub fn licenses_for_car_types(oracle: &dyn LicenseOracle, car_types: &[CarType]) -> JobLicenses {
    let containers: HashSet<ContainerType> =
        car_types.iter().map(|c| c.container_type()).collect();
    oracle.for_container_types(&containers)
}

// ==========================================
// StandardPaymentOracle - 默认报酬公式
// ==========================================

/// 默认报酬/时限实现, 参数来自 GenerationSettings
#[derive(Debug, Clone)]
pub struct StandardPaymentOracle {
    settings: GenerationSettings,
}

impl StandardPaymentOracle {
    pub fn new(settings: GenerationSettings) -> Self {
        Self { settings }
    }

    fn rate_per_km(&self, kind: JobKind) -> f64 {
        match kind {
            JobKind::EmptyHaul => self.settings.empty_haul_rate_per_km,
            JobKind::Transport => self.settings.transport_rate_per_km,
            JobKind::ShuntingLoad | JobKind::ShuntingUnload => self.settings.shunting_rate_per_km,
        }
    }
}

impl PaymentOracle for StandardPaymentOracle {
    fn distance_between_stations(&self, origin: &Station, destination: &Station) -> f64 {
        let dx = origin.position_x_m - destination.position_x_m;
        let dz = origin.position_z_m - destination.position_z_m;
        (dx * dx + dz * dz).sqrt()
    }

    fn haul_bonus_time_limit(&self, distance_m: f64) -> f64 {
        distance_m / self.settings.average_haul_speed_mps * self.settings.haul_bonus_time_factor
    }

    fn shunting_bonus_time_limit(&self, track_group_count: usize) -> f64 {
        self.settings.shunting_bonus_time_per_track_s * track_group_count as f64
    }

    fn job_payment(&self, kind: JobKind, distance_m: f64, data: &PaymentCalculationData) -> f64 {
        let distance_km = distance_m / 1000.0;
        let rate = self.rate_per_km(kind)
            + data.total_car_count() as f64 * self.settings.wage_per_car_km
            + data.total_cargo_count() as f64 * self.settings.wage_per_cargo_km;
        distance_km * rate
    }
}

// ==========================================
// StandardLicenseTable - 默认执照对照表
// ==========================================

// 数量门槛: 超过对应车数时要求更高一级编组执照
const TRAIN_LENGTH_1_THRESHOLD: usize = 4;
const TRAIN_LENGTH_2_THRESHOLD: usize = 8;

/// 默认执照对照表
#[derive(Debug, Clone, Default)]
pub struct StandardLicenseTable;

impl LicenseOracle for StandardLicenseTable {
    fn for_job_kind(&self, kind: JobKind) -> JobLicenses {
        match kind {
            JobKind::EmptyHaul => JobLicenses::LOGISTICAL_HAUL,
            JobKind::Transport => JobLicenses::FREIGHT_HAUL,
            JobKind::ShuntingLoad | JobKind::ShuntingUnload => JobLicenses::SHUNTING,
        }
    }

    fn for_container_types(&self, containers: &HashSet<ContainerType>) -> JobLicenses {
        let mut licenses = JobLicenses::NONE;
        if containers.contains(&ContainerType::Liquid) {
            licenses |= JobLicenses::HAZMAT_1;
        }
        licenses
    }

    fn for_cargo_types(&self, cargo_types: &[CargoType]) -> JobLicenses {
        let mut licenses = JobLicenses::NONE;
        for cargo in cargo_types {
            match cargo {
                CargoType::Oil | CargoType::Diesel => licenses |= JobLicenses::HAZMAT_1,
                CargoType::Chemicals => {
                    licenses |= JobLicenses::HAZMAT_1 | JobLicenses::HAZMAT_2
                }
                _ => {}
            }
        }
        licenses
    }

    fn for_car_count(&self, count: usize) -> JobLicenses {
        if count > TRAIN_LENGTH_2_THRESHOLD {
            JobLicenses::TRAIN_LENGTH_1 | JobLicenses::TRAIN_LENGTH_2
        } else if count > TRAIN_LENGTH_1_THRESHOLD {
            JobLicenses::TRAIN_LENGTH_1
        } else {
            JobLicenses::NONE
        }
    }
}
