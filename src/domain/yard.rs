// ==========================================
// 铁路货运作业链生成系统 - 场站模型
// ==========================================
// 依据: JobGen_Core_Spec_v0.2.md - §6 外部接口
// ==========================================
// 职责: 以接口边界建模宿主模拟器对象 (车站/股道/仓库/车辆)
// 红线: 本库只读引用车辆列表,不接管生命周期
// ==========================================

use crate::domain::types::{CarType, CargoType};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Station - 车站
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub yard_id: String,    // 场站ID (链数据以此标识两端)
    pub name: String,       // 车站名称
    pub position_x_m: f64,  // 世界坐标 X (米)
    pub position_z_m: f64,  // 世界坐标 Z (米)
}

impl Station {
    pub fn new(yard_id: &str, name: &str, position_x_m: f64, position_z_m: f64) -> Self {
        Self {
            yard_id: yard_id.to_string(),
            name: name.to_string(),
            position_x_m,
            position_z_m,
        }
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.yard_id)
    }
}

// ==========================================
// Track - 股道
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub track_id: String, // 股道ID
    pub yard_id: String,  // 所属场站
    pub length_m: f64,    // 可用长度 (米)
}

impl Track {
    pub fn new(track_id: &str, yard_id: &str, length_m: f64) -> Self {
        Self {
            track_id: track_id.to_string(),
            yard_id: yard_id.to_string(),
            length_m,
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.track_id)
    }
}

// ==========================================
// WarehouseMachine - 仓库装卸机
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseMachine {
    pub machine_id: String,              // 装卸机ID
    pub yard_id: String,                 // 所属场站
    pub supported_cargo: Vec<CargoType>, // 可装卸的货物类型
}

impl WarehouseMachine {
    pub fn new(machine_id: &str, yard_id: &str, supported_cargo: Vec<CargoType>) -> Self {
        Self {
            machine_id: machine_id.to_string(),
            yard_id: yard_id.to_string(),
            supported_cargo,
        }
    }

    /// 是否支持装卸指定货物
    pub fn supports(&self, cargo: CargoType) -> bool {
        self.supported_cargo.contains(&cargo)
    }
}

// ==========================================
// Car - 已生成车辆句柄
// ==========================================
// 由调用方在物理生成车辆后提供,与车型列表按位对齐
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub car_id: String,    // 车辆ID
    pub car_type: CarType, // 车型
}

impl Car {
    pub fn new(car_id: &str, car_type: CarType) -> Self {
        Self {
            car_id: car_id.to_string(),
            car_type,
        }
    }
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.car_id)
    }
}
