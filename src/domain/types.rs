// ==========================================
// 铁路货运作业链生成系统 - 领域类型定义
// ==========================================
// 依据: JobGen_Core_Spec_v0.2.md - §3 数据模型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

// ==========================================
// 作业类型 (Job Kind)
// ==========================================
// 每条作业链由起始作业类型选择容器工厂
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobKind {
    EmptyHaul,      // 空驶回送
    ShuntingLoad,   // 调车装货
    ShuntingUnload, // 调车卸货
    Transport,      // 货运运输
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::EmptyHaul => write!(f, "EMPTY_HAUL"),
            JobKind::ShuntingLoad => write!(f, "SHUNTING_LOAD"),
            JobKind::ShuntingUnload => write!(f, "SHUNTING_UNLOAD"),
            JobKind::Transport => write!(f, "TRANSPORT"),
        }
    }
}

// ==========================================
// 车型 (Car Type)
// ==========================================
// 车型顺序即编组顺序,是股道/货物按位对齐的基础
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CarType {
    Flatcar,      // 平板车
    Boxcar,       // 棚车
    Refrigerator, // 冷藏车
    Gondola,      // 敞车
    Hopper,       // 漏斗车
    TankOil,      // 油罐车
    TankChem,     // 化学品罐车
}

impl CarType {
    /// 车型对应的货箱类型 (执照查询按货箱归类)
    pub fn container_type(&self) -> ContainerType {
        match self {
            CarType::Flatcar => ContainerType::Flatbed,
            CarType::Boxcar => ContainerType::Enclosed,
            CarType::Refrigerator => ContainerType::Chilled,
            CarType::Gondola => ContainerType::Open,
            CarType::Hopper => ContainerType::Bulk,
            CarType::TankOil => ContainerType::Liquid,
            CarType::TankChem => ContainerType::Liquid,
        }
    }

    /// 车体长度 (米), 用于编组总长估算
    pub fn length_m(&self) -> f64 {
        match self {
            CarType::Flatcar => 19.0,
            CarType::Boxcar => 16.5,
            CarType::Refrigerator => 17.0,
            CarType::Gondola => 14.5,
            CarType::Hopper => 15.0,
            CarType::TankOil => 14.0,
            CarType::TankChem => 14.0,
        }
    }
}

impl fmt::Display for CarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarType::Flatcar => write!(f, "FLATCAR"),
            CarType::Boxcar => write!(f, "BOXCAR"),
            CarType::Refrigerator => write!(f, "REFRIGERATOR"),
            CarType::Gondola => write!(f, "GONDOLA"),
            CarType::Hopper => write!(f, "HOPPER"),
            CarType::TankOil => write!(f, "TANK_OIL"),
            CarType::TankChem => write!(f, "TANK_CHEM"),
        }
    }
}

// ==========================================
// 货箱类型 (Container Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContainerType {
    Flatbed,  // 平板
    Enclosed, // 封闭
    Chilled,  // 冷藏
    Open,     // 敞开
    Bulk,     // 散装
    Liquid,   // 液体
}

// ==========================================
// 货物类型 (Cargo Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CargoType {
    Steel,      // 钢材
    Logs,       // 原木
    Lumber,     // 木材
    Coal,       // 煤炭
    IronOre,    // 铁矿石
    Foodstuffs, // 食品
    Oil,        // 原油
    Diesel,     // 柴油
    Chemicals,  // 化学品
    ScrapMetal, // 废钢
}

impl fmt::Display for CargoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CargoType::Steel => write!(f, "STEEL"),
            CargoType::Logs => write!(f, "LOGS"),
            CargoType::Lumber => write!(f, "LUMBER"),
            CargoType::Coal => write!(f, "COAL"),
            CargoType::IronOre => write!(f, "IRON_ORE"),
            CargoType::Foodstuffs => write!(f, "FOODSTUFFS"),
            CargoType::Oil => write!(f, "OIL"),
            CargoType::Diesel => write!(f, "DIESEL"),
            CargoType::Chemicals => write!(f, "CHEMICALS"),
            CargoType::ScrapMetal => write!(f, "SCRAP_METAL"),
        }
    }
}

// ==========================================
// 执照集合 (Job Licenses)
// ==========================================
// 位集: 作业类型、货物/货箱、车辆数量三类前置条件的并集
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobLicenses(u32);

impl JobLicenses {
    pub const NONE: JobLicenses = JobLicenses(0);
    pub const FREIGHT_HAUL: JobLicenses = JobLicenses(1 << 0); // 货运执照
    pub const LOGISTICAL_HAUL: JobLicenses = JobLicenses(1 << 1); // 回送执照
    pub const SHUNTING: JobLicenses = JobLicenses(1 << 2); // 调车执照
    pub const HAZMAT_1: JobLicenses = JobLicenses(1 << 3); // 危险品一级
    pub const HAZMAT_2: JobLicenses = JobLicenses(1 << 4); // 危险品二级
    pub const TRAIN_LENGTH_1: JobLicenses = JobLicenses(1 << 5); // 编组长度一级
    pub const TRAIN_LENGTH_2: JobLicenses = JobLicenses(1 << 6); // 编组长度二级

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// 是否包含另一执照集合的全部执照
    pub fn contains(&self, other: JobLicenses) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for JobLicenses {
    type Output = JobLicenses;

    fn bitor(self, rhs: JobLicenses) -> JobLicenses {
        JobLicenses(self.0 | rhs.0)
    }
}

impl BitOrAssign for JobLicenses {
    fn bitor_assign(&mut self, rhs: JobLicenses) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for JobLicenses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(u32, &str); 7] = [
            (1 << 0, "FREIGHT_HAUL"),
            (1 << 1, "LOGISTICAL_HAUL"),
            (1 << 2, "SHUNTING"),
            (1 << 3, "HAZMAT_1"),
            (1 << 4, "HAZMAT_2"),
            (1 << 5, "TRAIN_LENGTH_1"),
            (1 << 6, "TRAIN_LENGTH_2"),
        ];

        if self.is_empty() {
            return write!(f, "NONE");
        }

        let mut first = true;
        for (bit, name) in NAMES {
            if self.0 & bit != 0 {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_license_union() {
        let combined = JobLicenses::FREIGHT_HAUL | JobLicenses::HAZMAT_1;
        assert!(combined.contains(JobLicenses::FREIGHT_HAUL));
        assert!(combined.contains(JobLicenses::HAZMAT_1));
        assert!(!combined.contains(JobLicenses::SHUNTING));
    }

    #[test]
    fn test_license_display() {
        assert_eq!(JobLicenses::NONE.to_string(), "NONE");
        let combined = JobLicenses::SHUNTING | JobLicenses::TRAIN_LENGTH_1;
        assert_eq!(combined.to_string(), "SHUNTING|TRAIN_LENGTH_1");
    }

    #[test]
    fn test_tank_cars_share_liquid_container() {
        assert_eq!(CarType::TankOil.container_type(), ContainerType::Liquid);
        assert_eq!(CarType::TankChem.container_type(), ContainerType::Liquid);
        assert_ne!(CarType::Flatcar.container_type(), ContainerType::Liquid);
    }
}
