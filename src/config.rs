// ==========================================
// 铁路货运作业链生成系统 - 生成参数配置
// ==========================================
// 依据: Yard_Ops_Design_v1.1.md - 报酬与时限参数表
// ==========================================
// 职责: 集中管理默认报酬/时限推导所用的可调参数
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// GenerationSettings - 生成参数
// ==========================================

/// 作业生成参数
///
/// 默认实现的报酬/时限公式从这里取参数;
/// 宿主替换 Oracle 实现时可忽略本结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub average_haul_speed_mps: f64, // 干线平均运行速度 (米/秒)
    pub haul_bonus_time_factor: f64, // 奖励时限相对理论行车时间的放宽系数
    pub shunting_bonus_time_per_track_s: f64, // 调车作业每股道组的奖励时限 (秒)
    pub shunting_distance_per_track_m: f64, // 调车作业计价用的每股道组距离 (米)
    pub empty_haul_rate_per_km: f64, // 空驶回送每公里基础费率
    pub transport_rate_per_km: f64,  // 货运运输每公里基础费率
    pub shunting_rate_per_km: f64,   // 调车作业每公里基础费率
    pub wage_per_car_km: f64,        // 每车每公里附加费率
    pub wage_per_cargo_km: f64,      // 每件货物每公里附加费率
    pub car_separation_length_m: f64, // 车钩间隔长度 (米), 编组总长估算用
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            average_haul_speed_mps: 16.0,
            haul_bonus_time_factor: 1.5,
            shunting_bonus_time_per_track_s: 300.0,
            shunting_distance_per_track_m: 500.0,
            empty_haul_rate_per_km: 8.0,
            transport_rate_per_km: 12.0,
            shunting_rate_per_km: 20.0,
            wage_per_car_km: 2.0,
            wage_per_cargo_km: 1.0,
            car_separation_length_m: 1.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_positive() {
        let settings = GenerationSettings::default();
        assert!(settings.average_haul_speed_mps > 0.0);
        assert!(settings.shunting_distance_per_track_m > 0.0);
        assert!(settings.transport_rate_per_km > 0.0);
    }
}
