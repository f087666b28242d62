// ==========================================
// 铁路货运作业链生成系统 - 作业领域模型
// ==========================================
// 依据: JobGen_Core_Spec_v0.2.md - §3 数据模型 / §4.3 作业链
// ==========================================
// 职责: 定义不可变作业定义、分组结构与作业链容器
// 红线: 作业定义一经构建不再修改, 链构建失败不得外泄部分状态
// ==========================================

use crate::domain::types::{CargoType, JobKind, JobLicenses};
use crate::domain::yard::{Car, Track, WarehouseMachine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use tracing::info;
use uuid::Uuid;

// ==========================================
// TrackIndexAssignment - 股道索引分配
// ==========================================
// 股道 → 车型列表索引, 保持插入顺序
// 不变式: 全部索引列表恰好覆盖 0..car_types.len() 各一次
pub type TrackIndexAssignment = Vec<(Track, Vec<usize>)>;

// ==========================================
// StationsChainData - 链两端场站
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationsChainData {
    pub origin_yard_id: String,      // 起点场站
    pub destination_yard_id: String, // 终点场站
}

impl StationsChainData {
    pub fn new(origin_yard_id: &str, destination_yard_id: &str) -> Self {
        Self {
            origin_yard_id: origin_yard_id.to_string(),
            destination_yard_id: destination_yard_id.to_string(),
        }
    }
}

// ==========================================
// CarsPerCargoType - 按货物类型分组
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarsPerCargoType {
    pub cargo_type: CargoType, // 货物类型
    pub cars: Vec<Car>,        // 装载该货物的车辆 (保持出现顺序)
    pub total_amount: f64,     // 货量合计
}

// ==========================================
// CarsPerTrack - 按股道分组
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarsPerTrack {
    pub track: Track,   // 股道
    pub cars: Vec<Car>, // 该股道上的车辆 (按索引给定顺序)
}

// ==========================================
// JobBasePayload - 作业定义公共字段
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobBasePayload {
    pub logic_yard_id: String,          // 发布作业的场站
    pub bonus_time_limit_s: f64,        // 奖励时限 (秒)
    pub initial_wage: f64,              // 初始报酬
    pub chain_data: StationsChainData,  // 链两端场站
    pub required_licenses: JobLicenses, // 所需执照集合
}

// ==========================================
// JobPayload - 按作业类型区分的载荷
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JobPayload {
    /// 空驶回送: 编组按原序整体移动
    EmptyHaul {
        starting_track: Track,
        destination_track: Track,
        consist: Vec<Car>,
    },
    /// 货运运输: 货物数组与编组按位对齐
    Transport {
        starting_track: Track,
        destination_track: Track,
        consist: Vec<Car>,
        cargo_per_car: Vec<CargoType>,
        amount_per_car: Vec<f64>,
        force_correct_cargo_state: bool,
    },
    /// 调车装货: 多起始股道汇集到单一出发股道
    ShuntingLoad {
        cars_per_start_track: Vec<CarsPerTrack>,
        load_machine: WarehouseMachine,
        load_data: Vec<CarsPerCargoType>,
        destination_track: Track,
        force_correct_cargo_state: bool,
    },
    /// 调车卸货: 单一到达股道分散到多目的股道
    ShuntingUnload {
        starting_track: Track,
        unload_machine: WarehouseMachine,
        unload_data: Vec<CarsPerCargoType>,
        cars_per_destination_track: Vec<CarsPerTrack>,
        force_correct_cargo_state: bool,
    },
}

// ==========================================
// JobDefinition - 不可变作业定义
// ==========================================
// 构建时一次性产出, 归属于作业链后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDefinition {
    pub kind: JobKind,        // 作业类型
    pub base: JobBasePayload, // 公共字段
    pub payload: JobPayload,  // 类型载荷
}

impl JobDefinition {
    /// 作业涉及的车辆总数
    pub fn car_count(&self) -> usize {
        match &self.payload {
            JobPayload::EmptyHaul { consist, .. } => consist.len(),
            JobPayload::Transport { consist, .. } => consist.len(),
            JobPayload::ShuntingLoad {
                cars_per_start_track,
                ..
            } => cars_per_start_track.iter().map(|g| g.cars.len()).sum(),
            JobPayload::ShuntingUnload {
                cars_per_destination_track,
                ..
            } => cars_per_destination_track
                .iter()
                .map(|g| g.cars.len())
                .sum(),
        }
    }
}

// ==========================================
// ChainState - 链状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChainState {
    Assembling, // 组装中 (构建器内部)
    Live,       // 已生效 (首个作业可接取)
}

impl fmt::Display for ChainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainState::Assembling => write!(f, "ASSEMBLING"),
            ChainState::Live => write!(f, "LIVE"),
        }
    }
}

// ==========================================
// JobChain - 作业链
// ==========================================
// 生命周期: 工厂创建(空) → 按序附加定义 → finalize 生效
// 构建失败时整条链随构建器丢弃, 不存在部分构建的外部可见状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobChain {
    pub chain_id: Uuid,                // 链ID
    pub label: String,                 // 链标签 (用于宿主显示)
    pub parent_yard_id: String,        // 触发生成的场站
    pub chain_data: StationsChainData, // 链两端场站
    pub created_at: DateTime<Utc>,     // 创建时间
    definitions: Vec<JobDefinition>,
    state: ChainState,
    current_job_index: Option<usize>,
}

impl JobChain {
    pub fn new(label: &str, parent_yard_id: &str, chain_data: StationsChainData) -> Self {
        Self {
            chain_id: Uuid::new_v4(),
            label: label.to_string(),
            parent_yard_id: parent_yard_id.to_string(),
            chain_data,
            created_at: Utc::now(),
            definitions: Vec::new(),
            state: ChainState::Assembling,
            current_job_index: None,
        }
    }

    /// 附加一个作业定义 (仅组装期调用)
    pub fn attach(&mut self, definition: JobDefinition) {
        self.definitions.push(definition);
    }

    /// 完成组装, 链生效并使首个作业可接取
    pub fn finalize(&mut self) {
        self.state = ChainState::Live;
        if !self.definitions.is_empty() {
            self.current_job_index = Some(0);
        }
        info!(
            chain = %self.label,
            jobs = self.definitions.len(),
            "作业链已生效"
        );
    }

    pub fn definitions(&self) -> &[JobDefinition] {
        &self.definitions
    }

    pub fn state(&self) -> ChainState {
        self.state
    }

    pub fn is_live(&self) -> bool {
        self.state == ChainState::Live
    }

    /// 当前可接取作业的序号
    pub fn current_job_index(&self) -> Option<usize> {
        self.current_job_index
    }

    /// 链摘要 (宿主侧展示与排障用)
    pub fn summary_json(&self) -> serde_json::Value {
        json!({
            "chain_id": self.chain_id,
            "label": self.label,
            "parent_yard_id": self.parent_yard_id,
            "origin": self.chain_data.origin_yard_id,
            "destination": self.chain_data.destination_yard_id,
            "state": self.state,
            "job_kinds": self.definitions.iter().map(|d| d.kind.to_string()).collect::<Vec<_>>(),
            "total_wage": self.definitions.iter().map(|d| d.base.initial_wage).sum::<f64>(),
        })
    }
}

// ==========================================
// JobChainController - 链容器运行时行为
// ==========================================
// 工厂按起始作业类型选择具体实现, 协作方可注册新实现
pub trait JobChainController: fmt::Debug + Send {
    fn chain(&self) -> &JobChain;
    fn chain_mut(&mut self) -> &mut JobChain;

    /// 链上全部作业完成后, 宿主是否应自动生成空驶回送链
    fn generates_empty_haul_on_completion(&self) -> bool {
        false
    }
}

// ==========================================
// StandardChainController - 基础链容器
// ==========================================
// 用于空驶回送链
#[derive(Debug)]
pub struct StandardChainController {
    chain: JobChain,
}

impl StandardChainController {
    pub fn new(chain: JobChain) -> Self {
        Self { chain }
    }
}

impl JobChainController for StandardChainController {
    fn chain(&self) -> &JobChain {
        &self.chain
    }

    fn chain_mut(&mut self) -> &mut JobChain {
        &mut self.chain
    }
}

// ==========================================
// EmptyHaulAppendingController - 带回送生成的链容器
// ==========================================
// 用于载货链: 完成后宿主在终点生成空驶回送
#[derive(Debug)]
pub struct EmptyHaulAppendingController {
    chain: JobChain,
}

impl EmptyHaulAppendingController {
    pub fn new(chain: JobChain) -> Self {
        Self { chain }
    }
}

impl JobChainController for EmptyHaulAppendingController {
    fn chain(&self) -> &JobChain {
        &self.chain
    }

    fn chain_mut(&mut self) -> &mut JobChain {
        &mut self.chain
    }

    fn generates_empty_haul_on_completion(&self) -> bool {
        true
    }
}
