// ==========================================
// 铁路货运作业链生成系统 - 车辆聚合工具
// ==========================================
// 依据: JobGen_Core_Spec_v0.2.md - §4.2 聚合算法
// ==========================================
// 职责: 平铺的车辆/货物/股道数据 → 分组结构
// 红线: 纯函数, 无状态, 各构建器共用
// ==========================================

use crate::domain::job::{CarsPerCargoType, CarsPerTrack, TrackIndexAssignment};
use crate::domain::types::CargoType;
use crate::domain::yard::Car;
use crate::engine::error::{BuildError, BuildResult, ConfigurationError};
use tracing::{error, warn};

/// 校验股道索引分配对车型范围的精确划分
///
/// 不变式: 全部索引列表合并后恰好覆盖 0..car_count 各一次
/// (无重复、无遗漏、无越界)
pub fn validate_track_partition(
    assignment: &TrackIndexAssignment,
    car_count: usize,
) -> Result<(), ConfigurationError> {
    if assignment.is_empty() {
        return Err(ConfigurationError::MissingField("track_assignment"));
    }

    let mut seen = vec![false; car_count];
    let mut assigned = 0usize;
    for (_, indices) in assignment {
        for &index in indices {
            if index >= car_count {
                return Err(ConfigurationError::TrackIndexOutOfRange { index, car_count });
            }
            if seen[index] {
                return Err(ConfigurationError::DuplicateTrackIndex { index });
            }
            seen[index] = true;
            assigned += 1;
        }
    }
    if assigned != car_count {
        return Err(ConfigurationError::IncompleteTrackPartition {
            assigned,
            car_count,
        });
    }
    Ok(())
}

/// 按货物类型分组
///
/// 三个输入序列按位对齐; 每种货物类型产出一组,
/// 组内车辆保持出现顺序, 货量取合计
///
/// # 返回
/// - Ok: 按货物类型首次出现顺序排列的分组
/// - Err(CountMismatch): 三个序列长度不一致
pub fn group_by_cargo_type(
    cars: &[Car],
    cargo_types: &[CargoType],
    cargo_amounts: &[f64],
) -> BuildResult<Vec<CarsPerCargoType>> {
    if cars.len() != cargo_types.len() || cargo_types.len() != cargo_amounts.len() {
        error!(
            cars = cars.len(),
            cargo_types = cargo_types.len(),
            cargo_amounts = cargo_amounts.len(),
            "车辆/货物类型/货物数量序列长度不一致"
        );
        return Err(BuildError::CountMismatch {
            spawned: cars.len(),
            expected: cargo_types.len(),
        });
    }

    let mut groups: Vec<CarsPerCargoType> = Vec::new();

    for ((car, cargo_type), amount) in cars.iter().zip(cargo_types).zip(cargo_amounts) {
        match groups.iter_mut().find(|g| g.cargo_type == *cargo_type) {
            Some(group) => {
                group.cars.push(car.clone());
                group.total_amount += amount;
            }
            None => groups.push(CarsPerCargoType {
                cargo_type: *cargo_type,
                cars: vec![car.clone()],
                total_amount: *amount,
            }),
        }
    }

    Ok(groups)
}

/// 按股道分组
///
/// 每条股道按其索引列表给定的顺序取车辆
///
/// # 返回
/// - Ok: 按分配表顺序排列的股道分组
/// - Err(IndexOutOfRange): 某索引超出车辆列表范围
///
/// 索引列表为空的股道记一条数据质量警告, 分组照常产出
pub fn group_by_track(
    cars: &[Car],
    assignment: &TrackIndexAssignment,
) -> BuildResult<Vec<CarsPerTrack>> {
    let mut groups: Vec<CarsPerTrack> = Vec::with_capacity(assignment.len());

    for (track, indices) in assignment {
        if indices.is_empty() {
            warn!(track = %track, "股道分配的索引列表为空");
        }

        let mut grouped_cars = Vec::with_capacity(indices.len());
        for &index in indices {
            let Some(car) = cars.get(index) else {
                error!(index, len = cars.len(), "分组索引超出车辆列表范围");
                return Err(BuildError::IndexOutOfRange {
                    index,
                    len: cars.len(),
                });
            };
            grouped_cars.push(car.clone());
        }

        groups.push(CarsPerTrack {
            track: track.clone(),
            cars: grouped_cars,
        });
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CarType;
    use crate::domain::yard::Track;

    fn car(id: &str) -> Car {
        Car::new(id, CarType::Flatcar)
    }

    #[test]
    fn test_group_by_cargo_type() {
        let cars = vec![car("a"), car("b"), car("c")];
        let cargo_types = vec![CargoType::Steel, CargoType::Coal, CargoType::Steel];
        let amounts = vec![10.0, 5.0, 7.0];

        let groups = group_by_cargo_type(&cars, &cargo_types, &amounts).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].cargo_type, CargoType::Steel);
        assert_eq!(
            groups[0].cars.iter().map(|c| c.car_id.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
        assert_eq!(groups[0].total_amount, 17.0);
        assert_eq!(groups[1].cargo_type, CargoType::Coal);
        assert_eq!(groups[1].cars.len(), 1);
        assert_eq!(groups[1].total_amount, 5.0);
    }

    #[test]
    fn test_group_by_cargo_type_rejects_misaligned_inputs() {
        let cars = vec![car("a"), car("b")];
        let cargo_types = vec![CargoType::Steel];
        let amounts = vec![10.0, 5.0];

        let result = group_by_cargo_type(&cars, &cargo_types, &amounts);
        assert!(matches!(result, Err(BuildError::CountMismatch { .. })));
    }

    #[test]
    fn test_group_by_track_preserves_index_order() {
        let cars = vec![car("a"), car("b"), car("c"), car("d")];
        let t1 = Track::new("T1", "YA", 300.0);
        let t2 = Track::new("T2", "YA", 300.0);
        let assignment = vec![(t1.clone(), vec![0, 2]), (t2.clone(), vec![1, 3])];

        let groups = group_by_track(&cars, &assignment).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].track, t1);
        assert_eq!(
            groups[0].cars.iter().map(|c| c.car_id.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
        assert_eq!(groups[1].track, t2);
        assert_eq!(
            groups[1].cars.iter().map(|c| c.car_id.as_str()).collect::<Vec<_>>(),
            vec!["b", "d"]
        );
    }

    #[test]
    fn test_group_by_track_rejects_out_of_range_index() {
        let cars = vec![car("a"), car("b")];
        let assignment = vec![(Track::new("T1", "YA", 300.0), vec![0, 2])];

        let result = group_by_track(&cars, &assignment);
        assert!(matches!(
            result,
            Err(BuildError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_group_by_track_tolerates_empty_index_list() {
        let cars = vec![car("a")];
        let assignment = vec![
            (Track::new("T1", "YA", 300.0), vec![0]),
            (Track::new("T2", "YA", 300.0), vec![]),
        ];

        let groups = group_by_track(&cars, &assignment).unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups[1].cars.is_empty());
    }

    #[test]
    fn test_partition_accepts_exact_cover() {
        let t1 = Track::new("T1", "YA", 300.0);
        let t2 = Track::new("T2", "YA", 300.0);
        let assignment = vec![(t1, vec![0, 2]), (t2, vec![1, 3])];
        assert!(validate_track_partition(&assignment, 4).is_ok());
    }

    #[test]
    fn test_partition_rejects_duplicate_missing_and_out_of_range() {
        let t1 = Track::new("T1", "YA", 300.0);
        let t2 = Track::new("T2", "YA", 300.0);

        // 重复索引
        let duplicated = vec![(t1.clone(), vec![0, 0]), (t2.clone(), vec![1, 2])];
        assert_eq!(
            validate_track_partition(&duplicated, 4),
            Err(ConfigurationError::DuplicateTrackIndex { index: 0 })
        );

        // 遗漏索引
        let incomplete = vec![(t1.clone(), vec![0]), (t2.clone(), vec![1])];
        assert_eq!(
            validate_track_partition(&incomplete, 4),
            Err(ConfigurationError::IncompleteTrackPartition {
                assigned: 2,
                car_count: 4
            })
        );

        // 越界索引
        let out_of_range = vec![(t1, vec![0, 1]), (t2, vec![2, 4])];
        assert_eq!(
            validate_track_partition(&out_of_range, 4),
            Err(ConfigurationError::TrackIndexOutOfRange {
                index: 4,
                car_count: 4
            })
        );

        // 未提供分配表
        assert_eq!(
            validate_track_partition(&vec![], 4),
            Err(ConfigurationError::MissingField("track_assignment"))
        );
    }
}
