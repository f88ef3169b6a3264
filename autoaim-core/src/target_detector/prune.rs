use super::config::{DetectionConfig, TeamColor};
use super::target::DetectedTargetRegion;

pub struct PruneResult {
    pub targets: Vec<DetectedTargetRegion>,
    pub size_rejection_count: usize,
}

/// Drops regions matching our own team color outright (they are never
/// enemy plates). Among the rest, drops anything smaller than the
/// configured minimum width/height, counting rejections for diagnostics.
pub fn prune_invalid_targets(
    regions: &[DetectedTargetRegion],
    current_team_color: TeamColor,
    config: &DetectionConfig,
) -> PruneResult {
    let mut targets = Vec::new();
    let mut size_rejection_count = 0;

    for region in regions {
        if region.color == current_team_color {
            continue;
        }
        if region.rect.width < config.minimum_width || region.rect.height < config.minimum_height {
            size_rejection_count += 1;
            continue;
        }
        targets.push(*region);
    }

    PruneResult {
        targets,
        size_rejection_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target_detector::IntRectangle;

    fn config() -> DetectionConfig {
        DetectionConfig {
            minimum_width: 10,
            minimum_height: 10,
            depth_stddev_per_meter: 0.01,
            position_stddev_per_meter: 0.01,
            iou_threshold: 0.3,
        }
    }

    fn region(color: TeamColor, width: u32, height: u32) -> DetectedTargetRegion {
        DetectedTargetRegion {
            confidence: 0.9,
            color,
            rect: IntRectangle {
                x: 0,
                y: 0,
                width,
                height,
            },
        }
    }

    #[test]
    fn own_color_is_never_a_candidate() {
        let regions = vec![region(TeamColor::Red, 50, 50)];
        let result = prune_invalid_targets(&regions, TeamColor::Red, &config());
        assert!(result.targets.is_empty());
        assert_eq!(result.size_rejection_count, 0);
    }

    #[test]
    fn undersized_enemy_region_is_counted_and_dropped() {
        let regions = vec![region(TeamColor::Blue, 2, 2)];
        let result = prune_invalid_targets(&regions, TeamColor::Red, &config());
        assert!(result.targets.is_empty());
        assert_eq!(result.size_rejection_count, 1);
    }

    #[test]
    fn well_sized_enemy_region_survives() {
        let regions = vec![region(TeamColor::Blue, 50, 50)];
        let result = prune_invalid_targets(&regions, TeamColor::Red, &config());
        assert_eq!(result.targets.len(), 1);
    }
}
