use super::target::DetectedTargetRegion;

/// For every pair of distinct regions whose IoU is at least `iou_threshold`,
/// discards the one with the lower confidence.
pub fn non_max_suppressed(regions: &[DetectedTargetRegion], iou_threshold: f64) -> Vec<DetectedTargetRegion> {
    let mut discarded = vec![false; regions.len()];

    for i in 0..regions.len() {
        if discarded[i] {
            continue;
        }
        for j in (i + 1)..regions.len() {
            if discarded[j] {
                continue;
            }
            let iou = regions[i].rect.intersection_over_union(&regions[j].rect);
            if iou >= iou_threshold {
                if regions[i].confidence <= regions[j].confidence {
                    discarded[i] = true;
                    break;
                } else {
                    discarded[j] = true;
                }
            }
        }
    }

    regions
        .iter()
        .zip(discarded)
        .filter_map(|(r, d)| if d { None } else { Some(*r) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target_detector::{IntRectangle, TeamColor};

    fn region(confidence: f64, x: u32) -> DetectedTargetRegion {
        DetectedTargetRegion {
            confidence,
            color: TeamColor::Blue,
            rect: IntRectangle {
                x,
                y: 0,
                width: 20,
                height: 20,
            },
        }
    }

    #[test]
    fn keeps_highest_confidence_of_overlapping_pair() {
        let regions = vec![region(0.5, 0), region(0.9, 2)];
        let kept = non_max_suppressed(&regions, 0.3);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].confidence, 0.9);
    }

    #[test]
    fn keeps_both_non_overlapping_regions() {
        let regions = vec![region(0.5, 0), region(0.9, 100)];
        let kept = non_max_suppressed(&regions, 0.3);
        assert_eq!(kept.len(), 2);
    }
}
