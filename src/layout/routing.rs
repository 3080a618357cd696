//! Path routing between placed labels
//!
//! A route is a four-point polyline. Same-row paths jog up and over between
//! the facing edges of the two labels. Cross-row paths split into a segment
//! leaving the start label toward the nearer document margin and a segment
//! arriving at the end label from that margin; a synthesized connector
//! stitches the two along the margin so they read as one line.

use crate::measure::Extent;

use super::types::{BoundingBox, LabelBox, PathSegment, PathSpec, Point};

/// Length of an arrowhead flank in pixels
const ARROW_TIP_LENGTH: f64 = 12.0;

/// Half-opening of the arrowhead in degrees
const ARROW_TIP_SPREAD: f64 = 20.0;

/// Incidence angle beyond which the outer arrow flank folds across the
/// vertical instead of trailing the line
const ARROW_STEEP_ANGLE: f64 = 70.0;

/// Extra clearance required before a margin run keeps its default anchoring
const MIN_RUN_CLEARANCE: f64 = 10.0;

/// Rectangle swept by the horizontal run described by four control points.
fn run_rect(points: &[Point; 4], caption_height: f64) -> BoundingBox {
    BoundingBox::new(
        points[1].x.min(points[2].x),
        points[1].y,
        (points[1].x - points[2].x).abs(),
        caption_height,
    )
}

/// Route a path whose labels share a row.
///
/// The jog leaves the trailing edge of the left label, runs one caption
/// height above the higher label, and drops onto the leading edge of the
/// right label. When the gap between the labels is too narrow for the
/// caption plus both vertical legs, the jog anchors at the outer edges
/// instead so the line does not cross the label boxes.
pub fn same_row_route(
    spec: &PathSpec,
    start: &LabelBox,
    end: &LabelBox,
    caption: &Extent,
) -> PathSegment {
    let h = caption.height;
    let run_y = start.y.min(end.y) - h;

    let mut points = if start.x < end.x {
        [
            Point::new(start.right(), start.y),
            Point::new(start.right() + h, run_y),
            Point::new(end.x - h, run_y),
            Point::new(end.x, end.y),
        ]
    } else {
        [
            Point::new(start.x, start.y),
            Point::new(start.x - h, run_y),
            Point::new(end.right() + h, run_y),
            Point::new(end.right(), end.y),
        ]
    };

    let base_length = caption.width + 2.0 * h;
    let gap = (points[0].x - points[3].x).abs();
    if gap < base_length {
        if points[0].x > points[3].x {
            points[0].x = start.right();
            points[1].x = start.right() + h;
            points[2].x = end.x - h;
            points[3].x = end.x;
        } else {
            points[0].x = start.x;
            points[1].x = start.x - h;
            points[2].x = end.right() + h;
            points[3].x = end.right();
        }
    }

    PathSegment {
        start: spec.start,
        end: spec.end,
        start_row: start.row_index,
        end_row: end.row_index,
        row_index: Some(start.row_index),
        points,
        is_arrow: true,
        single_line: true,
        connect: false,
        text: spec.text.clone(),
        style: spec.style.clone(),
        ex_data: spec.ex_data.clone(),
    }
}

/// Route a path whose labels sit on different rows.
///
/// Returns the leaving segment (no arrow, anchored on the start label's row)
/// and the arriving segment (arrow, anchored on the end label's row). The
/// margin is chosen by whichever side has the larger combined clearance from
/// both labels; each segment swaps to its label's far edge when the run
/// would be shorter than the caption.
pub fn cross_row_route(
    spec: &PathSpec,
    start: &LabelBox,
    end: &LabelBox,
    caption: &Extent,
    left: f64,
    right: f64,
) -> (PathSegment, PathSegment) {
    let h = caption.height;
    let left_clearance = (start.x - left) + (end.x - left);
    let right_clearance = (right - start.right()) + (right - end.right());

    let (mut from_points, mut to_points) = if left_clearance >= right_clearance {
        // route along the right margin
        let margin_x = right + 2.0 * h;
        let from = [
            Point::new(start.right(), start.y),
            Point::new(start.right() + h, start.y - h),
            Point::new(margin_x, start.y - h),
            Point::new(margin_x, start.y - h),
        ];
        let to = [
            Point::new(margin_x, end.y - h),
            Point::new(margin_x, end.y - h),
            Point::new(end.right() + h, end.y - h),
            Point::new(end.right(), end.y),
        ];
        (from, to)
    } else {
        // route along the left margin
        let margin_x = left - 2.0 * h;
        let from = [
            Point::new(start.x, start.y),
            Point::new(start.x - h, start.y - h),
            Point::new(margin_x, start.y - h),
            Point::new(margin_x, start.y - h),
        ];
        let to = [
            Point::new(margin_x, end.y - h),
            Point::new(margin_x, end.y - h),
            Point::new(end.x - h, end.y - h),
            Point::new(end.x, end.y),
        ];
        (from, to)
    };

    // a run shorter than the caption flips the segment onto the label's
    // far edge, away from the margin
    let from_run = (from_points[1].x - from_points[2].x).abs();
    let to_run = (to_points[1].x - to_points[2].x).abs();
    if left_clearance >= right_clearance {
        if from_run <= caption.width + MIN_RUN_CLEARANCE {
            from_points[0].x = start.x;
            from_points[1].x = start.x - h;
        }
        if to_run <= caption.width + MIN_RUN_CLEARANCE {
            to_points[2].x = end.x - h;
            to_points[3].x = end.x;
        }
    } else {
        if from_run <= caption.width + MIN_RUN_CLEARANCE {
            from_points[0].x = start.right();
            from_points[1].x = start.right() - h;
        }
        if to_run <= caption.width + MIN_RUN_CLEARANCE {
            to_points[2].x = end.right() - h;
            to_points[3].x = end.right();
        }
    }

    let from_segment = PathSegment {
        start: spec.start,
        end: spec.end,
        start_row: start.row_index,
        end_row: end.row_index,
        row_index: Some(start.row_index),
        points: from_points,
        is_arrow: false,
        single_line: false,
        connect: false,
        text: spec.text.clone(),
        style: spec.style.clone(),
        ex_data: spec.ex_data.clone(),
    };
    let to_segment = PathSegment {
        start: spec.start,
        end: spec.end,
        start_row: start.row_index,
        end_row: end.row_index,
        row_index: Some(end.row_index),
        points: to_points,
        is_arrow: true,
        single_line: false,
        connect: false,
        text: spec.text.clone(),
        style: spec.style.clone(),
        ex_data: spec.ex_data.clone(),
    };
    (from_segment, to_segment)
}

/// Lift the horizontal run until it clears every placed label box.
pub fn avoid_labels(points: &mut [Point; 4], caption_height: f64, labels: &[LabelBox]) {
    while labels
        .iter()
        .any(|label| run_rect(points, caption_height).overlaps(&label.bounds()))
    {
        points[1].y -= caption_height;
        points[2].y -= caption_height;
    }
}

/// Lift the horizontal run until it clears every previously routed run.
pub fn avoid_paths(points: &mut [Point; 4], caption_height: f64, existing: &[PathSegment]) {
    if existing.is_empty() {
        return;
    }
    let rects: Vec<BoundingBox> = existing
        .iter()
        .map(|segment| segment.run_rect(caption_height))
        .collect();
    while rects
        .iter()
        .any(|rect| run_rect(points, caption_height).overlaps(rect))
    {
        points[1].y -= caption_height;
        points[2].y -= caption_height;
    }
}

/// Rebuild every connector segment from the current cross-row segments.
///
/// Connectors are always regenerated from scratch: existing ones are
/// dropped, then the cross-row segments are grouped by endpoint pair and
/// caption, and each group gains one vertical stitch joining the margin end
/// of its leaving segment to the margin end of its arriving segment.
pub fn synthesize_connectors(segments: &mut Vec<PathSegment>) {
    segments.retain(|segment| !segment.connect);

    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        if segment.start_row == segment.end_row {
            continue;
        }
        let group = groups.iter_mut().find(|members| {
            let probe = &segments[members[0]];
            probe.start == segment.start
                && probe.end == segment.end
                && probe.text == segment.text
        });
        match group {
            Some(members) => members.push(i),
            None => groups.push(vec![i]),
        }
    }

    let mut connectors = Vec::with_capacity(groups.len());
    for members in groups {
        let mut top = Point::default();
        let mut bottom = Point::default();
        for &i in &members {
            let segment = &segments[i];
            if segment.single_line {
                continue;
            }
            if segment.is_arrow {
                bottom = segment.points[0];
            } else {
                top = segment.points[3];
            }
        }
        let template = &segments[members[0]];
        connectors.push(PathSegment {
            start: template.start,
            end: template.end,
            start_row: template.start_row,
            end_row: template.end_row,
            row_index: None,
            points: [top, top, bottom, bottom],
            is_arrow: false,
            single_line: false,
            connect: true,
            text: template.text.clone(),
            style: template.style.clone(),
            ex_data: template.ex_data.clone(),
        });
    }
    segments.append(&mut connectors);
}

/// Compute the two flank points of an arrowhead whose tip sits at `tip` and
/// whose shaft arrives from `from`.
///
/// Flanks sit `ARROW_TIP_LENGTH` back from the tip at ±`ARROW_TIP_SPREAD`
/// degrees off the shaft, mirrored by approach side; past
/// `ARROW_STEEP_ANGLE` the outer flank folds across the vertical. Returns
/// `None` when the shaft arrives from above the tip.
pub fn arrow_tips(tip: Point, from: Point) -> Option<(Point, Point)> {
    if from.y > tip.y {
        return None;
    }
    let dy = tip.y - from.y;
    let dx = (tip.x - from.x).abs();
    let mut angle = (dy / dx).atan().to_degrees();
    if !angle.is_finite() {
        angle = 90.0;
    }

    let flank = |deg: f64| {
        (
            ARROW_TIP_LENGTH * deg.to_radians().cos(),
            ARROW_TIP_LENGTH * deg.to_radians().sin(),
        )
    };
    let (near_dx, near_dy) = flank(angle - ARROW_TIP_SPREAD);
    let steep = angle >= ARROW_STEEP_ANGLE;

    if tip.x < from.x {
        let near = Point::new(tip.x + near_dx, tip.y - near_dy);
        let far = if steep {
            let (fx, fy) = flank(180.0 - (angle + ARROW_TIP_SPREAD));
            Point::new(tip.x - fx, tip.y - fy)
        } else {
            let (fx, fy) = flank(angle + ARROW_TIP_SPREAD);
            Point::new(tip.x + fx, tip.y - fy)
        };
        Some((near, far))
    } else {
        let near = Point::new(tip.x - near_dx, tip.y - near_dy);
        let far = if steep {
            let (fx, fy) = flank(180.0 - (angle + ARROW_TIP_SPREAD));
            Point::new(tip.x + fx, tip.y - fy)
        } else {
            let (fx, fy) = flank(angle + ARROW_TIP_SPREAD);
            Point::new(tip.x - fx, tip.y - fy)
        };
        Some((near, far))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::LabelId;
    use crate::measure::path_caption_extent;
    use crate::style::LabelStyle;

    fn label(id: u64, row: usize, x: f64, y: f64, width: f64) -> LabelBox {
        LabelBox {
            id: LabelId(id),
            row_index: row,
            x,
            y,
            width,
            height: 19.0,
            text: "L".into(),
            start_index: 0,
            end_index: 0,
            style: LabelStyle::default(),
            ex_data: None,
        }
    }

    fn spec() -> PathSpec {
        PathSpec::new(LabelId(1), LabelId(2), "rel")
    }

    #[test]
    fn test_same_row_route_left_to_right() {
        let start = label(1, 1, 100.0, 50.0, 30.0);
        let end = label(2, 1, 400.0, 50.0, 30.0);
        let caption = path_caption_extent("rel");

        let seg = same_row_route(&spec(), &start, &end, &caption);

        assert!(seg.single_line);
        assert!(seg.is_arrow);
        assert_eq!(seg.points[0].x, start.right());
        assert_eq!(seg.points[3].x, end.x);
        // the run sits one caption height above the labels
        assert_eq!(seg.points[1].y, 50.0 - caption.height);
        assert_eq!(seg.points[2].y, 50.0 - caption.height);
    }

    #[test]
    fn test_same_row_route_narrow_gap_anchors_outer_edges() {
        let start = label(1, 1, 100.0, 50.0, 30.0);
        let end = label(2, 1, 140.0, 50.0, 30.0);
        let caption = path_caption_extent("a long relation caption");

        let seg = same_row_route(&spec(), &start, &end, &caption);

        // jog legs extend past the facing edges so the line clears the boxes
        assert_eq!(seg.points[0].x, start.x);
        assert_eq!(seg.points[3].x, end.right());
    }

    #[test]
    fn test_cross_row_route_prefers_side_with_clearance() {
        let start = label(1, 1, 500.0, 50.0, 30.0);
        let end = label(2, 2, 520.0, 120.0, 30.0);
        let caption = path_caption_extent("rel");

        // labels far from the left margin: clearance picks the right margin
        let (from_seg, to_seg) =
            cross_row_route(&spec(), &start, &end, &caption, 80.0, 720.0);

        assert!(!from_seg.is_arrow);
        assert!(to_seg.is_arrow);
        assert!(from_seg.points[3].x > 720.0);
        assert_eq!(from_seg.points[3].x, to_seg.points[0].x);
        assert_eq!(from_seg.row_index, Some(1));
        assert_eq!(to_seg.row_index, Some(2));
    }

    #[test]
    fn test_cross_row_route_left_margin() {
        let start = label(1, 1, 90.0, 50.0, 30.0);
        let end = label(2, 2, 100.0, 120.0, 30.0);
        let caption = path_caption_extent("rel");

        let (from_seg, to_seg) =
            cross_row_route(&spec(), &start, &end, &caption, 80.0, 720.0);

        assert!(from_seg.points[3].x < 80.0);
        assert_eq!(from_seg.points[3].x, to_seg.points[0].x);
    }

    #[test]
    fn test_avoid_labels_lifts_run() {
        let caption = path_caption_extent("rel");
        let mut points = [
            Point::new(130.0, 50.0),
            Point::new(150.0, 31.0),
            Point::new(380.0, 31.0),
            Point::new(400.0, 50.0),
        ];
        let blocker = label(3, 1, 200.0, 25.0, 40.0);
        let before = points[1].y;

        avoid_labels(&mut points, caption.height, &[blocker.clone()]);

        assert!(points[1].y < before);
        assert!(!run_rect(&points, caption.height).overlaps(&blocker.bounds()));
    }

    #[test]
    fn test_connector_synthesis_groups_pair() {
        let start = label(1, 1, 500.0, 50.0, 30.0);
        let end = label(2, 2, 520.0, 120.0, 30.0);
        let caption = path_caption_extent("rel");
        let (from_seg, to_seg) =
            cross_row_route(&spec(), &start, &end, &caption, 80.0, 720.0);
        let mut segments = vec![from_seg.clone(), to_seg.clone()];

        synthesize_connectors(&mut segments);

        assert_eq!(segments.len(), 3);
        let connector = segments.last().unwrap();
        assert!(connector.connect);
        assert!(!connector.is_arrow);
        assert_eq!(connector.row_index, None);
        assert_eq!(connector.points[0], from_seg.points[3]);
        assert_eq!(connector.points[2], to_seg.points[0]);
    }

    #[test]
    fn test_connectors_are_rebuilt_not_duplicated() {
        let start = label(1, 1, 500.0, 50.0, 30.0);
        let end = label(2, 2, 520.0, 120.0, 30.0);
        let caption = path_caption_extent("rel");
        let (from_seg, to_seg) =
            cross_row_route(&spec(), &start, &end, &caption, 80.0, 720.0);
        let mut segments = vec![from_seg, to_seg];

        synthesize_connectors(&mut segments);
        synthesize_connectors(&mut segments);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments.iter().filter(|s| s.connect).count(), 1);
    }

    #[test]
    fn test_arrow_tips_flat_approach() {
        let tips = arrow_tips(Point::new(100.0, 100.0), Point::new(60.0, 80.0));
        let (a, b) = tips.unwrap();
        // both flanks trail back toward the shaft
        assert!(a.x < 100.0);
        assert!(b.x < 100.0);
        assert!(a.y < 100.0);
        assert!(b.y < 100.0);
    }

    #[test]
    fn test_arrow_tips_vertical_approach_is_symmetric() {
        let (a, b) = arrow_tips(Point::new(100.0, 100.0), Point::new(100.0, 40.0)).unwrap();
        assert!((a.y - b.y).abs() < 1e-9);
        assert!(((100.0 - a.x) + (100.0 - b.x)).abs() < 1e-9);
    }

    #[test]
    fn test_arrow_tips_rejects_downward_shaft() {
        assert!(arrow_tips(Point::new(0.0, 0.0), Point::new(10.0, 10.0)).is_none());
    }
}
