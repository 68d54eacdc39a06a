//! Nearest-sample picking on 1D curves.

use crate::error::{H5ScopeError, Result};

/// One curve: x and y samples of equal length.
#[derive(Debug, Clone, Copy)]
pub struct Series<'a> {
    /// Independent axis samples.
    pub x: &'a [f64],
    /// Dependent axis samples.
    pub y: &'a [f64],
}

impl<'a> Series<'a> {
    /// Pair x and y samples.
    pub fn new(x: &'a [f64], y: &'a [f64]) -> Self {
        Self { x, y }
    }

    fn check(&self) -> Result<()> {
        if self.x.len() != self.y.len() {
            return Err(H5ScopeError::ShapeMismatch {
                x_len: self.x.len(),
                y_len: self.y.len(),
            });
        }
        Ok(())
    }

    fn distance_sq(&self, i: usize, cx: f64, cy: f64) -> f64 {
        let dx = self.x[i] - cx;
        let dy = self.y[i] - cy;
        dx * dx + dy * dy
    }
}

/// The sample closest to a cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePick {
    /// Position of the series in the input list.
    pub series: usize,
    /// Sample index within the series.
    pub index: usize,
    /// Sample coordinates.
    pub point: (f64, f64),
    /// Squared distance from the cursor.
    pub distance_sq: f64,
}

/// Index of the sample nearest to `cx` in ascending `x`.
///
/// Midpoint ties go to the earlier sample. `x` must be non-empty.
fn nearest_sorted(x: &[f64], cx: f64) -> usize {
    let mut i = x.partition_point(|&v| v < cx).min(x.len() - 1);
    if i > 0 && x[i] - cx >= cx - x[i - 1] {
        i -= 1;
    }
    i
}

/// Index of the sample with the smallest squared distance, first one on ties.
fn nearest_scan(series: &Series<'_>, cx: f64, cy: f64) -> usize {
    let mut best = 0;
    let mut best_d = series.distance_sq(0, cx, cy);
    for i in 1..series.x.len() {
        let d = series.distance_sq(i, cx, cy);
        if d < best_d || (best_d.is_nan() && !d.is_nan()) {
            best = i;
            best_d = d;
        }
    }
    best
}

/// Find the sample of one curve nearest to the cursor.
///
/// Ordered data (`parametric == false`) is searched by x alone with a binary
/// search; parametric data is scanned for the smallest Euclidean distance.
/// Returns `None` for an empty curve.
pub fn nearest_on_curve(
    x: &[f64],
    y: &[f64],
    cursor_x: f64,
    cursor_y: f64,
    parametric: bool,
) -> Result<Option<CurvePick>> {
    nearest_among(&[Series::new(x, y)], cursor_x, cursor_y, parametric)
}

/// Find the nearest sample across several curves.
///
/// Each curve contributes its own best sample; the one closest to the cursor
/// wins, earlier curves winning ties. Empty curves are skipped, and `None`
/// means there was nothing to pick from.
pub fn nearest_among(
    series: &[Series<'_>],
    cursor_x: f64,
    cursor_y: f64,
    parametric: bool,
) -> Result<Option<CurvePick>> {
    let mut best: Option<CurvePick> = None;

    for (s, curve) in series.iter().enumerate() {
        curve.check()?;
        if curve.x.is_empty() {
            continue;
        }

        let index = if parametric {
            nearest_scan(curve, cursor_x, cursor_y)
        } else {
            nearest_sorted(curve.x, cursor_x)
        };
        let candidate = CurvePick {
            series: s,
            index,
            point: (curve.x[index], curve.y[index]),
            distance_sq: curve.distance_sq(index, cursor_x, cursor_y),
        };

        match best {
            Some(b) if !(candidate.distance_sq < b.distance_sq) => {},
            _ => best = Some(candidate),
        }
    }

    Ok(best)
}

/// Crosshair state of a curve plot.
///
/// A double click shows or hides the crosshair; while it is shown, single
/// clicks freeze and resume tracking of the mouse.
#[derive(Debug, Clone)]
pub struct CurveCursor {
    /// Data may be unsorted in x.
    pub parametric: bool,
    enabled: bool,
    tracking: bool,
    selected: Option<CurvePick>,
}

impl CurveCursor {
    /// Create a hidden crosshair.
    pub fn new(parametric: bool) -> Self {
        Self {
            parametric,
            enabled: false,
            tracking: true,
            selected: None,
        }
    }

    /// Whether the crosshair is shown.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether mouse moves update the selection.
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Last picked sample.
    pub fn selected(&self) -> Option<CurvePick> {
        self.selected
    }

    /// Show or hide the crosshair.
    pub fn toggle_enabled(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Freeze or resume tracking. Returns true when tracking resumed, in
    /// which case the caller should replay the click position.
    pub fn toggle_tracking(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        self.tracking = !self.tracking;
        self.tracking
    }

    /// Handle a mouse move in data coordinates. Returns the new selection
    /// when it changed.
    pub fn handle_move(
        &mut self,
        series: &[Series<'_>],
        cursor_x: f64,
        cursor_y: f64,
    ) -> Result<Option<CurvePick>> {
        if !(self.enabled && self.tracking) {
            return Ok(None);
        }
        let pick = nearest_among(series, cursor_x, cursor_y, self.parametric)?;
        if pick.is_some() {
            self.selected = pick;
        }
        Ok(pick)
    }

    /// Readout text for the selected point, e.g. `x=1.50e0, y=2.00e-1`.
    pub fn readout(&self) -> Option<String> {
        self.selected
            .map(|p| format!("x={:.2e}, y={:.2e}", p.point.0, p.point.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_picks_closer_neighbour() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [0.0; 5];
        let pick = nearest_on_curve(&x, &y, 1.6, 0.0, false).unwrap().unwrap();
        assert_eq!(pick.index, 2);
        assert_eq!(pick.point, (2.0, 0.0));
    }

    #[test]
    fn sorted_midpoint_goes_to_earlier_sample() {
        let pick = nearest_on_curve(&[0.0, 2.0], &[5.0, 5.0], 1.0, 0.0, false)
            .unwrap()
            .unwrap();
        assert_eq!(pick.index, 0);
    }

    #[test]
    fn sorted_clamps_outside_range() {
        let x = [0.0, 1.0, 2.0];
        let y = [0.0; 3];
        assert_eq!(nearest_on_curve(&x, &y, 10.0, 0.0, false).unwrap().unwrap().index, 2);
        assert_eq!(nearest_on_curve(&x, &y, -10.0, 0.0, false).unwrap().unwrap().index, 0);
    }

    #[test]
    fn parametric_uses_both_axes() {
        // A circle sampled counter-clockwise: unsorted in x.
        let x = [1.0, 0.0, -1.0, 0.0];
        let y = [0.0, 1.0, 0.0, -1.0];
        let pick = nearest_on_curve(&x, &y, 0.1, -0.8, true).unwrap().unwrap();
        assert_eq!(pick.index, 3);
        assert!((pick.distance_sq - 0.05).abs() < 1e-12);
    }

    #[test]
    fn parametric_ties_keep_first() {
        let x = [1.0, -1.0];
        let y = [0.0, 0.0];
        let pick = nearest_on_curve(&x, &y, 0.0, 0.0, true).unwrap().unwrap();
        assert_eq!(pick.index, 0);
    }

    #[test]
    fn global_best_across_series() {
        let x1 = [0.0, 1.0, 2.0];
        let y1 = [10.0, 10.0, 10.0];
        let x2 = [0.0, 1.0, 2.0];
        let y2 = [0.0, 1.0, 2.0];
        let series = [Series::new(&x1, &y1), Series::new(&x2, &y2)];
        let pick = nearest_among(&series, 1.1, 1.0, false).unwrap().unwrap();
        assert_eq!(pick.series, 1);
        assert_eq!(pick.index, 1);

        // Identical curves tie; the first one wins.
        let twins = [Series::new(&x2, &y2), Series::new(&x2, &y2)];
        assert_eq!(nearest_among(&twins, 1.0, 1.0, false).unwrap().unwrap().series, 0);
    }

    #[test]
    fn empty_and_mismatched_input() {
        assert_eq!(nearest_among(&[], 0.0, 0.0, false).unwrap(), None);
        assert_eq!(nearest_on_curve(&[], &[], 0.0, 0.0, true).unwrap(), None);

        let err = nearest_on_curve(&[0.0, 1.0], &[0.0], 0.0, 0.0, false).unwrap_err();
        assert!(matches!(err, H5ScopeError::ShapeMismatch { x_len: 2, y_len: 1 }));
    }

    #[test]
    fn cursor_only_moves_while_tracking() {
        let x = [0.0, 1.0, 2.0];
        let y = [0.0, 1.0, 4.0];
        let series = [Series::new(&x, &y)];
        let mut cursor = CurveCursor::new(false);

        assert_eq!(cursor.handle_move(&series, 1.0, 1.0).unwrap(), None);
        cursor.toggle_enabled();
        assert_eq!(cursor.handle_move(&series, 1.9, 0.0).unwrap().unwrap().index, 2);

        assert!(!cursor.toggle_tracking());
        assert_eq!(cursor.handle_move(&series, 0.0, 0.0).unwrap(), None);
        assert_eq!(cursor.selected().unwrap().index, 2);
        assert_eq!(cursor.readout().unwrap(), "x=2.00e0, y=4.00e0");
    }
}
