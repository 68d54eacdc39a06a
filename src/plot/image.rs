//! Nearest-pixel picking and cross-sections on 2D images.
//!
//! Axis 0 of the array runs along x and axis 1 along y. Pixel `(i, j)` sits
//! at `(origin.0 + scale.0 * i, origin.1 + scale.1 * j)`.

use crate::error::{H5ScopeError, Result};
use ndarray::{Array1, ArrayView2};

/// A 2D array positioned in data coordinates.
#[derive(Debug, Clone, Copy)]
pub struct ImageFrame<'a> {
    /// Pixel values.
    pub data: ArrayView2<'a, f64>,
    /// Data coordinates of pixel `(0, 0)`.
    pub origin: (f64, f64),
    /// Pixel spacing along x and y.
    pub scale: (f64, f64),
}

impl<'a> ImageFrame<'a> {
    /// Place `data` at the origin with unit pixels.
    pub fn new(data: ArrayView2<'a, f64>) -> Self {
        Self {
            data,
            origin: (0.0, 0.0),
            scale: (1.0, 1.0),
        }
    }

    /// Set the coordinates of pixel `(0, 0)`.
    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin = (x, y);
        self
    }

    /// Set the pixel spacing.
    pub fn with_scale(mut self, x: f64, y: f64) -> Self {
        self.scale = (x, y);
        self
    }

    /// Number of pixels along x and y.
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Data coordinate of every pixel along one axis.
    pub fn axis_coords(&self, axis: usize) -> Array1<f64> {
        let (origin, scale, n) = if axis == 0 {
            (self.origin.0, self.scale.0, self.shape().0)
        } else {
            (self.origin.1, self.scale.1, self.shape().1)
        };
        Array1::from_iter((0..n).map(|i| origin + scale * i as f64))
    }

    /// Center of the image extent.
    pub fn center(&self) -> (f64, f64) {
        let (nx, ny) = self.shape();
        (
            self.origin.0 + self.scale.0 * nx as f64 / 2.0,
            self.origin.1 + self.scale.1 * ny as f64 / 2.0,
        )
    }
}

fn axis_index(cursor: f64, origin: f64, scale: f64, len: usize) -> Option<usize> {
    let pos = ((cursor - origin) / scale).round();
    if pos.is_nan() || pos < 0.0 || pos > (len as f64 - 1.0) {
        return None;
    }
    Some(pos as usize)
}

/// Map a cursor in data coordinates to the nearest pixel.
///
/// Returns `None` when the cursor lies outside the image on either axis, so
/// callers keep their previous selection.
pub fn nearest_on_image(
    frame: &ImageFrame<'_>,
    cursor_x: f64,
    cursor_y: f64,
) -> Option<(usize, usize)> {
    let (nx, ny) = frame.shape();
    if nx == 0 || ny == 0 {
        return None;
    }
    let row = axis_index(cursor_x, frame.origin.0, frame.scale.0, nx)?;
    let col = axis_index(cursor_y, frame.origin.1, frame.scale.1, ny)?;
    Some((row, col))
}

/// A 1D slice through an image.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    /// Data coordinates along the slice.
    pub axis: Array1<f64>,
    /// Pixel values along the slice.
    pub values: Array1<f64>,
    /// Position of the selected pixel on `axis`.
    pub marker: f64,
}

/// Both slices through a selected pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSections {
    /// Values along x at the selected column.
    pub horizontal: Trace,
    /// Values along y at the selected row.
    pub vertical: Trace,
    /// Value of the selected pixel.
    pub value: f64,
}

/// Extract the slices of `frame` through pixel `(row, col)`.
pub fn cross_sections(frame: &ImageFrame<'_>, row: usize, col: usize) -> Result<CrossSections> {
    let (nx, ny) = frame.shape();
    if row >= nx || col >= ny {
        return Err(H5ScopeError::OutOfBounds {
            row,
            col,
            shape: (nx, ny),
        });
    }

    let x_axis = frame.axis_coords(0);
    let y_axis = frame.axis_coords(1);
    let horizontal = Trace {
        marker: x_axis[row],
        axis: x_axis,
        values: frame.data.column(col).to_owned(),
    };
    let vertical = Trace {
        marker: y_axis[col],
        axis: y_axis,
        values: frame.data.row(row).to_owned(),
    };

    Ok(CrossSections {
        horizontal,
        vertical,
        value: frame.data[[row, col]],
    })
}

/// Crosshair state of an image plot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageCursor {
    /// Position of the vertical line (an x coordinate).
    pub line_x: f64,
    /// Position of the horizontal line (a y coordinate).
    pub line_y: f64,
    /// Selected pixel along x.
    pub row: usize,
    /// Selected pixel along y.
    pub col: usize,
}

impl ImageCursor {
    /// Cursor centered on `frame`.
    pub fn centered(frame: &ImageFrame<'_>) -> Self {
        let mut cursor = Self::default();
        cursor.image_changed(frame);
        cursor
    }

    /// Move the crosshair. A missing coordinate keeps the current line
    /// position, which lets a trace plot drive a single axis.
    ///
    /// Returns false, leaving everything unchanged, when the position falls
    /// outside the image.
    pub fn set_position(&mut self, frame: &ImageFrame<'_>, x: Option<f64>, y: Option<f64>) -> bool {
        let x = x.unwrap_or(self.line_x);
        let y = y.unwrap_or(self.line_y);
        match nearest_on_image(frame, x, y) {
            Some((row, col)) => {
                self.line_x = x;
                self.line_y = y;
                self.row = row;
                self.col = col;
                true
            },
            None => false,
        }
    }

    /// Re-center the lines on a new image and clamp the selection to its
    /// shape.
    pub fn image_changed(&mut self, frame: &ImageFrame<'_>) {
        let (cx, cy) = frame.center();
        self.line_x = cx;
        self.line_y = cy;

        let (nx, ny) = frame.shape();
        self.row = self.row.min(nx.saturating_sub(1));
        self.col = self.col.min(ny.saturating_sub(1));
    }

    /// Slices through the selected pixel.
    pub fn cross_sections(&self, frame: &ImageFrame<'_>) -> Result<CrossSections> {
        cross_sections(frame, self.row, self.col)
    }

    /// Readout text for the selected pixel, e.g. `x=1.00e0, y=2.00e0, z=5.00e-1`.
    pub fn readout(&self, frame: &ImageFrame<'_>) -> Option<String> {
        let z = frame.data.get((self.row, self.col))?;
        Some(format!("x={:.2e}, y={:.2e}, z={:.2e}", self.line_x, self.line_y, z))
    }
}
