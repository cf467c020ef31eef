//! Path construction and the encodings path data uses on the wire.
//!
//! [`PathBuilder`] keeps a point array and a point type array in lock step. Every mutation
//! validates the whole request first and only then touches either buffer, so a rejected call
//! leaves the path exactly as it was.
//!
//! # Key Components
//!
//! - [`PathBuilder`] - subpath state machine (`moveto`, `lineto`, Bezier runs, arcs)
//! - [`pointr`] - relative Integer7/Integer15 deltas
//! - [`points`] - the float, 16-bit and relative point array forms
//! - [`pointtype`] - point type bytes and their run length encoding
//!
//! # Examples
//!
//! ```rust
//! use emfplus::{path::PathBuilder, types::{PathPointFlags, PointF}};
//!
//! let mut path = PathBuilder::new();
//! path.moveto(PointF::new(0.0, 0.0), PathPointFlags::empty())?;
//! path.lineto(PointF::new(10.0, 0.0), PathPointFlags::empty())?;
//! path.lineto(PointF::new(10.0, 10.0), PathPointFlags::empty())?;
//! path.closepath()?;
//! assert_eq!(path.types(), &[0x00, 0x01, 0x81]);
//! # Ok::<(), emfplus::Error>(())
//! ```

pub mod pointr;
pub mod points;
pub mod pointtype;

pub use points::{decode_points, encode_points, PointEncoding};

use crate::{
    path::pointtype::{closes_subpath, point_type},
    types::{PathPointFlags, PathPointKind, PointF, RectF},
    Error, Result,
};

/// Flags a caller may attach to a point. The close bit is owned by [`PathBuilder::closepath`].
const POINT_FLAGS: PathPointFlags = PathPointFlags::DASH_MODE.union(PathPointFlags::PATH_MARKER);

/// Lock-step point and point type buffers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathBuilder {
    points: Vec<PointF>,
    types: Vec<u8>,
}

impl PathBuilder {
    /// An empty path.
    #[must_use]
    pub fn new() -> Self {
        PathBuilder::default()
    }

    /// A path from raw points: the first gets type byte `first`, every other point `others`.
    #[must_use]
    pub fn from_points(points: &[PointF], first: u8, others: u8) -> Self {
        let mut types = Vec::with_capacity(points.len());
        if !points.is_empty() {
            types.push(first);
            types.resize(points.len(), others);
        }
        PathBuilder {
            points: points.to_vec(),
            types,
        }
    }

    /// Rebuild a path from decoded buffers.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPath`] if the buffers differ in length.
    pub fn from_parts(points: Vec<PointF>, types: Vec<u8>) -> Result<Self> {
        if points.len() != types.len() {
            return Err(Error::InvalidPath(format!(
                "{} points but {} point types",
                points.len(),
                types.len()
            )));
        }
        Ok(PathBuilder { points, types })
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the path holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The points.
    #[must_use]
    pub fn points(&self) -> &[PointF] {
        &self.points
    }

    /// One type byte per point.
    #[must_use]
    pub fn types(&self) -> &[u8] {
        &self.types
    }

    /// Drop every point, keeping the buffers.
    pub fn clear(&mut self) {
        self.points.clear();
        self.types.clear();
    }

    /// Consume the builder into its point and type buffers.
    #[must_use]
    pub fn into_parts(self) -> (Vec<PointF>, Vec<u8>) {
        (self.points, self.types)
    }

    /// Returns `true` if the last subpath accepts more segments.
    #[must_use]
    pub fn has_open_subpath(&self) -> bool {
        self.types.last().is_some_and(|&t| !closes_subpath(t))
    }

    /// Start a new subpath at `point`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPath`] if `flags` contains the close bit.
    pub fn moveto(&mut self, point: PointF, flags: PathPointFlags) -> Result<()> {
        let flags = check_flags(flags)?;
        self.push(point, PathPointKind::Start, flags);
        Ok(())
    }

    /// Add a line segment to the open subpath.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPath`] if there is no open subpath or `flags` contains the close
    /// bit.
    pub fn lineto(&mut self, point: PointF, flags: PathPointFlags) -> Result<()> {
        let flags = check_flags(flags)?;
        self.require_open("lineto")?;
        self.push(point, PathPointKind::Line, flags);
        Ok(())
    }

    /// Mark the last point as closing its subpath.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPath`] if the path is empty.
    pub fn closepath(&mut self) -> Result<()> {
        let last = self
            .types
            .last_mut()
            .ok_or_else(|| Error::InvalidPath("closepath on an empty path".to_string()))?;
        *last |= PathPointFlags::CLOSE_SUBPATH.bits();
        Ok(())
    }

    /// Add a run of line segments.
    ///
    /// With `start_seg` the first point starts a new subpath, otherwise the run continues the open
    /// subpath.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPath`] for an empty run, a continuation without an open subpath,
    /// or flags containing the close bit.
    pub fn polylineto(
        &mut self,
        points: &[PointF],
        flags: PathPointFlags,
        start_seg: bool,
    ) -> Result<()> {
        let flags = check_flags(flags)?;
        if points.is_empty() {
            return Err(Error::InvalidPath("polylineto with no points".to_string()));
        }
        if !start_seg {
            self.require_open("polylineto")?;
        }

        self.reserve(points.len());
        for (index, point) in points.iter().enumerate() {
            let kind = if start_seg && index == 0 {
                PathPointKind::Start
            } else {
                PathPointKind::Line
            };
            self.push(*point, kind, flags);
        }
        Ok(())
    }

    /// Add a run of cubic Bezier segments.
    ///
    /// With `start_seg` the run is one start point followed by 3n control and end points,
    /// otherwise it is 3n points continuing the open subpath.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPath`] if the point count does not form whole segments, for a
    /// continuation without an open subpath, or for flags containing the close bit.
    pub fn polybezierto(
        &mut self,
        points: &[PointF],
        flags: PathPointFlags,
        start_seg: bool,
    ) -> Result<()> {
        let flags = check_flags(flags)?;
        let curve = if start_seg {
            points.get(1..).unwrap_or_default()
        } else {
            points
        };
        if curve.is_empty() || curve.len() % 3 != 0 {
            return Err(Error::InvalidPath(format!(
                "polybezierto with {} points does not form whole segments",
                points.len()
            )));
        }
        if !start_seg {
            self.require_open("polybezierto")?;
        }

        self.reserve(points.len());
        if start_seg {
            self.push(points[0], PathPointKind::Start, flags);
        }
        for point in curve {
            self.push(*point, PathPointKind::Bezier, flags);
        }
        Ok(())
    }

    /// Add a closed polygon as a new subpath.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPath`] if `points` is empty or `flags` contains the close bit.
    pub fn polygon(&mut self, points: &[PointF], flags: PathPointFlags) -> Result<()> {
        self.polylineto(points, flags, true)?;
        self.closepath()
    }

    /// Add an elliptical arc as Bezier segments of at most 90 degrees.
    ///
    /// The ellipse is inscribed in `rect` and rotated by `rot` degrees about its center. `start`
    /// and `sweep` are in degrees, positive sweeps run clockwise in y-down coordinates. With
    /// `start_seg` the arc begins a new subpath, otherwise a line joins the open subpath to the
    /// start of the arc.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPath`] for a zero, non finite or larger than 360 degree sweep, for
    /// a continuation without an open subpath, or for flags containing the close bit.
    pub fn arcto(
        &mut self,
        start: f32,
        sweep: f32,
        rot: f32,
        rect: RectF,
        flags: PathPointFlags,
        start_seg: bool,
    ) -> Result<()> {
        let flags = check_flags(flags)?;
        if !sweep.is_finite() || sweep == 0.0 || sweep.abs() > 360.0 || !start.is_finite() {
            return Err(Error::InvalidPath(format!("arc sweep of {} degrees", sweep)));
        }
        if !start_seg {
            self.require_open("arcto")?;
        }

        let arc = arc_points(start, sweep, rot, rect);
        self.reserve(arc.len());
        let kind = if start_seg {
            PathPointKind::Start
        } else {
            PathPointKind::Line
        };
        self.push(arc[0], kind, flags);
        for point in &arc[1..] {
            self.push(*point, PathPointKind::Bezier, flags);
        }
        Ok(())
    }

    fn require_open(&self, operation: &str) -> Result<()> {
        if self.has_open_subpath() {
            Ok(())
        } else {
            Err(Error::InvalidPath(format!(
                "{} needs an open subpath",
                operation
            )))
        }
    }

    fn reserve(&mut self, additional: usize) {
        self.points.reserve(additional);
        self.types.reserve(additional);
    }

    fn push(&mut self, point: PointF, kind: PathPointKind, flags: PathPointFlags) {
        self.points.push(point);
        self.types.push(point_type(kind, flags));
    }
}

fn check_flags(flags: PathPointFlags) -> Result<PathPointFlags> {
    if flags.contains(PathPointFlags::CLOSE_SUBPATH) {
        return Err(Error::InvalidPath(
            "the close flag is set by closepath".to_string(),
        ));
    }
    Ok(flags & POINT_FLAGS)
}

/// Start point followed by 3 points per segment.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn arc_points(start: f32, sweep: f32, rot: f32, rect: RectF) -> Vec<PointF> {
    let rx = f64::from(rect.width) / 2.0;
    let ry = f64::from(rect.height) / 2.0;
    let cx = f64::from(rect.x) + rx;
    let cy = f64::from(rect.y) + ry;
    let (rot_sin, rot_cos) = f64::from(rot).to_radians().sin_cos();

    // Offset from the center, rotated and translated.
    let place = |ox: f64, oy: f64| {
        PointF::new(
            (cx + ox * rot_cos - oy * rot_sin) as f32,
            (cy + ox * rot_sin + oy * rot_cos) as f32,
        )
    };

    let segments = (f64::from(sweep).abs() / 90.0).ceil().max(1.0) as usize;
    let delta = f64::from(sweep).to_radians() / segments as f64;
    let k = 4.0 / 3.0 * (delta / 4.0).tan();

    let mut theta = f64::from(start).to_radians();
    let mut out = Vec::with_capacity(1 + 3 * segments);
    out.push(place(rx * theta.cos(), ry * theta.sin()));
    for _ in 0..segments {
        let next = theta + delta;
        let (s0, c0) = theta.sin_cos();
        let (s1, c1) = next.sin_cos();
        out.push(place(rx * (c0 - k * s0), ry * (s0 + k * c0)));
        out.push(place(rx * (c1 + k * s1), ry * (s1 - k * c1)));
        out.push(place(rx * c1, ry * s1));
        theta = next;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f32, y: f32) -> PointF {
        PointF::new(x, y)
    }

    #[test]
    fn test_closed_triangle() {
        let mut path = PathBuilder::new();
        path.moveto(pt(0.0, 0.0), PathPointFlags::empty()).unwrap();
        path.lineto(pt(10.0, 0.0), PathPointFlags::empty()).unwrap();
        path.lineto(pt(10.0, 10.0), PathPointFlags::empty()).unwrap();
        path.closepath().unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.types(), &[0x00, 0x01, 0x81]);
        assert!(!path.has_open_subpath());
    }

    #[test]
    fn test_lineto_needs_open_subpath() {
        let mut path = PathBuilder::new();
        assert!(path.lineto(pt(1.0, 1.0), PathPointFlags::empty()).is_err());
        assert!(path.closepath().is_err());

        path.polygon(&[pt(0.0, 0.0), pt(1.0, 0.0)], PathPointFlags::empty())
            .unwrap();
        let before = path.clone();
        assert!(path.lineto(pt(1.0, 1.0), PathPointFlags::empty()).is_err());
        assert!(path
            .polylineto(&[pt(2.0, 2.0)], PathPointFlags::empty(), false)
            .is_err());
        assert_eq!(path, before);
    }

    #[test]
    fn test_polybezierto_counts() {
        let four = [pt(0.0, 0.0), pt(1.0, 1.0), pt(2.0, 1.0), pt(3.0, 0.0)];
        let mut path = PathBuilder::new();
        assert!(path
            .polybezierto(&four[..3], PathPointFlags::empty(), true)
            .is_err());
        path.polybezierto(&four, PathPointFlags::empty(), true).unwrap();
        assert_eq!(path.types(), &[0x00, 0x03, 0x03, 0x03]);

        assert!(path
            .polybezierto(&four, PathPointFlags::empty(), false)
            .is_err());
        path.polybezierto(&four[1..], PathPointFlags::empty(), false)
            .unwrap();
        assert_eq!(path.len(), 7);
    }

    #[test]
    fn test_flags_are_carried() {
        let mut path = PathBuilder::new();
        path.moveto(pt(0.0, 0.0), PathPointFlags::PATH_MARKER).unwrap();
        path.lineto(pt(1.0, 0.0), PathPointFlags::DASH_MODE).unwrap();
        assert_eq!(path.types(), &[0x20, 0x11]);
        assert!(path
            .lineto(pt(2.0, 0.0), PathPointFlags::CLOSE_SUBPATH)
            .is_err());
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_quarter_arc() {
        let mut path = PathBuilder::new();
        path.arcto(
            0.0,
            90.0,
            0.0,
            RectF::new(-1.0, -1.0, 2.0, 2.0),
            PathPointFlags::empty(),
            true,
        )
        .unwrap();
        assert_eq!(path.types(), &[0x00, 0x03, 0x03, 0x03]);

        let p = path.points();
        assert!((p[0].x - 1.0).abs() < 1e-6 && p[0].y.abs() < 1e-6);
        assert!((p[1].y - 0.552_284_8).abs() < 1e-5);
        assert!((p[2].x - 0.552_284_8).abs() < 1e-5);
        assert!(p[3].x.abs() < 1e-6 && (p[3].y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_full_circle_continuation() {
        let mut path = PathBuilder::new();
        path.moveto(pt(5.0, 5.0), PathPointFlags::empty()).unwrap();
        path.arcto(
            0.0,
            -360.0,
            45.0,
            RectF::new(0.0, 0.0, 4.0, 2.0),
            PathPointFlags::empty(),
            false,
        )
        .unwrap();
        assert_eq!(path.len(), 1 + 1 + 12);
        assert_eq!(path.types()[1], 0x01);

        assert!(path
            .arcto(0.0, 361.0, 0.0, RectF::default(), PathPointFlags::empty(), false)
            .is_err());
        assert!(path
            .arcto(0.0, 0.0, 0.0, RectF::default(), PathPointFlags::empty(), false)
            .is_err());
        assert_eq!(path.len(), 14);
    }

    #[test]
    fn test_from_points() {
        let points = [pt(0.0, 0.0), pt(1.0, 1.0), pt(2.0, 0.0)];
        let path = PathBuilder::from_points(&points, 0x00, 0x01);
        assert_eq!(path.types(), &[0x00, 0x01, 0x01]);
        assert!(PathBuilder::from_parts(vec![pt(0.0, 0.0)], vec![]).is_err());
        assert!(PathBuilder::from_points(&[], 0, 1).is_empty());
    }
}
