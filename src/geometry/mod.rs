//! Point and region math in raster pixel space.

mod path;

pub use path::{QuadCurve, SmoothPath, arrow_head_points, quadratic_control_point, smooth_path};

use serde::{Deserialize, Serialize};

/// A position in raster pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, possibly with negative extents
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Region spanning two corner points, in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Overlapping part of two regions, `None` if they do not overlap
    pub fn intersection(&self, other: &Region) -> Option<Region> {
        let a = normalize_region(*self);
        let b = normalize_region(*other);
        let x = a.x.max(b.x);
        let y = a.y.max(b.y);
        let right = a.right().min(b.right());
        let bottom = a.bottom().min(b.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(Region::new(x, y, right - x, bottom - y))
    }
}

/// Integer pixel rectangle, half-open on the right and bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRect {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

/// Clip a region to buffer bounds.
///
/// The region is normalized first, the start is floored and the end ceiled.
/// Returns `None` when nothing of the region lies inside the buffer.
pub fn clip_to_bounds(region: Region, width: u32, height: u32) -> Option<PixelRect> {
    let region = normalize_region(region);
    if !region.x.is_finite()
        || !region.y.is_finite()
        || !region.width.is_finite()
        || !region.height.is_finite()
    {
        return None;
    }
    let start_x = region.x.floor().max(0.0);
    let start_y = region.y.floor().max(0.0);
    let end_x = region.right().ceil().min(width as f32);
    let end_y = region.bottom().ceil().min(height as f32);
    if end_x <= start_x || end_y <= start_y {
        return None;
    }
    Some(PixelRect {
        x0: start_x as u32,
        y0: start_y as u32,
        x1: end_x as u32,
        y1: end_y as u32,
    })
}

pub fn distance(p1: Point, p2: Point) -> f32 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    (dx * dx + dy * dy).sqrt()
}

/// Angle of the vector from `p1` to `p2`, in radians
pub fn angle(p1: Point, p2: Point) -> f32 {
    (p2.y - p1.y).atan2(p2.x - p1.x)
}

pub fn is_valid_region(region: &Region) -> bool {
    region.width > 0.0 && region.height > 0.0
}

/// Flip negative extents so width and height are non-negative
pub fn normalize_region(region: Region) -> Region {
    let mut normalized = region;
    if normalized.width < 0.0 {
        normalized.x += normalized.width;
        normalized.width = -normalized.width;
    }
    if normalized.height < 0.0 {
        normalized.y += normalized.height;
        normalized.height = -normalized.height;
    }
    normalized
}

/// Whether two rectangles overlap; touching edges count as overlapping
pub fn rectangles_intersect(r1: &Region, r2: &Region) -> bool {
    !(r1.right() < r2.x || r2.right() < r1.x || r1.bottom() < r2.y || r2.bottom() < r1.y)
}

/// Inclusive containment test
pub fn point_in_rectangle(point: Point, rect: &Region) -> bool {
    point.x >= rect.x && point.x <= rect.right() && point.y >= rect.y && point.y <= rect.bottom()
}

/// Map a point from display coordinates into raster pixel space.
///
/// `display` is where the raster is shown on screen; the raster itself is
/// `raster_width` x `raster_height` pixels.
pub fn to_raster_space(client: Point, display: &Region, raster_width: u32, raster_height: u32) -> Point {
    if display.width == 0.0 || display.height == 0.0 {
        return Point::new(client.x - display.x, client.y - display.y);
    }
    let scale_x = raster_width as f32 / display.width;
    let scale_y = raster_height as f32 / display.height;
    Point::new((client.x - display.x) * scale_x, (client.y - display.y) * scale_y)
}
