use tiny_skia::{
    ColorU8, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform,
};

use crate::geometry::{Point, arrow_head_points, smooth_path};
use crate::layer::{Arrow, Path};
use crate::pixel_buffer::PixelBuffer;
use crate::util::color::{Rgba, resolve_color};

/// Burn a freehand path into a copy of `buffer` with round caps and joins.
///
/// The points are smoothed into quadratic curves first. A path whose points
/// all coincide draws a dot of the stroke width.
pub fn draw_path(buffer: &PixelBuffer, path: &Path) -> PixelBuffer {
    let Some(&first) = path.points.first() else {
        return buffer.clone();
    };
    let width = path.width.max(1.0);
    let paint = paint_for(resolve_color(&path.color));

    render(buffer, |pixmap| {
        if path.points.iter().all(|&point| point == first) {
            if let Some(dot) = PathBuilder::from_circle(first.x, first.y, width / 2.0) {
                pixmap.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
            }
            return;
        }
        let Some(smooth) = smooth_path(&path.points) else {
            return;
        };

        let mut pb = PathBuilder::new();
        pb.move_to(smooth.start.x, smooth.start.y);
        for curve in &smooth.curves {
            pb.quad_to(curve.control.x, curve.control.y, curve.end.x, curve.end.y);
        }
        if let Some(outline) = pb.finish() {
            pixmap.stroke_path(&outline, &paint, &round_stroke(width), Transform::identity(), None);
        }
    })
}

/// Burn an arrow (shaft plus filled head) into a copy of `buffer`
pub fn draw_arrow(buffer: &PixelBuffer, arrow: &Arrow) -> PixelBuffer {
    if arrow.start == arrow.end {
        return buffer.clone();
    }
    let paint = paint_for(resolve_color(&arrow.color));

    render(buffer, |pixmap| {
        let mut shaft = PathBuilder::new();
        shaft.move_to(arrow.start.x, arrow.start.y);
        shaft.line_to(arrow.end.x, arrow.end.y);
        if let Some(shaft) = shaft.finish() {
            let stroke = round_stroke(arrow.width.max(1.0));
            pixmap.stroke_path(&shaft, &paint, &stroke, Transform::identity(), None);
        }

        let [left, tip, right] = arrow_head_points(arrow.start, arrow.end, arrow.head_size);
        let mut head = PathBuilder::new();
        head.move_to(left.x, left.y);
        head.line_to(tip.x, tip.y);
        head.line_to(right.x, right.y);
        head.close();
        if let Some(head) = head.finish() {
            pixmap.fill_path(&head, &paint, FillRule::Winding, Transform::identity(), None);
        }
    })
}

fn paint_for([r, g, b, a]: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

/// Run `draw` on a premultiplied copy of `buffer` and fold the result back.
///
/// Only pixels the drawing touched are converted back, so untouched
/// translucent pixels keep their exact straight-alpha bytes.
fn render(buffer: &PixelBuffer, draw: impl FnOnce(&mut Pixmap)) -> PixelBuffer {
    let Some(mut pixmap) = Pixmap::new(buffer.width(), buffer.height()) else {
        return buffer.clone();
    };
    for (dst, src) in pixmap
        .pixels_mut()
        .iter_mut()
        .zip(buffer.as_bytes().chunks_exact(4))
    {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    let before = pixmap.clone();

    draw(&mut pixmap);

    let mut result = buffer.clone();
    for ((dst, after), before) in result
        .as_bytes_mut()
        .chunks_exact_mut(4)
        .zip(pixmap.pixels())
        .zip(before.pixels())
    {
        if after != before {
            let color = after.demultiply();
            dst.copy_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    const WHITE: Rgba = [255, 255, 255, 255];

    #[test]
    fn test_single_point_path_draws_dot() {
        let buffer = PixelBuffer::filled(10, 10, WHITE);
        let path = Path::new(Point::new(5.0, 5.0), "#000000", 4.0);
        let result = draw_path(&buffer, &path);

        assert_eq!(result.pixel(5, 5), Some([0, 0, 0, 255]));
        assert_eq!(result.pixel(0, 0), Some(WHITE));
    }

    #[test]
    fn test_untouched_translucent_pixels_keep_bytes() {
        let buffer = PixelBuffer::filled(20, 20, [200, 100, 50, 77]);
        let mut path = Path::new(Point::new(2.0, 2.0), "blue", 2.0);
        path.points.push(Point::new(6.0, 2.0));
        let result = draw_path(&buffer, &path);

        assert_eq!(result.pixel(15, 15), buffer.pixel(15, 15));
        assert_ne!(result.pixel(4, 2), buffer.pixel(4, 2));
    }

    #[test]
    fn test_zero_length_arrow_draws_nothing() {
        let buffer = PixelBuffer::filled(10, 10, WHITE);
        let arrow = Arrow {
            id: Uuid::new_v4(),
            start: Point::new(5.0, 5.0),
            end: Point::new(5.0, 5.0),
            color: "red".into(),
            width: 3.0,
            head_size: 10.0,
        };
        assert_eq!(draw_arrow(&buffer, &arrow), buffer);
    }
}
