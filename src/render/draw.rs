// FBGL
// copyright zipxing@hotmail.com 2022～2025

//! Rasterizer: lines, rectangles and circles.
//!
//! Plain functions over a [`Surface`]; everything is clipped against the
//! surface so callers may pass any coordinates.
//!
//! line uses Bresenham, visiting only the steps that fall on the surface,
//! circle_outline is the 8-way midpoint algorithm,
//! circle_filled draws one horizontal span per row

use crate::{render::surface::Surface, util::Point};

/// Horizontal span from `x0` to `x1` inclusive on row `y`.
pub fn draw_hline(s: &mut Surface, x0: i32, x1: i32, y: i32, color: u32) {
    let (a, b) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
    let w = s.width() as i64;
    let a = (a as i64).max(0);
    let b = (b as i64).min(w - 1);
    if a > b {
        return;
    }
    if let Some(row) = s.row_mut(y) {
        row[a as usize..=b as usize].fill(color);
    }
}

/// Bresenham line from `p0` to `p1`, both ends included.
///
/// Step k of the walk moves the major axis by k and the minor axis by
/// `(2k * minor + major - 1) / (2 * major)`, exactly where the incremental
/// error term puts it. Only the run of steps that lands on the surface is
/// visited, so endpoints far outside cost nothing.
pub fn draw_line(s: &mut Surface, p0: Point, p1: Point, color: u32) {
    let (w, h) = (s.width() as i64, s.height() as i64);
    let (x0, y0, x1, y1) = (p0.x as i64, p0.y as i64, p1.x as i64, p1.y as i64);
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    // ties go to x, as in the error-term walk
    let x_major = dx >= dy;
    let (major, minor) = if x_major { (dx, dy) } else { (dy, dx) };
    let (m0, sm, m_len) = if x_major { (x0, sx, w) } else { (y0, sy, h) };
    let (n0, sn, n_len) = if x_major { (y0, sy, h) } else { (x0, sx, w) };
    let minor_at = |k: i64| -> i64 {
        if major == 0 {
            return n0;
        }
        let steps = (2 * k as i128 * minor as i128 + major as i128 - 1) / (2 * major as i128);
        n0 + sn * steps as i64
    };

    let Some((lo, hi)) = axis_steps(m0, sm, major, m_len) else {
        return;
    };
    // the minor coordinate is monotonic in k, its on-surface steps are one run
    let (first, past) = if sn > 0 {
        (
            first_step(lo, hi, |k| minor_at(k) >= 0),
            first_step(lo, hi, |k| minor_at(k) >= n_len),
        )
    } else {
        (
            first_step(lo, hi, |k| minor_at(k) < n_len),
            first_step(lo, hi, |k| minor_at(k) < 0),
        )
    };
    let Some(first) = first else {
        return;
    };
    let last = past.map_or(hi, |p| p - 1);
    for k in first..=last {
        let (a, b) = (m0 + sm * k, minor_at(k));
        let (x, y) = if x_major { (a, b) } else { (b, a) };
        set_pixel_wide(s, x, y, color);
    }
}

// steps k in 0..=len with start + dir * k inside 0..size
fn axis_steps(start: i64, dir: i64, len: i64, size: i64) -> Option<(i64, i64)> {
    let (lo, hi) = if dir > 0 {
        (-start, size - 1 - start)
    } else {
        (start - size + 1, start)
    };
    let (lo, hi) = (lo.max(0), hi.min(len));
    (lo <= hi).then_some((lo, hi))
}

// smallest k in lo..=hi where pred turns true; pred goes false then true
fn first_step(mut lo: i64, mut hi: i64, pred: impl Fn(i64) -> bool) -> Option<i64> {
    if lo > hi || !pred(hi) {
        return None;
    }
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(mid) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Some(lo)
}

/// One pixel wide frame with edges at `x0`, `x1 - 1`, `y0` and `y1 - 1`.
pub fn draw_rectangle_outline(s: &mut Surface, top_left: Point, bottom_right: Point, color: u32) {
    let (x0, y0, x1, y1) = (top_left.x, top_left.y, bottom_right.x, bottom_right.y);
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    draw_hline(s, x0, x1 - 1, y0, color);
    draw_hline(s, x0, x1 - 1, y1 - 1, color);
    for y in y0.max(0)..y1.min(s.height() as i32) {
        s.set_pixel(x0, y, color);
        s.set_pixel(x1 - 1, y, color);
    }
}

/// Fills `[top_left, bottom_right)`.
pub fn draw_rectangle_filled(s: &mut Surface, top_left: Point, bottom_right: Point, color: u32) {
    let (x0, y0, x1, y1) = (top_left.x, top_left.y, bottom_right.x, bottom_right.y);
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    for y in y0.max(0)..y1.min(s.height() as i32) {
        draw_hline(s, x0, x1 - 1, y, color);
    }
}

pub fn draw_circle_outline(s: &mut Surface, center: Point, radius: i32, color: u32) {
    if radius < 0 {
        return;
    }
    let (cx, cy) = (center.x as i64, center.y as i64);
    let mut x: i64 = 0;
    let mut y: i64 = radius as i64;
    let mut d: i64 = 3 - 2 * radius as i64;

    while x <= y {
        for (px, py) in [
            (cx + x, cy + y),
            (cx - x, cy + y),
            (cx + x, cy - y),
            (cx - x, cy - y),
            (cx + y, cy + x),
            (cx - y, cy + x),
            (cx + y, cy - x),
            (cx - y, cy - x),
        ] {
            set_pixel_wide(s, px, py, color);
        }
        x += 1;
        if d > 0 {
            y -= 1;
            d += 4 * (x - y) + 10;
        } else {
            d += 4 * x + 6;
        }
    }
}

pub fn draw_circle_filled(s: &mut Surface, center: Point, radius: i32, color: u32) {
    if radius < 0 {
        return;
    }
    let r = radius as i64;
    let h = s.height() as i64;
    let cy = center.y as i64;
    for dy in (-r).max(-cy)..=r.min(h - 1 - cy) {
        let half = ((r * r - dy * dy) as f64).sqrt().floor() as i64;
        let x0 = (center.x as i64 - half).max(i32::MIN as i64) as i32;
        let x1 = (center.x as i64 + half).min(i32::MAX as i64) as i32;
        draw_hline(s, x0, x1, (cy + dy) as i32, color);
    }
}

// coordinates computed in i64 may leave the i32 range
#[inline]
fn set_pixel_wide(s: &mut Surface, x: i64, y: i64, color: u32) {
    if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
        s.set_pixel(x, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::SurfaceSource;

    fn mem(w: u32, h: u32) -> Surface {
        Surface::open(SurfaceSource::Memory { width: w, height: h }).unwrap()
    }

    fn count(s: &Surface, c: u32) -> usize {
        s.pixels().iter().filter(|&&p| p == c).count()
    }

    #[test]
    fn test_line_single_point() {
        let mut s = mem(8, 8);
        draw_line(&mut s, Point::new(0, 0), Point::new(0, 0), 1);
        assert_eq!(count(&s, 1), 1);
        assert_eq!(s.get_pixel(0, 0), Some(1));
    }

    #[test]
    fn test_line_includes_both_ends() {
        let mut s = mem(10, 10);
        draw_line(&mut s, Point::new(9, 1), Point::new(2, 7), 3);
        assert_eq!(s.get_pixel(9, 1), Some(3));
        assert_eq!(s.get_pixel(2, 7), Some(3));
        // x-major line: one pixel per column
        assert_eq!(count(&s, 3), 8);
    }

    #[test]
    fn test_horizontal_and_diagonal() {
        let mut s = mem(6, 6);
        draw_line(&mut s, Point::new(0, 2), Point::new(5, 2), 1);
        assert!((0..6).all(|x| s.get_pixel(x, 2) == Some(1)));
        draw_line(&mut s, Point::new(0, 0), Point::new(5, 5), 2);
        assert!((0..6).all(|i| s.get_pixel(i, i) == Some(2)));
    }

    #[test]
    fn test_line_partly_outside_clips() {
        let mut s = mem(4, 4);
        draw_line(&mut s, Point::new(-10, 1), Point::new(10, 1), 1);
        assert_eq!(count(&s, 1), 4);
        draw_line(&mut s, Point::new(-100, -100), Point::new(-1, -50), 2);
        assert_eq!(count(&s, 2), 0);
    }

    // the plain error-term walk over every step, on or off the surface
    fn walk_line(s: &mut Surface, p0: Point, p1: Point, color: u32) {
        let (x1, y1) = (p1.x as i64, p1.y as i64);
        let (mut x, mut y) = (p0.x as i64, p0.y as i64);
        let dx = (x1 - x).abs();
        let dy = (y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx - dy;
        loop {
            set_pixel_wide(s, x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    #[test]
    fn test_line_matches_full_walk() {
        let coords: Vec<i32> = (-7..13).step_by(2).collect();
        let mut a = mem(5, 4);
        let mut b = mem(5, 4);
        for &x0 in &coords {
            for &y0 in &coords {
                for &x1 in &coords {
                    for &y1 in &coords {
                        let (p0, p1) = (Point::new(x0, y0), Point::new(x1, y1));
                        a.fill(0);
                        b.fill(0);
                        draw_line(&mut a, p0, p1, 1);
                        walk_line(&mut b, p0, p1, 1);
                        assert_eq!(a.pixels(), b.pixels(), "{:?} -> {:?}", p0, p1);
                    }
                }
            }
        }
    }

    #[test]
    fn test_line_far_endpoints() {
        let mut s = mem(4, 4);
        draw_line(&mut s, Point::new(0, 1), Point::new(i32::MAX, 1), 1);
        assert!((0..4).all(|x| s.get_pixel(x, 1) == Some(1)));
        assert_eq!(count(&s, 1), 4);

        draw_line(&mut s, Point::new(i32::MIN, i32::MIN), Point::new(i32::MAX, i32::MAX), 2);
        assert!((0..4).all(|i| s.get_pixel(i, i) == Some(2)));
        assert_eq!(count(&s, 2), 4);

        s.fill(0);
        draw_line(&mut s, Point::new(2, i32::MAX), Point::new(2, i32::MIN), 3);
        assert_eq!(count(&s, 3), 4);
        assert!((0..4).all(|y| s.get_pixel(2, y) == Some(3)));

        // steep and long, passes the surface in a single column
        s.fill(0);
        draw_line(&mut s, Point::new(1, -1_000_000_000), Point::new(2, 1_000_000_000), 4);
        assert_eq!(count(&s, 4), 4);
    }

    #[test]
    fn test_rectangle_outline_edges() {
        let mut s = mem(6, 6);
        draw_rectangle_outline(&mut s, Point::new(1, 1), Point::new(5, 4), 9);
        assert_eq!(s.get_pixel(1, 1), Some(9));
        assert_eq!(s.get_pixel(4, 3), Some(9));
        assert_eq!(s.get_pixel(5, 4), Some(0));
        assert_eq!(s.get_pixel(2, 2), Some(0));
        // 4 wide, 3 high
        assert_eq!(count(&s, 9), 4 + 4 + 1 + 1);
    }

    #[test]
    fn test_filled_then_outline_keeps_interior() {
        let mut s = mem(12, 12);
        draw_rectangle_filled(&mut s, Point::new(0, 0), Point::new(10, 10), 7);
        draw_rectangle_outline(&mut s, Point::new(0, 0), Point::new(10, 10), 0);
        assert_eq!(count(&s, 7), 64);
        for y in 1..9 {
            for x in 1..9 {
                assert_eq!(s.get_pixel(x, y), Some(7));
            }
        }
    }

    #[test]
    fn test_empty_rectangles() {
        let mut s = mem(4, 4);
        draw_rectangle_filled(&mut s, Point::new(2, 2), Point::new(2, 3), 1);
        draw_rectangle_outline(&mut s, Point::new(3, 3), Point::new(1, 1), 1);
        assert_eq!(count(&s, 1), 0);
    }

    #[test]
    fn test_circle_radius_zero() {
        let mut s = mem(5, 5);
        draw_circle_filled(&mut s, Point::new(2, 2), 0, 1);
        assert_eq!(count(&s, 1), 1);
        draw_circle_outline(&mut s, Point::new(1, 1), 0, 2);
        assert_eq!(count(&s, 2), 1);
    }

    #[test]
    fn test_filled_circle_center_span() {
        let mut s = mem(21, 21);
        draw_circle_filled(&mut s, Point::new(10, 10), 5, 4);
        let row: Vec<u32> = (0..21).map(|x| s.get_pixel(x, 10).unwrap()).collect();
        assert_eq!(row.iter().filter(|&&p| p == 4).count(), 11);
        assert_eq!(s.get_pixel(10, 5), Some(4));
        assert_eq!(s.get_pixel(10, 4), Some(0));
    }

    #[test]
    fn test_circle_outline_symmetric() {
        let mut s = mem(21, 21);
        draw_circle_outline(&mut s, Point::new(10, 10), 6, 1);
        for (x, y) in [(16, 10), (4, 10), (10, 16), (10, 4)] {
            assert_eq!(s.get_pixel(x, y), Some(1));
        }
        assert_eq!(s.get_pixel(10, 10), Some(0));
        for y in 0..21 {
            for x in 0..21 {
                let p = s.get_pixel(x, y);
                assert_eq!(p, s.get_pixel(20 - x, y));
                assert_eq!(p, s.get_pixel(x, 20 - y));
            }
        }
    }

    #[test]
    fn test_negative_radius_draws_nothing() {
        let mut s = mem(5, 5);
        draw_circle_filled(&mut s, Point::new(2, 2), -1, 1);
        draw_circle_outline(&mut s, Point::new(2, 2), -3, 1);
        assert_eq!(count(&s, 1), 0);
    }

    #[test]
    fn test_circle_mostly_outside() {
        let mut s = mem(8, 8);
        draw_circle_filled(&mut s, Point::new(-3, -3), 5, 1);
        assert_eq!(s.get_pixel(0, 0), Some(1));
        assert_eq!(s.get_pixel(7, 7), Some(0));
    }
}
