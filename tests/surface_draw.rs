use fbgl::render::*;
use fbgl::util::Point;
use fbgl::FbglError;
use proptest::prelude::*;

fn mem(w: u32, h: u32) -> Surface {
    Surface::open(SurfaceSource::Memory { width: w, height: h }).expect("memory surface")
}

fn checksum(s: &Surface) -> u64 {
    s.pixels()
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &p)| acc.wrapping_mul(31).wrapping_add(p as u64 ^ i as u64))
}

#[test]
fn test_fill_every_pixel_idempotent() {
    let mut s = mem(37, 11);
    s.fill(0xFF0000);
    assert!(s.pixels().iter().all(|&p| p == 0xFF0000));
    let before = checksum(&s);
    s.fill(0xFF0000);
    assert_eq!(checksum(&s), before);
}

#[test]
fn test_single_point_line() {
    let mut s = mem(16, 16);
    draw_line(&mut s, Point::new(0, 0), Point::new(0, 0), WHITE);
    assert_eq!(s.pixels().iter().filter(|&&p| p == WHITE).count(), 1);
}

#[test]
fn test_filled_rect_then_outline() {
    let mut s = mem(32, 32);
    draw_rectangle_filled(&mut s, Point::new(0, 0), Point::new(10, 10), GREEN);
    draw_rectangle_outline(&mut s, Point::new(0, 0), Point::new(10, 10), BLACK);
    let interior = (1..9)
        .flat_map(|y| (1..9).map(move |x| (x, y)))
        .filter(|&(x, y)| s.get_pixel(x, y) == Some(GREEN))
        .count();
    assert_eq!(interior, 64);
    assert_eq!(s.pixels().iter().filter(|&&p| p == GREEN).count(), 64);
}

#[test]
fn test_filled_circle_spans() {
    let mut s = mem(64, 64);
    draw_circle_filled(&mut s, Point::new(5, 5), 0, RED);
    assert_eq!(s.pixels().iter().filter(|&&p| p == RED).count(), 1);

    let r = 12;
    draw_circle_filled(&mut s, Point::new(32, 32), r, BLUE);
    let span = (0..64).filter(|&x| s.get_pixel(x, 32) == Some(BLUE)).count();
    assert_eq!(span, (2 * r + 1) as usize);
}

#[test]
fn test_closed_surface() {
    let mut s = mem(8, 8);
    s.close().unwrap();
    assert!(matches!(s.close(), Err(FbglError::AlreadyClosed)));
    draw_line(&mut s, Point::new(0, 0), Point::new(7, 7), RED);
    draw_circle_filled(&mut s, Point::new(4, 4), 3, RED);
    assert!(s.pixels().is_empty());
}

#[cfg(target_os = "linux")]
#[test]
fn test_emulated_surface_geometry() {
    let key = 0x5EED_F000 + (std::process::id() as i32 & 0xFF);
    let mut s = match Surface::open(SurfaceSource::Emulated { key }) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("skipping, no SysV shm: {}", e);
            return;
        }
    };
    assert_eq!(s.kind(), Some(BackendKind::Emulated));
    assert_eq!(s.dimensions(), (800, 600));
    assert_eq!(s.stride(), 3200);
    assert_eq!(s.len(), 3200 * 600);
    assert_eq!(s.info().id, "FBGL_EMU");
    assert!(s.pixels().iter().all(|&p| p == 0));
    s.set_pixel(799, 599, WHITE);
    assert_eq!(s.get_pixel(799, 599), Some(WHITE));
    s.close().unwrap();
    fbgl::render::backend::shm::remove_segment(key).unwrap();
}

proptest! {
    #[test]
    fn prop_in_bounds_pixel_reads_back(w in 1u32..64, h in 1u32..64, fx in 0.0f64..1.0, fy in 0.0f64..1.0, c: u32) {
        let mut s = mem(w, h);
        let x = (fx * w as f64) as i32;
        let y = (fy * h as f64) as i32;
        s.set_pixel(x, y, c);
        let idx = y as usize * (s.stride() / 4) + x as usize;
        prop_assert_eq!(s.pixels()[idx], c);
        prop_assert_eq!(s.get_pixel(x, y), Some(c));
    }

    #[test]
    fn prop_out_of_bounds_pixel_is_ignored(x in any::<i32>(), y in any::<i32>(), c: u32) {
        let mut s = mem(16, 9);
        prop_assume!(x < 0 || y < 0 || x >= 16 || y >= 9);
        s.fill(0x0A0B0C);
        let before = checksum(&s);
        s.set_pixel(x, y, c);
        prop_assert_eq!(checksum(&s), before);
    }

    #[test]
    fn prop_line_hits_both_ends(x0 in -20i32..40, y0 in -20i32..40, x1 in -20i32..40, y1 in -20i32..40) {
        let mut s = mem(20, 20);
        draw_line(&mut s, Point::new(x0, y0), Point::new(x1, y1), WHITE);
        for (x, y) in [(x0, y0), (x1, y1)] {
            if (0..20).contains(&x) && (0..20).contains(&y) {
                prop_assert_eq!(s.get_pixel(x, y), Some(WHITE));
            }
        }
    }

    #[test]
    fn prop_shapes_never_panic(cx in -1000i32..1000, cy in -1000i32..1000, r in -5i32..300) {
        let mut s = mem(32, 24);
        draw_circle_outline(&mut s, Point::new(cx, cy), r, RED);
        draw_circle_filled(&mut s, Point::new(cx, cy), r, RED);
        draw_rectangle_filled(&mut s, Point::new(cx, cy), Point::new(cx + r, cy + r), RED);
        draw_rectangle_outline(&mut s, Point::new(cx - r, cy - r), Point::new(cx, cy), RED);
        prop_assert_eq!(s.pixels().len(), 32 * 24);
    }
}
