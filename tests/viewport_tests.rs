use std::cell::RefCell;
use std::rc::Rc;

use scene_loop::core::{Viewport, ViewportState, MAX_PIXEL_RATIO};

#[cfg(test)]
mod viewport_tests {
    use super::*;

    #[test]
    fn test_zero_sized_window_clamps_to_one_pixel() {
        let viewport = Viewport::new(0, 0, 1.0);
        assert_eq!((viewport.width, viewport.height), (1, 1));
        assert_eq!(viewport.drawable_size(), (1, 1));
        assert!(viewport.aspect().is_finite());
    }

    #[test]
    fn test_pixel_ratio_is_capped() {
        for scale in [0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 4.0] {
            let viewport = Viewport::new(640, 480, scale);
            assert!(viewport.pixel_ratio <= MAX_PIXEL_RATIO);
            assert_eq!(viewport.pixel_ratio, (scale as f32).min(MAX_PIXEL_RATIO));
        }
    }

    #[test]
    fn test_bad_device_scale_falls_back_to_one() {
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(Viewport::new(640, 480, scale).pixel_ratio, 1.0);
        }
    }

    #[test]
    fn test_drawable_size_follows_pixel_ratio() {
        assert_eq!(Viewport::new(800, 600, 1.5).drawable_size(), (1200, 900));
        assert_eq!(Viewport::new(800, 600, 3.0).drawable_size(), (1600, 1200));
    }

    #[test]
    fn test_aspect_tracks_latest_resize() {
        let mut state: ViewportState<()> = ViewportState::new(800, 600, 1.0);
        for (w, h) in [(1920, 1080), (300, 900), (0, 50), (1024, 1024)] {
            let viewport = state.resize(w, h, 1.0, &mut ());
            assert_eq!(state.current(), viewport);
            assert_eq!(viewport.aspect(), w.max(1) as f32 / h.max(1) as f32);
        }
    }

    #[test]
    fn test_handlers_run_in_order_on_every_resize() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut state: ViewportState<Vec<(u32, u32)>> = ViewportState::new(10, 10, 1.0);

        let first = log.clone();
        state.on_resize(move |viewport, _| first.borrow_mut().push(("first", viewport.width)));
        let second = log.clone();
        state.on_resize(move |viewport, _| second.borrow_mut().push(("second", viewport.width)));
        state.on_resize(|viewport, sizes| sizes.push((viewport.width, viewport.height)));

        let mut sizes = Vec::new();
        state.resize(20, 10, 1.0, &mut sizes);
        state.resize(30, 15, 2.0, &mut sizes);

        assert_eq!(
            *log.borrow(),
            [("first", 20), ("second", 20), ("first", 30), ("second", 30)]
        );
        assert_eq!(sizes, [(20, 10), (30, 15)]);
    }

    #[test]
    fn test_sync_replays_current_viewport() {
        let mut state: ViewportState<Vec<Viewport>> = ViewportState::new(400, 300, 2.0);
        state.on_resize(|viewport, seen| seen.push(*viewport));

        let mut seen = Vec::new();
        state.sync(&mut seen);
        assert_eq!(seen, [Viewport::new(400, 300, 2.0)]);
    }
}
