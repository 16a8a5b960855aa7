// Camera over the map world: clamped offset plus an eased pan toward a target.
use crate::config::CameraConfig;

/// Decelerating curve on `[0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pan {
    from_x: f64,
    from_y: f64,
    to_x: f64,
    to_y: f64,
    started_at: f64,
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub offset_x: f64,
    pub offset_y: f64,
    pub world_w: f64,
    pub world_h: f64,
    pub viewport_w: f64,
    pub viewport_h: f64,
    pub pan_duration_ms: f64,
    pub parallax_factor: f64,
    pan: Option<Pan>,
    pub initialized: bool,
}

impl Camera {
    pub fn new(config: &CameraConfig, world_w: f64, world_h: f64) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            world_w,
            world_h,
            viewport_w: config.viewport_width,
            viewport_h: config.viewport_height,
            pan_duration_ms: config.pan_duration_ms.max(1.0),
            parallax_factor: config.parallax_factor,
            pan: None,
            initialized: false,
        }
    }

    fn max_x(&self) -> f64 {
        (self.world_w - self.viewport_w).max(0.0)
    }

    fn max_y(&self) -> f64 {
        (self.world_h - self.viewport_h).max(0.0)
    }

    /// Offset that centres `(x, y)`, clamped to the world.
    pub fn desired_offset(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.viewport_w / 2.0).clamp(0.0, self.max_x()),
            (y - self.viewport_h / 2.0).clamp(0.0, self.max_y()),
        )
    }

    /// Starts (or retargets) an eased pan that centres `(x, y)`.
    pub fn center_on(&mut self, x: f64, y: f64, now: f64) {
        self.update(now);
        let (to_x, to_y) = self.desired_offset(x, y);
        if let Some(pan) = self.pan {
            if pan.to_x == to_x && pan.to_y == to_y {
                return;
            }
        }
        if to_x == self.offset_x && to_y == self.offset_y {
            self.pan = None;
            return;
        }
        self.pan = Some(Pan {
            from_x: self.offset_x,
            from_y: self.offset_y,
            to_x,
            to_y,
            started_at: now,
        });
    }

    /// Jumps straight to the centred offset.
    pub fn snap_to(&mut self, x: f64, y: f64) {
        let (ox, oy) = self.desired_offset(x, y);
        self.offset_x = ox;
        self.offset_y = oy;
        self.pan = None;
        self.initialized = true;
    }

    /// Advances an in-flight pan. Returns true when the offset moved.
    pub fn update(&mut self, now: f64) -> bool {
        let Some(pan) = self.pan else {
            return false;
        };
        let t = ((now - pan.started_at) / self.pan_duration_ms).clamp(0.0, 1.0);
        let k = ease_out_cubic(t);
        let x = pan.from_x + (pan.to_x - pan.from_x) * k;
        let y = pan.from_y + (pan.to_y - pan.from_y) * k;
        if t >= 1.0 {
            self.pan = None;
        }
        let moved = x != self.offset_x || y != self.offset_y;
        self.offset_x = x.clamp(0.0, self.max_x());
        self.offset_y = y.clamp(0.0, self.max_y());
        moved
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    /// Viewport resized; keeps the offset inside the world.
    pub fn set_viewport(&mut self, w: f64, h: f64) {
        self.viewport_w = w.max(0.0);
        self.viewport_h = h.max(0.0);
        self.offset_x = self.offset_x.clamp(0.0, self.max_x());
        self.offset_y = self.offset_y.clamp(0.0, self.max_y());
        if let Some(pan) = self.pan.as_mut() {
            pan.to_x = pan.to_x.clamp(0.0, (self.world_w - self.viewport_w).max(0.0));
            pan.to_y = pan.to_y.clamp(0.0, (self.world_h - self.viewport_h).max(0.0));
        }
    }

    /// Background offset for the parallax layer (moves slower than the map).
    pub fn parallax(&self) -> (f64, f64) {
        (
            -self.offset_x * self.parallax_factor,
            -self.offset_y * self.parallax_factor,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        // 960 x 640 world seen through a 480 x 320 window
        Camera::new(&CameraConfig::default(), 960.0, 640.0)
    }

    fn in_bounds(c: &Camera) -> bool {
        (0.0..=480.0).contains(&c.offset_x) && (0.0..=320.0).contains(&c.offset_y)
    }

    #[test]
    fn desired_offset_is_clamped_everywhere() {
        let c = camera();
        for x in [-5000.0, -1.0, 0.0, 100.0, 480.0, 959.0, 960.0, 12_000.0] {
            for y in [-300.0, 0.0, 160.0, 639.0, 9_000.0] {
                let (ox, oy) = c.desired_offset(x, y);
                assert!((0.0..=480.0).contains(&ox), "x={x}");
                assert!((0.0..=320.0).contains(&oy), "y={y}");
            }
        }
        assert_eq!(c.desired_offset(480.0, 320.0), (240.0, 160.0));
    }

    #[test]
    fn world_smaller_than_viewport_pins_to_zero() {
        let mut c = Camera::new(&CameraConfig::default(), 200.0, 100.0);
        c.center_on(150.0, 90.0, 0.0);
        c.update(1_000.0);
        assert_eq!((c.offset_x, c.offset_y), (0.0, 0.0));
    }

    #[test]
    fn pan_eases_out_and_lands_on_target() {
        let mut c = camera();
        c.center_on(720.0, 480.0, 0.0); // target (480, 320)
        assert!(c.is_panning());
        c.update(125.0);
        // halfway in time is well past halfway in distance
        assert!(c.offset_x > 240.0 + 100.0);
        assert!(in_bounds(&c));
        c.update(250.0);
        assert_eq!((c.offset_x, c.offset_y), (480.0, 320.0));
        assert!(!c.is_panning());
        assert!(!c.update(300.0));
    }

    #[test]
    fn retarget_starts_from_current_position() {
        let mut c = camera();
        c.center_on(720.0, 480.0, 0.0);
        c.update(100.0);
        let mid = (c.offset_x, c.offset_y);
        c.center_on(240.0, 160.0, 100.0);
        // no jump at the moment of retargeting
        c.update(100.0);
        assert_eq!((c.offset_x, c.offset_y), mid);
        c.update(350.0);
        assert_eq!((c.offset_x, c.offset_y), (0.0, 0.0));
    }

    #[test]
    fn offsets_stay_in_bounds_through_many_moves() {
        let mut c = camera();
        let mut now = 0.0;
        let targets = [(-100.0, -100.0), (2000.0, 50.0), (500.0, 900.0), (30.0, 30.0), (960.0, 640.0)];
        for (i, (x, y)) in targets.iter().cycle().take(40).enumerate() {
            c.center_on(*x, *y, now);
            now += (i % 7) as f64 * 20.0;
            c.update(now);
            assert!(in_bounds(&c));
        }
    }

    #[test]
    fn parallax_follows_offset_and_resize_reclamps() {
        let mut c = camera();
        c.snap_to(960.0, 640.0);
        assert_eq!(c.parallax(), (-480.0 * 0.35, -320.0 * 0.35));
        c.set_viewport(800.0, 600.0);
        assert_eq!((c.offset_x, c.offset_y), (160.0, 40.0));
    }

    #[test]
    fn ease_out_shape() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
        assert_eq!(ease_out_cubic(2.0), 1.0);
    }
}
