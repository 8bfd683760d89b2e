//! Physics resolution for rectangles against static platforms
//!
//! Gravity and movement are applied per tick, then overlaps with platforms are
//! corrected on the vertical axis only. Horizontal movement is never blocked
//! by platforms; only the level bounds clamp it.
//!
//! Known simplifications: there is no tunnelling prevention for fast bodies,
//! and when a body overlaps several platforms in one tick they are handled in
//! iteration order (the first correction zeroes the vertical velocity, so
//! later overlaps are left alone) rather than by penetration depth.

use glam::Vec2;

use super::rect::Rect;

/// Outer limits a body is clamped to after platform resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Right edge of the level (left edge is always 0)
    pub level_width: f32,
    /// Bottom of the viewport, acting as an implicit floor
    pub floor_y: f32,
}

/// What a body touched during resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contact {
    /// Landed this tick (platform top or floor)
    pub grounded: bool,
    /// Index of the platform landed on (`None` on the floor or airborne)
    pub ground: Option<usize>,
    /// Bumped a platform underside or the top of the viewport
    pub hit_ceiling: bool,
    /// Pushed back inside the horizontal level bounds
    pub hit_wall: bool,
}

impl Contact {
    /// Combine two contact reports, keeping the first supporting platform
    pub fn merge(self, other: Contact) -> Contact {
        Contact {
            grounded: self.grounded || other.grounded,
            ground: self.ground.or(other.ground),
            hit_ceiling: self.hit_ceiling || other.hit_ceiling,
            hit_wall: self.hit_wall || other.hit_wall,
        }
    }
}

/// Accelerate downward by one tick of gravity
#[inline]
pub fn apply_gravity(vel: &mut Vec2, gravity: f32) {
    vel.y += gravity;
}

/// Correct vertical overlap with platforms
///
/// Falling bodies are snapped onto the platform top and grounded; rising
/// bodies are snapped under the platform bottom. A body with zero vertical
/// velocity is left where it is.
pub fn resolve_platforms<'a>(
    rect: &mut Rect,
    vel: &mut Vec2,
    platforms: impl IntoIterator<Item = &'a Rect>,
) -> Contact {
    let mut contact = Contact::default();

    for (index, platform) in platforms.into_iter().enumerate() {
        if !rect.intersects(platform) {
            continue;
        }
        if vel.y > 0.0 {
            rect.set_bottom(platform.top());
            vel.y = 0.0;
            contact.grounded = true;
            contact.ground.get_or_insert(index);
        } else if vel.y < 0.0 {
            rect.set_top(platform.bottom());
            vel.y = 0.0;
            contact.hit_ceiling = true;
        }
    }

    contact
}

/// Clamp a body inside the level horizontally and the viewport vertically
pub fn clamp_to_bounds(rect: &mut Rect, vel: &mut Vec2, bounds: Bounds) -> Contact {
    let mut contact = Contact::default();

    if rect.right() > bounds.level_width {
        rect.set_right(bounds.level_width);
        contact.hit_wall = true;
    }
    if rect.left() < 0.0 {
        rect.set_left(0.0);
        contact.hit_wall = true;
    }

    if rect.top() < 0.0 {
        rect.set_top(0.0);
        vel.y = vel.y.max(0.0);
        contact.hit_ceiling = true;
    }
    // Floor fallback when nothing is underfoot
    if rect.bottom() > bounds.floor_y {
        rect.set_bottom(bounds.floor_y);
        vel.y = vel.y.min(0.0);
        contact.grounded = true;
    }

    contact
}

/// Full per-tick physics step shared by the player and enemies
///
/// Horizontal move, gravity, vertical move, platform correction, bounds clamp.
pub fn step_body<'a>(
    rect: &mut Rect,
    vel: &mut Vec2,
    platforms: impl IntoIterator<Item = &'a Rect>,
    gravity: f32,
    bounds: Bounds,
) -> Contact {
    rect.x += vel.x;

    apply_gravity(vel, gravity);
    rect.y += vel.y;

    let contact = resolve_platforms(rect, vel, platforms);
    contact.merge(clamp_to_bounds(rect, vel, bounds))
}

/// Horizontal scroll that centers `focus_x`, clamped to the level
///
/// Levels narrower than the viewport never scroll.
pub fn camera_x(focus_x: f32, level_width: f32, viewport_width: f32) -> f32 {
    let max_scroll = (level_width - viewport_width).max(0.0);
    (focus_x - viewport_width / 2.0).clamp(0.0, max_scroll)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Bounds = Bounds {
        level_width: 3840.0,
        floor_y: 720.0,
    };

    #[test]
    fn test_falling_body_lands_on_platform() {
        let platform = Rect::new(0.0, 400.0, 200.0, 20.0);
        let mut rect = Rect::new(50.0, 300.0, 80.0, 105.0);
        let mut vel = Vec2::new(0.0, 5.0);

        let contact = resolve_platforms(&mut rect, &mut vel, [&platform]);
        assert!(contact.grounded);
        assert_eq!(contact.ground, Some(0));
        assert_eq!(rect.bottom(), 400.0);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_rising_body_bumps_head() {
        let platform = Rect::new(0.0, 100.0, 200.0, 20.0);
        let mut rect = Rect::new(50.0, 110.0, 80.0, 120.0);
        let mut vel = Vec2::new(0.0, -10.0);

        let contact = resolve_platforms(&mut rect, &mut vel, [&platform]);
        assert!(!contact.grounded);
        assert!(contact.hit_ceiling);
        assert_eq!(rect.top(), 120.0);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_only_first_overlap_is_corrected() {
        let a = Rect::new(0.0, 400.0, 100.0, 20.0);
        let b = Rect::new(0.0, 410.0, 100.0, 20.0);
        let mut rect = Rect::new(0.0, 300.0, 50.0, 120.0);
        let mut vel = Vec2::new(0.0, 3.0);

        let contact = resolve_platforms(&mut rect, &mut vel, [&a, &b]);
        assert_eq!(contact.ground, Some(0));
        assert_eq!(rect.bottom(), 400.0);
    }

    #[test]
    fn test_floor_fallback() {
        let mut rect = Rect::new(10.0, 650.0, 80.0, 80.0);
        let mut vel = Vec2::new(0.0, 4.0);

        let contact = step_body(&mut rect, &mut vel, [], 0.8, BOUNDS);
        assert!(contact.grounded);
        assert_eq!(contact.ground, None);
        assert_eq!(rect.bottom(), 720.0);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_horizontal_clamp() {
        let mut rect = Rect::new(3800.0, 100.0, 80.0, 80.0);
        let mut vel = Vec2::new(10.0, 0.0);
        let contact = step_body(&mut rect, &mut vel, [], 0.8, BOUNDS);
        assert!(contact.hit_wall);
        assert_eq!(rect.right(), 3840.0);

        let mut rect = Rect::new(2.0, 100.0, 80.0, 80.0);
        let mut vel = Vec2::new(-5.0, 0.0);
        step_body(&mut rect, &mut vel, [], 0.8, BOUNDS);
        assert_eq!(rect.left(), 0.0);
    }

    #[test]
    fn test_ceiling_clamp_kills_upward_velocity() {
        let mut rect = Rect::new(100.0, 5.0, 80.0, 80.0);
        let mut vel = Vec2::new(0.0, -15.0);
        let contact = step_body(&mut rect, &mut vel, [], 0.8, BOUNDS);
        assert!(contact.hit_ceiling);
        assert_eq!(rect.top(), 0.0);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_resting_body_stays_put() {
        let platform = Rect::new(0.0, 400.0, 500.0, 20.0);
        let mut rect = Rect::new(100.0, 320.0, 80.0, 80.0);
        let mut vel = Vec2::ZERO;

        for _ in 0..120 {
            let contact = step_body(&mut rect, &mut vel, [&platform], 0.8, BOUNDS);
            assert!(contact.grounded);
        }
        assert_eq!(rect.bottom(), 400.0);
    }

    #[test]
    fn test_camera_clamped() {
        assert_eq!(camera_x(100.0, 3840.0, 1280.0), 0.0);
        assert_eq!(camera_x(2000.0, 3840.0, 1280.0), 1360.0);
        assert_eq!(camera_x(3800.0, 3840.0, 1280.0), 2560.0);
        // Narrow level never scrolls
        assert_eq!(camera_x(900.0, 1000.0, 1280.0), 0.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn falling_body_rests_on_platform_top(
                px in -500.0f32..500.0,
                py in 100.0f32..600.0,
                pw in 50.0f32..400.0,
                ph in 5.0f32..60.0,
                overlap_x in 0.05f32..0.95,
                depth in 0.1f32..4.0,
                vy in 0.1f32..20.0,
            ) {
                let platform = Rect::new(px, py, pw, ph);
                let w = 40.0;
                let h = 60.0;
                let x = px + pw * overlap_x - w / 2.0;
                // Bottom edge slightly below the platform top
                let mut rect = Rect::new(x, py - h + depth.min(ph), w, h);
                let mut vel = Vec2::new(0.0, vy);

                let contact = resolve_platforms(&mut rect, &mut vel, [&platform]);
                prop_assert!(contact.grounded);
                prop_assert!((rect.bottom() - platform.top()).abs() < 1e-3);
                prop_assert_eq!(vel.y, 0.0);
            }

            #[test]
            fn clamped_body_stays_inside_level(
                x in -5000.0f32..9000.0,
                y in -500.0f32..1500.0,
                vx in -50.0f32..50.0,
                vy in -30.0f32..30.0,
            ) {
                let mut rect = Rect::new(x, y, 80.0, 120.0);
                let mut vel = Vec2::new(vx, vy);
                step_body(&mut rect, &mut vel, [], 0.8, BOUNDS);

                prop_assert!(rect.left() >= 0.0);
                prop_assert!(rect.right() <= BOUNDS.level_width);
                prop_assert!(rect.bottom() <= BOUNDS.floor_y + 1e-3);
            }

            #[test]
            fn camera_always_in_range(focus in -1000.0f32..10000.0) {
                let cam = camera_x(focus, 3840.0, 1280.0);
                prop_assert!((0.0..=2560.0).contains(&cam));
            }
        }
    }
}
