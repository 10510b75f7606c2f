//! Spatial collision detection
//!
//! Pure detect pass: shape tests plus a per-frame enumeration of every
//! interacting entity pair. No mutation happens here — the combat pipeline
//! consumes the returned events, so one projectile overlapping two hostiles
//! yields two independent events.

use glam::Vec2;

use super::state::{GameState, HostileShape};

/// `true` when two circles overlap
#[inline]
pub fn circle_circle(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// `true` when a circle overlaps an axis-aligned rectangle.
///
/// Clamps the circle center to the rectangle to find the closest point,
/// then tests that point against the radius.
#[inline]
pub fn circle_rect(center: Vec2, radius: f32, rect_min: Vec2, rect_max: Vec2) -> bool {
    let closest = center.clamp(rect_min, rect_max);
    center.distance(closest) < radius
}

/// `true` when a circle overlaps a hostile's footprint at `pos`
pub fn circle_hostile(center: Vec2, radius: f32, pos: Vec2, shape: &HostileShape) -> bool {
    match *shape {
        HostileShape::Circle { radius: r } => circle_circle(center, radius, pos, r),
        HostileShape::Rect { .. } => {
            let (min, max) = shape.bounds(pos);
            circle_rect(center, radius, min, max)
        }
    }
}

/// A confirmed overlap, identified by entity ID so resolution can run after
/// the detect pass finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    ProjectileHostile { projectile: u32, hostile: u32 },
    ProjectileElite { projectile: u32, elite: u32 },
    AvatarHostile { hostile: u32 },
    AvatarElite { elite: u32 },
    AvatarPickup { pickup: u32 },
    AvatarOrb { orb: u32 },
}

/// Enumerate all overlapping pairs for this frame.
///
/// Inactive entities are skipped; a missing avatar simply produces no
/// avatar events.
pub fn detect(state: &GameState) -> Vec<CollisionEvent> {
    let mut events = Vec::new();

    for projectile in state.projectiles.iter().filter(|p| p.active) {
        for hostile in state.hostiles.iter().filter(|h| h.active) {
            if circle_hostile(projectile.pos, projectile.radius, hostile.pos, &hostile.shape) {
                events.push(CollisionEvent::ProjectileHostile {
                    projectile: projectile.id,
                    hostile: hostile.id,
                });
            }
        }
        for elite in state.elites.iter().filter(|e| e.active) {
            if circle_circle(projectile.pos, projectile.radius, elite.pos, elite.radius) {
                events.push(CollisionEvent::ProjectileElite {
                    projectile: projectile.id,
                    elite: elite.id,
                });
            }
        }
    }

    if let Some(avatar) = &state.avatar {
        for hostile in state.hostiles.iter().filter(|h| h.active) {
            if circle_hostile(avatar.pos, avatar.radius, hostile.pos, &hostile.shape) {
                events.push(CollisionEvent::AvatarHostile {
                    hostile: hostile.id,
                });
            }
        }
        for elite in state.elites.iter().filter(|e| e.active) {
            if circle_circle(avatar.pos, avatar.radius, elite.pos, elite.radius) {
                events.push(CollisionEvent::AvatarElite { elite: elite.id });
            }
        }
        for pickup in state.pickups.iter().filter(|p| p.active) {
            if circle_circle(avatar.pos, avatar.radius, pickup.pos, pickup.radius) {
                events.push(CollisionEvent::AvatarPickup { pickup: pickup.id });
            }
        }
        for orb in state.orbs.iter().filter(|o| o.active) {
            if circle_circle(avatar.pos, avatar.radius, orb.pos, orb.radius) {
                events.push(CollisionEvent::AvatarOrb { orb: orb.id });
            }
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_circle_circle_overlap() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!(circle_circle(a, 6.0, b, 6.0));
        assert!(!circle_circle(a, 4.0, b, 4.0));
        // Exactly touching is not overlapping
        assert!(!circle_circle(a, 5.0, b, 5.0));
    }

    #[test]
    fn test_circle_rect_above_top_edge() {
        // Rectangle spanning (0,0)..(40,30); circle of radius 8 directly above
        let min = Vec2::new(0.0, 0.0);
        let max = Vec2::new(40.0, 30.0);

        // 10 units above the top edge: no collision
        assert!(!circle_rect(Vec2::new(20.0, -10.0), 8.0, min, max));
        // 7 units above: collision
        assert!(circle_rect(Vec2::new(20.0, -7.0), 8.0, min, max));
    }

    #[test]
    fn test_circle_rect_center_inside() {
        let min = Vec2::new(0.0, 0.0);
        let max = Vec2::new(40.0, 30.0);
        assert!(circle_rect(Vec2::new(20.0, 15.0), 1.0, min, max));
    }

    #[test]
    fn test_circle_rect_corner() {
        let min = Vec2::new(0.0, 0.0);
        let max = Vec2::new(40.0, 30.0);
        // Diagonal distance from the corner: 5 units at (43,34)
        assert!(circle_rect(Vec2::new(43.0, 34.0), 6.0, min, max));
        assert!(!circle_rect(Vec2::new(43.0, 34.0), 4.0, min, max));
    }

    proptest! {
        #[test]
        fn prop_circle_circle_symmetric(
            ax in -1000.0f32..1000.0, ay in -1000.0f32..1000.0,
            bx in -1000.0f32..1000.0, by in -1000.0f32..1000.0,
            ra in 0.1f32..100.0, rb in 0.1f32..100.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(circle_circle(a, ra, b, rb), circle_circle(b, rb, a, ra));
        }

        #[test]
        fn prop_circle_rect_matches_distance_to_closest_point(
            cx in -200.0f32..200.0, cy in -200.0f32..200.0,
            r in 0.1f32..50.0,
        ) {
            let min = Vec2::new(-40.0, -30.0);
            let max = Vec2::new(40.0, 30.0);
            let closest = Vec2::new(cx, cy).clamp(min, max);
            let expected = Vec2::new(cx, cy).distance(closest) < r;
            prop_assert_eq!(circle_rect(Vec2::new(cx, cy), r, min, max), expected);
        }
    }
}
