//! Bird physics: flap, semi-implicit Euler integration, bound clamping and
//! autopilot steering.

use super::state::{Bird, Pipe};

/// Autopilot steering gain (1/s)
pub const AUTOPILOT_GAIN: f32 = 4.0;
/// Largest vertical speed autopilot will command (px/s)
pub const AUTOPILOT_MAX_SPEED: f32 = 420.0;

/// Which playfield bounds the bird's edge reached this step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundsContact {
    pub ceiling: bool,
    pub ground: bool,
}

impl BoundsContact {
    pub fn any(&self) -> bool {
        self.ceiling || self.ground
    }
}

/// A flap replaces the vertical velocity outright
pub fn flap(bird: &mut Bird, impulse: f32) {
    bird.vel_y = impulse;
}

/// `v += g*dt; y += v*dt`
pub fn integrate(bird: &mut Bird, gravity: f32, dt: f32) {
    bird.vel_y += gravity * dt;
    bird.pos.y += bird.vel_y * dt;
}

/// Detect bound contact, then clamp the bird into `[r, ground - r]`.
///
/// Clamping always zeroes the outward velocity component, invulnerable or not.
pub fn clamp_to_bounds(bird: &mut Bird, ground_y: f32) -> BoundsContact {
    let contact = BoundsContact {
        ceiling: bird.top() <= 0.0,
        ground: bird.bottom() >= ground_y,
    };
    if contact.ground {
        bird.pos.y = ground_y - bird.radius;
        bird.vel_y = bird.vel_y.min(0.0);
    }
    if contact.ceiling {
        bird.pos.y = bird.radius;
        bird.vel_y = bird.vel_y.max(0.0);
    }
    contact
}

/// First pipe whose trailing edge is still ahead of the bird
pub fn next_pipe(pipes: &[Pipe], bird_x: f32) -> Option<&Pipe> {
    pipes.iter().find(|p| p.right() > bird_x)
}

/// Override vertical velocity toward `target_y`, rate-limited
pub fn steer_toward(bird: &mut Bird, target_y: f32) {
    let dy = target_y - bird.pos.y;
    bird.vel_y = (dy * AUTOPILOT_GAIN).clamp(-AUTOPILOT_MAX_SPEED, AUTOPILOT_MAX_SPEED);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Playfield;

    fn bird() -> Bird {
        Bird::new(&Playfield::default(), 14.0)
    }

    #[test]
    fn test_flap_ignores_current_velocity() {
        let mut b = bird();
        b.vel_y = 900.0;
        flap(&mut b, -420.0);
        assert_eq!(b.vel_y, -420.0);
        b.vel_y = -1000.0;
        flap(&mut b, -420.0);
        assert_eq!(b.vel_y, -420.0);
    }

    #[test]
    fn test_integrate_velocity_then_position() {
        let mut b = bird();
        let y0 = b.pos.y;
        integrate(&mut b, 1000.0, 0.05);
        assert!((b.vel_y - 50.0).abs() < 1e-4);
        assert!((b.pos.y - (y0 + 2.5)).abs() < 1e-4);
    }

    #[test]
    fn test_ground_clamp_zeroes_downward_velocity() {
        let mut b = bird();
        b.pos.y = 530.0;
        b.vel_y = 300.0;
        let contact = clamp_to_bounds(&mut b, 520.0);
        assert!(contact.ground && !contact.ceiling);
        assert_eq!(b.pos.y, 506.0);
        assert_eq!(b.vel_y, 0.0);
    }

    #[test]
    fn test_ceiling_clamp_keeps_downward_velocity() {
        let mut b = bird();
        b.pos.y = 5.0;
        b.vel_y = -200.0;
        let contact = clamp_to_bounds(&mut b, 520.0);
        assert!(contact.ceiling);
        assert_eq!(b.pos.y, 14.0);
        assert_eq!(b.vel_y, 0.0);

        b.vel_y = 50.0;
        clamp_to_bounds(&mut b, 520.0);
        assert_eq!(b.vel_y, 50.0);
    }

    #[test]
    fn test_no_contact_in_open_air() {
        let mut b = bird();
        b.vel_y = 120.0;
        let contact = clamp_to_bounds(&mut b, 520.0);
        assert!(!contact.any());
        assert_eq!(b.vel_y, 120.0);
    }

    #[test]
    fn test_steering_is_rate_limited() {
        let mut b = bird();
        b.pos.y = 100.0;
        steer_toward(&mut b, 400.0);
        assert_eq!(b.vel_y, AUTOPILOT_MAX_SPEED);
        steer_toward(&mut b, 90.0);
        assert_eq!(b.vel_y, -40.0);
    }

    #[test]
    fn test_next_pipe_skips_passed_geometry() {
        let make = |id, x| Pipe {
            id,
            x,
            base_top: 100.0,
            gap_height: 160.0,
            width: 60.0,
            oscillation: None,
            passed: false,
        };
        let pipes = vec![make(1, 100.0), make(2, 400.0)];
        assert_eq!(next_pipe(&pipes, 211.0).map(|p| p.id), Some(2));
        assert_eq!(next_pipe(&pipes, 120.0).map(|p| p.id), Some(1));
        assert!(next_pipe(&pipes, 500.0).is_none());
    }
}
