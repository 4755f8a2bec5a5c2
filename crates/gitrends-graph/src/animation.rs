//! Spring-based animation for zoom transitions
//!
//! Uses critically-damped spring physics, so a zoom converges without
//! overshoot.
//!
//! # EGUI-RULES Compliance
//! - Animation state is UI-only (not server data)
//! - No callbacks - values are polled each frame via `get()`
//! - Call `tick(dt)` at start of the widget's `ui()`, then render with `get()` values

/// Spring configuration parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    /// Higher settles faster
    pub stiffness: f32,
    /// Damping ratio: 1.0 = critically damped (no overshoot)
    pub damping: f32,
}

impl SpringConfig {
    /// Zoom transition, settles in roughly half a second
    pub const ZOOM: Self = Self {
        stiffness: 150.0,
        damping: 1.0,
    };
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::ZOOM
    }
}

// =============================================================================
// SPRING F32
// =============================================================================

/// Animated f32 value with spring physics
///
/// ```ignore
/// let mut radius = SpringF32::new(450.0);
/// radius.set_target(120.0);
///
/// // Each frame:
/// radius.tick(dt);
/// let current = radius.get();
/// ```
#[derive(Debug, Clone)]
pub struct SpringF32 {
    current: f32,
    target: f32,
    velocity: f32,
    config: SpringConfig,
}

impl SpringF32 {
    pub fn new(initial: f32) -> Self {
        Self::with_config(initial, SpringConfig::default())
    }

    pub fn with_config(initial: f32, config: SpringConfig) -> Self {
        Self {
            current: initial,
            target: initial,
            velocity: 0.0,
            config,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump immediately to value (no animation)
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Advance by `dt` seconds
    ///
    /// F = -k*x - c*v, with c = damping * 2 * sqrt(k)
    pub fn tick(&mut self, dt: f32) {
        // Large steps make the integration unstable
        let dt = dt.min(0.1);

        let displacement = self.current - self.target;
        let spring_force = -self.config.stiffness * displacement;
        let damping_force =
            -self.config.damping * 2.0 * self.config.stiffness.sqrt() * self.velocity;

        self.velocity += (spring_force + damping_force) * dt;
        self.current += self.velocity * dt;

        if (self.current - self.target).abs() < 0.0001 && self.velocity.abs() < 0.001 {
            self.current = self.target;
            self.velocity = 0.0;
        }
    }

    pub fn get(&self) -> f32 {
        self.current
    }

    pub fn is_animating(&self) -> bool {
        (self.current - self.target).abs() > 0.0001 || self.velocity.abs() > 0.001
    }
}

// =============================================================================
// SPRING CIRCLE
// =============================================================================

/// Animated view circle (center and radius) for the enclosure zoom
#[derive(Debug, Clone)]
pub struct SpringCircle {
    pub x: SpringF32,
    pub y: SpringF32,
    pub r: SpringF32,
}

impl SpringCircle {
    pub fn new(x: f32, y: f32, r: f32) -> Self {
        let config = SpringConfig::ZOOM;
        Self {
            x: SpringF32::with_config(x, config),
            y: SpringF32::with_config(y, config),
            r: SpringF32::with_config(r, config),
        }
    }

    pub fn set_target(&mut self, x: f32, y: f32, r: f32) {
        self.x.set_target(x);
        self.y.set_target(y);
        self.r.set_target(r);
    }

    pub fn set_immediate(&mut self, x: f32, y: f32, r: f32) {
        self.x.set_immediate(x);
        self.y.set_immediate(y);
        self.r.set_immediate(r);
    }

    pub fn tick(&mut self, dt: f32) {
        self.x.tick(dt);
        self.y.tick(dt);
        self.r.tick(dt);
    }

    pub fn get(&self) -> (f32, f32, f32) {
        (self.x.get(), self.y.get(), self.r.get())
    }

    pub fn is_animating(&self) -> bool {
        self.x.is_animating() || self.y.is_animating() || self.r.is_animating()
    }
}
