use glam::Vec3;

/// Spherical coordinates around the +Y axis.
///
/// `phi` is the polar angle measured from +Y, `theta` the azimuth around Y
/// measured from +Z towards +X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    /// Smallest polar distance from either pole
    pub const POLE_EPSILON: f32 = 1e-6;

    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(radius: f32, phi: f32, theta: f32) -> Self {
        Self { radius, phi, theta }
    }

    pub fn from_vec3(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::new(0.0, 0.0, 0.0);
        }

        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_vec3(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Keep phi away from the poles so the up vector stays well defined
    pub fn make_safe(mut self) -> Self {
        self.phi = self
            .phi
            .clamp(Self::POLE_EPSILON, std::f32::consts::PI - Self::POLE_EPSILON);
        self
    }
}
