use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3};

/// Smallest polar angle; keeps the up vector from degenerating at the poles.
const BETA_EPSILON: f32 = 0.01;

/// Camera orbiting `target` on a sphere of `radius`.
///
/// `alpha` is the longitudinal and `beta` the latitudinal angle, both in
/// radians, measured as `target + radius * (cos a sin b, cos b, sin a sin b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcRotateCamera {
    pub name: String,
    pub alpha: f32,
    pub beta: f32,
    pub radius: f32,
    pub target: Point3<f32>,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl ArcRotateCamera {
    pub fn new(name: impl Into<String>, alpha: f32, beta: f32, radius: f32, target: Point3<f32>) -> Self {
        Self {
            name: name.into(),
            alpha,
            beta: clamp_beta(beta),
            radius: radius.max(f32::EPSILON),
            target,
            fov: 0.8,
            near: 1.0,
            far: 10_000.0,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        let (sa, ca) = self.alpha.sin_cos();
        let (sb, cb) = self.beta.sin_cos();
        self.target + Vector3::new(ca * sb, cb, sa * sb) * self.radius
    }

    /// Places the camera at `position`, keeping the target.
    pub fn set_position(&mut self, position: Point3<f32>) {
        self.rebuild_angles(position);
    }

    /// Aims at `target`, keeping the current position.
    pub fn set_target(&mut self, target: Point3<f32>) {
        let position = self.position();
        self.target = target;
        self.rebuild_angles(position);
    }

    fn rebuild_angles(&mut self, position: Point3<f32>) {
        let offset = position - self.target;
        let radius = offset.magnitude();
        if radius <= f32::EPSILON {
            self.radius = f32::EPSILON;
            return;
        }
        self.radius = radius;
        self.alpha = offset.z.atan2(offset.x);
        self.beta = clamp_beta((offset.y / radius).clamp(-1.0, 1.0).acos());
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position(), self.target, Vector3::unit_y())
    }

    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        cgmath::perspective(Rad(self.fov), aspect.max(f32::EPSILON), self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Matrix4<f32> {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

fn clamp_beta(beta: f32) -> f32 {
    beta.clamp(BETA_EPSILON, std::f32::consts::PI - BETA_EPSILON)
}
