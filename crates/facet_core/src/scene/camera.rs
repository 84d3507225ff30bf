use glam::{Mat4, Quat, Vec3, Vec4};

/// Closest the eye may get to the orbit center.
pub const MIN_ZOOM: f32 = 0.5;
/// Farthest the eye may get from the orbit center.
pub const MAX_ZOOM: f32 = 20.0;

/// Orthonormal viewing frame.  `look`, `up` and `right` are re-derived
/// together on every mutation so they never drift apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub eye: Vec3,
    pub look: Vec3,
    pub up: Vec3,
    pub right: Vec3,
}

/// Perspective parameters plus the matrix derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraProjection {
    /// Vertical field of view in radians.
    pub fovy: f32,
    pub near: f32,
    pub far: f32,
    pub width: f32,
    pub height: f32,
    matrix: Mat4,
}

impl CameraProjection {
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Right-handed perspective mapping depth into `[0, 1]`.
    fn recompute(&mut self) {
        let sy = 1.0 / (self.fovy * 0.5).tan();
        let sx = sy * self.height / self.width;
        let sz = self.far / (self.near - self.far);
        self.matrix = Mat4::from_cols(
            Vec4::new(sx, 0.0, 0.0, 0.0),
            Vec4::new(0.0, sy, 0.0, 0.0),
            Vec4::new(0.0, 0.0, sz, -1.0),
            Vec4::new(0.0, 0.0, sz * self.near, 0.0),
        );
    }
}

/// A discrete camera control, already scaled into world/angle units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraAction {
    Zoom(f32),
    Rotate { h: f32, v: f32 },
    Pan { h: f32, v: f32 },
    Move { h: f32, v: f32 },
}

/// Orbit camera: the eye circles a `center` point it always looks at.
#[derive(Debug, Clone)]
pub struct Camera {
    view: CameraView,
    projection: CameraProjection,
    center: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        let mut projection = CameraProjection {
            fovy: 35f32.to_radians(),
            near: 0.1,
            far: 100.0,
            width: 2.0,
            height: 2.0,
            matrix: Mat4::IDENTITY,
        };
        projection.recompute();
        Self {
            view: CameraView {
                eye: Vec3::ZERO,
                look: Vec3::NEG_Z,
                up: Vec3::Y,
                right: Vec3::X,
            },
            projection,
            center: Vec3::NEG_Z,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn view(&self) -> &CameraView {
        &self.view
    }

    #[inline]
    pub fn projection(&self) -> &CameraProjection {
        &self.projection
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    #[inline]
    pub fn eye(&self) -> Vec3 {
        self.view.eye
    }

    /// Places the eye and re-derives the orthonormal basis.  `up` only needs
    /// to be roughly upward; it must not be parallel to `center - eye`.
    pub fn look_at(&mut self, eye: Vec3, center: Vec3, up: Vec3) {
        let look = (center - eye).normalize();
        let right = look.cross(up).normalize();
        let up = right.cross(look).normalize();
        self.view = CameraView {
            eye,
            look,
            up,
            right,
        };
        self.center = center;
    }

    pub fn perspective(&mut self, fovy: f32, width: f32, height: f32) {
        self.projection.fovy = fovy;
        self.projection.width = width;
        self.projection.height = height;
        self.projection.recompute();
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.projection.near = near;
        self.projection.far = far;
        self.projection.recompute();
    }

    /// Dollies the eye along `look`, keeping it within
    /// `[MIN_ZOOM, MAX_ZOOM]` of the center and never past it.
    pub fn zoom(&mut self, delta: f32) {
        let look = self.view.look;
        let eye = self.view.eye + delta * look;
        let gap = self.center - eye;
        let distance = gap.length();

        self.view.eye = if distance <= MIN_ZOOM || gap.dot(look) < 0.0 {
            self.center - MIN_ZOOM * look
        } else if distance >= MAX_ZOOM {
            self.center - MAX_ZOOM * look
        } else {
            eye
        };
    }

    /// Orbits around the center: yaw by `-h` about world up, then pitch by
    /// `-v` about the camera's right axis.
    pub fn rotate(&mut self, h: f32, v: f32) {
        let rotation =
            Quat::from_axis_angle(Vec3::Y, -h) * Quat::from_axis_angle(self.view.right, -v);
        let offset = rotation * (self.view.eye - self.center);
        let up = rotation * self.view.up;
        self.look_at(self.center + offset, self.center, up);
    }

    /// Slides eye and center in the view plane.
    pub fn pan(&mut self, h: f32, v: f32) {
        let d = v * self.view.up - h * self.view.right;
        self.translate(d);
    }

    /// Walks eye and center over the ground plane.
    pub fn move_by(&mut self, h: f32, v: f32) {
        let up = self.view.up;
        let look = self.view.look;
        let forward = (Vec3::new(up.x, 0.0, up.z) + Vec3::new(look.x, 0.0, look.z))
            .normalize_or_zero();
        let d = -h * self.view.right + v * forward;
        self.translate(d);
    }

    pub fn apply(&mut self, action: CameraAction) {
        match action {
            CameraAction::Zoom(delta) => self.zoom(delta),
            CameraAction::Rotate { h, v } => self.rotate(h, v),
            CameraAction::Pan { h, v } => self.pan(h, v),
            CameraAction::Move { h, v } => self.move_by(h, v),
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.view.eye, self.view.look, self.view.up)
    }

    fn translate(&mut self, d: Vec3) {
        self.view.eye += d;
        self.center += d;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orbiting(eye: Vec3) -> Camera {
        let mut cam = Camera::new();
        cam.look_at(eye, Vec3::ZERO, Vec3::Y);
        cam
    }

    fn assert_orthonormal(v: &CameraView) {
        for axis in [v.look, v.up, v.right] {
            assert!((axis.length() - 1.0).abs() < 1e-5, "{axis:?} not unit");
        }
        assert!(v.look.dot(v.up).abs() < 1e-5);
        assert!(v.look.dot(v.right).abs() < 1e-5);
        assert!(v.up.dot(v.right).abs() < 1e-5);
    }

    #[test]
    fn basis_stays_orthonormal() {
        let mut cam = orbiting(Vec3::new(2.0, 2.0, 2.0));
        assert_orthonormal(cam.view());
        cam.rotate(0.4, -0.2);
        assert_orthonormal(cam.view());
        cam.pan(0.3, 0.7);
        cam.move_by(-1.0, 2.0);
        cam.zoom(1.5);
        assert_orthonormal(cam.view());
        for _ in 0..50 {
            cam.rotate(0.13, 0.07);
        }
        assert_orthonormal(cam.view());
    }

    #[test]
    fn zoom_never_leaves_the_allowed_band() {
        let mut cam = orbiting(Vec3::new(0.0, 0.0, 3.0));
        for delta in [0.7, 5.0, -3.0, -40.0, 100.0, -0.2, 2.9] {
            cam.zoom(delta);
            let d = cam.center().distance(cam.eye());
            assert!(d >= MIN_ZOOM - 1e-4 && d <= MAX_ZOOM + 1e-4, "distance {d}");
        }
    }

    #[test]
    fn zooming_out_far_snaps_to_max() {
        let mut cam = orbiting(Vec3::new(0.0, 0.0, 3.0));
        cam.zoom(-100.0);
        let d = cam.center().distance(cam.eye());
        assert!((d - MAX_ZOOM).abs() < 1e-4);
        assert!(cam.eye().abs_diff_eq(Vec3::new(0.0, 0.0, MAX_ZOOM), 1e-4));
    }

    #[test]
    fn zooming_through_the_center_stops_in_front_of_it() {
        let mut cam = orbiting(Vec3::new(0.0, 0.0, 3.0));
        cam.zoom(10.0);
        assert!(cam.eye().abs_diff_eq(Vec3::new(0.0, 0.0, MIN_ZOOM), 1e-5));
        // still looking at the center
        assert!(cam.view().look.abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn rotate_keeps_distance_and_center() {
        let mut cam = orbiting(Vec3::new(0.0, 1.0, 4.0));
        let before = cam.eye().distance(cam.center());
        cam.rotate(0.8, 0.3);
        assert!(cam.center().abs_diff_eq(Vec3::ZERO, 1e-6));
        assert!((cam.eye().distance(cam.center()) - before).abs() < 1e-4);
        let to_center = (cam.center() - cam.eye()).normalize();
        assert!(to_center.abs_diff_eq(cam.view().look, 1e-4));
    }

    #[test]
    fn pan_and_move_translate_eye_and_center_together() {
        let mut cam = orbiting(Vec3::new(0.0, 2.0, 5.0));
        let offset = cam.eye() - cam.center();
        let look = cam.view().look;
        cam.pan(1.0, -0.5);
        cam.move_by(0.25, 2.0);
        assert!((cam.eye() - cam.center()).abs_diff_eq(offset, 1e-5));
        assert!(cam.view().look.abs_diff_eq(look, 1e-6));
    }

    #[test]
    fn move_stays_on_the_ground_plane() {
        let mut cam = orbiting(Vec3::new(0.0, 3.0, 3.0));
        let y = cam.eye().y;
        cam.move_by(0.5, 1.0);
        assert!((cam.eye().y - y).abs() < 1e-5);
        // forward is toward the center's side (-Z)
        assert!(cam.eye().z < 3.0);
    }

    #[test]
    fn square_viewport_has_equal_focal_scales() {
        let mut cam = orbiting(Vec3::new(2.0, 2.0, 2.0));
        cam.set_clip_planes(1.0, 20.0);
        cam.perspective(65f32.to_radians(), 2.0, 2.0);
        let m = cam.projection().matrix().to_cols_array_2d();
        assert!((m[0][0] - m[1][1]).abs() < 1e-6);
        assert!((m[2][2] - 20.0 / (1.0 - 20.0)).abs() < 1e-6);
        assert_eq!(m[2][3], -1.0);
        assert!((m[3][2] - 20.0 / (1.0 - 20.0)).abs() < 1e-6);
    }

    #[test]
    fn projection_matches_glam_right_handed_perspective() {
        let mut cam = Camera::new();
        cam.set_clip_planes(0.5, 50.0);
        cam.perspective(1.0, 1280.0, 720.0);
        let ours = cam.projection().matrix();
        let glam = Mat4::perspective_rh(1.0, 1280.0 / 720.0, 0.5, 50.0);
        assert!(ours.abs_diff_eq(glam, 1e-5));
    }

    #[test]
    fn view_matrix_maps_center_onto_negative_z() {
        let cam = orbiting(Vec3::new(3.0, 1.0, -2.0));
        let d = cam.eye().distance(cam.center());
        let p = cam.view_matrix().transform_point3(cam.center());
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -d), 1e-4));
    }

    #[test]
    fn apply_dispatches_actions() {
        let mut a = orbiting(Vec3::new(1.0, 1.0, 6.0));
        let mut b = a.clone();
        a.apply(CameraAction::Rotate { h: 0.2, v: 0.1 });
        a.apply(CameraAction::Zoom(1.0));
        b.rotate(0.2, 0.1);
        b.zoom(1.0);
        assert!(a.eye().abs_diff_eq(b.eye(), 1e-6));
    }
}
