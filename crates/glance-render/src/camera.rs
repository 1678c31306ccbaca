//! Camera and view management.

use glam::{Mat4, Vec3, Vec4};

/// Camera projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    /// Perspective projection.
    #[default]
    Perspective,
    /// Orthographic projection.
    Orthographic,
}

/// An active asymmetric-frustum sub-rectangle.
///
/// Narrows the projection to the window `(x, y, width, height)` of a
/// `full_width` x `full_height` frame, so rendering produces exactly that
/// sub-rectangle's pixels. The picking engine sets a 1x1 window at the
/// cursor, renders, and clears the offset again; the offset must never
/// outlive a pick call or all subsequent visible rendering is skewed to
/// that sub-rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOffset {
    pub full_width: f32,
    pub full_height: f32,
    /// Window origin, measured from the top-left in pixels.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A 3D camera for viewing a scene.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Projection mode.
    pub projection_mode: ProjectionMode,
    /// Orthographic half-height (used when `projection_mode` is Orthographic).
    pub ortho_scale: f32,
    view_offset: Option<ViewOffset>,
}

impl Camera {
    /// Creates a new camera with default settings.
    #[must_use]
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 75.0_f32.to_radians(),
            aspect_ratio,
            near: 0.1,
            far: 100.0,
            projection_mode: ProjectionMode::Perspective,
            ortho_scale: 1.0,
            view_offset: None,
        }
    }

    /// Sets the aspect ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Narrows the projection to a sub-rectangle of the full frame.
    ///
    /// Callers own the set/clear bracket: a set offset applies to every
    /// subsequent projection until [`Camera::clear_view_offset`] is called.
    pub fn set_view_offset(
        &mut self,
        full_width: f32,
        full_height: f32,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) {
        self.view_offset = Some(ViewOffset {
            full_width,
            full_height,
            x,
            y,
            width,
            height,
        });
    }

    /// Restores the unmodified full-frame projection.
    pub fn clear_view_offset(&mut self) {
        self.view_offset = None;
    }

    /// Whether a view offset is currently active.
    #[must_use]
    pub fn has_view_offset(&self) -> bool {
        self.view_offset.is_some()
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Returns the projection matrix, honoring any active view offset.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection_mode {
            ProjectionMode::Perspective => self.perspective_matrix(),
            ProjectionMode::Orthographic => self.orthographic_matrix(),
        }
    }

    fn perspective_matrix(&self) -> Mat4 {
        let Some(offset) = self.view_offset else {
            return Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far);
        };

        // Full-frame frustum at the near plane.
        let top = self.near * (self.fov * 0.5).tan();
        let height = 2.0 * top;
        let width = self.aspect_ratio * height;
        let left = -0.5 * width;

        // Narrow to the requested window. x/y are measured from the
        // top-left corner, matching cursor coordinates.
        let sub_left = left + offset.x * width / offset.full_width;
        let sub_top = top - offset.y * height / offset.full_height;
        let sub_width = width * offset.width / offset.full_width;
        let sub_height = height * offset.height / offset.full_height;

        frustum_rh(
            sub_left,
            sub_left + sub_width,
            sub_top - sub_height,
            sub_top,
            self.near,
            self.far,
        )
    }

    fn orthographic_matrix(&self) -> Mat4 {
        let top = self.ortho_scale;
        let height = 2.0 * top;
        let width = self.aspect_ratio * height;
        let left = -0.5 * width;

        let (left, right, bottom, top) = match self.view_offset {
            None => (left, left + width, -top, top),
            Some(offset) => {
                let sub_left = left + offset.x * width / offset.full_width;
                let sub_top = top - offset.y * height / offset.full_height;
                let sub_width = width * offset.width / offset.full_width;
                let sub_height = height * offset.height / offset.full_height;
                (sub_left, sub_left + sub_width, sub_top - sub_height, sub_top)
            }
        };

        Mat4::orthographic_rh(left, right, bottom, top, self.near, self.far)
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Returns the camera's forward direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Returns the camera's right direction.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize()
    }

    /// Orbits the camera around the target.
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        let radius = (self.position - self.target).length();
        let mut theta = (self.position.x - self.target.x).atan2(self.position.z - self.target.z);
        let mut phi = ((self.position.y - self.target.y) / radius).acos();

        theta -= delta_x;
        phi = (phi - delta_y).clamp(0.01, std::f32::consts::PI - 0.01);

        self.position = self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
    }

    /// Pans the camera.
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let offset = self.right() * delta_x + self.up * delta_y;
        self.position += offset;
        self.target += offset;
    }

    /// Zooms toward/away from the target.
    pub fn zoom(&mut self, delta: f32) {
        match self.projection_mode {
            ProjectionMode::Perspective => {
                let direction = self.forward();
                let distance = (self.position - self.target).length();
                let new_distance = (distance - delta).max(0.1);
                self.position = self.target - direction * new_distance;
            }
            ProjectionMode::Orthographic => {
                let zoom_factor = 1.0 - delta * 0.4;
                self.ortho_scale = (self.ortho_scale * zoom_factor).clamp(0.01, 1000.0);
            }
        }
    }
}

/// Off-axis perspective frustum, right-handed, depth range 0..1 (wgpu clip
/// space).
fn frustum_rh(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let w = 2.0 * near / (right - left);
    let h = 2.0 * near / (top - bottom);
    let a = (right + left) / (right - left);
    let b = (top + bottom) / (top - bottom);
    let c = far / (near - far);
    let d = near * far / (near - far);

    Mat4::from_cols(
        Vec4::new(w, 0.0, 0.0, 0.0),
        Vec4::new(0.0, h, 0.0, 0.0),
        Vec4::new(a, b, c, -1.0),
        Vec4::new(0.0, 0.0, d, 0.0),
    )
}
