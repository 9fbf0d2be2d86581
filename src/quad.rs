use glam::{Mat3, Mat4, Quat, Vec2, Vec3};

/// Corners of the unit quad before placement, in the XY plane facing local +Z.
pub const QUAD_CORNERS: [Vec3; 4] = [
    Vec3::new(-0.5, -0.5, 0.0),
    Vec3::new(-0.5, 0.5, 0.0),
    Vec3::new(0.5, 0.5, 0.0),
    Vec3::new(0.5, -0.5, 0.0),
];

pub const QUAD_UVS: [Vec2; 4] = [
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(0.0, 0.0),
];

/// Two triangles per quad, as offsets from the quad's first vertex index.
pub const QUAD_WINDING: [u32; 6] = [2, 1, 0, 3, 2, 0];

/// Rotation taking local +Z to `forward` while keeping local +Y as close to world up as possible.
///
/// When `forward` is vertical world up can't be used. A quad facing up then gets -Z as its up
/// and one facing down gets +Z, which leaves local +X along world +X in both cases.
/// `forward` must be non zero.
pub fn look_rotation(forward: Vec3) -> Quat {
    let forward = forward.normalize();
    let up_hint = if forward.cross(Vec3::Y).length_squared() < 1e-6 {
        if forward.y > 0.0 {
            Vec3::NEG_Z
        } else {
            Vec3::Z
        }
    } else {
        Vec3::Y
    };

    let right = up_hint.cross(forward).normalize();
    let up = forward.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, forward))
}

/// Where and how one unit quad lands in the world.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuadPlacement {
    pub center: Vec3,
    pub facing: Vec3,
    /// Size along the quad's local X and Y.
    pub size: Vec2,
}

impl QuadPlacement {
    pub fn floor(center: Vec3, width: f32) -> QuadPlacement {
        QuadPlacement {
            center,
            facing: Vec3::Y,
            size: Vec2::splat(width),
        }
    }

    pub fn ceiling(center: Vec3, width: f32) -> QuadPlacement {
        QuadPlacement {
            center,
            facing: Vec3::NEG_Y,
            size: Vec2::splat(width),
        }
    }

    pub fn wall(center: Vec3, facing: Vec3, width: f32, height: f32) -> QuadPlacement {
        QuadPlacement {
            center,
            facing,
            size: Vec2::new(width, height),
        }
    }

    /// Translation * rotation * scale, applied to the unit quad corners.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.size.extend(1.0),
                                              look_rotation(self.facing),
                                              self.center)
    }

    /// World positions of the four corners, in `QUAD_CORNERS` order.
    pub fn corners(&self) -> [Vec3; 4] {
        let matrix = self.matrix();
        let mut corners = QUAD_CORNERS;
        for corner in corners.iter_mut() {
            *corner = matrix.transform_point3(*corner);
        }
        corners
    }
}
