//! Primitive builders keyed by object type tag.

use polystage_model::Properties;

use crate::assets::ModelData;

pub const DEFAULT_SPHERE_SEGMENTS: u32 = 32;
pub const DEFAULT_CYLINDER_TESSELLATION: u32 = 24;
pub const DEFAULT_GROUND_SUBDIVISIONS: u32 = 2;
/// Ceiling for segment, tessellation and subdivision counts.
pub const MAX_TESSELLATION: u32 = 1024;

/// Mesh shape with its construction parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { diameter: f32, segments: u32 },
    Cylinder { height: f32, diameter: f32, tessellation: u32 },
    Plane { width: f32, height: f32 },
    Ground { width: f32, height: f32, subdivisions: u32 },
    /// Triangles imported from a glTF asset.
    Imported { positions: Vec<[f32; 3]>, indices: Vec<u32> },
}

impl Geometry {
    pub const UNIT_BOX: Geometry = Geometry::Box { width: 1.0, height: 1.0, depth: 1.0 };

    /// Builds the primitive for `kind`.
    ///
    /// `model` is the glTF data referenced by a `model` object; without it
    /// (and for every unknown tag) the result is a unit box.
    pub fn from_properties(kind: &str, props: &Properties, model: Option<&ModelData>) -> Geometry {
        let num = |key: &str| props.number(key).filter(|v| v.is_finite() && *v > 0.0);
        let count = |key: &str, default: u32| {
            num(key).map_or(default, |v| v.round().clamp(1.0, MAX_TESSELLATION as f32) as u32)
        };

        match kind {
            "box" => {
                let size = num("size").unwrap_or(1.0);
                Geometry::Box {
                    width: num("width").unwrap_or(size),
                    height: num("height").unwrap_or(size),
                    depth: num("depth").unwrap_or(size),
                }
            }
            "sphere" => Geometry::Sphere {
                diameter: num("diameter").or_else(|| num("radius").map(|r| r * 2.0)).unwrap_or(1.0),
                segments: count("segments", DEFAULT_SPHERE_SEGMENTS),
            },
            "cylinder" => Geometry::Cylinder {
                height: num("height").unwrap_or(2.0),
                diameter: num("diameter").or_else(|| num("radius").map(|r| r * 2.0)).unwrap_or(1.0),
                tessellation: count("tessellation", DEFAULT_CYLINDER_TESSELLATION),
            },
            "plane" => Geometry::Plane {
                width: num("width").or_else(|| num("size")).unwrap_or(1.0),
                height: num("height").or_else(|| num("size")).unwrap_or(1.0),
            },
            "ground" => Geometry::Ground {
                width: num("width").unwrap_or(10.0),
                height: num("height").unwrap_or(10.0),
                subdivisions: count("subdivisions", DEFAULT_GROUND_SUBDIVISIONS),
            },
            "model" => match model {
                Some(m) => {
                    let (positions, indices) = m.merged();
                    Geometry::Imported { positions, indices }
                }
                None => Geometry::UNIT_BOX,
            },
            _ => Geometry::UNIT_BOX,
        }
    }

    /// Axis-aligned extents `[x, y, z]` in local space, before scaling.
    pub fn extents(&self) -> [f32; 3] {
        match self {
            Geometry::Box { width, height, depth } => [*width, *height, *depth],
            Geometry::Sphere { diameter, .. } => [*diameter; 3],
            Geometry::Cylinder { height, diameter, .. } => [*diameter, *height, *diameter],
            // Planes face -Z; grounds lie in XZ.
            Geometry::Plane { width, height } => [*width, *height, 0.0],
            Geometry::Ground { width, height, .. } => [*width, 0.0, *height],
            Geometry::Imported { positions, .. } => {
                if positions.is_empty() {
                    return [0.0; 3];
                }
                let mut min = [f32::INFINITY; 3];
                let mut max = [f32::NEG_INFINITY; 3];
                for p in positions {
                    for axis in 0..3 {
                        min[axis] = min[axis].min(p[axis]);
                        max[axis] = max[axis].max(p[axis]);
                    }
                }
                [max[0] - min[0], max[1] - min[1], max[2] - min[2]]
            }
        }
    }

    /// Triangle count of the tessellated primitive.
    pub fn triangle_count(&self) -> u32 {
        match self {
            Geometry::Box { .. } => 12,
            Geometry::Sphere { segments, .. } => 4u32.saturating_mul(segments.saturating_mul(*segments)),
            Geometry::Cylinder { tessellation, .. } => 4u32.saturating_mul(*tessellation),
            Geometry::Plane { .. } => 2,
            Geometry::Ground { subdivisions, .. } => 2u32.saturating_mul(subdivisions.saturating_mul(*subdivisions)),
            Geometry::Imported { indices, positions } => {
                let corners = if indices.is_empty() { positions.len() } else { indices.len() };
                u32::try_from(corners / 3).unwrap_or(u32::MAX)
            }
        }
    }
}
