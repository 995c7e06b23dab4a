/// Geometry primitives and the shape descriptors used by the scenes
use nalgebra::{Point3, Vector3};
use std::f32::consts::{PI, TAU};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }

    fn from_parts(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Face normal from the winding order, or the averaged vertex normal for
    /// degenerate faces (sphere poles).
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let [v0, v1, v2] = &self.vertices;
        let edge1 = v1.position - v0.position;
        let edge2 = v2.position - v0.position;

        edge1
            .cross(&edge2)
            .try_normalize(1e-12)
            .or_else(|| (v0.normal + v1.normal + v2.normal).try_normalize(1e-12))
            .unwrap_or_else(Vector3::y)
    }

    fn is_degenerate(&self) -> bool {
        let [v0, v1, v2] = &self.vertices;
        (v1.position - v0.position)
            .cross(&(v2.position - v0.position))
            .norm_squared()
            < 1e-14
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    fn add_quad(&mut self, a: Vertex, b: Vertex, c: Vertex, d: Vertex) {
        for triangle in [Triangle::new(a, b, c), Triangle::new(a, c, d)] {
            if !triangle.is_degenerate() {
                self.add_triangle(triangle);
            }
        }
    }

    /// Tessellate a parametric surface over `[0, 1]²`; `surface` returns a
    /// position and an outward normal.
    fn parametric<F>(&mut self, u_segments: u32, v_segments: u32, surface: F)
    where
        F: Fn(f32, f32) -> (Point3<f32>, Vector3<f32>),
    {
        let vertex = |i: u32, j: u32| {
            let (p, n) = surface(i as f32 / u_segments as f32, j as f32 / v_segments as f32);
            Vertex::from_parts(p, n)
        };
        for j in 0..v_segments {
            for i in 0..u_segments {
                self.add_quad(vertex(i, j), vertex(i, j + 1), vertex(i + 1, j + 1), vertex(i + 1, j));
            }
        }
    }

    /// Axis-aligned box centered on the origin
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (hx, hy, hz) = (width / 2.0, height / 2.0, depth / 2.0);
        let mut mesh = Self::with_capacity(12);

        // Front face
        mesh.add_quad(
            Vertex::new(-hx, -hy, hz, 0.0, 0.0, 1.0),
            Vertex::new(hx, -hy, hz, 0.0, 0.0, 1.0),
            Vertex::new(hx, hy, hz, 0.0, 0.0, 1.0),
            Vertex::new(-hx, hy, hz, 0.0, 0.0, 1.0),
        );
        // Back face
        mesh.add_quad(
            Vertex::new(-hx, -hy, -hz, 0.0, 0.0, -1.0),
            Vertex::new(-hx, hy, -hz, 0.0, 0.0, -1.0),
            Vertex::new(hx, hy, -hz, 0.0, 0.0, -1.0),
            Vertex::new(hx, -hy, -hz, 0.0, 0.0, -1.0),
        );
        // Top face
        mesh.add_quad(
            Vertex::new(-hx, hy, -hz, 0.0, 1.0, 0.0),
            Vertex::new(-hx, hy, hz, 0.0, 1.0, 0.0),
            Vertex::new(hx, hy, hz, 0.0, 1.0, 0.0),
            Vertex::new(hx, hy, -hz, 0.0, 1.0, 0.0),
        );
        // Bottom face
        mesh.add_quad(
            Vertex::new(-hx, -hy, -hz, 0.0, -1.0, 0.0),
            Vertex::new(hx, -hy, -hz, 0.0, -1.0, 0.0),
            Vertex::new(hx, -hy, hz, 0.0, -1.0, 0.0),
            Vertex::new(-hx, -hy, hz, 0.0, -1.0, 0.0),
        );
        // Right face
        mesh.add_quad(
            Vertex::new(hx, -hy, -hz, 1.0, 0.0, 0.0),
            Vertex::new(hx, hy, -hz, 1.0, 0.0, 0.0),
            Vertex::new(hx, hy, hz, 1.0, 0.0, 0.0),
            Vertex::new(hx, -hy, hz, 1.0, 0.0, 0.0),
        );
        // Left face
        mesh.add_quad(
            Vertex::new(-hx, -hy, -hz, -1.0, 0.0, 0.0),
            Vertex::new(-hx, -hy, hz, -1.0, 0.0, 0.0),
            Vertex::new(-hx, hy, hz, -1.0, 0.0, 0.0),
            Vertex::new(-hx, hy, -hz, -1.0, 0.0, 0.0),
        );

        mesh
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let mut mesh = Self::with_capacity((width_segments * height_segments * 2) as usize);
        mesh.parametric(width_segments.max(3), height_segments.max(2), |u, v| {
            let phi = u * TAU;
            let theta = v * PI;
            let normal = Vector3::new(-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin());
            (Point3::from(normal * radius), normal)
        });
        mesh
    }

    /// Open-ended tube plus caps; a zero radius collapses a cap into an apex.
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        let segments = radial_segments.max(3);
        let half = height / 2.0;
        let slope = (radius_bottom - radius_top) / height;
        let mut mesh = Self::with_capacity((segments * 4) as usize);

        mesh.parametric(segments, 1, |u, v| {
            let theta = u * TAU;
            let radius = radius_top + (radius_bottom - radius_top) * v;
            let (sin, cos) = theta.sin_cos();
            let position = Point3::new(radius * sin, half - v * height, radius * cos);
            let normal = Vector3::new(sin, slope, cos).normalize();
            (position, normal)
        });

        for (radius, y, sign) in [(radius_top, half, 1.0), (radius_bottom, -half, -1.0)] {
            if radius <= 0.0 {
                continue;
            }
            let center = Vertex::new(0.0, y, 0.0, 0.0, sign, 0.0);
            for i in 0..segments {
                let edge = |k: u32| {
                    let theta = k as f32 / segments as f32 * TAU;
                    Vertex::new(radius * theta.sin(), y, radius * theta.cos(), 0.0, sign, 0.0)
                };
                let (a, b) = if sign > 0.0 { (edge(i), edge(i + 1)) } else { (edge(i + 1), edge(i)) };
                mesh.add_triangle(Triangle::new(center, a, b));
            }
        }

        mesh
    }

    pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Self {
        Self::cylinder(0.0, radius, height, radial_segments)
    }

    /// Torus lying in the XY plane, like a ring facing the viewer.
    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let mut mesh = Self::with_capacity((radial_segments * tubular_segments * 2) as usize);
        mesh.parametric(tubular_segments.max(3), radial_segments.max(3), |u, v| {
            let around = u * TAU;
            let tube_angle = v * TAU;
            let ring_center = Vector3::new(radius * around.cos(), radius * around.sin(), 0.0);
            let position = Vector3::new(
                (radius + tube * tube_angle.cos()) * around.cos(),
                (radius + tube * tube_angle.cos()) * around.sin(),
                tube * tube_angle.sin(),
            );
            let normal = (position - ring_center).normalize();
            (Point3::from(position), normal)
        });
        mesh
    }

    /// Icosahedron, each face split `detail + 1` times per edge and pushed
    /// back onto the sphere.
    pub fn icosahedron(radius: f32, detail: u32) -> Self {
        let t = (1.0 + 5.0f32.sqrt()) / 2.0;
        let corners = [
            [-1.0, t, 0.0], [1.0, t, 0.0], [-1.0, -t, 0.0], [1.0, -t, 0.0],
            [0.0, -1.0, t], [0.0, 1.0, t], [0.0, -1.0, -t], [0.0, 1.0, -t],
            [t, 0.0, -1.0], [t, 0.0, 1.0], [-t, 0.0, -1.0], [-t, 0.0, 1.0],
        ]
        .map(|[x, y, z]| Vector3::new(x, y, z).normalize());
        let faces: [[usize; 3]; 20] = [
            [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
            [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
            [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
            [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
        ];

        let n = detail + 1;
        let mut mesh = Self::with_capacity(20 * (n * n) as usize);
        let on_sphere = |p: Vector3<f32>| {
            let normal = p.normalize();
            Vertex::from_parts(Point3::from(normal * radius), normal)
        };

        for [ia, ib, ic] in faces {
            let (a, b, c) = (corners[ia], corners[ib], corners[ic]);
            // Barycentric lattice point (i along a->b, j along a->c).
            let lattice = |i: u32, j: u32| {
                let (fi, fj) = (i as f32 / n as f32, j as f32 / n as f32);
                on_sphere(a + (b - a) * fi + (c - a) * fj)
            };
            for i in 0..n {
                for j in 0..(n - i) {
                    mesh.add_triangle(Triangle::new(lattice(i, j), lattice(i + 1, j), lattice(i, j + 1)));
                    if i + j + 1 < n {
                        mesh.add_triangle(Triangle::new(
                            lattice(i + 1, j),
                            lattice(i + 1, j + 1),
                            lattice(i, j + 1),
                        ));
                    }
                }
            }
        }

        mesh
    }

    /// Flat rectangle in the XY plane facing +Z.
    pub fn plane(width: f32, height: f32) -> Self {
        let (hx, hy) = (width / 2.0, height / 2.0);
        let mut mesh = Self::with_capacity(2);
        mesh.add_quad(
            Vertex::new(-hx, -hy, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(hx, -hy, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(hx, hy, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(-hx, hy, 0.0, 0.0, 0.0, 1.0),
        );
        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed shape descriptor of a renderable object
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32, width_segments: u32, height_segments: u32 },
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32 },
    Cone { radius: f32, height: f32, radial_segments: u32 },
    Torus { radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32 },
    Icosahedron { radius: f32, detail: u32 },
    Plane { width: f32, height: f32 },
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Box { .. } => "box",
            Shape::Sphere { .. } => "sphere",
            Shape::Cylinder { .. } => "cylinder",
            Shape::Cone { .. } => "cone",
            Shape::Torus { .. } => "torus",
            Shape::Icosahedron { .. } => "icosahedron",
            Shape::Plane { .. } => "plane",
        }
    }

    pub fn tessellate(&self) -> Mesh {
        match *self {
            Shape::Box { width, height, depth } => Mesh::cuboid(width, height, depth),
            Shape::Sphere { radius, width_segments, height_segments } => {
                Mesh::sphere(radius, width_segments, height_segments)
            }
            Shape::Cylinder { radius_top, radius_bottom, height, radial_segments } => {
                Mesh::cylinder(radius_top, radius_bottom, height, radial_segments)
            }
            Shape::Cone { radius, height, radial_segments } => Mesh::cone(radius, height, radial_segments),
            Shape::Torus { radius, tube, radial_segments, tubular_segments } => {
                Mesh::torus(radius, tube, radial_segments, tubular_segments)
            }
            Shape::Icosahedron { radius, detail } => Mesh::icosahedron(radius, detail),
            Shape::Plane { width, height } => Mesh::plane(width, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounding_radius(mesh: &Mesh) -> f32 {
        mesh.triangles
            .iter()
            .flat_map(|t| t.vertices.iter())
            .map(|v| v.position.coords.norm())
            .fold(0.0, f32::max)
    }

    #[test]
    fn box_has_twelve_triangles_with_outward_normals() {
        let mesh = Shape::Box { width: 2.0, height: 2.0, depth: 2.0 }.tessellate();
        assert_eq!(mesh.triangles.len(), 12);
        for triangle in &mesh.triangles {
            let normal = triangle.calculate_normal();
            assert!((normal - triangle.vertices[0].normal).norm() < 1e-5);
        }
    }

    #[test]
    fn icosahedron_detail_multiplies_faces() {
        assert_eq!(Mesh::icosahedron(1.0, 0).triangles.len(), 20);
        assert_eq!(Mesh::icosahedron(1.0, 1).triangles.len(), 80);
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let mesh = Mesh::sphere(1.5, 16, 8);
        assert!(!mesh.triangles.is_empty());
        for vertex in mesh.triangles.iter().flat_map(|t| t.vertices.iter()) {
            assert!((vertex.position.coords.norm() - 1.5).abs() < 1e-4);
        }
    }

    #[test]
    fn cone_has_no_top_cap() {
        let cone = Mesh::cone(1.0, 2.0, 8);
        let cylinder = Mesh::cylinder(1.0, 1.0, 2.0, 8);
        assert!(cone.triangles.len() < cylinder.triangles.len());
        assert!((bounding_radius(&cone) - 2.0f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn torus_bounding_radius_is_ring_plus_tube() {
        let torus = Shape::Torus { radius: 1.0, tube: 0.4, radial_segments: 16, tubular_segments: 32 };
        assert!((bounding_radius(&torus.tessellate()) - 1.4).abs() < 1e-3);
    }
}
