/// Software rasterizer producing a color and depth buffer
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::frame_loop::RenderSurface;
use crate::geometry::Triangle;
use crate::light::{Light, LightKind};
use crate::projection::Camera;
use crate::scene::{Helper, HelperKind, Object, Scene};
use crate::shading::shade;

/// Depth tolerance letting lines win against the faces they outline.
const LINE_DEPTH_BIAS: f32 = 1e-4;

/// Pixel storage for one frame
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    color: Vec<Color>,
    depth: Vec<f32>,
    covered: Vec<bool>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            color: vec![Color::BLACK; size],
            depth: vec![f32::INFINITY; size],
            covered: vec![false; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, background: Color) {
        self.color.fill(background);
        self.depth.fill(f32::INFINITY);
        self.covered.fill(false);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.color[y * self.width + x]
    }

    /// Whether anything other than the background was drawn at `(x, y)`.
    pub fn is_covered(&self, x: usize, y: usize) -> bool {
        self.covered[y * self.width + x]
    }

    pub fn depth(&self, x: usize, y: usize) -> f32 {
        self.depth[y * self.width + x]
    }

    pub fn covered_count(&self) -> usize {
        self.covered.iter().filter(|c| **c).count()
    }

    /// Packed RGBA bytes, row-major, for canvas upload.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.color
            .iter()
            .flat_map(|c| {
                let [r, g, b] = c.to_rgb8();
                [r, g, b, 255]
            })
            .collect()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    fn write(&mut self, idx: usize, color: Color, depth: f32, opacity: f32, write_depth: bool) {
        self.color[idx] = if opacity >= 1.0 {
            color
        } else {
            color.lerp(self.color[idx], 1.0 - opacity)
        };
        if write_depth {
            self.depth[idx] = depth;
        }
        self.covered[idx] = true;
    }
}

/// Screen-space vertex: pixel position plus normalized depth
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    z: f32,
}

/// Paint style for one primitive
#[derive(Debug, Clone, Copy)]
struct Paint {
    color: Color,
    opacity: f32,
    write_depth: bool,
}

/// Label text for the host to print, centered on `(x, y)` in pixels
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenLabel {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// Renders scenes into an owned [`FrameBuffer`]
#[derive(Debug, Clone)]
pub struct Rasterizer {
    frame: FrameBuffer,
    labels: Vec<ScreenLabel>,
}

impl Rasterizer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            frame: FrameBuffer::new(width, height),
            labels: Vec::new(),
        }
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Labels whose plate center survived the depth test in the last frame.
    pub fn labels(&self) -> &[ScreenLabel] {
        &self.labels
    }

    pub fn draw(&mut self, scene: &Scene, camera: &Camera) {
        self.frame.clear(scene.background);
        self.labels.clear();
        let view_projection = camera.view_projection();
        let lights: Vec<&Light> = scene.lights().map(|(_, light)| light).collect();

        let (mut transparent, opaque): (Vec<&Object>, Vec<&Object>) = scene
            .objects()
            .filter(|o| o.visible)
            .partition(|o| o.material.transparent);

        for object in opaque {
            self.draw_object(object, &lights, camera, &view_projection);
        }

        // Back to front so nearer glass blends over farther glass.
        transparent.sort_by(|a, b| {
            let da = (a.transform.position - camera.position).norm_squared();
            let db = (b.transform.position - camera.position).norm_squared();
            db.total_cmp(&da)
        });
        for object in transparent {
            self.draw_object(object, &lights, camera, &view_projection);
        }

        for helper in scene.helpers().filter(|h| h.visible) {
            self.draw_helper(helper, scene, camera, &view_projection);
        }
    }

    fn draw_object(&mut self, object: &Object, lights: &[&Light], camera: &Camera, view_projection: &Matrix4<f32>) {
        let model = object.transform.matrix();
        let material = &object.material;
        let paint_depth = !material.transparent;

        for triangle in &object.mesh.triangles {
            let world = world_triangle(triangle, &model);
            let centroid = Point3::from((world[0].coords + world[1].coords + world[2].coords) / 3.0);
            let mut normal = face_normal(triangle, &world, &model);
            let view = (camera.position - centroid).try_normalize(1e-9).unwrap_or_else(Vector3::z);
            if normal.dot(&view) < 0.0 {
                normal = -normal;
            }

            let color = shade(material, lights.iter().copied(), &centroid, &normal, &view);
            let clip = world.map(|p| view_projection * p.to_homogeneous());

            if material.wireframe {
                let paint = Paint {
                    color,
                    opacity: material.opacity,
                    write_depth: false,
                };
                for (a, b) in [(0, 1), (1, 2), (2, 0)] {
                    self.draw_clip_line(clip[a], clip[b], paint);
                }
                continue;
            }

            let paint = Paint {
                color,
                opacity: material.opacity,
                write_depth: paint_depth,
            };
            let polygon = clip_near(&clip);
            let screen: Vec<ScreenVertex> = polygon.iter().map(|c| self.to_screen(c)).collect();
            for i in 1..screen.len().saturating_sub(1) {
                self.fill_triangle(screen[0], screen[i], screen[i + 1], paint);
            }
        }
    }

    fn draw_helper(&mut self, helper: &Helper, scene: &Scene, camera: &Camera, view_projection: &Matrix4<f32>) {
        let origin = helper.position;
        let line = |color: Color| Paint {
            color,
            opacity: 1.0,
            write_depth: false,
        };

        match &helper.kind {
            HelperKind::Grid {
                size,
                divisions,
                center_color,
                line_color,
            } => {
                let half = size / 2.0;
                let step = size / (*divisions).max(1) as f32;
                for i in 0..=*divisions {
                    let offset = -half + i as f32 * step;
                    let paint = if offset.abs() < step * 0.5 && divisions % 2 == 0 {
                        line(*center_color)
                    } else {
                        line(*line_color)
                    };
                    self.draw_world_line(
                        view_projection,
                        origin + Vector3::new(offset, 0.0, -half),
                        origin + Vector3::new(offset, 0.0, half),
                        paint,
                    );
                    self.draw_world_line(
                        view_projection,
                        origin + Vector3::new(-half, 0.0, offset),
                        origin + Vector3::new(half, 0.0, offset),
                        paint,
                    );
                }
            }
            HelperKind::Axes { size } => {
                for (axis, color) in [
                    (Vector3::x(), Color::new(1.0, 0.0, 0.0)),
                    (Vector3::y(), Color::new(0.0, 1.0, 0.0)),
                    (Vector3::z(), Color::new(0.0, 0.0, 1.0)),
                ] {
                    self.draw_world_line(view_projection, origin, origin + axis * *size, line(color));
                }
            }
            HelperKind::Light { light, size } => {
                let Ok(light) = scene.light(*light) else {
                    return;
                };
                let center = light.position;
                let half = size / 2.0;
                let paint = line(light.color);
                let (width, height) = (self.frame.width as u32, self.frame.height as u32);
                if let Some(marker) = Camera::project(view_projection, &center, width, height) {
                    if let Some(idx) = self.frame.index(marker.x.floor() as i32, marker.y.floor() as i32) {
                        self.frame.write(idx, Color::WHITE, marker.depth, 1.0, false);
                    }
                }
                for axis in [Vector3::x(), Vector3::y(), Vector3::z()] {
                    self.draw_world_line(view_projection, center - axis * half, center + axis * half, paint);
                }
                match light.kind {
                    LightKind::Directional { target } | LightKind::Spot { target, .. } => {
                        self.draw_world_line(view_projection, center, target, paint);
                    }
                    _ => {}
                }
            }
            HelperKind::Label { text, width, height } => {
                let clip = view_projection * origin.to_homogeneous();
                if clip.w <= 1e-6 || clip.z + clip.w < 0.0 {
                    return;
                }
                let center = self.to_screen(&clip);
                // Pixels per world unit at the label's distance.
                let focal = camera.projection_matrix()[(1, 1)] / clip.w;
                let half_height = height * 0.5 * focal * self.frame.height as f32 * 0.5;
                let half_width = width * 0.5 * focal / camera.aspect * self.frame.width as f32 * 0.5;
                if self.fill_plate(center, half_width, half_height, Color::BLACK) {
                    self.labels.push(ScreenLabel {
                        text: text.clone(),
                        x: center.x,
                        y: center.y,
                    });
                }
            }
        }
    }

    /// Fill a screen-aligned rectangle at constant depth. Returns whether
    /// the center pixel was written.
    fn fill_plate(&mut self, center: ScreenVertex, half_width: f32, half_height: f32, color: Color) -> bool {
        let max_x = self.frame.width as f32 - 1.0;
        let max_y = self.frame.height as f32 - 1.0;
        let min_x = (center.x - half_width).floor().max(0.0) as i32;
        let min_y = (center.y - half_height).floor().max(0.0) as i32;
        let right = (center.x + half_width).floor().min(max_x) as i32;
        let bottom = (center.y + half_height).floor().min(max_y) as i32;
        let (cx, cy) = (center.x.floor() as i32, center.y.floor() as i32);

        let mut center_drawn = false;
        for y in min_y..=bottom {
            for x in min_x..=right {
                let Some(idx) = self.frame.index(x, y) else {
                    continue;
                };
                if center.z < self.frame.depth[idx] {
                    self.frame.write(idx, color, center.z, 1.0, true);
                    center_drawn |= x == cx && y == cy;
                }
            }
        }
        center_drawn
    }

    fn to_screen(&self, clip: &Vector4<f32>) -> ScreenVertex {
        let w = clip.w.max(1e-6);
        ScreenVertex {
            x: (clip.x / w + 1.0) * 0.5 * self.frame.width as f32,
            y: (1.0 - clip.y / w) * 0.5 * self.frame.height as f32,
            z: clip.z / w,
        }
    }

    fn draw_world_line(&mut self, view_projection: &Matrix4<f32>, a: Point3<f32>, b: Point3<f32>, paint: Paint) {
        self.draw_clip_line(view_projection * a.to_homogeneous(), view_projection * b.to_homogeneous(), paint);
    }

    fn draw_clip_line(&mut self, a: Vector4<f32>, b: Vector4<f32>, paint: Paint) {
        let (da, db) = (a.z + a.w, b.z + b.w);
        if da < 0.0 && db < 0.0 {
            return;
        }
        let (a, b) = if da < 0.0 {
            (a + (b - a) * (da / (da - db)), b)
        } else if db < 0.0 {
            (a, a + (b - a) * (da / (da - db)))
        } else {
            (a, b)
        };
        let (sa, sb) = (self.to_screen(&a), self.to_screen(&b));

        let steps = (sb.x - sa.x).abs().max((sb.y - sa.y).abs()).ceil().min(4096.0) as i32;
        for step in 0..=steps.max(1) {
            let t = step as f32 / steps.max(1) as f32;
            let x = (sa.x + (sb.x - sa.x) * t).floor() as i32;
            let y = (sa.y + (sb.y - sa.y) * t).floor() as i32;
            let z = sa.z + (sb.z - sa.z) * t;
            if let Some(idx) = self.frame.index(x, y) {
                if z - LINE_DEPTH_BIAS <= self.frame.depth[idx] {
                    self.frame.write(idx, paint.color, z, paint.opacity, paint.write_depth);
                }
            }
        }
    }

    fn fill_triangle(&mut self, v0: ScreenVertex, v1: ScreenVertex, v2: ScreenVertex, paint: Paint) {
        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0) as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil().min(self.frame.width as f32 - 1.0) as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0) as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil().min(self.frame.height as f32 - 1.0) as i32;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) = barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py)) else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.z + w1 * v1.z + w2 * v2.z;
                if let Some(idx) = self.frame.index(x, y) {
                    if depth < self.frame.depth[idx] {
                        self.frame.write(idx, paint.color, depth, paint.opacity, paint.write_depth);
                    }
                }
            }
        }
    }
}

impl RenderSurface for Rasterizer {
    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidViewport { width, height });
        }
        self.frame = FrameBuffer::new(width as usize, height as usize);
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.frame.width as u32, self.frame.height as u32)
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()> {
        self.draw(scene, camera);
        Ok(())
    }
}

/// Unit normal of a world-space triangle, falling back to the mesh normal.
fn face_normal(triangle: &Triangle, points: &[Point3<f32>; 3], model: &Matrix4<f32>) -> Vector3<f32> {
    (points[1] - points[0])
        .cross(&(points[2] - points[0]))
        .try_normalize(1e-12)
        .or_else(|| model.transform_vector(&triangle.calculate_normal()).try_normalize(1e-12))
        .unwrap_or_else(Vector3::y)
}

fn world_triangle(triangle: &Triangle, model: &Matrix4<f32>) -> [Point3<f32>; 3] {
    triangle.vertices.map(|v| model.transform_point(&v.position))
}

/// Clip a triangle against the near plane (`z >= -w`), returning a convex
/// polygon of zero to four vertices.
fn clip_near(triangle: &[Vector4<f32>; 3]) -> Vec<Vector4<f32>> {
    let mut out = Vec::with_capacity(4);
    for i in 0..3 {
        let current = triangle[i];
        let next = triangle[(i + 1) % 3];
        let dc = current.z + current.w;
        let dn = next.z + next.w;
        if dc >= 0.0 {
            out.push(current);
        }
        if (dc >= 0.0) != (dn >= 0.0) {
            out.push(current + (next - current) * (dc / (dc - dn)));
        }
    }
    out
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(v0: (f32, f32), v1: (f32, f32), v2: (f32, f32), p: (f32, f32)) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Shape;
    use crate::material::Material;

    fn unit_box(color: u32) -> Object {
        Object::new("box", Shape::Box { width: 1.0, height: 1.0, depth: 1.0 }, Material::basic(color))
    }

    #[test]
    fn empty_scene_is_background() {
        let mut raster = Rasterizer::new(20, 10);
        raster.draw(&Scene::new(0x222222), &Camera::default());
        assert_eq!(raster.frame().covered_count(), 0);
        assert_eq!(raster.frame().pixel(3, 3), Color::from_hex(0x222222));
    }

    #[test]
    fn nearer_object_wins_depth_test() {
        let mut scene = Scene::new(0);
        scene.add_object(unit_box(0xff0000).at(0.0, 0.0, -2.0));
        scene.add_object(unit_box(0x00ff00).at(0.0, 0.0, 1.0));
        let mut raster = Rasterizer::new(40, 40);
        raster.draw(&scene, &Camera::new(75.0, 40, 40));

        assert!(raster.frame().is_covered(20, 20));
        assert_eq!(raster.frame().pixel(20, 20), Color::from_hex(0x00ff00));
    }

    #[test]
    fn plane_crossing_the_camera_is_clipped_not_dropped() {
        let mut scene = Scene::new(0);
        scene.add_object(
            Object::new("ground", Shape::Plane { width: 50.0, height: 50.0 }, Material::basic(0x333333))
                .with_transform(crate::transform::Transform::at(0.0, -2.0, 0.0).with_rotation(-std::f32::consts::FRAC_PI_2, 0.0, 0.0)),
        );
        let mut camera = Camera::new(75.0, 40, 30).at(0.0, 8.0, 20.0);
        camera.look_at(Point3::origin());
        let mut raster = Rasterizer::new(40, 30);
        raster.draw(&scene, &camera);
        assert!(raster.frame().covered_count() > 40 * 30 / 4);
    }

    #[test]
    fn transparent_object_blends_with_background() {
        let mut scene = Scene::new(0x000000);
        let mut pane = Object::new("pane", Shape::Plane { width: 4.0, height: 4.0 }, Material::basic(0xffffff));
        pane.material.set_opacity(0.5);
        scene.add_object(pane);
        let mut raster = Rasterizer::new(20, 20);
        raster.draw(&scene, &Camera::new(75.0, 20, 20));

        let blended = raster.frame().pixel(13, 8);
        assert!((blended.r - 0.5).abs() < 1e-4);
        assert_eq!(raster.frame().depth(13, 8), f32::INFINITY);
    }

    #[test]
    fn rgba_export_is_opaque() {
        let raster = Rasterizer::new(3, 2);
        let rgba = raster.frame().to_rgba();
        assert_eq!(rgba.len(), 3 * 2 * 4);
        assert!(rgba.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn labels_draw_a_plate_and_report_their_text() {
        let mut scene = Scene::new(0x336699);
        scene.add_helper(Helper::label("Phong", 2.0, 1.0));
        let mut raster = Rasterizer::new(40, 40);
        raster.draw(&scene, &Camera::new(75.0, 40, 40));

        assert_eq!(raster.labels().len(), 1);
        let label = &raster.labels()[0];
        assert_eq!(label.text, "Phong");
        assert!((label.x - 20.0).abs() < 0.5 && (label.y - 20.0).abs() < 0.5);
        assert_eq!(raster.frame().pixel(20, 20), Color::BLACK);
        assert!(raster.frame().is_covered(24, 20));
        assert!(!raster.frame().is_covered(20, 26));
    }

    #[test]
    fn occluded_labels_are_not_reported() {
        let mut scene = Scene::new(0);
        scene.add_object(unit_box(0xff0000).at(0.0, 0.0, 2.0));
        scene.add_helper(Helper::label("Basic", 2.0, 1.0));
        let mut raster = Rasterizer::new(40, 40);
        raster.draw(&scene, &Camera::new(75.0, 40, 40));
        assert!(raster.labels().is_empty());
    }

    #[test]
    fn hidden_helpers_are_not_drawn() {
        let mut scene = Scene::new(0);
        let grid = scene.add_helper(Helper::grid(10.0, 10, 0x444444, 0x888888));
        let mut camera = Camera::new(75.0, 40, 30).at(0.0, 3.0, 6.0);
        camera.look_at(Point3::origin());
        let mut raster = Rasterizer::new(40, 30);

        raster.draw(&scene, &camera);
        assert!(raster.frame().covered_count() > 0);

        scene.helper_mut(grid).unwrap().visible = false;
        raster.draw(&scene, &camera);
        assert_eq!(raster.frame().covered_count(), 0);
    }
}
