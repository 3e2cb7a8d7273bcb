use std::f32::consts::PI;

use crate::error::{Result, ViewerError};

/// Floats per vertex: position (3), normal (3), texture coordinate (2).
pub const VERTEX_STRIDE: usize = 8;

pub struct Mesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
}

impl Mesh {
    fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u16 {
        let index = (self.vertices.len() / VERTEX_STRIDE) as u16;
        self.vertices.extend_from_slice(&position);
        self.vertices.extend_from_slice(&normal);
        self.vertices.extend_from_slice(&uv);
        index
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    /// UV sphere centred on the origin.
    pub fn sphere(radius: f32, width_segments: u16, height_segments: u16) -> Self {
        let mut mesh = Mesh { vertices: Vec::new(), indices: Vec::new() };

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let phi = v * PI;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let theta = u * 2.0 * PI;
                let normal = [-theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin()];
                let position = [normal[0] * radius, normal[1] * radius, normal[2] * radius];
                mesh.push_vertex(position, normal, [u, 1.0 - v]);
            }
        }

        let row = width_segments + 1;
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix;
                let b = a + row;
                mesh.indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
            }
        }

        mesh
    }

    /// Flat annulus in the XY plane facing +z.
    pub fn ring(inner_radius: f32, outer_radius: f32, segments: u16) -> Self {
        let mut mesh = Mesh { vertices: Vec::new(), indices: Vec::new() };

        for i in 0..=segments {
            let angle = i as f32 / segments as f32 * 2.0 * PI;
            let (sin, cos) = angle.sin_cos();
            for radius in [inner_radius, outer_radius] {
                let x = radius * cos;
                let y = radius * sin;
                let uv = [(x / outer_radius + 1.0) / 2.0, (y / outer_radius + 1.0) / 2.0];
                mesh.push_vertex([x, y, 0.0], [0.0, 0.0, 1.0], uv);
            }
        }

        for i in 0..segments {
            let inner = i * 2;
            let outer = inner + 1;
            let next_inner = inner + 2;
            let next_outer = inner + 3;
            mesh.indices
                .extend_from_slice(&[inner, outer, next_outer, inner, next_outer, next_inner]);
        }

        mesh
    }

    /// Capped cylinder along the y axis, centred on the origin.
    pub fn cylinder(radius: f32, height: f32, segments: u16) -> Self {
        let mut mesh = Mesh { vertices: Vec::new(), indices: Vec::new() };
        let half = height / 2.0;

        for i in 0..=segments {
            let u = i as f32 / segments as f32;
            let (sin, cos) = (u * 2.0 * PI).sin_cos();
            let normal = [sin, 0.0, cos];
            mesh.push_vertex([radius * sin, half, radius * cos], normal, [u, 1.0]);
            mesh.push_vertex([radius * sin, -half, radius * cos], normal, [u, 0.0]);
        }
        for i in 0..segments {
            let top = i * 2;
            let bottom = top + 1;
            mesh.indices
                .extend_from_slice(&[top, bottom, top + 2, bottom, bottom + 2, top + 2]);
        }

        for (y, ny) in [(half, 1.0), (-half, -1.0)] {
            let center = mesh.push_vertex([0.0, y, 0.0], [0.0, ny, 0.0], [0.5, 0.5]);
            let first = center + 1;
            for i in 0..=segments {
                let (sin, cos) = (i as f32 / segments as f32 * 2.0 * PI).sin_cos();
                mesh.push_vertex(
                    [radius * sin, y, radius * cos],
                    [0.0, ny, 0.0],
                    [(sin + 1.0) / 2.0, (cos + 1.0) / 2.0],
                );
            }
            for i in 0..segments {
                mesh.indices.extend_from_slice(&[center, first + i, first + i + 1]);
            }
        }

        mesh
    }

    /// Rectangle in the XY plane facing +z.
    pub fn plane(width: f32, height: f32) -> Self {
        let mut mesh = Mesh { vertices: Vec::new(), indices: Vec::new() };
        let (w, h) = (width / 2.0, height / 2.0);
        mesh.push_vertex([-w, -h, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]);
        mesh.push_vertex([w, -h, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]);
        mesh.push_vertex([w, h, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]);
        mesh.push_vertex([-w, h, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]);
        mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
        mesh
    }

    pub fn from_gltf(bytes: &[u8]) -> Result<Self> {
        let (document, buffers, _) =
            gltf::import_slice(bytes).map_err(|e| ViewerError::Mesh(e.to_string()))?;

        let mut mesh = Mesh { vertices: Vec::new(), indices: Vec::new() };

        for gltf_mesh in document.meshes() {
            for primitive in gltf_mesh.primitives() {
                let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

                let positions: Vec<[f32; 3]> = reader
                    .read_positions()
                    .ok_or_else(|| ViewerError::Mesh("primitive has no positions".to_string()))?
                    .collect();
                let normals: Vec<[f32; 3]> = match reader.read_normals() {
                    Some(iter) => iter.collect(),
                    None => vec![[0.0, 1.0, 0.0]; positions.len()],
                };
                let uvs: Vec<[f32; 2]> = match reader.read_tex_coords(0) {
                    Some(iter) => iter.into_f32().collect(),
                    None => vec![[0.0, 0.0]; positions.len()],
                };

                let base_index = mesh.vertex_count();
                if base_index + positions.len() > u16::MAX as usize {
                    return Err(ViewerError::Mesh("model exceeds 16-bit index range".to_string()));
                }

                for ((position, normal), uv) in positions.iter().zip(&normals).zip(&uvs) {
                    mesh.push_vertex(*position, *normal, *uv);
                }

                match reader.read_indices() {
                    Some(iter) => {
                        for index in iter.into_u32() {
                            let index = index as usize;
                            if index >= positions.len() {
                                return Err(ViewerError::Mesh(format!(
                                    "index {} out of range for {} vertices",
                                    index,
                                    positions.len()
                                )));
                            }
                            mesh.indices.push((base_index + index) as u16);
                        }
                    }
                    None => {
                        for index in 0..positions.len() {
                            mesh.indices.push((base_index + index) as u16);
                        }
                    }
                }
            }
        }

        Ok(mesh)
    }
}
