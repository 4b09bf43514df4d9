use gl::types::*;
use glam::Vec3;
use std::f32::consts::TAU;
use std::mem;
use std::ptr;

pub struct Mesh {
    vao: GLuint,
    vbo: GLuint,
    ebo: GLuint,
    pub index_count: i32,
}

impl Mesh {
    pub fn draw(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawElements(gl::TRIANGLES, self.index_count, gl::UNSIGNED_INT, ptr::null());
            gl::BindVertexArray(0);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteBuffers(1, &self.ebo);
        }
    }
}

// Vertex layout: position (xyz) then color (rgb). Sprites are flat quads and
// fans in the XY plane; small per-vertex z offsets stack a sprite's parts.
fn upload_mesh(vertices: &[f32], indices: &[u32]) -> Mesh {
    let mut vao = 0;
    let mut vbo = 0;
    let mut ebo = 0;

    unsafe {
        gl::GenVertexArrays(1, &mut vao);
        gl::GenBuffers(1, &mut vbo);
        gl::GenBuffers(1, &mut ebo);

        gl::BindVertexArray(vao);

        gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
        gl::BufferData(
            gl::ARRAY_BUFFER,
            (vertices.len() * mem::size_of::<f32>()) as GLsizeiptr,
            vertices.as_ptr() as *const _,
            gl::STATIC_DRAW,
        );

        gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
        gl::BufferData(
            gl::ELEMENT_ARRAY_BUFFER,
            (indices.len() * mem::size_of::<u32>()) as GLsizeiptr,
            indices.as_ptr() as *const _,
            gl::STATIC_DRAW,
        );

        let stride = 6 * mem::size_of::<f32>() as GLsizei;

        // position attribute (location 0)
        gl::VertexAttribPointer(0, 3, gl::FLOAT, gl::FALSE, stride, ptr::null());
        gl::EnableVertexAttribArray(0);

        // color attribute (location 1)
        gl::VertexAttribPointer(
            1,
            3,
            gl::FLOAT,
            gl::FALSE,
            stride,
            (3 * mem::size_of::<f32>()) as *const _,
        );
        gl::EnableVertexAttribArray(1);

        gl::BindVertexArray(0);
    }

    Mesh {
        vao,
        vbo,
        ebo,
        index_count: indices.len() as i32,
    }
}

pub fn create_quad(width: f32, height: f32, color: Vec3) -> Mesh {
    let hw = width * 0.5;
    let hh = height * 0.5;
    let [r, g, b] = color.to_array();

    #[rustfmt::skip]
    let vertices: Vec<f32> = vec![
        -hw, -hh, 0.0,  r, g, b,
         hw, -hh, 0.0,  r, g, b,
         hw,  hh, 0.0,  r, g, b,
        -hw,  hh, 0.0,  r, g, b,
    ];
    let indices = vec![0, 1, 2, 0, 2, 3];

    upload_mesh(&vertices, &indices)
}

pub fn create_disc(radius: f32, segments: u32, color: Vec3) -> Mesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let [r, g, b] = color.to_array();

    // Fan around the center; the seam vertex is duplicated to close the ring.
    vertices.extend_from_slice(&[0.0, 0.0, 0.0, r, g, b]);
    for i in 0..=segments {
        let angle = TAU * (i as f32) / (segments as f32);
        vertices.extend_from_slice(&[
            radius * angle.cos(),
            radius * angle.sin(),
            0.0,
            r,
            g,
            b,
        ]);
    }
    for i in 0..segments {
        indices.extend_from_slice(&[0, i + 1, i + 2]);
    }

    upload_mesh(&vertices, &indices)
}

/// One quad per cell, colors alternating in both directions. Centered on the
/// origin so it doubles as the arena floor without an offset transform.
pub fn create_checker_ground(
    cells_x: u32,
    cells_y: u32,
    cell_size: f32,
    color_a: Vec3,
    color_b: Vec3,
) -> Mesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    let origin_x = -(cells_x as f32) * cell_size * 0.5;
    let origin_y = -(cells_y as f32) * cell_size * 0.5;

    for cy in 0..cells_y {
        for cx in 0..cells_x {
            let color = if (cx + cy) % 2 == 0 { color_a } else { color_b };
            let [r, g, b] = color.to_array();
            let x0 = origin_x + cx as f32 * cell_size;
            let y0 = origin_y + cy as f32 * cell_size;
            let x1 = x0 + cell_size;
            let y1 = y0 + cell_size;

            let base = vertices.len() as u32 / 6;
            #[rustfmt::skip]
            let cell: [f32; 24] = [
                x0, y0, 0.0,  r, g, b,
                x1, y0, 0.0,  r, g, b,
                x1, y1, 0.0,  r, g, b,
                x0, y1, 0.0,  r, g, b,
            ];
            vertices.extend_from_slice(&cell);
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    upload_mesh(&vertices, &indices)
}

/// The walker sprite: torso, head, and a single eye offset toward +X so a
/// horizontal flip visibly changes which way it faces. Origin at the torso
/// center, matching the collision circle.
pub fn create_walker() -> Mesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Helper: append an axis-aligned rectangle
    let add_rect = |verts: &mut Vec<f32>,
                    idxs: &mut Vec<u32>,
                    w: f32,
                    h: f32,
                    cx: f32,
                    cy: f32,
                    z: f32,
                    color: Vec3| {
        let base = verts.len() as u32 / 6;
        let hw = w * 0.5;
        let hh = h * 0.5;
        let [r, g, b] = color.to_array();
        #[rustfmt::skip]
        let rect: [f32; 24] = [
            cx - hw, cy - hh, z,  r, g, b,
            cx + hw, cy - hh, z,  r, g, b,
            cx + hw, cy + hh, z,  r, g, b,
            cx - hw, cy + hh, z,  r, g, b,
        ];
        verts.extend_from_slice(&rect);
        idxs.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    };

    // Helper: append a filled disc as a fan
    let add_disc = |verts: &mut Vec<f32>,
                    idxs: &mut Vec<u32>,
                    radius: f32,
                    cx: f32,
                    cy: f32,
                    z: f32,
                    segments: u32,
                    color: Vec3| {
        let center = verts.len() as u32 / 6;
        let [r, g, b] = color.to_array();
        verts.extend_from_slice(&[cx, cy, z, r, g, b]);
        for i in 0..=segments {
            let angle = TAU * (i as f32) / (segments as f32);
            verts.extend_from_slice(&[
                cx + radius * angle.cos(),
                cy + radius * angle.sin(),
                z,
                r,
                g,
                b,
            ]);
        }
        for i in 0..segments {
            idxs.extend_from_slice(&[center, center + i + 1, center + i + 2]);
        }
    };

    const BODY: Vec3 = Vec3::new(0.93, 0.78, 0.47);
    const EYE: Vec3 = Vec3::new(0.09, 0.09, 0.11);

    // Torso
    add_rect(&mut vertices, &mut indices, 0.5, 0.55, 0.0, -0.05, 0.0, BODY);
    // Head
    add_disc(&mut vertices, &mut indices, 0.21, 0.0, 0.34, 0.001, 24, BODY);
    // Eye, forward of the head in z so it always reads on top
    add_disc(&mut vertices, &mut indices, 0.045, 0.1, 0.37, 0.002, 12, EYE);

    upload_mesh(&vertices, &indices)
}
