pub mod mesh;
pub mod shader;

use glam::{Mat4, Vec3};
use hecs::World;
use mesh::Mesh;
use shader::ShaderProgram;

use crate::components::{Color, LocalTransform, MeshHandle, RenderOffset};

const VERT_SRC: &str = include_str!("../../shaders/flat.vert");
const FRAG_SRC: &str = include_str!("../../shaders/flat.frag");

const CLEAR_COLOR: Vec3 = Vec3::new(0.13, 0.14, 0.17);

/// Holds all loaded meshes. Entities reference meshes by MeshHandle index.
pub struct MeshStore {
    meshes: Vec<Mesh>,
}

impl MeshStore {
    pub fn new() -> Self {
        Self { meshes: Vec::new() }
    }

    pub fn add(&mut self, mesh: Mesh) -> MeshHandle {
        let handle = MeshHandle(self.meshes.len());
        self.meshes.push(mesh);
        handle
    }

    pub fn get(&self, handle: MeshHandle) -> &Mesh {
        &self.meshes[handle.0]
    }
}

pub struct Renderer {
    shader: ShaderProgram,
}

impl Renderer {
    pub fn init() -> Self {
        unsafe {
            gl::Enable(gl::DEPTH_TEST);
            gl::ClearColor(CLEAR_COLOR.x, CLEAR_COLOR.y, CLEAR_COLOR.z, 1.0);
        }

        let shader =
            ShaderProgram::from_sources(VERT_SRC, FRAG_SRC).expect("Failed to compile shaders");

        Self { shader }
    }

    /// Draw every mesh-bearing entity. Layers ride the z axis, so a higher
    /// `LocalTransform::layer` wins the depth test and draws in front.
    pub fn draw_scene(&mut self, world: &World, meshes: &MeshStore, view: &Mat4, proj: &Mat4) {
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }

        self.shader.bind();
        self.shader.set_mat4("u_view", view);
        self.shader.set_mat4("u_projection", proj);

        for (_entity, (local, mesh_handle, color, offset)) in world
            .query::<(&LocalTransform, &MeshHandle, &Color, Option<&RenderOffset>)>()
            .iter()
        {
            // The walk bob lives in RenderOffset: it moves the sprite without
            // touching the simulated position.
            let model = match offset {
                Some(off) => Mat4::from_translation(off.0.extend(0.0)) * local.matrix(),
                None => local.matrix(),
            };
            self.shader.set_mat4("u_model", &model);
            self.shader.set_vec3("u_object_color", color.0);
            meshes.get(*mesh_handle).draw();
        }
    }
}
