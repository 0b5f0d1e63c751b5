mod grid;
mod profile;

pub use grid::{grid_mesh, grid_mesh_with_layout};
pub use profile::{profile_mesh, profile_mesh_at};

use bevy::{
    prelude::*,
    render::{mesh::Indices, render_resource::PrimitiveTopology},
};

/// How samples are turned into triangles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tessellation {
    /// Top/base vertex pairs per sample, two triangles per neighbouring pair.
    Profile,
    /// One vertex per cell, two triangles per interior cell.
    Grid,
}

impl Tessellation {
    /// Whether vertex `index` carries a sampled height (as opposed to a
    /// profile's base vertex).
    pub fn is_surface_vertex(self, index: usize) -> bool {
        match self {
            Tessellation::Profile => index % 2 == 0,
            Tessellation::Grid => true,
        }
    }

    /// Offset from the mesh centre to a viewpoint on the side the faces
    /// point toward.
    pub fn view_offset(self, extent: f32) -> Vec3 {
        match self {
            Tessellation::Profile => Vec3::new(0., 0., -extent),
            Tessellation::Grid => Vec3::new(0., extent * 0.5, extent),
        }
    }
}

/// Vertex positions and flat triangle indices, three per triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainMeshData {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<u32>,
}

impl TerrainMeshData {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Area-weighted vertex normals accumulated from the triangle faces.
    pub fn normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];

        for tri in self.triangles.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
            let face = (self.vertices[b] - self.vertices[a])
                .cross(self.vertices[c] - self.vertices[a]);

            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }

        normals
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
            .collect()
    }

    pub fn into_render_mesh(self, color_by_normals: bool) -> Mesh {
        let normals = self.normals();
        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList);

        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.vertices);

        if color_by_normals {
            mesh.insert_attribute(
                Mesh::ATTRIBUTE_COLOR,
                normals
                    .iter()
                    .map(|v| [v.x.abs(), v.y.abs(), v.z.abs(), 1.])
                    .collect::<Vec<_>>(),
            );
        };
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);

        mesh.set_indices(Some(Indices::U32(self.triangles)));

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_grid_normals_point_up() {
        let grid = crate::grid::Grid(ndarray::Array2::from_elem((3, 4), 2));
        let mesh = grid_mesh(&grid).unwrap();

        for n in mesh.normals() {
            assert!((n - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn profile_surface_vertices_are_even() {
        assert!(Tessellation::Profile.is_surface_vertex(4));
        assert!(!Tessellation::Profile.is_surface_vertex(5));
        assert!(Tessellation::Grid.is_surface_vertex(5));
    }

    #[test]
    fn viewpoint_sees_front_faces() {
        let profile = profile_mesh(&[3, 8, 5, 9]).unwrap();
        // Ridges along z, so every grid face tilts sideways but still points up
        let grid = grid_mesh(&crate::grid::Grid(ndarray::array![[2, 5, 3], [2, 5, 3]])).unwrap();

        for (mesh, tessellation) in [(profile, Tessellation::Profile), (grid, Tessellation::Grid)] {
            let offset = tessellation.view_offset(10.);
            for tri in mesh.triangles.chunks_exact(3) {
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
                let face = (b - a).cross(c - a);
                assert!(face.dot(offset) > 0., "{:?} face {:?}", tessellation, face);
            }
        }
    }

    #[test]
    fn render_mesh_carries_all_indices() {
        let mesh = profile_mesh(&[1, 4, 2]).unwrap();
        let render = mesh.clone().into_render_mesh(false);

        assert_eq!(render.count_vertices(), mesh.vertices.len());
        assert_eq!(render.indices().map(|i| i.len()), Some(mesh.triangles.len()));
    }
}
