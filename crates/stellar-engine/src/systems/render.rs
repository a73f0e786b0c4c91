use crate::components::entity::Entity;
use crate::renderer::instance::{MeshBuffer, MeshInstance};
use crate::systems::quality::{QualityProfile, ShadowQuality};

/// Build the mesh instance buffer from entities with mesh components.
/// Shadow flags follow the active quality profile.
pub fn build_mesh_buffer<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    profile: &QualityProfile,
    buffer: &mut MeshBuffer,
) {
    buffer.clear();
    let shadows = profile.shadows != ShadowQuality::Off;
    for entity in entities {
        if !entity.active {
            continue;
        }
        let mesh = match &entity.mesh {
            Some(m) => m,
            None => continue,
        };
        let [param0, param1] = mesh.shape.params();
        let mut flags = 0;
        if mesh.pickable {
            flags |= MeshInstance::FLAG_PICKABLE;
        }
        // Emissive bodies light the scene, they do not shadow it
        if shadows && mesh.emissive <= 0.0 {
            flags |= MeshInstance::FLAG_SHADOW;
        }
        let pushed = buffer.push(MeshInstance {
            x: entity.pos.x,
            y: entity.pos.y,
            z: entity.pos.z,
            rot_x: entity.rotation.x,
            rot_y: entity.rotation.y,
            rot_z: entity.rotation.z,
            scale: entity.scale,
            shape: mesh.shape.code(),
            param0,
            param1,
            r: mesh.color.r,
            g: mesh.color.g,
            b: mesh.color.b,
            emissive: mesh.emissive,
            opacity: mesh.opacity,
            flags: flags as f32,
            entity: entity.id.0 as f32,
            _pad: [0.0; 3],
        });
        if !pushed {
            log::warn!("Mesh buffer full ({}), dropping remaining entities", buffer.max_instances());
            break;
        }
    }
}
