/// Pipeline cache: creates/caches wgpu::RenderPipeline per topology and
/// pass-through capability set.
use crate::topology::is_strip;
use glbridge_core::assembler::VERTEX_STRIDE;
use glbridge_core::shader::{FRAGMENT_ENTRY, VERTEX_ENTRY};
use std::collections::HashMap;
use wgpu::*;

/// Depth buffer format used when the target has one.
pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth24Plus;

/// Everything that selects a distinct pipeline object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub topology: PrimitiveTopology,
    pub depth_test: bool,
    pub blend: bool,
    pub cull_face: bool,
}

impl PipelineKey {
    pub fn new(topology: PrimitiveTopology) -> Self {
        Self {
            topology,
            depth_test: false,
            blend: false,
            cull_face: false,
        }
    }
}

const VERTEX_ATTRIBUTES: [VertexAttribute; 4] = [
    // Position
    VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: VertexFormat::Float32x3,
    },
    // Normal
    VertexAttribute {
        offset: 12,
        shader_location: 1,
        format: VertexFormat::Float32x3,
    },
    // TexCoord
    VertexAttribute {
        offset: 24,
        shader_location: 2,
        format: VertexFormat::Float32x2,
    },
    // Color
    VertexAttribute {
        offset: 32,
        shader_location: 3,
        format: VertexFormat::Float32x4,
    },
];

pub struct PipelineCache {
    cache: HashMap<PipelineKey, RenderPipeline>,
    bind_group_layout: BindGroupLayout,
    pipeline_layout: PipelineLayout,
    color_format: TextureFormat,
    depth_format: Option<TextureFormat>,
}

impl PipelineCache {
    pub fn new(
        device: &Device,
        color_format: TextureFormat,
        depth_format: Option<TextureFormat>,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("glbridge bind group layout"),
            entries: &[
                // Binding 0: uniform block
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
                    ty: BindingType::Buffer {
                        ty: BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Binding 1: texture
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Float { filterable: true },
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                // Binding 2: sampler
                BindGroupLayoutEntry {
                    binding: 2,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("glbridge pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        Self {
            cache: HashMap::new(),
            bind_group_layout,
            pipeline_layout,
            color_format,
            depth_format,
        }
    }

    pub fn bind_group_layout(&self) -> &BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Get or create the pipeline for `key`.
    pub fn get_or_create(
        &mut self,
        device: &Device,
        key: &PipelineKey,
        module: &ShaderModule,
    ) -> &RenderPipeline {
        let layout = &self.pipeline_layout;
        let (color_format, depth_format) = (self.color_format, self.depth_format);
        self.cache.entry(*key).or_insert_with(|| {
            log::debug!("creating pipeline for {:?}", key);
            create_pipeline(device, layout, key, module, color_format, depth_format)
        })
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

fn create_pipeline(
    device: &Device,
    layout: &PipelineLayout,
    key: &PipelineKey,
    module: &ShaderModule,
    color_format: TextureFormat,
    depth_format: Option<TextureFormat>,
) -> RenderPipeline {
    // Every draw is indexed with u32 indices after primitive conversion.
    let strip_index_format = is_strip(key.topology).then_some(IndexFormat::Uint32);

    let depth_stencil = depth_format.map(|format| DepthStencilState {
        format,
        depth_write_enabled: key.depth_test,
        depth_compare: if key.depth_test {
            CompareFunction::Less
        } else {
            CompareFunction::Always
        },
        stencil: StencilState::default(),
        bias: DepthBiasState::default(),
    });

    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some("glbridge render pipeline"),
        layout: Some(layout),
        vertex: VertexState {
            module,
            entry_point: VERTEX_ENTRY,
            buffers: &[VertexBufferLayout {
                array_stride: VERTEX_STRIDE as BufferAddress,
                step_mode: VertexStepMode::Vertex,
                attributes: &VERTEX_ATTRIBUTES,
            }],
        },
        fragment: Some(FragmentState {
            module,
            entry_point: FRAGMENT_ENTRY,
            targets: &[Some(ColorTargetState {
                format: color_format,
                blend: key.blend.then_some(BlendState::ALPHA_BLENDING),
                write_mask: ColorWrites::ALL,
            })],
        }),
        primitive: PrimitiveState {
            topology: key.topology,
            strip_index_format,
            front_face: FrontFace::Ccw,
            cull_mode: key.cull_face.then_some(Face::Back),
            unclipped_depth: false,
            polygon_mode: PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil,
        multisample: MultisampleState::default(),
        multiview: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_distinguish_capabilities() {
        let base = PipelineKey::new(PrimitiveTopology::TriangleList);
        let blended = PipelineKey { blend: true, ..base };
        let strip = PipelineKey::new(PrimitiveTopology::TriangleStrip);
        let set: HashSet<_> = [base, blended, strip, base].into_iter().collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_attributes_cover_interleaved_vertex() {
        let last = VERTEX_ATTRIBUTES[3];
        assert_eq!(last.offset + last.format.size(), VERTEX_STRIDE as u64);
    }
}
