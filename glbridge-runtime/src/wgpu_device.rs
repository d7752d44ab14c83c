// wgpu implementation of the bridge's GPU device
//
// Renders into an offscreen color target (plus optional depth). Every draw
// is one render pass that loads the previous contents, so draw order is
// preserved without the bridge knowing about frames.

use crate::config::DeviceConfig;
use crate::pipeline::{PipelineCache, PipelineKey, DEPTH_FORMAT};
use crate::topology;
use anyhow::{Context, Result};
use glbridge_core::error::{BridgeError, ShaderStage};
use glbridge_core::gl::{self, GLenum, IndexType, PrimitiveMode};
use glbridge_core::uniforms::{UniformBlock, UNIFORM_BLOCK_SIZE};
use glbridge_core::GpuDevice;
use log::{debug, error, info, trace};
use std::collections::HashSet;
use wgpu::*;

const MIN_STREAM_BYTES: u64 = 64 * 1024;

struct Program {
    module: ShaderModule,
    pipelines: PipelineCache,
    uniform_buffer: Buffer,
    sampler: Sampler,
    _white: Texture,
    white_view: TextureView,
    bind_group: BindGroup,
}

struct StreamBuffer {
    buffer: Buffer,
    capacity: u64,
    usage: BufferUsages,
    label: &'static str,
}

impl StreamBuffer {
    fn new(device: &Device, label: &'static str, usage: BufferUsages) -> Self {
        let usage = usage | BufferUsages::COPY_DST;
        Self {
            buffer: create_buffer(device, label, MIN_STREAM_BYTES, usage),
            capacity: MIN_STREAM_BYTES,
            usage,
            label,
        }
    }

    /// Upload `bytes`, recreating the buffer only when it is too small.
    fn write(&mut self, device: &Device, queue: &Queue, bytes: &[u8]) {
        let needed = bytes.len() as u64;
        if needed > self.capacity {
            let capacity = needed.next_power_of_two();
            debug!("growing {} to {} bytes", self.label, capacity);
            self.buffer = create_buffer(device, self.label, capacity, self.usage);
            self.capacity = capacity;
        }
        if !bytes.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
    }
}

struct StreamBuffers {
    vertex: StreamBuffer,
    index: StreamBuffer,
}

fn create_buffer(device: &Device, label: &str, size: u64, usage: BufferUsages) -> Buffer {
    device.create_buffer(&BufferDescriptor {
        label: Some(label),
        size,
        usage,
        mapped_at_creation: false,
    })
}

pub struct WgpuDevice {
    device: Device,
    queue: Queue,
    config: DeviceConfig,
    color_format: TextureFormat,
    color_target: Texture,
    color_view: TextureView,
    depth_view: Option<TextureView>,
    program: Option<Program>,
    streams: Option<StreamBuffers>,
    pending_indices: Vec<u32>,
    expanded: Vec<u32>,
    capabilities: HashSet<GLenum>,
}

impl WgpuDevice {
    /// Create a headless device rendering into an offscreen target.
    pub fn new(config: DeviceConfig) -> Result<Self> {
        config.validate()?;
        let instance = Instance::new(InstanceDescriptor::default());

        let adapter = pollster::block_on(instance.request_adapter(&RequestAdapterOptions {
            power_preference: config.power_preference.into(),
            compatible_surface: None,
            force_fallback_adapter: config.force_fallback_adapter,
        }))
        .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;
        info!("using adapter {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &DeviceDescriptor {
                label: Some("glbridge device"),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_defaults(),
            },
            None,
        ))
        .context("Failed to create GPU device")?;

        Ok(Self::from_parts(device, queue, config))
    }

    /// Wrap an existing device/queue pair.
    pub fn from_parts(device: Device, queue: Queue, config: DeviceConfig) -> Self {
        let color_format: TextureFormat = config.color_format.into();
        let size = Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        };
        let color_target = device.create_texture(&TextureDescriptor {
            label: Some("glbridge color target"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: color_format,
            usage: TextureUsages::RENDER_ATTACHMENT
                | TextureUsages::COPY_SRC
                | TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let color_view = color_target.create_view(&TextureViewDescriptor::default());

        let depth_view = config.depth_buffer.then(|| {
            device
                .create_texture(&TextureDescriptor {
                    label: Some("glbridge depth target"),
                    size,
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: TextureDimension::D2,
                    format: DEPTH_FORMAT,
                    usage: TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&TextureViewDescriptor::default())
        });

        let mut this = Self {
            device,
            queue,
            config,
            color_format,
            color_target,
            color_view,
            depth_view,
            program: None,
            streams: None,
            pending_indices: Vec::new(),
            expanded: Vec::new(),
            capabilities: HashSet::new(),
        };
        this.clear();
        this
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// The offscreen color target draws land in.
    pub fn color_target(&self) -> &Texture {
        &self.color_target
    }

    /// Number of distinct pipelines created so far.
    pub fn pipeline_count(&self) -> usize {
        self.program.as_ref().map_or(0, |p| p.pipelines.len())
    }

    /// Clear color and depth to the configured values.
    pub fn clear(&mut self) {
        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("glbridge clear"),
            });
        {
            let _pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("glbridge clear pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &self.color_view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.config.clear_color()),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: self.depth_view.as_ref().map(|view| {
                    RenderPassDepthStencilAttachment {
                        view,
                        depth_ops: Some(Operations {
                            load: LoadOp::Clear(1.0),
                            store: StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        self.queue.submit(Some(encoder.finish()));
    }

    /// Bind `view` as the texture sampled while `GL_TEXTURE_2D` is enabled.
    /// `None` restores the 1x1 white default.
    pub fn bind_texture(&mut self, view: Option<&TextureView>) {
        let Some(program) = self.program.as_mut() else {
            return;
        };
        let view = view.unwrap_or(&program.white_view);
        program.bind_group = create_bind_group(
            &self.device,
            &program.pipelines,
            &program.uniform_buffer,
            view,
            &program.sampler,
        );
    }

    fn submit(&mut self, mode: PrimitiveMode, indexed: bool, count: usize) {
        let (Some(program), Some(streams)) = (self.program.as_mut(), self.streams.as_mut()) else {
            trace!("draw skipped: program or buffers missing");
            return;
        };

        let source: &[u32] = if indexed {
            &self.pending_indices[..count.min(self.pending_indices.len())]
        } else {
            topology::sequential(count, &mut self.pending_indices);
            &self.pending_indices
        };
        let topology = topology::expand_indices(mode, source, &mut self.expanded);
        if self.expanded.is_empty() {
            return;
        }
        streams
            .index
            .write(&self.device, &self.queue, bytemuck::cast_slice(&self.expanded));

        let key = PipelineKey {
            topology,
            depth_test: self.depth_view.is_some() && self.capabilities.contains(&gl::DEPTH_TEST),
            blend: self.capabilities.contains(&gl::BLEND),
            cull_face: self.capabilities.contains(&gl::CULL_FACE),
        };
        let pipeline = program
            .pipelines
            .get_or_create(&self.device, &key, &program.module);

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("glbridge draw"),
            });
        {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("glbridge draw pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &self.color_view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Load,
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: self.depth_view.as_ref().map(|view| {
                    RenderPassDepthStencilAttachment {
                        view,
                        depth_ops: Some(Operations {
                            load: LoadOp::Load,
                            store: StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &program.bind_group, &[]);
            pass.set_vertex_buffer(0, streams.vertex.buffer.slice(..));
            pass.set_index_buffer(streams.index.buffer.slice(..), IndexFormat::Uint32);
            pass.draw_indexed(0..self.expanded.len() as u32, 0, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));
    }
}

fn create_bind_group(
    device: &Device,
    pipelines: &PipelineCache,
    uniforms: &Buffer,
    texture: &TextureView,
    sampler: &Sampler,
) -> BindGroup {
    device.create_bind_group(&BindGroupDescriptor {
        label: Some("glbridge bind group"),
        layout: pipelines.bind_group_layout(),
        entries: &[
            BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            },
            BindGroupEntry {
                binding: 1,
                resource: BindingResource::TextureView(texture),
            },
            BindGroupEntry {
                binding: 2,
                resource: BindingResource::Sampler(sampler),
            },
        ],
    })
}

impl GpuDevice for WgpuDevice {
    fn create_program(&mut self, source: &str) -> glbridge_core::Result<()> {
        self.device.push_error_scope(ErrorFilter::Validation);
        let module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some("glbridge fixed-function"),
            source: ShaderSource::Wgsl(source.into()),
        });
        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            error!("shader module failed: {}", err);
            return Err(BridgeError::ProgramBuild {
                stage: ShaderStage::Module,
                log: err.to_string(),
            });
        }

        let depth_format = self.depth_view.as_ref().map(|_| DEPTH_FORMAT);
        let mut pipelines = PipelineCache::new(&self.device, self.color_format, depth_format);

        // Build the common pipeline now so interface mismatches surface here.
        self.device.push_error_scope(ErrorFilter::Validation);
        pipelines.get_or_create(
            &self.device,
            &PipelineKey::new(PrimitiveTopology::TriangleList),
            &module,
        );
        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            error!("pipeline link failed: {}", err);
            return Err(BridgeError::ProgramBuild {
                stage: ShaderStage::Link,
                log: err.to_string(),
            });
        }

        let uniform_buffer = create_buffer(
            &self.device,
            "glbridge uniforms",
            UNIFORM_BLOCK_SIZE as u64,
            BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        );

        let white = self.device.create_texture(&TextureDescriptor {
            label: Some("glbridge white texture"),
            size: Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8Unorm,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            ImageCopyTexture {
                texture: &white,
                mip_level: 0,
                origin: Origin3d::ZERO,
                aspect: TextureAspect::All,
            },
            &[255, 255, 255, 255],
            ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        let white_view = white.create_view(&TextureViewDescriptor::default());
        let sampler = self.device.create_sampler(&SamplerDescriptor {
            label: Some("glbridge sampler"),
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            ..Default::default()
        });
        let bind_group =
            create_bind_group(&self.device, &pipelines, &uniform_buffer, &white_view, &sampler);

        self.program = Some(Program {
            module,
            pipelines,
            uniform_buffer,
            sampler,
            _white: white,
            white_view,
            bind_group,
        });
        info!("fixed-function program ready");
        Ok(())
    }

    fn destroy_program(&mut self) {
        self.program = None;
    }

    fn create_stream_buffers(&mut self) -> glbridge_core::Result<()> {
        self.streams = Some(StreamBuffers {
            vertex: StreamBuffer::new(&self.device, "glbridge vertices", BufferUsages::VERTEX),
            index: StreamBuffer::new(&self.device, "glbridge indices", BufferUsages::INDEX),
        });
        Ok(())
    }

    fn destroy_stream_buffers(&mut self) {
        self.streams = None;
        self.pending_indices.clear();
    }

    fn write_uniforms(&mut self, block: &UniformBlock) {
        if let Some(program) = &self.program {
            self.queue
                .write_buffer(&program.uniform_buffer, 0, block.as_bytes());
        }
    }

    fn stream_vertices(&mut self, vertices: &[f32]) -> glbridge_core::Result<()> {
        let streams = self
            .streams
            .as_mut()
            .ok_or(BridgeError::BuffersUnavailable)?;
        streams
            .vertex
            .write(&self.device, &self.queue, bytemuck::cast_slice(vertices));
        Ok(())
    }

    fn stream_indices(&mut self, indices: &[u8], ty: IndexType) -> glbridge_core::Result<()> {
        if self.streams.is_none() {
            return Err(BridgeError::BuffersUnavailable);
        }
        // Widened here; the real upload happens after primitive conversion.
        let n = indices.len() / ty.size();
        self.pending_indices.clear();
        self.pending_indices
            .extend((0..n).map(|i| ty.read(indices, i)));
        Ok(())
    }

    fn draw_arrays(&mut self, mode: PrimitiveMode, count: usize) {
        self.submit(mode, false, count);
    }

    fn draw_indexed(&mut self, mode: PrimitiveMode, count: usize, _ty: IndexType) {
        self.submit(mode, true, count);
    }

    fn set_capability(&mut self, cap: GLenum, enabled: bool) {
        if enabled {
            self.capabilities.insert(cap);
        } else {
            self.capabilities.remove(&cap);
        }
    }

    fn capability(&self, cap: GLenum) -> bool {
        self.capabilities.contains(&cap)
    }

    fn get_float(&self, pname: GLenum, out: &mut [f32]) -> usize {
        let viewport = [
            0.0,
            0.0,
            self.config.width as f32,
            self.config.height as f32,
        ];
        let values: &[f32] = match pname {
            gl::VIEWPORT => &viewport,
            gl::DEPTH_RANGE => &[0.0, 1.0],
            _ => return 0,
        };
        let n = values.len().min(out.len());
        out[..n].copy_from_slice(&values[..n]);
        n
    }
}
