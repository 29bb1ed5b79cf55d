use wgpu::util::DeviceExt;

use super::layout::InstanceLayout;
use super::pipeline::{BindingKind, PipelineConfig};
use super::{Mesh, RenderCtx, RenderTarget};

/// One pipeline, one bind group, one instanced draw per frame.
///
/// Buffer contents come from `InstanceStore`: the static bytes are uploaded once at
/// construction, the dynamic bytes on every `render_frame`. The renderer itself never
/// produces instance data.
pub struct FrameRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,

    _static_buffer: wgpu::Buffer,
    dynamic_buffer: wgpu::Buffer,
    _vertex_buffer: Option<wgpu::Buffer>,

    vertex_count: u32,
    instance_count: u32,
    clear_color: wgpu::Color,
}

impl FrameRenderer {
    /// Creates pipeline, buffers and bind group and performs the single static upload.
    pub fn new(
        ctx: &RenderCtx<'_>,
        config: &PipelineConfig,
        layout: InstanceLayout,
        static_bytes: &[u8],
        mesh: &Mesh,
        clear_color: wgpu::Color,
    ) -> Self {
        debug_assert_eq!(static_bytes.len() as u64, layout.static_buffer_size());

        let device = ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scatter shader"),
            source: wgpu::ShaderSource::Wgsl(config.shader_source().into()),
        });

        let bindings = config.bindings();
        let entries: Vec<wgpu::BindGroupLayoutEntry> =
            bindings.iter().map(|slot| slot.layout_entry()).collect();

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scatter bgl"),
            entries: &entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scatter pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(config.label()),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: config.primitive(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // Written here and never again.
        let static_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(BindingKind::StaticInstances.label()),
            contents: static_bytes,
            usage: wgpu::BufferUsages::STORAGE,
        });

        let dynamic_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(BindingKind::DynamicInstances.label()),
            size: layout.dynamic_buffer_size(),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let vertex_buffer = config.shape.uses_vertex_storage().then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(BindingKind::Vertices.label()),
                contents: mesh.as_bytes(),
                usage: wgpu::BufferUsages::STORAGE,
            })
        });

        let mut group_entries = Vec::with_capacity(bindings.len());
        for slot in &bindings {
            let buffer = match slot.kind {
                BindingKind::StaticInstances => &static_buffer,
                BindingKind::DynamicInstances => &dynamic_buffer,
                BindingKind::Vertices => match vertex_buffer.as_ref() {
                    Some(b) => b,
                    None => continue,
                },
            };
            group_entries.push(wgpu::BindGroupEntry {
                binding: slot.binding,
                resource: buffer.as_entire_binding(),
            });
        }

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scatter bind group"),
            layout: &bind_group_layout,
            entries: &group_entries,
        });

        log::debug!(
            "renderer ready: {} instances x {} vertices, static {} B, dynamic {} B",
            layout.count(),
            mesh.vertex_count(),
            layout.static_buffer_size(),
            layout.dynamic_buffer_size(),
        );

        Self {
            pipeline,
            bind_group,
            _static_buffer: static_buffer,
            dynamic_buffer,
            _vertex_buffer: vertex_buffer,
            vertex_count: mesh.vertex_count(),
            instance_count: layout.count(),
            clear_color,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[inline]
    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    /// Uploads this frame's dynamic records and records the clear + instanced draw.
    pub fn render_frame(
        &self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        dynamic_bytes: &[u8],
    ) {
        ctx.queue.write_buffer(&self.dynamic_buffer, 0, dynamic_bytes);

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scatter pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.draw(0..self.vertex_count, 0..self.instance_count);
    }
}
