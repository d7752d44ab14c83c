/// Maps legacy primitive modes onto the topologies wgpu can draw.
///
/// Fans, polygons, quads and quad strips become triangle lists; line loops
/// become a line strip closed by repeating the first vertex.
use glbridge_core::gl::PrimitiveMode;
use wgpu::PrimitiveTopology;

/// Topology a mode is drawn with after conversion.
pub fn topology_for(mode: PrimitiveMode) -> PrimitiveTopology {
    match mode {
        PrimitiveMode::Points => PrimitiveTopology::PointList,
        PrimitiveMode::Lines => PrimitiveTopology::LineList,
        PrimitiveMode::LineStrip | PrimitiveMode::LineLoop => PrimitiveTopology::LineStrip,
        PrimitiveMode::TriangleStrip => PrimitiveTopology::TriangleStrip,
        PrimitiveMode::Triangles
        | PrimitiveMode::TriangleFan
        | PrimitiveMode::Quads
        | PrimitiveMode::QuadStrip
        | PrimitiveMode::Polygon => PrimitiveTopology::TriangleList,
    }
}

pub fn is_strip(topology: PrimitiveTopology) -> bool {
    matches!(
        topology,
        PrimitiveTopology::LineStrip | PrimitiveTopology::TriangleStrip
    )
}

/// Rewrite `indices` (in legacy `mode` order) into `out` for
/// [`topology_for`]`(mode)`. `out` is cleared first.
pub fn expand_indices(mode: PrimitiveMode, indices: &[u32], out: &mut Vec<u32>) -> PrimitiveTopology {
    out.clear();
    match mode {
        PrimitiveMode::TriangleFan | PrimitiveMode::Polygon => convert_fan(indices, out),
        PrimitiveMode::Quads => convert_quads(indices, out),
        PrimitiveMode::QuadStrip => convert_quad_strip(indices, out),
        PrimitiveMode::LineLoop => close_line_loop(indices, out),
        _ => out.extend_from_slice(indices),
    }
    topology_for(mode)
}

/// Sequential indices `0..count`, for non-indexed draws.
pub fn sequential(count: usize, out: &mut Vec<u32>) {
    out.clear();
    out.extend(0..count as u32);
}

/// Fan with center V0: V0V1V2, V0V2V3, ...
fn convert_fan(indices: &[u32], out: &mut Vec<u32>) {
    if indices.len() < 3 {
        return;
    }
    let center = indices[0];
    for pair in indices[1..].windows(2) {
        out.extend_from_slice(&[center, pair[0], pair[1]]);
    }
}

/// Quad ABCD → triangles ABC + ACD. A trailing partial quad is dropped.
fn convert_quads(indices: &[u32], out: &mut Vec<u32>) {
    for q in indices.chunks_exact(4) {
        let (a, b, c, d) = (q[0], q[1], q[2], q[3]);
        out.extend_from_slice(&[a, b, c, a, c, d]);
    }
}

/// Strip pair (2i, 2i+1) joined with (2i+2, 2i+3) forms quad
/// 2i, 2i+1, 2i+3, 2i+2.
fn convert_quad_strip(indices: &[u32], out: &mut Vec<u32>) {
    let mut i = 0;
    while i + 3 < indices.len() {
        let (a, b, c, d) = (indices[i], indices[i + 1], indices[i + 3], indices[i + 2]);
        out.extend_from_slice(&[a, b, c, a, c, d]);
        i += 2;
    }
}

fn close_line_loop(indices: &[u32], out: &mut Vec<u32>) {
    if indices.len() < 2 {
        return;
    }
    out.extend_from_slice(indices);
    out.push(indices[0]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_to_triangles() {
        let mut out = Vec::new();
        let topo = expand_indices(PrimitiveMode::TriangleFan, &[0, 1, 2, 3, 4], &mut out);
        assert_eq!(topo, PrimitiveTopology::TriangleList);
        assert_eq!(out, vec![0, 1, 2, 0, 2, 3, 0, 3, 4]);
    }

    #[test]
    fn test_quads_drop_partial() {
        let mut out = Vec::new();
        expand_indices(PrimitiveMode::Quads, &[0, 1, 2, 3, 4, 5], &mut out);
        assert_eq!(out, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_quad_strip() {
        let mut out = Vec::new();
        expand_indices(PrimitiveMode::QuadStrip, &[0, 1, 2, 3, 4, 5], &mut out);
        assert_eq!(out, vec![0, 1, 3, 0, 3, 2, 2, 3, 5, 2, 5, 4]);
    }

    #[test]
    fn test_line_loop_closes() {
        let mut out = Vec::new();
        let topo = expand_indices(PrimitiveMode::LineLoop, &[4, 5, 6], &mut out);
        assert_eq!(topo, PrimitiveTopology::LineStrip);
        assert_eq!(out, vec![4, 5, 6, 4]);
    }

    #[test]
    fn test_degenerate_inputs_are_empty() {
        let mut out = vec![9];
        expand_indices(PrimitiveMode::Polygon, &[0, 1], &mut out);
        assert!(out.is_empty());
        expand_indices(PrimitiveMode::LineLoop, &[0], &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_native_modes_pass_through() {
        let mut out = Vec::new();
        let topo = expand_indices(PrimitiveMode::TriangleStrip, &[3, 1, 2, 0], &mut out);
        assert_eq!(topo, PrimitiveTopology::TriangleStrip);
        assert!(is_strip(topo));
        assert_eq!(out, vec![3, 1, 2, 0]);
    }
}
