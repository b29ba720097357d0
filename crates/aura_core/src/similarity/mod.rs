pub fn l2_norm(v: &[f32]) -> f32 {
    let mut sum = 0.0f32;
    for x in v {
        sum += x * x;
    }
    sum.sqrt()
}

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    let mut sum = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        sum += x * y;
    }
    sum
}

/// Cosine similarity in [-1, 1].
///
/// A zero-magnitude vector on either side yields exactly 0.0. Callers are responsible for
/// matching dimensions; extra trailing components on the longer side are ignored.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let a_norm = l2_norm(a);
    let b_norm = l2_norm(b);
    cosine_similarity_with_norms(a, b, a_norm, b_norm)
}

/// Same as [`cosine_similarity`] with precomputed norms, for the fragment x source loop.
pub fn cosine_similarity_with_norms(a: &[f32], b: &[f32], a_norm: f32, b_norm: f32) -> f32 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    let sim = dot(a, b) / (a_norm * b_norm);
    if sim.is_nan() {
        return 0.0;
    }
    sim.clamp(-1.0, 1.0)
}
