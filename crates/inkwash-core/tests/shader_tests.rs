// The WGSL stages duplicate a handful of tuning constants from `constants.rs`.
// Keep them from drifting apart.

use inkwash_core::*;

fn has_f32(src: &str, name: &str, value: f32) -> bool {
    src.contains(&format!("const {name}: f32 = {value:?};"))
}

#[test]
fn every_stage_has_fullscreen_vertex_entry() {
    for (src, frag) in [
        (SOURCE_WGSL, "fn fs_source("),
        (PAINTERLY_WGSL, "fn fs_painterly("),
        (ENHANCE_WGSL, "fn fs_enhance("),
    ] {
        assert!(src.contains("fn vs_fullscreen("));
        assert!(src.contains(frag), "missing {frag}");
    }
}

#[test]
fn source_constants_match() {
    assert!(has_f32(SOURCE_WGSL, "WASH_FEATHER", WASH_FEATHER));
    assert!(has_f32(SOURCE_WGSL, "WASH_SWEEP_START", WASH_SWEEP_START));
    assert!(has_f32(SOURCE_WGSL, "WASH_SWEEP_END", WASH_SWEEP_END));
    assert!(has_f32(SOURCE_WGSL, "WASH_NOISE_AMPLITUDE", WASH_NOISE_AMPLITUDE));
    assert!(has_f32(SOURCE_WGSL, "PROCEDURAL_CELLS", PROCEDURAL_CELLS));
    assert!(SOURCE_WGSL.contains(&format!(
        "const WASH_NOISE_OCTAVES: i32 = {};",
        WASH_NOISE_OCTAVES
    )));
}

#[test]
fn painterly_constants_match() {
    assert!(has_f32(PAINTERLY_WGSL, "REFRACTION_STRENGTH", REFRACTION_STRENGTH));
    assert!(has_f32(PAINTERLY_WGSL, "EDGE_SHADOW_STRENGTH", EDGE_SHADOW_STRENGTH));
    assert!(has_f32(PAINTERLY_WGSL, "EDGE_SHADOW_BAND", EDGE_SHADOW_BAND));
    assert!(has_f32(PAINTERLY_WGSL, "GRADIENT_GAIN", GRADIENT_GAIN));
}

#[test]
fn enhance_constants_match() {
    assert!(has_f32(ENHANCE_WGSL, "REVEAL_SOFTNESS", REVEAL_SOFTNESS));
    assert!(has_f32(ENHANCE_WGSL, "GRAIN_MIX", GRAIN_MIX));
    assert!(has_f32(ENHANCE_WGSL, "VIGNETTE_INNER", VIGNETTE_INNER));
    assert!(has_f32(ENHANCE_WGSL, "VIGNETTE_OUTER", VIGNETTE_OUTER));
}

#[test]
fn luma_weights_match() {
    let luma = format!(
        "vec3<f32>({:?}, {:?}, {:?})",
        LUMA_WEIGHTS[0], LUMA_WEIGHTS[1], LUMA_WEIGHTS[2]
    );
    assert!(PAINTERLY_WGSL.contains(&luma));
    assert!(ENHANCE_WGSL.contains(&luma));
}
