// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader node kinds.
//!
//! Raw descriptions of the native shader nodes the in-memory host offers.
//! Socket layouts follow the host's shader node API, including duplicate
//! identifiers (the three `Value` inputs of `ShaderNodeMath`) that the
//! catalog later disambiguates.

use crate::host::{RawNodeKind, RawSocket};
use crate::kinds::{FRAME_KIND, GROUP_INPUT_KIND, GROUP_KIND, GROUP_OUTPUT_KIND, NODE_TREE_FIELD};
use crate::port::SocketValue;

fn kind(
    name: &str,
    inputs: Vec<RawSocket>,
    outputs: Vec<RawSocket>,
    fields: &[(&str, SocketValue)],
) -> RawNodeKind {
    let mut kind = RawNodeKind::new(name);
    kind.inputs = inputs;
    kind.outputs = outputs;
    kind.fields = fields
        .iter()
        .map(|(field, value)| (field.to_string(), value.clone()))
        .collect();
    kind
}

fn value(identifier: &str, default: f32) -> RawSocket {
    RawSocket::new(identifier, "VALUE").with_default(default)
}

fn vector(identifier: &str) -> RawSocket {
    RawSocket::new(identifier, "VECTOR").with_default([0.0, 0.0, 0.0])
}

fn color(identifier: &str, rgba: [f32; 4]) -> RawSocket {
    RawSocket::new(identifier, "RGBA").with_default(rgba)
}

fn shader(identifier: &str) -> RawSocket {
    RawSocket::new(identifier, "SHADER")
}

/// All shader node kinds offered by the in-memory host
pub fn shader_node_kinds() -> Vec<RawNodeKind> {
    let mut kinds = Vec::new();

    // ========================================================================
    // Math
    // ========================================================================

    kinds.push(kind(
        "ShaderNodeMath",
        vec![value("Value", 0.5), value("Value", 0.5), value("Value", 0.5)],
        vec![RawSocket::new("Value", "VALUE")],
        &[
            ("operation", SocketValue::from("ADD")),
            ("use_clamp", SocketValue::Bool(false)),
        ],
    ));

    kinds.push(kind(
        "ShaderNodeVectorMath",
        vec![vector("Vector"), vector("Vector"), vector("Vector"), value("Scale", 1.0)],
        vec![RawSocket::new("Vector", "VECTOR"), RawSocket::new("Value", "VALUE")],
        &[("operation", SocketValue::from("ADD"))],
    ));

    kinds.push(kind(
        "ShaderNodeMapRange",
        vec![
            value("Value", 1.0),
            value("From Min", 0.0),
            value("From Max", 1.0),
            value("To Min", 0.0),
            value("To Max", 1.0),
            value("Steps", 4.0),
        ],
        vec![RawSocket::new("Result", "VALUE")],
        &[
            ("interpolation_type", SocketValue::from("LINEAR")),
            ("clamp", SocketValue::Bool(true)),
        ],
    ));

    // ========================================================================
    // Constants & Converters
    // ========================================================================

    kinds.push(kind(
        "ShaderNodeValue",
        vec![],
        vec![value("Value", 0.5)],
        &[],
    ));

    kinds.push(kind(
        "ShaderNodeRGB",
        vec![],
        vec![color("Color", [0.5, 0.5, 0.5, 1.0])],
        &[],
    ));

    kinds.push(kind(
        "ShaderNodeCombineXYZ",
        vec![value("X", 0.0), value("Y", 0.0), value("Z", 0.0)],
        vec![RawSocket::new("Vector", "VECTOR")],
        &[],
    ));

    kinds.push(kind(
        "ShaderNodeSeparateXYZ",
        vec![vector("Vector")],
        vec![
            RawSocket::new("X", "VALUE"),
            RawSocket::new("Y", "VALUE"),
            RawSocket::new("Z", "VALUE"),
        ],
        &[],
    ));

    kinds.push(kind(
        "ShaderNodeCombineRGB",
        vec![value("R", 0.0), value("G", 0.0), value("B", 0.0)],
        vec![RawSocket::new("Image", "RGBA")],
        &[],
    ));

    kinds.push(kind(
        "ShaderNodeCombineHSV",
        vec![value("H", 0.0), value("S", 0.0), value("V", 0.0)],
        vec![RawSocket::new("Color", "RGBA")],
        &[],
    ));

    // ========================================================================
    // Inputs & Textures
    // ========================================================================

    kinds.push(kind(
        "ShaderNodeTexCoord",
        vec![],
        ["Generated", "Normal", "UV", "Object", "Camera", "Window", "Reflection"]
            .into_iter()
            .map(|name| RawSocket::new(name, "VECTOR"))
            .collect(),
        &[("from_instancer", SocketValue::Bool(false))],
    ));

    kinds.push(kind(
        "ShaderNodeFresnel",
        vec![value("IOR", 1.45).with_range(0.0, 1000.0), vector("Normal")],
        vec![RawSocket::new("Fac", "VALUE")],
        &[],
    ));

    kinds.push(kind(
        "ShaderNodeTexNoise",
        vec![
            vector("Vector"),
            value("Scale", 5.0),
            value("Detail", 2.0).with_range(0.0, 15.0),
            value("Roughness", 0.5).with_range(0.0, 1.0),
            value("Distortion", 0.0),
        ],
        vec![RawSocket::new("Fac", "VALUE"), RawSocket::new("Color", "RGBA")],
        &[("noise_dimensions", SocketValue::from("3D"))],
    ));

    kinds.push(kind(
        "ShaderNodeMixRGB",
        vec![
            value("Fac", 0.5).with_range(0.0, 1.0),
            color("Color1", [0.5, 0.5, 0.5, 1.0]),
            color("Color2", [0.5, 0.5, 0.5, 1.0]),
        ],
        vec![RawSocket::new("Color", "RGBA")],
        &[
            ("blend_type", SocketValue::from("MIX")),
            ("use_clamp", SocketValue::Bool(false)),
        ],
    ));

    // ========================================================================
    // Shaders & Output
    // ========================================================================

    kinds.push(kind(
        "ShaderNodeBsdfPrincipled",
        vec![
            color("Base Color", [0.8, 0.8, 0.8, 1.0]),
            value("Metallic", 0.0).with_range(0.0, 1.0),
            value("Roughness", 0.5).with_range(0.0, 1.0),
            value("IOR", 1.45),
            value("Alpha", 1.0).with_range(0.0, 1.0),
            vector("Normal"),
        ],
        vec![shader("BSDF")],
        &[
            ("distribution", SocketValue::from("GGX")),
            ("subsurface_method", SocketValue::from("RANDOM_WALK")),
        ],
    ));

    kinds.push(kind(
        "ShaderNodeEmission",
        vec![color("Color", [1.0, 1.0, 1.0, 1.0]), value("Strength", 1.0)],
        vec![shader("Emission")],
        &[],
    ));

    kinds.push(kind(
        "ShaderNodeOutputMaterial",
        vec![shader("Surface"), shader("Volume"), vector("Displacement")],
        vec![],
        &[
            ("target", SocketValue::from("ALL")),
            ("is_active_output", SocketValue::Bool(true)),
        ],
    ));

    // ========================================================================
    // Groups & Layout
    // ========================================================================

    kinds.push(kind(GROUP_INPUT_KIND, vec![], vec![], &[]));
    kinds.push(kind(GROUP_OUTPUT_KIND, vec![], vec![], &[]));
    kinds.push(kind(
        GROUP_KIND,
        vec![],
        vec![],
        &[(NODE_TREE_FIELD, SocketValue::from(""))],
    ));
    kinds.push(kind(
        FRAME_KIND,
        vec![],
        vec![],
        &[
            ("text", SocketValue::from("")),
            ("label_size", SocketValue::Int(20)),
            ("shrink", SocketValue::Bool(true)),
        ],
    ));

    kinds
}
