// SPDX-License-Identifier: MIT OR Apache-2.0
//! `nodeweave` - builds a procedural shader graph and prints the result.
//!
//! Usage: `nodeweave [config.ron]`
//!
//! The demo scans the built-in shader kinds of an in-memory host, builds a
//! contrast node group and a noise-driven material that uses it, materializes
//! both, lays them out and prints the material container as RON.

use nodeweave_graph::host::memory::{ContainerId, MemoryLink, MemoryNode};
use nodeweave_graph::kinds::shader::shader_node_kinds;
use nodeweave_graph::{
    BuildError, CatalogBuilder, CatalogError, ConfigError, ConfigurationWarning, EngineConfig, GenerateError,
    Generator, GraphBuilder, GroupInterface, LayoutError, LayoutOptions, MemoryHost, NodeId, NodeLayout,
    SocketType, SocketValue,
};
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const GROUP_NAME: &str = "Contrast";
const MATERIAL_NAME: &str = "Material";

/// Demo failures
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Invalid log filter: {0}")]
    Logging(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("Cannot print container: {0}")]
    Print(#[from] ron::Error),

    #[error("Container vanished: {0:?}")]
    MissingContainer(ContainerId),
}

/// Container contents as printed
#[derive(Serialize)]
struct Snapshot<'h> {
    name: &'h str,
    nodes: Vec<&'h MemoryNode>,
    links: &'h [MemoryLink],
}

fn main() {
    if let Err(e) = run() {
        tracing::error!("nodeweave failed: {e}");
        eprintln!("nodeweave failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("nodeweave_graph=debug".parse()?)
        .add_directive("nodeweave_cli=debug".parse()?);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting nodeweave v{}", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(Path::new(&path))?,
        None => EngineConfig::default(),
    };

    let mut host = MemoryHost::with_kinds(shader_node_kinds());
    let catalog = CatalogBuilder::new(config.catalog.clone()).build(&host)?;
    let generator = Generator::new(config.generator.clone());
    let layout = NodeLayout::new(config.layout.clone());

    // Group body first so instances can bind to it
    let group_builder = GraphBuilder::new(&catalog)?;
    let (group_root, interface) = build_contrast_group(&group_builder)?;
    let group_graph = group_builder.into_graph();
    let group = generator.generate_group(&group_graph, [group_root], &mut host, GROUP_NAME)?;
    report(GROUP_NAME, &group.warnings);
    layout.layout_container(&mut host, group.container, LayoutOptions::default())?;

    let builder = GraphBuilder::new(&catalog)?;
    let root = build_material(&builder, &interface)?;
    let graph = builder.into_graph();
    let material = generator.generate(&graph, [root], &mut host, MATERIAL_NAME, true)?;
    report(MATERIAL_NAME, &material.warnings);
    layout.layout_container(&mut host, material.container, LayoutOptions::default())?;

    println!("{}", print_container(&host, material.container)?);
    Ok(())
}

/// `out = (value - 0.5) * gain + 0.5`
fn build_contrast_group(builder: &GraphBuilder<'_>) -> Result<(NodeId, GroupInterface), BuildError> {
    let input = builder.group_input()?;
    let output = builder.group_output()?;

    let value = input.add_output("Value", SocketType::Value, Some(SocketValue::Float(0.5)), None, None)?;
    let gain = input.add_output(
        "Gain",
        SocketType::Value,
        Some(SocketValue::Float(1.0)),
        Some(0.0),
        Some(10.0),
    )?;
    output.add_input("Value", SocketType::Value, None, None, None)?;
    output.set("value", (value - 0.5) * gain + 0.5)?;

    Ok((output.id(), GroupInterface::from_nodes(input, output)))
}

/// Noise-tinted principled material
fn build_material(builder: &GraphBuilder<'_>, contrast: &GroupInterface) -> Result<NodeId, BuildError> {
    let coords = builder.node("TexCoord")?.output("object")?;
    let noise = builder.node("TexNoise")?;
    noise.set("vector", coords * 4.0)?;
    noise.set("detail", 6.0)?;
    let fac = noise.output("fac")?;

    let sharpened = builder.group(GROUP_NAME, contrast);
    sharpened.set("value", fac)?;
    sharpened.set("gain", 2.5)?;
    let ramp = builder.math_maximum(sharpened, 0.1);

    let tint = builder.node("MixRGB")?;
    tint.set("fac", ramp)?;
    tint.set("color1", [0.05, 0.1, 0.4, 1.0])?;
    tint.set("color2", [0.9, 0.8, 0.6, 1.0])?;

    let bsdf = builder.node("BsdfPrincipled")?;
    bsdf.set("base_color", tint)?;
    bsdf.set("roughness", 1.0 - fac)?;

    let output = builder.node("OutputMaterial")?;
    output.set("surface", bsdf)?;

    builder.frame_all("Tint", "noise-driven base color", [tint.id()])?;
    Ok(output.id())
}

fn report(container: &str, warnings: &[ConfigurationWarning]) {
    if warnings.is_empty() {
        tracing::info!("{} generated cleanly", container);
    } else {
        tracing::info!("{} generated with {} configuration warnings", container, warnings.len());
    }
}

fn print_container(host: &MemoryHost, container: ContainerId) -> Result<String, CliError> {
    let contents = host
        .container(container)
        .ok_or(CliError::MissingContainer(container))?;
    let snapshot = Snapshot {
        name: &contents.name,
        nodes: contents.nodes.iter().filter_map(|id| host.node(*id)).collect(),
        links: &contents.links,
    };
    Ok(ron::ser::to_string_pretty(&snapshot, ron::ser::PrettyConfig::default())?)
}
