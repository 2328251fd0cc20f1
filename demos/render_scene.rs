//! Render a scene file to an SVG document on stdout.
//!
//! `cargo run --example render_scene --features tracing -- scene.scene`
//! With no argument the built-in demo scene is used. `RUST_LOG=isoworld=debug`
//! shows sort and render passes on stderr.

use isoworld::scene;

const DEMO: &str = "\
viewport 400 600
scale 20
anchor 0.5 0.75
grid 10 10
block 0 0 1 size 1 2 1
block 0 0 2 size 1 2 1
";

const FACE_FILLS: [&str; 3] = ["#e8e8e8", "#b0b0b0", "#cfcfcf"];

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let (name, source) = match std::env::args().nth(1) {
        Some(path) => {
            let source = std::fs::read_to_string(&path)
                .map_err(|e| miette::miette!("failed to read {path}: {e}"))?;
            (path, source)
        }
        None => ("<demo>".to_string(), DEMO.to_string()),
    };

    let desc = scene::parse_named(&name, &source)?;
    let (width, height) = (desc.camera.width, desc.camera.height);
    let world = desc.into_world()?;

    println!(r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">"#);
    for rendered in world.sorted() {
        println!(r#"  <g id="block-{}">"#, rendered.id.0);
        for (face, fill) in rendered.geometry.faces.iter().zip(FACE_FILLS) {
            println!(r#"    <path d="{face}" fill="{fill}"/>"#);
        }
        if !rendered.geometry.edge.is_empty() {
            println!(
                r#"    <path d="{}" fill="none" stroke="black"/>"#,
                rendered.geometry.edge
            );
        }
        println!("  </g>");
    }
    println!("</svg>");

    if !world.forced().is_empty() {
        tracing::warn!(blocks = ?world.forced(), "scene contains occlusion cycles");
    }
    Ok(())
}
