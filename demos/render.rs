//! Render a dial description file to a standalone HTML page on stdout.
//!
//! Run with: cargo run --example render --features tracing -- demos/dials/watch.dial

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut enforce = false;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--enforce-occupancy" => enforce = true,
            _ => path = Some(arg),
        }
    }

    let ctx = match path {
        Some(path) => {
            let input = std::fs::read_to_string(&path)
                .map_err(|e| miette::miette!("failed to read {}: {}", path, e))?;
            dialmark::SourceContext::new(path, input)
        }
        None => dialmark::SourceContext::new("dials/watch.dial", include_str!("dials/watch.dial")),
    };

    let options = dialmark::RenderOptions::default().with_occupancy_enforcement(enforce);
    let fragment = dialmark::render_named(&ctx, &options)?;
    println!("{}", dialmark::document(&fragment)?);
    Ok(())
}
