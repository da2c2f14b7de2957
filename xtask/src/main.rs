use camino::{Utf8Path, Utf8PathBuf};
use quick_xml::escape::escape;
use rayon::prelude::*;
use std::fs;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo xtask <command>");
        eprintln!("Commands:");
        eprintln!("  gallery    Render every demo dial into one HTML page");
        std::process::exit(1);
    }

    match args[1].as_str() {
        "gallery" => gallery(),
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            std::process::exit(1);
        }
    }
}

/// One rendered dial: file name, description source, and either the SVG
/// fragment or the error report
struct Entry {
    name: String,
    source: String,
    result: Result<String, String>,
}

fn gallery() {
    let root = Utf8Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("xtask lives inside the workspace")
        .to_owned();
    let dials_dir = root.join("demos/dials");
    let output_path = root.join("gallery.html");

    let mut paths: Vec<Utf8PathBuf> = fs::read_dir(&dials_dir)
        .expect("Failed to read demos/dials")
        .filter_map(|e| e.ok())
        .filter_map(|e| Utf8PathBuf::from_path_buf(e.path()).ok())
        .filter(|p| p.extension() == Some("dial"))
        .collect();
    paths.sort();

    let entries: Vec<Entry> = paths
        .par_iter()
        .map(|path| {
            let name = path.file_name().unwrap_or_default().to_string();
            eprintln!("Rendering {}...", name);
            let source = fs::read_to_string(path).unwrap_or_default();
            let result = dialmark::dial(&source).map_err(|e| format!("{:?}", e));
            Entry {
                name,
                source,
                result,
            }
        })
        .collect();

    let failed = entries.iter().filter(|e| e.result.is_err()).count();

    let mut html = String::new();
    html.push_str(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>dialmark gallery</title>
    <style>
        body { font-family: system-ui, sans-serif; background: #eee; margin: 24px; }
        .card { display: inline-block; vertical-align: top; background: white; border-radius: 8px;
                box-shadow: 0 1px 3px rgba(0,0,0,0.08); margin: 0 16px 16px 0; padding: 12px; }
        .card h2 { font-size: 14px; margin: 0 0 8px 0; }
        .card pre { font-size: 11px; max-width: 300px; overflow-x: auto; background: #fafafa; }
        .error { color: #b00020; white-space: pre-wrap; }
    </style>
</head>
<body>
"#,
    );
    html.push_str(&format!(
        "<h1>{} dials, {} failed</h1>\n",
        entries.len(),
        failed
    ));

    for entry in &entries {
        html.push_str("<div class=\"card\">\n");
        html.push_str(&format!("<h2>{}</h2>\n", escape(&entry.name)));
        match &entry.result {
            Ok(fragment) => {
                html.push_str(&format!(
                    "<svg height=\"300px\" width=\"300px\"><g transform=\"translate(150, 150) scale(1.4)\">{}</g></svg>\n",
                    fragment
                ));
            }
            Err(report) => {
                html.push_str(&format!(
                    "<pre class=\"error\">{}</pre>\n",
                    escape(report)
                ));
            }
        }
        html.push_str(&format!("<pre>{}</pre>\n", escape(&entry.source)));
        html.push_str("</div>\n");
    }
    html.push_str("</body>\n</html>\n");

    fs::write(&output_path, html).expect("Failed to write gallery");
    eprintln!("Wrote {}", output_path);
    if failed > 0 {
        std::process::exit(1);
    }
}
