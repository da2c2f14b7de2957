//! Data-driven tests over `tests/dials`
//!
//! Every file under `valid/` must render, re-render byte-identically, and
//! produce well-formed numbers. Every file under `invalid/` must fail with
//! a diagnostic code.

use camino::Utf8Path;
use miette::Diagnostic;

fn render_valid_dial(path: &Utf8Path) -> datatest_stable::Result<()> {
    let source = std::fs::read_to_string(path)?;

    let first = dialmark::render(&source).map_err(|e| format!("{}: {:?}", path, miette::Report::new(e)))?;
    let second = dialmark::render(&source)?;
    assert_eq!(first, second, "{}: rendering is not deterministic", path);

    assert!(!first.is_empty(), "{}: nothing was drawn", path);
    for bad in ["NaN", "inf", "=\"-0\"", "e-"] {
        assert!(!first.contains(bad), "{}: output contains {:?}:\n{}", path, bad, first);
    }

    // Every fragment is a closed element
    let opened = first.matches('<').count();
    let closed = first.matches('>').count();
    assert_eq!(opened, closed, "{}: unbalanced markup", path);

    Ok(())
}

fn reject_invalid_dial(path: &Utf8Path) -> datatest_stable::Result<()> {
    let source = std::fs::read_to_string(path)?;

    let Err(err) = dialmark::render(&source) else {
        return Err(format!("{}: expected an error", path).into());
    };
    let code = err.code().map(|c| c.to_string()).unwrap_or_default();
    assert!(
        code.starts_with("dialmark::"),
        "{}: missing diagnostic code on {:?}",
        path,
        err
    );
    Ok(())
}

datatest_stable::harness! {
    { test = render_valid_dial, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/dials/valid"), pattern = r"\.dial$" },
    { test = reject_invalid_dial, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/dials/invalid"), pattern = r"\.dial$" },
}
