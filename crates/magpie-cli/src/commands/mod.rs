pub mod check;
pub mod parse;
pub mod tables;

use std::io::Read;
use std::path::Path;

use magpie_syntax::{Diagnostics, DiagnosticsPrinter};

/// Reads the source file, treating `-` as stdin.
pub fn load_source(path: &Path) -> Result<(String, String), String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| format!("cannot read stdin: {e}"))?;
        return Ok(("<stdin>".to_string(), text));
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Ok((path.display().to_string(), text))
}

pub fn print_diagnostics(diagnostics: &Diagnostics, source: &str, path: &str, colored: bool) {
    if diagnostics.is_empty() {
        return;
    }
    let rendered = DiagnosticsPrinter::new(diagnostics)
        .source(source)
        .path(path)
        .colored(colored)
        .render();
    eprint!("{rendered}");
}
