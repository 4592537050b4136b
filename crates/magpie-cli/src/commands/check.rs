//! Report diagnostics without printing the tree.

use crate::cli::{InputArgs, OutputArgs, ParseArgs};

pub struct Params {
    pub input: InputArgs,
    pub options: ParseArgs,
    pub output: OutputArgs,
}

pub fn run(params: Params) {
    let (path, source) = match super::load_source(&params.input.path) {
        Ok(loaded) => loaded,
        Err(msg) => {
            eprintln!("error: {msg}");
            std::process::exit(1);
        }
    };

    let options = params.options.to_options();
    let (_, diagnostics) = match super::parse::full_parse(&source, &options) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("internal error: {e}");
            std::process::exit(2);
        }
    };

    super::print_diagnostics(
        &diagnostics,
        &source,
        &path,
        params.output.color.should_colorize(),
    );
    if diagnostics.has_errors() {
        std::process::exit(1);
    }
    let warnings = diagnostics.warning_count();
    if warnings > 0 {
        eprintln!("{path}: ok ({warnings} warning(s))");
    } else {
        eprintln!("{path}: ok");
    }
}
