//! Parse a file and print the tree.

use magpie_syntax::{parse_with, reparse_skipped_bodies};

use crate::cli::{Format, InputArgs, OutputArgs, ParseArgs};

pub struct Params {
    pub input: InputArgs,
    pub format: Format,
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
    let (unit, diagnostics) = match parse_with(&source, &options) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("internal error: {e}");
            std::process::exit(2);
        }
    };

    match params.format {
        Format::Debug => println!("{unit:#?}"),
        Format::Json => match serde_json::to_string_pretty(&unit) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("internal error: {e}");
                std::process::exit(2);
            }
        },
    }

    super::print_diagnostics(
        &diagnostics,
        &source,
        &path,
        params.output.color.should_colorize(),
    );
    if diagnostics.has_errors() {
        std::process::exit(1);
    }
}

/// `check` and tests share the full pipeline: a diet parse still visits
/// every body so diagnostics match a regular parse.
pub fn full_parse(
    source: &str,
    options: &magpie_syntax::ParseOptions,
) -> Result<(magpie_syntax::ast::CompilationUnit, magpie_syntax::Diagnostics), magpie_syntax::Error>
{
    let (mut unit, mut diagnostics) = parse_with(source, options)?;
    if options.diet {
        diagnostics.merge(reparse_skipped_bodies(source, &mut unit, options)?);
    }
    Ok((unit, diagnostics))
}
