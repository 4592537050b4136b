use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use magpie_syntax::Edition;

#[derive(Parser)]
#[command(name = "magpie", bin_name = "magpie")]
#[command(about = "Parser front end for the Magpie language")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a file and print the syntax tree
    #[command(after_help = r#"EXAMPLES:
  magpie parse Main.mg
  magpie parse Main.mg --format json
  magpie parse Main.mg --diet
  magpie parse - < Main.mg"#)]
    Parse {
        #[command(flatten)]
        input: InputArgs,

        /// Output format for the tree
        #[arg(long, value_enum, default_value_t = Format::Debug)]
        format: Format,

        #[command(flatten)]
        options: ParseArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Parse a file and report diagnostics only
    #[command(after_help = r#"EXAMPLES:
  magpie check Main.mg
  magpie check Main.mg --edition classic"#)]
    Check {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        options: ParseArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Build the parse tables and print their statistics
    Tables {
        /// Round-trip the tables through the binary codec
        #[arg(long)]
        verify: bool,
    },
}

#[derive(Args)]
pub struct InputArgs {
    /// Source file, or `-` for stdin
    pub path: PathBuf,
}

#[derive(Args)]
pub struct ParseArgs {
    /// Language edition to accept
    #[arg(long, value_enum, default_value_t = EditionChoice::Latest)]
    pub edition: EditionChoice,

    /// Skip method body interiors
    #[arg(long)]
    pub diet: bool,

    /// Discard broken method bodies instead of repairing them
    #[arg(long)]
    pub no_statement_recovery: bool,
}

impl ParseArgs {
    pub fn to_options(&self) -> magpie_syntax::ParseOptions {
        magpie_syntax::ParseOptions {
            edition: self.edition.into(),
            diet: self.diet,
            statement_recovery: !self.no_statement_recovery,
        }
    }
}

#[derive(Args)]
pub struct OutputArgs {
    /// When to colorize diagnostics
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Format {
    #[default]
    Debug,
    Json,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum EditionChoice {
    Classic,
    Extended,
    #[default]
    Latest,
}

impl From<EditionChoice> for Edition {
    fn from(choice: EditionChoice) -> Self {
        match choice {
            EditionChoice::Classic => Edition::Classic,
            EditionChoice::Extended => Edition::Extended,
            EditionChoice::Latest => Edition::Latest,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn should_colorize(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use clap::Parser;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_flags() {
        let cli = Cli::try_parse_from([
            "magpie", "parse", "Main.mg", "--format", "json", "--diet", "--edition", "classic",
        ])
        .unwrap();
        let Command::Parse {
            input,
            format,
            options,
            ..
        } = cli.command
        else {
            panic!("expected parse subcommand");
        };
        assert_eq!(input.path.to_str(), Some("Main.mg"));
        assert!(matches!(format, Format::Json));
        let options = options.to_options();
        assert_eq!(options.edition, Edition::Classic);
        assert!(options.diet);
        assert!(options.statement_recovery);
    }

    #[test]
    fn stdin_path() {
        let cli = Cli::try_parse_from(["magpie", "check", "-"]).unwrap();
        let Command::Check { input, .. } = cli.command else {
            panic!("expected check subcommand");
        };
        assert_eq!(input.path.to_str(), Some("-"));
    }
}
