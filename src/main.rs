// toyc: lexer and syntax trace for a small C-like teaching language

use std::fs::{self, File};
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser as _, ValueEnum};
use crossterm::style::Stylize;
use miette::{Context, IntoDiagnostic};
use tracing_subscriber::EnvFilter;

use toyc::parser::lexer::{Lexer, Token};
use toyc::parser::trace::{LabelStyle, Production, TraceSink, TraceWriter};

/// Scan and parse a toy-C program, writing one trace line per token and
/// matched production.
#[derive(Debug, clap::Parser)]
#[command(name = "toyc", version, about)]
struct Cli {
    /// Source file to analyze
    #[arg(default_value = "testfile.txt")]
    input: PathBuf,

    /// Where to write the trace ("-" for stdout)
    #[arg(short, long, default_value = "output.txt")]
    output: PathBuf,

    /// Spelling of production labels
    #[arg(long, value_enum, default_value_t = Labels::Course)]
    labels: Labels,

    /// Only scan: write the token lines and skip parsing
    #[arg(long)]
    lex_only: bool,

    /// Highlight production labels when writing to stdout
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Labels {
    /// `<表达式>`
    Course,
    /// `<expression>`
    Plain,
}

impl From<Labels> for LabelStyle {
    fn from(labels: Labels) -> Self {
        match labels {
            Labels::Course => LabelStyle::Course,
            Labels::Plain => LabelStyle::Plain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// Stdout sink that colors production labels.
struct ColoredTrace<W: Write> {
    inner: TraceWriter<W>,
    out: W,
    style: LabelStyle,
}

impl<W: Write> TraceSink for ColoredTrace<W> {
    fn token(&mut self, token: &Token) {
        self.inner.token(token);
    }

    fn production(&mut self, production: Production) {
        let label = production.label(self.style).cyan().bold();
        if writeln!(self.out, "{label}").is_err() {
            tracing::warn!("stdout closed; dropping trace output");
        }
    }
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source = fs::read_to_string(&cli.input)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", cli.input.display()))?;
    tracing::info!(path = %cli.input.display(), bytes = source.len(), "read source");

    let style = LabelStyle::from(cli.labels);
    let to_stdout = cli.output == Path::new("-");

    if to_stdout {
        let colored = match cli.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stdout().is_terminal(),
        };
        let stdout = io::stdout();
        if colored {
            let mut sink = ColoredTrace {
                inner: TraceWriter::with_style(stdout.lock(), style),
                out: stdout.lock(),
                style,
            };
            run(&cli, &source, &mut sink)?;
            sink.inner.finish().into_diagnostic()?;
        } else {
            let mut sink = TraceWriter::with_style(stdout.lock(), style);
            run(&cli, &source, &mut sink)?;
            sink.finish().into_diagnostic()?;
        }
    } else {
        let file = File::create(&cli.output)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to create {}", cli.output.display()))?;
        let mut sink = TraceWriter::with_style(BufWriter::new(file), style);
        let result = run(&cli, &source, &mut sink);
        // Keep the partial trace on disk even when parsing failed.
        let lines = sink.lines_written();
        sink.finish()
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to write {}", cli.output.display()))?;
        result?;
        tracing::info!(lines, path = %cli.output.display(), "wrote trace");
    }

    Ok(())
}

/// Lex (and unless `--lex-only`, parse) `source` into `sink`.
fn run(cli: &Cli, source: &str, sink: &mut dyn TraceSink) -> miette::Result<()> {
    if cli.lex_only {
        for token in Lexer::new(source).take_while(|t| !t.is_eof()) {
            sink.token(&token);
        }
        return Ok(());
    }

    let functions = toyc::analyze(source, sink)?;
    tracing::info!(functions = functions.len(), "parsed program");
    Ok(())
}

fn init_logging(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(verbose))),
        )
        .with_writer(io::stderr)
        .init();
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "toyc=warn",
        1 => "toyc=debug",
        _ => "toyc=trace",
    }
}
