use std::error::Error;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};

use mdconvert::pandoc::Pandoc;
use mdconvert::{ConversionOptions, ConversionWarning, OutputFormat};

/// Convert Markdown documents to docx, pdf, html, odt, rtf, tex or epub via pandoc.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Markdown files, or a single folder of Markdown files.
    #[arg()]
    inputs: Vec<PathBuf>,

    /// Output file. A folder when converting a folder or several files.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Target format (docx, pdf, html, odt, rtf, tex, epub). Defaults to the
    /// output file's extension, then docx.
    #[arg(short = 't', long = "to", value_name = "FMT")]
    format: Option<OutputFormat>,

    /// Combine all inputs into the single document named by --output.
    #[arg(long)]
    combine: bool,

    /// pandoc executable to run (default: $MDCONVERT_PANDOC, then pandoc).
    #[arg(long, value_name = "PATH")]
    pandoc: Option<PathBuf>,

    /// Do not insert page breaks between combined files.
    #[arg(long)]
    no_page_breaks: bool,

    /// Do not add a heading naming each combined file.
    #[arg(long)]
    no_file_headings: bool,

    /// Print the normalized Markdown instead of converting it. Reads stdin
    /// when no inputs are given.
    #[arg(long)]
    normalize_only: bool,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match verbose {
        0 => "mdconvert=warn",
        1 => "mdconvert=info",
        2 => "mdconvert=debug",
        _ => "mdconvert=trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Render an error with its chain of sources.
fn describe(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    message
}

fn print_warnings(warnings: &[ConversionWarning]) {
    for w in warnings {
        let loc = w
            .location
            .as_deref()
            .map(|l| format!(" ({l})"))
            .unwrap_or_default();
        eprintln!("warning: [{:?}] {}{}", w.code, w.message, loc);
    }
}

fn usage_error(message: &str) -> ExitCode {
    eprintln!("error: {message}");
    ExitCode::from(2)
}

fn build_options(cli: &Cli) -> Result<ConversionOptions, ExitCode> {
    let single_target = cli.combine || (cli.inputs.len() == 1 && !cli.inputs[0].is_dir());
    let format = match (cli.format, &cli.output) {
        (Some(format), _) => format,
        (None, Some(out)) if single_target && out.extension().is_some() => {
            OutputFormat::from_path(out).map_err(|e| {
                eprintln!("error: {e} (use --to to choose a format)");
                ExitCode::from(2)
            })?
        }
        _ => OutputFormat::default(),
    };

    Ok(ConversionOptions {
        format,
        page_breaks: !cli.no_page_breaks,
        file_headings: !cli.no_file_headings,
        ..Default::default()
    })
}

fn engine(cli: &Cli) -> Pandoc {
    let pandoc = match &cli.pandoc {
        Some(program) => Pandoc::with_program(program),
        None => Pandoc::from_env(),
    };
    if cli.verbose > 0 {
        match pandoc.version() {
            Ok(version) => tracing::info!(program = %pandoc.program().display(), %version, "using engine"),
            Err(e) => tracing::warn!(program = %pandoc.program().display(), error = %e, "engine not usable"),
        }
    }
    pandoc
}

fn run_normalize_only(cli: &Cli) -> Result<ExitCode, ExitCode> {
    let mut output_buf = String::new();
    let mut had_error = false;

    if cli.inputs.is_empty() {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data).map_err(|e| {
            eprintln!("error: stdin: {e}");
            ExitCode::from(1)
        })?;
        let (text, warning) = mdconvert::detection::decode_text(&data);
        print_warnings(warning.as_slice());
        output_buf.push_str(&mdconvert::normalize(&text));
    } else {
        let multiple = cli.inputs.len() > 1;

        for (i, path) in cli.inputs.iter().enumerate() {
            if multiple && i > 0 {
                output_buf.push('\n');
            }
            if multiple {
                output_buf.push_str(&format!("<!-- source: {} -->\n\n", path.display()));
            }

            let data = match std::fs::read(path) {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("error: {}: {e}", path.display());
                    had_error = true;
                    continue;
                }
            };
            let (text, warning) = mdconvert::detection::decode_text(&data);
            print_warnings(warning.as_slice());
            output_buf.push_str(&mdconvert::normalize(&text));
        }
    }

    if let Some(ref out_path) = cli.output {
        std::fs::write(out_path, &output_buf).map_err(|e| {
            eprintln!("error: {}: {e}", out_path.display());
            ExitCode::from(1)
        })?;
    } else {
        io::stdout().write_all(output_buf.as_bytes()).map_err(|e| {
            eprintln!("error: stdout: {e}");
            ExitCode::from(1)
        })?;
    }

    if had_error {
        Err(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run_combine(cli: &Cli, options: &ConversionOptions) -> Result<ExitCode, ExitCode> {
    let output = cli
        .output
        .as_deref()
        .ok_or_else(|| usage_error("--combine requires --output"))?;
    let engine = engine(cli);

    eprintln!(
        "Combining {} files into {}",
        cli.inputs.len(),
        output.display()
    );
    match mdconvert::combine_files(&cli.inputs, output, options, &engine) {
        Ok(result) => {
            print_warnings(&result.warnings);
            eprintln!("converted: {}", result.output.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("error: {}: {}", output.display(), describe(&e));
            Err(ExitCode::from(1))
        }
    }
}

fn run_folder(cli: &Cli, dir: &Path, options: &ConversionOptions) -> Result<ExitCode, ExitCode> {
    let engine = engine(cli);

    let report = mdconvert::convert_folder(dir, cli.output.as_deref(), options, &engine)
        .map_err(|e| {
            eprintln!("error: {}: {}", dir.display(), describe(&e));
            ExitCode::from(1)
        })?;

    print_warnings(&report.warnings);
    for result in &report.converted {
        print_warnings(&result.warnings);
    }
    eprintln!(
        "Converted {} files to {} format",
        report.success_count(),
        options.format.extension().to_ascii_uppercase()
    );
    if report.error_count() > 0 {
        eprintln!("Encountered {} errors:", report.error_count());
        for failure in &report.failures {
            eprintln!("error: {}: {}", failure.path.display(), describe(&failure.error));
        }
        return Err(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

/// Output path for each input. With several inputs `-o` names a folder, and
/// two inputs landing on the same output file is a usage error.
fn plan_outputs(
    cli: &Cli,
    options: &ConversionOptions,
) -> Result<Vec<(PathBuf, Option<PathBuf>)>, ExitCode> {
    let multiple = cli.inputs.len() > 1;
    let mut planned: Vec<(PathBuf, Option<PathBuf>)> = Vec::with_capacity(cli.inputs.len());
    let mut targets: Vec<PathBuf> = Vec::with_capacity(cli.inputs.len());

    for path in &cli.inputs {
        let output = match (&cli.output, multiple) {
            (Some(dir), true) => path
                .file_name()
                .map(|name| dir.join(name).with_extension(options.format.extension())),
            (Some(file), false) => Some(file.clone()),
            (None, _) => None,
        };
        let target = output
            .clone()
            .unwrap_or_else(|| mdconvert::detection::default_output_path(path, options.format));
        if let Some(i) = targets.iter().position(|t| *t == target) {
            return Err(usage_error(&format!(
                "{} and {} would both be written to {}",
                planned[i].0.display(),
                path.display(),
                target.display()
            )));
        }
        targets.push(target);
        planned.push((path.clone(), output));
    }
    Ok(planned)
}

fn run_files(cli: &Cli, options: &ConversionOptions) -> Result<ExitCode, ExitCode> {
    let planned = plan_outputs(cli, options)?;
    let engine = engine(cli);
    let mut had_error = false;

    for (path, output) in &planned {
        match mdconvert::convert_file(path, output.as_deref(), options, &engine) {
            Ok(result) => {
                print_warnings(&result.warnings);
                eprintln!("converted: {} -> {}", path.display(), result.output.display());
            }
            Err(e) => {
                eprintln!("error: {}: {}", path.display(), describe(&e));
                had_error = true;
            }
        }
    }

    if had_error {
        Err(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run(cli: Cli) -> Result<ExitCode, ExitCode> {
    if cli.normalize_only {
        return run_normalize_only(&cli);
    }
    if cli.inputs.is_empty() {
        return Err(usage_error("no input files given"));
    }

    let options = build_options(&cli)?;

    if cli.combine {
        return run_combine(&cli, &options);
    }
    if let [dir] = cli.inputs.as_slice()
        && dir.is_dir()
    {
        return run_folder(&cli, dir, &options);
    }
    run_files(&cli, &options)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli) {
        Ok(code) => code,
        Err(code) => code,
    }
}
