//! vitae CLI - resume and cover letter rendering tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use vitae::{
    import_file, templates, CoverLetterDocument, ExportArtifact, ExportFormat, ExportOptions,
    ExporterRegistry, ImportOptions, ImportOutcome, PageSize, RenderOptions, ResumeDocument,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "vitae")]
#[command(author = "vitae contributors")]
#[command(version)]
#[command(about = "Render resumes and cover letters to PDF, DOCX, HTML and JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a resume JSON file
    Export {
        /// Resume JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Export a cover letter JSON file
    #[command(alias = "letter")]
    CoverLetter {
        /// Cover letter JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Resume JSON whose personal info fills the letterhead
        #[arg(long, value_name = "FILE")]
        resume: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Import a resume from JSON, text, Markdown or PDF
    Import {
        /// File to import
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Write the result as JSON to this file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Minimum characters a PDF must yield to count as text-based
        #[arg(long, default_value_t = vitae::import::DEFAULT_MIN_TEXT_CHARS)]
        min_text_chars: usize,
    },

    /// List built-in templates
    Templates,

    /// Show version information
    Version,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pdf")]
    format: FormatArg,

    /// Template id (overrides the document's own template)
    #[arg(short, long, env = "VITAE_TEMPLATE")]
    template: Option<String>,

    /// Version label appended to output filenames
    #[arg(long, value_name = "LABEL")]
    label: Option<String>,

    /// Page size for PDF and DOCX
    #[arg(long, value_enum, default_value = "letter")]
    page_size: PageSizeArg,

    /// Output directory
    #[arg(short, long, value_name = "DIR", env = "VITAE_OUTPUT_DIR")]
    output: Option<PathBuf>,
}

impl RenderArgs {
    fn export_options(&self) -> ExportOptions {
        let mut render = RenderOptions::new().with_page_size(self.page_size.into());
        if let Some(ref template) = self.template {
            render = render.with_template(template);
        }
        let mut options = ExportOptions::new().with_render_options(render);
        if let Some(ref label) = self.label {
            options = options.with_version(label);
        }
        options
    }

    fn output_dir(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Pdf,
    Docx,
    Html,
    Json,
    Text,
    /// Every format
    All,
}

impl FormatArg {
    fn formats(self) -> Vec<ExportFormat> {
        match self {
            FormatArg::Pdf => vec![ExportFormat::Pdf],
            FormatArg::Docx => vec![ExportFormat::Docx],
            FormatArg::Html => vec![ExportFormat::Html],
            FormatArg::Json => vec![ExportFormat::Json],
            FormatArg::Text => vec![ExportFormat::Text],
            FormatArg::All => ExportFormat::ALL.to_vec(),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PageSizeArg {
    /// US Letter (8.5 x 11 in)
    Letter,
    /// ISO A4
    A4,
}

impl From<PageSizeArg> for PageSize {
    fn from(size: PageSizeArg) -> Self {
        match size {
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::A4 => PageSize::A4,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export { input, render } => cmd_export(&input, &render),
        Commands::CoverLetter {
            input,
            resume,
            render,
        } => cmd_cover_letter(&input, resume.as_deref(), &render),
        Commands::Import {
            input,
            output,
            min_text_chars,
        } => cmd_import(&input, output.as_deref(), min_text_chars),
        Commands::Templates => {
            cmd_templates();
            Ok(())
        }
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        let message = match e.downcast_ref::<vitae::Error>() {
            Some(err) => err.user_message(),
            None => e.to_string(),
        };
        eprintln!("{}: {}", "Error".red().bold(), message);
        log::debug!("{:?}", e);
        std::process::exit(1);
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> CliResult<T> {
    let text = fs::read_to_string(path)?;
    let value = serde_json::from_str(&text).map_err(vitae::Error::from)?;
    Ok(value)
}

fn progress(len: u64) -> CliResult<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn write_artifacts(artifacts: &[ExportArtifact], dir: &Path, pb: &ProgressBar) -> CliResult<()> {
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        pb.set_message(format!("Writing {}...", artifact.filename));
        written.push(artifact.write_to_dir(dir)?);
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    for (i, path) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), path.display());
    }
    Ok(())
}

fn cmd_export(input: &Path, args: &RenderArgs) -> CliResult<()> {
    let formats = args.format.formats();
    let pb = progress(formats.len() as u64 + 1)?;

    pb.set_message("Reading resume...");
    let resume: ResumeDocument = read_json(input)?;
    pb.inc(1);

    pb.set_message("Rendering...");
    let registry = ExporterRegistry::with_defaults();
    let artifacts = registry.export_all(&resume, &formats, &args.export_options())?;

    write_artifacts(&artifacts, &args.output_dir(), &pb)
}

fn cmd_cover_letter(input: &Path, resume: Option<&Path>, args: &RenderArgs) -> CliResult<()> {
    let formats = args.format.formats();
    let pb = progress(formats.len() as u64 + 1)?;

    pb.set_message("Reading cover letter...");
    let letter: CoverLetterDocument = read_json(input)?;
    let mut options = args.export_options();
    if let Some(path) = resume {
        let resume: ResumeDocument = read_json(path)?;
        options = options.with_sender(resume.personal_info);
    }
    pb.inc(1);

    pb.set_message("Rendering...");
    let registry = ExporterRegistry::with_defaults();
    let artifacts = registry.export_cover_letter_all(&letter, &formats, &options)?;

    write_artifacts(&artifacts, &args.output_dir(), &pb)
}

fn cmd_import(input: &Path, output: Option<&Path>, min_text_chars: usize) -> CliResult<()> {
    let options = ImportOptions::new().with_min_text_chars(min_text_chars);
    let outcome = import_file(input, &options)?;

    let json = match &outcome {
        ImportOutcome::Resume(resume) => {
            eprintln!(
                "{} {}",
                "Loaded resume".green(),
                resume.full_name().unwrap_or("(no name)")
            );
            vitae::export_json(resume)?
        }
        ImportOutcome::Sections(drafts) => {
            eprintln!("{}", "Extracted sections".cyan().bold());
            eprintln!("{}", "─".repeat(40).dimmed());
            for draft in drafts {
                let status = if draft.is_empty() {
                    "empty".dimmed()
                } else if draft.accepted {
                    "accepted".green()
                } else {
                    "needs review".yellow()
                };
                eprintln!(
                    "{:<12} {:>6} chars  {}",
                    draft.title().bold(),
                    draft.content.chars().count(),
                    status
                );
            }
            serde_json::to_string_pretty(&outcome)?
        }
    };

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_templates() {
    println!("{}", "Templates".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for template in templates() {
        println!(
            "{:<14} {:<14} {}",
            template.id.bold(),
            template.layout.as_str(),
            template.name.dimmed()
        );
    }
}

fn cmd_version() {
    println!("{} {}", "vitae".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Resume and cover letter rendering tool");
    println!();
    println!("Library: vitae {}", vitae::VERSION);
    println!("License: MIT");
}
