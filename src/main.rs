//! pdffixlab - Toolkit for fixing scanned PDFs
//!
//! CLI entry point

use clap::Parser;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use pdffixlab::{
    create_page_progress_bar, create_spinner, Cli, Commands, DeskewArgs, DeskewPipeline, ExitCode,
    PageSkew, PdfOpError, PipelineConfig, PipelineError, ProgressCallback, RenderError,
};

fn main() {
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Deskew(args) => run_deskew(&args),
        Commands::RotateEven { input, output } => run_rotate(&input, &output, None),
        Commands::RotateAll { input, output, deg } => run_rotate(&input, &output, Some(deg)),
        Commands::Merge { output, inputs } => run_merge(&inputs, &output),
    };

    std::process::exit(code.code());
}

// ============ Progress Callback Implementation ============

/// indicatif-backed progress callback for CLI output
struct CliProgress {
    bar: Mutex<Option<indicatif::ProgressBar>>,
    quiet: bool,
}

impl CliProgress {
    fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }
}

impl ProgressCallback for CliProgress {
    fn on_step_start(&self, step: &str, total: usize) {
        if self.quiet {
            return;
        }
        // Page-counted bar for the deskew stage, spinner for the rest.
        let pb = if step == "deskew" {
            create_page_progress_bar(total as u64)
        } else {
            create_spinner(step)
        };
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_page(&self, page: &PageSkew) {
        if self.quiet {
            return;
        }
        if let Ok(slot) = self.bar.lock() {
            if let Some(pb) = slot.as_ref() {
                pb.inc(1);
                if page.corrected {
                    pb.set_message(format!(
                        "page {} corrected by {:.2}°",
                        page.index + 1,
                        page.angle_deg
                    ));
                } else {
                    pb.set_message(format!("page {} straight", page.index + 1));
                }
            }
        }
    }

    fn on_step_complete(&self, step: &str, message: &str) {
        if self.quiet {
            return;
        }
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(pb) = slot.take() {
                pb.finish_with_message(format!("{}: {}", step, message));
                return;
            }
        }
        println!("    {}: {}", step, message);
    }
}

// ============ Deskew Command ============

fn run_deskew(args: &DeskewArgs) -> ExitCode {
    let start_time = Instant::now();

    if !args.input.exists() {
        eprintln!("Error: input PDF not found: {}", args.input.display());
        return ExitCode::InputNotFound;
    }

    let config = PipelineConfig {
        dpi: args.dpi,
        tolerance_deg: args.tolerance,
        threads: args.threads,
    };
    let progress = CliProgress::new(args.quiet);

    match DeskewPipeline::run(&args.input, &args.output, &config, &progress) {
        Ok(reports) => {
            if !args.quiet {
                let corrected = reports.iter().filter(|r| r.corrected).count();
                println!(
                    "Deskewed {} of {} pages in {:.2}s -> {}",
                    corrected,
                    reports.len(),
                    start_time.elapsed().as_secs_f64(),
                    args.output.display()
                );
                if args.verbose > 0 {
                    for report in &reports {
                        println!(
                            "  page {:>4}: {:+.3}°{}",
                            report.index + 1,
                            report.angle_deg,
                            if report.corrected { "" } else { " (kept)" }
                        );
                    }
                }
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            match e {
                PipelineError::InputNotFound(_) => ExitCode::InputNotFound,
                PipelineError::Render(RenderError::ToolMissing)
                | PipelineError::Render(RenderError::ToolFailed(_)) => ExitCode::ExternalToolError,
                PipelineError::Render(RenderError::OutputNotWritable(_)) => ExitCode::OutputError,
                PipelineError::Writer(_) | PipelineError::IoError(_) => ExitCode::OutputError,
                _ => ExitCode::ProcessingError,
            }
        }
    }
}

// ============ Rotate Commands ============

fn run_rotate(input: &Path, output: &Path, degrees: Option<i64>) -> ExitCode {
    let result = match degrees {
        Some(deg) => pdffixlab::rotate_all_pages(input, output, deg),
        None => pdffixlab::rotate_even_pages(input, output),
    };

    match result {
        Ok(()) => {
            println!("Wrote {}", output.display());
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            match e {
                PdfOpError::InvalidRotation(_) => ExitCode::InvalidArgs,
                PdfOpError::FileNotFound(_) => ExitCode::InputNotFound,
                PdfOpError::IoError(_) => ExitCode::OutputError,
                _ => ExitCode::ProcessingError,
            }
        }
    }
}

// ============ Merge Command ============

fn run_merge(inputs: &[std::path::PathBuf], output: &Path) -> ExitCode {
    match pdffixlab::merge_pdfs(inputs, output) {
        Ok(()) => {
            println!("Merged {} inputs into {}", inputs.len(), output.display());
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            match e {
                PdfOpError::NoInputs => ExitCode::InputNotFound,
                PdfOpError::IoError(_) => ExitCode::OutputError,
                _ => ExitCode::ProcessingError,
            }
        }
    }
}
