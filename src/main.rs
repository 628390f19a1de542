use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Builder;
use log::LevelFilter;

use isr_audit::{
    analyze_file,
    consts::{CYCLES_PER_INSTRUCTION, DEFAULT_CLOCK_HZ, INSTRUCTION_WIDTH, SYMBOL_TYPE_CODES, VECTOR_PREFIX},
    render_report, symbol_report_from_file, write_results, AnalysisReport, AnalyzerConfig,
    BoundaryPolicy, EmptyRoutinePolicy, TimingConfig,
};

/// Interrupt service routine metrics for AVR firmware
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Enable verbose logging (use multiple times for more verbosity)
    #[clap(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report size, registers and push/pop balance of every ISR in an `avr-objdump -d` listing
    Isr {
        /// Path to the disassembly text
        #[clap(short = 'f', long)]
        file: PathBuf,
        /// Routine boundary rule (label-or-blank, label-only)
        #[clap(short, long, default_value = "label-or-blank")]
        boundary: BoundaryPolicy,
        /// Vector labels without instructions (drop, warn)
        #[clap(short, long, default_value = "drop")]
        empty_routines: EmptyRoutinePolicy,
        /// Estimate cycles and execution time per ISR
        #[clap(short = 't', long)]
        timing: bool,
        /// MCU clock in Hz, used with --timing
        #[clap(long, default_value_t = DEFAULT_CLOCK_HZ, value_parser = clap::value_parser!(u64).range(1..))]
        clock_hz: u64,
        /// Flat cycle cost per instruction, used with --timing
        #[clap(long, default_value_t = CYCLES_PER_INSTRUCTION)]
        cycles_per_instruction: u64,
        /// Label prefix of interrupt vectors
        #[clap(long, default_value = VECTOR_PREFIX)]
        vector_prefix: String,
        /// Also write isr_report.txt and isr_report.json to this directory
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// List sized symbols from `avr-nm -S` output, largest first
    Symbols {
        /// Path to the nm output
        #[clap(short = 'f', long)]
        file: PathBuf,
        /// Symbol type letters to keep
        #[clap(long, default_value = SYMBOL_TYPE_CODES)]
        filter: String,
    },
}

fn main() {
    let args = Args::parse();

    let mut builder = Builder::new();
    let log_level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    builder
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let start_time = Instant::now();

    println!();
    println!("{}", "=============================".bright_red().bold());
    println!(
        "{}",
        "         ISR  AUDIT          "
            .bright_white()
            .on_bright_red()
            .bold()
    );
    println!("{}", "=============================".bright_red().bold());
    println!();

    if let Err(e) = run(args.command) {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
        std::process::exit(1);
    }

    let duration = start_time.elapsed();
    println!(
        "\n{} {:.2?}",
        "Total execution time:".bright_yellow().bold(),
        duration
    );
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Isr {
            file,
            boundary,
            empty_routines,
            timing,
            clock_hz,
            cycles_per_instruction,
            vector_prefix,
            output,
        } => {
            let config = AnalyzerConfig {
                boundary,
                empty_routines,
                vector_prefix,
                instruction_width: INSTRUCTION_WIDTH,
                timing: timing.then_some(TimingConfig {
                    clock_hz,
                    cycles_per_instruction,
                }),
            };
            run_isr(&file, config, output.as_deref())
        }
        Command::Symbols { file, filter } => {
            let output = symbol_report_from_file(&file, &filter)
                .with_context(|| format!("failed to read symbols from {}", file.display()))?;
            println!("{}", output);
            Ok(())
        }
    }
}

fn run_isr(file: &Path, config: AnalyzerConfig, output: Option<&Path>) -> Result<()> {
    let report = analyze_file(file, Some(config))
        .with_context(|| format!("failed to analyze {}", file.display()))?;
    let rendered = render_report(&report);

    println!("{}", rendered);
    print_stats(&report);

    if let Some(dir) = output {
        let written = write_results(&report, &rendered, dir)
            .with_context(|| format!("failed to write results to {}", dir.display()))?;

        println!("\n{}", "Results written to:".bright_green().bold());
        for path in written {
            println!("- {}", path.display());
        }
    }

    Ok(())
}

fn print_stats(report: &AnalysisReport) {
    println!(
        "\n{} {}",
        "Lines scanned:".bright_black().bold(),
        report.stats.lines_scanned
    );
    println!(
        "{}",
        format!("Found {} interrupt routines", report.routines.len())
            .bright_green()
            .bold()
    );

    let unbalanced = report.balance_issues().count();
    if unbalanced > 0 {
        println!(
            "{}",
            format!("{} routine(s) with unbalanced push/pop", unbalanced)
                .bright_yellow()
                .italic()
        );
    }
}
