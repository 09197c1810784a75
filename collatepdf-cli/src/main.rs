//! collatepdf - Bundle PDF files into one printable document.

mod cli;

use clap::{CommandFactory, Parser};
use std::path::Path;
use std::process;

use crate::cli::{Cli, Command, MakeIndexArgs, MakePdfArgs};
use collatepdf::collate::Assembler;
use collatepdf::config::{Config, FontSource, Setting};
use collatepdf::error::Result;
use collatepdf::index::{Index, write_index};
use collatepdf::output::{
    OutputFormatter, display_assembly, display_toc, display_write_statistics,
};
use collatepdf::render::Font;
use collatepdf::utils::collect_index_inputs;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let Some(command) = cli.command else {
        let mut cmd = Cli::command();
        if cmd.print_help().is_err() {
            process::exit(1);
        }
        println!();
        return;
    };

    let formatter = OutputFormatter::new(cli.quiet, cli.verbose);
    let result = match command {
        Command::MakeIndex(args) => make_index(&args, &formatter),
        Command::MakePdf(args) => make_pdf(&args, &formatter),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_target(false)
        .format_timestamp(None)
        .init();
}

fn make_index(args: &MakeIndexArgs, formatter: &OutputFormatter) -> Result<()> {
    let destination = args
        .output
        .clone()
        .unwrap_or_else(|| Config::default().index_file);

    let paths: Vec<String> = collect_index_inputs(&args.inputs)?
        .iter()
        .map(|path| path.to_string_lossy().into_owned())
        .collect();
    let listed = write_index(&paths, &destination)?;

    if listed < paths.len() {
        formatter.debug(&format!(
            "Left out {} non-PDF file(s)",
            paths.len() - listed
        ));
    }
    formatter.success(&format!(
        "Wrote {} with {listed} document(s)",
        destination.display()
    ));
    Ok(())
}

/// Defaults, then index directives, then command-line flags.
fn resolve_config(index: &Index, args: &MakePdfArgs, index_path: &Path) -> Result<Config> {
    let mut config = Config::default();
    config.index_file = index_path.to_path_buf();
    config.apply_all(index.settings());

    for assignment in &args.settings {
        config.apply(&Setting::parse_assignment(assignment)?);
    }
    if let Some(output) = &args.output {
        config.output_file = output.clone();
    }
    if let Some(cover) = &args.cover {
        config.cover_file = Some(cover.clone());
    }
    if let Some(font) = &args.font {
        config.font = FontSource::TrueType(std::path::absolute(font)?);
    }
    if let Some(root) = &args.root {
        config.root_dir = Some(root.clone());
    }
    if args.duplex {
        config.duplex = true;
    }

    config.validate()?;
    Ok(config)
}

fn make_pdf(args: &MakePdfArgs, formatter: &OutputFormatter) -> Result<()> {
    let index_path = args
        .index
        .clone()
        .unwrap_or_else(|| Config::default().index_file);
    let index = Index::load(&index_path)?;
    let config = resolve_config(&index, args, &index_path)?;

    if args.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let font = Font::load(&config.font_source())?;
    formatter.debug(&format!("Using font {}", font.base_name()));

    formatter.info(&format!("Collating {}", index_path.display()));
    let assembler = Assembler::new(&config, &font);

    if args.dry_run {
        let assembly = assembler.assemble(&index)?;
        display_assembly(formatter, &assembly);
        display_toc(formatter, &assembly.toc);
        formatter.blank_line();
        formatter.success("Dry run completed");
        formatter.info(&format!(
            "  Output would be: {}",
            config.output_file.display()
        ));
        return Ok(());
    }

    let (assembly, stats) = assembler.run(&index)?;
    display_assembly(formatter, &assembly);
    display_write_statistics(formatter, &stats);
    Ok(())
}
