//! Flotilla - Multi-Repository Workspace Tool
//!
//! Main entry point for the Flotilla CLI.

use clap::{Parser, Subcommand};
use flotilla::manifest::{resolve_workspace_default, ResolvedManifest};
use std::path::PathBuf;
use std::process;

/// Flotilla - resolve and inspect multi-repository workspace manifests
#[derive(Parser, Debug)]
#[command(name = "flotilla")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Workspace root directory
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the workspace manifest and print a summary
    Resolve {
        /// Print the full merged manifest as JSON
        #[arg(long)]
        json: bool,
    },

    /// List resolved projects as "path name revision" lines
    Projects,
}

fn main() {
    // Initialize logging
    if let Err(e) = flotilla::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> flotilla::Result<()> {
    let Some(manifest) = resolve_workspace_default(&cli.root)? else {
        println!(
            "Workspace at {} is not initialized (no manifest found)",
            cli.root.display()
        );
        return Ok(());
    };

    match cli.command {
        Commands::Resolve { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&manifest)?);
            } else {
                print_summary(&manifest);
            }
        }

        Commands::Projects => {
            for project in &manifest.projects {
                let revision = manifest
                    .project_revision(project)
                    .unwrap_or_else(|| "-".to_string());
                println!("{}\t{}\t{}", project.path, project.name, revision);
            }
        }
    }

    Ok(())
}

fn print_summary(manifest: &ResolvedManifest) {
    if let Some(notice) = &manifest.notice {
        println!("Notice: {}", notice);
        println!();
    }

    println!("Remotes ({}):", manifest.remotes.len());
    for remote in &manifest.remotes {
        println!("  {}  {}", remote.name, remote.fetch);
    }

    if let Some(default) = &manifest.default {
        println!();
        println!(
            "Default: remote={} revision={}",
            default.remote.as_deref().unwrap_or("-"),
            default.revision.as_deref().unwrap_or("-")
        );
    }

    if let Some(server) = &manifest.server {
        println!("Manifest server: {}", server.url);
    }

    println!();
    println!("Projects ({}):", manifest.projects.len());
    for project in &manifest.projects {
        println!("  {}  ({})", project.path, project.name);
    }
}
