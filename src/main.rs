//! pods-fixup CLI
//!
//! Entry point for the `pods-fixup` command-line tool.

use clap::{ArgAction, Parser, Subcommand};
use pods_fixup::{
    check, clean_project, patch_header, FixupConfig, FixupError, HeaderOutcome, PbxprojStore,
    StoreError,
};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "pods-fixup")]
#[command(about = "Post-install fixups for generated CocoaPods build output", version)]
struct Cli {
    /// iOS project root containing the Pods directory (default: current directory)
    #[arg(long, short = 'r', global = true)]
    root: Option<PathBuf>,

    /// Path to config file (default: <root>/.pods-fixup.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove disallowed flags from the gRPC targets in Pods.xcodeproj
    StripFlags {
        /// Project bundle or project.pbxproj, relative to the root
        #[arg(long)]
        project: Option<PathBuf>,

        /// Target to clean (repeatable; replaces the configured list)
        #[arg(long = "target", value_name = "NAME")]
        targets: Vec<String>,

        /// Build setting to filter (repeatable; replaces the configured list)
        #[arg(long = "key", value_name = "KEY")]
        keys: Vec<String>,

        /// Flag prefix to remove
        #[arg(long)]
        prefix: Option<String>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Apply the literal text fix to basic_seq.h
    PatchHeader {
        /// Header file, relative to the root
        #[arg(long)]
        header: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Check that the generated Pods artifacts are present
    Check {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Run strip-flags, then patch-header
    RunAll,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let root = cli.root.unwrap_or_else(|| PathBuf::from("."));
    let config_path = cli.config;

    match cli.command {
        Commands::StripFlags {
            project,
            targets,
            keys,
            prefix,
            dry_run,
            json,
        } => {
            let mut flags = Map::new();
            if let Some(project) = project {
                flags.insert("project".into(), json!(project));
            }
            if !targets.is_empty() {
                flags.insert("targets".into(), json!(targets));
            }
            if !keys.is_empty() {
                flags.insert("keys".into(), json!(keys));
            }
            if let Some(prefix) = prefix {
                flags.insert("prefix".into(), json!(prefix));
            }
            let overrides = json!({ "flags": Value::Object(flags) });
            let config = load_config(&root, config_path.as_deref(), Some(overrides));
            run_strip_flags(&root, &config, dry_run, json);
        }
        Commands::PatchHeader { header, json } => {
            let overrides = header.map(|path| json!({ "header": { "path": path } }));
            let config = load_config(&root, config_path.as_deref(), overrides);
            run_patch_header(&root, &config, json);
        }
        Commands::Check { json } => {
            let config = load_config(&root, config_path.as_deref(), None);
            run_check(&root, &config, json);
        }
        Commands::RunAll => {
            let config = load_config(&root, config_path.as_deref(), None);
            run_strip_flags(&root, &config, false, false);
            run_patch_header(&root, &config, false);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

fn load_config(root: &Path, config_path: Option<&Path>, overrides: Option<Value>) -> FixupConfig {
    match FixupConfig::load(root, config_path, overrides) {
        Ok(config) => config,
        Err(e) => fail(e.into()),
    }
}

fn fail(error: FixupError) -> ! {
    eprintln!("Error: {}", error);
    process::exit(1);
}

fn print_json(output: Result<String, serde_json::Error>) {
    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn run_strip_flags(root: &Path, config: &FixupConfig, dry_run: bool, json_output: bool) {
    let mut store = PbxprojStore::open(config.project_path(root));

    let report = match clean_project(&mut store, &config.flag_rules(), dry_run) {
        Ok(report) => report,
        Err(StoreError::NotFound(path)) => {
            eprintln!("Error: Could not find Pods project at {}", path.display());
            process::exit(1);
        }
        Err(e) => fail(e.into()),
    };

    if json_output {
        print_json(report.to_json());
    } else {
        println!("{}", report.to_human());
    }
}

fn run_patch_header(root: &Path, config: &FixupConfig, json_output: bool) {
    let path = config.header_path(root);

    let outcome = match patch_header(&path, &config.header.replacements) {
        Ok(outcome) => outcome,
        Err(e) => fail(e),
    };

    if json_output {
        print_json(outcome.to_json());
    } else {
        match outcome {
            HeaderOutcome::Missing { .. } => println!("Note: {}", outcome.to_human()),
            HeaderOutcome::Patched { .. } => println!("{}", outcome.to_human()),
        }
    }
}

fn run_check(root: &Path, config: &FixupConfig, json_output: bool) {
    let report = check(config, root);

    if json_output {
        print_json(report.to_json());
    } else {
        println!("{}", report.to_human());
    }

    if !report.ok() {
        process::exit(1);
    }
}
