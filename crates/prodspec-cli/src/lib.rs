//! prodspec command-line interface.
//!
//! - `build` assembles a layout from ISD and organization inputs and saves it
//! - `validate` runs the standard rules and records the validation marker
//! - `status` compares the layout file against its marker
//! - `topology` writes one `topology.json` per AS of a validated layout
//! - `show` prints the entities of a validated layout

mod error;
mod show;

pub use error::{CliError, CliResult};

use clap::{Parser, Subcommand};
use prodspec_build::{Builder, load_isds, load_organization};
use prodspec_config::{CONFIG_FILE, Config};
use prodspec_core::{
    codec::Generator,
    gate::{Gate, GateStatus},
    validate::rules,
};
use prodspec_schema::types::EntityKind;
use prodspec_topology::{DEFAULT_OVERLAY, Options, generate};
use std::{
    ffi::OsString,
    fmt::Write as _,
    path::{Path, PathBuf},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Name stamped into every layout this tool saves.
pub const GENERATOR_NAME: &str = "prodspec";

/// `rustc -V` output and target triple of the compiler that built this tool.
pub const BUILD_CHAIN: &str = env!("PRODSPEC_BUILD_CHAIN");

///
/// Cli
///

#[derive(Debug, Parser)]
#[command(name = "prodspec")]
#[command(about = "Build, validate and project deployment layouts", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Layout file, overriding the configured one
    #[arg(short, long, global = true)]
    layout: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the layout from ISD and organization inputs and save it
    Build {
        /// ISD document
        #[arg(long)]
        isd: Option<PathBuf>,

        /// Organization document
        #[arg(long)]
        organization: Option<PathBuf>,

        /// Domain appended to host ids
        #[arg(long)]
        host_domain: Option<String>,
    },

    /// Run the standard validators and record the marker on success
    Validate,

    /// Report whether the layout file matches its validation marker
    Status,

    /// Write per-AS topology files from the validated layout
    Topology {
        /// Output root
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Overlay written into every topology
        #[arg(long)]
        overlay: Option<String>,
    },

    /// List the ids of a kind, or print one entity
    Show { kind: EntityKind, id: Option<String> },
}

/// Run using the current process arguments and print the report.
pub fn run() -> CliResult<()> {
    let report = run_with_args(std::env::args_os())?;
    print!("{report}");

    Ok(())
}

/// Run using the provided arguments and return the report text.
pub fn run_with_args<I, T>(args: I) -> CliResult<String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    let filter = if cli.verbose { "debug" } else { "info" };
    // a second run in the same process keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(fmt::layer().without_time().with_writer(std::io::stderr))
        .try_init();

    let config = Config::load(&cli.config)?;
    tracing::debug!(config = %cli.config.display(), "loaded configuration");
    let session = Session {
        gate: gate(&config, cli.layout.as_deref()),
        config_path: cli.config,
        config,
    };

    match cli.command {
        Command::Build {
            isd,
            organization,
            host_domain,
        } => session.build(isd, organization, host_domain),
        Command::Validate => session.validate(),
        Command::Status => session.status(),
        Command::Topology { out_dir, overlay } => session.topology(out_dir, overlay),
        Command::Show { kind, id } => session.show(kind, id.as_deref()),
    }
}

/// Identity stamped into saved layouts.
#[must_use]
pub fn generator() -> Generator {
    Generator::new(GENERATOR_NAME, env!("CARGO_PKG_VERSION"), BUILD_CHAIN)
}

fn gate(config: &Config, layout: Option<&Path>) -> Gate {
    let gate = Gate::new(layout.unwrap_or(config.layout.as_path()));

    match &config.marker {
        Some(marker) => gate.with_marker(marker),
        None => gate,
    }
}

///
/// Session
/// One invocation: the loaded configuration and the gate it points at.
///

struct Session {
    config: Config,
    config_path: PathBuf,
    gate: Gate,
}

impl Session {
    fn build(
        &self,
        isd: Option<PathBuf>,
        organization: Option<PathBuf>,
        host_domain: Option<String>,
    ) -> CliResult<String> {
        let input = &self.config.input;
        let isd = self.required(isd.or_else(|| input.isd.clone()), "ISD input", "--isd")?;
        let organization = self.required(
            organization.or_else(|| input.organization.clone()),
            "organization input",
            "--organization",
        )?;

        let mut builder = Builder::new();
        if let Some(domain) = host_domain.or_else(|| input.host_domain.clone()) {
            builder = builder.host_domain(domain);
        }

        let layout = builder.build(&load_isds(isd)?, &load_organization(organization)?)?;
        let fingerprint = self.gate.save(&layout, &generator())?;

        Ok(format!(
            "saved {} entities to {} ({fingerprint})\n",
            layout.total(),
            self.gate.layout_path().display()
        ))
    }

    fn validate(&self) -> CliResult<String> {
        let fingerprint = self.gate.run_validation(&rules::standard())?;

        Ok(format!(
            "validated {} ({fingerprint})\n",
            self.gate.layout_path().display()
        ))
    }

    fn status(&self) -> CliResult<String> {
        let path = self.gate.layout_path().display();

        Ok(match self.gate.status()? {
            GateStatus::Validated { fingerprint } => {
                format!("{path}: validated ({fingerprint})\n")
            }
            GateStatus::Unvalidated {
                fingerprint,
                reason,
            } => format!("{path}: not validated, {reason} ({fingerprint})\n"),
        })
    }

    fn topology(&self, out_dir: Option<PathBuf>, overlay: Option<String>) -> CliResult<String> {
        let configured = &self.config.topology;
        let out_dir = out_dir.unwrap_or_else(|| configured.out_dir.clone());
        let options = Options {
            overlay: overlay
                .or_else(|| configured.overlay.clone())
                .unwrap_or_else(|| DEFAULT_OVERLAY.to_string()),
        };

        let layout = self.gate.load_validated()?;
        let written = generate(&layout, &out_dir, &options)?;

        let mut report = String::new();
        for path in &written {
            let _ = writeln!(report, "{}", path.display());
        }

        Ok(report)
    }

    fn show(&self, kind: EntityKind, id: Option<&str>) -> CliResult<String> {
        let layout = self.gate.load_validated()?;

        match id {
            None => Ok(show::ids(&layout, kind)),
            Some(id) => {
                let view = layout
                    .find(kind, id)
                    .and_then(|handle| layout.view(handle))
                    .ok_or_else(|| CliError::NotFound {
                        kind: kind.to_string(),
                        id: id.to_string(),
                    })?;

                Ok(show::entity(view)?)
            }
        }
    }

    fn required(
        &self,
        value: Option<PathBuf>,
        what: &'static str,
        flag: &'static str,
    ) -> CliResult<PathBuf> {
        value.ok_or_else(|| CliError::NotConfigured {
            what,
            flag,
            config: self.config_path.clone(),
        })
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::parse_from(["prodspec", "show", "AS", "-l", "x.toml", "-v"]);

        assert!(cli.verbose);
        assert_eq!(cli.layout.as_deref(), Some(Path::new("x.toml")));
        assert_eq!(cli.config, Path::new(CONFIG_FILE));
        assert!(matches!(
            cli.command,
            Command::Show {
                kind: EntityKind::As,
                id: None
            }
        ));
    }

    #[test]
    fn unknown_kind_is_rejected_by_the_parser() {
        assert!(Cli::try_parse_from(["prodspec", "show", "Router"]).is_err());
    }

    #[test]
    fn configured_marker_replaces_the_sibling() {
        let config = Config {
            marker: Some(PathBuf::from("state/marker")),
            ..Config::default()
        };

        let gate = gate(&config, Some(Path::new("other.toml")));
        assert_eq!(gate.layout_path(), Path::new("other.toml"));
        assert_eq!(gate.marker_path(), Path::new("state/marker"));
    }

    #[test]
    fn generator_identifies_this_tool() {
        let generator = generator();

        assert_eq!(generator.name, GENERATOR_NAME);
        assert_eq!(generator.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(generator.build_chain, BUILD_CHAIN);

        // `rustc -V` output, then the target triple
        let (compiler, target) = BUILD_CHAIN.rsplit_once(' ').unwrap();
        assert!(compiler.starts_with("rustc 1."), "{compiler}");
        assert!(target.contains('-'), "{target}");
    }
}
