//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// pkgpref - Query package preferences from packages configuration
#[derive(Parser, Debug)]
#[command(name = "pkgpref")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Packages configuration file; later files take priority.
    /// Defaults to the user scope when none is given.
    #[arg(short, long = "config", value_name = "FILE", global = true)]
    pub config: Vec<PathBuf>,

    /// Register a virtual package name for validation
    #[arg(long = "virtual", value_name = "NAME", global = true)]
    pub virtuals: Vec<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Load the configuration and check every preference in it
    Check,

    /// Show the preference list for a package
    ///
    /// Examples:
    ///   pkgpref order zlib version
    ///   pkgpref order hdf5 providers --provider mpi
    Order {
        /// Package name
        package: String,

        /// One of: version, compiler, variants, architecture, providers
        category: String,

        /// Virtual package whose providers to list
        #[arg(long, value_name = "VPKG")]
        provider: Option<String>,

        /// Do not fall back to the `all` entry
        #[arg(long)]
        no_wildcard: bool,
    },

    /// Rank candidates against a preference list, most preferred first
    ///
    /// Examples:
    ///   pkgpref rank zlib version 1.2.8 1.2.11
    ///   pkgpref rank hdf5 providers --provider mpi openmpi mpich
    Rank {
        /// Package name
        package: String,

        /// One of: version, compiler, variants, architecture, providers
        category: String,

        /// Virtual package for provider ranking
        #[arg(long, value_name = "VPKG")]
        provider: Option<String>,

        /// Candidates to rank
        #[arg(required = true)]
        candidates: Vec<String>,
    },

    /// Sort specs from most to least preferred
    Sort {
        /// Specs to sort
        #[arg(required = true)]
        specs: Vec<String>,
    },

    /// List configured external installations that satisfy a spec
    Externals {
        /// Spec to match
        spec: String,
    },

    /// Show whether a package may be built from source
    Buildable {
        /// Spec naming the package
        spec: String,
    },
}
