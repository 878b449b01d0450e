//! Command: print version information.

/// Version string embedded at build time, or the package version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("EZDEPS_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the ezdeps version to stdout.
pub fn run() {
    println!("ezdeps {}", version());
}
