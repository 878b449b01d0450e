//! Embeds a version string for `ezdeps version`.
use std::process::Command;

fn main() {
    // CI release builds pin EZDEPS_VERSION; local builds fall back to git describe.
    if let Ok(version) = std::env::var("EZDEPS_VERSION") {
        println!("cargo:rustc-env=EZDEPS_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=EZDEPS_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=EZDEPS_VERSION");
}
