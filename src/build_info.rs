//! Build information embedded by build.rs, shown by `--version`.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `flappy-neat <version> (<date> <commit>)`, with the profile appended for
/// non-release builds.
pub fn version_line() -> String {
    let line = format!(
        "flappy-neat {} ({} {})",
        env!("CARGO_PKG_VERSION"),
        BUILD_DATE,
        BUILD_COMMIT
    );
    if BUILD_PROFILE == "release" {
        line
    } else {
        format!("{line} [{BUILD_PROFILE}]")
    }
}
