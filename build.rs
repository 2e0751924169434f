use std::env;
use std::path::Path;

// Bakes a default library root into the binary when ICONICS_ROOT_HINT is set
// at build time; the runtime lookup falls back to it after ICONICS_ROOT.
fn main() {
    println!("cargo:rerun-if-env-changed=ICONICS_ROOT_HINT");

    let Ok(raw_hint) = env::var("ICONICS_ROOT_HINT") else {
        return;
    };
    let hint = Path::new(&raw_hint);
    if !hint.is_dir() {
        println!(
            "cargo:warning=ICONICS_ROOT_HINT={} is not a directory; ignoring",
            hint.display()
        );
        return;
    }

    let root = hint.canonicalize().unwrap_or_else(|_| hint.to_path_buf());
    println!("cargo:rustc-env=ICONICS_ROOT_HINT={}", root.display());
}
