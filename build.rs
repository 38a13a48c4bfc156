use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=assets/");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("splash.rs");
    let mut f = fs::File::create(&dest_path).unwrap();

    let splash_path = Path::new("assets").join("splash.txt");
    let contents = fs::read_to_string(&splash_path).unwrap_or_default();

    // Trailing blank lines would only push the first menu further down.
    let lines: Vec<&str> = contents.trim_end().lines().collect();

    writeln!(f, "pub const DEFAULT_SPLASH: &[&str] = &[").unwrap();
    for line in lines {
        writeln!(f, "    {:?},", line.trim_end()).unwrap();
    }
    writeln!(f, "];").unwrap();
}
