fn main() {
    // Stamp the binary with its build date for the startup log line.
    let stamp = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC").to_string();
    println!("cargo:rustc-env=BUILD_DATE={stamp}");
}
