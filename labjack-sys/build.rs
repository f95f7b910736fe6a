fn main() {
    // Link directives only apply when building against the installed driver.
    // Without the feature there is nothing to emit and the crate stays
    // buildable on machines without the LabJack driver package.
    #[cfg(feature = "labjack-sdk")]
    {
        println!("cargo:rerun-if-env-changed=LABJACK_LIB_DIR");

        // Allow LABJACK_LIB_DIR to point at a non-standard install location.
        if let Ok(lib_dir) = std::env::var("LABJACK_LIB_DIR") {
            println!("cargo:rustc-link-search=native={}", lib_dir);
        }

        println!("cargo:rustc-link-lib=ljackuw");
    }
}
