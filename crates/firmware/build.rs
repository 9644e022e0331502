fn main() {
    // Only wire up the SDK link inputs for hardware builds
    #[cfg(feature = "hardware")]
    {
        use std::env;

        // defmt's section layout goes next to the SDK linker script.
        println!("cargo:rustc-link-arg=-Tdefmt.x");

        // The SDK provides the memory layout (flash_xip.ld, ram.ld, ...),
        // including `.nor_cfg_option`, `.uf2_signature` and the
        // `__noncacheable_start__`/`__noncacheable_end__` symbols.
        if let Some(script) = env::var_os("HPM_LINKER_SCRIPT") {
            println!("cargo:rustc-link-arg=-T{}", script.to_string_lossy());
        } else {
            println!("cargo:warning=HPM_LINKER_SCRIPT not set; using the linker default layout");
        }

        // Startup code, trap vector and the `hpm_board_*` driver glue.
        if let Some(dir) = env::var_os("HPM_SDK_LIB_DIR") {
            println!("cargo:rustc-link-search={}", dir.to_string_lossy());
            println!("cargo:rustc-link-lib=static=hpm6300evk_glue");
        }

        println!("cargo:rerun-if-env-changed=HPM_LINKER_SCRIPT");
        println!("cargo:rerun-if-env-changed=HPM_SDK_LIB_DIR");
    }

    println!("cargo:rerun-if-changed=build.rs");
}
