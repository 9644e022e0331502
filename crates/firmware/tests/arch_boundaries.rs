//! Architecture boundary tests: run with `cargo test -p hpm6300evk --test arch_boundaries`
// Architecture test file: expect/unwrap/panic/indexing are intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
)]
//!
//! These tests enforce the layering rules of the workspace:
//!   Rule 1: hpm-platform must not depend on the board crate
//!   Rule 2: board routines reach silicon only through the platform seams
//!   Rule 3: vendor FFI and CSR access live in `hardware` only
//!   Rule 4: the documented boot order matches what `board_init` does

const PLATFORM_CARGO: &str = include_str!("../../platform/Cargo.toml");
const FIRMWARE_CARGO: &str = include_str!("../Cargo.toml");

/// Board routine sources that must stay hardware-independent.
const PORTABLE_SOURCES: &[(&str, &str)] = &[
    ("boot.rs", include_str!("../src/boot.rs")),
    ("clocks.rs", include_str!("../src/clocks.rs")),
    ("config.rs", include_str!("../src/config.rs")),
    ("delay.rs", include_str!("../src/delay.rs")),
    ("ext_ram.rs", include_str!("../src/ext_ram.rs")),
    ("gpio.rs", include_str!("../src/gpio.rs")),
    ("image.rs", include_str!("../src/image.rs")),
    ("pins.rs", include_str!("../src/pins.rs")),
    ("sd.rs", include_str!("../src/sd.rs")),
    ("timer.rs", include_str!("../src/timer.rs")),
];

/// The part of a source file above its `#[cfg(test)]` module.
fn production_part(src: &str) -> &str {
    src.split("#[cfg(test)]").next().unwrap_or(src)
}

#[test]
fn platform_does_not_depend_on_board_crate() {
    let deps = PLATFORM_CARGO.split("[dev-dependencies]").next().unwrap();
    assert!(!deps.contains("hpm6300evk"), "hpm-platform must not depend on the board crate");
}

#[test]
fn platform_is_free_of_target_crates() {
    for forbidden in ["riscv", "critical-section", "defmt-rtt"] {
        assert!(
            !PLATFORM_CARGO.contains(forbidden),
            "hpm-platform must stay target-independent, found {forbidden}"
        );
    }
}

#[test]
fn target_crates_are_optional_in_firmware() {
    for line in FIRMWARE_CARGO.lines() {
        let line = line.trim();
        if line.starts_with("riscv") || line.starts_with("critical-section") || line.starts_with("defmt-rtt") {
            assert!(line.contains("optional = true"), "must be optional: {line}");
        }
    }
}

#[test]
fn portable_routines_have_no_unsafe_or_ffi() {
    for (name, src) in PORTABLE_SOURCES {
        let code = production_part(src);
        assert!(!code.contains("unsafe"), "{name}: unsafe belongs in hardware/");
        assert!(!code.contains("extern \"C\""), "{name}: FFI belongs in hardware/");
        assert!(!code.contains("asm!"), "{name}: CSR access belongs in hardware/");
    }
}

#[test]
fn portable_routines_do_not_unwrap() {
    for (name, src) in PORTABLE_SOURCES {
        let code = production_part(src);
        assert!(!code.contains(".unwrap()"), "{name}: propagate errors instead of unwrap");
        assert!(!code.contains(".expect("), "{name}: propagate errors instead of expect");
    }
}

#[test]
fn hardware_module_is_feature_gated() {
    let lib = include_str!("../src/lib.rs");
    let gate = lib.find("#[cfg(feature = \"hardware\")]\npub mod hardware;");
    assert!(gate.is_some(), "hardware module must be behind the hardware feature");
}

#[test]
fn boot_sequence_starts_with_the_rail() {
    let steps = hpm6300evk::boot::BOOT_SEQUENCE_STEPS;
    assert!(steps[0].to_lowercase().contains("dc-dc"), "step 0 must raise the core rail");
    assert!(steps[1].to_lowercase().contains("clock"));
}

#[test]
fn boot_sequence_protects_memory_before_ahb() {
    let steps = hpm6300evk::boot::BOOT_SEQUENCE_STEPS;
    let pmp = steps.iter().position(|s| s.contains("PMP")).unwrap();
    let ahb = steps.iter().position(|s| s.contains("AHB")).unwrap();
    let sdram = steps.iter().position(|s| s.contains("SDRAM")).unwrap();
    assert!(pmp < ahb);
    assert!(ahb < sdram);
}

#[test]
fn boot_image_sections_are_named_for_the_linker_script() {
    let image = include_str!("../src/image.rs");
    assert!(image.contains("link_section = \".nor_cfg_option\""));
    assert!(image.contains("link_section = \".uf2_signature\""));
}
