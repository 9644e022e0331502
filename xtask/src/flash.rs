use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

use crate::{ImageKind, TARGET};

/// OpenOCD configs shipped with the HPM SDK (`boards/openocd`).
const OPENOCD_CONFIGS: [&str; 3] = ["probes/cmsis_dap.cfg", "soc/hpm6360.cfg", "boards/hpm6300evk.cfg"];

fn elf_path(release: bool) -> PathBuf {
    let profile = if release { "release" } else { "debug" };
    PathBuf::from("target").join(TARGET).join(profile).join("hpm6300evk")
}

pub fn run(release: bool, image: ImageKind) -> Result<()> {
    let mode = if release { "release" } else { "debug" };

    println!();
    println!(
        "{}",
        format!("🔨 Building board demo ({mode} mode, features {})...", image.features())
            .cyan()
            .bold()
    );
    println!();

    let build_start = Instant::now();
    let mut build_cmd = Command::new("cargo");
    build_cmd
        .args(["build", "-p", "hpm6300evk", "--target", TARGET])
        .args(["--features", image.features()]);

    if release {
        build_cmd.arg("--release");
    }

    let build_output = build_cmd.output().context("Failed to run cargo build")?;

    if !build_output.status.success() {
        eprintln!("{}", "✗ Build failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&build_output.stderr));
        anyhow::bail!("Build failed");
    }

    println!(
        "{}",
        format!("✓ Build successful in {:.2}s", build_start.elapsed().as_secs_f64()).green()
    );
    println!();

    let elf = elf_path(release);
    show_binary_size(&elf);
    println!();

    println!("{}", "📡 Programming HPM6300EVK...".cyan().bold());
    println!("   {}", "Connecting through OpenOCD...".dimmed());

    let scripts = std::env::var_os("HPM_OPENOCD_SCRIPTS")
        .map(PathBuf::from)
        .context("HPM_OPENOCD_SCRIPTS must point at the SDK's boards/openocd directory")?;

    let flash_start = Instant::now();
    let mut flash_cmd = Command::new("openocd");
    for cfg in OPENOCD_CONFIGS {
        flash_cmd.arg("-f").arg(scripts.join(cfg));
    }
    let program = match image {
        ImageKind::FlashXip => format!("program {} verify reset exit", elf.display()),
        ImageKind::Ram => format!("load_image {}; resume; exit", elf.display()),
    };
    flash_cmd.args(["-c", "init", "-c", &program]);

    let flash_output = flash_cmd
        .output()
        .context("Failed to run openocd. Is the HPM OpenOCD fork installed?")?;

    if !flash_output.status.success() {
        eprintln!("{}", "✗ Flash failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&flash_output.stderr));
        anyhow::bail!("Flash failed - check that the probe is connected and the board is powered");
    }

    println!(
        "{}",
        format!("✓ Flash successful in {:.2}s", flash_start.elapsed().as_secs_f64()).green()
    );
    println!();
    println!("{}", "💡 HPM6300EVK is running the LED blink demo".bold());
    println!("   {}", "Console: UART0 at 115200 baud".dimmed());
    println!();

    Ok(())
}

fn show_binary_size(elf: &std::path::Path) {
    let output = Command::new("rust-size").arg(elf).arg("-A").output();

    if let Ok(out) = output {
        if out.status.success() {
            println!("{}", "📊 Binary size:".cyan());
            let size_output = String::from_utf8_lossy(&out.stdout);
            for line in size_output.lines() {
                println!("   {}", line.dimmed());
            }
        }
    }
}
