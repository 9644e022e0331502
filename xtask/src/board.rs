use anyhow::{bail, Context, Result};
use colored::Colorize;
use hpm_platform::clock_config::{BOARD_CLOCK_GROUP, BOARD_CLOCK_PLAN};
use hpm_platform::flash_config::{XpiNorCfgOption, BOARD_NOR_CFG_OPTION};

pub fn print_clock_plan() {
    println!();
    println!("{}", "⏱  HPM6300EVK clock plan".cyan().bold());
    println!();
    for entry in BOARD_CLOCK_PLAN {
        println!(
            "  {:<8} {:<7} {:>10} / {:<3} = {:>11} Hz",
            entry.peripheral.bold(),
            entry.clock.as_str(),
            entry.setting.source.as_str(),
            entry.setting.divider,
            entry.setting.nominal_hz().raw()
        );
        println!("           {}", entry.note.dimmed());
    }
    println!();
    println!(
        "   {}",
        format!("{} clocks in group 0 at boot", BOARD_CLOCK_GROUP.len()).dimmed()
    );
    println!();
}

fn parse_word(s: &str) -> Result<u32> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(digits, 16).with_context(|| format!("not a hex word: {s}"))
}

pub fn decode_nor_option(words: &[String]) -> Result<()> {
    let raw = if words.is_empty() {
        BOARD_NOR_CFG_OPTION
    } else {
        if words.len() > 4 {
            bail!("at most four option words, got {}", words.len());
        }
        let mut raw = [0u32; 4];
        for (slot, word) in raw.iter_mut().zip(words) {
            *slot = parse_word(word)?;
        }
        raw
    };

    let [w0, w1, w2, w3] = raw;
    println!();
    println!(
        "{}",
        format!("🔎 {w0:#010x} {w1:#010x} {w2:#010x} {w3:#010x}").cyan().bold()
    );
    match XpiNorCfgOption::decode(raw) {
        Ok(option) => {
            println!("{}", format!("  ✓ {option:#?}").green());
            if option == XpiNorCfgOption::board() {
                println!("   {}", "matches the board default".dimmed());
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", format!("  ✗ {err}").red().bold());
            bail!("invalid NOR configuration option")
        }
    }
}
