// Quick connectivity probe for the LabJack U12: checks the USB link and
// dumps the current state of both digital line groups.
//
// Usage: u12_probe [config.toml]
//
// Build with --features labjack_hardware to talk to a real device; the
// default build answers from the demo binding.

use anyhow::{Context, Result};
use daq_driver_labjack::{U12Config, U12Driver};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {path}"))?;
            toml::from_str::<U12Config>(&raw).with_context(|| format!("parsing {path}"))?
        }
        None => U12Config::default(),
    };

    let mut u12 = U12Driver::open(&config).context("opening LabJack U12")?;
    println!("LabJack U12 detected");

    let io = u12.read_io().context("reading IO lines")?;
    let d = u12.read_dio().context("reading D lines")?;
    println!("IO lines (screw terminals): {io:#06b}");
    println!("D  lines (DB25 connector):  {d:#018b}");

    Ok(())
}
