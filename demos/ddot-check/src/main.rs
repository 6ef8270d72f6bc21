mod logging;
mod scenarios;

use anyhow::{bail, Context, Result};
use clap::Parser;
use reprodot_core::try_ddot;
use tracing::{error, info};

use scenarios::{fingerprint, Scenario, SCENARIOS};

/// Check the reproducible dot product against its literal scenarios, or
/// evaluate one custom pair of vectors.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Comma-separated x vector (decimal, inf, nan, or 0x-prefixed bit pattern)
    #[arg(long, requires = "y", allow_hyphen_values = true)]
    x: Option<String>,

    /// Comma-separated y vector
    #[arg(long, requires = "x", allow_hyphen_values = true)]
    y: Option<String>,

    /// Print the SHA-256 fingerprint of the scenario results
    #[arg(long)]
    digest: bool,
}

fn main() -> Result<()> {
    logging::init()?;
    let args = Args::parse();

    if let (Some(x), Some(y)) = (&args.x, &args.y) {
        let x = parse_vector(x).context("parsing --x")?;
        let y = parse_vector(y).context("parsing --y")?;
        let r = try_ddot(&x, &y)?;
        println!("{r:e} 0x{:016X}", r.to_bits());
        return Ok(());
    }

    let results = run_scenarios();
    if args.digest {
        println!("DDOT_HASH {}", fingerprint(results.iter().map(|&(_, bits)| bits)));
    }

    let failed = results
        .iter()
        .filter(|(s, bits)| *bits != s.expected_bits)
        .count();
    if failed > 0 {
        bail!("{failed} of {} scenarios failed", results.len());
    }
    info!(count = results.len(), "all scenarios passed");
    Ok(())
}

fn run_scenarios() -> Vec<(&'static Scenario, u64)> {
    SCENARIOS
        .iter()
        .map(|s| {
            let bits = s.run();
            if bits == s.expected_bits {
                info!(scenario = s.name, bits = format_args!("0x{bits:016X}"), "ok");
            } else {
                error!(
                    scenario = s.name,
                    bits = format_args!("0x{bits:016X}"),
                    expected = format_args!("0x{:016X}", s.expected_bits),
                    "mismatch"
                );
            }
            (s, bits)
        })
        .collect()
}

fn parse_vector(list: &str) -> Result<Vec<f64>> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse_value)
        .collect()
}

fn parse_value(item: &str) -> Result<f64> {
    if let Some(hex) = item.strip_prefix("0x").or_else(|| item.strip_prefix("0X")) {
        let bits = u64::from_str_radix(hex, 16).with_context(|| format!("bad bit pattern {item:?}"))?;
        return Ok(f64::from_bits(bits));
    }
    item.parse::<f64>().with_context(|| format!("bad number {item:?}"))
}
