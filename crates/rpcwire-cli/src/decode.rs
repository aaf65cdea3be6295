//! `rpcwire decode` - pretty-print framed messages

use anyhow::{Context, Result};
use rpcwire::{Message, Unit, decode};
use std::io::Read;

/// Decode every frame in `input` and describe each unit
///
/// Each unit is printed as a `# <kind>` header followed by its pretty JSON.
/// Batch members are numbered under a `# batch (<n> units)` header.
pub fn render(input: &[u8], separator: &str) -> Result<String> {
    let message = decode(input, separator).context("Failed to decode input")?;

    let mut out = String::new();
    match message {
        Message::Batch(batch) => {
            out.push_str(&format!("# batch ({} units)\n", batch.len()));
            for (index, unit) in batch.iter().enumerate() {
                out.push_str(&format!("# [{index}] {}\n", unit.kind()));
                out.push_str(&pretty(unit)?);
            }
        }
        Message::Request(request) => {
            let unit = Unit::from(request);
            out.push_str(&format!("# {}\n", unit.kind()));
            out.push_str(&pretty(&unit)?);
        }
        Message::Response(response) => {
            let unit = Unit::from(response);
            out.push_str(&format!("# {}\n", unit.kind()));
            out.push_str(&pretty(&unit)?);
        }
    }
    Ok(out)
}

pub fn run(separator: &str) -> Result<()> {
    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .context("Failed to read stdin")?;
    print!("{}", render(&input, separator)?);
    Ok(())
}

fn pretty(unit: &Unit) -> Result<String> {
    let mut text = serde_json::to_string_pretty(&unit.to_value())?;
    text.push('\n');
    Ok(text)
}
