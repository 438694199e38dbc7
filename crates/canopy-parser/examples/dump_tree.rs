//! Parse a JSON file and dump the resulting value tree.
//!
//! ```bash
//! cargo run --example dump_tree -- input.json
//! ```

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .context("usage: dump_tree <file.json>")?;
    let tree = canopy_parser::parse_file(&path)?;
    println!("{} values", tree.value_count());
    print!("{tree:?}");
    Ok(())
}
