use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const LUT_SIZE: usize = 4096;

/// IEC 61966-2-1 decoding curve.
fn srgb_to_linear_exact(srgb: f64) -> f64 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

fn main() -> std::io::Result<()> {
    let out_dir = env::var("OUT_DIR").map_err(std::io::Error::other)?;
    let dest_path = Path::new(&out_dir).join("gamma_lut.rs");
    let mut file = BufWriter::new(File::create(&dest_path)?);

    // The table is generated in f64 and stored as f32 literals so every
    // target sees the same values regardless of its libm.
    writeln!(file, "/// sRGB decoding table, index = encoded value * {}.", LUT_SIZE - 1)?;
    writeln!(file, "pub static SRGB_TO_LINEAR: [f32; {LUT_SIZE}] = [")?;
    for i in 0..LUT_SIZE {
        let srgb = i as f64 / (LUT_SIZE - 1) as f64;
        if i > 0 && i % 8 == 0 {
            writeln!(file)?;
        }
        write!(file, "    {:.9},", srgb_to_linear_exact(srgb) as f32)?;
    }
    writeln!(file, "\n];")?;

    println!("cargo::rerun-if-changed=build.rs");
    Ok(())
}
