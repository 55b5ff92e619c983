use std::f64::consts::TAU;
use std::path::PathBuf;

use anyhow::Result;
use num_complex::Complex64;

use vna_marker::data::loader::save_file;
use vna_marker::rf::immittance::DEFAULT_REFERENCE_IMPEDANCE;
use vna_marker::{ComplexSample, SweepSnapshot};

/// Series R-L-C resonator.
struct Resonator {
    r: f64,
    l: f64,
    c: f64,
}

impl Resonator {
    fn impedance(&self, freq: f64) -> Complex64 {
        let omega = TAU * freq;
        Complex64::new(self.r, omega * self.l - 1.0 / (omega * self.c))
    }
}

/// Deterministic complex Gaussian noise (splitmix64 + polar Box-Muller).
struct NoiseSource {
    state: u64,
}

impl NoiseSource {
    fn new(seed: u64) -> Self {
        NoiseSource { state: seed }
    }

    /// Uniform in (0, 1].
    fn uniform(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^= z >> 31;
        ((z >> 11) + 1) as f64 / (1u64 << 53) as f64
    }

    /// One Box-Muller draw gives both quadratures.
    fn complex(&mut self, std_dev: f64) -> Complex64 {
        let radius = std_dev * (-2.0 * self.uniform().ln()).sqrt();
        Complex64::from_polar(radius, TAU * self.uniform())
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_sweep.parquet"));

    let mut noise = NoiseSource::new(42);
    let z0 = DEFAULT_REFERENCE_IMPEDANCE;

    // 1 µH / 100 pF resonates near 15.9 MHz.
    let dut = Resonator {
        r: 12.0,
        l: 1e-6,
        c: 100e-12,
    };
    // One-way delay of the test cable.
    let cable_delay = 1.5e-9;

    // 1 MHz → 30 MHz, 101 points
    let points = 101u64;
    let (start, stop) = (1_000_000u64, 30_000_000u64);
    let step = (stop - start) / (points - 1);

    let mut s11 = Vec::with_capacity(points as usize);
    let mut s21 = Vec::with_capacity(points as usize);
    for i in 0..points {
        let freq = start + i * step;
        let f = freq as f64;
        let z = dut.impedance(f);
        let cable = Complex64::from_polar(1.0, -TAU * f * cable_delay);

        // Resonator shunted to ground at port 1.
        let gamma = (z - z0) / (z + z0) * cable * cable;
        // Resonator in series between the two ports.
        let through = 2.0 * z0 / (2.0 * z0 + z) * cable;

        s11.push(ComplexSample::from_complex(freq, gamma + noise.complex(0.002)));
        s21.push(ComplexSample::from_complex(freq, through + noise.complex(0.002)));
    }

    let sweep = SweepSnapshot::new(s11, s21);
    save_file(&output_path, &sweep)?;

    println!(
        "Wrote {} sweep points ({start} Hz to {} Hz) to {}",
        sweep.len(),
        start + (points - 1) * step,
        output_path.display()
    );
    Ok(())
}
