use chrono::{Duration, TimeZone, Utc};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // One day of minutely samples: baseline + slow daily drift + noise,
    // with occasional ventilation spikes.
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let n_samples = 1_440;
    let baseline = 2_400.0;

    let output_path = "sample_gas_levels.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record(["Time", "gas_level"])
        .expect("Failed to write header");

    for i in 0..n_samples {
        let t = start + Duration::minutes(i);
        let phase = i as f64 / n_samples as f64 * 2.0 * std::f64::consts::PI;
        let drift = 300.0 * phase.sin();
        let noise = rng.gauss(0.0, 40.0);
        let spike = if rng.next_f64() < 0.01 {
            800.0 + rng.next_f64() * 700.0
        } else {
            0.0
        };
        let level = (baseline + drift + noise + spike).max(0.0);

        writer
            .write_record([
                t.format("%Y-%m-%d %H:%M:%S").to_string(),
                format!("{level:.0}"),
            ])
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output file");
    println!("Wrote {n_samples} readings to {output_path}");
}
