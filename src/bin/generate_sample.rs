use anyhow::{Context, Result};

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Poisson draw by inversion; fine for the small rates used here.
    fn poisson(&mut self, lambda: f64) -> u32 {
        let l = (-lambda).exp();
        let mut k = 0;
        let mut p = 1.0;
        loop {
            p *= self.next_f64();
            if p <= l {
                return k;
            }
            k += 1;
        }
    }
}

const LEAGUES: [(&str, [&str; 4]); 5] = [
    ("Premier League", ["Arsenal", "Liverpool", "Chelsea", "Newcastle"]),
    ("La Liga", ["Barcelona", "Real Madrid", "Atletico", "Villarreal"]),
    ("Serie A", ["Inter", "Napoli", "Atalanta", "Juventus"]),
    ("Bundesliga", ["Bayern", "Leverkusen", "Dortmund", "Stuttgart"]),
    ("Ligue 1", ["PSG", "Marseille", "Monaco", "Lille"]),
];

/// Position code and its per-90 (goal, assist, tackle) rates.
const POSITIONS: [(&str, f64, f64, f64); 4] = [
    ("GK", 0.0, 0.01, 0.05),
    ("DF", 0.05, 0.08, 2.2),
    ("MF", 0.15, 0.2, 1.8),
    ("FW", 0.45, 0.2, 0.7),
];

const HEADERS: [&str; 12] = [
    "Joueur",
    "Equipe",
    "Ligue",
    "Position",
    "Minutes jouees",
    "Matchs joues",
    "Buts",
    "Passes decisives",
    "xG",
    "xAG",
    "Tirs",
    "Tacles",
];

/// Share of statistic cells left empty, like the real export.
const MISSING_RATE: f64 = 0.02;

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "df_Big2025.csv".to_string());

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(HEADERS).context("writing header")?;

    let mut rows = 0;
    for (league, teams) in LEAGUES {
        for team in teams {
            for squad_no in 0..22 {
                let (position, g90, a90, t90) = POSITIONS[rng.below(POSITIONS.len())];
                let minutes = (rng.next_f64() * 3200.0).round();
                let nineties = minutes / 90.0;
                let games = (nineties * (1.0 + rng.next_f64() * 0.4)).ceil().min(38.0);

                let goals = rng.poisson(g90 * nineties);
                let assists = rng.poisson(a90 * nineties);
                let xg = goals as f64 * (0.7 + rng.next_f64() * 0.6);
                let xag = assists as f64 * (0.7 + rng.next_f64() * 0.6);
                let shots = rng.poisson((g90 * 7.0 + 0.2) * nineties);
                let tackles = rng.poisson(t90 * nineties);

                let mut stat = |v: String| {
                    if rng.next_f64() < MISSING_RATE {
                        String::new()
                    } else {
                        v
                    }
                };
                let record = [
                    format!("{team} {position}{:02}", squad_no + 1),
                    team.to_string(),
                    league.to_string(),
                    position.to_string(),
                    stat(minutes.to_string()),
                    stat(games.to_string()),
                    stat(goals.to_string()),
                    stat(assists.to_string()),
                    stat(format!("{xg:.1}")),
                    stat(format!("{xag:.1}")),
                    stat(shots.to_string()),
                    stat(tackles.to_string()),
                ];
                writer.write_record(&record).context("writing player row")?;
                rows += 1;
            }
        }
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {rows} players to {output_path}");
    Ok(())
}
