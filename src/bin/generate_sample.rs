use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::StringArray;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

const POSITIVE_HEADLINES: &[&str] = &[
    "Profits beat forecasts as growth returns",
    "Markets rally on strong earnings",
    "Confidence improves as recovery takes hold",
    "Banks report robust gains",
    "Exporters welcome encouraging demand",
];

const NEGATIVE_HEADLINES: &[&str] = &[
    "Banks collapse as credit crisis deepens",
    "Shares plunge on recession fears",
    "Losses mount amid market turmoil",
    "Lenders warn of worse to come",
    "Unemployment rises as downturn bites",
];

const BODIES: &[&str] = &[
    "Analysts said the outlook remained uncertain.",
    "Investors are watching the central bank closely.",
    "The chief executive said the group was well placed.",
    "Traders expect volatility to persist into next quarter.",
    "The figures were published on Tuesday.",
];

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Share of negative headlines on a given day: low before mid-2007,
/// peaking around the Lehman collapse, easing through 2009.
fn negative_share(day: NaiveDate) -> f64 {
    let lehman = NaiveDate::from_ymd_opt(2008, 9, 15).unwrap_or(day);
    let months = (day - lehman).num_days() as f64 / 30.0;
    0.2 + 0.6 * (-(months * months) / 72.0).exp()
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let start = NaiveDate::from_ymd_opt(2006, 7, 1).context("start date")?;
    let end = NaiveDate::from_ymd_opt(2010, 6, 30).context("end date")?;
    let days = (end - start).num_days();

    let mut titles: Vec<Option<String>> = Vec::new();
    let mut texts: Vec<Option<String>> = Vec::new();
    let mut dates: Vec<Option<String>> = Vec::new();

    for offset in 0..=days {
        let day = start + Duration::days(offset);
        let per_day = 1 + rng.next_u64() % 3;

        for _ in 0..per_day {
            let headline = if rng.next_f64() < negative_share(day) {
                rng.pick(NEGATIVE_HEADLINES)
            } else {
                rng.pick(POSITIVE_HEADLINES)
            };
            let body = rng.pick(BODIES);
            let hour = rng.next_u64() % 24;

            // A few records arrive with missing cells.
            let roll = rng.next_f64();
            titles.push((roll >= 0.01).then(|| headline.to_string()));
            texts.push((!(0.01..0.02).contains(&roll)).then(|| body.to_string()));
            dates.push((!(0.02..0.025).contains(&roll)).then(|| format!("{day} {hour:02}:00:00")));
        }
    }

    let count = titles.len();
    let schema = Arc::new(Schema::new(vec![
        Field::new("Title", DataType::Utf8, true),
        Field::new("Text", DataType::Utf8, true),
        Field::new("Date", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(titles)),
            Arc::new(StringArray::from(texts)),
            Arc::new(StringArray::from(dates)),
        ],
    )
    .context("building record batch")?;

    // Write Parquet
    let output_path = "ft-articles.parquet";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    println!("Wrote {count} articles to {output_path}");
    Ok(())
}
