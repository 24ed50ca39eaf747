//! Writes a demo gateway export (`sample_modbus.csv` and
//! `sample_modbus.parquet`): six hours of readings every 30 s, a few alarm
//! bursts, and one row with a corrupt timestamp.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Duration, Utc};
use parquet::arrow::ArrowWriter;

const STEP_SECS: i64 = 30;
const ROWS: usize = 6 * 60 * 2;

/// Alarm-style points that flip between 0 and 1.
const ALARM_POINTS: [u32; 4] = [443, 444, 318, 596];

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
}

struct Readings {
    times: Vec<DateTime<Utc>>,
    alarms: Vec<Vec<i64>>,
    temperature: Vec<f64>,
    device: Vec<&'static str>,
}

fn generate(rng: &mut SimpleRng) -> Result<Readings> {
    let start = DateTime::parse_from_rfc3339("2024-05-01T01:00:00Z")
        .context("parsing start time")?
        .with_timezone(&Utc);

    let mut readings = Readings {
        times: Vec::with_capacity(ROWS),
        alarms: vec![Vec::with_capacity(ROWS); ALARM_POINTS.len()],
        temperature: Vec::with_capacity(ROWS),
        device: Vec::with_capacity(ROWS),
    };
    let mut state = [0i64; ALARM_POINTS.len()];

    for i in 0..ROWS {
        readings
            .times
            .push(start + Duration::seconds(i as i64 * STEP_SECS));
        for (p, column) in readings.alarms.iter_mut().enumerate() {
            // Rare transitions give multi-minute alarm bursts.
            if rng.next_f64() < 0.01 {
                state[p] = 1 - state[p];
            }
            column.push(state[p]);
        }
        let phase = i as f64 / ROWS as f64 * std::f64::consts::TAU;
        readings
            .temperature
            .push(7.0 + 1.5 * phase.sin() + (rng.next_f64() - 0.5) * 0.2);
        readings
            .device
            .push(if i % 2 == 0 { "chiller-1" } else { "chiller-2" });
    }
    Ok(readings)
}

fn alarm_column(point: u32) -> String {
    format!("point_key={point}_First")
}

fn write_csv(path: &str, readings: &Readings) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;

    let mut header = vec!["time".to_string()];
    header.extend(ALARM_POINTS.iter().map(|&p| alarm_column(p)));
    header.push("supply_temp_First".into());
    header.push("device".into());
    writer.write_record(&header)?;

    for (i, t) in readings.times.iter().enumerate() {
        let time = if i == ROWS / 2 {
            "not-a-time".to_string()
        } else {
            t.format("%Y-%m-%d %H:%M:%S").to_string()
        };
        let mut record = vec![time];
        record.extend(readings.alarms.iter().map(|col| col[i].to_string()));
        record.push(format!("{:.3}", readings.temperature[i]));
        record.push(readings.device[i].to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, readings: &Readings) -> Result<()> {
    let mut fields = vec![Field::new(
        "time",
        DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
        false,
    )];
    let mut columns: Vec<ArrayRef> = vec![Arc::new(
        TimestampMillisecondArray::from(
            readings
                .times
                .iter()
                .map(|t| t.timestamp_millis())
                .collect::<Vec<_>>(),
        )
        .with_timezone("UTC"),
    )];

    for (&point, values) in ALARM_POINTS.iter().zip(&readings.alarms) {
        fields.push(Field::new(alarm_column(point), DataType::Int64, false));
        columns.push(Arc::new(Int64Array::from(values.clone())));
    }
    fields.push(Field::new("supply_temp_First", DataType::Float64, false));
    columns.push(Arc::new(Float64Array::from(readings.temperature.clone())));
    fields.push(Field::new("device", DataType::Utf8, false));
    columns.push(Arc::new(StringArray::from(readings.device.clone())));

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let readings = generate(&mut rng)?;

    write_csv("sample_modbus.csv", &readings)?;
    write_parquet("sample_modbus.parquet", &readings)?;

    println!(
        "Wrote {} readings of {} points to sample_modbus.csv and sample_modbus.parquet",
        ROWS,
        ALARM_POINTS.len() + 1
    );
    Ok(())
}
