use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

/// Yearly count around `base`, growing by `trend` per year, ±20 % noise.
fn yearly_count(base: f64, trend: f64, offset: usize, rng: &mut SimpleRng) -> f64 {
    let expected = base + trend * offset as f64;
    let noise = 0.8 + 0.4 * rng.next_f64();
    (expected * noise).round().max(0.0)
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let years: Vec<i64> = (2015..=2024).collect();
    // (column, base count, yearly trend)
    let roles = [
        ("1º PROMOTOR DE JUSTIÇA", 420.0, 35.0),
        ("2º PROMOTOR DE JUSTIÇA", 380.0, 20.0),
        ("3º PROMOTOR DE JUSTIÇA", 510.0, -10.0),
        ("Promotor Substituto", 90.0, 15.0),
    ];
    let other = ("Servidores", 1200.0, 40.0);

    let mut columns: Vec<(String, Vec<f64>)> = Vec::new();
    for &(name, base, trend) in roles.iter().chain(std::iter::once(&other)) {
        let values = (0..years.len())
            .map(|i| yearly_count(base, trend, i, &mut rng))
            .collect();
        columns.push((name.to_string(), values));
    }

    // ---- CSV ----
    let csv_path = "cargos_ano.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    let mut header = vec!["Ano".to_string()];
    header.extend(columns.iter().map(|(name, _)| name.clone()));
    writer.write_record(&header).expect("Failed to write header");
    for (i, year) in years.iter().enumerate() {
        let mut record = vec![year.to_string()];
        record.extend(columns.iter().map(|(_, values)| values[i].to_string()));
        writer.write_record(&record).expect("Failed to write row");
    }
    // A row the loader is expected to drop.
    let mut footer = vec!["Total".to_string()];
    footer.extend(columns.iter().map(|(_, values)| values.iter().sum::<f64>().to_string()));
    writer.write_record(&footer).expect("Failed to write footer");
    writer.flush().expect("Failed to flush CSV");

    // ---- Parquet ----
    let mut fields = vec![Field::new("Ano", DataType::Int64, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(Int64Array::from(years.clone()))];
    for (name, values) in &columns {
        fields.push(Field::new(name, DataType::Float64, false));
        arrays.push(Arc::new(Float64Array::from(values.clone())));
    }
    fields.push(Field::new("Observação", DataType::Utf8, true));
    arrays.push(Arc::new(StringArray::from(
        years
            .iter()
            .map(|y| (y % 4 == 0).then_some("ano bissexto"))
            .collect::<Vec<_>>(),
    )));

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).expect("Failed to create RecordBatch");

    let parquet_path = "cargos_ano.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} years × {} columns to {csv_path} and {parquet_path}",
        years.len(),
        columns.len()
    );
}
