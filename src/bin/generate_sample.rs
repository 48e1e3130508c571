use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

const ROWS: usize = 1000;

const HEADER: [&str; 17] = [
    "Invoice ID",
    "Branch",
    "City",
    "Customer type",
    "Gender",
    "Product line",
    "Unit price",
    "Quantity",
    "Tax 5%",
    "Total",
    "Date",
    "Time",
    "Payment",
    "cogs",
    "gross margin percentage",
    "gross income",
    "Rating",
];

const STORES: [(&str, &str); 3] = [("A", "Yangon"), ("B", "Mandalay"), ("C", "Naypyitaw")];
const CUSTOMER_TYPES: [&str; 2] = ["Member", "Normal"];
const GENDERS: [&str; 2] = ["Female", "Male"];
const PRODUCT_LINES: [&str; 6] = [
    "Health and beauty",
    "Electronic accessories",
    "Home and lifestyle",
    "Sports and travel",
    "Food and beverages",
    "Fashion accessories",
];
const PAYMENTS: [&str; 3] = ["Ewallet", "Cash", "Credit card"];
const TAX_RATE: f64 = 0.05;

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

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn index(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.index(items.len())]
    }
}

struct Sale {
    invoice_id: String,
    branch: &'static str,
    city: &'static str,
    customer_type: &'static str,
    gender: &'static str,
    product_line: &'static str,
    unit_price: f64,
    quantity: i64,
    tax: f64,
    total: f64,
    date: NaiveDate,
    time: String,
    payment: &'static str,
    cogs: f64,
    gross_margin: f64,
    gross_income: f64,
    rating: f64,
}

fn round_to(v: f64, places: i32) -> f64 {
    let p = 10f64.powi(places);
    (v * p).round() / p
}

fn generate(rng: &mut SimpleRng, first_day: NaiveDate, days: i64) -> Vec<Sale> {
    (0..ROWS)
        .map(|_| {
            let (branch, city) = STORES[rng.index(STORES.len())];
            let unit_price = round_to(rng.range(10.0, 100.0), 2);
            let quantity = 1 + rng.index(10) as i64;
            let cogs = round_to(unit_price * quantity as f64, 2);
            let tax = round_to(cogs * TAX_RATE, 4);
            Sale {
                invoice_id: format!(
                    "{:03}-{:02}-{:04}",
                    rng.index(1000),
                    rng.index(100),
                    rng.index(10000)
                ),
                branch,
                city,
                customer_type: rng.pick(&CUSTOMER_TYPES),
                gender: rng.pick(&GENDERS),
                product_line: rng.pick(&PRODUCT_LINES),
                unit_price,
                quantity,
                tax,
                total: round_to(cogs + tax, 4),
                date: first_day + Duration::days(rng.index(days as usize) as i64),
                time: format!("{:02}:{:02}", 10 + rng.index(11), rng.index(60)),
                payment: rng.pick(&PAYMENTS),
                cogs,
                gross_margin: 4.761904762,
                gross_income: tax,
                rating: round_to(rng.range(4.0, 10.0), 1),
            }
        })
        .collect()
}

fn write_csv(path: &str, sales: &[Sale]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(HEADER)?;
    for s in sales {
        writer.write_record([
            s.invoice_id.clone(),
            s.branch.to_string(),
            s.city.to_string(),
            s.customer_type.to_string(),
            s.gender.to_string(),
            s.product_line.to_string(),
            s.unit_price.to_string(),
            s.quantity.to_string(),
            s.tax.to_string(),
            s.total.to_string(),
            s.date.format("%-m/%-d/%Y").to_string(),
            s.time.clone(),
            s.payment.to_string(),
            s.cogs.to_string(),
            s.gross_margin.to_string(),
            s.gross_income.to_string(),
            s.rating.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, sales: &[Sale]) -> Result<()> {
    let text = |f: fn(&Sale) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(sales.iter().map(f).collect::<Vec<_>>()))
    };
    let float = |f: fn(&Sale) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(sales.iter().map(f).collect::<Vec<_>>()))
    };
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("epoch date")?;

    let columns: Vec<ArrayRef> = vec![
        text(|s| s.invoice_id.as_str()),
        text(|s| s.branch),
        text(|s| s.city),
        text(|s| s.customer_type),
        text(|s| s.gender),
        text(|s| s.product_line),
        float(|s| s.unit_price),
        Arc::new(Int64Array::from(
            sales.iter().map(|s| s.quantity).collect::<Vec<_>>(),
        )),
        float(|s| s.tax),
        float(|s| s.total),
        Arc::new(Date32Array::from(
            sales
                .iter()
                .map(|s| (s.date - epoch).num_days() as i32)
                .collect::<Vec<_>>(),
        )),
        text(|s| s.time.as_str()),
        text(|s| s.payment),
        float(|s| s.cogs),
        float(|s| s.gross_margin),
        float(|s| s.gross_income),
        float(|s| s.rating),
    ];

    let fields: Vec<Field> = HEADER
        .iter()
        .zip(&columns)
        .map(|(name, col)| Field::new(*name, col.data_type().clone(), false))
        .collect();
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // Jan–Mar 2019, like the public supermarket sales set
    let first_day = NaiveDate::from_ymd_opt(2019, 1, 1).context("start date")?;
    let sales = generate(&mut rng, first_day, 89);

    write_csv("supermarket_sales.csv", &sales)?;
    write_parquet("supermarket_sales.parquet", &sales)?;

    println!(
        "Wrote {} sales rows to supermarket_sales.csv and supermarket_sales.parquet",
        sales.len()
    );
    Ok(())
}
