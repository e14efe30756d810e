use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

const DAYS: u32 = 365;
const PRODUCTS: [&str; 4] = ["Widget A", "Widget B", "Widget C", "Widget D"];
const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
const HEADERS: [&str; 7] = [
    "Date",
    "Product",
    "Region",
    "Sales",
    "Units",
    "Customer_Satisfaction",
    "Revenue",
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

    /// Uniform integer in `[lo, hi)`.
    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo)
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn choose<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.range(0, items.len() as u64) as usize]
    }
}

/// One day of sales.
struct Row {
    date: NaiveDate,
    product: &'static str,
    region: &'static str,
    sales: f64,
    units: f64,
    satisfaction: f64,
    revenue: f64,
}

fn generate(rng: &mut SimpleRng) -> Result<Vec<Row>> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).context("invalid start date")?;
    let rows = (0..DAYS)
        .map(|i| {
            let date = start + chrono::Days::new(i as u64);
            let product = rng.choose(&PRODUCTS);
            let region = rng.choose(&REGIONS);
            let mut sales = rng.range(50, 500) as f64;
            let units = rng.range(1, 50) as f64;
            let satisfaction = (rng.uniform(3.0, 5.0) * 100.0).round() / 100.0;
            let revenue = sales * units;

            // Holiday season boost, weekend dip, happy-customer bonus.
            if date.month() >= 11 {
                sales *= 1.5;
            }
            if date.weekday().number_from_monday() >= 6 {
                sales *= 0.7;
            }
            if satisfaction > 4.5 {
                sales *= 1.2;
            }

            Row {
                date,
                product,
                region,
                sales,
                units,
                satisfaction,
                revenue,
            }
        })
        .collect();
    Ok(rows)
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(HEADERS)?;
    for r in rows {
        writer.write_record([
            r.date.to_string(),
            r.product.to_string(),
            r.region.to_string(),
            r.sales.to_string(),
            r.units.to_string(),
            r.satisfaction.to_string(),
            r.revenue.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_xlsx(path: &Path, rows: &[Row]) -> Result<()> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let sheet = workbook.add_worksheet();

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (i, r) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        let date = ExcelDateTime::from_ymd(r.date.year() as u16, r.date.month() as u8, r.date.day() as u8)?;
        sheet.write_datetime_with_format(row, 0, &date, &date_format)?;
        sheet.write_string(row, 1, r.product)?;
        sheet.write_string(row, 2, r.region)?;
        sheet.write_number(row, 3, r.sales)?;
        sheet.write_number(row, 4, r.units)?;
        sheet.write_number(row, 5, r.satisfaction)?;
        sheet.write_number(row, 6, r.revenue)?;
    }

    workbook.save(path).context("saving workbook")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng)?;

    let csv_path = out_dir.join("fake_sales_data.csv");
    let xlsx_path = out_dir.join("fake_sales_data.xlsx");
    write_csv(&csv_path, &rows)?;
    write_xlsx(&xlsx_path, &rows)?;

    println!(
        "Wrote {} rows to {} and {}",
        rows.len(),
        csv_path.display(),
        xlsx_path.display()
    );
    Ok(())
}
