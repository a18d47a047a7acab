#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv_tidy::dataset::RawTable;
use tempfile::{TempDir, tempdir};

pub const MESSY_HEADERS: [&str; 15] = [
    "customer_name",
    "email",
    "phone_number",
    "street_address",
    "city",
    "zip_code",
    "age",
    "department",
    "job_title",
    "company_name",
    "transaction_date",
    "amount",
    "revenue",
    "commission_rate",
    "is_active",
];

pub const MESSY_ROWS: usize = 50;

const FIRST_NAMES: [&str; 5] = ["John", "Jane", "Maria", "Wei", "Ahmed"];
const LAST_NAMES: [&str; 5] = ["Smith", "Doe", "Garcia", "Chen", "Khan"];
const STREETS: [&str; 5] = [
    "main st.",
    "Oak Avenue",
    "elm  street",
    "Sunset Blvd",
    "river rd",
];
const CITIES: [&str; 4] = ["Portland", "Boston", "Austin", "Denver"];
const DEPARTMENTS: [&str; 4] = ["Sales", "Engineering", "Marketing", "Support"];
const TITLES: [&str; 6] = ["Dr.", "Prof.", "Mr.", "Ms.", "Mgr.", "Engineer"];
const COMPANIES: [&str; 4] = ["ACME Corp", "Globex LLC", "Initech", "UMBRELLA co"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const FLAGS: [&str; 7] = ["yes", "no", "Y", "N", "true", "0", ""];

/// One deterministic row of the synthetic messy dataset.
pub fn messy_row(i: usize) -> Vec<String> {
    let first = FIRST_NAMES[i % 5];
    let last = LAST_NAMES[(i / 5) % 5];
    let customer_name = if i % 3 == 0 {
        format!(" {first}   {last}")
    } else {
        format!("{first} {last}")
    };
    let email = match i {
        _ if i % 10 == 3 => "N/A".to_string(),
        _ if i % 10 == 7 => "unknown".to_string(),
        _ if i % 17 == 0 => String::new(),
        _ => format!("{}.{}{i}@example.com", first.to_lowercase(), last.to_lowercase()),
    };
    let phone_number = match i {
        _ if i % 9 == 4 => "N/A".to_string(),
        _ if i % 11 == 5 => "n/a".to_string(),
        _ => format!("555-{:03}-{:04}", 100 + i, (1000 + i * 37) % 10000),
    };
    let street_address = format!("{} {}", 10 + i * 3, STREETS[i % 5]);
    let city = match i {
        _ if i % 8 == 2 => "N/A",
        _ if i % 8 == 5 => "None",
        _ if i % 13 == 6 => "unknown",
        _ => CITIES[i % 4],
    }
    .to_string();
    let zip_code = if i % 12 == 3 {
        "N/A".to_string()
    } else {
        format!("{:05}", 10000 + i * 123)
    };
    let age = match i {
        _ if i % 10 == 9 => "999".to_string(),
        _ if i % 14 == 1 => "-5".to_string(),
        _ if i % 16 == 8 => String::new(),
        _ => (18 + (i * 7) % 60).to_string(),
    };
    let department = match i {
        _ if i % 9 == 2 => "N/A",
        _ if i % 15 == 11 => "unknown",
        _ => DEPARTMENTS[i % 4],
    }
    .to_string();

    let (day, month, year) = (1 + i % 28, 1 + i % 12, 2023 + i % 2);
    let transaction_date = if i % 20 == 13 {
        String::new()
    } else {
        match i % 6 {
            0 => format!("{day:02}-{month:02}-{year}"),
            1 => format!("{} {day:02}, {year}", MONTHS[month - 1]),
            2 => format!("{year}-{month:02}-{day:02}"),
            3 => format!("{year}/{month:02}/{day:02}"),
            4 => format!("{day:02}/{month:02}/{year}"),
            _ => format!("{month:02}/{day:02}/{year}"),
        }
    };

    let (a, b, c, x) = (1 + i % 9, (i * 37) % 1000, (i * 13) % 100, 100 + i * 17);
    let amount = match i % 4 {
        0 => format!("{a}.{b:03},{c:02}"),
        1 => format!("{x}.{c:02}"),
        2 => format!("{x},{c}"),
        _ => x.to_string(),
    };
    let revenue = match i % 5 {
        0 => format!("${a},{b:03}.{c:02}"),
        1 => format!("€{x}"),
        2 => format!("£{x}.50"),
        3 => format!("{x} USD"),
        _ => x.to_string(),
    };
    let p = 5 + i % 20;
    let commission_rate = match i % 3 {
        0 => format!("{p}%"),
        1 => format!("0.{p:02}"),
        _ => p.to_string(),
    };

    vec![
        customer_name,
        email,
        phone_number,
        street_address,
        city,
        zip_code,
        age,
        department,
        TITLES[i % 6].to_string(),
        COMPANIES[i % 4].to_string(),
        transaction_date,
        amount,
        revenue,
        commission_rate,
        FLAGS[i % 7].to_string(),
    ]
}

pub fn messy_table() -> RawTable {
    RawTable::new(
        MESSY_HEADERS.iter().map(|h| h.to_string()).collect(),
        (0..MESSY_ROWS).map(messy_row).collect(),
    )
    .expect("synthetic table is rectangular")
}

/// The synthetic dataset serialized as comma-delimited CSV.
pub fn messy_csv() -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(MESSY_HEADERS).expect("write headers");
    for i in 0..MESSY_ROWS {
        writer.write_record(messy_row(i)).expect("write row");
    }
    let bytes = writer.into_inner().expect("flush csv");
    String::from_utf8(bytes).expect("utf-8 csv")
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    pub fn write_messy_csv(&self) -> PathBuf {
        self.write("messy.csv", &messy_csv())
    }
}
