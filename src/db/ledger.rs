use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};

use chrono::NaiveDate;
use csv::{ByteRecord, ReaderBuilder, StringRecord, WriterBuilder};
use tracing::debug;

use super::{write_atomic, Storage};
use crate::models::{FinancialRecord, StoredTransaction};
use crate::utils::format::{clean_numeric, parse_date, DATE_FORMAT};
use crate::utils::LedgerError;

/// Ledger header, in column order
pub const HEADERS: [&str; 10] = [
    "Tanggal & Jam",
    "Total Orderan",
    "Komisi (15%)",
    "Tabungan Saldo (10%)",
    "Tabungan BBM (10%)",
    "Tabungan Oli (10%)",
    "Pendapatan Bersih",
    "Pendapatan Siap Pakai",
    "Jenis Orderan",
    "Tanggal Custom",
];

const TIMESTAMP: usize = 0;
const TOTAL_ORDER: usize = 1;
const COMMISSION: usize = 2;
const SALDO_SAVINGS: usize = 3;
const BBM_SAVINGS: usize = 4;
const OLI_SAVINGS: usize = 5;
const NET_INCOME: usize = 6;
const USABLE_INCOME: usize = 7;
const ORDER_TYPE: usize = 8;
const CUSTOM_DATE: usize = 9;

pub const DEFAULT_ORDER_TYPE: &str = "Regular";

fn ledger_is_empty(storage: &Storage) -> bool {
    match fs::metadata(storage.ledger_path()) {
        Ok(meta) => meta.is_file() && meta.len() == 0,
        Err(_) => true,
    }
}

/// Write the header if the ledger is missing or empty. Returns true when a new file was written.
pub fn initialize_ledger(storage: &Storage) -> Result<bool, LedgerError> {
    if !ledger_is_empty(storage) {
        return Ok(false);
    }

    let mut writer = WriterBuilder::new().from_path(storage.ledger_path())?;
    writer.write_record(HEADERS)?;
    writer.flush()?;
    Ok(true)
}

/// Add the custom date column to ledgers written before it existed.
/// Returns true when the file was rewritten.
pub fn migrate_ledger(storage: &Storage) -> Result<bool, LedgerError> {
    if ledger_is_empty(storage) {
        return Ok(false);
    }

    let mut rows = read_raw_rows(storage)?;
    let Some(header) = rows.first_mut() else {
        return Ok(false);
    };
    if header
        .iter()
        .any(|h| h.trim_ascii() == HEADERS[CUSTOM_DATE].as_bytes())
    {
        return Ok(false);
    }

    header.push_field(HEADERS[CUSTOM_DATE].as_bytes());
    let width = header.len();
    for row in rows.iter_mut().skip(1) {
        while row.len() < width {
            row.push_field(b"");
        }
    }

    write_raw_rows(storage, &rows)?;
    Ok(true)
}

/// Append a single record to the ledger
pub fn append_record(storage: &Storage, record: &FinancialRecord) -> Result<(), LedgerError> {
    initialize_ledger(storage)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(storage.ledger_path())?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(record.to_row())?;
    writer.flush()?;

    debug!("Appended {} order of {}", record.order_type, record.total_order);
    Ok(())
}

/// Load every data row. `today` is the display date for rows without a usable date.
///
/// Cells that are not valid UTF-8 are decoded lossily, so every data row keeps its position.
pub fn load_all(storage: &Storage, today: NaiveDate) -> Result<Vec<StoredTransaction>, LedgerError> {
    if ledger_is_empty(storage) {
        return Ok(Vec::new());
    }

    let rows = read_raw_rows(storage)?;
    let Some((header, body)) = rows.split_first() else {
        return Ok(Vec::new());
    };

    let columns = LedgerColumns::resolve(&StringRecord::from_byte_record_lossy(header.clone()));
    Ok(body
        .iter()
        .filter(|row| is_data_row(row))
        .map(|row| columns.parse(&StringRecord::from_byte_record_lossy(row.clone()), today))
        .collect())
}

/// Delete rows by their position in `load_all`'s output.
///
/// Out-of-range and duplicate indices are ignored. Returns the number of rows
/// removed; the file is only rewritten when that is non-zero. Every other row
/// is written back byte for byte.
pub fn delete_records(storage: &Storage, indices: &[usize]) -> Result<usize, LedgerError> {
    if ledger_is_empty(storage) {
        return Ok(0);
    }

    let rows = read_raw_rows(storage)?;
    let Some((header, body)) = rows.split_first() else {
        return Ok(0);
    };

    let data_rows: Vec<&ByteRecord> = body.iter().filter(|row| is_data_row(row)).collect();
    let targets: BTreeSet<usize> = indices
        .iter()
        .copied()
        .filter(|&i| i < data_rows.len())
        .collect();
    if targets.is_empty() {
        return Ok(0);
    }

    let mut kept = Vec::with_capacity(data_rows.len() + 1 - targets.len());
    kept.push(header.clone());
    for (i, row) in data_rows.into_iter().enumerate() {
        if !targets.contains(&i) {
            kept.push(row.clone());
        }
    }

    write_raw_rows(storage, &kept)?;
    debug!("Deleted ledger rows {:?}", targets);
    Ok(targets.len())
}

fn read_raw_rows(storage: &Storage) -> Result<Vec<ByteRecord>, LedgerError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(storage.ledger_path())?;

    let rows = reader.byte_records().collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn write_raw_rows(storage: &Storage, rows: &[ByteRecord]) -> Result<(), LedgerError> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());
    for row in rows {
        writer.write_byte_record(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    write_atomic(storage.ledger_path(), &bytes)
}

/// Blank rows and repeated header rows are not data
fn is_data_row(row: &ByteRecord) -> bool {
    if row.iter().all(|field| field.trim_ascii().is_empty()) {
        return false;
    }
    row.get(TIMESTAMP).map(<[u8]>::trim_ascii) != Some(HEADERS[TIMESTAMP].as_bytes())
}

/// Maps logical columns onto positions in the file's actual header
struct LedgerColumns {
    positions: [Option<usize>; HEADERS.len()],
}

impl LedgerColumns {
    fn resolve(header: &StringRecord) -> Self {
        let positions = HEADERS.map(|name| header.iter().position(|h| h.trim() == name));
        LedgerColumns { positions }
    }

    fn cell<'a>(&self, row: &'a StringRecord, column: usize) -> &'a str {
        self.positions[column]
            .and_then(|i| row.get(i))
            .map(str::trim)
            .unwrap_or("")
    }

    fn amount(&self, row: &StringRecord, column: usize) -> f64 {
        clean_numeric(self.cell(row, column))
    }

    fn parse(&self, row: &StringRecord, today: NaiveDate) -> StoredTransaction {
        let timestamp = self.cell(row, TIMESTAMP).to_string();
        let custom_date = self.cell(row, CUSTOM_DATE).to_string();

        let display_date = if !custom_date.is_empty() {
            custom_date.clone()
        } else {
            timestamp
                .split(' ')
                .next()
                .and_then(parse_date)
                .unwrap_or(today)
                .format(DATE_FORMAT)
                .to_string()
        };

        let order_type = match self.cell(row, ORDER_TYPE) {
            "" => DEFAULT_ORDER_TYPE.to_string(),
            other => other.to_string(),
        };

        StoredTransaction {
            timestamp,
            total_order: self.amount(row, TOTAL_ORDER),
            commission: self.amount(row, COMMISSION),
            saldo_savings: self.amount(row, SALDO_SAVINGS),
            bbm_savings: self.amount(row, BBM_SAVINGS),
            oli_savings: self.amount(row, OLI_SAVINGS),
            net_income: self.amount(row, NET_INCOME),
            usable_income: self.amount(row, USABLE_INCOME),
            order_type,
            custom_date,
            display_date,
        }
    }
}
