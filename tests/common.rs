#![allow(dead_code)]

use calamine::{Data, Range};
use chrono::NaiveDate;
use dolphin_dashboard::data::{build_table, schema, LoaderError, TableSource};
use polars::prelude::DataFrame;
use rust_xlsxwriter::Workbook;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn kpi_headers() -> Vec<&'static str> {
    vec![
        schema::DATE,
        schema::GROSS_EARNINGS,
        schema::NET_PROFIT,
        schema::TRIP_COUNT,
        schema::DISTANCE,
        schema::EARNINGS_PER_KM,
    ]
}

/// One trip row in `kpi_headers` order.
pub fn trip_row(day: &str, gross: f64, net: f64, trips: f64, km: f64, per_km: f64) -> Vec<Data> {
    vec![
        Data::String(day.to_string()),
        Data::Float(gross),
        Data::Float(net),
        Data::Float(trips),
        Data::Float(km),
        Data::Float(per_km),
    ]
}

/// Worksheet range with a header row followed by `rows`.
pub fn sheet(headers: &[&str], rows: &[Vec<Data>]) -> Range<Data> {
    let width = headers.len().max(rows.iter().map(Vec::len).max().unwrap_or(0)) as u32;
    let mut range = Range::new((0, 0), (rows.len() as u32, width.saturating_sub(1)));

    for (c, header) in headers.iter().enumerate() {
        range.set_value((0, c as u32), Data::String(header.to_string()));
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            range.set_value((r as u32 + 1, c as u32), cell.clone());
        }
    }
    range
}

pub fn trip_table(rows: &[Vec<Data>]) -> DataFrame {
    build_table(&sheet(&kpi_headers(), rows)).expect("valid trip table")
}

/// The June 2024 rows used across the tests.
pub fn june_rows() -> Vec<Vec<Data>> {
    vec![
        trip_row("2024-06-03", 100.0, 60.0, 5.0, 40.0, 2.5),
        trip_row("2024-06-04", 150.0, 90.0, 7.0, 55.0, 2.7),
        trip_row("2024-06-10", 200.0, 130.0, 6.0, 50.0, 4.0),
    ]
}

/// June 2024 plus rows from other months that must be filtered out.
pub fn scenario_table() -> DataFrame {
    let mut rows = june_rows();
    rows.push(trip_row("2024-05-31", 80.0, 40.0, 4.0, 30.0, 2.6));
    rows.push(trip_row("2023-06-15", 90.0, 45.0, 3.0, 35.0, 2.5));
    trip_table(&rows)
}

/// Serialize rows as an `.xlsx` workbook.
pub fn xlsx_bytes(headers: &[&str], rows: &[Vec<Data>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (c, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, c as u16, *header)
            .expect("write header");
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32 + 1, c as u16);
            match cell {
                Data::String(s) => worksheet.write_string(r, c, s.as_str()),
                Data::Float(f) => worksheet.write_number(r, c, *f),
                Data::Int(i) => worksheet.write_number(r, c, *i as f64),
                Data::Bool(b) => worksheet.write_boolean(r, c, *b),
                Data::Empty => continue,
                other => panic!("unsupported test cell {:?}", other),
            }
            .expect("write cell");
        }
    }

    workbook.save_to_buffer().expect("serialize workbook")
}

/// In-memory source counting how often it is fetched.
pub struct BytesSource {
    bytes: Option<Vec<u8>>,
    pub fetches: Arc<AtomicUsize>,
}

impl BytesSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Some(bytes),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source whose every fetch fails with HTTP 503.
    pub fn failing() -> Self {
        Self {
            bytes: None,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl TableSource for BytesSource {
    fn fetch(&self) -> Result<Vec<u8>, LoaderError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.bytes.clone().ok_or(LoaderError::HttpStatus(503))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Serve one HTTP connection on 127.0.0.1 with a raw `response`. Returns the URL.
pub fn serve_once(response: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let addr = listener.local_addr().expect("local addr");

    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
        let _ = stream.write_all(&response);
        let _ = stream.flush();
    });

    format!("http://{}/uc?id=planilha", addr)
}

pub fn http_response(status: &str, body: &[u8]) -> Vec<u8> {
    let mut response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);
    response
}
