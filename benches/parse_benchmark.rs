//! Benchmarks for export parsing and row selection.
//!
//! Run with: cargo bench
//!
//! Synthetic exports mimic the scanner's XML Spreadsheet output, with inline
//! font markup in every cell.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::{Cursor, Write};
use vulnmerge::aggregate::select_rows;
use vulnmerge::filter::RowFilter;
use vulnmerge::spreadsheet::parse;

/// Creates a synthetic export with a header row and `row_count` finding rows.
fn create_test_export(row_count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Workbook xmlns="urn:schemas-microsoft-com:office:spreadsheet"
 xmlns:ss="urn:schemas-microsoft-com:office:spreadsheet"
 xmlns:html="http://www.w3.org/TR/REC-html40">
 <Worksheet ss:Name="Report">
  <Table>
   <Row><Cell><Data ss:Type="String">Задача</Data></Cell><Cell><Data ss:Type="String">IP-адрес</Data></Cell></Row>"#,
    );

    for i in 0..row_count {
        xml.push_str("\n   <Row>");
        xml.push_str(&format!(
            r#"<Cell><Data ss:Type="String">Task{}</Data></Cell>"#,
            i
        ));
        xml.push_str(&format!(
            r#"<Cell><ss:Data ss:Type="String"><html:Font html:Color="red">10.0.{}.{}</html:Font></ss:Data></Cell>"#,
            i / 256,
            i % 256
        ));
        for col in 2..17 {
            xml.push_str(&format!(
                r#"<Cell><Data ss:Type="String">  value {} for column {}  </Data></Cell>"#,
                i, col
            ));
        }
        xml.push_str("</Row>");
    }

    xml.push_str(
        r#"
  </Table>
 </Worksheet>
</Workbook>"#,
    );
    xml
}

/// Packs one export into a ZIP archive.
fn create_test_archive(row_count: usize) -> Vec<u8> {
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    zip.start_file("report/export.xml", options).unwrap();
    zip.write_all(create_test_export(row_count).as_bytes())
        .unwrap();
    zip.finish().unwrap().into_inner()
}

/// Benchmark Spreadsheet-XML parsing at various sizes.
fn bench_export_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_parsing");

    for row_count in [10, 100, 1000, 5000].iter() {
        let data = create_test_export(*row_count);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", row_count), &data, |b, data| {
            b.iter(|| {
                let _ = parse(black_box(data.as_bytes()));
            });
        });
    }

    group.finish();
}

/// Benchmark normalization and filtering of parsed rows.
fn bench_row_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_selection");
    let filter = RowFilter::default();

    for row_count in [10, 100, 1000].iter() {
        let raw = parse(create_test_export(*row_count).as_bytes()).unwrap();

        group.bench_with_input(BenchmarkId::new("rows", row_count), &raw, |b, raw| {
            b.iter(|| {
                let _ = select_rows(black_box(raw), &filter);
            });
        });
    }

    group.finish();
}

/// Benchmark archive extraction into a scratch directory.
fn bench_archive_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("archive_extraction");

    for row_count in [100, 1000].iter() {
        let data = create_test_archive(*row_count);
        let dir = tempfile::tempdir().unwrap();

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", row_count), &data, |b, data| {
            b.iter(|| {
                let _ = vulnmerge::archive::extract_from_reader(
                    Cursor::new(black_box(data.as_slice())),
                    dir.path(),
                );
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_export_parsing,
    bench_row_selection,
    bench_archive_extraction,
);
criterion_main!(benches);
