use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use csvstream::csv::CsvParser;
use csvstream::{CsvReader, CsvWriter};
use tempfile::NamedTempFile;

fn write_file(path: &std::path::Path, size: usize) {
    let mut writer = CsvWriter::create(path).unwrap();
    writer.write_row(&["ID", "Name", "Notes"]).unwrap();
    for i in 0..size {
        writer
            .write_row(&[
                i.to_string(),
                format!("Name_{}", i),
                format!("line one, {}\nline \"two\"", i * 100),
            ])
            .unwrap();
    }
    writer.save().unwrap();
}

fn benchmark_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");

    for size in [100, 1000, 10000, 100000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let temp = NamedTempFile::new().unwrap();
                write_file(temp.path(), size);
            });
        });
    }

    group.finish();
}

fn benchmark_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");

    for size in [1000, 10000, 100000].iter() {
        // Prepare test file
        let temp = NamedTempFile::new().unwrap();
        write_file(temp.path(), *size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let reader = CsvReader::open(temp.path()).unwrap();
                for record in reader {
                    black_box(record.unwrap());
                }
            });
        });
    }

    group.finish();
}

fn benchmark_tokenize(c: &mut Criterion) {
    let line = r#"42,"Smith, John","said \"hi\"",,plain text,"""quoted"""#;
    c.bench_function("tokenize_single_line", |b| {
        let mut parser = CsvParser::default();
        b.iter(|| black_box(parser.tokenize_single(Some(black_box(line))).unwrap()));
    });
}

criterion_group!(benches, benchmark_write, benchmark_read, benchmark_tokenize);
criterion_main!(benches);
