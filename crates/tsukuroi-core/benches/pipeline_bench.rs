use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tsukuroi_core::model::EntityRef;
use tsukuroi_core::{CorrectionService, StandardParsers, StandardizingConfig};

const RELEASES: [&str; 5] = [
    "Psych.S01E05.720p.HDTV.x264-IMMERSE",
    "Show.S01E01-E03.720p.WEB-DL.DD5.1.H.264-NTb",
    "Castle.2009.S03E11.HDTV.XviD-LOL,DIMENSION",
    "The.Daily.Show.2012.03.05.HDTV.x264-LMAO",
    "Heat.1995.1080p.BluRay.x264-GRP",
];

fn bench_parse(c: &mut Criterion) {
    let parsers = StandardParsers::new().unwrap();

    c.bench_function("release_parse_single", |b| {
        b.iter(|| parsers.releases.parse(black_box(RELEASES[0])).unwrap());
    });

    c.bench_function("release_parse_batch_5", |b| {
        b.iter(|| {
            for name in &RELEASES {
                let _ = parsers.releases.parse(black_box(name)).unwrap();
            }
        });
    });

    c.bench_function("subtitle_file_parse", |b| {
        b.iter(|| {
            parsers
                .subtitle_releases
                .parse(black_box(
                    "Psych.S01E01E02.720p.HDTV.x264-IMMERSE.German.HI-SubCentral",
                ))
                .unwrap()
        });
    });
}

fn bench_standardize(c: &mut Criterion) {
    let parsers = StandardParsers::new().unwrap();
    let service = CorrectionService::standard(&StandardizingConfig::default()).unwrap();

    c.bench_function("parse_and_standardize_batch_5", |b| {
        b.iter(|| {
            for name in &RELEASES {
                let releases = parsers.releases.parse(black_box(name)).unwrap().unwrap();
                for release in &releases {
                    let _ = service.process(&EntityRef::new(release)).unwrap();
                }
            }
        });
    });
}

criterion_group!(benches, bench_parse, bench_standardize);
criterion_main!(benches);
