use std::fs;
use std::path::Path;

use image::{GrayImage, Luma, Rgb, RgbImage};
use tempfile::tempdir;

use photomask::{run, CompositeMode, PairOutcome, RunConfig};

fn write_color(path: &Path, w: u32, h: u32, rgb: [u8; 3]) {
    RgbImage::from_pixel(w, h, Rgb(rgb))
        .save(path)
        .expect("failed to write test image");
}

fn write_gray(path: &Path, w: u32, h: u32, value: u8) {
    GrayImage::from_pixel(w, h, Luma([value]))
        .save(path)
        .expect("failed to write test mask");
}

fn config(input: &Path, output: &Path, mode: CompositeMode) -> RunConfig {
    RunConfig {
        input_dir: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        mode,
    }
}

#[test]
fn cutout_run_writes_opaque_result_with_original_colors() {
    let dir = tempdir().expect("failed to create temp dir");
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input).unwrap();

    write_color(&input.join("x_main.png"), 10, 10, [40, 90, 160]);
    write_gray(&input.join("x_mask.png"), 10, 10, 255);

    let report = run(&config(&input, &output, CompositeMode::Cutout)).unwrap();
    assert!(!report.nothing_to_do);
    assert_eq!(report.processed(), 1);
    assert_eq!(report.succeeded(), 1);

    let result = image::open(output.join("x_cutout.png")).unwrap().to_rgba8();
    assert_eq!(result.dimensions(), (10, 10));
    for px in result.pixels() {
        assert_eq!(px.0, [40, 90, 160, 255]);
    }
}

#[test]
fn darken_run_writes_channelwise_minimum() {
    let dir = tempdir().expect("failed to create temp dir");
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input).unwrap();

    write_color(&input.join("x_main.png"), 6, 6, [100, 150, 200]);
    write_color(&input.join("x_mask.png"), 6, 6, [120, 120, 120]);

    let report = run(&config(&input, &output, CompositeMode::Darken)).unwrap();
    assert_eq!(report.succeeded(), 1);

    let result = image::open(output.join("x_darken.png")).unwrap().to_rgba8();
    for px in result.pixels() {
        assert_eq!(px.0, [100, 120, 120, 255]);
    }
}

#[test]
fn mismatched_mask_dimensions_are_stretched_to_main() {
    let dir = tempdir().expect("failed to create temp dir");
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input).unwrap();

    write_color(&input.join("x_main.png"), 16, 12, [10, 20, 30]);
    write_gray(&input.join("x_mask.png"), 4, 4, 255);

    let report = run(&config(&input, &output, CompositeMode::Cutout)).unwrap();
    assert_eq!(report.succeeded(), 1);

    let result = image::open(output.join("x_cutout.png")).unwrap().to_rgba8();
    assert_eq!(result.dimensions(), (16, 12));
    for px in result.pixels() {
        assert_eq!(px[3], 255);
    }
}

#[test]
fn unmatched_main_is_reported_and_writes_nothing() {
    let dir = tempdir().expect("failed to create temp dir");
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input).unwrap();

    write_color(&input.join("lone_main.png"), 8, 8, [1, 2, 3]);
    write_gray(&input.join("other_mask.png"), 8, 8, 255);

    let report = run(&config(&input, &output, CompositeMode::Cutout)).unwrap();
    assert_eq!(report.unmatched(), 1);
    assert_eq!(report.processed(), 0);
    assert!(matches!(report.pairs[0].outcome, PairOutcome::NoMaskFound));
    assert_eq!(fs::read_dir(&output).unwrap().count(), 0);
}

#[test]
fn corrupt_mask_fails_its_pair_but_batch_continues() {
    let dir = tempdir().expect("failed to create temp dir");
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input).unwrap();

    write_color(&input.join("good_main.png"), 8, 8, [5, 6, 7]);
    write_gray(&input.join("good_mask.png"), 8, 8, 255);
    write_color(&input.join("bad_main.png"), 8, 8, [5, 6, 7]);
    fs::write(input.join("bad_mask.png"), b"not a png at all").unwrap();

    let report = run(&config(&input, &output, CompositeMode::Cutout)).unwrap();
    assert_eq!(report.processed(), 2);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);

    let bad = report.pairs.iter().find(|p| p.key == "bad").unwrap();
    match &bad.outcome {
        PairOutcome::Failed(e) => assert!(e.to_string().contains("bad_mask.png")),
        other => panic!("expected decode failure, got {other:?}"),
    }
    assert!(output.join("good_cutout.png").exists());
    assert!(!output.join("bad_cutout.png").exists());
}

#[test]
fn empty_partitions_are_a_no_op() {
    let dir = tempdir().expect("failed to create temp dir");
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input).unwrap();

    // Mains without any masks at all.
    write_color(&input.join("x_main.png"), 4, 4, [0, 0, 0]);
    fs::write(input.join("notes.txt"), b"unrelated").unwrap();

    let report = run(&config(&input, &output, CompositeMode::Cutout)).unwrap();
    assert!(report.nothing_to_do);
    assert!(report.pairs.is_empty());
    assert!(report.summary().contains("nothing to do"));
}

#[test]
fn extraction_writes_one_object_file_per_region() {
    let dir = tempdir().expect("failed to create temp dir");
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input).unwrap();

    write_color(&input.join("scene_main.png"), 20, 20, [200, 10, 10]);
    let mut mask = GrayImage::new(20, 20);
    for (left, top) in [(2u32, 2u32), (12, 12)] {
        for y in top..top + 5 {
            for x in left..left + 5 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
    }
    mask.save(input.join("scene_mask.png")).unwrap();

    let report = run(&config(&input, &output, CompositeMode::ExtractObjects)).unwrap();
    assert_eq!(report.succeeded(), 1);
    match report.pairs[0].outcome {
        PairOutcome::ObjectsWritten(count) => assert_eq!(count, 2),
        ref other => panic!("expected objects written, got {other:?}"),
    }

    for n in 1..=2 {
        let object = image::open(output.join(format!("object_{n}.png")))
            .unwrap()
            .to_rgba8();
        assert_eq!(object.dimensions(), (5, 5));
        for px in object.pixels() {
            assert_eq!(px.0, [200, 10, 10, 255]);
        }
    }
    assert!(!output.join("object_3.png").exists());
}

#[test]
fn extraction_object_numbering_spans_pairs() {
    let dir = tempdir().expect("failed to create temp dir");
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input).unwrap();

    for base in ["a", "b"] {
        write_color(&input.join(format!("{base}_main.png")), 10, 10, [9, 9, 9]);
        let mut mask = GrayImage::new(10, 10);
        for y in 3..7 {
            for x in 3..7 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        mask.save(input.join(format!("{base}_mask.png"))).unwrap();
    }

    let report = run(&config(&input, &output, CompositeMode::ExtractObjects)).unwrap();
    assert_eq!(report.succeeded(), 2);
    assert!(output.join("object_1.png").exists());
    assert!(output.join("object_2.png").exists());
}

#[test]
fn output_directory_is_created_with_parents() {
    let dir = tempdir().expect("failed to create temp dir");
    let input = dir.path().join("in");
    let output = dir.path().join("deep/nested/out");
    fs::create_dir(&input).unwrap();

    write_color(&input.join("x_main.png"), 4, 4, [1, 1, 1]);
    write_gray(&input.join("x_mask.png"), 4, 4, 128);

    let report = run(&config(&input, &output, CompositeMode::Cutout)).unwrap();
    assert_eq!(report.succeeded(), 1);
    assert!(output.join("x_cutout.png").exists());
}

#[test]
fn unreadable_input_directory_aborts_the_run() {
    let dir = tempdir().expect("failed to create temp dir");
    let missing = dir.path().join("does-not-exist");
    let output = dir.path().join("out");

    let result = run(&config(&missing, &output, CompositeMode::Cutout));
    assert!(result.is_err());
}
