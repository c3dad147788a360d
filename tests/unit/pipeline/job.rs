use std::{
    cell::Cell,
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use image::{Rgb, RgbImage, Rgba};

use super::*;
use crate::template::model::{Align, CanvasSpec, PhotoBox, TextBlock};

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "goodiecard_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn template(boxes: usize) -> Template {
    Template {
        canvas: CanvasSpec {
            width: 60,
            height: 40,
            background_color: "#ffffff".to_owned(),
            template_path: None,
        },
        photo_boxes: (0..boxes)
            .map(|i| PhotoBox {
                x: 5 + 25 * i as i32,
                y: 5,
                width: 20,
                height: 20,
                border_radius: 0,
            })
            .collect(),
        text_blocks: BTreeMap::new(),
        overlays: Vec::new(),
    }
}

fn job(photos: Vec<PathBuf>) -> Job {
    Job {
        recipient_name: "Alex".to_owned(),
        photos,
        ..Job::default()
    }
}

fn plain() -> RenderOptions {
    RenderOptions {
        auto_color: false,
        photo_scale: 1.0,
        ..RenderOptions::default()
    }
}

struct Counting(Cell<usize>);

impl SubjectIsolator for Counting {
    fn isolate(&self, image: &RgbaImage) -> CardResult<RgbaImage> {
        self.0.set(self.0.get() + 1);
        Ok(image.clone())
    }
}

#[test]
fn defaults_match_cli_free_library_use() {
    let o = RenderOptions::default();
    assert!(o.auto_color);
    assert!(!o.dry_run);
    assert!(!o.remove_bg);
    assert_eq!(o.font_scale, 1.0);
    assert_eq!(o.photo_scale, 1.3);
}

#[test]
fn photos_without_boxes_is_config_error() {
    let err = render_card(
        &job(vec![PathBuf::from("a.png")]),
        &template(0),
        &plain(),
        &crate::render::isolate::Passthrough,
    )
    .unwrap_err();
    assert!(err.is_config(), "{err}");
}

#[test]
fn card_without_photos_renders_background() {
    let card = render_card(&job(vec![]), &template(0), &plain(), &crate::render::isolate::Passthrough)
        .unwrap();
    assert_eq!(card.image.dimensions(), (60, 40));
    assert!(card.image.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    assert_eq!(card.file_stem, "Alex_0");
}

#[test]
fn missing_photos_still_advance_the_slot() {
    let photos = vec![PathBuf::from("/no/such/a.png"), PathBuf::from("/no/such/b.png")];
    let card = render_card(&job(photos), &template(2), &plain(), &crate::render::isolate::Passthrough)
        .unwrap();
    assert_eq!(card.file_stem, "Alex_1");
    assert_eq!(card.image.get_pixel(10, 10).0, [255, 255, 255, 255]);
}

#[test]
fn extra_photos_are_ignored_by_position() {
    let dir = temp_dir("job_excess");
    std::fs::create_dir_all(&dir).unwrap();
    let red = dir.join("red.png");
    let green = dir.join("green.png");
    RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255])).save(&red).unwrap();
    RgbaImage::from_pixel(8, 8, Rgba([0, 255, 0, 255])).save(&green).unwrap();

    let card = render_card(
        &job(vec![red, green.clone(), green]),
        &template(1),
        &plain(),
        &crate::render::isolate::Passthrough,
    )
    .unwrap();
    assert_eq!(card.file_stem, "Alex_0");
    assert_eq!(card.image.get_pixel(15, 15).0, [255, 0, 0, 255]);
    assert!(card.image.pixels().all(|p| p.0 != [0, 255, 0, 255]));

    let _ = std::fs::remove_dir_all(&dir);
}

#[derive(Clone, Default)]
struct LogBuf(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for LogBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn extra_photos_log_a_warning() {
    let dir = temp_dir("job_excess_warn");
    std::fs::create_dir_all(&dir).unwrap();
    let red = dir.join("red.png");
    RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255])).save(&red).unwrap();

    let logs = LogBuf::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, || {
        render_card(
            &job(vec![red.clone(), red.clone(), red.clone()]),
            &template(1),
            &plain(),
            &crate::render::isolate::Passthrough,
        )
    });
    assert!(result.is_ok());

    let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(text.contains("WARN"), "{text}");
    assert!(text.contains("more photos than boxes"), "{text}");
    assert!(text.contains("photos=3"), "{text}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn font_scale_does_not_leak_into_shared_template() {
    let mut tpl = template(0);
    tpl.text_blocks.insert(
        "greeting".to_owned(),
        TextBlock {
            text: "Hi {recipient_name}".to_owned(),
            x: 0,
            y: 0,
            font_path: None,
            size: 16,
            color: "#000000".to_owned(),
            align: Align::Left,
            max_width: None,
        },
    );
    let before = tpl.clone();
    let opts = RenderOptions {
        font_scale: 2.0,
        ..plain()
    };
    render_card(&job(vec![]), &tpl, &opts, &crate::render::isolate::Passthrough).unwrap();
    assert_eq!(tpl, before);
}

#[test]
fn substitution_failure_names_the_block() {
    let mut tpl = template(0);
    tpl.text_blocks.insert(
        "footer".to_owned(),
        TextBlock {
            text: "{nickname}".to_owned(),
            x: 0,
            y: 0,
            font_path: None,
            size: 16,
            color: "#000000".to_owned(),
            align: Align::Left,
            max_width: None,
        },
    );
    let err = render_card(&job(vec![]), &tpl, &plain(), &crate::render::isolate::Passthrough)
        .unwrap_err();
    assert!(matches!(err, CardError::Substitution(_)));
    assert!(err.to_string().contains("footer"), "{err}");
}

#[test]
fn background_removal_only_applies_to_jpeg() {
    let dir = temp_dir("job_jpeg_only");
    std::fs::create_dir_all(&dir).unwrap();
    let png = dir.join("a.png");
    let jpg = dir.join("b.jpg");
    RgbaImage::from_pixel(8, 8, Rgba([200, 10, 10, 255])).save(&png).unwrap();
    RgbImage::from_pixel(8, 8, Rgb([10, 10, 200])).save_with_format(&jpg, ImageFormat::Jpeg).unwrap();

    let iso = Counting(Cell::new(0));
    let opts = RenderOptions {
        remove_bg: true,
        ..plain()
    };
    render_card(&job(vec![png, jpg]), &template(2), &opts, &iso).unwrap();
    assert_eq!(iso.0.get(), 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn dry_run_computes_path_without_writing() {
    let dir = temp_dir("job_dry_run");
    let opts = RenderOptions {
        dry_run: true,
        ..plain()
    };
    let path = process_job(&job(vec![]), &template(0), &dir, &opts, &crate::render::isolate::Passthrough)
        .unwrap();
    assert_eq!(path, dir.join("Alex_0.png"));
    assert!(!path.exists());
    assert!(!dir.exists());
}

#[test]
fn process_job_writes_png() {
    let dir = temp_dir("job_write");
    ensure_output_dir(&dir.join("nested")).unwrap();
    let out = dir.join("nested");
    let named = Job {
        output_name: Some("Thank you, Alex!".to_owned()),
        ..job(vec![])
    };
    let path = process_job(&named, &template(0), &out, &plain(), &crate::render::isolate::Passthrough)
        .unwrap();
    assert_eq!(path, out.join("Thank_you_Alex.png"));
    let written = image::open(&path).unwrap();
    assert_eq!((written.width(), written.height()), (60, 40));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn write_into_missing_directory_is_an_error() {
    let dir = temp_dir("job_missing_dir");
    let err = process_job(&job(vec![]), &template(0), &dir, &plain(), &crate::render::isolate::Passthrough)
        .unwrap_err();
    assert!(matches!(err, CardError::Other(_)), "{err}");
}
