use std::path::PathBuf;

use super::*;

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

#[test]
fn yaml_sequence_and_jobs_mapping_both_load() {
    let tmp = temp_dir("jobs_yaml");
    std::fs::create_dir_all(&tmp).unwrap();

    let seq = tmp.join("seq.yml");
    std::fs::write(
        &seq,
        "- recipient_name: Ada\n  photos: [a.jpg, b.jpg]\n- recipient_name: Bo\n  photos: c.png\n",
    )
    .unwrap();
    let jobs = load_jobs(&seq).unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].photos.len(), 2);
    assert_eq!(jobs[1].photos, vec![PathBuf::from("c.png")]);

    let wrapped = tmp.join("wrapped.yaml");
    std::fs::write(&wrapped, "jobs:\n  - recipient_name: Cy\n").unwrap();
    let jobs = load_jobs(&wrapped).unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].recipient_name, "Cy");

    let empty = tmp.join("empty.yml");
    std::fs::write(&empty, "").unwrap();
    assert!(load_jobs(&empty).unwrap().is_empty());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn csv_with_bom_splits_photos() {
    let tmp = temp_dir("jobs_csv");
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("jobs.CSV");
    std::fs::write(
        &path,
        "\u{feff}recipient_name,giver_name,message,project_name,photos,output_name\nAda,Team,Thanks,Apollo,a.jpg; b.jpg,\n",
    )
    .unwrap();

    let jobs = load_jobs(&path).unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].recipient_name, "Ada");
    assert_eq!(jobs[0].project_name, "Apollo");
    assert_eq!(
        jobs[0].photos,
        vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")]
    );
    assert_eq!(jobs[0].output_name, None);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn csv_short_rows_treat_missing_columns_as_empty() {
    let tmp = temp_dir("jobs_csv_short");
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("jobs.csv");
    std::fs::write(
        &path,
        "recipient_name,giver_name,message,project_name,photos,output_name\nAna,Bo,Thanks,P,a.png;b.png\nCy\n",
    )
    .unwrap();

    let jobs = load_jobs(&path).unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].recipient_name, "Ana");
    assert_eq!(
        jobs[0].photos,
        vec![PathBuf::from("a.png"), PathBuf::from("b.png")]
    );
    assert_eq!(jobs[0].output_name, None);
    assert_eq!(jobs[1].recipient_name, "Cy");
    assert!(jobs[1].photos.is_empty());
    assert_eq!(jobs[1].message, "");

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn json_jobs_load() {
    let tmp = temp_dir("jobs_json");
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("jobs.json");
    std::fs::write(&path, r#"[{"recipient_name": "Ada", "output_name": "ada-card"}]"#).unwrap();
    let jobs = load_jobs(&path).unwrap();
    assert_eq!(jobs[0].output_name.as_deref(), Some("ada-card"));
    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn missing_file_and_bad_extension_are_config_errors() {
    assert!(load_jobs(Path::new("/nope/jobs.yml")).unwrap_err().is_config());

    let tmp = temp_dir("jobs_ext");
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("jobs.txt");
    std::fs::write(&path, "whatever").unwrap();
    let err = load_jobs(&path).unwrap_err();
    assert!(err.is_config());
    std::fs::remove_dir_all(&tmp).ok();
}
