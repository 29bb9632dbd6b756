use crate::adapter::gateway::yaml::business_hours_from_yaml_str;
use crate::application::interface::BusinessHoursSourceTrait;
use crate::entity::business_hours::BusinessHoursTable;
use crate::entity::error::ScheduleError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[cfg(test)]
use chrono::Weekday;

#[cfg(test)]
use std::io::Write;

pub const BUSINESS_HOURS_FILE_NAME: &str = "business_hours.yaml";

pub fn load_business_hours_from_file(path: &Path) -> Result<BusinessHoursTable, ScheduleError> {
    let text = fs::read_to_string(path).map_err(|source| ScheduleError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let table = business_hours_from_yaml_str(&text)?;
    log::debug!("loaded {} business hours rules from {}", table.len(), path.display());
    Ok(table)
}

// 単一店舗用。agency_idは見ない
pub struct BusinessHoursFile {
    path: PathBuf,
}

impl BusinessHoursFile {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl BusinessHoursSourceTrait for BusinessHoursFile {
    fn fetch(&self, _agency_id: &str) -> Result<BusinessHoursTable, ScheduleError> {
        load_business_hours_from_file(&self.path)
    }
}

// <root>/<agency_id>/business_hours.yaml を店舗ごとに持つ
pub struct BusinessHoursRepository {
    storage_dir_name: PathBuf,
    agency_files: BTreeMap<String, PathBuf>,
}

impl BusinessHoursRepository {
    pub fn new(storage_dir_name: &Path) -> Self {
        Self {
            storage_dir_name: storage_dir_name.to_path_buf(),
            agency_files: BTreeMap::new(),
        }
    }

    // ファイルの場所だけ覚えておき、中身はfetchのたびに読む
    pub fn load(&mut self) {
        self.agency_files.clear();

        for entry in WalkDir::new(&self.storage_dir_name)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_name() != BUSINESS_HOURS_FILE_NAME {
                continue;
            }

            let agency_id = entry
                .path()
                .parent()
                .and_then(|dir| dir.file_name())
                .and_then(|name| name.to_str())
                .map(|s| s.to_string());

            match agency_id {
                Some(agency_id) => {
                    self.agency_files.insert(agency_id, entry.path().to_path_buf());
                }
                None => {
                    log::warn!("skipping {}: agency directory name is not utf-8", entry.path().display());
                }
            }
        }

        log::info!(
            "found business hours for {} agencies under {}",
            self.agency_files.len(),
            self.storage_dir_name.display()
        );
    }

    pub fn get_agency_ids(&self) -> Vec<&str> {
        self.agency_files.keys().map(|s| s.as_str()).collect()
    }
}

impl BusinessHoursSourceTrait for BusinessHoursRepository {
    fn fetch(&self, agency_id: &str) -> Result<BusinessHoursTable, ScheduleError> {
        let path = self
            .agency_files
            .get(agency_id)
            .ok_or_else(|| ScheduleError::UnknownAgency(agency_id.to_string()))?;

        load_business_hours_from_file(path)
    }
}

#[cfg(test)]
fn write_agency(root: &Path, agency_id: &str, yaml: &str) -> PathBuf {
    let dir = root.join(agency_id);
    fs::create_dir_all(&dir).unwrap();

    let path = dir.join(BUSINESS_HOURS_FILE_NAME);
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    path
}

#[test]
fn test_business_hours_file_ファイルから読めること() {
    let root = tempfile::tempdir().unwrap();
    let path = write_agency(
        root.path(),
        "main",
        "business_hours:\n  - day_of_week: 1\n    open_time: '09:00'\n    close_time: '12:00'\n",
    );

    let source = BusinessHoursFile::new(&path);
    let table = source.fetch("anything").unwrap();
    assert!(table.get(Weekday::Mon).unwrap().is_open());
}

#[test]
fn test_business_hours_file_ファイルが無い場合はエラー() {
    let root = tempfile::tempdir().unwrap();
    let source = BusinessHoursFile::new(&root.path().join("missing.yaml"));

    let actual = source.fetch("main");
    assert!(matches!(actual, Err(ScheduleError::Io { .. })));
}

#[test]
fn test_load_店舗ごとのファイルを見つけること() {
    let root = tempfile::tempdir().unwrap();
    write_agency(root.path(), "shibuya", "business_hours: []\n");
    write_agency(
        root.path(),
        "ebisu",
        "business_hours:\n  - day_of_week: 'Sat'\n    open_time: '10:00'\n    close_time: '15:00'\n",
    );
    // 店舗ディレクトリの外にあるファイルは無視する
    fs::write(root.path().join(BUSINESS_HOURS_FILE_NAME), "business_hours: []\n").unwrap();

    let mut repository = BusinessHoursRepository::new(root.path());
    repository.load();

    assert_eq!(repository.get_agency_ids(), vec!["ebisu", "shibuya"]);
    assert!(repository.fetch("shibuya").unwrap().is_empty());
    assert!(repository.fetch("ebisu").unwrap().get(Weekday::Sat).is_some());
}

#[test]
fn test_fetch_知らない店舗はエラー() {
    let root = tempfile::tempdir().unwrap();
    let mut repository = BusinessHoursRepository::new(root.path());
    repository.load();

    let actual = repository.fetch("nowhere");
    assert!(matches!(actual, Err(ScheduleError::UnknownAgency(_))));
}

#[test]
fn test_fetch_毎回ファイルを読み直すこと() {
    let root = tempfile::tempdir().unwrap();
    let path = write_agency(root.path(), "main", "business_hours: []\n");

    let mut repository = BusinessHoursRepository::new(root.path());
    repository.load();
    assert!(repository.fetch("main").unwrap().is_empty());

    fs::write(
        &path,
        "business_hours:\n  - day_of_week: 0\n    is_open: false\n",
    )
    .unwrap();
    assert_eq!(repository.fetch("main").unwrap().len(), 1);
}
