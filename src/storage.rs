use directories::ProjectDirs;
use nanoserde::{DeJson, SerJson};
use std::fs::{create_dir_all, read_to_string};
use std::path::Path;
use std::{fs, io};

pub const SETTINGS_FILENAME: &str = "dump_settings.json";

pub trait Storage {
    fn get_value<T: SerJson + DeJson>(&self, file_name: impl AsRef<Path>) -> Option<T>;
    fn save_value<T: SerJson + DeJson>(&self, file_name: impl AsRef<Path>, to_save: &T) -> io::Result<()>;
    fn get_dirs(&self) -> &ProjectDirs;
}

pub struct FileStorage {
    project_dirs: ProjectDirs,
}

impl FileStorage {
    pub fn new() -> Option<FileStorage> {
        let project_dirs = ProjectDirs::from("", "Hirtol", "CdgPlayer")?;
        if let Err(e) = create_dir_all(project_dirs.config_dir()) {
            log::warn!("Could not create config directory {:?}: {}", project_dirs.config_dir(), e);
        }
        Some(FileStorage { project_dirs })
    }
}

impl Storage for FileStorage {
    fn get_value<T: SerJson + DeJson>(&self, file_name: impl AsRef<Path>) -> Option<T> {
        let json = read_to_string(self.project_dirs.config_dir().join(file_name)).ok()?;
        T::deserialize_json(json.as_str()).ok()
    }

    fn save_value<T: SerJson + DeJson>(&self, file_name: impl AsRef<Path>, to_save: &T) -> io::Result<()> {
        let json = T::serialize_json(to_save);
        fs::write(self.project_dirs.config_dir().join(file_name), json)
    }

    fn get_dirs(&self) -> &ProjectDirs {
        &self.project_dirs
    }
}

/// Persistent defaults for the frame dumper, anything passed on the command line wins.
#[derive(Debug, Clone, PartialEq, SerJson, DeJson)]
pub struct DumpSettings {
    pub output_dir: String,
    /// Seconds of playback between two dumped frames.
    pub interval: f64,
    pub partial_updates: bool,
}

impl Default for DumpSettings {
    fn default() -> Self {
        DumpSettings {
            output_dir: "cdg_frames/".to_string(),
            interval: 1.0,
            partial_updates: true,
        }
    }
}
