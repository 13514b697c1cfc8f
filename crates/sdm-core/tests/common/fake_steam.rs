//! A throwaway Steam install tree for tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};

pub struct FakeSteam {
    dir: TempDir,
}

#[allow(dead_code)]
impl FakeSteam {
    pub fn new() -> Self {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("steamapps/downloading")).unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn staging(&self, app_id: u32) -> PathBuf {
        self.root()
            .join("steamapps/downloading")
            .join(app_id.to_string())
    }

    /// Create (or resize) the staging folder so it holds exactly `bytes`.
    /// The payload is a sparse file, so large sizes cost nothing.
    pub fn set_staged_bytes(&self, app_id: u32, bytes: u64) {
        let dir = self.staging(app_id);
        fs::create_dir_all(&dir).unwrap();
        let file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(dir.join("chunk.bin"))
            .unwrap();
        file.set_len(bytes).unwrap();
    }

    pub fn remove_staging(&self, app_id: u32) {
        fs::remove_dir_all(self.staging(app_id)).unwrap();
    }

    pub fn write_manifest(&self, app_id: u32, name: &str, downloaded: u64, total: u64) {
        let text = format!(
            "\"AppState\"\n{{\n\t\"appid\"\t\t\"{}\"\n\t\"name\"\t\t\"{}\"\n\t\"BytesToDownload\"\t\t\"{}\"\n\t\"BytesDownloaded\"\t\t\"{}\"\n}}\n",
            app_id, name, total, downloaded
        );
        fs::write(
            self.root()
                .join("steamapps")
                .join(format!("appmanifest_{}.acf", app_id)),
            text,
        )
        .unwrap();
    }

    pub fn write_raw_manifest(&self, app_id: u32, text: &str) {
        fs::write(
            self.root()
                .join("steamapps")
                .join(format!("appmanifest_{}.acf", app_id)),
            text,
        )
        .unwrap();
    }

    pub fn write_content_log(&self, text: &str) {
        let logs = self.root().join("logs");
        fs::create_dir_all(&logs).unwrap();
        fs::write(logs.join("content_log.txt"), text).unwrap();
    }
}
