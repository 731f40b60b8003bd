//! Tree upload: mirror a local file or directory under a key prefix

use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::key;
use crate::retry::retry;

use super::Publisher;

impl Publisher<'_> {
    /// Upload `local_root` under the key prefix `base`
    ///
    /// A file root lands at `base/<file name>`. For a directory root, every
    /// file below it lands at `base/<path relative to the root>`; the root's
    /// own name is never part of a key. Children are visited in file-name
    /// order. Symbolic links are followed, and a link pointing back at one of
    /// its ancestors is reported and not descended into.
    pub async fn upload_tree(&mut self, base: &str, local_root: &Path) -> Result<()> {
        if !local_root.exists() {
            self.skip(&format!(
                "local path [{}] not exists, skipped",
                local_root.display()
            ));
            return Ok(());
        }

        if !local_root.is_dir() {
            let Some(name) = local_root.file_name().and_then(|n| n.to_str()) else {
                self.skip(&format!(
                    "file name of [{}] is not valid UTF-8, skipped",
                    local_root.display()
                ));
                return Ok(());
            };
            return self.upload_file(&key::join(base, name), local_root).await;
        }

        let walker = WalkDir::new(local_root)
            .follow_links(true)
            .min_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.absorb_walk_error(e)?;
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }
            if !file_type.is_file() {
                self.skip(&format!(
                    "[{}] is not a regular file, skipped",
                    entry.path().display()
                ));
                continue;
            }

            let Some(relative) = key::relative_key(local_root, entry.path()) else {
                self.skip(&format!(
                    "path [{}] is not valid UTF-8, skipped",
                    entry.path().display()
                ));
                continue;
            };

            self.upload_file(&key::join(base, &relative), entry.path())
                .await?;
        }

        Ok(())
    }

    /// Upload one file to `key`, retrying per policy
    ///
    /// A file that no longer exists is logged and skipped.
    pub async fn upload_file(&mut self, key: &str, path: &Path) -> Result<()> {
        if matches!(tokio::fs::try_exists(path).await, Ok(false)) {
            self.skip(&format!("file [{}] not exists, skipped", path.display()));
            return Ok(());
        }

        let key = key::normalize(key);
        let mime = mime_guess::from_path(key).first_or_octet_stream();
        let content_type: &str = mime.as_ref();
        let (store, log, bucket) = (self.store, self.log, self.bucket.as_str());

        let size = retry(&self.policy, log, "upload", key, || async move {
            log.println(&format!("uploading [{}] to [{key}]", path.display()));
            let data = tokio::fs::read(path).await?;
            let size = data.len() as u64;
            store.put_object(bucket, key, data, content_type).await?;
            Ok::<_, Error>(size)
        })
        .await?;

        tracing::debug!(bucket, key, size, "Uploaded object");
        self.report.uploaded += 1;
        self.report.bytes_uploaded += size;
        Ok(())
    }

    fn absorb_walk_error(&mut self, error: walkdir::Error) -> Result<()> {
        let path = error
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        if let Some(ancestor) = error.loop_ancestor() {
            self.skip(&format!(
                "symlink loop [{path}] -> [{}], skipped",
                ancestor.display()
            ));
            return Ok(());
        }

        if error
            .io_error()
            .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
        {
            self.skip(&format!("path [{path}] disappeared, skipped"));
            return Ok(());
        }

        Err(Error::Io(io::Error::from(error)))
    }

    fn skip(&mut self, line: &str) {
        self.log.println(line);
        self.report.skipped += 1;
    }
}
