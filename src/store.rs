//! Group-keyed persistence for full and condensed routes.
//!
//! Each run overwrites the previous artifacts for a group. Files are written
//! to a sibling temp file and renamed into place, so readers never see a
//! half-written route.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::MaterializeError;
use crate::location::GroupId;
use crate::route::{CondensedLeg, CondensedRoute, FullRoute};

const FULL_ROUTES_DIR: &str = "FullRoutes";
const CONDENSED_ROUTES_DIR: &str = "CondensedRoutes";

/// Paths of the two artifacts written for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteArtifacts {
    pub full_route: PathBuf,
    pub condensed_route: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RouteStore {
    root: PathBuf,
}

impl RouteStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn full_route_path(&self, group: GroupId) -> PathBuf {
        self.root
            .join(FULL_ROUTES_DIR)
            .join(format!("full_route_g{}.json", group))
    }

    pub fn condensed_route_path(&self, group: GroupId) -> PathBuf {
        self.root
            .join(CONDENSED_ROUTES_DIR)
            .join(format!("condensed_route_g{}.json", group))
    }

    pub fn write_full_route(
        &self,
        group: GroupId,
        route: &FullRoute,
    ) -> Result<PathBuf, MaterializeError> {
        let path = self.full_route_path(group);
        write_json(&path, route)?;
        Ok(path)
    }

    /// Writes the legs as a JSON array of `[name, duration]` pairs.
    pub fn write_condensed_route(&self, route: &CondensedRoute) -> Result<PathBuf, MaterializeError> {
        let path = self.condensed_route_path(route.group);
        write_json(&path, &route.legs)?;
        Ok(path)
    }

    /// Writes both artifacts for a group, or neither.
    ///
    /// Both temp files are staged before either is renamed. If the condensed
    /// rename fails the freshly renamed full route is removed again.
    pub fn write_routes(
        &self,
        full: &FullRoute,
        condensed: &CondensedRoute,
    ) -> Result<RouteArtifacts, MaterializeError> {
        let full_path = self.full_route_path(condensed.group);
        let condensed_path = self.condensed_route_path(condensed.group);

        let full_tmp = stage_json(&full_path, full)?;
        let condensed_tmp = match stage_json(&condensed_path, &condensed.legs) {
            Ok(tmp) => tmp,
            Err(err) => {
                let _ = fs::remove_file(&full_tmp);
                return Err(err);
            }
        };

        if let Err(err) = commit(&full_tmp, &full_path) {
            let _ = fs::remove_file(&condensed_tmp);
            return Err(err);
        }
        if let Err(err) = commit(&condensed_tmp, &condensed_path) {
            let _ = fs::remove_file(&full_path);
            return Err(err);
        }

        Ok(RouteArtifacts {
            full_route: full_path,
            condensed_route: condensed_path,
        })
    }

    pub fn read_condensed_route(&self, group: GroupId) -> Result<CondensedRoute, MaterializeError> {
        let path = self.condensed_route_path(group);
        let file = File::open(&path).map_err(|source| MaterializeError::Io {
            path: path.clone(),
            source,
        })?;
        let legs: Vec<CondensedLeg> = serde_json::from_reader(BufReader::new(file))?;
        Ok(CondensedRoute::new(group, legs))
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), MaterializeError> {
    let tmp_path = stage_json(path, value)?;
    commit(&tmp_path, path)
}

/// Serializes `value` into a temp file next to `path`. The temp file is
/// removed again on failure.
fn stage_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<PathBuf, MaterializeError> {
    let io_err = |source| MaterializeError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    let file = File::create(&tmp_path).map_err(io_err)?;
    let written = serialize_into(file, value).map_err(|err| match err {
        WriteError::Io(source) => io_err(source),
        WriteError::Json(source) => MaterializeError::Serialize(source),
    });
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    Ok(tmp_path)
}

enum WriteError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

fn serialize_into<T: Serialize + ?Sized>(file: File, value: &T) -> Result<(), WriteError> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value).map_err(WriteError::Json)?;
    writer.flush().map_err(WriteError::Io)
}

/// Renames a staged temp file into place, removing it if the rename fails.
fn commit(tmp_path: &Path, path: &Path) -> Result<(), MaterializeError> {
    fs::rename(tmp_path, path).map_err(|source| {
        let _ = fs::remove_file(tmp_path);
        MaterializeError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}
