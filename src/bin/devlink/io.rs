#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::path::{Path, PathBuf};

use devlink::application::backend::ImageUpload;
use devlink::application::error::AppError;
use devlink::domain::error::DomainError;
use devlink::infra::error::InfraError;

fn read_file(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|source| InfraError::Io(source).into())
}

/// File content wins over the inline value; one of them is required.
pub fn read_value(
    field: &'static str,
    val: Option<String>,
    file: Option<PathBuf>,
) -> Result<String, AppError> {
    if let Some(path) = file {
        read_file(&path)
    } else if let Some(v) = val {
        Ok(v)
    } else {
        Err(DomainError::required(field).into())
    }
}

pub fn read_opt_value(
    val: Option<String>,
    file: Option<PathBuf>,
) -> Result<Option<String>, AppError> {
    if let Some(path) = file {
        return read_file(&path).map(Some);
    }
    Ok(val)
}

/// Secrets read from a file lose their trailing newline.
pub fn read_secret(
    field: &'static str,
    val: Option<String>,
    file: Option<PathBuf>,
) -> Result<String, AppError> {
    read_value(field, val, file).map(|secret| secret.trim_end_matches(['\r', '\n']).to_string())
}

pub fn read_image(path: &Path) -> Result<ImageUpload, AppError> {
    let bytes = fs::read(path).map_err(InfraError::Io)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| DomainError::validation(format!("{} is not a file", path.display())))?;
    Ok(ImageUpload { file_name, bytes })
}
