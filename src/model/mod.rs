use bytes::Bytes;

use crate::error::AppError;

/// Mesh formats the analysis service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    STL,
    OBJ,
}

impl Format {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "stl" => Some(Format::STL),
            "obj" => Some(Format::OBJ),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::STL => "stl",
            Self::OBJ => "obj",
        }
    }
}

/// Suffix after the last `.`, as written. `CUBE.STL` yields `STL`, which no
/// [`Format`] matches.
pub fn extension_of(file_name: &str) -> Option<&str> {
    let (_, suffix) = file_name.rsplit_once('.')?;
    if suffix.is_empty() {
        return None;
    }
    Some(suffix)
}

/// A file handed over by the picker, not yet validated.
#[derive(Debug, Clone)]
pub struct FileRef {
    pub name: String,
    pub content: Bytes,
}

impl FileRef {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// A file whose extension has been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    format: Format,
    content: Bytes,
}

impl SelectedFile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extension(&self) -> &'static str {
        self.format.as_str()
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

impl TryFrom<FileRef> for SelectedFile {
    type Error = AppError;

    fn try_from(file: FileRef) -> Result<Self, Self::Error> {
        let format = extension_of(&file.name)
            .and_then(Format::from_extension)
            .ok_or_else(AppError::invalid_extension)?;

        Ok(Self {
            name: file.name,
            format,
            content: file.content,
        })
    }
}
