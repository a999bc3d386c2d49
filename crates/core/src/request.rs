//! Object operation requests
//!
//! Each command gets a validated request with named fields. Plugin-style
//! positional argument lists (`<cmd> <subcmd> <container> [<object>] [<extra...>]`)
//! are parsed into the same structures by [`ObjectRequest::from_args`], so a
//! short or malformed list is reported as [`Error::InvalidArguments`].

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Flag introducing an explicit object name on upload
pub const NAME_FLAG: &str = "-n";

/// Flag selecting large-object (manifest) deletion
pub const LARGE_FLAG: &str = "-l";

fn non_empty(value: impl Into<String>, what: &str) -> Result<String> {
    let value = value.into();
    if value.is_empty() {
        return Err(Error::InvalidArguments(format!("{what} cannot be empty")));
    }
    Ok(value)
}

/// A single object in a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub container: String,
    pub object: String,
}

impl ObjectRef {
    pub fn new(container: impl Into<String>, object: impl Into<String>) -> Result<Self> {
        Ok(Self {
            container: non_empty(container, "Container name")?,
            object: non_empty(object, "Object name")?,
        })
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.container, self.object)
    }
}

/// List every object in a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub container: String,
}

impl ListRequest {
    pub fn new(container: impl Into<String>) -> Result<Self> {
        Ok(Self {
            container: non_empty(container, "Container name")?,
        })
    }
}

/// Upload a local file as a plain object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutRequest {
    pub container: String,
    pub source: PathBuf,
    /// Overrides the source file's base name
    pub name: Option<String>,
}

impl PutRequest {
    pub fn new(
        container: impl Into<String>,
        source: impl Into<PathBuf>,
        name: Option<String>,
    ) -> Result<Self> {
        let source = source.into();
        if source.as_os_str().is_empty() {
            return Err(Error::InvalidArguments("Source path cannot be empty".into()));
        }
        let name = name.map(|n| non_empty(n, "Object name")).transpose()?;
        Ok(Self {
            container: non_empty(container, "Container name")?,
            source,
            name,
        })
    }

    /// Name the object will be stored under
    pub fn object_name(&self) -> Result<String> {
        if let Some(name) = &self.name {
            return Ok(name.clone());
        }
        base_name(&self.source)
    }
}

fn base_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            Error::InvalidArguments(format!(
                "Cannot derive an object name from '{}'",
                path.display()
            ))
        })
}

/// Copy an object to another container under the same name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRequest {
    pub source: ObjectRef,
    pub new_container: String,
}

impl CopyRequest {
    pub fn new(
        container: impl Into<String>,
        object: impl Into<String>,
        new_container: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            source: ObjectRef::new(container, object)?,
            new_container: non_empty(new_container, "Destination container")?,
        })
    }
}

/// Download an object to a local path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRequest {
    pub source: ObjectRef,
    pub destination: PathBuf,
}

impl GetRequest {
    pub fn new(
        container: impl Into<String>,
        object: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Result<Self> {
        let destination = destination.into();
        if destination.as_os_str().is_empty() {
            return Err(Error::InvalidArguments(
                "Destination path cannot be empty".into(),
            ));
        }
        Ok(Self {
            source: ObjectRef::new(container, object)?,
            destination,
        })
    }
}

/// Rename an object within its container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameRequest {
    pub source: ObjectRef,
    pub new_name: String,
}

impl RenameRequest {
    pub fn new(
        container: impl Into<String>,
        object: impl Into<String>,
        new_name: impl Into<String>,
    ) -> Result<Self> {
        let source = ObjectRef::new(container, object)?;
        let new_name = non_empty(new_name, "New name")?;
        if new_name == source.object {
            return Err(Error::InvalidArguments(format!(
                "New name is the same as the current name '{new_name}'"
            )));
        }
        Ok(Self { source, new_name })
    }
}

/// Delete an object, optionally as a large (manifest) object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub target: ObjectRef,
    pub large: bool,
}

impl DeleteRequest {
    pub fn new(container: impl Into<String>, object: impl Into<String>, large: bool) -> Result<Self> {
        Ok(Self {
            target: ObjectRef::new(container, object)?,
            large,
        })
    }
}

/// A parsed object command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectRequest {
    Info(ObjectRef),
    List(ListRequest),
    Put(PutRequest),
    Copy(CopyRequest),
    Get(GetRequest),
    Rename(RenameRequest),
    Delete(DeleteRequest),
}

impl ObjectRequest {
    /// Parse a positional argument list: `<cmd> <subcmd> <container> [<object>] [<extra...>]`
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let arg = |idx: usize, what: &str| positional(&args, idx, what);

        let subcommand = arg(1, "subcommand")?;
        let request = match subcommand {
            "object" | "info" => {
                expect_len(&args, 4)?;
                ObjectRequest::Info(ObjectRef::new(arg(2, "container")?, arg(3, "object")?)?)
            }
            "objects" | "ls" => {
                expect_len(&args, 3)?;
                ObjectRequest::List(ListRequest::new(arg(2, "container")?)?)
            }
            "put-object" | "put" => {
                let name = match args.get(4).copied() {
                    None => None,
                    Some(NAME_FLAG) => {
                        expect_len(&args, 6)?;
                        Some(arg(5, "object name after -n")?.to_string())
                    }
                    Some(other) => {
                        return Err(Error::InvalidArguments(format!(
                            "Unexpected argument '{other}', expected {NAME_FLAG} <name>"
                        )));
                    }
                };
                ObjectRequest::Put(PutRequest::new(
                    arg(2, "container")?,
                    arg(3, "source path")?,
                    name,
                )?)
            }
            "copy-object" | "cp" => {
                expect_len(&args, 5)?;
                ObjectRequest::Copy(CopyRequest::new(
                    arg(2, "container")?,
                    arg(3, "object")?,
                    arg(4, "destination container")?,
                )?)
            }
            "get-object" | "get" => {
                expect_len(&args, 5)?;
                ObjectRequest::Get(GetRequest::new(
                    arg(2, "container")?,
                    arg(3, "object")?,
                    arg(4, "destination path")?,
                )?)
            }
            "rename-object" | "mv" => {
                expect_len(&args, 5)?;
                ObjectRequest::Rename(RenameRequest::new(
                    arg(2, "container")?,
                    arg(3, "object")?,
                    arg(4, "new name")?,
                )?)
            }
            "delete-object" | "rm" => {
                let large = match args.get(4).copied() {
                    None => false,
                    Some(LARGE_FLAG) => {
                        expect_len(&args, 5)?;
                        true
                    }
                    Some(other) => {
                        return Err(Error::InvalidArguments(format!(
                            "Unexpected argument '{other}', expected {LARGE_FLAG}"
                        )));
                    }
                };
                ObjectRequest::Delete(DeleteRequest::new(
                    arg(2, "container")?,
                    arg(3, "object")?,
                    large,
                )?)
            }
            other => {
                return Err(Error::InvalidArguments(format!(
                    "Unknown object command '{other}'"
                )));
            }
        };

        Ok(request)
    }
}

fn positional<'a>(args: &[&'a str], idx: usize, what: &str) -> Result<&'a str> {
    args.get(idx).copied().ok_or_else(|| {
        Error::InvalidArguments(format!("Missing {what} (argument {})", idx + 1))
    })
}

// Rejects trailing arguments; missing ones are reported by name at the access site.
fn expect_len(args: &[&str], max: usize) -> Result<()> {
    if args.len() > max {
        return Err(Error::InvalidArguments(format!(
            "Unexpected argument '{}'",
            args[max]
        )));
    }
    Ok(())
}
