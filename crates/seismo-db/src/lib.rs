//! Seismogram database discovery.
//!
//! A database is a directory tree holding one `ordered_output.nc4` file per
//! physical component. The component of each file is encoded by a tag in its
//! path (`PX`, `PZ`, `MZZ`, ...). Two layouts are valid:
//!
//! - **reciprocal**: one or both of `PX`/`PZ`
//! - **forward**: all four elemental moment tensors
//!
//! # Example
//!
//! ```no_run
//! use seismo_db::locate;
//!
//! let layout = locate(std::path::Path::new("/data/prem_a_20s")).unwrap();
//! println!("{} database with {} files", layout.kind, layout.files.len());
//! ```

pub mod database;
pub mod error;
pub mod extent;
pub mod layout;
pub mod locator;

pub use database::SeismoDatabase;
pub use error::{DatabaseError, DbResult};
pub use extent::seismogram_times;
pub use layout::{ComponentRole, DatabaseKind, DatabaseLayout};
pub use locator::{locate, DATA_FILE_NAME, MAX_DIRECTORY_DEPTH};
