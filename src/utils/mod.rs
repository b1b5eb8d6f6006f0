// SPDX-License-Identifier: GPL-3.0-only
pub mod path_sanitizer;
pub mod url_validator;

pub use path_sanitizer::asset_file_name;
pub use url_validator::{url_file_name, validate_url};
